//! # feederhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API used by the feeders and the mobile app
//!   (`/api/addDevice`, `/api/datosRecibidos`, `/api/historial/{mac}`, …)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! Route paths and JSON field names follow what the deployed firmware and
//! app already send, which is why they are not in English.
//!
//! ## Dependency rule
//! Depends on `feederhub-app` (for port traits and services) and
//! `feederhub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
