//! # feederhub-domain
//!
//! Pure domain model for the feederhub device state & telemetry engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (feeders identified by a hardware MAC address, with
//!   container/dish levels, pump and servo actuators, and an owner)
//! - Define the two-slot actuation **Schedule** and its validation
//! - Define **Telemetry** (partial field reports coming from a device)
//! - Define **History entries** (immutable snapshots of a device's state)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod history;
pub mod schedule;
pub mod telemetry;
