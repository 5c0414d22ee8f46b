//! # feederhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository` — device records, unique by MAC
//!   - `HistoryRepository` — append-only device snapshots
//!   - `ProductInventory` — stock depletion on the external product store
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceService` — register, look up, apply telemetry, reassign owner
//!   - `HistoryService` — append and query snapshots
//!   - `OwnershipService` — owner transfer coupled with stock depletion
//!   - `TelemetryGateway` — entry point for field reports keyed by MAC
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `feederhub-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
