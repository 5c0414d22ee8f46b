//! Common error types used across the workspace.
//!
//! [`FeederError`] is the single error surfaced by the application layer.
//! Each layer defines its own typed errors and converts via `#[from]`; the
//! domain kinds stay distinguishable all the way up to the caller.

use crate::device::{Device, Mac};
use crate::id::{DeviceId, ProductId, UserId};

/// Top-level error returned by every use-case.
#[derive(Debug, thiserror::Error)]
pub enum FeederError {
    /// Malformed, missing or out-of-range input. Fixable by the caller.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The MAC address is already bound to another device.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// No matching device or history.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The first step of a two-step operation committed, the second did not.
    #[error(transparent)]
    PartialFailure(#[from] PartialFailureError),

    /// Unexpected persistence failure. Never shown to callers in detail.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input that violates a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must be one of {allowed}, got {value:?}")]
    NotAllowed {
        field: &'static str,
        allowed: &'static str,
        value: String,
    },

    #[error("schedule must contain exactly two valid timestamps")]
    InvalidSchedule,

    #[error("{field} is not a valid identifier")]
    InvalidIdentifier { field: &'static str },

    #[error("MAC required")]
    MacRequired,

    /// Several fields failed at once.
    #[error("{}", join_violations(.0))]
    Many(Vec<ValidationError>),
}

impl ValidationError {
    /// Fold a list of violations into a single result.
    ///
    /// # Errors
    ///
    /// Returns the only violation as-is, or [`ValidationError::Many`] when
    /// there are several.
    pub fn check(mut violations: Vec<Self>) -> Result<(), Self> {
        match violations.len() {
            0 => Ok(()),
            1 => Err(violations.remove(0)),
            _ => Err(Self::Many(violations)),
        }
    }

    /// Flattened list of individual violations.
    #[must_use]
    pub fn violations(&self) -> Vec<&Self> {
        match self {
            Self::Many(items) => items.iter().flat_map(Self::violations).collect(),
            other => vec![other],
        }
    }
}

fn join_violations(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A device with the same MAC address is already registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device with this MAC already exists: {mac}")]
pub struct ConflictError {
    pub mac: Mac,
}

/// The requested record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("device {0} not found")]
    Device(DeviceId),

    #[error("device with MAC {0} not found")]
    DeviceByMac(Mac),

    #[error("device not registered: {0}")]
    Unregistered(Mac),

    #[error("no device linked to product {0}")]
    ProductDevice(ProductId),

    #[error("product {0} not found")]
    Product(ProductId),

    #[error("no devices owned by user {0}")]
    OwnedDevices(UserId),

    #[error("no history for device {0}")]
    History(Mac),
}

/// A two-step operation where only the first step was committed.
///
/// Carries the state left behind so the caller can reconcile.
#[derive(Debug, thiserror::Error)]
pub enum PartialFailureError {
    #[error("device {} was registered but its initial history snapshot was not recorded", .device.mac)]
    SnapshotNotRecorded {
        device: Box<Device>,
        #[source]
        source: Box<FeederError>,
    },

    #[error(
        "device {} was reassigned to user {} but stock of product {product_id} was not depleted",
        .device.mac,
        .device.owner_id
    )]
    StockNotDepleted {
        device: Box<Device>,
        product_id: ProductId,
        #[source]
        source: Box<FeederError>,
    },
}

impl PartialFailureError {
    /// The device as it was persisted by the committed step.
    #[must_use]
    pub fn device(&self) -> &Device {
        match self {
            Self::SnapshotNotRecorded { device, .. } | Self::StockNotDepleted { device, .. } => {
                device
            }
        }
    }
}
