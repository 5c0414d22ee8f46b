//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }

            /// Parse a caller-supplied value for `field`.
            ///
            /// # Errors
            ///
            /// [`ValidationError::MissingField`] when `raw` is blank,
            /// [`ValidationError::InvalidIdentifier`] when it is not a UUID.
            pub fn parse_field(raw: &str, field: &'static str) -> Result<Self, ValidationError> {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Err(ValidationError::MissingField { field });
                }
                Self::from_str(raw).map_err(|_| ValidationError::InvalidIdentifier { field })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Device`](crate::device::Device).
    DeviceId
);

define_id!(
    /// Unique identifier for a [`HistoryEntry`](crate::history::HistoryEntry).
    HistoryEntryId
);

define_id!(
    /// Reference to a user account owned by the external user store.
    UserId
);

define_id!(
    /// Reference to a product owned by the external product catalog.
    ProductId
);
