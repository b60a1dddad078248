//! Reference data structures for vehicles, cargo and tokens.
//!
//! This module contains pure data structures describing the vehicles a
//! player can buy. Records are read-only once loaded and are shared between
//! trains through `Arc`.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! Extracting and storing reference data is the catalog owner's concern.

/// Declares a string-backed identifier newtype.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

pub(crate) use string_id;

mod cargo_data;
mod epoch;
mod vehicle_data;

pub use cargo_data::{CargoType, CargoTypeId, Payment, TokenType, TokenTypeId};
pub use epoch::{Epoch, Track};
pub use vehicle_data::{EngineSpec, Load, VehicleId, VehicleKind, VehicleType};
