//! # Consist Core
//!
//! Deterministic train composition engine.
//!
//! Given a catalog of engines and wagons, this crate generates candidate
//! trains, removes duplicates and dominated variants, applies weight and
//! length rules, and ranks what is left by effective capacity.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No floating-point math (uses fixed-point and integers)
//!
//! This separation enables:
//! - Any presentation layer (web, CLI, tooling) on top of the same core
//! - Searches running in parallel without coordination
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`data`] - Reference data: vehicles, cargo types, epochs
//! - [`catalog`] - Catalog queries over reference data
//! - [`train`] - Train composition and derived properties
//! - [`generate`] - Candidate generation
//! - [`pipeline`] - Deduplication, dominance, filtering and ranking
//! - [`search`] - Search orchestration
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod data;
pub mod error;
pub mod generate;
pub mod math;
pub mod options;
pub mod pipeline;
pub mod search;
pub mod suggestions;
pub mod train;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogEntry, CatalogQuery, EntityKind, VehicleCatalog};
    pub use crate::data::{
        CargoType, CargoTypeId, EngineSpec, Epoch, Load, Payment, TokenType, TokenTypeId, Track,
        VehicleId, VehicleKind, VehicleType,
    };
    pub use crate::error::{Result, TrainError};
    pub use crate::generate::FillTarget;
    pub use crate::math::Fixed;
    pub use crate::options::{MaximumLength, MaximumWeight, Options};
    pub use crate::search::{collect, Results};
    pub use crate::suggestions::{ResolvedSuggestions, SuggestionTable};
    pub use crate::train::{Payments, Train};
}
