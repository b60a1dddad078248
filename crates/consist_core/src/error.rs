//! Error types for train composition and search.

use thiserror::Error;

use crate::data::CargoTypeId;

/// Result type alias using [`TrainError`].
pub type Result<T> = std::result::Result<T, TrainError>;

/// Top-level error type for composition and search errors.
#[derive(Debug, Error)]
pub enum TrainError {
    /// A train's loads span more than one cargo type.
    ///
    /// Correct generation never builds such a train, so callers should
    /// treat this as a bug rather than recover from it.
    #[error("Train has multiple cargo types: {}", format_cargo_types(.cargo_types))]
    MultipleCargoTypes {
        /// Every cargo type found on the train, in first-seen order.
        cargo_types: Vec<CargoTypeId>,
    },

    /// Search options failed validation.
    #[error("Invalid search options: {0}")]
    InvalidOptions(String),

    /// Failed to parse search options.
    #[error("Failed to parse search options: {0}")]
    OptionsParse(#[source] ron::error::SpannedError),

    /// Failed to parse a wagon suggestion table.
    #[error("Failed to parse wagon suggestions: {0}")]
    SuggestionParse(#[source] ron::error::SpannedError),
}

fn format_cargo_types(cargo_types: &[CargoTypeId]) -> String {
    cargo_types
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
