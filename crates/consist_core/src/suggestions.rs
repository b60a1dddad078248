//! Wagon suggestion table.
//!
//! Some wagons are conventionally coupled with a short tail of companion
//! cars (a first class car after second class coaches, a diner, a mail
//! van). The table maps a wagon's name to the alternative tails worth
//! trying after it. The table is plain data handed to the generator, so
//! tests can substitute their own.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{VehicleId, VehicleType};
use crate::error::{Result, TrainError};

/// Tails resolved against a catalog, keyed by the wagon they follow.
pub type ResolvedSuggestions = BTreeMap<VehicleId, Vec<Vec<Arc<VehicleType>>>>;

/// Wagon name to candidate tail sequences (by wagon name).
///
/// # Example RON
///
/// ```ron
/// {
///     "Coach car": [
///         ["1st Class", "Pwg PR-14"],
///         ["1st Class"],
///     ],
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionTable {
    tails: BTreeMap<String, Vec<Vec<String>>>,
}

impl SuggestionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the tails suggested after a wagon, replacing existing ones.
    #[must_use]
    pub fn with_tails<I, T, S>(mut self, wagon_name: impl Into<String>, tails: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tails = tails
            .into_iter()
            .map(|tail| tail.into_iter().map(Into::into).collect())
            .collect();
        self.tails.insert(wagon_name.into(), tails);
        self
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(TrainError::SuggestionParse)
    }

    /// The suggestions for the stock passenger cars of the game.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_tails(
                "Coach car",
                [
                    vec!["1st Class", "Pwg PR-14"],
                    vec!["1st Class"],
                    vec!["Pwg PR-14"],
                ],
            )
            .with_tails(
                "1st Class",
                [
                    vec!["2nd class", "Pwg PR-14"],
                    vec!["Dining car", "Pwg PR-14"],
                    vec!["2nd class"],
                    vec!["Dining car"],
                    vec!["Pwg PR-14"],
                ],
            )
            .with_tails(
                "2nd class",
                [
                    vec!["1st Class", "Pwg PR-14"],
                    vec!["Dining car", "Pwg PR-14"],
                    vec!["1st Class"],
                    vec!["Dining car"],
                    vec!["Pwg PR-14"],
                ],
            )
            .with_tails(
                "SCF",
                [vec!["SCF Diner", "SCF Mail"], vec!["SCF Diner"], vec!["SCF Mail"]],
            )
            .with_tails(
                "SCG",
                [vec!["SCG Diner", "SCF Mail"], vec!["SCG Diner"], vec!["SCG Mail"]],
            )
            .with_tails(
                "SGV class 1",
                [vec!["SGV Diner", "SCF Mail"], vec!["SGV Diner"], vec!["SGV Mail"]],
            )
            .with_tails(
                "SGV class 2",
                [
                    vec!["SGV class 1", "SCF post"],
                    vec!["SGV bar", "SCF post"],
                    vec!["SGV class 1"],
                    vec!["SGV bar"],
                    vec!["SGV post"],
                ],
            )
    }

    /// Tails suggested after the named wagon, by name.
    #[must_use]
    pub fn get(&self, wagon_name: &str) -> &[Vec<String>] {
        self.tails.get(wagon_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of wagons with suggestions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tails.len()
    }

    /// Check if the table has no suggestions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tails.is_empty()
    }

    /// Resolve the tails for `wagon` against the wagons a catalog offers.
    ///
    /// Each tail keeps only names present in `available` whose wagon
    /// carries the same cargo type as `wagon`, preserving tail order. Tails
    /// left empty are dropped.
    #[must_use]
    pub fn resolve(
        &self,
        wagon: &VehicleType,
        available: &[Arc<VehicleType>],
    ) -> Vec<Vec<Arc<VehicleType>>> {
        let mut resolved = Vec::new();

        for names in self.get(&wagon.name) {
            let tail: Vec<Arc<VehicleType>> = names
                .iter()
                .filter_map(|name| {
                    let found = available.iter().find(|candidate| &candidate.name == name);
                    match found {
                        Some(candidate) if candidate.cargo_type() == wagon.cargo_type() => {
                            Some(Arc::clone(candidate))
                        }
                        Some(candidate) => {
                            tracing::debug!(
                                wagon = %wagon.name,
                                suggested = %candidate.name,
                                "Dropping suggested wagon with a different cargo type"
                            );
                            None
                        }
                        None => {
                            tracing::debug!(
                                wagon = %wagon.name,
                                suggested = %name,
                                "Dropping suggested wagon missing from catalog"
                            );
                            None
                        }
                    }
                })
                .collect();

            if !tail.is_empty() {
                resolved.push(tail);
            }
        }

        resolved
    }

    /// Resolve tails for every wagon in `wagons` that has suggestions.
    #[must_use]
    pub fn resolve_all(
        &self,
        wagons: &[Arc<VehicleType>],
        available: &[Arc<VehicleType>],
    ) -> ResolvedSuggestions {
        wagons
            .iter()
            .filter_map(|wagon| {
                let tails = self.resolve(wagon, available);
                (!tails.is_empty()).then(|| (wagon.id.clone(), tails))
            })
            .collect()
    }
}
