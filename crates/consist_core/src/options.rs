//! Search options and the inclusion rules they imply.
//!
//! Options are plain data and deserialize from RON with defaults for
//! everything but the epoch:
//!
//! ```ron
//! Options(
//!     epoch: Diesel,
//!     maximum_weight: Empty,
//!     maximum_length: Long,
//!     station_length_long: 10,
//!     cargo_ids: ["coal"],
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogQuery, EntityKind};
use crate::data::Epoch;
use crate::error::{Result, TrainError};
use crate::math::{tiles, Fixed};
use crate::train::Train;

/// Weight ceiling applied by [`Options::should_include`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaximumWeight {
    /// Reject trains heavier than recommended when loaded.
    #[default]
    Full,
    /// Reject trains heavier than recommended when empty.
    Empty,
    /// No weight ceiling.
    Infinite,
}

/// Length ceiling applied by [`Options::should_include`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaximumLength {
    /// Reject trains longer than the short station.
    #[default]
    Short,
    /// Reject trains longer than the long station.
    Long,
    /// No length ceiling.
    Infinite,
}

/// Options for one search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Options {
    /// Progression tier to search in.
    pub epoch: Epoch,

    /// Include vehicles that need a depot extension.
    #[serde(default)]
    pub include_depot_upgrade: bool,

    /// Include unique vehicles (quest rewards).
    #[serde(default)]
    pub include_quest_reward: bool,

    /// Most engines to put at the head of a train.
    #[serde(default = "default_maximum_engines")]
    pub maximum_engines: usize,

    /// Weight rule.
    #[serde(default)]
    pub maximum_weight: MaximumWeight,

    /// Length rule.
    #[serde(default)]
    pub maximum_length: MaximumLength,

    /// Short station length in tiles.
    #[serde(default = "default_station_length_short")]
    pub station_length_short: u32,

    /// Long station length in tiles.
    #[serde(default = "default_station_length_long")]
    pub station_length_long: u32,

    /// Engines to consider. Empty means every available engine.
    #[serde(default)]
    pub engine_ids: Vec<String>,

    /// Wagons to consider. Empty means every available wagon.
    #[serde(default)]
    pub wagon_ids: Vec<String>,

    /// Cargo types to consider. Empty means every available cargo type.
    #[serde(default)]
    pub cargo_ids: Vec<String>,
}

/// Default engine count limit.
const fn default_maximum_engines() -> usize {
    2
}

/// Default short station length.
const fn default_station_length_short() -> u32 {
    6
}

/// Default long station length.
const fn default_station_length_long() -> u32 {
    8
}

impl Options {
    /// Options for an epoch with every other setting at its default.
    #[must_use]
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            include_depot_upgrade: false,
            include_quest_reward: false,
            maximum_engines: default_maximum_engines(),
            maximum_weight: MaximumWeight::default(),
            maximum_length: MaximumLength::default(),
            station_length_short: default_station_length_short(),
            station_length_long: default_station_length_long(),
            engine_ids: Vec::new(),
            wagon_ids: Vec::new(),
            cargo_ids: Vec::new(),
        }
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(TrainError::OptionsParse)
    }

    /// Check that the options describe a searchable configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidOptions`] for a zero engine limit, a
    /// zero station length, or a short station longer than the long one.
    pub fn validate(&self) -> Result<()> {
        if self.maximum_engines == 0 {
            return Err(TrainError::InvalidOptions(
                "maximum_engines must be at least 1".to_string(),
            ));
        }
        if self.station_length_short == 0 || self.station_length_long == 0 {
            return Err(TrainError::InvalidOptions(
                "station lengths must be positive".to_string(),
            ));
        }
        if self.station_length_short > self.station_length_long {
            return Err(TrainError::InvalidOptions(format!(
                "short station ({}) is longer than long station ({})",
                self.station_length_short, self.station_length_long
            )));
        }
        Ok(())
    }

    /// Short station length as fixed-point tiles.
    #[must_use]
    pub fn short_station(&self) -> Fixed {
        tiles(self.station_length_short)
    }

    /// Long station length as fixed-point tiles.
    #[must_use]
    pub fn long_station(&self) -> Fixed {
        tiles(self.station_length_long)
    }

    /// Station length that length usage is measured against.
    ///
    /// Without a length ceiling the long station is used.
    #[must_use]
    pub fn station_length(&self) -> Fixed {
        match self.maximum_length {
            MaximumLength::Short => self.short_station(),
            MaximumLength::Long | MaximumLength::Infinite => self.long_station(),
        }
    }

    /// Catalog query for the available records of `kind`.
    #[must_use]
    pub fn catalog_query(&self, kind: EntityKind) -> CatalogQuery {
        CatalogQuery::new(kind, self.epoch)
            .with_toggles(self.include_depot_upgrade, self.include_quest_reward)
    }

    /// Check a train against the weight and length rules.
    #[must_use]
    pub fn should_include(&self, train: &Train) -> bool {
        let within_weight = match self.maximum_weight {
            MaximumWeight::Full => !train.is_over_recommended_weight_full(),
            MaximumWeight::Empty => !train.is_over_recommended_weight_empty(),
            MaximumWeight::Infinite => true,
        };

        let within_length = match self.maximum_length {
            MaximumLength::Short => train.length() <= self.short_station(),
            MaximumLength::Long => train.length() <= self.long_station(),
            MaximumLength::Infinite => true,
        };

        within_weight && within_length
    }
}
