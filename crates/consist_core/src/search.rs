//! Search orchestration.
//!
//! [`collect`] turns a catalog snapshot, a suggestion table and search
//! options into ranked trains, keeping every intermediate stage for
//! diagnostics. The search is a pure function of its inputs: the same
//! catalog and options always produce the same [`Results`], in the same
//! order.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{EntityKind, VehicleCatalog};
use crate::data::{CargoType, CargoTypeId, VehicleType};
use crate::error::Result;
use crate::generate::generate_trains;
use crate::math::{option_fixed_serde, Fixed};
use crate::options::Options;
use crate::pipeline::{deduplicate, discard_dominated, filter, rank};
use crate::suggestions::{ResolvedSuggestions, SuggestionTable};
use crate::train::Train;

/// Everything a search produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Results {
    /// Options the search ran with.
    pub options: Options,

    /// Every engine available under the options.
    pub all_engines: Vec<Arc<VehicleType>>,
    /// Every wagon available under the options.
    pub all_wagons: Vec<Arc<VehicleType>>,
    /// Every cargo type carried by an available wagon.
    pub all_cargo_types: Vec<CargoType>,

    /// Engines matching `options.engine_ids` (all engines without a selection).
    pub selected_engines: Vec<Arc<VehicleType>>,
    /// Wagons matching `options.wagon_ids` (all wagons without a selection).
    pub selected_wagons: Vec<Arc<VehicleType>>,
    /// Cargo types matching `options.cargo_ids` (all without a selection).
    pub selected_cargo_types: Vec<CargoType>,

    /// Selected wagons carrying a selected cargo type.
    pub filtered_wagons: Vec<Arc<VehicleType>>,

    /// Suggested tails resolved for the wagons searched.
    pub suggestions: ResolvedSuggestions,

    /// Final ranked trains.
    pub trains: Vec<Train>,

    /// Every generated candidate.
    pub after_generate: Vec<Train>,
    /// Candidates left after removing duplicates.
    pub after_deduplicate: Vec<Train>,
    /// Candidates left after discarding dominated engine counts.
    pub after_discard: Vec<Train>,
    /// Candidates passing the weight and length rules.
    pub after_filter: Vec<Train>,

    /// Largest capacity among the final trains.
    pub best_capacity: Option<u32>,
    /// Largest bonus capacity among the final trains.
    pub best_bonus_capacity: Option<u64>,
    /// Fastest final train, by its slowest engine.
    pub best_max_speed: Option<u32>,
    /// Highest weight usage that does not exceed 1.
    #[serde(with = "option_fixed_serde")]
    pub best_weight_usage: Option<Fixed>,
    /// Highest length usage that does not exceed 1.
    #[serde(with = "option_fixed_serde")]
    pub best_length_usage: Option<Fixed>,

    /// Check if any final train earns bonus income.
    pub any_train_has_bonus: bool,
}

impl Results {
    /// Check if the engine selection covers every available engine.
    #[must_use]
    pub fn all_engines_are_selected(&self) -> bool {
        self.all_engines == self.selected_engines
    }

    /// Check if the wagon selection covers every available wagon.
    #[must_use]
    pub fn all_wagons_are_selected(&self) -> bool {
        self.all_wagons == self.selected_wagons
    }

    /// Check if the cargo selection covers every available cargo type.
    #[must_use]
    pub fn all_cargo_types_are_selected(&self) -> bool {
        self.all_cargo_types == self.selected_cargo_types
    }

    /// Check if the search found no trains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }
}

/// Entities a search draws from, all and selected.
struct Selection {
    all_engines: Vec<Arc<VehicleType>>,
    all_wagons: Vec<Arc<VehicleType>>,
    all_cargo_types: Vec<CargoType>,
    selected_engines: Vec<Arc<VehicleType>>,
    selected_wagons: Vec<Arc<VehicleType>>,
    selected_cargo_types: Vec<CargoType>,
}

impl Selection {
    fn query<C: VehicleCatalog + ?Sized>(catalog: &C, options: &Options) -> Self {
        let engines = options.catalog_query(EntityKind::Engine);
        let wagons = options.catalog_query(EntityKind::Wagon);
        let cargo_types = options.catalog_query(EntityKind::CargoType);

        let all_engines = catalog.engines(&engines);
        let all_wagons = catalog.wagons(&wagons);
        let all_cargo_types = catalog.cargo_types(&cargo_types);

        let selected_engines = if options.engine_ids.is_empty() {
            all_engines.clone()
        } else {
            catalog.engines(&engines.with_ids(options.engine_ids.clone()))
        };
        let selected_wagons = if options.wagon_ids.is_empty() {
            all_wagons.clone()
        } else {
            catalog.wagons(&wagons.with_ids(options.wagon_ids.clone()))
        };
        let selected_cargo_types = if options.cargo_ids.is_empty() {
            all_cargo_types.clone()
        } else {
            catalog.cargo_types(&cargo_types.with_ids(options.cargo_ids.clone()))
        };

        Self {
            all_engines,
            all_wagons,
            all_cargo_types,
            selected_engines,
            selected_wagons,
            selected_cargo_types,
        }
    }

    /// Selected engines, or every engine when the selection matched nothing.
    fn engines(&self) -> &[Arc<VehicleType>] {
        or_all(&self.selected_engines, &self.all_engines)
    }

    /// Selected wagons, or every wagon when the selection matched nothing.
    fn wagons(&self) -> &[Arc<VehicleType>] {
        or_all(&self.selected_wagons, &self.all_wagons)
    }

    /// Selected cargo types, or every cargo type when the selection matched nothing.
    fn cargo_types(&self) -> &[CargoType] {
        or_all(&self.selected_cargo_types, &self.all_cargo_types)
    }

    /// Wagons carrying one of the cargo types.
    fn filtered_wagons(&self) -> Vec<Arc<VehicleType>> {
        let cargo_ids: Vec<&CargoTypeId> = self.cargo_types().iter().map(|c| &c.id).collect();
        self.wagons()
            .iter()
            .filter(|wagon| wagon.cargo_type().is_some_and(|id| cargo_ids.contains(&id)))
            .cloned()
            .collect()
    }
}

fn or_all<'a, T>(selected: &'a [T], all: &'a [T]) -> &'a [T] {
    if selected.is_empty() {
        all
    } else {
        selected
    }
}

/// Run a search.
///
/// # Errors
///
/// Returns [`crate::error::TrainError::InvalidOptions`] for options that
/// fail validation, and propagates
/// [`crate::error::TrainError::MultipleCargoTypes`] if a candidate mixes
/// cargo types. Finding no trains is not an error.
pub fn collect<C: VehicleCatalog + ?Sized>(
    catalog: &C,
    suggestions: &SuggestionTable,
    options: &Options,
) -> Result<Results> {
    options.validate()?;

    let selection = Selection::query(catalog, options);
    let filtered_wagons = selection.filtered_wagons();

    let wagons: &[Arc<VehicleType>] = if filtered_wagons.is_empty() {
        if !selection.wagons().is_empty() {
            tracing::warn!(
                wagons = selection.wagons().len(),
                cargo_types = selection.cargo_types().len(),
                "No wagon carries the selected cargo types, searching all selected wagons"
            );
        }
        selection.wagons()
    } else {
        &filtered_wagons
    };

    let resolved = suggestions.resolve_all(wagons, &selection.all_wagons);
    let after_generate = generate_trains(selection.engines(), wagons, &resolved, options);
    tracing::debug!(
        engines = selection.engines().len(),
        wagons = wagons.len(),
        candidates = after_generate.len(),
        "Generated candidates"
    );

    let after_deduplicate = deduplicate(after_generate.clone());
    tracing::debug!(candidates = after_deduplicate.len(), "Removed duplicates");

    let after_discard = discard_dominated(after_deduplicate.clone())?;
    tracing::debug!(candidates = after_discard.len(), "Discarded dominated candidates");

    let after_filter = filter(after_discard.clone(), options);
    tracing::debug!(candidates = after_filter.len(), "Applied weight and length rules");

    let trains = rank(after_filter.clone());

    let best_capacity = trains
        .iter()
        .map(Train::capacity)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .max();
    let best_bonus_capacity = trains.iter().map(Train::bonus_capacity).max();
    let best_max_speed = trains.iter().filter_map(Train::max_speed).max();
    let best_weight_usage = best_usage(trains.iter().filter_map(Train::weight_usage));
    let station_length = options.station_length();
    let best_length_usage =
        best_usage(trains.iter().filter_map(|train| train.length_usage(station_length)));
    let any_train_has_bonus = trains.iter().any(Train::has_bonus);

    tracing::info!(
        epoch = %options.epoch,
        trains = trains.len(),
        best_capacity = ?best_capacity,
        "Search complete"
    );

    let Selection {
        all_engines,
        all_wagons,
        all_cargo_types,
        selected_engines,
        selected_wagons,
        selected_cargo_types,
    } = selection;

    Ok(Results {
        options: options.clone(),
        all_engines,
        all_wagons,
        all_cargo_types,
        selected_engines,
        selected_wagons,
        selected_cargo_types,
        filtered_wagons,
        suggestions: resolved,
        trains,
        after_generate,
        after_deduplicate,
        after_discard,
        after_filter,
        best_capacity,
        best_bonus_capacity,
        best_max_speed,
        best_weight_usage,
        best_length_usage,
        any_train_has_bonus,
    })
}

/// Highest usage ratio that does not exceed 1.
fn best_usage(usages: impl Iterator<Item = Fixed>) -> Option<Fixed> {
    usages.filter(|usage| *usage <= Fixed::ONE).max()
}
