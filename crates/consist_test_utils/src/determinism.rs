//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a search produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Rankings must not depend on the machine, the run, or the thread a search
//! happens to run on. Sources of non-determinism include:
//!
//! - **Floating-point math**: Rounding differs between targets and
//!   optimisation levels. Lengths and ratios use
//!   [`consist_core::math::Fixed`]; weights and capacities are integers.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Anything whose order reaches the output is kept in a `Vec` or
//!   `BTreeMap`.
//!
//! - **Unstable sorts**: Ranking uses a stable sort so equal trains keep
//!   their generation order.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual stage determinism (dedup, discard, rank)
//! 2. **Property tests**: Random catalogs must still produce deterministic results
//! 3. **Integration tests**: Full searches are reproducible
//! 4. **Parallel tests**: Running N searches in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use consist_core::catalog::VehicleCatalog;
use consist_core::options::Options;
use consist_core::search::{collect, Results};
use consist_core::suggestions::SuggestionTable;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic search).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the search was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Search is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a computation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `setup` - Function to create the inputs
/// * `run` - Function computing an output from the inputs
/// * `hash` - Function to compute the output hash
///
/// # Example
///
/// ```ignore
/// use consist_test_utils::determinism::{compute_hash, verify_determinism};
///
/// let result = verify_determinism(
///     5,
///     || (sample_catalog(), SuggestionTable::standard(), steam_options()),
///     |(catalog, table, options)| collect(catalog, table, options).ok(),
///     compute_hash,
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, R, Setup, Run, HashFn>(
    runs: usize,
    setup: Setup,
    run: Run,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Run: Fn(&S) -> R,
    HashFn: Fn(&R) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let state = setup();
        let output = run(&state);
        hashes.push(hash(&output));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Run the same search twice and check that the results hash identically.
///
/// A search that fails hashes as `None`, so two identical failures still
/// count as deterministic.
pub fn verify_search_determinism<C>(
    catalog: &C,
    suggestions: &SuggestionTable,
    options: &Options,
) -> bool
where
    C: VehicleCatalog + ?Sized,
{
    let result = verify_determinism(
        2,
        || (),
        |_| collect(catalog, suggestions, options).ok(),
        compute_hash,
    );
    result.is_deterministic
}

/// Result of parallel search runs.
#[derive(Debug, Clone)]
pub struct ParallelSearchResult {
    /// Results hash from each search.
    pub hashes: Vec<u64>,
    /// Number of searches run.
    pub num_searches: usize,
}

impl ParallelSearchResult {
    /// Check if all searches produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all searches matched.
    ///
    /// # Panics
    ///
    /// Panics if searches produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel searches diverged!\n\
                 Searches: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_searches,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run N searches over shared inputs on scoped threads and collect hashes.
///
/// The catalog and suggestion table are shared by reference across all
/// threads, which is how a server would serve concurrent requests.
///
/// # Panics
///
/// Panics if a search thread panics.
///
/// # Example
///
/// ```ignore
/// use consist_test_utils::determinism::run_parallel_searches_scoped;
///
/// let result = run_parallel_searches_scoped(&catalog, &table, &options, 8);
/// result.assert_deterministic();
/// ```
pub fn run_parallel_searches_scoped<C>(
    catalog: &C,
    suggestions: &SuggestionTable,
    options: &Options,
    num_searches: usize,
) -> ParallelSearchResult
where
    C: VehicleCatalog + Sync + ?Sized,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_searches)
            .map(|_| s.spawn(|| compute_hash(&collect(catalog, suggestions, options).ok())))
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelSearchResult {
        hashes,
        num_searches,
    }
}

/// Compare two searches stage by stage, finding the first that differs.
///
/// Useful for debugging non-determinism by finding exactly where two
/// searches start to differ.
///
/// # Returns
///
/// `None` if the results match, otherwise the name of the first differing
/// stage.
#[must_use]
pub fn find_first_divergence(first: &Results, second: &Results) -> Option<&'static str> {
    let stages = [
        ("after_generate", &first.after_generate, &second.after_generate),
        ("after_deduplicate", &first.after_deduplicate, &second.after_deduplicate),
        ("after_discard", &first.after_discard, &second.after_discard),
        ("after_filter", &first.after_filter, &second.after_filter),
        ("trains", &first.trains, &second.trains),
    ];

    stages
        .into_iter()
        .find(|(_, a, b)| a != b)
        .map(|(name, _, _)| name)
        .or_else(|| (first != second).then_some("aggregates"))
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for search testing.
///
/// These strategies generate random but reproducible vehicles, catalogs
/// and options for property-based testing.
pub mod strategies {
    use consist_core::catalog::Catalog;
    use consist_core::data::{CargoType, EngineSpec, Epoch, Load, VehicleType};
    use consist_core::math::Fixed;
    use consist_core::options::{MaximumLength, MaximumWeight, Options};
    use proptest::prelude::*;

    /// Cargo type identifiers the strategies draw from.
    pub const CARGO_IDS: [&str; 3] = ["coal", "timber", "passengers"];

    /// Generate a vehicle length in quarter tiles.
    ///
    /// Range: 0.25 to 3 tiles
    pub fn arb_length() -> impl Strategy<Value = Fixed> {
        (1i32..=12i32).prop_map(|quarters| Fixed::from_num(quarters) / Fixed::from_num(4))
    }

    /// Generate an epoch.
    pub fn arb_epoch() -> impl Strategy<Value = Epoch> {
        proptest::sample::select(Epoch::ALL.to_vec())
    }

    /// Generate engine traction stats.
    ///
    /// Power 100 to 4000, top speed 20 to 160.
    pub fn arb_engine_spec() -> impl Strategy<Value = EngineSpec> {
        (100u32..4000u32, 20u32..160u32).prop_map(|(power, speed)| EngineSpec::new(power, speed))
    }

    /// Generate an engine with the given id, available from the first epoch.
    pub fn arb_engine(id: String) -> impl Strategy<Value = VehicleType> {
        (arb_engine_spec(), 10u32..120u32, arb_length()).prop_map(
            move |(spec, weight, length)| {
                VehicleType::engine(id.clone(), id.clone(), spec)
                    .with_epochs(Some(Epoch::EarlySteam), None)
                    .with_weight(weight, weight)
                    .with_length(length)
            },
        )
    }

    /// Generate a wagon with the given id, available from the first epoch.
    ///
    /// Capacity may be zero; full weight is at least 1.
    pub fn arb_wagon(id: String) -> impl Strategy<Value = VehicleType> {
        (
            proptest::sample::select(CARGO_IDS.to_vec()),
            0u32..60u32,
            1u32..40u32,
            arb_length(),
            proptest::option::of(5u32..50u32),
        )
            .prop_map(move |(cargo, capacity, weight_full, length, bonus)| {
                let wagon = VehicleType::wagon(id.clone(), id.clone(), Load::new(cargo, capacity))
                    .with_epochs(Some(Epoch::EarlySteam), None)
                    .with_weight(weight_full / 2, weight_full)
                    .with_length(length);
                match bonus {
                    Some(percent) => wagon.with_bonus_income(percent),
                    None => wagon,
                }
            })
    }

    /// Generate a catalog with 1 to `max_engines` engines and 1 to
    /// `max_wagons` wagons, all available from the first epoch.
    pub fn arb_catalog(max_engines: usize, max_wagons: usize) -> impl Strategy<Value = Catalog> {
        let engines = (1..=max_engines.max(1)).prop_flat_map(|count| {
            (0..count)
                .map(|i| arb_engine(format!("engine_{i}")))
                .collect::<Vec<_>>()
        });
        let wagons = (1..=max_wagons.max(1)).prop_flat_map(|count| {
            (0..count)
                .map(|i| arb_wagon(format!("wagon_{i}")))
                .collect::<Vec<_>>()
        });

        (engines, wagons).prop_map(|(engines, wagons)| {
            let mut catalog = Catalog::new();
            for id in CARGO_IDS {
                catalog.register_cargo_type(CargoType::new(id, id));
            }
            for vehicle in engines.into_iter().chain(wagons) {
                catalog.register_vehicle(vehicle);
            }
            catalog
        })
    }

    /// Generate valid search options.
    pub fn arb_options() -> impl Strategy<Value = Options> {
        (
            arb_epoch(),
            1usize..=3usize,
            proptest::sample::select(vec![
                MaximumWeight::Full,
                MaximumWeight::Empty,
                MaximumWeight::Infinite,
            ]),
            proptest::sample::select(vec![
                MaximumLength::Short,
                MaximumLength::Long,
                MaximumLength::Infinite,
            ]),
            1u32..12u32,
            0u32..6u32,
        )
            .prop_map(
                |(epoch, maximum_engines, maximum_weight, maximum_length, short, extra)| {
                    let mut options = Options::new(epoch);
                    options.maximum_engines = maximum_engines;
                    options.maximum_weight = maximum_weight;
                    options.maximum_length = maximum_length;
                    options.station_length_short = short;
                    options.station_length_long = short + extra;
                    options
                },
            )
    }
}
