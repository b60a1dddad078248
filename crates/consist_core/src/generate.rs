//! Candidate train generation.
//!
//! Every `(engine, wagon)` pair produces a small family of candidates: up
//! to `maximum_engines` engines at the head, optionally followed by a
//! suggested tail, filled with the wagon up to each of three targets.
//! Whichever target binds is decided later by filtering and ranking, so
//! all three are produced.
//!
//! Generation order is fixed: engines outermost, then wagons, then engine
//! count, then tail, then target (weight, short station, long station).
//! Later stages rely on this order for their tie-breaking.

use std::sync::Arc;

use crate::data::VehicleType;
use crate::options::Options;
use crate::suggestions::ResolvedSuggestions;
use crate::train::Train;

/// What a candidate was filled up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillTarget {
    /// As many wagons as the engines haul within their recommended weight.
    RecommendedWeight,
    /// As many wagons as fit the short station.
    ShortStation,
    /// As many wagons as fit the long station.
    LongStation,
}

impl FillTarget {
    /// Every target in generation order.
    pub const ALL: [FillTarget; 3] = [
        FillTarget::RecommendedWeight,
        FillTarget::ShortStation,
        FillTarget::LongStation,
    ];
}

/// Engine counts to try for `engine`.
///
/// Unique engines can only be owned once, so they never run doubled.
fn engine_counts(engine: &VehicleType, options: &Options) -> std::ops::RangeInclusive<usize> {
    let maximum = if engine.is_unique() {
        1
    } else {
        options.maximum_engines
    };
    1..=maximum
}

/// Candidates for a single engine and wagon pair.
///
/// `tails` are the resolved suggestions for `wagon`; the empty tail is
/// always tried first.
#[must_use]
pub fn generate_variations(
    engine: &Arc<VehicleType>,
    wagon: &Arc<VehicleType>,
    tails: &[Vec<Arc<VehicleType>>],
    options: &Options,
) -> Vec<Train> {
    let empty_tail: &[Arc<VehicleType>] = &[];
    let all_tails: Vec<&[Arc<VehicleType>]> = std::iter::once(empty_tail)
        .chain(tails.iter().map(Vec::as_slice))
        .collect();

    let mut trains = Vec::new();

    for count in engine_counts(engine, options) {
        let head = Train::repeat(engine, count);

        for tail in &all_tails {
            let base = head.add_wagons(tail.iter().cloned());

            for target in FillTarget::ALL {
                trains.push(match target {
                    FillTarget::RecommendedWeight => base.add_wagons_to_recommended_weight(wagon),
                    FillTarget::ShortStation => {
                        base.add_wagons_to_length(wagon, options.short_station())
                    }
                    FillTarget::LongStation => {
                        base.add_wagons_to_length(wagon, options.long_station())
                    }
                });
            }
        }
    }

    trains
}

/// Candidates for every engine and wagon pair, engines outermost.
#[must_use]
pub fn generate_trains(
    engines: &[Arc<VehicleType>],
    wagons: &[Arc<VehicleType>],
    suggestions: &ResolvedSuggestions,
    options: &Options,
) -> Vec<Train> {
    let mut trains = Vec::new();

    for engine in engines {
        for wagon in wagons {
            let tails = suggestions
                .get(&wagon.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let variations = generate_variations(engine, wagon, tails, options);

            tracing::trace!(
                engine = %engine.name,
                wagon = %wagon.name,
                count = variations.len(),
                "Generated variations"
            );

            trains.extend(variations);
        }
    }

    trains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EngineSpec, Epoch, Load};
    use crate::math::tiles;

    fn engine() -> Arc<VehicleType> {
        Arc::new(
            VehicleType::engine("e1", "Engine", EngineSpec::new(1000, 60))
                .with_epochs(Some(Epoch::EarlySteam), None)
                .with_weight(40, 40)
                .with_length(tiles(1)),
        )
    }

    fn unique_engine() -> Arc<VehicleType> {
        Arc::new(
            VehicleType::engine("quest", "Quest engine", EngineSpec::new(1000, 60))
                .with_weight(40, 40)
                .with_length(tiles(1)),
        )
    }

    fn wagon(id: &str, cargo: &str) -> Arc<VehicleType> {
        Arc::new(
            VehicleType::wagon(id, id, Load::new(cargo, 20))
                .with_epochs(Some(Epoch::EarlySteam), None)
                .with_weight(4, 10)
                .with_length(tiles(1)),
        )
    }

    #[test]
    fn test_three_targets_per_head() {
        let options = Options::new(Epoch::Steam);
        let trains = generate_variations(&engine(), &wagon("w1", "coal"), &[], &options);

        // Two engine counts, one (empty) tail, three targets.
        assert_eq!(trains.len(), 6);

        assert_eq!(trains[0].engine_count(), 1);
        assert_eq!(trains[0].wagon_count(), 66);
        assert_eq!(trains[1].length(), tiles(6));
        assert_eq!(trains[2].length(), tiles(8));

        assert_eq!(trains[3].engine_count(), 2);
        assert_eq!(trains[4].wagon_count(), 4);
        assert_eq!(trains[5].wagon_count(), 6);
    }

    #[test]
    fn test_maximum_engines() {
        let mut options = Options::new(Epoch::Steam);
        options.maximum_engines = 3;
        let trains = generate_variations(&engine(), &wagon("w1", "coal"), &[], &options);
        assert_eq!(trains.len(), 9);
        assert_eq!(trains[8].engine_count(), 3);
    }

    #[test]
    fn test_unique_engine_is_never_doubled() {
        let options = Options::new(Epoch::Steam);
        let trains = generate_variations(&unique_engine(), &wagon("w1", "coal"), &[], &options);
        assert_eq!(trains.len(), 3);
        assert!(trains.iter().all(|t| t.engine_count() == 1));
    }

    #[test]
    fn test_tails_follow_the_empty_tail() {
        let coach = wagon("coach", "passengers");
        let first = wagon("first", "passengers");
        let tails = vec![vec![Arc::clone(&first)]];
        let mut options = Options::new(Epoch::Steam);
        options.maximum_engines = 1;

        let trains = generate_variations(&engine(), &coach, &tails, &options);
        assert_eq!(trains.len(), 6);
        assert!(trains[..3].iter().all(|t| t.wagons().all(|w| w.id == coach.id)));

        // The filler wagons go between the engines and the tail.
        let with_tail = &trains[4];
        assert_eq!(with_tail.length(), tiles(6));
        let last = with_tail.members().last().map(|m| m.id.clone());
        assert_eq!(last, Some(first.id.clone()));
        assert!(with_tail.members()[0].is_engine());
        assert_eq!(with_tail.members()[1].id, coach.id);
    }

    #[test]
    fn test_engine_counts_repeat_the_targets() {
        let options = Options::new(Epoch::Steam);
        let trains = generate_variations(&engine(), &wagon("w1", "coal"), &[], &options);

        for (single, double) in trains[..3].iter().zip(&trains[3..]) {
            assert_eq!(single.engine_count(), 1);
            assert_eq!(double.engine_count(), 2);
        }
        // Weight fill first, then the short and long stations.
        assert!(!trains[0].is_over_recommended_weight_full());
        assert_eq!(trains[1].length(), options.short_station());
        assert_eq!(trains[2].length(), options.long_station());
    }

    #[test]
    fn test_generate_trains_order() {
        let first_engine = engine();
        let second_engine = Arc::new(
            VehicleType::engine("e2", "Other engine", EngineSpec::new(500, 50))
                .with_epochs(Some(Epoch::EarlySteam), None)
                .with_weight(30, 30)
                .with_length(tiles(1)),
        );
        let wagons = vec![wagon("w1", "coal"), wagon("w2", "oil")];
        let options = Options::new(Epoch::Steam);

        let trains = generate_trains(
            &[Arc::clone(&first_engine), Arc::clone(&second_engine)],
            &wagons,
            &ResolvedSuggestions::new(),
            &options,
        );

        assert_eq!(trains.len(), 24);
        assert!(trains[..12]
            .iter()
            .all(|t| t.engines().all(|e| e.id == first_engine.id)));
        assert!(trains[..6].iter().all(|t| t.wagons().all(|w| w.id == wagons[0].id)));
        assert!(trains[6..12].iter().all(|t| t.wagons().all(|w| w.id == wagons[1].id)));
        assert!(trains[12..]
            .iter()
            .all(|t| t.engines().all(|e| e.id == second_engine.id)));
    }

    #[test]
    fn test_generate_trains_uses_resolved_suggestions() {
        let coach = wagon("coach", "passengers");
        let mut suggestions = ResolvedSuggestions::new();
        suggestions.insert(
            coach.id.clone(),
            vec![vec![wagon("first", "passengers")], vec![wagon("mail", "passengers")]],
        );
        let options = Options::new(Epoch::Steam);

        let trains = generate_trains(&[engine()], &[coach], &suggestions, &options);
        assert_eq!(trains.len(), 2 * 3 * 3);
    }

    #[test]
    fn test_no_engines_or_wagons() {
        let options = Options::new(Epoch::Steam);
        let suggestions = ResolvedSuggestions::new();
        assert!(generate_trains(&[], &[wagon("w1", "coal")], &suggestions, &options).is_empty());
        assert!(generate_trains(&[engine()], &[], &suggestions, &options).is_empty());
    }
}
