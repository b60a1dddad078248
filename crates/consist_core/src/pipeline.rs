//! Pipeline stages applied to generated candidates.
//!
//! Every stage takes its input by value and returns a new list, preserving
//! the relative order of the trains it keeps. Only [`rank`] reorders, and
//! its sort is stable.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::data::VehicleId;
use crate::error::Result;
use crate::options::Options;
use crate::train::Train;

/// Identity of a train for deduplication: its member multiset.
fn dedup_key(train: &Train) -> Vec<(VehicleId, usize)> {
    train
        .member_counts()
        .into_iter()
        .map(|(id, count)| (id.clone(), count))
        .collect()
}

/// Drop trains with the same members as an earlier train.
///
/// The first train seen for each member multiset wins. Applying this
/// twice is the same as applying it once.
#[must_use]
pub fn deduplicate<T: AsRef<Train>>(trains: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    trains
        .into_iter()
        .filter(|item| seen.insert(dedup_key(item.as_ref())))
        .collect()
}

/// Drop trains that run more engines than a similar train for no gain.
///
/// Trains are similar when they are built from the same set of vehicles,
/// whatever the counts. A train is dropped when a similar train with fewer
/// engines carries at least as much. Trains with the same engine count
/// never drop each other, and dissimilar trains are never compared.
///
/// The result depends only on which trains are present, so it is the same
/// whether or not duplicates were removed first.
///
/// # Errors
///
/// Propagates [`crate::error::TrainError::MultipleCargoTypes`] from a
/// train's capacity.
pub fn discard_dominated<T: AsRef<Train>>(trains: Vec<T>) -> Result<Vec<T>> {
    let capacities = trains
        .iter()
        .map(|item| item.as_ref().capacity())
        .collect::<Result<Vec<u32>>>()?;
    let engine_counts: Vec<usize> = trains
        .iter()
        .map(|item| item.as_ref().engine_count())
        .collect();

    let keep: Vec<bool> = {
        let mut similar: BTreeMap<BTreeSet<&VehicleId>, Vec<usize>> = BTreeMap::new();
        for (index, item) in trains.iter().enumerate() {
            similar.entry(member_set(item.as_ref())).or_default().push(index);
        }

        let mut keep = vec![true; trains.len()];
        for indices in similar.values() {
            for &index in indices {
                keep[index] = !indices.iter().any(|&other| {
                    engine_counts[index] > engine_counts[other]
                        && capacities[index] <= capacities[other]
                });
            }
        }
        keep
    };

    Ok(trains
        .into_iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect())
}

/// Distinct vehicles of a train, ignoring how many of each.
fn member_set(train: &Train) -> BTreeSet<&VehicleId> {
    train.members().iter().map(|member| &member.id).collect()
}

/// Keep the trains that pass the weight and length rules.
#[must_use]
pub fn filter(trains: Vec<Train>, options: &Options) -> Vec<Train> {
    trains
        .into_iter()
        .filter(|train| options.should_include(train))
        .collect()
}

/// Sort by bonus capacity, best first. Ties keep their input order.
#[must_use]
pub fn rank(mut trains: Vec<Train>) -> Vec<Train> {
    trains.sort_by_key(|train| std::cmp::Reverse(train.bonus_capacity()));
    trains
}
