//! Train composition: an ordered, immutable sequence of vehicles.
//!
//! A [`Train`] never changes after construction. Every transform (adding
//! wagons up to a weight or length target) returns a new train, so trains
//! can be shared freely between stages of a search and between threads.
//!
//! Engines always form the head of the train: wagons are inserted after
//! the last engine.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::data::{
    CargoTypeId, EngineSpec, Epoch, Payment, TokenTypeId, Track, VehicleId, VehicleType,
};
use crate::error::{Result, TrainError};
use crate::math::{div_round_half_even, ratio, whole_units, whole_units_int, Fixed};

/// Most wagons a single fill adds, whatever the wagon's length or weight.
pub const MAX_FILL_WAGONS: usize = 1_000;

/// Token totals, keyed by token type.
pub type Payments = BTreeMap<TokenTypeId, u64>;

/// An ordered sequence of vehicles with derived properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Train {
    members: Vec<Arc<VehicleType>>,
}

impl Train {
    /// Create a train from members in order.
    #[must_use]
    pub fn new(members: Vec<Arc<VehicleType>>) -> Self {
        Self { members }
    }

    /// A train of `count` copies of one vehicle.
    #[must_use]
    pub fn repeat(vehicle: &Arc<VehicleType>, count: usize) -> Self {
        Self::new(vec![Arc::clone(vehicle); count])
    }

    /// All members in order.
    #[must_use]
    pub fn members(&self) -> &[Arc<VehicleType>] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the train has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Engine members in order.
    pub fn engines(&self) -> impl Iterator<Item = &Arc<VehicleType>> + '_ {
        self.members.iter().filter(|member| member.is_engine())
    }

    /// Wagon members in order.
    pub fn wagons(&self) -> impl Iterator<Item = &Arc<VehicleType>> + '_ {
        self.members.iter().filter(|member| member.is_wagon())
    }

    /// Number of engines.
    #[must_use]
    pub fn engine_count(&self) -> usize {
        self.engines().count()
    }

    /// Number of wagons.
    #[must_use]
    pub fn wagon_count(&self) -> usize {
        self.wagons().count()
    }

    /// Multiset of member identifiers.
    #[must_use]
    pub fn member_counts(&self) -> BTreeMap<&VehicleId, usize> {
        count_ids(self.members.iter())
    }

    // Vehicle properties

    /// Latest first epoch among members, `None` if every member is unique.
    #[must_use]
    pub fn epoch_start(&self) -> Option<Epoch> {
        self.members.iter().filter_map(|m| m.epoch_start).max()
    }

    /// Earliest last epoch among members, `None` if no member has one.
    #[must_use]
    pub fn epoch_end(&self) -> Option<Epoch> {
        self.members.iter().filter_map(|m| m.epoch_end).min()
    }

    /// Most demanding track requirement among members.
    #[must_use]
    pub fn track(&self) -> Track {
        self.members
            .iter()
            .map(|m| m.track)
            .max()
            .unwrap_or_default()
    }

    /// Total weight when empty.
    #[must_use]
    pub fn weight_empty(&self) -> u32 {
        self.members
            .iter()
            .fold(0u32, |total, m| total.saturating_add(m.weight_empty))
    }

    /// Total weight when fully loaded.
    #[must_use]
    pub fn weight_full(&self) -> u32 {
        self.members
            .iter()
            .fold(0u32, |total, m| total.saturating_add(m.weight_full))
    }

    /// Total length in tiles.
    #[must_use]
    pub fn length(&self) -> Fixed {
        self.members
            .iter()
            .fold(Fixed::ZERO, |total, m| total.saturating_add(m.length))
    }

    /// Check if any member needs a depot extension.
    #[must_use]
    pub fn depot_upgrade(&self) -> bool {
        self.members.iter().any(|m| m.depot_upgrade)
    }

    // Cargo properties

    /// Distinct cargo types carried by wagons, in first-seen order.
    #[must_use]
    pub fn cargo_types(&self) -> Vec<&CargoTypeId> {
        let mut seen: Vec<&CargoTypeId> = Vec::new();
        for cargo_type in self.wagons().filter_map(|w| w.cargo_type()) {
            if !seen.contains(&cargo_type) {
                seen.push(cargo_type);
            }
        }
        seen
    }

    /// The single cargo type carried by the wagons.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::MultipleCargoTypes`] if the wagons carry more
    /// than one cargo type.
    pub fn cargo_type(&self) -> Result<Option<&CargoTypeId>> {
        let cargo_types = self.cargo_types();
        if cargo_types.len() > 1 {
            return Err(TrainError::MultipleCargoTypes {
                cargo_types: cargo_types.into_iter().cloned().collect(),
            });
        }
        Ok(cargo_types.first().copied())
    }

    /// Total wagon capacity.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::MultipleCargoTypes`] if the wagons carry more
    /// than one cargo type.
    pub fn capacity(&self) -> Result<u32> {
        self.cargo_type()?;
        Ok(self
            .wagons()
            .fold(0u32, |total, w| total.saturating_add(w.capacity())))
    }

    /// Wagon capacity per cargo type.
    #[must_use]
    pub fn cargo(&self) -> BTreeMap<CargoTypeId, u32> {
        let mut cargo = BTreeMap::new();
        for wagon in self.wagons() {
            if let Some(load) = wagon.load() {
                let total = cargo.entry(load.cargo_type.clone()).or_insert(0u32);
                *total = total.saturating_add(load.capacity);
            }
        }
        cargo
    }

    // Payments

    /// Total purchase cost per token.
    #[must_use]
    pub fn cost(&self) -> Payments {
        sum_payments(self.members.iter().flat_map(|m| &m.cost))
    }

    /// Total sale value per token.
    #[must_use]
    pub fn sell(&self) -> Payments {
        sum_payments(self.members.iter().flat_map(|m| &m.sell))
    }

    /// Total running cost per token.
    #[must_use]
    pub fn fuel(&self) -> Payments {
        sum_payments(self.members.iter().flat_map(|m| &m.fuel))
    }

    // Engine properties

    /// Total engine power.
    #[must_use]
    pub fn power(&self) -> u32 {
        self.engine_specs()
            .fold(0u32, |total, spec| total.saturating_add(spec.power))
    }

    /// Top speed of the slowest engine, `None` without engines.
    #[must_use]
    pub fn max_speed(&self) -> Option<u32> {
        self.engine_specs().map(|spec| spec.max_speed).min()
    }

    /// Sum of every engine's recommended weight, saturating at `u32::MAX`.
    #[must_use]
    pub fn recommended_weight(&self) -> u32 {
        self.members
            .iter()
            .fold(0u32, |total, m| total.saturating_add(m.recommended_weight()))
    }

    fn engine_specs(&self) -> impl Iterator<Item = &EngineSpec> + '_ {
        self.members.iter().filter_map(|m| m.engine_spec())
    }

    // Bonus income

    /// Check if any member grants bonus income.
    #[must_use]
    pub fn has_bonus(&self) -> bool {
        self.members.iter().any(|m| m.bonus_income.is_some())
    }

    /// Members that grant bonus income.
    pub fn bonus_incomes(&self) -> impl Iterator<Item = &Arc<VehicleType>> + '_ {
        self.members.iter().filter(|m| m.bonus_income.is_some())
    }

    /// Effective bonus percentage: the largest single bonus on the train.
    ///
    /// Whether the game takes the largest bonus or adds them up is not
    /// known; the largest is used.
    #[must_use]
    pub fn bonus_percent(&self) -> u32 {
        self.members
            .iter()
            .filter_map(|m| m.bonus_income)
            .max()
            .unwrap_or(0)
    }

    /// Capacity multiplier from bonus income, `1 + bonus_percent / 100`.
    #[must_use]
    pub fn bonus_multiplier(&self) -> Fixed {
        Fixed::ONE + Fixed::from_num(self.bonus_percent()) / Fixed::from_num(100)
    }

    /// Effective capacity per cargo type with the bonus applied.
    ///
    /// Each amount is `round(capacity * (100 + bonus) / 100)`, ties to even.
    #[must_use]
    pub fn bonus_cargo(&self) -> BTreeMap<CargoTypeId, u64> {
        let percent = 100 + u64::from(self.bonus_percent());
        self.cargo()
            .into_iter()
            .map(|(cargo_type, amount)| {
                (cargo_type, div_round_half_even(u64::from(amount) * percent, 100))
            })
            .collect()
    }

    /// Total effective capacity with the bonus applied.
    #[must_use]
    pub fn bonus_capacity(&self) -> u64 {
        self.bonus_cargo().values().sum()
    }

    // Transforms

    /// A new train with `additional` inserted directly after the last engine.
    ///
    /// Without engines the wagons go to the front.
    #[must_use]
    pub fn add_wagons<I>(&self, additional: I) -> Self
    where
        I: IntoIterator<Item = Arc<VehicleType>>,
    {
        let index = self
            .members
            .iter()
            .rposition(|m| m.is_engine())
            .map_or(0, |last_engine| last_engine + 1);

        let mut members = Vec::with_capacity(self.members.len());
        members.extend(self.members[..index].iter().cloned());
        members.extend(additional);
        members.extend(self.members[index..].iter().cloned());
        Self::new(members)
    }

    /// How many `wagon`s fit under the recommended weight when full, at
    /// most [`MAX_FILL_WAGONS`].
    #[must_use]
    pub fn wagons_to_recommended_weight(&self, wagon: &VehicleType) -> usize {
        let headroom = i64::from(self.recommended_weight()) - i64::from(self.weight_full());
        whole_units_int(headroom, wagon.weight_full).min(MAX_FILL_WAGONS)
    }

    /// How many `wagon`s fit within `target_length`, at most
    /// [`MAX_FILL_WAGONS`].
    #[must_use]
    pub fn wagons_to_length(&self, wagon: &VehicleType, target_length: Fixed) -> usize {
        whole_units(target_length.saturating_sub(self.length()), wagon.length)
            .min(MAX_FILL_WAGONS)
    }

    /// A new train filled with `wagon` up to the recommended weight.
    #[must_use]
    pub fn add_wagons_to_recommended_weight(&self, wagon: &Arc<VehicleType>) -> Self {
        let count = self.wagons_to_recommended_weight(wagon);
        self.add_wagons(std::iter::repeat(wagon).take(count).cloned())
    }

    /// A new train filled with `wagon` up to `target_length`.
    #[must_use]
    pub fn add_wagons_to_length(&self, wagon: &Arc<VehicleType>, target_length: Fixed) -> Self {
        let count = self.wagons_to_length(wagon, target_length);
        self.add_wagons(std::iter::repeat(wagon).take(count).cloned())
    }

    // Limits

    /// Check if the loaded train is heavier than its engines recommend.
    #[must_use]
    pub fn is_over_recommended_weight_full(&self) -> bool {
        self.weight_full() > self.recommended_weight()
    }

    /// Check if the empty train is heavier than its engines recommend.
    #[must_use]
    pub fn is_over_recommended_weight_empty(&self) -> bool {
        self.weight_empty() > self.recommended_weight()
    }

    /// Loaded weight as a fraction of the recommended weight.
    ///
    /// `None` when the recommended weight is zero.
    #[must_use]
    pub fn weight_usage(&self) -> Option<Fixed> {
        ratio(
            Fixed::saturating_from_num(self.weight_full()),
            Fixed::saturating_from_num(self.recommended_weight()),
        )
    }

    /// Length as a fraction of a station length.
    #[must_use]
    pub fn length_usage(&self, station_length: Fixed) -> Option<Fixed> {
        ratio(self.length(), station_length)
    }
}

impl AsRef<Train> for Train {
    fn as_ref(&self) -> &Train {
        self
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut groups: Vec<(&Arc<VehicleType>, usize)> = Vec::new();
        for member in &self.members {
            match groups.iter_mut().find(|(vehicle, _)| vehicle.id == member.id) {
                Some((_, count)) => *count += 1,
                None => groups.push((member, 1)),
            }
        }

        f.write_str("Train[")?;
        for (i, (vehicle, count)) in groups.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{vehicle} x{count}")?;
        }
        f.write_str("]")
    }
}

fn count_ids<'a>(
    members: impl Iterator<Item = &'a Arc<VehicleType>>,
) -> BTreeMap<&'a VehicleId, usize> {
    let mut counts = BTreeMap::new();
    for member in members {
        *counts.entry(&member.id).or_insert(0) += 1;
    }
    counts
}

fn sum_payments<'a>(payments: impl Iterator<Item = &'a Payment>) -> Payments {
    let mut total = Payments::new();
    for payment in payments {
        *total.entry(payment.token_type.clone()).or_insert(0) += u64::from(payment.amount);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Load;

    fn engine() -> Arc<VehicleType> {
        Arc::new(
            VehicleType::engine("e1", "Engine", EngineSpec::new(1000, 60))
                .with_epochs(Some(Epoch::Steam), Some(Epoch::Diesel))
                .with_weight(40, 40)
                .with_length(Fixed::from_num(1))
                .with_cost(vec![Payment::new("money", 1000), Payment::new("timber", 20)])
                .with_fuel(vec![Payment::new("coal", 5)]),
        )
    }

    fn wagon() -> Arc<VehicleType> {
        Arc::new(
            VehicleType::wagon("w1", "Wagon", Load::new("coal", 20))
                .with_epochs(Some(Epoch::EarlySteam), None)
                .with_weight(4, 10)
                .with_length(Fixed::from_num(1))
                .with_cost(vec![Payment::new("money", 100)]),
        )
    }

    fn wagon_of(id: &str, cargo: &str, capacity: u32) -> Arc<VehicleType> {
        Arc::new(
            VehicleType::wagon(id, id, Load::new(cargo, capacity))
                .with_weight(5, 10)
                .with_length(Fixed::from_num(1)),
        )
    }

    #[test]
    fn test_fill_to_recommended_weight() {
        let train = Train::repeat(&engine(), 1).add_wagons_to_recommended_weight(&wagon());

        // floor((701 - 40) / 10) = 66
        assert_eq!(train.wagon_count(), 66);
        assert_eq!(train.capacity().unwrap(), 1320);
        assert!(!train.is_over_recommended_weight_full());
    }

    #[test]
    fn test_fill_to_length() {
        let train = Train::repeat(&engine(), 2).add_wagons_to_length(&wagon(), Fixed::from_num(6));
        assert_eq!(train.engine_count(), 2);
        assert_eq!(train.wagon_count(), 4);
        assert_eq!(train.length(), Fixed::from_num(6));
    }

    #[test]
    fn test_fill_clamps_when_already_over() {
        let head = Train::repeat(&engine(), 3);
        let train = head.add_wagons_to_length(&wagon(), Fixed::from_num(2));
        assert_eq!(train, head);

        let heavy = Arc::new(
            VehicleType::wagon("heavy", "Heavy", Load::new("coal", 1)).with_weight(900, 900),
        );
        let train = Train::repeat(&engine(), 1)
            .add_wagons(vec![heavy])
            .add_wagons_to_recommended_weight(&wagon());
        assert_eq!(train.wagon_count(), 1);
    }

    #[test]
    fn test_add_wagons_inserts_after_engines() {
        let tail = wagon_of("tail", "coal", 0);
        let train = Train::repeat(&engine(), 2)
            .add_wagons(vec![Arc::clone(&tail)])
            .add_wagons(vec![wagon(), wagon()]);

        let ids: Vec<&str> = train.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e1", "w1", "w1", "tail"]);
    }

    #[test]
    fn test_add_wagons_without_engines() {
        let train = Train::new(vec![wagon()]).add_wagons(vec![wagon_of("x", "coal", 1)]);
        let ids: Vec<&str> = train.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "w1"]);
    }

    #[test]
    fn test_transforms_do_not_mutate() {
        let head = Train::repeat(&engine(), 1);
        let _ = head.add_wagons_to_recommended_weight(&wagon());
        assert_eq!(head.len(), 1);
    }

    #[test]
    fn test_multiple_cargo_types_is_an_error() {
        let train = Train::repeat(&engine(), 1)
            .add_wagons(vec![wagon_of("a", "coal", 10), wagon_of("b", "mail", 5)]);

        let err = train.capacity().unwrap_err();
        match err {
            TrainError::MultipleCargoTypes { cargo_types } => {
                let ids: Vec<&str> = cargo_types.iter().map(CargoTypeId::as_str).collect();
                assert_eq!(ids, vec!["coal", "mail"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Per-cargo views stay available.
        assert_eq!(train.cargo().len(), 2);
        assert_eq!(train.bonus_capacity(), 15);
    }

    #[test]
    fn test_engine_only_train_has_no_cargo() {
        let train = Train::repeat(&engine(), 2);
        assert_eq!(train.cargo_type().unwrap(), None);
        assert_eq!(train.capacity().unwrap(), 0);
        assert_eq!(train.recommended_weight(), 1402);
        assert_eq!(train.power(), 2000);
        assert_eq!(train.max_speed(), Some(60));
    }

    #[test]
    fn test_zero_capacity_wagon() {
        let diner = wagon_of("diner", "passengers", 0);
        let train = Train::new(vec![diner]);
        assert_eq!(train.capacity().unwrap(), 0);
    }

    #[test]
    fn test_payments_are_summed_per_token() {
        let train = Train::repeat(&engine(), 2).add_wagons(vec![wagon(), wagon(), wagon()]);

        let cost = train.cost();
        assert_eq!(cost[&TokenTypeId::new("money")], 2300);
        assert_eq!(cost[&TokenTypeId::new("timber")], 40);
        assert_eq!(train.fuel()[&TokenTypeId::new("coal")], 10);
        assert!(train.sell().is_empty());
    }

    #[test]
    fn test_bonus_uses_largest_bonus() {
        let diner = Arc::new(
            VehicleType::wagon("diner", "Diner", Load::new("coal", 0)).with_bonus_income(15),
        );
        let bar = Arc::new(
            VehicleType::wagon("bar", "Bar", Load::new("coal", 0)).with_bonus_income(10),
        );
        let train = Train::repeat(&engine(), 1).add_wagons(vec![wagon(), wagon(), diner, bar]);

        assert!(train.has_bonus());
        assert_eq!(train.bonus_incomes().count(), 2);
        assert_eq!(train.bonus_percent(), 15);
        assert_eq!(train.bonus_multiplier(), Fixed::from_num(115) / Fixed::from_num(100));
        // round(1.15 * 40) = 46
        assert_eq!(train.bonus_capacity(), 46);
    }

    #[test]
    fn test_bonus_rounds_half_to_even() {
        let car = Arc::new(
            VehicleType::wagon("car", "Car", Load::new("passengers", 5)).with_bonus_income(50),
        );
        // 1.5 * 5 = 7.5 rounds to 8, 1.5 * 10 = 15
        assert_eq!(Train::new(vec![Arc::clone(&car)]).bonus_capacity(), 8);
        assert_eq!(Train::new(vec![Arc::clone(&car), car]).bonus_capacity(), 15);

        let car = Arc::new(
            VehicleType::wagon("car", "Car", Load::new("passengers", 1)).with_bonus_income(50),
        );
        // 1.5 rounds to 2, 4.5 rounds to 4
        assert_eq!(Train::new(vec![Arc::clone(&car)]).bonus_capacity(), 2);
        assert_eq!(Train::repeat(&car, 3).bonus_capacity(), 4);
    }

    #[test]
    fn test_no_bonus_matches_capacity() {
        let train = Train::repeat(&engine(), 1).add_wagons_to_recommended_weight(&wagon());
        assert!(!train.has_bonus());
        assert_eq!(train.bonus_capacity(), u64::from(train.capacity().unwrap()));
    }

    #[test]
    fn test_epoch_window_and_track() {
        let electric = Arc::new(
            VehicleType::wagon("el", "Electric car", Load::new("coal", 1))
                .with_epochs(Some(Epoch::EarlyDiesel), Some(Epoch::LateElectric))
                .with_track(Track::Electric),
        );
        let train = Train::repeat(&engine(), 1).add_wagons(vec![wagon(), electric]);
        assert_eq!(train.epoch_start(), Some(Epoch::EarlyDiesel));
        assert_eq!(train.epoch_end(), Some(Epoch::Diesel));
        assert_eq!(train.track(), Track::Electric);
    }

    #[test]
    fn test_usage_ratios() {
        let train = Train::repeat(&engine(), 1).add_wagons(vec![wagon(), wagon()]);
        assert_eq!(train.length_usage(Fixed::from_num(6)), Some(Fixed::from_num(0.5)));
        assert!(train.weight_usage().unwrap() < Fixed::from_num(1));
        assert_eq!(Train::new(vec![wagon()]).weight_usage(), None);
    }

    #[test]
    fn test_member_counts() {
        let train = Train::repeat(&engine(), 2).add_wagons(vec![wagon(), wagon(), wagon()]);
        let counts = train.member_counts();
        assert_eq!(counts[&VehicleId::new("e1")], 2);
        assert_eq!(counts[&VehicleId::new("w1")], 3);
    }

    #[test]
    fn test_huge_engines_saturate() {
        let huge = Arc::new(
            VehicleType::engine("huge", "Huge", EngineSpec::new(u32::MAX, 1))
                .with_weight(u32::MAX, u32::MAX)
                .with_length(Fixed::from_num(1)),
        );
        let train = Train::repeat(&huge, 2);

        assert_eq!(train.recommended_weight(), u32::MAX);
        assert_eq!(train.weight_full(), u32::MAX);
        assert_eq!(train.power(), u32::MAX);
        assert_eq!(train.weight_usage(), Some(Fixed::ONE));
    }

    #[test]
    fn test_fill_is_bounded() {
        let strong = Arc::new(
            VehicleType::engine("strong", "Strong", EngineSpec::new(1_000_000, 1))
                .with_weight(1, 1)
                .with_length(Fixed::from_num(1)),
        );
        let feather = Arc::new(
            VehicleType::wagon("feather", "Feather", Load::new("coal", 1))
                .with_weight(1, 1)
                .with_length(Fixed::DELTA),
        );
        let head = Train::repeat(&strong, 1);

        assert_eq!(head.wagons_to_recommended_weight(&feather), MAX_FILL_WAGONS);
        assert_eq!(head.wagons_to_length(&feather, Fixed::from_num(8)), MAX_FILL_WAGONS);
        assert_eq!(
            head.add_wagons_to_recommended_weight(&feather).wagon_count(),
            MAX_FILL_WAGONS
        );
    }

    #[test]
    fn test_display() {
        let train = Train::repeat(&engine(), 2).add_wagons(vec![wagon(), wagon()]);
        assert_eq!(train.to_string(), "Train[Engine x2, Wagon x2]");
    }
}
