//! Vehicle data structures for engines, wagons and road vehicles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cargo_data::{CargoTypeId, Payment};
use super::epoch::{Epoch, Track};
use crate::math::{fixed_serde, Fixed};

super::string_id! {
    /// Unique identifier for vehicle types.
    VehicleId
}

/// Numerator of the recommended weight factor (42.1 expressed in tenths).
const RECOMMENDED_WEIGHT_FACTOR_TENTHS: u64 = 421;

/// What a vehicle carries and how much of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Load {
    /// Cargo type carried.
    pub cargo_type: CargoTypeId,

    /// Units of cargo carried when full. May be zero (e.g. dining cars).
    pub capacity: u32,
}

impl Load {
    /// Create a new load.
    #[must_use]
    pub fn new(cargo_type: impl Into<String>, capacity: u32) -> Self {
        Self {
            cargo_type: CargoTypeId::new(cargo_type),
            capacity,
        }
    }
}

/// Traction statistics for an engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineSpec {
    /// Engine power.
    pub power: u32,

    /// Top speed.
    pub max_speed: u32,

    /// Top speed when running in reverse, if the engine can.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed_reverse: Option<u32>,

    /// Cargo carried by the engine itself, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<Load>,
}

impl EngineSpec {
    /// Create engine stats with no reverse speed and no load.
    #[must_use]
    pub const fn new(power: u32, max_speed: u32) -> Self {
        Self {
            power,
            max_speed,
            max_speed_reverse: None,
            load: None,
        }
    }

    /// Heaviest train this engine hauls efficiently.
    ///
    /// `floor(42.1 * power / max_speed)`, evaluated exactly in integers.
    /// The 42.1 factor was fitted against observed in-game values and has
    /// not been confirmed against the game itself.
    #[must_use]
    pub fn recommended_weight(&self) -> u32 {
        let numerator = RECOMMENDED_WEIGHT_FACTOR_TENTHS * u64::from(self.power);
        let denominator = 10 * u64::from(self.max_speed);
        numerator
            .checked_div(denominator)
            .map_or(0, |weight| u32::try_from(weight).unwrap_or(u32::MAX))
    }
}

/// Discriminates the kinds of vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    /// A locomotive.
    Engine(EngineSpec),
    /// A rail car hauled by engines.
    Wagon(Load),
    /// A road vehicle. Never part of a train.
    RoadVehicle(Load),
}

/// Data-driven vehicle definition.
///
/// Common fields live on the struct; kind-specific fields live in
/// [`VehicleKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleType {
    /// Unique identifier.
    pub id: VehicleId,

    /// Display name. Suggestion tables refer to wagons by this name.
    pub name: String,

    /// First epoch the vehicle is available in.
    ///
    /// `None` together with `epoch_end` marks a unique (quest reward)
    /// vehicle outside normal progression.
    #[serde(default)]
    pub epoch_start: Option<Epoch>,

    /// Last epoch the vehicle is available in, inclusive.
    #[serde(default)]
    pub epoch_end: Option<Epoch>,

    /// Track required.
    #[serde(default)]
    pub track: Track,

    /// Weight when empty.
    pub weight_empty: u32,

    /// Weight when fully loaded.
    pub weight_full: u32,

    /// Length in track tiles (fixed-point).
    #[serde(with = "fixed_serde")]
    pub length: Fixed,

    /// Whether buying this vehicle needs a depot extension.
    #[serde(default)]
    pub depot_upgrade: bool,

    /// Purchase cost.
    #[serde(default)]
    pub cost: Vec<Payment>,

    /// Sale value.
    #[serde(default)]
    pub sell: Vec<Payment>,

    /// Running cost.
    #[serde(default)]
    pub fuel: Vec<Payment>,

    /// Bonus income percentage applied to the whole train's cargo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_income: Option<u32>,

    /// Kind-specific data.
    pub kind: VehicleKind,
}

impl VehicleType {
    /// Create a vehicle of the given kind with zero weight and length.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: VehicleKind) -> Self {
        Self {
            id: VehicleId::new(id),
            name: name.into(),
            epoch_start: None,
            epoch_end: None,
            track: Track::Standard,
            weight_empty: 0,
            weight_full: 0,
            length: Fixed::ZERO,
            depot_upgrade: false,
            cost: Vec::new(),
            sell: Vec::new(),
            fuel: Vec::new(),
            bonus_income: None,
            kind,
        }
    }

    /// Create an engine.
    #[must_use]
    pub fn engine(id: impl Into<String>, name: impl Into<String>, spec: EngineSpec) -> Self {
        Self::new(id, name, VehicleKind::Engine(spec))
    }

    /// Create a wagon.
    #[must_use]
    pub fn wagon(id: impl Into<String>, name: impl Into<String>, load: Load) -> Self {
        Self::new(id, name, VehicleKind::Wagon(load))
    }

    /// Create a road vehicle.
    #[must_use]
    pub fn road_vehicle(id: impl Into<String>, name: impl Into<String>, load: Load) -> Self {
        Self::new(id, name, VehicleKind::RoadVehicle(load))
    }

    /// Set the progression window.
    #[must_use]
    pub fn with_epochs(mut self, start: Option<Epoch>, end: Option<Epoch>) -> Self {
        self.epoch_start = start;
        self.epoch_end = end;
        self
    }

    /// Set empty and full weights.
    #[must_use]
    pub fn with_weight(mut self, empty: u32, full: u32) -> Self {
        self.weight_empty = empty;
        self.weight_full = full;
        self
    }

    /// Set the length in tiles.
    #[must_use]
    pub fn with_length(mut self, length: Fixed) -> Self {
        self.length = length;
        self
    }

    /// Set the track requirement.
    #[must_use]
    pub fn with_track(mut self, track: Track) -> Self {
        self.track = track;
        self
    }

    /// Mark as requiring a depot extension.
    #[must_use]
    pub fn with_depot_upgrade(mut self) -> Self {
        self.depot_upgrade = true;
        self
    }

    /// Set the purchase cost.
    #[must_use]
    pub fn with_cost(mut self, cost: Vec<Payment>) -> Self {
        self.cost = cost;
        self
    }

    /// Set the sale value.
    #[must_use]
    pub fn with_sell(mut self, sell: Vec<Payment>) -> Self {
        self.sell = sell;
        self
    }

    /// Set the running cost.
    #[must_use]
    pub fn with_fuel(mut self, fuel: Vec<Payment>) -> Self {
        self.fuel = fuel;
        self
    }

    /// Set the bonus income percentage.
    #[must_use]
    pub fn with_bonus_income(mut self, percent: u32) -> Self {
        self.bonus_income = Some(percent);
        self
    }

    /// Engine stats, if this is an engine.
    #[must_use]
    pub fn engine_spec(&self) -> Option<&EngineSpec> {
        match &self.kind {
            VehicleKind::Engine(spec) => Some(spec),
            VehicleKind::Wagon(_) | VehicleKind::RoadVehicle(_) => None,
        }
    }

    /// Check if this vehicle is an engine.
    #[must_use]
    pub fn is_engine(&self) -> bool {
        matches!(self.kind, VehicleKind::Engine(_))
    }

    /// Check if this vehicle is a wagon.
    #[must_use]
    pub fn is_wagon(&self) -> bool {
        matches!(self.kind, VehicleKind::Wagon(_))
    }

    /// Check if this vehicle is a road vehicle.
    #[must_use]
    pub fn is_road_vehicle(&self) -> bool {
        matches!(self.kind, VehicleKind::RoadVehicle(_))
    }

    /// What the vehicle carries, if anything.
    #[must_use]
    pub fn load(&self) -> Option<&Load> {
        match &self.kind {
            VehicleKind::Engine(spec) => spec.load.as_ref(),
            VehicleKind::Wagon(load) | VehicleKind::RoadVehicle(load) => Some(load),
        }
    }

    /// Cargo type carried, if any.
    #[must_use]
    pub fn cargo_type(&self) -> Option<&CargoTypeId> {
        self.load().map(|load| &load.cargo_type)
    }

    /// Cargo capacity, zero when the vehicle carries nothing.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.load().map_or(0, |load| load.capacity)
    }

    /// Recommended haul weight, zero for anything but an engine.
    #[must_use]
    pub fn recommended_weight(&self) -> u32 {
        self.engine_spec().map_or(0, EngineSpec::recommended_weight)
    }

    /// Unique vehicles sit outside normal progression (quest rewards).
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.epoch_start.is_none() && self.epoch_end.is_none()
    }

    /// Check if the vehicle can be bought in the given epoch.
    ///
    /// Unique vehicles are never available through progression.
    #[must_use]
    pub fn is_available_in(&self, epoch: Epoch) -> bool {
        match self.epoch_start {
            Some(start) => start <= epoch && self.epoch_end.map_or(true, |end| epoch <= end),
            None => false,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
