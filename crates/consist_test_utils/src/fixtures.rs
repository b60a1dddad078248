//! Test fixtures and helpers.
//!
//! Pre-built vehicles and catalogs for consistent testing. The sample
//! catalog is modelled on the stock Mashinky roster closely enough to
//! exercise suggestions, bonus income and epoch gating.

use std::sync::Arc;

use consist_core::catalog::Catalog;
use consist_core::data::{CargoType, EngineSpec, Epoch, Load, Payment, TokenType, VehicleType};
use consist_core::math::Fixed;
use consist_core::options::Options;

/// Create a fixed-point length from whole tiles.
#[must_use]
pub fn fixed(n: i32) -> Fixed {
    Fixed::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: Search code never uses floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> Fixed {
    Fixed::from_num(n)
}

/// An engine available from the first epoch on, one tile long.
#[must_use]
pub fn engine(id: &str, power: u32, max_speed: u32, weight: u32) -> VehicleType {
    VehicleType::engine(id, id, EngineSpec::new(power, max_speed))
        .with_epochs(Some(Epoch::EarlySteam), None)
        .with_weight(weight, weight)
        .with_length(fixed(1))
}

/// A wagon available from the first epoch on.
#[must_use]
pub fn wagon(id: &str, cargo: &str, capacity: u32, weight_full: u32, length: Fixed) -> VehicleType {
    VehicleType::wagon(id, id, Load::new(cargo, capacity))
        .with_epochs(Some(Epoch::EarlySteam), None)
        .with_weight(weight_full / 2, weight_full)
        .with_length(length)
}

/// Engine with power 1000, top speed 60 and weight 40.
///
/// Its recommended weight is `floor(42.1 * 1000 / 60) = 701`.
#[must_use]
pub fn reference_engine() -> Arc<VehicleType> {
    Arc::new(engine("reference_engine", 1000, 60, 40))
}

/// Coal wagon of capacity 20, full weight 10, one tile long.
#[must_use]
pub fn reference_wagon() -> Arc<VehicleType> {
    Arc::new(wagon("reference_wagon", "coal", 20, 10, fixed(1)))
}

/// Catalog holding only the reference engine and wagon.
#[must_use]
pub fn reference_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register_cargo_type(CargoType::new("coal", "Coal"));
    catalog.register_vehicle((*reference_engine()).clone());
    catalog.register_vehicle((*reference_wagon()).clone());
    catalog
}

/// A small but varied catalog.
///
/// - Engines: two steam engines, one diesel engine (from the fourth
///   epoch), one unique quest engine.
/// - Wagons: coal, timber, passenger cars with their suggested companions
///   ("1st Class", "Dining car" with bonus income, "Pwg PR-14" carrying
///   mail), and a depot-extension oil tanker.
#[must_use]
pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    catalog.register_token_type(TokenType::new("money", "Money"));
    catalog.register_token_type(TokenType::new("timber", "Timber"));
    catalog.register_token_type(TokenType::new("coal", "Coal"));
    catalog.register_token_type(TokenType::new("diesel", "Diesel"));

    catalog.register_cargo_type(CargoType::new("coal", "Coal").with_color([40, 40, 40]));
    catalog.register_cargo_type(CargoType::new("timber", "Timber").with_color([120, 80, 40]));
    catalog.register_cargo_type(
        CargoType::new("passengers", "Passengers").with_color([200, 160, 60]),
    );
    catalog.register_cargo_type(CargoType::new("mail", "Mail").with_color([200, 200, 220]));
    catalog.register_cargo_type(CargoType::new("oil", "Oil").with_color([10, 10, 10]));

    catalog.register_vehicle(
        VehicleType::engine("tiny_tim", "Tiny Tim", EngineSpec::new(600, 40))
            .with_epochs(Some(Epoch::EarlySteam), Some(Epoch::Steam))
            .with_weight(30, 30)
            .with_length(fixed(1))
            .with_cost(vec![Payment::new("money", 1200), Payment::new("timber", 20)])
            .with_sell(vec![Payment::new("money", 600)])
            .with_fuel(vec![Payment::new("timber", 2)]),
    );
    catalog.register_vehicle(
        VehicleType::engine("class_8", "Class 8", EngineSpec::new(1000, 60))
            .with_epochs(Some(Epoch::Steam), Some(Epoch::EarlyDiesel))
            .with_weight(40, 40)
            .with_length(fixed(1))
            .with_cost(vec![Payment::new("money", 3000)])
            .with_sell(vec![Payment::new("money", 1500)])
            .with_fuel(vec![Payment::new("coal", 4)]),
    );
    catalog.register_vehicle(
        VehicleType::engine("v200", "V 200", EngineSpec::new(2200, 120))
            .with_epochs(Some(Epoch::Diesel), None)
            .with_weight(80, 80)
            .with_length(fixed_f(1.5))
            .with_cost(vec![Payment::new("money", 12000)])
            .with_fuel(vec![Payment::new("diesel", 6)]),
    );
    catalog.register_vehicle(
        VehicleType::engine("golden", "Golden Arrow", EngineSpec::new(1400, 80))
            .with_weight(50, 50)
            .with_length(fixed(1))
            .with_bonus_income(10),
    );

    catalog.register_vehicle(
        VehicleType::wagon("coal_wagon", "Coal wagon", Load::new("coal", 20))
            .with_epochs(Some(Epoch::EarlySteam), None)
            .with_weight(4, 10)
            .with_length(fixed(1))
            .with_cost(vec![Payment::new("money", 200)]),
    );
    catalog.register_vehicle(
        VehicleType::wagon("timber_wagon", "Timber wagon", Load::new("timber", 15))
            .with_epochs(Some(Epoch::EarlySteam), Some(Epoch::Diesel))
            .with_weight(5, 12)
            .with_length(fixed_f(1.5))
            .with_cost(vec![Payment::new("money", 250)]),
    );
    catalog.register_vehicle(
        VehicleType::wagon("coach", "Coach car", Load::new("passengers", 30))
            .with_epochs(Some(Epoch::EarlySteam), None)
            .with_weight(12, 15)
            .with_length(fixed(1))
            .with_cost(vec![Payment::new("money", 400)]),
    );
    catalog.register_vehicle(
        VehicleType::wagon("first_class", "1st Class", Load::new("passengers", 20))
            .with_epochs(Some(Epoch::Steam), None)
            .with_weight(14, 16)
            .with_length(fixed(1))
            .with_cost(vec![Payment::new("money", 600)])
            .with_bonus_income(15),
    );
    catalog.register_vehicle(
        VehicleType::wagon("dining_car", "Dining car", Load::new("passengers", 0))
            .with_epochs(Some(Epoch::Steam), None)
            .with_weight(14, 14)
            .with_length(fixed(1))
            .with_cost(vec![Payment::new("money", 800)])
            .with_bonus_income(25),
    );
    catalog.register_vehicle(
        VehicleType::wagon("pwg_pr14", "Pwg PR-14", Load::new("mail", 10))
            .with_epochs(Some(Epoch::EarlySteam), None)
            .with_weight(8, 10)
            .with_length(fixed(1))
            .with_cost(vec![Payment::new("money", 300)]),
    );
    catalog.register_vehicle(
        VehicleType::wagon("oil_tanker", "Oil tanker", Load::new("oil", 25))
            .with_epochs(Some(Epoch::EarlySteam), None)
            .with_weight(6, 14)
            .with_length(fixed(1))
            .with_depot_upgrade(),
    );

    catalog
}

/// Options for the steam epoch with every other setting at its default.
#[must_use]
pub fn steam_options() -> Options {
    Options::new(Epoch::Steam)
}
