//! Vehicle catalog: the reference data a search draws from.
//!
//! Searches only ever read from a catalog through [`VehicleCatalog`], so
//! any store of reference data can back a search. [`Catalog`] is the
//! in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::data::{CargoType, CargoTypeId, Epoch, TokenType, TokenTypeId, VehicleId, VehicleType};

/// Which kind of record a catalog query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Engines.
    Engine,
    /// Wagons.
    Wagon,
    /// Cargo types carried by matching wagons.
    CargoType,
}

/// A single record returned by [`VehicleCatalog::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    /// An engine or wagon.
    Vehicle(Arc<VehicleType>),
    /// A cargo type.
    CargoType(CargoType),
}

/// Filters for a catalog search.
///
/// `ids` and `names` of `None` apply no filter; `Some` of an empty list
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Record kind to return.
    pub kind: EntityKind,
    /// Progression tier the vehicles must be available in.
    pub epoch: Epoch,
    /// Only return records with one of these identifiers.
    pub ids: Option<Vec<String>>,
    /// Only return records with one of these names.
    pub names: Option<Vec<String>>,
    /// Include vehicles that need a depot extension.
    pub depot_upgrade: bool,
    /// Include unique vehicles (quest rewards) outside progression.
    pub quest_reward: bool,
}

impl CatalogQuery {
    /// Create a query with no id/name filter, excluding depot and quest vehicles.
    #[must_use]
    pub const fn new(kind: EntityKind, epoch: Epoch) -> Self {
        Self {
            kind,
            epoch,
            ids: None,
            names: None,
            depot_upgrade: false,
            quest_reward: false,
        }
    }

    /// Restrict to the given identifiers.
    #[must_use]
    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Restrict to the given names.
    #[must_use]
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    /// Set the depot extension and quest reward toggles.
    #[must_use]
    pub const fn with_toggles(mut self, depot_upgrade: bool, quest_reward: bool) -> Self {
        self.depot_upgrade = depot_upgrade;
        self.quest_reward = quest_reward;
        self
    }

    /// Copy of this query for another record kind.
    #[must_use]
    pub fn for_kind(&self, kind: EntityKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    fn matches_id(&self, id: &str) -> bool {
        self.ids
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|i| i == id))
    }

    fn matches_name(&self, name: &str) -> bool {
        self.names
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == name))
    }

    /// Check the progression and toggle rules against a vehicle.
    fn admits(&self, vehicle: &VehicleType) -> bool {
        if vehicle.depot_upgrade && !self.depot_upgrade {
            return false;
        }
        if vehicle.is_unique() {
            return self.quest_reward;
        }
        vehicle.is_available_in(self.epoch)
    }

    fn matches_vehicle(&self, vehicle: &VehicleType) -> bool {
        self.admits(vehicle)
            && self.matches_id(vehicle.id.as_str())
            && self.matches_name(&vehicle.name)
    }
}

/// Source of reference data for searches.
pub trait VehicleCatalog {
    /// Return matching records in catalog order.
    fn search(&self, query: &CatalogQuery) -> Vec<CatalogEntry>;

    /// Matching engines.
    fn engines(&self, query: &CatalogQuery) -> Vec<Arc<VehicleType>> {
        vehicles_of(self.search(&query.for_kind(EntityKind::Engine)))
    }

    /// Matching wagons.
    fn wagons(&self, query: &CatalogQuery) -> Vec<Arc<VehicleType>> {
        vehicles_of(self.search(&query.for_kind(EntityKind::Wagon)))
    }

    /// Matching cargo types.
    fn cargo_types(&self, query: &CatalogQuery) -> Vec<CargoType> {
        self.search(&query.for_kind(EntityKind::CargoType))
            .into_iter()
            .filter_map(|entry| match entry {
                CatalogEntry::CargoType(cargo) => Some(cargo),
                CatalogEntry::Vehicle(_) => None,
            })
            .collect()
    }
}

fn vehicles_of(entries: Vec<CatalogEntry>) -> Vec<Arc<VehicleType>> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            CatalogEntry::Vehicle(vehicle) => Some(vehicle),
            CatalogEntry::CargoType(_) => None,
        })
        .collect()
}

/// In-memory catalog of reference data.
///
/// Records keep their registration order, which is the order searches
/// return them in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    vehicles: Vec<Arc<VehicleType>>,
    vehicle_index: HashMap<VehicleId, usize>,
    cargo_types: Vec<CargoType>,
    token_types: Vec<TokenType>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vehicle, replacing any vehicle with the same identifier.
    pub fn register_vehicle(&mut self, vehicle: VehicleType) {
        let vehicle = Arc::new(vehicle);
        if let Some(&index) = self.vehicle_index.get(&vehicle.id) {
            self.vehicles[index] = vehicle;
        } else {
            self.vehicle_index
                .insert(vehicle.id.clone(), self.vehicles.len());
            self.vehicles.push(vehicle);
        }
    }

    /// Register a cargo type, replacing any with the same identifier.
    pub fn register_cargo_type(&mut self, cargo: CargoType) {
        if let Some(existing) = self.cargo_types.iter_mut().find(|c| c.id == cargo.id) {
            *existing = cargo;
        } else {
            self.cargo_types.push(cargo);
        }
    }

    /// Register a token type, replacing any with the same identifier.
    pub fn register_token_type(&mut self, token: TokenType) {
        if let Some(existing) = self.token_types.iter_mut().find(|t| t.id == token.id) {
            *existing = token;
        } else {
            self.token_types.push(token);
        }
    }

    /// Get a vehicle by identifier.
    #[must_use]
    pub fn get_vehicle(&self, id: &VehicleId) -> Option<&Arc<VehicleType>> {
        self.vehicle_index.get(id).map(|&index| &self.vehicles[index])
    }

    /// Get a cargo type by identifier.
    #[must_use]
    pub fn get_cargo_type(&self, id: &CargoTypeId) -> Option<&CargoType> {
        self.cargo_types.iter().find(|c| &c.id == id)
    }

    /// Get a token type by identifier.
    #[must_use]
    pub fn get_token_type(&self, id: &TokenTypeId) -> Option<&TokenType> {
        self.token_types.iter().find(|t| &t.id == id)
    }

    /// All registered vehicles, including road vehicles.
    pub fn all_vehicles(&self) -> impl Iterator<Item = &Arc<VehicleType>> {
        self.vehicles.iter()
    }

    /// All registered cargo types.
    pub fn all_cargo_types(&self) -> impl Iterator<Item = &CargoType> {
        self.cargo_types.iter()
    }

    /// All registered token types.
    pub fn all_token_types(&self) -> impl Iterator<Item = &TokenType> {
        self.token_types.iter()
    }

    fn search_vehicles(
        &self,
        query: &CatalogQuery,
        keep: fn(&VehicleType) -> bool,
    ) -> Vec<CatalogEntry> {
        self.vehicles
            .iter()
            .filter(|vehicle| keep(vehicle) && query.matches_vehicle(vehicle))
            .map(|vehicle| CatalogEntry::Vehicle(Arc::clone(vehicle)))
            .collect()
    }

    fn search_cargo_types(&self, query: &CatalogQuery) -> Vec<CatalogEntry> {
        // Cargo types have no progression of their own; they are available
        // when some admitted wagon carries them.
        let carried: Vec<&CargoTypeId> = self
            .vehicles
            .iter()
            .filter(|vehicle| vehicle.is_wagon() && query.admits(vehicle))
            .filter_map(|vehicle| vehicle.cargo_type())
            .collect();

        self.cargo_types
            .iter()
            .filter(|cargo| carried.contains(&&cargo.id))
            .filter(|cargo| query.matches_id(cargo.id.as_str()) && query.matches_name(&cargo.name))
            .cloned()
            .map(CatalogEntry::CargoType)
            .collect()
    }
}

impl VehicleCatalog for Catalog {
    fn search(&self, query: &CatalogQuery) -> Vec<CatalogEntry> {
        match query.kind {
            EntityKind::Engine => self.search_vehicles(query, VehicleType::is_engine),
            EntityKind::Wagon => self.search_vehicles(query, VehicleType::is_wagon),
            EntityKind::CargoType => self.search_cargo_types(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EngineSpec, Load};

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register_cargo_type(CargoType::new("coal", "Coal"));
        catalog.register_cargo_type(CargoType::new("logs", "Logs"));
        catalog.register_cargo_type(CargoType::new("steel", "Steel"));
        catalog.register_token_type(TokenType::new("money", "Money"));

        catalog.register_vehicle(
            VehicleType::engine("steam", "Steam engine", EngineSpec::new(800, 50))
                .with_epochs(Some(Epoch::EarlySteam), Some(Epoch::Steam)),
        );
        catalog.register_vehicle(
            VehicleType::engine("diesel", "Diesel engine", EngineSpec::new(1500, 90))
                .with_epochs(Some(Epoch::EarlyDiesel), None),
        );
        catalog.register_vehicle(VehicleType::engine(
            "quest",
            "Quest engine",
            EngineSpec::new(1200, 70),
        ));
        catalog.register_vehicle(
            VehicleType::wagon("coal_wagon", "Coal wagon", Load::new("coal", 20))
                .with_epochs(Some(Epoch::EarlySteam), None),
        );
        catalog.register_vehicle(
            VehicleType::wagon("log_wagon", "Log wagon", Load::new("logs", 15))
                .with_epochs(Some(Epoch::EarlySteam), None)
                .with_depot_upgrade(),
        );
        catalog.register_vehicle(
            VehicleType::wagon("steel_wagon", "Steel wagon", Load::new("steel", 30))
                .with_epochs(Some(Epoch::Diesel), None),
        );
        catalog.register_vehicle(
            VehicleType::road_vehicle("truck", "Coal truck", Load::new("coal", 5))
                .with_epochs(Some(Epoch::EarlySteam), None),
        );
        catalog
    }

    fn ids(vehicles: &[Arc<VehicleType>]) -> Vec<&str> {
        vehicles.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn test_search_filters_by_epoch() {
        let catalog = create_test_catalog();
        let query = CatalogQuery::new(EntityKind::Engine, Epoch::Steam);
        assert_eq!(ids(&catalog.engines(&query)), vec!["steam"]);

        let query = CatalogQuery::new(EntityKind::Engine, Epoch::Diesel);
        assert_eq!(ids(&catalog.engines(&query)), vec!["diesel"]);
    }

    #[test]
    fn test_search_quest_reward_toggle() {
        let catalog = create_test_catalog();
        let query = CatalogQuery::new(EntityKind::Engine, Epoch::Steam).with_toggles(false, true);
        assert_eq!(ids(&catalog.engines(&query)), vec!["steam", "quest"]);
    }

    #[test]
    fn test_search_depot_upgrade_toggle() {
        let catalog = create_test_catalog();
        let query = CatalogQuery::new(EntityKind::Wagon, Epoch::Steam);
        assert_eq!(ids(&catalog.wagons(&query)), vec!["coal_wagon"]);

        let query = query.with_toggles(true, false);
        assert_eq!(ids(&catalog.wagons(&query)), vec!["coal_wagon", "log_wagon"]);
    }

    #[test]
    fn test_search_excludes_road_vehicles() {
        let catalog = create_test_catalog();
        let query =
            CatalogQuery::new(EntityKind::Wagon, Epoch::LateElectric).with_toggles(true, true);
        assert!(catalog.wagons(&query).iter().all(|v| v.is_wagon()));
    }

    #[test]
    fn test_search_by_ids_and_names() {
        let catalog = create_test_catalog();
        let query = CatalogQuery::new(EntityKind::Wagon, Epoch::Diesel)
            .with_ids(vec!["steel_wagon".to_string(), "missing".to_string()]);
        assert_eq!(ids(&catalog.wagons(&query)), vec!["steel_wagon"]);

        let query = CatalogQuery::new(EntityKind::Wagon, Epoch::Diesel)
            .with_names(vec!["Coal wagon".to_string()]);
        assert_eq!(ids(&catalog.wagons(&query)), vec!["coal_wagon"]);

        let query = CatalogQuery::new(EntityKind::Wagon, Epoch::Diesel).with_ids(Vec::new());
        assert!(catalog.wagons(&query).is_empty());
    }

    #[test]
    fn test_cargo_types_follow_available_wagons() {
        let catalog = create_test_catalog();
        let query = CatalogQuery::new(EntityKind::CargoType, Epoch::Steam);
        let names: Vec<String> = catalog
            .cargo_types(&query)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Coal"]);

        let query =
            CatalogQuery::new(EntityKind::CargoType, Epoch::Diesel).with_toggles(true, false);
        assert_eq!(catalog.cargo_types(&query).len(), 3);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut catalog = create_test_catalog();
        catalog.register_vehicle(
            VehicleType::wagon("coal_wagon", "Big coal wagon", Load::new("coal", 40))
                .with_epochs(Some(Epoch::EarlySteam), None),
        );
        let wagon = catalog
            .get_vehicle(&VehicleId::new("coal_wagon"))
            .expect("wagon should be registered");
        assert_eq!(wagon.capacity(), 40);
        assert_eq!(catalog.all_vehicles().count(), 7);
    }

    #[test]
    fn test_lookup_reference_records() {
        let catalog = create_test_catalog();
        assert!(catalog.get_cargo_type(&CargoTypeId::new("coal")).is_some());
        assert!(catalog.get_token_type(&TokenTypeId::new("money")).is_some());
        assert!(catalog.get_token_type(&TokenTypeId::new("gold")).is_none());
        assert_eq!(catalog.all_cargo_types().count(), 3);
        assert_eq!(catalog.all_token_types().count(), 1);
    }
}
