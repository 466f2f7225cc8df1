//! Read-only reference data: vehicles, customers and rental locations.
//!
//! Built once at startup and shared through [`crate::state::AppState`]. The
//! booking core only reads it.

use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::location::Location;
use crate::models::user::User;
use crate::models::vehicle::Vehicle;

const SEED_CATALOG: &str = include_str!("../seed/catalog.json");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    locations: Vec<Location>,
}

impl Catalog {
    pub fn new(vehicles: Vec<Vehicle>, users: Vec<User>, locations: Vec<Location>) -> Self {
        Self {
            vehicles,
            users,
            locations,
        }
    }

    /// The storefront's bundled demo data.
    pub fn seeded() -> Result<Self, AppError> {
        Self::from_json(SEED_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw)
            .map_err(|err| AppError::Internal(format!("invalid catalog: {err}")))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            AppError::Internal(format!("failed to read catalog {}: {err}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn list_vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle_by_vin(&self, vin: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.vin == vin)
    }

    pub fn user_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn location_by_id(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    pub fn active_locations(&self) -> Vec<Location> {
        self.locations
            .iter()
            .filter(|location| location.is_active)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn seed_catalog_parses() {
        let catalog = Catalog::seeded().unwrap();

        assert_eq!(catalog.list_vehicles().len(), 13);
        assert_eq!(catalog.active_locations().len(), 6);
        assert!(catalog.user_by_id("user-1").is_some());
    }

    #[test]
    fn lookups_by_key() {
        let catalog = Catalog::seeded().unwrap();

        let camry = catalog.vehicle_by_vin("1HGBH41JXMN109186").unwrap();
        assert_eq!(camry.car_model, "Camry");
        assert_eq!(camry.price_per_day, 60.0);

        assert_eq!(catalog.location_by_id("loc-2").unwrap().name, "Airport Terminal");
        assert!(catalog.vehicle_by_vin("NOPE").is_none());
        assert!(catalog.user_by_id("user-404").is_none());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let catalog = Catalog::from_json(r#"{"vehicles": []}"#).unwrap();
        assert!(catalog.active_locations().is_empty());
    }
}
