use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vin: String,
    pub brand: String,
    pub car_model: String,
    pub car_type: String,
    pub year_of_manufacture: u16,
    pub color: String,
    pub fuel_type: String,
    pub transmission: String,
    pub seats: u8,
    pub price_per_day: f64,
    pub current_location_id: String,
    pub mileage: String,
    pub features: Vec<String>,
    pub description: String,
}

/// A catalog vehicle decorated with its availability for a queried range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleAvailability {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub is_available: bool,
}
