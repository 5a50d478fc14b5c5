use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ParkingSpot;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateParkingSpotRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub price: Decimal,
    pub available_spots: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateParkingSpotRequest {
    /// Must match the path id when present.
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub price: Option<Decimal>,
    pub available_spots: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
}

/// Search body: `date` and `radius` are accepted for the client's benefit but
/// not interpreted server-side (no geolocation math).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchRequest {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub radius: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParkingSpotList {
    pub items: Vec<ParkingSpot>,
}
