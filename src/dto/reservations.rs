use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{ParkingSpot, Reservation};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub parking_spot_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration: i32,
    pub vehicle_type: String,
    pub license_plate: String,
    /// Ignored: the total is always recomputed from the spot's rate.
    pub total_price: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateReservationRequest {
    pub parking_spot_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub duration: Option<i32>,
    pub vehicle_type: Option<String>,
    pub license_plate: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationWithSpot {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub parking_spot: Option<ParkingSpot>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationList {
    pub items: Vec<ReservationWithSpot>,
}
