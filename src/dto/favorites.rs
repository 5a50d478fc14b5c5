use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ParkingSpot;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub parking_spot_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteSpotList {
    pub items: Vec<ParkingSpot>,
}
