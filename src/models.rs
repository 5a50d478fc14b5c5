use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Where a parking spot came from. Spots materialized from the static
/// catalog or the external API carry no database id unless imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpotSource {
    Local,
    StaticCatalog,
    ExternalApi,
}

impl SpotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotSource::Local => "local",
            SpotSource::StaticCatalog => "static_catalog",
            SpotSource::ExternalApi => "external_api",
        }
    }
}

impl From<&str> for SpotSource {
    fn from(s: &str) -> Self {
        match s {
            "static_catalog" => SpotSource::StaticCatalog,
            "external_api" => SpotSource::ExternalApi,
            _ => SpotSource::Local,
        }
    }
}

/// Canonical spot shape shared by every source.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParkingSpot {
    /// Database id; absent for spots materialized on the fly.
    pub id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub price: Decimal,
    pub available_spots: i32,
    /// Miles from the searched location. Never computed server-side today.
    pub distance: Option<f64>,
    pub rating: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source: SpotSource,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Failed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Failed => "failed",
        }
    }
}

impl From<&str> for ReservationStatus {
    fn from(s: &str) -> Self {
        match s {
            "confirmed" => ReservationStatus::Confirmed,
            "cancelled" => ReservationStatus::Cancelled,
            "failed" => ReservationStatus::Failed,
            _ => ReservationStatus::Pending,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub parking_spot_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration: i32,
    pub vehicle_type: String,
    pub license_plate: String,
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub payment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Wallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Wallet => "wallet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded | PaymentStatus::Failed)
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "succeeded" => PaymentStatus::Succeeded,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub stripe_payment_intent_id: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub last_four: Option<String>,
    pub card_brand: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub parking_spot_id: Uuid,
    pub created_at: DateTime<Utc>,
}
