use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Payment, PaymentMethod};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentIntentRequest {
    pub amount: Decimal,
    pub reservation_id: Option<Uuid>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentIntentResponse {
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
    pub payment_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatusResponse {
    /// Raw provider status string.
    pub status: String,
    pub amount: Decimal,
    pub payment: Option<Payment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentList {
    pub items: Vec<Payment>,
}

/// Provider webhook envelope, as delivered. Signature verification is not
/// performed; the body is trusted after JSON parsing alone.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookData {
    pub object: WebhookObject,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookObject {
    pub id: String,
    pub payment_method_details: Option<WebhookPaymentMethodDetails>,
}

impl WebhookObject {
    pub fn card(&self) -> Option<&WebhookCard> {
        self.payment_method_details
            .as_ref()
            .and_then(|details| details.card.as_ref())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookPaymentMethodDetails {
    pub card: Option<WebhookCard>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookCard {
    pub brand: Option<String>,
    pub last4: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
}
