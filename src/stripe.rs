//! Payment provider bridge.
//!
//! The provider is the source of truth for payment status; local rows are
//! reconciled from it via the status poll and the webhook, never assumed
//! consistent with it.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Seam between the payment service and the hosted provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open an intent for `amount_minor` (cents).
    async fn create_intent(
        &self,
        amount_minor: i64,
        metadata: IntentMetadata,
    ) -> anyhow::Result<ProviderIntent>;

    async fn retrieve_intent(&self, intent_id: &str) -> anyhow::Result<ProviderIntent>;
}

#[derive(Debug, Clone)]
pub struct IntentMetadata {
    pub user_id: Uuid,
    pub reservation_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
    /// Minor currency units.
    pub amount: i64,
    pub payment_method_details: Option<PaymentMethodDetails>,
}

impl ProviderIntent {
    pub fn card(&self) -> Option<&CardDetails> {
        self.payment_method_details
            .as_ref()
            .and_then(|details| details.card.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodDetails {
    pub card: Option<CardDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardDetails {
    pub brand: Option<String>,
    pub last4: Option<String>,
}

/// Thin client for the Stripe payment-intents REST API.
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_base_url(secret_key, STRIPE_API_BASE)
    }

    pub fn with_base_url(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            secret_key: secret_key.into(),
            base_url: base_url.into(),
        })
    }

    async fn parse_intent(&self, response: reqwest::Response) -> anyhow::Result<ProviderIntent> {
        if response.status().is_success() {
            return response
                .json::<ProviderIntent>()
                .await
                .context("Failed to parse payment intent");
        }

        let status = response.status();
        let message = response
            .json::<StripeErrorEnvelope>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| format!("provider returned {status}"));
        anyhow::bail!("{message}")
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_intent(
        &self,
        amount_minor: i64,
        metadata: IntentMetadata,
    ) -> anyhow::Result<ProviderIntent> {
        let mut form = vec![
            ("amount".to_string(), amount_minor.to_string()),
            ("currency".to_string(), "usd".to_string()),
            (
                "metadata[integration_check]".to_string(),
                "parkease_payment".to_string(),
            ),
            (
                "metadata[user_id]".to_string(),
                metadata.user_id.to_string(),
            ),
        ];
        if let Some(reservation_id) = metadata.reservation_id {
            form.push((
                "metadata[reservation_id]".to_string(),
                reservation_id.to_string(),
            ));
        }

        let response = self
            .client
            .post(format!("{}/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .context("Failed to reach payment provider")?;

        self.parse_intent(response).await
    }

    async fn retrieve_intent(&self, intent_id: &str) -> anyhow::Result<ProviderIntent> {
        let response = self
            .client
            .get(format!("{}/payment_intents/{intent_id}", self.base_url))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .context("Failed to reach payment provider")?;

        self.parse_intent(response).await
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}
