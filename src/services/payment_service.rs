use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{
        CreatePaymentIntentRequest, PaymentIntentResponse, PaymentList, PaymentStatusResponse,
        WebhookAck, WebhookEvent,
    },
    entity::reservations::{ActiveModel as ReservationActive, Entity as Reservations},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Payment, PaymentMethod, PaymentStatus},
    response::{ApiResponse, Meta},
    services::reservation_service,
    state::AppState,
    stripe::IntentMetadata,
};

/// Opens a provider intent and records the matching local `pending` payment.
/// The two writes are not atomic; the confirm/webhook path reconciles any
/// divergence, with the provider as the source of truth.
pub async fn create_payment_intent(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentIntentRequest,
) -> AppResult<ApiResponse<PaymentIntentResponse>> {
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Amount is required".into()));
    }
    let method = payload.payment_method.unwrap_or(PaymentMethod::CreditCard);

    let reservation = match payload.reservation_id {
        Some(reservation_id) => {
            let reservation = Reservations::find_by_id(reservation_id)
                .one(&state.orm)
                .await?;
            let reservation = match reservation {
                Some(r) => r,
                None => return Err(AppError::NotFound),
            };
            if reservation.user_id != user.user_id {
                return Err(AppError::Forbidden);
            }
            Some(reservation)
        }
        None => None,
    };

    let amount_minor = (payload.amount * dec!(100))
        .round()
        .to_i64()
        .ok_or_else(|| AppError::BadRequest("Invalid amount".into()))?;

    let intent = state
        .payments
        .create_intent(
            amount_minor,
            IntentMetadata {
                user_id: user.user_id,
                reservation_id: payload.reservation_id,
            },
        )
        .await
        .map_err(|err| AppError::Payment(err.to_string()))?;

    let payment: Payment = sqlx::query_as(
        r#"
        INSERT INTO payments (id, user_id, amount, payment_method, payment_status, stripe_payment_intent_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.amount)
    .bind(method)
    .bind(PaymentStatus::Pending)
    .bind(&intent.id)
    .fetch_one(&state.pool)
    .await?;

    if let Some(reservation) = reservation {
        let mut active: ReservationActive = reservation.into();
        active.payment_id = Set(Some(payment.id));
        active.update(&state.orm).await?;
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_intent_create",
        Some("payments"),
        Some(serde_json::json!({ "payment_id": payment.id, "intent_id": intent.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment intent created",
        PaymentIntentResponse {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
            payment_id: payment.id,
        },
        Some(Meta::empty()),
    ))
}

/// Polls the provider and reconciles the local record with what it reports.
pub async fn payment_status(
    state: &AppState,
    intent_id: &str,
) -> AppResult<ApiResponse<PaymentStatusResponse>> {
    let intent = state
        .payments
        .retrieve_intent(intent_id)
        .await
        .map_err(|err| AppError::Payment(err.to_string()))?;

    let payment = match outcome_from_provider(&intent.status) {
        Some(outcome) => {
            let card = intent
                .card()
                .map(|card| (card.brand.clone(), card.last4.clone()));
            reconcile_intent(state, &intent.id, outcome, card).await?
        }
        None => fetch_by_intent(state, &intent.id).await?,
    };

    let amount = Decimal::from(intent.amount) / dec!(100);
    Ok(ApiResponse::success(
        "Payment status",
        PaymentStatusResponse {
            status: intent.status,
            amount,
            payment,
        },
        Some(Meta::empty()),
    ))
}

/// Applies provider events. Replays of a terminal event are no-ops.
pub async fn handle_webhook(
    state: &AppState,
    event: WebhookEvent,
) -> AppResult<ApiResponse<WebhookAck>> {
    match event.event_type.as_str() {
        "payment_intent.succeeded" => {
            let card = event
                .data
                .object
                .card()
                .map(|card| (card.brand.clone(), card.last4.clone()));
            reconcile_intent(state, &event.data.object.id, PaymentStatus::Succeeded, card).await?;
        }
        "payment_intent.payment_failed" => {
            reconcile_intent(state, &event.data.object.id, PaymentStatus::Failed, None).await?;
        }
        other => {
            tracing::debug!(event_type = other, "unhandled webhook event");
        }
    }

    Ok(ApiResponse::success(
        "Webhook received",
        WebhookAck { received: true },
        Some(Meta::empty()),
    ))
}

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PaymentList>> {
    let items = sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE user_id = $1 ORDER BY transaction_date DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Payments",
        PaymentList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    let payment: Option<Payment> = sqlx::query_as("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let payment = match payment {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    if payment.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    Ok(ApiResponse::success("Payment", payment, Some(Meta::empty())))
}

/// Payment rows are an audit trail and are never deleted.
pub async fn delete_payment(_state: &AppState, _user: &AuthUser, _id: Uuid) -> AppResult<()> {
    Err(AppError::NotImplemented(
        "Payment deletion not implemented".into(),
    ))
}

/// Moves the local payment for `intent_id` to `outcome` and transitions any
/// linked reservation. Idempotent: a payment already in `outcome` is left
/// untouched, so card metadata is written exactly once, together with the
/// move to `succeeded`.
pub(crate) async fn reconcile_intent(
    state: &AppState,
    intent_id: &str,
    outcome: PaymentStatus,
    card: Option<(Option<String>, Option<String>)>,
) -> AppResult<Option<Payment>> {
    let payment = match fetch_by_intent(state, intent_id).await? {
        Some(p) => p,
        None => {
            tracing::debug!(intent_id, "no local payment for provider intent");
            return Ok(None);
        }
    };

    if payment.payment_status == outcome {
        return Ok(Some(payment));
    }

    let (brand, last4) = card.unwrap_or((None, None));
    let updated: Payment = if outcome == PaymentStatus::Succeeded {
        sqlx::query_as(
            r#"
            UPDATE payments
            SET payment_status = $2, card_brand = $3, last_four = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment.id)
        .bind(outcome)
        .bind(brand)
        .bind(last4)
        .fetch_one(&state.pool)
        .await?
    } else {
        sqlx::query_as("UPDATE payments SET payment_status = $2 WHERE id = $1 RETURNING *")
            .bind(payment.id)
            .bind(outcome)
            .fetch_one(&state.pool)
            .await?
    };

    reservation_service::apply_payment_outcome(state, updated.id, outcome).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(updated.user_id),
        match outcome {
            PaymentStatus::Succeeded => "payment_succeeded",
            _ => "payment_failed",
        },
        Some("payments"),
        Some(serde_json::json!({ "payment_id": updated.id, "intent_id": intent_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Some(updated))
}

async fn fetch_by_intent(state: &AppState, intent_id: &str) -> AppResult<Option<Payment>> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE stripe_payment_intent_id = $1")
        .bind(intent_id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(payment)
}

/// Collapses the provider's status vocabulary onto the local one. Anything
/// still in flight maps to no outcome at all.
fn outcome_from_provider(status: &str) -> Option<PaymentStatus> {
    match status {
        "succeeded" => Some(PaymentStatus::Succeeded),
        "failed" | "payment_failed" | "canceled" => Some(PaymentStatus::Failed),
        _ => None,
    }
}
