use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::payments::{
        CreatePaymentIntentRequest, PaymentIntentResponse, PaymentList, PaymentStatusResponse,
        WebhookAck, WebhookEvent,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Payment,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/payment-status/{intent_id}", get(payment_status))
        .route("/payments", get(list_payments))
        .route("/payments/{id}", get(get_payment).delete(delete_payment))
        .route("/webhook", post(webhook))
}

#[utoipa::path(
    post,
    path = "/api/create-payment-intent",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Payment intent opened", body = ApiResponse<PaymentIntentResponse>),
        (status = 400, description = "Missing or invalid amount"),
        (status = 404, description = "Linked reservation not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentIntentRequest>,
) -> AppResult<Json<ApiResponse<PaymentIntentResponse>>> {
    Ok(Json(
        payment_service::create_payment_intent(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/payment-status/{intent_id}",
    params(
        ("intent_id" = String, Path, description = "Provider payment intent ID")
    ),
    responses(
        (status = 200, description = "Provider status with the reconciled local payment", body = ApiResponse<PaymentStatusResponse>),
        (status = 500, description = "Provider unreachable"),
    ),
    tag = "Payments"
)]
pub async fn payment_status(
    State(state): State<AppState>,
    Path(intent_id): Path<String>,
) -> AppResult<Json<ApiResponse<PaymentStatusResponse>>> {
    Ok(Json(
        payment_service::payment_status(&state, &intent_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "List the caller's payments", body = ApiResponse<PaymentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    Ok(Json(payment_service::list_payments(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Get payment", body = ApiResponse<Payment>),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    Ok(Json(payment_service::get_payment(&state, &user, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 501, description = "Payment deletion not implemented"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<()> {
    payment_service::delete_payment(&state, &user, id).await
}

#[utoipa::path(
    post,
    path = "/api/webhook",
    request_body = WebhookEvent,
    responses(
        (status = 200, description = "Event received", body = ApiResponse<WebhookAck>),
        (status = 400, description = "Unparsable event"),
    ),
    tag = "Payments"
)]
pub async fn webhook(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> AppResult<Json<ApiResponse<WebhookAck>>> {
    Ok(Json(payment_service::handle_webhook(&state, event).await?))
}
