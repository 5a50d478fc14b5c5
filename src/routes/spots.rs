use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::spots::{
        CreateParkingSpotRequest, ParkingSpotList, SearchRequest, UpdateParkingSpotRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ParkingSpot,
    response::ApiResponse,
    services::spot_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_spots).post(create_spot))
        .route("/search", post(search_spots))
        .route("/{id}", get(get_spot).put(update_spot).delete(delete_spot))
}

#[utoipa::path(
    get,
    path = "/api/parking-spots",
    responses(
        (status = 200, description = "List parking spots", body = ApiResponse<ParkingSpotList>)
    ),
    tag = "Parking Spots"
)]
pub async fn list_spots(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ParkingSpotList>>> {
    Ok(Json(spot_service::list_spots(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/parking-spots/{id}",
    params(
        ("id" = Uuid, Path, description = "Parking spot ID")
    ),
    responses(
        (status = 200, description = "Get parking spot", body = ApiResponse<ParkingSpot>),
        (status = 404, description = "Parking spot not found"),
    ),
    tag = "Parking Spots"
)]
pub async fn get_spot(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ParkingSpot>>> {
    Ok(Json(spot_service::get_spot(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/parking-spots/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Aggregated search results", body = ApiResponse<ParkingSpotList>),
        (status = 400, description = "Invalid search parameters"),
    ),
    tag = "Parking Spots"
)]
pub async fn search_spots(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> AppResult<Json<ApiResponse<ParkingSpotList>>> {
    Ok(Json(spot_service::search_spots(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/parking-spots",
    request_body = CreateParkingSpotRequest,
    responses(
        (status = 201, description = "Parking spot created", body = ApiResponse<ParkingSpot>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Parking Spots"
)]
pub async fn create_spot(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateParkingSpotRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ParkingSpot>>)> {
    let response = spot_service::create_spot(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/parking-spots/{id}",
    params(
        ("id" = Uuid, Path, description = "Parking spot ID")
    ),
    request_body = UpdateParkingSpotRequest,
    responses(
        (status = 204, description = "Parking spot updated"),
        (status = 400, description = "ID mismatch"),
        (status = 404, description = "Parking spot not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Parking Spots"
)]
pub async fn update_spot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateParkingSpotRequest>,
) -> AppResult<StatusCode> {
    spot_service::update_spot(&state, &user, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/parking-spots/{id}",
    params(
        ("id" = Uuid, Path, description = "Parking spot ID")
    ),
    responses(
        (status = 204, description = "Parking spot deleted"),
        (status = 404, description = "Parking spot not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Parking Spots"
)]
pub async fn delete_spot(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    spot_service::delete_spot(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
