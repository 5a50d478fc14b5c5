use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reservations::{
        CreateReservationRequest, ReservationList, ReservationWithSpot, UpdateReservationRequest,
    },
    entity::{
        parking_spots::Entity as ParkingSpots,
        reservations::{ActiveModel, Column, Entity as Reservations, Model as ReservationModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{PaymentStatus, Reservation, ReservationStatus},
    pricing,
    response::{ApiResponse, Meta},
    services::spot_service::spot_from_entity,
    state::AppState,
};

/// The caller's reservations, newest first, each with its parking spot.
pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReservationList>> {
    let rows = Reservations::find()
        .filter(Column::UserId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .find_also_related(ParkingSpots)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(reservation, spot)| ReservationWithSpot {
            reservation: reservation_from_entity(reservation),
            parking_spot: spot.map(spot_from_entity),
        })
        .collect();

    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ReservationWithSpot>> {
    let row = Reservations::find_by_id(id)
        .find_also_related(ParkingSpots)
        .one(&state.orm)
        .await?;
    let (reservation, spot) = match row {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if reservation.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    Ok(ApiResponse::success(
        "Reservation",
        ReservationWithSpot {
            reservation: reservation_from_entity(reservation),
            parking_spot: spot.map(spot_from_entity),
        },
        Some(Meta::empty()),
    ))
}

/// Creates a pending reservation. The total price is computed here from the
/// spot's hourly rate; a client-supplied total is never trusted.
pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    if payload.duration < 1 {
        return Err(AppError::BadRequest(
            "Duration must be at least 1 hour".into(),
        ));
    }
    if payload.license_plate.trim().is_empty() {
        return Err(AppError::BadRequest("License plate is required".into()));
    }

    let spot = ParkingSpots::find_by_id(payload.parking_spot_id)
        .one(&state.orm)
        .await?;
    let spot = match spot {
        Some(s) => s,
        None => return Err(AppError::BadRequest("Parking spot not found".into())),
    };

    let total_price = pricing::quote(spot.price, payload.duration);

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        user_id: Set(user.user_id),
        parking_spot_id: Set(spot.id),
        date: Set(payload.date),
        start_time: Set(payload.start_time),
        duration: Set(payload.duration),
        vehicle_type: Set(payload.vehicle_type),
        license_plate: Set(payload.license_plate),
        total_price: Set(total_price),
        status: Set(ReservationStatus::Pending.as_str().to_string()),
        payment_id: Set(None),
        created_at: NotSet,
    };
    let reservation = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reservation_create",
        Some("reservations"),
        Some(serde_json::json!({ "reservation_id": reservation.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Reservation created",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

/// Edits never touch the status and never re-trigger payment, but the total
/// is recomputed from the (possibly changed) spot and duration.
pub async fn update_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReservationRequest,
) -> AppResult<()> {
    let existing = Reservations::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if existing.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let spot_id = payload.parking_spot_id.unwrap_or(existing.parking_spot_id);
    let spot = ParkingSpots::find_by_id(spot_id).one(&state.orm).await?;
    let spot = match spot {
        Some(s) => s,
        None => return Err(AppError::BadRequest("Parking spot not found".into())),
    };

    let duration = payload.duration.unwrap_or(existing.duration);
    if duration < 1 {
        return Err(AppError::BadRequest(
            "Duration must be at least 1 hour".into(),
        ));
    }
    if let Some(plate) = payload.license_plate.as_ref() {
        if plate.trim().is_empty() {
            return Err(AppError::BadRequest("License plate is required".into()));
        }
    }

    let total_price = pricing::quote(spot.price, duration);

    let mut active: ActiveModel = existing.into();
    active.parking_spot_id = Set(spot_id);
    active.duration = Set(duration);
    active.total_price = Set(total_price);
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(start_time) = payload.start_time {
        active.start_time = Set(start_time);
    }
    if let Some(vehicle_type) = payload.vehicle_type {
        active.vehicle_type = Set(vehicle_type);
    }
    if let Some(license_plate) = payload.license_plate {
        active.license_plate = Set(license_plate);
    }

    let reservation = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reservation_update",
        Some("reservations"),
        Some(serde_json::json!({ "reservation_id": reservation.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Cancellation is allowed from any state except an already-cancelled one.
/// The row is kept for history.
pub async fn cancel_reservation(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    let existing = Reservations::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if existing.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    if ReservationStatus::from(existing.status.as_str()) == ReservationStatus::Cancelled {
        return Err(AppError::BadRequest(
            "Reservation is already cancelled".into(),
        ));
    }

    let mut active: ActiveModel = existing.into();
    active.status = Set(ReservationStatus::Cancelled.as_str().to_string());
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reservation_cancel",
        Some("reservations"),
        Some(serde_json::json!({ "reservation_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Payment-driven transition for the reservation linked to `payment_id`:
/// a succeeded payment confirms it, a failed one fails it. No-op when no
/// reservation is linked or it already carries the target status.
pub async fn apply_payment_outcome(
    state: &AppState,
    payment_id: Uuid,
    outcome: PaymentStatus,
) -> AppResult<()> {
    let target = match outcome {
        PaymentStatus::Succeeded => ReservationStatus::Confirmed,
        PaymentStatus::Failed => ReservationStatus::Failed,
        PaymentStatus::Pending => return Ok(()),
    };

    let linked = Reservations::find()
        .filter(Column::PaymentId.eq(payment_id))
        .one(&state.orm)
        .await?;
    let linked = match linked {
        Some(r) => r,
        None => return Ok(()),
    };

    if ReservationStatus::from(linked.status.as_str()) == target {
        return Ok(());
    }

    let id = linked.id;
    let mut active: ActiveModel = linked.into();
    active.status = Set(target.as_str().to_string());
    active.update(&state.orm).await?;

    tracing::info!(reservation_id = %id, status = target.as_str(), "reservation transitioned");
    Ok(())
}

fn reservation_from_entity(model: ReservationModel) -> Reservation {
    Reservation {
        id: model.id,
        user_id: model.user_id,
        parking_spot_id: model.parking_spot_id,
        date: model.date,
        start_time: model.start_time,
        duration: model.duration,
        vehicle_type: model.vehicle_type,
        license_plate: model.license_plate,
        total_price: model.total_price,
        status: ReservationStatus::from(model.status.as_str()),
        payment_id: model.payment_id,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}
