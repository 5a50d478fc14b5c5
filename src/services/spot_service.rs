use std::collections::HashSet;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::spots::{CreateParkingSpotRequest, ParkingSpotList, SearchRequest, UpdateParkingSpotRequest},
    entity::parking_spots::{ActiveModel, Column, Entity as ParkingSpots, Model as SpotModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ParkingSpot, SpotSource},
    response::{ApiResponse, Meta},
    sources::ParkingSource,
    state::AppState,
};

/// All known spots: persisted rows plus the campus catalog overlay.
pub async fn list_spots(state: &AppState) -> AppResult<ApiResponse<ParkingSpotList>> {
    let mut items: Vec<ParkingSpot> = ParkingSpots::find()
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(spot_from_entity)
        .collect();
    items.extend(state.campus.list().iter().cloned());

    Ok(ApiResponse::success(
        "Parking spots",
        ParkingSpotList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_spot(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ParkingSpot>> {
    let spot = ParkingSpots::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(spot_from_entity);
    let spot = match spot {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Parking spot", spot, None))
}

/// Aggregated search across the local store, the campus catalog and the
/// external feed. Every source gets the same substring filter; the merged
/// list is de-duplicated on (name, address) with earlier sources winning.
pub async fn search_spots(
    state: &AppState,
    payload: SearchRequest,
) -> AppResult<ApiResponse<ParkingSpotList>> {
    let location = payload.location.trim().to_string();

    let mut finder = ParkingSpots::find();
    if !location.is_empty() {
        finder = finder.filter(
            Condition::any()
                .add(Column::City.contains(&location))
                .add(Column::Address.contains(&location)),
        );
    }
    let local: Vec<ParkingSpot> = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(spot_from_entity)
        .collect();

    let campus = state.campus.fetch().await;
    let external = state.external.fetch().await;

    let items = merge_spots(local, campus, external, &location);

    Ok(ApiResponse::success(
        "Search results",
        ParkingSpotList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_spot(
    state: &AppState,
    user: &AuthUser,
    payload: CreateParkingSpotRequest,
) -> AppResult<ApiResponse<ParkingSpot>> {
    ensure_admin(user)?;

    if payload.price.is_sign_negative() {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }
    if payload.available_spots < 0 {
        return Err(AppError::BadRequest(
            "Available spots must not be negative".into(),
        ));
    }

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        name: Set(payload.name),
        address: Set(payload.address),
        city: Set(payload.city),
        price: Set(payload.price),
        available_spots: Set(payload.available_spots),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        rating: Set(payload.rating),
        source: Set(SpotSource::Local.as_str().to_string()),
        external_id: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let spot = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "parking_spot_create",
        Some("parking_spots"),
        Some(serde_json::json!({ "parking_spot_id": spot.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Parking spot created",
        spot_from_entity(spot),
        Some(Meta::empty()),
    ))
}

pub async fn update_spot(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateParkingSpotRequest,
) -> AppResult<()> {
    ensure_admin(user)?;

    if payload.id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::BadRequest("Parking spot ID mismatch".into()));
    }

    let existing = ParkingSpots::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(price) = payload.price {
        if price.is_sign_negative() {
            return Err(AppError::BadRequest("Price must not be negative".into()));
        }
        active.price = Set(price);
    }
    if let Some(available_spots) = payload.available_spots {
        if available_spots < 0 {
            return Err(AppError::BadRequest(
                "Available spots must not be negative".into(),
            ));
        }
        active.available_spots = Set(available_spots);
    }
    if let Some(latitude) = payload.latitude {
        active.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = payload.longitude {
        active.longitude = Set(Some(longitude));
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(Some(rating));
    }
    active.updated_at = Set(Utc::now().into());

    let spot = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "parking_spot_update",
        Some("parking_spots"),
        Some(serde_json::json!({ "parking_spot_id": spot.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// Deleting a spot cascades to its reservations and favorites.
pub async fn delete_spot(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;

    let result = ParkingSpots::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "parking_spot_delete",
        Some("parking_spots"),
        Some(serde_json::json!({ "parking_spot_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

fn merge_spots(
    local: Vec<ParkingSpot>,
    campus: Vec<ParkingSpot>,
    external: Vec<ParkingSpot>,
    location: &str,
) -> Vec<ParkingSpot> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    local
        .into_iter()
        .chain(campus)
        .chain(external)
        .filter(|spot| matches_location(spot, location))
        .filter(|spot| seen.insert((spot.name.clone(), spot.address.clone())))
        .collect()
}

/// Case-sensitive containment against city or address; an empty location
/// matches everything. String matching stands in for geolocation here.
fn matches_location(spot: &ParkingSpot, location: &str) -> bool {
    location.is_empty() || spot.city.contains(location) || spot.address.contains(location)
}

pub(crate) fn spot_from_entity(model: SpotModel) -> ParkingSpot {
    ParkingSpot {
        id: Some(model.id),
        name: model.name,
        address: model.address,
        city: model.city,
        price: model.price,
        available_spots: model.available_spots,
        distance: None,
        rating: model.rating,
        latitude: model.latitude,
        longitude: model.longitude,
        source: SpotSource::from(model.source.as_str()),
        external_id: model.external_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spot(name: &str, address: &str, city: &str, source: SpotSource) -> ParkingSpot {
        ParkingSpot {
            id: None,
            name: name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            price: dec!(1.00),
            available_spots: 10,
            distance: None,
            rating: None,
            latitude: None,
            longitude: None,
            source,
            external_id: None,
        }
    }

    #[test]
    fn empty_location_matches_everything() {
        let s = spot("A", "1 Main St", "Tampa", SpotSource::Local);
        assert!(matches_location(&s, ""));
    }

    #[test]
    fn location_matches_city_or_address() {
        let s = spot("A", "401 W Kennedy Blvd", "Tampa", SpotSource::Local);
        assert!(matches_location(&s, "Tampa"));
        assert!(matches_location(&s, "Kennedy"));
        assert!(!matches_location(&s, "Orlando"));
        // containment is case-sensitive
        assert!(!matches_location(&s, "tampa"));
    }

    #[test]
    fn merge_filters_every_source_uniformly() {
        let local = vec![spot("L1", "1 Tampa St", "Tampa", SpotSource::Local)];
        let campus = vec![spot("C1", "2 Campus Rd", "Orlando", SpotSource::StaticCatalog)];
        let external = vec![spot("E1", "3 Bay Ave", "Tampa", SpotSource::ExternalApi)];

        let merged = merge_spots(local, campus, external, "Tampa");
        let names: Vec<_> = merged.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["L1", "E1"]);
    }

    #[test]
    fn merge_deduplicates_on_name_and_address() {
        let local = vec![spot("Garage", "1 Main St", "Tampa", SpotSource::Local)];
        let campus = vec![spot("Garage", "1 Main St", "Tampa", SpotSource::StaticCatalog)];
        let external = vec![spot("Garage", "2 Other St", "Tampa", SpotSource::ExternalApi)];

        let merged = merge_spots(local, campus, external, "");
        assert_eq!(merged.len(), 2);
        // the locally stored copy wins over the catalog duplicate
        assert_eq!(merged[0].source, SpotSource::Local);
    }
}
