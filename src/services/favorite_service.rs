use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::favorites::{AddFavoriteRequest, FavoriteSpotList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Favorite, ParkingSpot, SpotSource},
    response::{ApiResponse, Meta},
};

pub async fn list_favorites(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<FavoriteSpotList>> {
    let rows = sqlx::query_as::<_, FavoriteSpotRow>(
        r#"
        SELECT p.id, p.name, p.address, p.city, p.price, p.available_spots,
               p.rating, p.latitude, p.longitude, p.source, p.external_id
        FROM favorites f
        JOIN parking_spots p ON p.id = f.parking_spot_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let items = rows.into_iter().map(FavoriteSpotRow::into_spot).collect();

    Ok(ApiResponse::success(
        "Favorites",
        FavoriteSpotList { items },
        Some(Meta::empty()),
    ))
}

/// Adding the same spot twice is an idempotent no-op: the insert defers to
/// the (user_id, parking_spot_id) unique constraint and the existing row is
/// returned. Returns `(created, favorite)`.
pub async fn add_favorite(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<(bool, ApiResponse<Favorite>)> {
    let spot_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM parking_spots WHERE id = $1")
        .bind(payload.parking_spot_id)
        .fetch_optional(pool)
        .await?;

    if spot_exists.is_none() {
        return Err(AppError::BadRequest("Parking spot not found".into()));
    }

    let inserted: Option<Favorite> = sqlx::query_as(
        r#"
        INSERT INTO favorites (id, user_id, parking_spot_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, parking_spot_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.parking_spot_id)
    .fetch_optional(pool)
    .await?;

    let created = inserted.is_some();
    let favorite = match inserted {
        Some(fav) => fav,
        None => {
            sqlx::query_as("SELECT * FROM favorites WHERE user_id = $1 AND parking_spot_id = $2")
                .bind(user.user_id)
                .bind(payload.parking_spot_id)
                .fetch_one(pool)
                .await?
        }
    };

    if created {
        if let Err(err) = log_audit(
            pool,
            Some(user.user_id),
            "favorite_add",
            Some("favorites"),
            Some(serde_json::json!({ "parking_spot_id": payload.parking_spot_id })),
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }
    }

    let message = if created {
        "Added to favorites"
    } else {
        "Already in favorites"
    };
    Ok((
        created,
        ApiResponse::success(message, favorite, Some(Meta::empty())),
    ))
}

pub async fn remove_favorite(
    pool: &DbPool,
    user: &AuthUser,
    parking_spot_id: Uuid,
) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND parking_spot_id = $2")
        .bind(user.user_id)
        .bind(parking_spot_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "favorite_remove",
        Some("favorites"),
        Some(serde_json::json!({ "parking_spot_id": parking_spot_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

#[derive(sqlx::FromRow)]
struct FavoriteSpotRow {
    id: Uuid,
    name: String,
    address: String,
    city: String,
    price: rust_decimal::Decimal,
    available_spots: i32,
    rating: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    source: String,
    external_id: Option<String>,
}

impl FavoriteSpotRow {
    fn into_spot(self) -> ParkingSpot {
        ParkingSpot {
            id: Some(self.id),
            name: self.name,
            address: self.address,
            city: self.city,
            price: self.price,
            available_spots: self.available_spots,
            distance: None,
            rating: self.rating,
            latitude: self.latitude,
            longitude: self.longitude,
            source: SpotSource::from(self.source.as_str()),
            external_id: self.external_id,
        }
    }
}
