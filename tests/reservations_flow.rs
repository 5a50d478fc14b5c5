use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use std::sync::Arc;
use uuid::Uuid;

use parkease_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        favorites::AddFavoriteRequest,
        payments::{CreatePaymentIntentRequest, WebhookEvent},
        reservations::CreateReservationRequest,
        spots::SearchRequest,
    },
    entity::{
        parking_spots::ActiveModel as SpotActive, reservations::Entity as Reservations,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    models::{ParkingSpot, PaymentStatus, ReservationStatus},
    services::{favorite_service, payment_service, reservation_service, spot_service},
    sources::{ParkingSource, UniversityCatalog},
    state::AppState,
    stripe::{IntentMetadata, PaymentProvider, ProviderIntent},
};

/// Stands in for the live feed being down: the adapter contract degrades to
/// an empty list instead of failing the search.
struct DownSource;

#[async_trait]
impl ParkingSource for DownSource {
    async fn fetch(&self) -> Vec<ParkingSpot> {
        Vec::new()
    }

    fn source_name(&self) -> &'static str {
        "down"
    }
}

struct MockPaymentProvider;

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(
        &self,
        amount_minor: i64,
        metadata: IntentMetadata,
    ) -> anyhow::Result<ProviderIntent> {
        Ok(ProviderIntent {
            id: format!("pi_mock_{}", metadata.user_id.simple()),
            client_secret: Some("cs_test_secret".into()),
            status: "requires_payment_method".into(),
            amount: amount_minor,
            payment_method_details: None,
        })
    }

    async fn retrieve_intent(&self, intent_id: &str) -> anyhow::Result<ProviderIntent> {
        Ok(ProviderIntent {
            id: intent_id.to_string(),
            client_secret: None,
            status: "succeeded".into(),
            amount: 2200,
            payment_method_details: None,
        })
    }
}

// Integration flow: reserve a spot -> open a payment intent -> webhook
// confirms it; favorites stay unique; search survives a dead external feed.
#[tokio::test]
async fn reserve_pay_and_search_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let user_id = create_user(&state, "driver@parkease.com").await?;
    let user = AuthUser {
        user_id,
        role: "user".into(),
    };

    // Seed a local spot at $5.00/hr
    let spot = SpotActive {
        id: Set(Uuid::new_v4()),
        name: Set("USF Parking Garage 1".into()),
        address: Set("USF Holly Drive".into()),
        city: Set("Tampa".into()),
        price: Set(dec!(5.00)),
        available_spots: Set(100),
        latitude: Set(Some(28.0639)),
        longitude: Set(Some(-82.4128)),
        rating: Set(Some(4.5)),
        source: Set("local".into()),
        external_id: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    // The client-supplied total is a lie; the server recomputes 5.00*4 + 2.00.
    let created = reservation_service::create_reservation(
        &state,
        &user,
        CreateReservationRequest {
            parking_spot_id: spot.id,
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            start_time: "09:00".into(),
            duration: 4,
            vehicle_type: "sedan".into(),
            license_plate: "ABC-1234".into(),
            total_price: Some(dec!(1.00)),
        },
    )
    .await?;
    let reservation = created.data.unwrap();
    assert_eq!(reservation.total_price, dec!(22.00));
    assert_eq!(reservation.status, ReservationStatus::Pending);

    // Duplicate favorite adds collapse onto one row.
    let (created_first, first) = favorite_service::add_favorite(
        &state.pool,
        &user,
        AddFavoriteRequest {
            parking_spot_id: spot.id,
        },
    )
    .await?;
    let (created_again, second) = favorite_service::add_favorite(
        &state.pool,
        &user,
        AddFavoriteRequest {
            parking_spot_id: spot.id,
        },
    )
    .await?;
    assert!(created_first);
    assert!(!created_again);
    assert_eq!(
        first.data.unwrap().id,
        second.data.unwrap().id,
        "duplicate add must return the existing favorite"
    );
    let favorite_count: (i64,) =
        sqlx::query_as("SELECT count(*) FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(favorite_count.0, 1);

    // Open a payment intent linked to the reservation.
    let intent_resp = payment_service::create_payment_intent(
        &state,
        &user,
        CreatePaymentIntentRequest {
            amount: dec!(22.00),
            reservation_id: Some(reservation.id),
            payment_method: None,
        },
    )
    .await?;
    let intent = intent_resp.data.unwrap();
    assert!(intent.client_secret.is_some());

    let linked = Reservations::find_by_id(reservation.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(linked.payment_id, Some(intent.payment_id));

    // Deliver the succeeded webhook twice; the second must change nothing.
    let event_json = serde_json::json!({
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": intent.payment_intent_id,
                "payment_method_details": {
                    "card": { "brand": "visa", "last4": "4242" }
                }
            }
        }
    });
    let event: WebhookEvent = serde_json::from_value(event_json.clone())?;
    payment_service::handle_webhook(&state, event).await?;
    let after_first = fetch_payment(&state, intent.payment_id).await?;
    assert_eq!(after_first.payment_status, PaymentStatus::Succeeded);
    assert_eq!(after_first.card_brand.as_deref(), Some("visa"));
    assert_eq!(after_first.last_four.as_deref(), Some("4242"));

    let replay: WebhookEvent = serde_json::from_value(event_json)?;
    payment_service::handle_webhook(&state, replay).await?;
    let after_replay = fetch_payment(&state, intent.payment_id).await?;
    assert_eq!(after_replay.payment_status, PaymentStatus::Succeeded);
    assert_eq!(after_replay.card_brand.as_deref(), Some("visa"));
    assert_eq!(after_replay.last_four.as_deref(), Some("4242"));

    let confirmed = Reservations::find_by_id(reservation.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(confirmed.status, "confirmed");

    // Search with a dead external feed: local and campus results survive.
    let everything = spot_service::search_spots(&state, SearchRequest::default())
        .await?
        .data
        .unwrap();
    let names: Vec<_> = everything.items.iter().map(|s| s.name.clone()).collect();
    assert!(names.iter().any(|n| n == "USF Parking Garage 1"));
    assert!(names.iter().any(|n| n == "Thomas Parking Garage"));

    let filtered = spot_service::search_spots(
        &state,
        SearchRequest {
            location: "Holly".into(),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(filtered.items.len(), 1);
    assert_eq!(filtered.items[0].name, "USF Parking Garage 1");

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(database_url).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE reservations, favorites, payments, audit_logs, parking_spots, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        campus: UniversityCatalog,
        external: Arc::new(DownSource),
        payments: Arc::new(MockPaymentProvider),
    })
}

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        name: Set("Test Driver".into()),
        role: Set("user".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn fetch_payment(
    state: &AppState,
    id: Uuid,
) -> anyhow::Result<parkease_api::models::Payment> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    Ok(payment)
}
