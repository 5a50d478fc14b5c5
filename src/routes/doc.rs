use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        favorites::{AddFavoriteRequest, FavoriteSpotList},
        payments::{
            CreatePaymentIntentRequest, PaymentIntentResponse, PaymentList, PaymentStatusResponse,
            WebhookAck, WebhookEvent,
        },
        reservations::{
            CreateReservationRequest, ReservationList, ReservationWithSpot,
            UpdateReservationRequest,
        },
        spots::{CreateParkingSpotRequest, ParkingSpotList, SearchRequest, UpdateParkingSpotRequest},
    },
    models::{
        Favorite, ParkingSpot, Payment, PaymentMethod, PaymentStatus, Reservation,
        ReservationStatus, SpotSource, User,
    },
    response::{ApiResponse, Meta},
    routes::{favorites, health, payments, reservations, spots},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        spots::list_spots,
        spots::get_spot,
        spots::search_spots,
        spots::create_spot,
        spots::update_spot,
        spots::delete_spot,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        payments::create_payment_intent,
        payments::payment_status,
        payments::list_payments,
        payments::get_payment,
        payments::delete_payment,
        payments::webhook
    ),
    components(
        schemas(
            User,
            ParkingSpot,
            SpotSource,
            Reservation,
            ReservationStatus,
            Payment,
            PaymentStatus,
            PaymentMethod,
            Favorite,
            CreateParkingSpotRequest,
            UpdateParkingSpotRequest,
            SearchRequest,
            ParkingSpotList,
            CreateReservationRequest,
            UpdateReservationRequest,
            ReservationWithSpot,
            ReservationList,
            AddFavoriteRequest,
            FavoriteSpotList,
            CreatePaymentIntentRequest,
            PaymentIntentResponse,
            PaymentStatusResponse,
            PaymentList,
            WebhookEvent,
            WebhookAck,
            Meta,
            ApiResponse<ParkingSpot>,
            ApiResponse<ParkingSpotList>,
            ApiResponse<Reservation>,
            ApiResponse<ReservationList>,
            ApiResponse<Favorite>,
            ApiResponse<PaymentIntentResponse>,
            ApiResponse<PaymentStatusResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Parking Spots", description = "Parking spot and search endpoints"),
        (name = "Reservations", description = "Reservation endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Payments", description = "Payment intent and webhook endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
