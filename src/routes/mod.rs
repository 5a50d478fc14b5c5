use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod favorites;
pub mod health;
pub mod payments;
pub mod reservations;
pub mod spots;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/parking-spots", spots::router())
        .nest("/reservations", reservations::router())
        .nest("/favorites", favorites::router())
        .merge(payments::router())
}
