use std::sync::Arc;

use crate::db::{DbPool, OrmConn};
use crate::sources::{ParkingSource, UniversityCatalog};
use crate::stripe::PaymentProvider;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub campus: UniversityCatalog,
    pub external: Arc<dyn ParkingSource>,
    pub payments: Arc<dyn PaymentProvider>,
}
