use async_trait::async_trait;

use crate::models::ParkingSpot;

pub mod tampa;
pub mod university;

pub use tampa::TampaParkingSource;
pub use university::UniversityCatalog;

/// Common trait for every non-database spot source, so the aggregator can
/// treat the static catalog and live providers uniformly.
///
/// `fetch` never fails: a source that is down or returns garbage yields an
/// empty list, because search must keep working without it.
#[async_trait]
pub trait ParkingSource: Send + Sync {
    async fn fetch(&self) -> Vec<ParkingSpot>;

    fn source_name(&self) -> &'static str;
}
