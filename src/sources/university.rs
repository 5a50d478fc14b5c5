use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::LazyLock;

use crate::models::{ParkingSpot, SpotSource};
use crate::sources::ParkingSource;

/// Hand-curated University of Tampa locations, built once and never mutated.
/// Served both as map overlay data and as search results.
static CAMPUS_SPOTS: LazyLock<Vec<ParkingSpot>> = LazyLock::new(|| {
    vec![
        campus_spot(
            "Thomas Parking Garage",
            "401 W Kennedy Blvd",
            dec!(2.00),
            120,
            27.9447,
            -82.4640,
            "UT1001",
            4.2,
        ),
        campus_spot(
            "West Parking Garage",
            "318 N North Blvd",
            dec!(1.50),
            85,
            27.9465,
            -82.4655,
            "UT1002",
            3.9,
        ),
        campus_spot(
            "Vaughn Center Parking",
            "200 N Boulevard",
            dec!(1.00),
            65,
            27.9437,
            -82.4637,
            "UT1003",
            4.5,
        ),
        campus_spot(
            "Plant Hall Visitor Parking",
            "401 W Kennedy Blvd",
            dec!(2.50),
            40,
            27.9444,
            -82.4648,
            "UT1004",
            4.1,
        ),
        campus_spot(
            "North Parking Lot",
            "304 N Boulevard",
            dec!(1.00),
            55,
            27.9475,
            -82.4640,
            "UT1005",
            3.8,
        ),
    ]
});

fn campus_spot(
    name: &str,
    address: &str,
    price: Decimal,
    available_spots: i32,
    latitude: f64,
    longitude: f64,
    external_id: &str,
    rating: f64,
) -> ParkingSpot {
    ParkingSpot {
        id: None,
        name: name.to_string(),
        address: address.to_string(),
        city: "Tampa".to_string(),
        price,
        available_spots,
        distance: None,
        rating: Some(rating),
        latitude: Some(latitude),
        longitude: Some(longitude),
        source: SpotSource::StaticCatalog,
        external_id: Some(external_id.to_string()),
    }
}

/// Fixed campus catalog, exposed like any other source plus id lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversityCatalog;

impl UniversityCatalog {
    pub fn list(&self) -> &'static [ParkingSpot] {
        &CAMPUS_SPOTS
    }

    pub fn find_by_external_id(&self, external_id: &str) -> Option<&'static ParkingSpot> {
        CAMPUS_SPOTS
            .iter()
            .find(|spot| spot.external_id.as_deref() == Some(external_id))
    }
}

#[async_trait]
impl ParkingSource for UniversityCatalog {
    async fn fetch(&self) -> Vec<ParkingSpot> {
        CAMPUS_SPOTS.clone()
    }

    fn source_name(&self) -> &'static str {
        "University of Tampa"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_stable_and_tagged() {
        let catalog = UniversityCatalog;
        assert_eq!(catalog.list().len(), 5);
        assert!(catalog
            .list()
            .iter()
            .all(|s| s.source == SpotSource::StaticCatalog && s.city == "Tampa"));
    }

    #[test]
    fn finds_by_external_id() {
        let catalog = UniversityCatalog;
        let spot = catalog.find_by_external_id("UT1003").expect("UT1003");
        assert_eq!(spot.name, "Vaughn Center Parking");
        assert!(catalog.find_by_external_id("UT9999").is_none());
    }
}
