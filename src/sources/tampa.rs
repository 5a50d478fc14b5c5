use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::{ParkingSpot, SpotSource};
use crate::sources::ParkingSource;

/// Spot count reported when the feed omits SPACES.
const DEFAULT_AVAILABLE_SPOTS: i32 = 50;
/// The feed carries no ratings; the UI expects one.
const DEFAULT_RATING: f64 = 4.0;

/// Live adapter for the Tampa ArcGIS parking garages and lots layer.
pub struct TampaParkingSource {
    client: Client,
    url: String,
}

impl TampaParkingSource {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn try_fetch(&self) -> anyhow::Result<Vec<ParkingSpot>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to reach Tampa parking feed")?;

        if !response.status().is_success() {
            anyhow::bail!("Tampa parking feed returned {}", response.status());
        }

        let body: TampaParkingResponse = response
            .json()
            .await
            .context("Failed to parse Tampa parking feed")?;

        Ok(body
            .features
            .into_iter()
            .filter_map(|feature| feature.properties.is_some().then(|| map_feature(feature)))
            .collect())
    }
}

#[async_trait]
impl ParkingSource for TampaParkingSource {
    async fn fetch(&self) -> Vec<ParkingSpot> {
        match self.try_fetch().await {
            Ok(spots) => {
                debug!(count = spots.len(), "fetched Tampa parking data");
                spots
            }
            Err(err) => {
                warn!(error = %err, "Tampa parking fetch failed, continuing without it");
                Vec::new()
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "Tampa ArcGIS"
    }
}

#[derive(Debug, Default, Deserialize)]
struct TampaParkingResponse {
    #[serde(default)]
    features: Vec<TampaFeature>,
}

#[derive(Debug, Default, Deserialize)]
struct TampaFeature {
    properties: Option<TampaProperties>,
    geometry: Option<TampaGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct TampaProperties {
    #[serde(rename = "OBJECTID", default)]
    objectid: i64,
    #[serde(rename = "NAME")]
    name: Option<String>,
    #[serde(rename = "ADDRESS")]
    address: Option<String>,
    #[serde(rename = "SPACES")]
    spaces: Option<i32>,
    #[serde(rename = "RATE")]
    rate: Option<String>,
    #[serde(rename = "LAT")]
    lat: Option<f64>,
    #[serde(rename = "LON")]
    lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TampaGeometry {
    /// `[longitude, latitude]`
    coordinates: Option<Vec<f64>>,
}

fn map_feature(feature: TampaFeature) -> ParkingSpot {
    let props = feature.properties.unwrap_or_default();

    // Geometry carries [lon, lat]; fall back to the discrete attributes.
    let (longitude, latitude) = match feature.geometry.and_then(|g| g.coordinates) {
        Some(coords) if coords.len() >= 2 => (Some(coords[0]), Some(coords[1])),
        _ => (props.lon, props.lat),
    };

    let price = props
        .rate
        .as_deref()
        .map(parse_rate)
        .unwrap_or(Decimal::ZERO);

    ParkingSpot {
        id: None,
        name: props.name.unwrap_or_else(|| "Unknown Parking".to_string()),
        address: props
            .address
            .unwrap_or_else(|| "No address provided".to_string()),
        city: "Tampa".to_string(),
        price,
        available_spots: props.spaces.unwrap_or(DEFAULT_AVAILABLE_SPOTS),
        distance: None,
        rating: Some(DEFAULT_RATING),
        latitude,
        longitude,
        source: SpotSource::ExternalApi,
        external_id: Some(props.objectid.to_string()),
    }
}

/// Rates arrive as free text like `"$1.60"`; anything unparsable is 0.
fn parse_rate(raw: &str) -> Decimal {
    raw.replace('$', "").trim().parse().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn feature_from_json(json: serde_json::Value) -> TampaFeature {
        serde_json::from_value(json).expect("feature json")
    }

    #[test]
    fn parses_dollar_rates() {
        assert_eq!(parse_rate("$1.60"), dec!(1.60));
        assert_eq!(parse_rate(" $2 "), dec!(2));
        assert_eq!(parse_rate("varies"), Decimal::ZERO);
        assert_eq!(parse_rate(""), Decimal::ZERO);
    }

    #[test]
    fn maps_a_complete_feature() {
        let feature = feature_from_json(serde_json::json!({
            "properties": {
                "OBJECTID": 17,
                "NAME": "Fort Brooke Garage",
                "ADDRESS": "107 N Franklin St",
                "SPACES": 1400,
                "RATE": "$1.60",
            },
            "geometry": { "coordinates": [-82.4585, 27.9480] }
        }));

        let spot = map_feature(feature);
        assert_eq!(spot.name, "Fort Brooke Garage");
        assert_eq!(spot.city, "Tampa");
        assert_eq!(spot.price, dec!(1.60));
        assert_eq!(spot.available_spots, 1400);
        assert_eq!(spot.longitude, Some(-82.4585));
        assert_eq!(spot.latitude, Some(27.9480));
        assert_eq!(spot.source, SpotSource::ExternalApi);
        assert_eq!(spot.external_id.as_deref(), Some("17"));
        assert_eq!(spot.rating, Some(4.0));
        assert!(spot.id.is_none());
    }

    #[test]
    fn fills_defaults_for_sparse_features() {
        let feature = feature_from_json(serde_json::json!({
            "properties": { "OBJECTID": 3, "LAT": 27.95, "LON": -82.46 }
        }));

        let spot = map_feature(feature);
        assert_eq!(spot.name, "Unknown Parking");
        assert_eq!(spot.address, "No address provided");
        assert_eq!(spot.price, Decimal::ZERO);
        assert_eq!(spot.available_spots, 50);
        // No geometry: discrete LAT/LON attributes are the fallback.
        assert_eq!(spot.latitude, Some(27.95));
        assert_eq!(spot.longitude, Some(-82.46));
    }
}
