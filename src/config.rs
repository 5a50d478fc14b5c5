use std::env;

/// Default Tampa ArcGIS parking layer; override with TAMPA_PARKING_URL.
const DEFAULT_TAMPA_PARKING_URL: &str = "https://services.arcgis.com/Qmpo5vdPrOQHt7MX/arcgis/rest/services/ParkingGaragesandLots_0/FeatureServer/0/query?where=1%3D1&outFields=*&outSR=4326&f=json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub stripe_secret_key: String,
    pub tampa_parking_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let stripe_secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY is not set"))?;
        let tampa_parking_url = env::var("TAMPA_PARKING_URL")
            .unwrap_or_else(|_| DEFAULT_TAMPA_PARKING_URL.to_string());
        Ok(Self {
            database_url,
            host,
            port,
            stripe_secret_key,
            tampa_parking_url,
        })
    }
}
