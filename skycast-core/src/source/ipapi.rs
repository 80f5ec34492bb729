use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::model::Coordinates;
use crate::source::truncate_body;

const IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

/// Coordinates and city derived from the caller's IP address.
#[derive(Debug, Clone)]
pub struct IpLocation {
    pub coordinates: Coordinates,
    pub city: Option<String>,
}

/// Client for the IP-geolocation endpoint. No parameters beyond the caller
/// IP, which the service infers from the connection itself.
#[derive(Debug, Clone, Default)]
pub struct IpLookupClient {
    http: Client,
}

impl IpLookupClient {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub async fn lookup(&self) -> Result<IpLocation, FetchError> {
        debug!("requesting ip geolocation");

        let res = self.http.get(IP_LOOKUP_URL).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: IpResponse = serde_json::from_str(&body)?;
        parsed.into_location()
    }
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

impl IpResponse {
    fn into_location(self) -> Result<IpLocation, FetchError> {
        let latitude = self
            .latitude
            .ok_or_else(|| FetchError::Malformed("ip lookup response has no latitude".to_string()))?;
        let longitude = self
            .longitude
            .ok_or_else(|| FetchError::Malformed("ip lookup response has no longitude".to_string()))?;

        let city = self.city.filter(|c| !c.trim().is_empty());

        Ok(IpLocation {
            coordinates: Coordinates::new(latitude, longitude),
            city,
        })
    }
}
