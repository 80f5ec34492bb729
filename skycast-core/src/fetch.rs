//! The weather fetcher: one combined forecast request, plus at most one
//! reverse-geocoding call when no display name is known yet.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::model::{Coordinates, WeatherSnapshot};
use crate::source::geocoding::{ReverseGeocoder, UNKNOWN_LOCATION};
use crate::source::openmeteo::ForecastClient;

/// Fetches a [`WeatherSnapshot`] and resolves a display name for it.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    forecast: ForecastClient,
    reverse: ReverseGeocoder,
}

impl WeatherFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            forecast: ForecastClient::new(),
            reverse: ReverseGeocoder::new(config.language.clone()),
        }
    }

    /// Fetch current + daily + hourly weather for `coords`.
    ///
    /// A transport failure or non-success status fails the whole fetch; no
    /// partial snapshot is produced. Naming is softer: when `display_name`
    /// is absent, one reverse-geocoding call runs, and its failure degrades
    /// to [`UNKNOWN_LOCATION`] rather than blocking the weather data.
    pub async fn fetch(
        &self,
        coords: Coordinates,
        display_name: Option<String>,
    ) -> Result<(WeatherSnapshot, String), FetchError> {
        let snapshot = self.forecast.fetch(coords).await?;

        let name = match display_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => match self.reverse.display_name(coords).await {
                Ok(name) => name,
                Err(err) => {
                    warn!(error = %err, "reverse geocoding failed; using placeholder name");
                    UNKNOWN_LOCATION.to_string()
                }
            },
        };

        info!(
            place = %name,
            daily_days = snapshot.daily.len(),
            hourly_hours = snapshot.hourly.len(),
            "fetched weather snapshot"
        );

        Ok((snapshot, name))
    }
}
