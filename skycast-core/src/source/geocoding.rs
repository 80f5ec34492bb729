//! Forward and reverse geocoding clients.
//!
//! Forward search turns a place-name query into ranked candidates; reverse
//! geocoding turns coordinates into a display name. A reverse-geocoding
//! failure is survivable: callers substitute [`UNKNOWN_LOCATION`] instead of
//! failing the surrounding fetch.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{Coordinates, SuggestionCandidate};
use crate::source::truncate_body;

const SEARCH_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const REVERSE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// Sentinel display name. The resolved name is never empty: when naming
/// fails entirely, this is what the user sees.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Client for the forward-geocoding search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
    language: String,
}

impl SearchClient {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            language: language.into(),
        }
    }

    /// Query up to `count` ranked candidates for a partial place name.
    /// Zero matches is not an error here; the caller decides what an empty
    /// list means.
    pub async fn search(
        &self,
        name: &str,
        count: usize,
    ) -> Result<Vec<SuggestionCandidate>, FetchError> {
        debug!(query = name, count, "requesting place search");

        let res = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("name", name),
                ("count", &count.to_string()),
                ("language", &self.language),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_candidates())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // Absent entirely when the query has no matches.
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

impl SearchResponse {
    fn into_candidates(self) -> Vec<SuggestionCandidate> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .map(|r| SuggestionCandidate {
                name: r.name,
                country: r.country.unwrap_or_default(),
                latitude: r.latitude,
                longitude: r.longitude,
            })
            .collect()
    }
}

/// Client for the reverse-geocoding endpoint.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    http: Client,
    language: String,
}

impl ReverseGeocoder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            language: language.into(),
        }
    }

    /// Resolve coordinates to a display name.
    ///
    /// Name priority: city, else locality, else [`UNKNOWN_LOCATION`]; the
    /// country is appended when present. The result is never empty.
    pub async fn display_name(&self, coords: Coordinates) -> Result<String, FetchError> {
        debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "requesting reverse geocode"
        );

        let res = self
            .http
            .get(REVERSE_URL)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("localityLanguage", self.language.clone()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: ReverseResponse = serde_json::from_str(&body)?;
        Ok(compose_display_name(
            parsed.city,
            parsed.locality,
            parsed.country_name,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(default, rename = "countryName")]
    country_name: Option<String>,
}

/// Build `"<place>, <country>"` from the optional reverse-geocoding fields.
///
/// Empty strings count as absent, and a missing country never leaves a
/// trailing separator behind.
fn compose_display_name(
    city: Option<String>,
    locality: Option<String>,
    country: Option<String>,
) -> String {
    let non_empty = |s: String| if s.trim().is_empty() { None } else { Some(s) };

    let place = city
        .and_then(non_empty)
        .or_else(|| locality.and_then(non_empty))
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

    match country.and_then(non_empty) {
        Some(country) => format!("{place}, {country}"),
        None => place,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn city_wins_over_locality() {
        assert_eq!(
            compose_display_name(s("Berlin"), s("Mitte"), s("Germany")),
            "Berlin, Germany"
        );
    }

    #[test]
    fn locality_fills_in_for_a_missing_city() {
        assert_eq!(
            compose_display_name(None, s("Sector 5"), s("Testland")),
            "Sector 5, Testland"
        );
    }

    #[test]
    fn all_fields_missing_yields_the_sentinel() {
        assert_eq!(compose_display_name(None, None, None), UNKNOWN_LOCATION);
    }

    #[test]
    fn missing_country_leaves_no_trailing_separator() {
        assert_eq!(compose_display_name(s("Paris"), None, None), "Paris");
        assert_eq!(compose_display_name(s("Paris"), None, s("")), "Paris");
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(
            compose_display_name(s(""), s("Sector 5"), s("Testland")),
            "Sector 5, Testland"
        );
    }

    #[test]
    fn reverse_response_tolerates_null_fields() {
        let parsed: ReverseResponse = serde_json::from_str(
            r#"{"city": null, "locality": "Sector 5", "countryName": "Testland"}"#,
        )
        .expect("nullable fields must parse");

        assert_eq!(
            compose_display_name(parsed.city, parsed.locality, parsed.country_name),
            "Sector 5, Testland"
        );
    }

    #[test]
    fn search_response_with_results_maps_to_candidates() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{
                "results": [
                    {"name": "Paris", "country": "France", "latitude": 48.85, "longitude": 2.35},
                    {"name": "Paris", "country": "United States", "latitude": 33.66, "longitude": -95.55}
                ],
                "generationtime_ms": 0.5
            }"#,
        )
        .expect("search response must parse");

        let candidates = parsed.into_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label(), "Paris, France");
        assert!((candidates[1].latitude - 33.66).abs() < 1e-9);
    }

    #[test]
    fn search_response_without_results_is_empty() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.2}"#).expect("must parse");
        assert!(parsed.into_candidates().is_empty());
    }
}
