use chrono::{NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{Coordinates, CurrentConditions, DailyEntry, HourlyEntry, WeatherSnapshot};
use crate::source::truncate_body;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,precipitation,weather_code";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";

/// Client for the combined current + daily + hourly forecast request.
///
/// One round trip per fetch; a non-success status is a hard failure with no
/// partial data.
#[derive(Debug, Clone, Default)]
pub struct ForecastClient {
    http: Client,
}

impl ForecastClient {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    pub async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot, FetchError> {
        debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "requesting forecast"
        );

        let res = self
            .http
            .get(FORECAST_URL)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
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

        let parsed: ForecastResponse = serde_json::from_str(&body)?;
        parsed.into_snapshot()
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: u8,
    wind_speed_10m: f64,
    precipitation: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: OmCurrent,
    daily: OmDaily,
    hourly: OmHourly,
}

impl ForecastResponse {
    /// Zip the parallel response arrays into per-entry structs.
    ///
    /// The equal-length invariant of each series holds by construction
    /// afterwards; a response with mismatched arrays never becomes a
    /// snapshot.
    fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        let current = CurrentConditions {
            time: parse_local_time(&self.current.time)?,
            temperature_c: self.current.temperature_2m,
            apparent_temperature_c: self.current.apparent_temperature,
            humidity_pct: self.current.relative_humidity_2m,
            wind_speed_kmh: self.current.wind_speed_10m,
            precipitation_mm: self.current.precipitation,
            weather_code: self.current.weather_code,
        };

        let d = self.daily;
        if d.time.len() != d.temperature_2m_max.len()
            || d.time.len() != d.temperature_2m_min.len()
            || d.time.len() != d.weather_code.len()
        {
            return Err(FetchError::Malformed(
                "daily series lengths differ".to_string(),
            ));
        }

        let mut daily = Vec::with_capacity(d.time.len());
        for (i, date) in d.time.iter().enumerate() {
            daily.push(DailyEntry {
                date: parse_local_date(date)?,
                temperature_max_c: d.temperature_2m_max[i],
                temperature_min_c: d.temperature_2m_min[i],
                weather_code: d.weather_code[i],
            });
        }

        let h = self.hourly;
        if h.time.len() != h.temperature_2m.len() || h.time.len() != h.weather_code.len() {
            return Err(FetchError::Malformed(
                "hourly series lengths differ".to_string(),
            ));
        }

        let mut hourly = Vec::with_capacity(h.time.len());
        for (i, time) in h.time.iter().enumerate() {
            hourly.push(HourlyEntry {
                time: parse_local_time(time)?,
                temperature_c: h.temperature_2m[i],
                weather_code: h.weather_code[i],
            });
        }

        Ok(WeatherSnapshot {
            current,
            daily,
            hourly,
            fetched_at: Utc::now(),
        })
    }
}

/// The forecast service returns location-local timestamps like
/// "2024-07-15T14:00" under `timezone=auto`.
fn parse_local_time(value: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map_err(|_| FetchError::Malformed(format!("invalid timestamp '{value}'")))
}

fn parse_local_date(value: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FetchError::Malformed(format!("invalid date '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_RESPONSE: &str = r#"{
        "latitude": 48.86,
        "longitude": 2.35,
        "timezone": "Europe/Paris",
        "current": {
            "time": "2024-07-15T14:00",
            "interval": 900,
            "temperature_2m": 22.5,
            "apparent_temperature": 23.8,
            "relative_humidity_2m": 65,
            "wind_speed_10m": 12.5,
            "precipitation": 0.2,
            "weather_code": 2
        },
        "daily": {
            "time": ["2024-07-15", "2024-07-16"],
            "temperature_2m_max": [25.1, 27.4],
            "temperature_2m_min": [16.0, 17.2],
            "weather_code": [2, 61]
        },
        "hourly": {
            "time": ["2024-07-15T14:00", "2024-07-15T15:00", "2024-07-15T16:00"],
            "temperature_2m": [22.5, 23.0, 22.8],
            "weather_code": [2, 2, 3]
        }
    }"#;

    #[test]
    fn valid_response_becomes_a_snapshot() {
        let parsed: ForecastResponse =
            serde_json::from_str(VALID_RESPONSE).expect("valid response must parse");
        let snapshot = parsed.into_snapshot().expect("snapshot must build");

        assert!((snapshot.current.temperature_c - 22.5).abs() < 1e-9);
        assert!((snapshot.current.apparent_temperature_c - 23.8).abs() < 1e-9);
        assert_eq!(snapshot.current.humidity_pct, 65);
        assert_eq!(snapshot.current.weather_code, 2);

        assert_eq!(snapshot.daily.len(), 2);
        assert_eq!(snapshot.hourly.len(), 3);
        assert_eq!(snapshot.daily[1].weather_code, 61);
        assert!((snapshot.daily[0].temperature_max_c - 25.1).abs() < 1e-9);
        assert_eq!(
            snapshot.daily[0].date,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
        );
    }

    #[test]
    fn daily_series_lengths_are_equal_by_construction() {
        let parsed: ForecastResponse = serde_json::from_str(VALID_RESPONSE).unwrap();
        let snapshot = parsed.into_snapshot().unwrap();

        // Each entry carries date, min, max, and code together, so the four
        // series cannot drift apart.
        for day in &snapshot.daily {
            assert!(day.temperature_max_c >= day.temperature_min_c);
        }
    }

    #[test]
    fn mismatched_daily_series_is_rejected() {
        let mismatched = r#"{
            "current": {
                "time": "2024-07-15T14:00",
                "temperature_2m": 22.5,
                "apparent_temperature": 23.8,
                "relative_humidity_2m": 65,
                "wind_speed_10m": 12.5,
                "precipitation": 0.0,
                "weather_code": 2
            },
            "daily": {
                "time": ["2024-07-15", "2024-07-16"],
                "temperature_2m_max": [25.1],
                "temperature_2m_min": [16.0, 17.2],
                "weather_code": [2, 61]
            },
            "hourly": {
                "time": ["2024-07-15T14:00"],
                "temperature_2m": [22.5],
                "weather_code": [2]
            }
        }"#;

        let parsed: ForecastResponse = serde_json::from_str(mismatched).unwrap();
        let err = parsed.into_snapshot().unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        assert!(parse_local_time("2024-07-15 14:00").is_err());
        assert!(parse_local_time("not a time").is_err());
        assert!(parse_local_date("15/07/2024").is_err());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let result: Result<ForecastResponse, _> = serde_json::from_str("{ invalid json }");
        assert!(result.is_err());
    }
}
