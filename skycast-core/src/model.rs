use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pair of WGS84 coordinates. Immutable once obtained for a given fetch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are inside their valid WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions at the requested coordinates. All values metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub precipitation_mm: f64,
    pub weather_code: i32,
}

/// One day of the daily series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub temperature_max_c: f64,
    pub temperature_min_c: f64,
    pub weather_code: i32,
}

/// One hour of the hourly series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub weather_code: i32,
}

/// The last successfully fetched payload.
///
/// Owned exclusively by [`crate::app::AppState`]; replaced wholesale on each
/// successful fetch, never merged. Timestamps are local to the forecast
/// location (the forecast service resolves the timezone itself).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: Vec<DailyEntry>,
    pub hourly: Vec<HourlyEntry>,
    pub fetched_at: DateTime<Utc>,
}

/// A ranked match from the forward-geocoding search.
///
/// Ephemeral: lives between a search query and either a selection or the
/// next query.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionCandidate {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SuggestionCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Presentation label, `"<name>, <country>"`.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Display classification derived from the WMO weather code.
///
/// A domain mapping, not styling: presentation layers pick icons and colors
/// from the category, but the table itself is fixed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
    Clear,
    PartlyCloudy,
    Cloudy,
    Foggy,
    Rainy,
    Stormy,
    Snowy,
    Thunderstorm,
}

impl WeatherCategory {
    /// Classify a WMO weather code. Unknown codes fall back to
    /// [`WeatherCategory::PartlyCloudy`].
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 | 2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Foggy,
            51 | 53 | 55 | 56 | 57 => Self::Rainy,
            61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => Self::Stormy,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snowy,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::PartlyCloudy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly cloudy",
            Self::Cloudy => "cloudy",
            Self::Foggy => "foggy",
            Self::Rainy => "rainy",
            Self::Stormy => "stormy",
            Self::Snowy => "snowy",
            Self::Thunderstorm => "thunderstorm",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_validity() {
        assert!(Coordinates::new(48.8566, 2.3522).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn candidate_label_formats_name_and_country() {
        let candidate = SuggestionCandidate {
            name: "Paris".to_string(),
            country: "France".to_string(),
            latitude: 48.8566,
            longitude: 2.3522,
        };
        assert_eq!(candidate.label(), "Paris, France");
        assert!((candidate.coordinates().latitude - 48.8566).abs() < 1e-9);
    }

    #[test]
    fn wmo_code_clear_and_cloud_categories() {
        assert_eq!(WeatherCategory::from_wmo_code(0), WeatherCategory::Clear);
        assert_eq!(WeatherCategory::from_wmo_code(1), WeatherCategory::PartlyCloudy);
        assert_eq!(WeatherCategory::from_wmo_code(2), WeatherCategory::PartlyCloudy);
        assert_eq!(WeatherCategory::from_wmo_code(3), WeatherCategory::Cloudy);
    }

    #[test]
    fn wmo_code_fog_and_drizzle() {
        assert_eq!(WeatherCategory::from_wmo_code(45), WeatherCategory::Foggy);
        assert_eq!(WeatherCategory::from_wmo_code(48), WeatherCategory::Foggy);
        for code in [51, 53, 55, 56, 57] {
            assert_eq!(WeatherCategory::from_wmo_code(code), WeatherCategory::Rainy);
        }
    }

    #[test]
    fn wmo_code_rain_maps_to_stormy() {
        for code in [61, 63, 65, 66, 67, 80, 81, 82] {
            assert_eq!(WeatherCategory::from_wmo_code(code), WeatherCategory::Stormy);
        }
    }

    #[test]
    fn wmo_code_snow() {
        for code in [71, 73, 75, 77, 85, 86] {
            assert_eq!(WeatherCategory::from_wmo_code(code), WeatherCategory::Snowy);
        }
    }

    #[test]
    fn wmo_code_thunderstorm() {
        for code in [95, 96, 99] {
            assert_eq!(WeatherCategory::from_wmo_code(code), WeatherCategory::Thunderstorm);
        }
    }

    #[test]
    fn wmo_code_unknown_defaults_to_partly_cloudy() {
        assert_eq!(WeatherCategory::from_wmo_code(100), WeatherCategory::PartlyCloudy);
        assert_eq!(WeatherCategory::from_wmo_code(-1), WeatherCategory::PartlyCloudy);
    }
}
