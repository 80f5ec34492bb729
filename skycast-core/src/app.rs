//! Application state and the re-render contract.
//!
//! [`AppState`] is the single source of truth for presentation: it owns the
//! last successfully fetched snapshot and the active unit preferences, and
//! [`AppState::frame`] derives a fully converted view from them. This module
//! has no client access at all, so a unit change can never trigger a fetch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::model::{WeatherCategory, WeatherSnapshot};
use crate::source::geocoding::UNKNOWN_LOCATION;
use crate::units::{PrecipitationUnit, TemperatureUnit, UnitPreferences, WindUnit};

/// Current conditions converted into the active display units.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub category: WeatherCategory,
}

/// One day of the daily series, converted.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyView {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub category: WeatherCategory,
}

/// One hour of the hourly series, converted.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyView {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub category: WeatherCategory,
}

/// A display-ready view of the held snapshot: every value converted into
/// the active units, every code classified. Pure data; rendering it is the
/// presentation layer's business.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub place: String,
    pub units: UnitPreferences,
    pub current: CurrentView,
    pub daily: Vec<DailyView>,
    pub hourly: Vec<HourlyView>,
    pub fetched_at: DateTime<Utc>,
}

/// Holds the last successful snapshot and the unit preferences.
///
/// The snapshot is replaced wholesale on every successful fetch and left
/// untouched on a failed one, so previously shown data survives a refresh
/// error. Unit setters mutate preferences only; re-rendering happens by
/// calling [`AppState::frame`] again.
#[derive(Debug, Clone)]
pub struct AppState {
    units: UnitPreferences,
    snapshot: Option<WeatherSnapshot>,
    place: Option<String>,
}

impl AppState {
    pub fn new(units: UnitPreferences) -> Self {
        Self {
            units,
            snapshot: None,
            place: None,
        }
    }

    pub fn units(&self) -> UnitPreferences {
        self.units
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    /// Replace the held snapshot wholesale. Only called on fetch success.
    pub fn apply_snapshot(&mut self, snapshot: WeatherSnapshot, place: String) {
        self.snapshot = Some(snapshot);
        self.place = Some(place);
    }

    pub fn set_units(&mut self, units: UnitPreferences) {
        self.units = units;
    }

    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) {
        self.units.temperature = unit;
    }

    pub fn set_wind_unit(&mut self, unit: WindUnit) {
        self.units.wind = unit;
    }

    pub fn set_precipitation_unit(&mut self, unit: PrecipitationUnit) {
        self.units.precipitation = unit;
    }

    /// Derive the display view from the held snapshot and active units.
    ///
    /// Recomputes every affected value from the stored metric payload; no
    /// network is involved. With no snapshot held there is nothing to
    /// re-render and the result is `None` (the preference change itself is
    /// still recorded).
    pub fn frame(&self) -> Option<DisplayFrame> {
        let snapshot = self.snapshot.as_ref()?;
        let units = self.units;

        let current = CurrentView {
            time: snapshot.current.time,
            temperature: units.temperature.from_celsius(snapshot.current.temperature_c),
            apparent_temperature: units
                .temperature
                .from_celsius(snapshot.current.apparent_temperature_c),
            humidity_pct: snapshot.current.humidity_pct,
            wind_speed: units.wind.from_kmh(snapshot.current.wind_speed_kmh),
            precipitation: units
                .precipitation
                .from_mm(snapshot.current.precipitation_mm),
            category: WeatherCategory::from_wmo_code(snapshot.current.weather_code),
        };

        let daily = snapshot
            .daily
            .iter()
            .map(|day| DailyView {
                date: day.date,
                high: units.temperature.from_celsius(day.temperature_max_c),
                low: units.temperature.from_celsius(day.temperature_min_c),
                category: WeatherCategory::from_wmo_code(day.weather_code),
            })
            .collect();

        let hourly = snapshot
            .hourly
            .iter()
            .map(|hour| HourlyView {
                time: hour.time,
                temperature: units.temperature.from_celsius(hour.temperature_c),
                category: WeatherCategory::from_wmo_code(hour.weather_code),
            })
            .collect();

        Some(DisplayFrame {
            place: self
                .place
                .clone()
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            units,
            current,
            daily,
            hourly,
            fetched_at: snapshot.fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, DailyEntry, HourlyEntry};
    use chrono::NaiveDate;

    fn snapshot() -> WeatherSnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let noon = date.and_hms_opt(12, 0, 0).unwrap();

        WeatherSnapshot {
            current: CurrentConditions {
                time: noon,
                temperature_c: 20.0,
                apparent_temperature_c: 18.5,
                humidity_pct: 65,
                wind_speed_kmh: 100.0,
                precipitation_mm: 25.4,
                weather_code: 63,
            },
            daily: vec![DailyEntry {
                date,
                temperature_max_c: 25.0,
                temperature_min_c: 15.0,
                weather_code: 0,
            }],
            hourly: vec![HourlyEntry {
                time: noon,
                temperature_c: 21.0,
                weather_code: 100,
            }],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn fahrenheit_toggle_recomputes_from_the_held_snapshot() {
        let mut state = AppState::new(UnitPreferences::metric());
        state.apply_snapshot(snapshot(), "Testville, Testland".to_string());

        state.set_temperature_unit(TemperatureUnit::Fahrenheit);
        let frame = state.frame().expect("a held snapshot renders");

        // 20 * 9/5 + 32 = 68, derived without any network access.
        assert!((frame.current.temperature - 68.0).abs() < 1e-9);
        assert!((frame.daily[0].high - 77.0).abs() < 1e-9);
        assert!((frame.daily[0].low - 59.0).abs() < 1e-9);
    }

    #[test]
    fn metric_frame_passes_values_through() {
        let mut state = AppState::new(UnitPreferences::metric());
        state.apply_snapshot(snapshot(), "Testville".to_string());

        let frame = state.frame().unwrap();
        assert!((frame.current.temperature - 20.0).abs() < 1e-9);
        assert!((frame.current.wind_speed - 100.0).abs() < 1e-9);
        assert!((frame.current.precipitation - 25.4).abs() < 1e-9);
        assert_eq!(frame.place, "Testville");
    }

    #[test]
    fn wind_and_precipitation_convert_independently() {
        let mut state = AppState::new(UnitPreferences::metric());
        state.apply_snapshot(snapshot(), "Testville".to_string());

        state.set_wind_unit(WindUnit::Mph);
        state.set_precipitation_unit(PrecipitationUnit::Inches);
        let frame = state.frame().unwrap();

        assert!((frame.current.wind_speed - 62.1371).abs() < 1e-6);
        assert!((frame.current.precipitation - 1.0).abs() < 1e-4);
        // Temperature stays metric.
        assert!((frame.current.temperature - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unit_change_without_a_snapshot_updates_preferences_only() {
        let mut state = AppState::new(UnitPreferences::metric());

        state.set_temperature_unit(TemperatureUnit::Fahrenheit);

        assert!(state.frame().is_none());
        assert_eq!(state.units().temperature, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn snapshot_replacement_is_wholesale() {
        let mut state = AppState::new(UnitPreferences::metric());
        state.apply_snapshot(snapshot(), "Old Town".to_string());

        let mut next = snapshot();
        next.daily.clear();
        next.current.temperature_c = -3.0;
        state.apply_snapshot(next, "New Town".to_string());

        let frame = state.frame().unwrap();
        assert_eq!(frame.place, "New Town");
        assert!(frame.daily.is_empty());
        assert!((frame.current.temperature - -3.0).abs() < 1e-9);
    }

    #[test]
    fn frame_classifies_weather_codes() {
        let mut state = AppState::new(UnitPreferences::metric());
        state.apply_snapshot(snapshot(), "Testville".to_string());

        let frame = state.frame().unwrap();
        assert_eq!(frame.current.category, WeatherCategory::Stormy);
        assert_eq!(frame.daily[0].category, WeatherCategory::Clear);
        // Unknown code in the hourly series falls back to the default.
        assert_eq!(frame.hourly[0].category, WeatherCategory::PartlyCloudy);
    }
}
