//! Display-unit preferences and the pure conversions between metric raw
//! values and the selected display units.
//!
//! All stored weather data is metric; conversion happens only at view time.

use serde::{Deserialize, Serialize};

pub const KMH_TO_MPH: f64 = 0.621371;
pub const MM_TO_INCHES: f64 = 0.0393701;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * KMH_TO_MPH
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph / KMH_TO_MPH
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm * MM_TO_INCHES
}

pub fn inches_to_mm(inches: f64) -> f64 {
    inches / MM_TO_INCHES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Convert a raw Celsius value into this display unit.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Kmh,
    Mph,
}

impl WindUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindUnit::Kmh => "kmh",
            WindUnit::Mph => "mph",
        }
    }

    pub const fn all() -> &'static [WindUnit] {
        &[WindUnit::Kmh, WindUnit::Mph]
    }

    pub fn toggled(self) -> Self {
        match self {
            WindUnit::Kmh => WindUnit::Mph,
            WindUnit::Mph => WindUnit::Kmh,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            WindUnit::Kmh => "km/h",
            WindUnit::Mph => "mph",
        }
    }

    /// Convert a raw km/h value into this display unit.
    pub fn from_kmh(&self, kmh: f64) -> f64 {
        match self {
            WindUnit::Kmh => kmh,
            WindUnit::Mph => kmh_to_mph(kmh),
        }
    }
}

impl std::fmt::Display for WindUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WindUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "kmh" | "km/h" => Ok(WindUnit::Kmh),
            "mph" => Ok(WindUnit::Mph),
            _ => Err(anyhow::anyhow!(
                "Unknown wind unit '{value}'. Supported units: kmh, mph."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    Inches,
}

impl PrecipitationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationUnit::Millimeters => "mm",
            PrecipitationUnit::Inches => "inches",
        }
    }

    pub const fn all() -> &'static [PrecipitationUnit] {
        &[PrecipitationUnit::Millimeters, PrecipitationUnit::Inches]
    }

    pub fn toggled(self) -> Self {
        match self {
            PrecipitationUnit::Millimeters => PrecipitationUnit::Inches,
            PrecipitationUnit::Inches => PrecipitationUnit::Millimeters,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PrecipitationUnit::Millimeters => "mm",
            PrecipitationUnit::Inches => "in",
        }
    }

    /// Convert a raw millimeter value into this display unit.
    pub fn from_mm(&self, mm: f64) -> f64 {
        match self {
            PrecipitationUnit::Millimeters => mm,
            PrecipitationUnit::Inches => mm_to_inches(mm),
        }
    }
}

impl std::fmt::Display for PrecipitationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PrecipitationUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "mm" | "millimeters" => Ok(PrecipitationUnit::Millimeters),
            "inches" | "in" => Ok(PrecipitationUnit::Inches),
            _ => Err(anyhow::anyhow!(
                "Unknown precipitation unit '{value}'. Supported units: mm, inches."
            )),
        }
    }
}

/// The process-wide display-unit selection.
///
/// Mutable only via explicit user action; lives for the session. Initial
/// values may come from the config file, but changes are never written back
/// implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitPreferences {
    pub temperature: TemperatureUnit,
    pub wind: WindUnit,
    pub precipitation: PrecipitationUnit,
}

impl UnitPreferences {
    pub fn metric() -> Self {
        Self::default()
    }

    pub fn imperial() -> Self {
        Self {
            temperature: TemperatureUnit::Fahrenheit,
            wind: WindUnit::Mph,
            precipitation: PrecipitationUnit::Inches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn celsius_fahrenheit_reference_points() {
        assert!((celsius_to_fahrenheit(20.0) - 68.0).abs() < EPS);
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < EPS);
        assert!((celsius_to_fahrenheit(-40.0) - -40.0).abs() < EPS);
    }

    #[test]
    fn conversion_round_trips() {
        for v in [-12.5, 0.0, 7.3, 100.0] {
            assert!((fahrenheit_to_celsius(celsius_to_fahrenheit(v)) - v).abs() < EPS);
            assert!((mph_to_kmh(kmh_to_mph(v)) - v).abs() < EPS);
            assert!((inches_to_mm(mm_to_inches(v)) - v).abs() < EPS);
        }
    }

    #[test]
    fn unit_as_str_roundtrip() {
        for unit in TemperatureUnit::all() {
            assert_eq!(*unit, TemperatureUnit::try_from(unit.as_str()).unwrap());
        }
        for unit in WindUnit::all() {
            assert_eq!(*unit, WindUnit::try_from(unit.as_str()).unwrap());
        }
        for unit in PrecipitationUnit::all() {
            assert_eq!(*unit, PrecipitationUnit::try_from(unit.as_str()).unwrap());
        }
    }

    #[test]
    fn unknown_unit_error() {
        let err = TemperatureUnit::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }

    #[test]
    fn toggling_is_an_involution() {
        assert_eq!(TemperatureUnit::Celsius.toggled().toggled(), TemperatureUnit::Celsius);
        assert_eq!(WindUnit::Mph.toggled().toggled(), WindUnit::Mph);
        assert_eq!(
            PrecipitationUnit::Inches.toggled().toggled(),
            PrecipitationUnit::Inches
        );
    }

    #[test]
    fn display_conversion_respects_selected_unit() {
        assert!((TemperatureUnit::Fahrenheit.from_celsius(20.0) - 68.0).abs() < EPS);
        assert!((TemperatureUnit::Celsius.from_celsius(20.0) - 20.0).abs() < EPS);
        assert!((WindUnit::Mph.from_kmh(100.0) - 62.1371).abs() < 1e-6);
        assert!((PrecipitationUnit::Inches.from_mm(25.4) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn defaults_are_metric() {
        let prefs = UnitPreferences::default();
        assert_eq!(prefs, UnitPreferences::metric());
        assert_eq!(prefs.temperature, TemperatureUnit::Celsius);
        assert_eq!(prefs.wind, WindUnit::Kmh);
        assert_eq!(prefs.precipitation, PrecipitationUnit::Millimeters);
    }
}
