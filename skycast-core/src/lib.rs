//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - The location-resolution cascade (position capability → IP lookup → search)
//! - The weather fetcher and its reverse-geocoding fallback
//! - The debounced search / suggestion service
//! - Unit conversion and the application-state re-render contract
//! - Configuration handling
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod locate;
pub mod model;
pub mod search;
pub mod source;
pub mod units;

pub use app::{AppState, DisplayFrame};
pub use config::Config;
pub use error::{FetchError, LocateError, PositionError, SearchError};
pub use fetch::WeatherFetcher;
pub use locate::{FixedPosition, LocationSource, PositionProvider, ResolvedLocation, resolve};
pub use model::{Coordinates, SuggestionCandidate, WeatherCategory, WeatherSnapshot};
pub use search::{Debouncer, SuggestionService};
pub use units::{PrecipitationUnit, TemperatureUnit, UnitPreferences, WindUnit};
