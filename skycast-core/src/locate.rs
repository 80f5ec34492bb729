//! The location-resolution cascade.
//!
//! Sources are tried in strict priority order, stopping at the first
//! success: the primary position capability, then IP-based geolocation.
//! Manual search selections bypass the cascade entirely and become a
//! [`ResolvedLocation`] via [`ResolvedLocation::from_candidate`].
//!
//! Each step's failure is caught locally and converted into a fallback
//! trigger; only exhaustion of both automatic steps surfaces an error.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{LocateError, PositionError};
use crate::model::{Coordinates, SuggestionCandidate};
use crate::source::ipapi::{IpLocation, IpLookupClient};

/// Which source produced the coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Position,
    IpLookup,
    Search,
}

/// The outcome of location resolution: coordinates plus an optional display
/// name. A missing name forces reverse geocoding downstream; a present name
/// (IP lookup, search) skips it.
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub display_name: Option<String>,
    pub source: LocationSource,
}

impl ResolvedLocation {
    /// A manual search selection supplies coordinates and name directly,
    /// superseding any automatic resolution.
    pub fn from_candidate(candidate: &SuggestionCandidate) -> Self {
        Self {
            coordinates: candidate.coordinates(),
            display_name: Some(candidate.label()),
            source: LocationSource::Search,
        }
    }
}

/// The primary position capability, as an awaitable operation.
///
/// The capability distinguishes being absent from the environment
/// ([`PositionError::Unsupported`]) from being present but failing.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn position(&self) -> Result<Coordinates, PositionError>;
}

/// IP-geolocation as a seam, so the cascade can be exercised without a
/// network.
#[async_trait]
pub trait IpLocator: Send + Sync {
    async fn locate(&self) -> Result<IpLocation, crate::error::FetchError>;
}

#[async_trait]
impl IpLocator for IpLookupClient {
    async fn locate(&self) -> Result<IpLocation, crate::error::FetchError> {
        self.lookup().await
    }
}

/// Position capability backed by coordinates pinned in the config file,
/// standing in for a platform positioning service.
#[derive(Debug, Clone, Default)]
pub struct FixedPosition {
    coords: Option<Coordinates>,
}

impl FixedPosition {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }

    pub fn from_config(config: &Config) -> Self {
        Self { coords: config.position }
    }
}

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn position(&self) -> Result<Coordinates, PositionError> {
        let coords = self.coords.ok_or(PositionError::Unsupported)?;
        if !coords.is_valid() {
            return Err(PositionError::PositionUnavailable(format!(
                "pinned coordinates out of range: {coords}"
            )));
        }
        Ok(coords)
    }
}

/// Run the automatic cascade: position capability, then IP lookup.
///
/// A position success carries no display name (reverse geocoding resolves
/// one downstream); an IP-lookup success carries the reported city. When
/// both fail the caller gets [`LocateError::Exhausted`] and must inform the
/// user visibly; manual search remains usable.
pub async fn resolve(
    position: &dyn PositionProvider,
    ip: &dyn IpLocator,
) -> Result<ResolvedLocation, LocateError> {
    let position_err = match position.position().await {
        Ok(coordinates) => {
            info!(%coordinates, "resolved location from position capability");
            return Ok(ResolvedLocation {
                coordinates,
                display_name: None,
                source: LocationSource::Position,
            });
        }
        Err(err) => {
            match err {
                PositionError::Unsupported => {
                    debug!("position capability unsupported; falling back to ip lookup");
                }
                ref failure => {
                    warn!(error = %failure, "position lookup failed; falling back to ip lookup");
                }
            }
            err
        }
    };

    match ip.locate().await {
        Ok(location) => {
            info!(
                coordinates = %location.coordinates,
                city = location.city.as_deref().unwrap_or("-"),
                "resolved location from ip lookup"
            );
            Ok(ResolvedLocation {
                coordinates: location.coordinates,
                display_name: location.city,
                source: LocationSource::IpLookup,
            })
        }
        Err(ip_err) => Err(LocateError::Exhausted {
            position: position_err,
            ip_lookup: ip_err,
        }),
    }
}
