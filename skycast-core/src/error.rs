//! Error taxonomy for the resolution and fetch pipeline.
//!
//! Every failure is caught at the boundary of the operation that produced it
//! and converted into a fallback action, a substituted default, or a typed
//! error the presentation layer maps to a user-visible notice. Nothing here
//! is allowed to propagate as an unhandled fault.

use thiserror::Error;

/// Failures of the primary position capability.
///
/// `Unsupported` means the capability is absent from the environment;
/// the other variants mean the capability exists but failed.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("position capability is not available in this environment")]
    Unsupported,
    #[error("position permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Failures of an outbound HTTP call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The automatic location cascade ran out of sources.
///
/// Manual search remains usable after this; only the automatic path is dead.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("automatic location resolution failed (position: {position}; ip lookup: {ip_lookup})")]
    Exhausted {
        position: PositionError,
        ip_lookup: FetchError,
    },
}

/// Failures of the forward-geocoding search.
///
/// `NoResults` and `Api` are distinct on purpose: the first yields a
/// "not found" notice, the second a "search failed" notice.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no matching place found for '{0}'")]
    NoResults(String),
    #[error(transparent)]
    Api(#[from] FetchError),
}
