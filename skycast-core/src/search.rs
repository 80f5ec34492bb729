//! The search / suggestion service.
//!
//! Suggestion queries are gated twice before any request is issued: the
//! query must reach a minimum length, and the input burst must have
//! quiesced for the debounce window. Overlapping requests follow a
//! last-issued-wins policy: the debouncer hands out generations, and a
//! response is only applied while its generation is still the latest.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::{FetchError, SearchError};
use crate::model::SuggestionCandidate;
use crate::source::geocoding::SearchClient;

/// Timer-based suppression window that resets on each new input event.
///
/// Each input bumps the generation; a waiter that sleeps through the window
/// learns afterwards whether it is still the latest. Only the latest
/// generation may issue a request.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: AtomicU64::new(0),
        }
    }

    /// Record an input event and return its generation.
    pub fn note_input(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while `generation` is still the newest input seen.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Wait out the quiet period for a fresh input event.
    ///
    /// Returns the generation when the input survived the window, or `None`
    /// when a newer input superseded it mid-wait.
    pub async fn settle(&self) -> Option<u64> {
        let generation = self.note_input();
        tokio::time::sleep(self.window).await;
        self.is_current(generation).then_some(generation)
    }
}

/// Seam over the forward-geocoding search, so the gating logic can be
/// exercised without a network.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionCandidate>, FetchError>;
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionCandidate>, FetchError> {
        SearchClient::search(self, query, limit).await
    }
}

/// Debounced, minimum-length-gated suggestion queries plus direct
/// submission.
pub struct SuggestionService {
    backend: Box<dyn SearchBackend>,
    debouncer: Debouncer,
    min_query_len: usize,
    limit: usize,
}

impl SuggestionService {
    pub fn new(config: &Config) -> Self {
        Self::with_backend(
            Box::new(SearchClient::new(config.language.clone())),
            config.debounce_window(),
            config.min_query_len,
            config.suggestion_limit,
        )
    }

    pub fn with_backend(
        backend: Box<dyn SearchBackend>,
        window: Duration,
        min_query_len: usize,
        limit: usize,
    ) -> Self {
        Self {
            backend,
            debouncer: Debouncer::new(window),
            min_query_len,
            limit,
        }
    }

    /// Feed one input event of the suggestion stream.
    ///
    /// - `Ok(None)`: superseded by newer input mid-wait; the caller keeps
    ///   whatever it is currently showing.
    /// - `Ok(Some(vec))`: the candidate list to show now; an empty list
    ///   clears any shown candidates (query too short, or no matches).
    pub async fn suggest(
        &self,
        query: &str,
    ) -> Result<Option<Vec<SuggestionCandidate>>, SearchError> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            debug!(query, "query below minimum length; clearing candidates");
            return Ok(Some(Vec::new()));
        }

        let Some(generation) = self.debouncer.settle().await else {
            debug!(query, "input superseded during the quiet period");
            return Ok(None);
        };

        let candidates = self.backend.search(query, self.limit).await?;

        // A still slower consumer may have typed meanwhile; a stale response
        // must never overwrite a newer one.
        if !self.debouncer.is_current(generation) {
            debug!(query, "response arrived stale; discarding");
            return Ok(None);
        }

        Ok(Some(candidates))
    }

    /// Submit a query directly, bypassing the debounce, for a single best
    /// match. Zero matches is a distinct, user-visible outcome.
    pub async fn submit(&self, query: &str) -> Result<SuggestionCandidate, SearchError> {
        let query = query.trim();
        let candidates = self.backend.search(query, 1).await?;

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::NoResults(query.to_string()))
    }
}
