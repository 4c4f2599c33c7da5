//! Search-as-you-type over a [`PlaceSearch`] collaborator.
//!
//! Each keystroke calls [`PlaceSearchSession::query`]. A query waits out the
//! debounce window, then searches; if a newer query arrived in the meantime
//! (before or after the network call) its result is discarded.

use crate::model::DeliveryLocation;
use crate::providers::{PlaceCandidate, PlaceSearch};
use bitzy_core::config::{SearchConfig, MIN_DEBOUNCE_MS};
use bitzy_geo::ServiceArea;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Session parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Input quiescence required before searching (at least 500 ms)
    pub debounce: Duration,
    /// Shorter queries clear the results without searching
    pub min_query_chars: usize,
    /// Area used to annotate candidates
    pub service_area: ServiceArea,
    /// Area label for selections lacking city and town
    pub fallback_area: String,
}

impl SearchSettings {
    /// Builds settings from the `[search]` section; the debounce is clamped up to 500 ms.
    pub fn from_config(config: &SearchConfig, service_area: ServiceArea) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms.max(MIN_DEBOUNCE_MS)),
            min_query_chars: config.min_query_chars,
            service_area,
            fallback_area: config.fallback_area.clone(),
        }
    }
}

/// A candidate annotated with its deliverability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    /// The raw search hit
    pub candidate: PlaceCandidate,
    /// Distance from the depot
    pub distance_km: f64,
    /// Inside the service area
    pub can_deliver: bool,
}

/// Outcome of one [`PlaceSearchSession::query`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// This query was current when it finished; its results were applied
    Applied(Vec<CandidateView>),
    /// A newer query took over; nothing was applied
    Superseded,
}

/// Debounced, self-superseding place search.
#[derive(Debug)]
pub struct PlaceSearchSession<P> {
    provider: P,
    settings: SearchSettings,
    generation: AtomicU64,
    results: watch::Sender<Vec<CandidateView>>,
}

impl<P: PlaceSearch> PlaceSearchSession<P> {
    /// Creates an empty session.
    pub fn new(provider: P, settings: SearchSettings) -> Self {
        let (results, _) = watch::channel(Vec::new());
        Self {
            provider,
            settings,
            generation: AtomicU64::new(0),
            results,
        }
    }

    /// Handles the latest input text.
    pub async fn query(&self, text: &str) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.trim();

        if query.chars().count() < self.settings.min_query_chars {
            self.results.send_replace(Vec::new());
            return SearchOutcome::Applied(Vec::new());
        }

        tokio::time::sleep(self.settings.debounce).await;
        if !self.is_current(generation) {
            return SearchOutcome::Superseded;
        }

        let candidates = match self.provider.search(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, query, "Place search failed");
                Vec::new()
            }
        };

        if !self.is_current(generation) {
            debug!(generation, query, "Discarding stale search response");
            return SearchOutcome::Superseded;
        }

        let views: Vec<CandidateView> = candidates.into_iter().map(|c| self.annotate(c)).collect();
        debug!(query, count = views.len(), "Search results applied");
        self.results.send_replace(views.clone());
        SearchOutcome::Applied(views)
    }

    /// Drops current results and invalidates pending queries.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.results.send_replace(Vec::new());
    }

    /// Most recently applied results.
    pub fn results(&self) -> Vec<CandidateView> {
        self.results.borrow().clone()
    }

    /// Receives every applied result set.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CandidateView>> {
        self.results.subscribe()
    }

    /// Turns a picked candidate into a delivery location.
    pub fn select(&self, candidate: &PlaceCandidate) -> DeliveryLocation {
        DeliveryLocation::new(
            candidate.name.clone(),
            candidate.address.locality_or(&self.settings.fallback_area),
            candidate.coordinate,
        )
    }

    fn annotate(&self, candidate: PlaceCandidate) -> CandidateView {
        let area = &self.settings.service_area;
        CandidateView {
            distance_km: area.distance_to(&candidate.coordinate),
            can_deliver: area.contains(&candidate.coordinate),
            candidate,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
