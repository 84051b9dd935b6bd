//! Refetch decisions for store fetch entry points.
//!
//! Each store remembers when it was last populated and with which request
//! shape. A fetch entry point asks [`FetchState::decide`] whether to hit the
//! network, serve cached data, or serve cached data while refreshing
//! silently in the background.

use std::time::{Duration, Instant};

/// What a `fetch_*` entry point should do with the current cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    /// Data is fresh for the requested shape; use `items` unmodified.
    UseCached,
    /// Data is usable but aging; return it and refresh without a loading
    /// indicator. Best-effort only.
    RefreshInBackground,
    /// The cache cannot be trusted; a blocking fetch is required.
    Refetch,
}

/// Freshness thresholds for one store.
///
/// `silent_after < fresh_for`: inside `silent_after` the cache is served
/// as-is, between the two a background refresh is kicked, past `fresh_for`
/// the fetch blocks.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessWindow {
    pub fresh_for: Duration,
    pub silent_after: Duration,
}

impl FreshnessWindow {
    pub fn new(fresh_for: Duration, silent_after: Duration) -> Self {
        Self {
            fresh_for,
            silent_after: silent_after.min(fresh_for),
        }
    }
}

/// Per-store fetch bookkeeping: when the last population happened and the
/// request shape that produced it. `F` is the store's filter type, compared
/// by (deep) equality.
#[derive(Debug, Clone)]
pub struct FetchState<F = ()> {
    last_fetched_at: Option<Instant>,
    last_filters: Option<F>,
}

impl<F> Default for FetchState<F> {
    fn default() -> Self {
        Self {
            last_fetched_at: None,
            last_filters: None,
        }
    }
}

impl<F: PartialEq> FetchState<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&self, window: FreshnessWindow, filters: &F, force: bool) -> FetchDecision {
        self.decide_at(Instant::now(), window, filters, force)
    }

    pub fn decide_at(
        &self,
        now: Instant,
        window: FreshnessWindow,
        filters: &F,
        force: bool,
    ) -> FetchDecision {
        if force {
            return FetchDecision::Refetch;
        }

        let Some(fetched_at) = self.last_fetched_at else {
            return FetchDecision::Refetch;
        };

        match &self.last_filters {
            Some(last) if *last == *filters => {}
            _ => return FetchDecision::Refetch,
        }

        let elapsed = now.saturating_duration_since(fetched_at);
        if elapsed > window.fresh_for {
            FetchDecision::Refetch
        } else if elapsed > window.silent_after {
            FetchDecision::RefreshInBackground
        } else {
            FetchDecision::UseCached
        }
    }

    /// Record a completed population with the request shape that produced it.
    pub fn mark_fetched(&mut self, filters: F) {
        self.mark_fetched_at(Instant::now(), filters);
    }

    pub fn mark_fetched_at(&mut self, now: Instant, filters: F) {
        self.last_fetched_at = Some(now);
        self.last_filters = Some(filters);
    }

    pub fn has_fetched(&self) -> bool {
        self.last_fetched_at.is_some()
    }

    pub fn last_filters(&self) -> Option<&F> {
        self.last_filters.as_ref()
    }

    /// Forget everything; the next decision is always `Refetch`.
    pub fn clear(&mut self) {
        self.last_fetched_at = None;
        self.last_filters = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> FreshnessWindow {
        FreshnessWindow::new(Duration::from_secs(300), Duration::from_secs(120))
    }

    #[test]
    fn never_fetched_means_refetch() {
        let state: FetchState<()> = FetchState::new();
        assert_eq!(state.decide(window(), &(), false), FetchDecision::Refetch);
    }

    #[test]
    fn force_overrides_fresh_cache() {
        let mut state: FetchState<()> = FetchState::new();
        state.mark_fetched(());
        assert_eq!(state.decide(window(), &(), true), FetchDecision::Refetch);
    }

    #[test]
    fn fresh_cache_with_matching_filters_is_used() {
        let now = Instant::now();
        let mut state: FetchState<&str> = FetchState::new();
        state.mark_fetched_at(now, "month=2026-08");
        let decision = state.decide_at(
            now + Duration::from_secs(30),
            window(),
            &"month=2026-08",
            false,
        );
        assert_eq!(decision, FetchDecision::UseCached);
    }

    #[test]
    fn changed_filters_refetch_even_inside_window() {
        let now = Instant::now();
        let mut state: FetchState<&str> = FetchState::new();
        state.mark_fetched_at(now, "month=2026-08");
        let decision = state.decide_at(
            now + Duration::from_secs(5),
            window(),
            &"month=2026-07",
            false,
        );
        assert_eq!(decision, FetchDecision::Refetch);
    }

    #[test]
    fn aging_cache_triggers_silent_refresh() {
        let now = Instant::now();
        let mut state: FetchState<()> = FetchState::new();
        state.mark_fetched_at(now, ());
        let decision = state.decide_at(now + Duration::from_secs(180), window(), &(), false);
        assert_eq!(decision, FetchDecision::RefreshInBackground);
    }

    #[test]
    fn expired_cache_refetches() {
        let now = Instant::now();
        let mut state: FetchState<()> = FetchState::new();
        state.mark_fetched_at(now, ());
        let decision = state.decide_at(now + Duration::from_secs(301), window(), &(), false);
        assert_eq!(decision, FetchDecision::Refetch);
    }

    #[test]
    fn clear_resets_to_refetch() {
        let mut state: FetchState<()> = FetchState::new();
        state.mark_fetched(());
        state.clear();
        assert!(!state.has_fetched());
        assert_eq!(state.decide(window(), &(), false), FetchDecision::Refetch);
    }
}
