// Monitor service - owns the console state and sequences every backend call
use crate::application::error::{MonitorError, MonitorResult};
use crate::application::status_backend::StatusBackend;
use crate::domain::filter::{filter_results, StatusFilter};
use crate::domain::input::{draft_text, flatten_rows, normalize};
use crate::domain::status::{AnalyticsSummary, HistoryPoint, UrlStatusRecord};
use crate::domain::tracker::KnownUrlSet;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything the console knows. Snapshot, analytics and history are only ever replaced whole.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    pub draft: String,
    pub submitted: Vec<String>,
    pub snapshot: Vec<UrlStatusRecord>,
    pub known: KnownUrlSet,
    pub analytics: Vec<AnalyticsSummary>,
    pub history: Vec<HistoryPoint>,
    pub filter: StatusFilter,
    /// Copied from the submission flag when the state is read.
    pub loading: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub submitted: Vec<String>,
    pub acknowledged: usize,
}

// Which dependent slots to refetch after a state transition
#[derive(Debug, Clone, Copy, Default)]
struct Refetch {
    analytics: bool,
    history: bool,
}

// Clears the submission flag however the submission ends, including when its future is dropped
struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct MonitorService {
    backend: Arc<dyn StatusBackend>,
    state: Arc<RwLock<MonitorState>>,
    loading: Arc<AtomicBool>,
}

impl MonitorService {
    pub fn new(backend: Arc<dyn StatusBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(MonitorState::default())),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Copy of the current state for rendering.
    pub async fn state(&self) -> MonitorState {
        let mut state = self.state.read().await.clone();
        state.loading = self.is_loading();
        state
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Snapshot records matching `mode`, or the stored filter when `None`.
    pub async fn filtered_results(&self, mode: Option<StatusFilter>) -> Vec<UrlStatusRecord> {
        let state = self.state.read().await;
        let mode = mode.unwrap_or(state.filter);
        filter_results(&state.snapshot, mode).into_iter().cloned().collect()
    }

    pub async fn filter(&self) -> StatusFilter {
        self.state.read().await.filter
    }

    pub async fn set_draft(&self, text: String) {
        self.state.write().await.draft = text;
    }

    pub async fn set_filter(&self, mode: StatusFilter) {
        self.state.write().await.filter = mode;
    }

    /// Replace the draft with the non-empty cells of parsed CSV rows. Nothing is submitted.
    pub async fn import_rows(&self, rows: Vec<Vec<String>>) -> Vec<String> {
        let cells = flatten_rows(rows);
        tracing::info!("Imported {} entries from CSV", cells.len());

        self.state.write().await.draft = draft_text(&cells);
        cells
    }

    /// Normalize the draft (or `text`, which becomes the draft), submit it, then refresh.
    pub async fn submit(&self, text: Option<String>) -> MonitorResult<SubmitOutcome> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(MonitorError::SubmissionInProgress);
        }
        let _loading = LoadingGuard(self.loading.clone());

        let urls = {
            let mut state = self.state.write().await;
            if let Some(text) = text {
                state.draft = text;
            }
            let urls = normalize(&state.draft);
            state.submitted = urls.clone();
            urls
        };

        tracing::info!("Submitting {} URLs for checking", urls.len());
        self.submit_then_refresh(urls).await
    }

    async fn submit_then_refresh(&self, urls: Vec<String>) -> MonitorResult<SubmitOutcome> {
        // The refresh must not start until the backend has accepted the submission
        let ack = match self.backend.submit_urls(&urls).await {
            Ok(ack) => ack,
            Err(e) => return Err(self.record_failure("submit", e).await),
        };
        tracing::debug!("Backend acknowledged {} results", ack.results.len());

        self.refresh().await?;

        Ok(SubmitOutcome {
            submitted: urls,
            acknowledged: ack.results.len(),
        })
    }

    /// Fetch the latest statuses and re-derive everything that depends on them.
    pub async fn refresh(&self) -> MonitorResult<()> {
        let snapshot = match self.backend.fetch_latest_statuses().await {
            Ok(snapshot) => snapshot,
            Err(e) => return Err(self.record_failure("latest statuses", e).await),
        };

        let refetch = {
            let mut state = self.state.write().await;
            let previous_check = state
                .known
                .selected()
                .and_then(|url| last_checked(&state.snapshot, url));

            let transition = state.known.apply_snapshot(&snapshot);
            state.snapshot = snapshot;
            state.last_error = None;

            let current_check = state
                .known
                .selected()
                .and_then(|url| last_checked(&state.snapshot, url));

            if state.known.urls().is_empty() {
                state.analytics.clear();
            }
            // History of a previous selection must never show under a new one
            if state.known.selected().is_none() || transition.selection_changed {
                state.history.clear();
            }

            tracing::info!(
                "Snapshot applied: {} URLs, set changed: {}, selection: {:?}",
                state.known.urls().len(),
                transition.set_changed,
                state.known.selected()
            );

            Refetch {
                analytics: !state.known.urls().is_empty(),
                history: state.known.selected().is_some()
                    && (transition.selection_changed || previous_check != current_check),
            }
        };

        self.refetch_dependents(refetch).await
    }

    /// Select a known URL and load its history.
    pub async fn select(&self, url: &str) -> MonitorResult<()> {
        let changed = {
            let mut state = self.state.write().await;
            let changed = state.known.select(url);
            if changed.is_some() {
                state.last_error = None;
            }
            if changed == Some(true) {
                state.history.clear();
            }
            changed
        };
        match changed {
            None => Err(MonitorError::UnknownUrl(url.to_string())),
            Some(false) => Ok(()),
            Some(true) => {
                self.refetch_dependents(Refetch {
                    analytics: false,
                    history: true,
                })
                .await
            }
        }
    }

    /// Delete everything on the backend, then reset local state. The filter is kept.
    pub async fn clear(&self) -> MonitorResult<()> {
        let ack = match self.backend.clear_all().await {
            Ok(ack) => ack,
            Err(e) => return Err(self.record_failure("clear", e).await),
        };

        let mut state = self.state.write().await;
        state.snapshot.clear();
        state.known.clear();
        state.analytics.clear();
        state.history.clear();
        state.submitted.clear();
        state.draft.clear();
        state.last_error = None;
        tracing::info!("Cleared all URLs (backend success: {})", ack.success);
        Ok(())
    }

    // History and analytics are independent slots, fetched concurrently
    async fn refetch_dependents(&self, refetch: Refetch) -> MonitorResult<()> {
        let (urls, generation, selected) = {
            let state = self.state.read().await;
            (
                state.known.urls().to_vec(),
                state.known.generation(),
                state.known.selected().map(str::to_string),
            )
        };

        let analytics_fut = async {
            if refetch.analytics && !urls.is_empty() {
                Some(self.backend.fetch_analytics(&urls).await)
            } else {
                None
            }
        };
        let history_fut = async {
            match (&selected, refetch.history) {
                (Some(url), true) => Some(self.backend.fetch_history(url).await),
                _ => None,
            }
        };
        let (analytics, history) = tokio::join!(analytics_fut, history_fut);

        let mut first_error = None;

        if let Some(result) = analytics {
            match result {
                Ok(analytics) => {
                    let mut state = self.state.write().await;
                    if state.known.generation() == generation {
                        state.analytics = analytics;
                    } else {
                        tracing::debug!("Discarding analytics for stale generation {}", generation);
                    }
                }
                Err(e) => first_error = Some(self.record_failure("analytics", e).await),
            }
        }

        if let (Some(result), Some(url)) = (history, selected) {
            match result {
                Ok(history) => {
                    let mut state = self.state.write().await;
                    if state.known.selected() == Some(url.as_str()) {
                        state.history = history;
                    } else {
                        tracing::debug!("Discarding history for deselected {}", url);
                    }
                }
                Err(e) => {
                    let e = self.record_failure("history", e).await;
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                self.state.write().await.last_error = None;
                Ok(())
            }
        }
    }

    async fn record_failure(&self, action: &str, error: MonitorError) -> MonitorError {
        tracing::warn!("Failed to {}: {}", action, error);
        self.state.write().await.last_error = Some(error.to_string());
        error
    }
}

fn last_checked(snapshot: &[UrlStatusRecord], url: &str) -> Option<DateTime<Utc>> {
    snapshot
        .iter()
        .find(|r| r.url == url)
        .and_then(|r| r.last_checked)
}
