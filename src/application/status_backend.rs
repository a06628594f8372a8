// Backend trait for the status-checking service
use crate::application::error::MonitorResult;
use crate::domain::status::{AnalyticsSummary, HistoryPoint, UrlStatusRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Acknowledgement of a submission, with any results the backend produced synchronously
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitAck {
    #[serde(default)]
    pub results: Vec<UrlStatusRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearAck {
    #[serde(default)]
    pub success: bool,
}

#[async_trait]
pub trait StatusBackend: Send + Sync {
    /// Queue checks for `urls`. Does not return the refreshed snapshot.
    async fn submit_urls(&self, urls: &[String]) -> MonitorResult<SubmitAck>;

    /// Latest known status per URL. A missing result list is an empty snapshot.
    async fn fetch_latest_statuses(&self) -> MonitorResult<Vec<UrlStatusRecord>>;

    /// Check history for exactly one URL, in backend order
    async fn fetch_history(&self, url: &str) -> MonitorResult<Vec<HistoryPoint>>;

    /// Uptime summaries for the full known set
    async fn fetch_analytics(&self, urls: &[String]) -> MonitorResult<Vec<AnalyticsSummary>>;

    /// Delete every URL and check stored by the backend. Irreversible.
    async fn clear_all(&self) -> MonitorResult<ClearAck>;
}
