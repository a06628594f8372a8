// HTTP implementation of the status backend
use crate::application::error::{MonitorError, MonitorResult};
use crate::application::status_backend::{ClearAck, StatusBackend, SubmitAck};
use crate::domain::status::{AnalyticsSummary, HistoryPoint, UrlStatus, UrlStatusRecord};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpStatusBackend {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CheckUrlsRequest<'a> {
    urls: &'a [String],
}

// Missing list fields are read as empty, never as errors
#[derive(Debug, Default, Deserialize)]
struct LatestStatusesResponse {
    #[serde(default)]
    results: Option<Vec<UrlStatusRecord>>,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Option<Vec<HistoryPoint>>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyticsResponse {
    #[serde(default)]
    analytics: Option<Vec<AnalyticsSummary>>,
}

impl HttpStatusBackend {
    pub fn new(base_url: &str, timeout: Duration) -> MonitorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MonitorError::Transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn history_url(&self, url: &str) -> String {
        format!("{}?url={}", self.endpoint("/url_history"), urlencoding::encode(url))
    }

    fn analytics_url(&self, urls: &[String]) -> String {
        let encoded: Vec<_> = urls.iter().map(|u| urlencoding::encode(u)).collect();
        format!("{}?urls={}", self.endpoint("/analytics"), encoded.join(","))
    }

    async fn send<T: DeserializeOwned + Default>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> MonitorResult<T> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(MonitorError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(MonitorError::Transport)?;

        if !status.is_success() {
            return Err(MonitorError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&body).map_err(|e| MonitorError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StatusBackend for HttpStatusBackend {
    async fn submit_urls(&self, urls: &[String]) -> MonitorResult<SubmitAck> {
        tracing::debug!("POST /check_urls with {} urls", urls.len());
        let request = self
            .client
            .post(self.endpoint("/check_urls"))
            .json(&CheckUrlsRequest { urls });
        self.send(request).await
    }

    async fn fetch_latest_statuses(&self) -> MonitorResult<Vec<UrlStatusRecord>> {
        let request = self.client.get(self.endpoint("/latest_statuses"));
        let response: LatestStatusesResponse = self.send(request).await?;
        let results = response.results.unwrap_or_default();

        let unknown = results
            .iter()
            .filter(|r| r.status == UrlStatus::Unknown)
            .count();
        if unknown > 0 {
            tracing::warn!("{} records carry an unrecognized status value", unknown);
        }

        Ok(results)
    }

    async fn fetch_history(&self, url: &str) -> MonitorResult<Vec<HistoryPoint>> {
        let request = self.client.get(self.history_url(url));
        let response: HistoryResponse = self.send(request).await?;
        let history = response.history.unwrap_or_default();
        tracing::debug!("Got {} history points for {}", history.len(), url);
        Ok(history)
    }

    async fn fetch_analytics(&self, urls: &[String]) -> MonitorResult<Vec<AnalyticsSummary>> {
        let request = self.client.get(self.analytics_url(urls));
        let response: AnalyticsResponse = self.send(request).await?;
        Ok(response.analytics.unwrap_or_default())
    }

    async fn clear_all(&self) -> MonitorResult<ClearAck> {
        let request = self.client.delete(self.endpoint("/delete_all_urls"));
        self.send(request).await
    }
}
