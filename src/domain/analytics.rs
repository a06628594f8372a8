// Analytics preparation - uptime lookup and the response-time series for one URL
use super::status::{AnalyticsSummary, HistoryPoint};
use chrono::TimeZone;
use serde::Serialize;
use std::fmt::Display;

pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trailing window the backend computes uptime over.
pub const UPTIME_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum Uptime {
    Known(f64),
    /// No analytics entry for the URL yet. Not the same as 0%.
    Unknown,
}

impl Uptime {
    pub fn display(&self) -> String {
        match self {
            Uptime::Known(percent) => format!("{:.2}%", percent),
            Uptime::Unknown => "—".to_string(),
        }
    }
}

pub fn lookup_uptime(analytics: &[AnalyticsSummary], url: &str) -> Uptime {
    analytics
        .iter()
        .find(|a| a.url == url)
        .map(|a| Uptime::Known(a.uptime_percent))
        .unwrap_or(Uptime::Unknown)
}

/// Labels and values in history order; `labels[i]` belongs to `values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseTimeChart {
    NoData,
    Series(TimeSeries),
}

/// Project history into a chart, converting instants to `tz` only for the labels.
pub fn prepare_chart<Tz>(history: &[HistoryPoint], tz: &Tz) -> ResponseTimeChart
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if history.is_empty() {
        return ResponseTimeChart::NoData;
    }

    let (labels, values) = history
        .iter()
        .map(|point| {
            let label = point
                .checked_at
                .with_timezone(tz)
                .format(LABEL_FORMAT)
                .to_string();
            (label, point.response_time)
        })
        .unzip();

    ResponseTimeChart::Series(TimeSeries { labels, values })
}
