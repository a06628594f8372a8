// Display-ready views - the only place UTC instants become viewer-local text
use crate::application::monitor_service::MonitorState;
use crate::domain::analytics::{
    lookup_uptime, prepare_chart, ResponseTimeChart, Uptime, LABEL_FORMAT, UPTIME_WINDOW_DAYS,
};
use crate::domain::filter::StatusFilter;
use crate::domain::status::UrlStatusRecord;
use crate::domain::tracker::TrackerState;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRow {
    pub url: String,
    pub status: String,
    pub response_time: String,
    pub last_checked: String,
    pub last_checked_ago: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusTable {
    pub filter: StatusFilter,
    pub rows: Vec<StatusRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsPanel {
    pub urls: Vec<String>,
    pub selected: Option<String>,
    pub window_days: u32,
    pub uptime: Uptime,
    pub uptime_display: String,
    pub avg_response: String,
    pub chart: ResponseTimeChart,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsoleView {
    pub populated: bool,
    pub loading: bool,
    pub filter: StatusFilter,
    pub draft: String,
    pub submitted: Vec<String>,
    pub known_urls: Vec<String>,
    pub selected: Option<String>,
    pub last_error: Option<String>,
}

impl From<MonitorState> for ConsoleView {
    fn from(state: MonitorState) -> Self {
        Self {
            populated: state.known.state() == TrackerState::Populated,
            loading: state.loading,
            filter: state.filter,
            known_urls: state.known.urls().to_vec(),
            selected: state.known.selected().map(str::to_string),
            draft: state.draft,
            submitted: state.submitted,
            last_error: state.last_error,
        }
    }
}

/// Viewer zone from a UTC offset in minutes, e.g. `-300` for UTC-5.
pub fn viewer_offset(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

pub fn format_millis(ms: Option<f64>) -> String {
    match ms {
        Some(ms) => format!("{} ms", ms.round() as i64),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_local<Tz>(instant: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match instant {
        Some(instant) => instant.with_timezone(tz).format(LABEL_FORMAT).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Coarse "5 minutes ago" text relative to `now`.
pub fn format_ago(instant: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(instant) = instant else {
        return PLACEHOLDER.to_string();
    };

    let seconds = (now - instant).num_seconds();
    if seconds < 0 {
        return "just now".to_string();
    }
    let (amount, unit) = match seconds {
        0..=44 => return "a few seconds ago".to_string(),
        45..=3_599 => ((seconds + 30) / 60, "minute"),
        3_600..=86_399 => ((seconds + 1_800) / 3_600, "hour"),
        _ => ((seconds + 43_200) / 86_400, "day"),
    };
    let amount = amount.max(1);
    if amount == 1 {
        let article = if unit == "hour" { "an" } else { "a" };
        format!("{} {} ago", article, unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

pub fn status_table<Tz>(
    records: &[UrlStatusRecord],
    filter: StatusFilter,
    tz: &Tz,
    now: DateTime<Utc>,
) -> StatusTable
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rows = records
        .iter()
        .map(|r| StatusRow {
            url: r.url.clone(),
            status: r.status.to_string(),
            response_time: format_millis(r.response_time),
            last_checked: format_local(r.last_checked, tz),
            last_checked_ago: format_ago(r.last_checked, now),
        })
        .collect();

    StatusTable { filter, rows }
}

pub fn analytics_panel<Tz>(state: &MonitorState, tz: &Tz) -> AnalyticsPanel
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let selected = state.known.selected().map(str::to_string);
    let (uptime, avg_response) = match selected.as_deref() {
        Some(url) => {
            let avg = state
                .analytics
                .iter()
                .find(|a| a.url == url)
                .and_then(|a| a.avg_response);
            (lookup_uptime(&state.analytics, url), avg)
        }
        None => (Uptime::Unknown, None),
    };
    let chart = match selected {
        Some(_) => prepare_chart(&state.history, tz),
        None => ResponseTimeChart::NoData,
    };

    AnalyticsPanel {
        urls: state.known.urls().to_vec(),
        selected,
        window_days: UPTIME_WINDOW_DAYS,
        uptime,
        uptime_display: uptime.display(),
        avg_response: format_millis(avg_response),
        chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::{AnalyticsSummary, HistoryPoint, UrlStatus};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_rows_use_placeholders_for_missing_fields() {
        let records = vec![
            UrlStatusRecord::new("a", UrlStatus::Up, Some(119.6), Some(at(12, 0, 0))),
            UrlStatusRecord::new("b", UrlStatus::Down, None, None),
        ];
        let table = status_table(&records, StatusFilter::All, &Utc, at(12, 5, 0));

        assert_eq!(table.rows[0].response_time, "120 ms");
        assert_eq!(table.rows[0].last_checked, "2024-01-01 12:00:00");
        assert_eq!(table.rows[0].last_checked_ago, "5 minutes ago");
        assert_eq!(table.rows[1].status, "DOWN");
        assert_eq!(table.rows[1].response_time, PLACEHOLDER);
        assert_eq!(table.rows[1].last_checked, PLACEHOLDER);
        assert_eq!(table.rows[1].last_checked_ago, PLACEHOLDER);
    }

    #[test]
    fn test_last_checked_in_viewer_zone() {
        let zone = viewer_offset(-300).unwrap();
        assert_eq!(format_local(Some(at(0, 0, 0)), &zone), "2023-12-31 19:00:00");
        assert!(viewer_offset(24 * 60).is_none());
    }

    #[test]
    fn test_relative_times() {
        let now = at(12, 0, 0);
        assert_eq!(format_ago(Some(at(11, 59, 50)), now), "a few seconds ago");
        assert_eq!(format_ago(Some(at(11, 59, 0)), now), "a minute ago");
        assert_eq!(format_ago(Some(at(11, 0, 0)), now), "an hour ago");
        assert_eq!(format_ago(Some(at(9, 0, 0)), now), "3 hours ago");
        assert_eq!(format_ago(Some(at(12, 0, 30)), now), "just now");
    }

    #[test]
    fn test_panel_without_analytics_entry_shows_unknown() {
        let mut state = MonitorState::default();
        let snapshot = vec![UrlStatusRecord::new("a", UrlStatus::Up, None, None)];
        state.known.apply_snapshot(&snapshot);
        state.snapshot = snapshot;
        state.analytics = vec![AnalyticsSummary::new("other", 50.0)];

        let panel = analytics_panel(&state, &Utc);
        assert_eq!(panel.selected.as_deref(), Some("a"));
        assert_eq!(panel.uptime, Uptime::Unknown);
        assert_eq!(panel.uptime_display, PLACEHOLDER);
        assert_eq!(panel.chart, ResponseTimeChart::NoData);
        assert_eq!(panel.window_days, 30);
    }

    #[test]
    fn test_panel_with_history_and_uptime() {
        let mut state = MonitorState::default();
        let snapshot = vec![UrlStatusRecord::new("a", UrlStatus::Up, None, None)];
        state.known.apply_snapshot(&snapshot);
        state.analytics = vec![AnalyticsSummary {
            url: "a".to_string(),
            uptime_percent: 99.5,
            avg_response: Some(80.4),
        }];
        state.history = vec![HistoryPoint::new(at(0, 0, 0), Some(120.0))];

        let panel = analytics_panel(&state, &viewer_offset(-300).unwrap());
        assert_eq!(panel.uptime_display, "99.50%");
        assert_eq!(panel.avg_response, "80 ms");
        let ResponseTimeChart::Series(series) = panel.chart else {
            panic!("expected a series");
        };
        assert_eq!(series.labels, vec!["2023-12-31 19:00:00"]);
        assert_eq!(series.values, vec![Some(120.0)]);
    }

    #[test]
    fn test_console_view_from_state() {
        let mut state = MonitorState::default();
        state.filter = StatusFilter::Up;
        state.draft = "a.com".to_string();
        let view = ConsoleView::from(state);
        assert_eq!(view.filter, StatusFilter::Up);
        assert!(view.known_urls.is_empty());
        assert!(!view.populated);
        assert_eq!(view.selected, None);
    }
}
