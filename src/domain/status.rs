// Status domain models - what the checking backend reports about each URL
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrlStatus {
    Up,
    Down,
    /// Any literal other than UP/DOWN. The backend contract allows only two values.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UrlStatus::Up => "UP",
            UrlStatus::Down => "DOWN",
            UrlStatus::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStatusRecord {
    pub url: String,
    pub status: UrlStatus,
    #[serde(default, deserialize_with = "lenient_millis")]
    pub response_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl UrlStatusRecord {
    pub fn new(
        url: impl Into<String>,
        status: UrlStatus,
        response_time: Option<f64>,
        last_checked: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            response_time,
            last_checked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(deserialize_with = "required_instant")]
    pub checked_at: DateTime<Utc>,
    /// Absent when the check itself failed.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub response_time: Option<f64>,
}

impl HistoryPoint {
    pub fn new(checked_at: DateTime<Utc>, response_time: Option<f64>) -> Self {
        Self {
            checked_at,
            response_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub url: String,
    pub uptime_percent: f64,
    #[serde(default, deserialize_with = "lenient_millis")]
    pub avg_response: Option<f64>,
}

impl AnalyticsSummary {
    pub fn new(url: impl Into<String>, uptime_percent: f64) -> Self {
        Self {
            url: url.into(),
            uptime_percent,
            avg_response: None,
        }
    }
}

/// Parse a backend timestamp as a UTC instant.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`, `+02:00`) and naive ISO-8601 without an offset
/// (`2024-01-01T00:00:00.123456`), which the backend writes for UTC wall-clock values.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_instant))
}

fn required_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

// Non-numeric latency values are treated as missing rather than failing the payload
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|ms| *ms >= 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_instant_accepts_offset_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_instant("2024-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_instant("2024-01-01T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_instant("2024-01-01T00:00:00"), Some(expected));
        assert!(parse_instant("2024-01-01T00:00:00.250000").is_some());
        assert_eq!(parse_instant("yesterday"), None);
    }

    #[test]
    fn test_record_with_missing_optional_fields() {
        let record: UrlStatusRecord =
            serde_json::from_str(r#"{"url": "http://a.com", "status": "DOWN"}"#).unwrap();
        assert_eq!(record.status, UrlStatus::Down);
        assert_eq!(record.response_time, None);
        assert_eq!(record.last_checked, None);
    }

    #[test]
    fn test_record_with_null_and_non_numeric_latency() {
        let record: UrlStatusRecord = serde_json::from_str(
            r#"{"url": "a", "status": "UP", "response_time": "fast", "last_checked": null}"#,
        )
        .unwrap();
        assert_eq!(record.response_time, None);
        assert_eq!(record.last_checked, None);
    }

    #[test]
    fn test_unexpected_status_literal_is_guarded() {
        let record: UrlStatusRecord =
            serde_json::from_str(r#"{"url": "a", "status": "MAYBE"}"#).unwrap();
        assert_eq!(record.status, UrlStatus::Unknown);
        assert_eq!(record.status.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_history_point_from_backend_payload() {
        let point: HistoryPoint = serde_json::from_str(
            r#"{"url": "a", "status": "UP", "response_time": 120.5, "checked_at": "2024-01-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(point.response_time, Some(120.5));
        assert_eq!(point.checked_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }
}
