// Result filter - view-only partition of the latest snapshot by status
use super::status::{UrlStatus, UrlStatusRecord};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusFilter {
    #[default]
    All,
    Up,
    Down,
}

impl StatusFilter {
    pub fn matches(&self, status: UrlStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Up => status == UrlStatus::Up,
            StatusFilter::Down => status == UrlStatus::Down,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(StatusFilter::All),
            "UP" => Ok(StatusFilter::Up),
            "DOWN" => Ok(StatusFilter::Down),
            other => Err(format!("unknown filter mode: {}", other)),
        }
    }
}

/// Records matching `mode`, in snapshot order.
pub fn filter_results(snapshot: &[UrlStatusRecord], mode: StatusFilter) -> Vec<&UrlStatusRecord> {
    snapshot.iter().filter(|r| mode.matches(r.status)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Vec<UrlStatusRecord> {
        vec![
            UrlStatusRecord::new("c", UrlStatus::Down, None, None),
            UrlStatusRecord::new("a", UrlStatus::Up, Some(10.0), None),
            UrlStatusRecord::new("b", UrlStatus::Down, None, None),
            UrlStatusRecord::new("d", UrlStatus::Up, Some(55.0), None),
        ]
    }

    #[test]
    fn test_all_returns_snapshot_unchanged() {
        let snapshot = snapshot();
        let all: Vec<UrlStatusRecord> = filter_results(&snapshot, StatusFilter::All)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(all, snapshot);
    }

    #[test]
    fn test_up_and_down_partition_snapshot() {
        let snapshot = snapshot();
        let up = filter_results(&snapshot, StatusFilter::Up);
        let down = filter_results(&snapshot, StatusFilter::Down);

        assert_eq!(up.iter().map(|r| r.url.as_str()).collect::<Vec<_>>(), vec!["a", "d"]);
        assert_eq!(down.iter().map(|r| r.url.as_str()).collect::<Vec<_>>(), vec!["c", "b"]);
        assert_eq!(up.len() + down.len(), snapshot.len());
        assert!(up.iter().all(|u| !down.iter().any(|d| d.url == u.url)));
    }

    #[test]
    fn test_unknown_status_only_under_all() {
        let snapshot = vec![UrlStatusRecord::new("x", UrlStatus::Unknown, None, None)];
        assert_eq!(filter_results(&snapshot, StatusFilter::All).len(), 1);
        assert!(filter_results(&snapshot, StatusFilter::Up).is_empty());
        assert!(filter_results(&snapshot, StatusFilter::Down).is_empty());
    }

    #[test]
    fn test_parse_filter_mode() {
        assert_eq!("up".parse::<StatusFilter>(), Ok(StatusFilter::Up));
        assert_eq!(" DOWN ".parse::<StatusFilter>(), Ok(StatusFilter::Down));
        assert_eq!("All".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert!("sideways".parse::<StatusFilter>().is_err());
    }
}
