// Known-URL set tracker - the URLs the console knows about and the current selection
use super::status::UrlStatusRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Empty,
    Populated,
}

/// What a snapshot application changed, used to drive dependent refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    pub set_changed: bool,
    pub selection_changed: bool,
}

/// The known-URL set is derived solely from the last successful latest-statuses snapshot.
#[derive(Debug, Clone, Default)]
pub struct KnownUrlSet {
    urls: Vec<String>,
    selected: Option<String>,
    generation: u64,
}

impl KnownUrlSet {
    pub fn state(&self) -> TrackerState {
        if self.urls.is_empty() {
            TrackerState::Empty
        } else {
            TrackerState::Populated
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Bumped on every snapshot application and on clear; tags analytics requests.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    /// Replace the set with the URLs of `snapshot`, in order, and reselect if needed.
    pub fn apply_snapshot(&mut self, snapshot: &[UrlStatusRecord]) -> Transition {
        let urls: Vec<String> = snapshot.iter().map(|r| r.url.clone()).collect();
        let set_changed = urls != self.urls;
        self.urls = urls;
        self.generation += 1;

        let previous = self.selected.take();
        self.selected = match previous.as_deref() {
            Some(url) if self.contains(url) => previous.clone(),
            _ => self.urls.first().cloned(),
        };

        Transition {
            set_changed,
            selection_changed: previous != self.selected,
        }
    }

    /// Select a member URL. Returns whether the selection changed, or `None` for a non-member.
    pub fn select(&mut self, url: &str) -> Option<bool> {
        if !self.contains(url) {
            return None;
        }
        let changed = self.selected.as_deref() != Some(url);
        self.selected = Some(url.to_string());
        Some(changed)
    }

    pub fn clear(&mut self) {
        self.urls.clear();
        self.selected = None;
        self.generation += 1;
    }
}
