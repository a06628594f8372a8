// Errors surfaced by the monitoring client and the controller
use thiserror::Error;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The request never completed (connect, timeout, reset).
    #[error("status backend unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status; body passed through as-is.
    #[error("status backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("failed to decode backend response: {0}")]
    Decode(String),

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("url is not in the known set: {0}")]
    UnknownUrl(String),
}

impl MonitorError {
    /// Whether the same action may succeed if the operator simply tries again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MonitorError::Transport(_)
                | MonitorError::SubmissionInProgress
                | MonitorError::Backend { status: 500.., .. }
        )
    }
}
