//! Error types for the fetch, store, and harvest layers.

use std::time::Duration;

use crate::acquisition::TierKind;

/// Failure of a single fetch tier. Always recoverable: the cascade turns it
/// into a warning and moves on to the next tier.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("{tier} tier timed out after {}s", .after.as_secs_f64())]
    TimedOut { tier: TierKind, after: Duration },

    #[error("capability unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(e: anyhow::Error) -> Self {
        Self::Render(format!("{e:#}"))
    }
}

/// Failure reading or writing the persisted FAQ store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed record on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a whole harvest request.
///
/// Fetch and extraction problems never surface here; they are reported as
/// warnings or as an empty result. Only losing a freshly extracted result to
/// a failed write is fatal.
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    #[error("failed to persist FAQ store: {0}")]
    Store(#[from] StoreError),
}

pub type StoreResult<T> = Result<T, StoreError>;
