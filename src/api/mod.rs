mod client;
pub mod types;

use anyhow::{Context, Result};

pub use client::BackendClient;
pub use types::{MonthlyTotal, SaveRequest, SaveResponse, StatsSnapshot};

/// Ways a backend call can fail before yielding a usable body.
///
/// A backend that answers `success: false` is not an error here; that is a
/// well-formed `SaveResponse` the caller has to look at.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend error ({status}) from {url}: {detail}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("unexpected response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Single-threaded runtime for driving one backend call to completion from
/// synchronous code.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")
}
