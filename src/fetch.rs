use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::debug;

// ── Constants ────────────────────────────────────────────────────────────────

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_REDIRECTS: usize = 10;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("could not connect: {0}")]
    Connect(String),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl NetworkError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout(err.to_string())
        } else if err.is_connect() {
            NetworkError::Connect(err.to_string())
        } else {
            NetworkError::Request(err.to_string())
        }
    }
}

// ── Types ────────────────────────────────────────────────────────────────────

/// The fetched resource.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ── HTTP fetch ───────────────────────────────────────────────────────────────

pub async fn fetch_page(url: &str, config: &FetchConfig) -> Result<Page, NetworkError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let client = reqwest::ClientBuilder::new()
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| NetworkError::Client(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(NetworkError::from_reqwest)?;

    let status = response.status();
    debug!(%url, status = status.as_u16(), "fetched page");
    if !status.is_success() {
        return Err(NetworkError::Status(status.as_u16()));
    }

    let html = response.text().await.map_err(|e| {
        if e.is_timeout() {
            NetworkError::Timeout(e.to_string())
        } else {
            NetworkError::Body(e.to_string())
        }
    })?;

    Ok(Page {
        url: url.to_string(),
        html,
    })
}
