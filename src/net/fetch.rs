use std::time::Duration;

use thiserror::Error;

/// Error during a text fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("failed to read body: {0}")]
    Body(String),
}

/// Source of textual resources (configuration JSON, partial fragments).
///
/// The pipeline talks to this trait so tests can swap the network for a map.
/// Every URL is attempted exactly once; retries are the caller's decision.
pub trait TextFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(
                "Mozilla/5.0 (compatible; Starlit/0.1; ",
                "+https://github.com/example/starlit)"
            ))
            .timeout(Duration::from_secs(15))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .get(parsed.as_str())
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_url() {
        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher.fetch_text("not a url").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
