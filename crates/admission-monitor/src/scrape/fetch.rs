use crate::config::ScraperConfig;
use std::time::Duration;

/// Retrieves the raw HTML of a direction page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("page unavailable: {0}")]
    Unavailable(String),
}

/// Blocking HTTP transport. One client is reused for every direction of a run.
pub struct HttpPageFetcher {
    client: reqwest::blocking::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, FetchError> {
        Self::new(config.fetch_timeout, &config.user_agent)
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        // The results pages are UTF-8 regardless of the declared charset.
        let body = response.bytes()?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
