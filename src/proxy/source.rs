//! Candidate source module for loading proxy lists
//!
//! Candidates come from a remote text list when a URL is given, and from a
//! local file otherwise. A URL that yields nothing usable (request failure,
//! non-200 status, or only blanks and comments) falls back to the file.

use crate::error::CheckError;
use crate::proxy::oracle::DEFAULT_USER_AGENT;
use reqwest::{Client, StatusCode};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for list downloads in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keep the lines that may hold a candidate: trimmed, non-empty, not `#` comments
pub fn candidate_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Configuration for the proxy list fetcher
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Timeout for HTTP requests
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Fetches candidate lines from a URL or a local file
pub struct ProxyListFetcher {
    client: Client,
}

impl ProxyListFetcher {
    /// Create a new fetcher with custom configuration
    pub fn with_config(config: SourceConfig) -> Result<Self, CheckError> {
        let client = Client::builder()
            .no_proxy()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Download a list and return its candidate lines
    pub async fn fetch_url(&self, url: &str) -> Result<Vec<String>, CheckError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(CheckError::Status(status.as_u16()));
        }

        let content = response.text().await?;
        Ok(candidate_lines(&content))
    }

    /// Read a local list and return its candidate lines
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, CheckError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CheckError::SourceUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(candidate_lines(&content))
    }

    /// Load candidate lines, preferring `url` and falling back to `file`
    pub async fn load(&self, url: Option<&str>, file: &Path) -> Result<Vec<String>, CheckError> {
        if let Some(url) = url {
            info!(url, "fetching proxy list");
            match self.fetch_url(url).await {
                Ok(lines) if !lines.is_empty() => {
                    info!(count = lines.len(), url, "candidate lines loaded from URL");
                    return Ok(lines);
                }
                Ok(_) => warn!(url, "proxy list URL returned no usable lines"),
                Err(e) => warn!(url, error = %e, "failed to fetch proxy list"),
            }
        }

        info!(path = %file.display(), "reading proxy list from file");
        let lines = Self::read_file(file)?;
        if lines.is_empty() {
            return Err(CheckError::SourceUnavailable(format!(
                "{} is empty or only has comments",
                file.display()
            )));
        }

        info!(count = lines.len(), path = %file.display(), "candidate lines loaded from file");
        Ok(lines)
    }
}
