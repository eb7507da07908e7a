//! Proxy Probe - finds proxies that mask the caller's address
//!
//! Candidates are probed through an IP-echo service with bounded
//! concurrency; the ones that report a client IP different from the
//! caller's own are written to a flat output file.

pub mod error;
pub mod proxy;
pub mod runner;

pub use error::CheckError;
pub use proxy::*;
pub use runner::{run, run_with_oracle, RunSummary};

use std::path::PathBuf;
use std::time::Duration;

/// Application result type
pub type Result<T> = anyhow::Result<T>;

/// Default data directory
pub const DEFAULT_DATA_DIR: &str = "Data";

/// Default local candidate list
pub const DEFAULT_PROXY_FILE: &str = "Data/ProxyIsp.txt";

/// Default output file for alive proxies
pub const DEFAULT_OUTPUT_FILE: &str = "Data/alive.txt";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory created at startup to hold lists and results
    pub data_dir: PathBuf,
    /// Remote candidate list, tried before `proxy_file`
    pub input_url: Option<String>,
    /// Local candidate list
    pub proxy_file: PathBuf,
    /// Where alive proxies are written
    pub output_file: PathBuf,
    /// IP-echo endpoint
    pub probe_url: String,
    /// Maximum validations in flight
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        let checker = CheckerConfig::default();
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            input_url: None,
            proxy_file: PathBuf::from(DEFAULT_PROXY_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            probe_url: checker.probe_url,
            concurrency: checker.concurrency,
            timeout: checker.timeout,
            user_agent: checker.user_agent,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }

    pub fn with_input_url(mut self, url: Option<String>) -> Self {
        self.input_url = url;
        self
    }

    pub fn with_proxy_file(mut self, path: PathBuf) -> Self {
        self.proxy_file = path;
        self
    }

    pub fn with_output_file(mut self, path: PathBuf) -> Self {
        self.output_file = path;
        self
    }

    pub fn with_probe_url(mut self, url: String) -> Self {
        self.probe_url = url;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Settings for the validator
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig::new()
            .with_timeout(self.timeout)
            .with_concurrency(self.concurrency)
            .with_probe_url(self.probe_url.clone())
            .with_user_agent(self.user_agent.clone())
    }

    /// Settings for the candidate list download
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig::new()
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent.clone())
    }
}
