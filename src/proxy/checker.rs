//! Proxy checker module: decides whether one candidate masks the caller

use crate::error::CheckError;
use crate::proxy::models::{AliveProxy, Candidate, Identity, ValidationOutcome};
use crate::proxy::oracle::{sanitize_org, IdentityOracle, DEFAULT_PROBE_URL, DEFAULT_USER_AGENT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for proxy checks in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of concurrent checks
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Configuration for proxy checker
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Timeout for each probe request
    pub timeout: Duration,
    /// Number of concurrent checks
    pub concurrency: usize,
    /// IP-echo endpoint probed through each proxy
    pub probe_url: String,
    /// User agent sent with every probe
    pub user_agent: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            probe_url: DEFAULT_PROBE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_probe_url(mut self, url: String) -> Self {
        self.probe_url = url;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Proxy checker for validating candidates against a baseline identity
#[derive(Clone)]
pub struct ProxyChecker {
    config: CheckerConfig,
    oracle: Arc<dyn IdentityOracle>,
}

impl ProxyChecker {
    pub fn new(config: CheckerConfig, oracle: Arc<dyn IdentityOracle>) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Look up the caller's own identity, without any proxy
    pub async fn fetch_baseline(&self) -> Result<Identity, CheckError> {
        self.oracle
            .fetch_identity(&self.config.probe_url, None)
            .await
    }

    /// Probe one candidate and classify it
    pub async fn validate(&self, candidate: &Candidate, baseline: &Identity) -> ValidationOutcome {
        let outcome = self.classify(candidate, baseline).await;

        match &outcome {
            ValidationOutcome::Alive(proxy) => info!(record = %proxy, "PROXY LIVE"),
            ValidationOutcome::Dead(reason) => {
                warn!(proxy = %candidate, reason = %reason, "PROXY DEAD")
            }
        }

        outcome
    }

    async fn classify(&self, candidate: &Candidate, baseline: &Identity) -> ValidationOutcome {
        let proxy_url = candidate.proxy_url();

        let probed = match self
            .oracle
            .fetch_identity(&self.config.probe_url, Some(proxy_url.as_str()))
            .await
        {
            Ok(identity) => identity,
            Err(e) => return ValidationOutcome::Dead(e),
        };

        if probed.client_ip.is_empty() {
            return ValidationOutcome::Dead(CheckError::MissingClientIp);
        }

        if probed.client_ip == baseline.client_ip {
            return ValidationOutcome::Dead(CheckError::SameIdentity);
        }

        ValidationOutcome::Alive(Self::resolve_record(candidate, &probed))
    }

    /// Merge probe metadata with the declared values; the probe wins when non-empty
    fn resolve_record(candidate: &Candidate, probed: &Identity) -> AliveProxy {
        let mut organization = sanitize_org(&probed.organization);
        if organization.is_empty() {
            organization = candidate
                .declared_organization
                .as_deref()
                .map(sanitize_org)
                .unwrap_or_default();
        }

        let country = if probed.country.is_empty() {
            candidate.declared_country.clone().unwrap_or_default()
        } else {
            probed.country.clone()
        };

        AliveProxy {
            address: candidate.address.clone(),
            port: candidate.port.clone(),
            country,
            organization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Oracle answering from a fixed table keyed by proxy URL
    struct TableOracle {
        answers: HashMap<Option<String>, Result<Identity, u16>>,
    }

    #[async_trait]
    impl IdentityOracle for TableOracle {
        async fn fetch_identity(
            &self,
            _endpoint: &str,
            proxy: Option<&str>,
        ) -> Result<Identity, CheckError> {
            match self.answers.get(&proxy.map(str::to_string)) {
                Some(Ok(identity)) => Ok(identity.clone()),
                Some(Err(status)) => Err(CheckError::Status(*status)),
                None => Err(CheckError::Connection("connection refused".to_string())),
            }
        }
    }

    fn checker(answers: Vec<(Option<&str>, Result<Identity, u16>)>) -> ProxyChecker {
        let answers = answers
            .into_iter()
            .map(|(proxy, answer)| (proxy.map(str::to_string), answer))
            .collect();
        ProxyChecker::new(CheckerConfig::default(), Arc::new(TableOracle { answers }))
    }

    fn baseline() -> Identity {
        Identity::new("1.1.1.1", "Home ISP", "ID")
    }

    fn declared(address: &str, port: &str, country: &str, org: &str) -> Candidate {
        Candidate::new(address, port)
            .with_declared(Some(country.to_string()), Some(org.to_string()))
    }

    #[test]
    fn test_checker_config_default() {
        let config = CheckerConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.probe_url, DEFAULT_PROBE_URL);
    }

    #[test]
    fn test_checker_config_builder() {
        let config = CheckerConfig::new()
            .with_timeout(Duration::from_secs(30))
            .with_concurrency(20)
            .with_probe_url("http://example.com/meta".to_string())
            .with_user_agent("probe/1.0".to_string());

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.concurrency, 20);
        assert_eq!(config.probe_url, "http://example.com/meta");
        assert_eq!(config.user_agent, "probe/1.0");
    }

    #[tokio::test]
    async fn test_probed_values_win() {
        let checker = checker(vec![(
            Some("http://2.2.2.2:8080"),
            Ok(Identity::new("9.9.9.9", "Cloud Co", "DE")),
        )]);
        let candidate = declared("2.2.2.2", "8080", "US", "ACME Corp!!");

        let proxy = checker.validate(&candidate, &baseline()).await.into_alive().unwrap();
        assert_eq!(proxy.to_record_line(), "2.2.2.2,8080,DE,Cloud Co");
    }

    #[tokio::test]
    async fn test_empty_probed_values_fall_back_to_declared() {
        let checker = checker(vec![(
            Some("http://2.2.2.2:8080"),
            Ok(Identity::new("9.9.9.9", "", "")),
        )]);
        let candidate = declared("2.2.2.2", "8080", "US", "ACME Corp!!");

        let proxy = checker.validate(&candidate, &baseline()).await.into_alive().unwrap();
        assert_eq!(proxy.country, "US");
        assert_eq!(proxy.organization, "ACME Corp");
    }

    #[tokio::test]
    async fn test_missing_everything_leaves_empty_fields() {
        let checker = checker(vec![(
            Some("http://2.2.2.2:8080"),
            Ok(Identity::new("9.9.9.9", "", "")),
        )]);

        let proxy = checker
            .validate(&Candidate::new("2.2.2.2", "8080"), &baseline())
            .await
            .into_alive()
            .unwrap();
        assert_eq!(proxy.to_record_line(), "2.2.2.2,8080,,");
    }

    #[tokio::test]
    async fn test_same_ip_is_dead_regardless_of_metadata() {
        let checker = checker(vec![(
            Some("http://3.3.3.3:3128"),
            Ok(Identity::new("1.1.1.1", "Other Org", "SG")),
        )]);
        let candidate = declared("3.3.3.3", "3128", "SG", "Other");

        let outcome = checker.validate(&candidate, &baseline()).await;
        assert!(matches!(outcome, ValidationOutcome::Dead(CheckError::SameIdentity)));
    }

    #[tokio::test]
    async fn test_empty_client_ip_is_dead() {
        let checker = checker(vec![(
            Some("http://4.4.4.4:80"),
            Ok(Identity::new("", "Org", "US")),
        )]);

        let outcome = checker
            .validate(&Candidate::new("4.4.4.4", "80"), &baseline())
            .await;
        assert!(matches!(outcome, ValidationOutcome::Dead(CheckError::MissingClientIp)));
    }

    #[tokio::test]
    async fn test_probe_errors_are_dead() {
        let checker = checker(vec![(Some("http://5.5.5.5:80"), Err(403))]);

        let outcome = checker
            .validate(&Candidate::new("5.5.5.5", "80"), &baseline())
            .await;
        assert!(matches!(outcome, ValidationOutcome::Dead(CheckError::Status(403))));

        let outcome = checker
            .validate(&Candidate::new("6.6.6.6", "80"), &baseline())
            .await;
        assert!(matches!(outcome, ValidationOutcome::Dead(CheckError::Connection(_))));
    }

    #[tokio::test]
    async fn test_fetch_baseline_goes_direct() {
        let checker = checker(vec![(None, Ok(baseline()))]);
        assert_eq!(checker.fetch_baseline().await.unwrap(), baseline());
    }
}
