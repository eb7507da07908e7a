//! IP oracle client: asks an IP-echo service who the caller appears to be

use crate::error::CheckError;
use crate::proxy::models::Identity;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, Proxy as ReqwestProxy, StatusCode};
use std::time::Duration;

/// Default probe endpoint
pub const DEFAULT_PROBE_URL: &str = "https://speed.cloudflare.com/meta";

/// Default user agent for probe and list requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/42.0.2311.135 Safari/537.36 Edge/12.10240";

/// Anything that is not an ASCII letter, digit or whitespace
static ORG_NOISE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("Invalid organization regex"));

/// Strip punctuation and symbols from an upstream organization name
pub fn sanitize_org(name: &str) -> String {
    ORG_NOISE_REGEX.replace_all(name, "").into_owned()
}

/// Parse a probe body into an [`Identity`] with a sanitized organization
pub fn parse_identity(body: &str) -> Result<Identity, CheckError> {
    let mut identity: Identity =
        serde_json::from_str(body.trim()).map_err(|e| CheckError::parse(e.to_string(), body))?;
    identity.organization = sanitize_org(&identity.organization);
    Ok(identity)
}

/// Source of caller identities, optionally observed through a proxy.
///
/// Implementations perform exactly one lookup per call and never retry.
#[async_trait]
pub trait IdentityOracle: Send + Sync {
    async fn fetch_identity(
        &self,
        endpoint: &str,
        proxy: Option<&str>,
    ) -> Result<Identity, CheckError>;
}

/// [`IdentityOracle`] backed by real HTTP requests
#[derive(Clone)]
pub struct HttpOracle {
    direct: Client,
    timeout: Duration,
    user_agent: String,
}

impl HttpOracle {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, CheckError> {
        // Direct lookups must not pick up HTTP(S)_PROXY from the environment
        let direct = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            direct,
            timeout,
            user_agent: user_agent.to_string(),
        })
    }

    /// Build a client that routes every request through `proxy_url`
    fn create_client(&self, proxy_url: &str) -> Result<Client, CheckError> {
        let proxy = ReqwestProxy::all(proxy_url)
            .map_err(|e| CheckError::Config(format!("{proxy_url}: {e}")))?;

        let client = Client::builder()
            .proxy(proxy)
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(client)
    }
}

#[async_trait]
impl IdentityOracle for HttpOracle {
    async fn fetch_identity(
        &self,
        endpoint: &str,
        proxy: Option<&str>,
    ) -> Result<Identity, CheckError> {
        let client = match proxy {
            Some(proxy_url) => self.create_client(proxy_url)?,
            None => self.direct.clone(),
        };

        let response = client.get(endpoint).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(CheckError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_identity(&body)
    }
}
