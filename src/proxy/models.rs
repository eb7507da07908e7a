//! Proxy data models

use crate::error::CheckError;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// What the IP-echo service reports about the caller
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Identity {
    #[serde(rename = "clientIp", default, deserialize_with = "null_as_empty")]
    pub client_ip: String,
    #[serde(rename = "asOrganization", default, deserialize_with = "null_as_empty")]
    pub organization: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country: String,
}

/// Missing and `null` fields both read as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Identity {
    pub fn new(client_ip: &str, organization: &str, country: &str) -> Self {
        Self {
            client_ip: client_ip.to_string(),
            organization: organization.to_string(),
            country: country.to_string(),
        }
    }
}

/// An unvalidated proxy taken from one line of the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub address: String,
    /// Kept verbatim; a bad port surfaces as a proxy configuration error
    pub port: String,
    pub declared_country: Option<String>,
    pub declared_organization: Option<String>,
}

impl Candidate {
    /// Create a candidate without declared metadata
    pub fn new(address: &str, port: &str) -> Self {
        Self {
            address: address.to_string(),
            port: port.to_string(),
            declared_country: None,
            declared_organization: None,
        }
    }

    pub fn with_declared(mut self, country: Option<String>, organization: Option<String>) -> Self {
        self.declared_country = country;
        self.declared_organization = organization;
        self
    }

    /// Forward-proxy URL; always plain HTTP whatever the probe scheme is
    pub fn proxy_url(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }

    /// Get the proxy string in IP:PORT format
    pub fn to_simple_string(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_simple_string())
    }
}

/// A proxy that masked the caller's address, enriched with probe metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliveProxy {
    pub address: String,
    pub port: String,
    pub country: String,
    pub organization: String,
}

impl AliveProxy {
    /// Line written to the output file
    pub fn to_record_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.address, self.port, self.country, self.organization
        )
    }
}

impl fmt::Display for AliveProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_record_line())
    }
}

/// Terminal classification of one candidate
#[derive(Debug)]
pub enum ValidationOutcome {
    Alive(AliveProxy),
    Dead(CheckError),
}

impl ValidationOutcome {
    pub fn into_alive(self) -> Option<AliveProxy> {
        match self {
            ValidationOutcome::Alive(proxy) => Some(proxy),
            ValidationOutcome::Dead(_) => None,
        }
    }
}
