//! Error types for probing and validating proxies

use thiserror::Error;

/// Number of body characters kept in a [`CheckError::Parse`] for diagnostics
pub const BODY_PREFIX_LEN: usize = 100;

/// Errors raised while probing a single proxy or loading candidates.
///
/// Everything except the startup path is local to one candidate: the
/// candidate is reported dead and the run carries on.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Network failure or request timeout
    #[error("connection error: {0}")]
    Connection(String),

    /// Probe answered with something other than 200
    #[error("unexpected HTTP status: {0}")]
    Status(u16),

    /// Probe body was not the expected JSON
    #[error("invalid probe response ({message}), body: {body_prefix}")]
    Parse { message: String, body_prefix: String },

    /// Proxy address could not be turned into a usable proxy
    #[error("invalid proxy configuration: {0}")]
    Config(String),

    /// The proxy did not change the observed client IP
    #[error("same IP as origin")]
    SameIdentity,

    /// The probe succeeded but reported no client IP
    #[error("no client ip returned")]
    MissingClientIp,

    /// Neither the URL nor the local file produced candidates
    #[error("no candidates available: {0}")]
    SourceUnavailable(String),
}

impl CheckError {
    /// Build a parse error, keeping only a short prefix of the offending body
    pub fn parse(message: impl Into<String>, body: &str) -> Self {
        Self::Parse {
            message: message.into(),
            body_prefix: body.chars().take(BODY_PREFIX_LEN).collect(),
        }
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            CheckError::Config(err.to_string())
        } else if let Some(status) = err.status() {
            CheckError::Status(status.as_u16())
        } else {
            CheckError::Connection(err.to_string())
        }
    }
}
