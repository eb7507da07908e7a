//! Proxy module for loading, probing and recording proxies
//!
//! This module provides functionality for:
//! - Loading candidate lists from a URL or a local file
//! - Parsing `address,port[,country[,organization]]` lines
//! - Probing an IP-echo service directly and through each candidate
//! - Validating candidates concurrently under a fixed limit
//! - Saving alive proxies to a flat output file

pub mod checker;
pub mod dispatcher;
pub mod models;
pub mod oracle;
pub mod parser;
pub mod sink;
pub mod source;

pub use checker::{CheckerConfig, ProxyChecker};
pub use dispatcher::{dispatch, DispatchReport};
pub use models::{AliveProxy, Candidate, Identity, ValidationOutcome};
pub use oracle::{sanitize_org, HttpOracle, IdentityOracle};
pub use parser::ProxyParser;
pub use sink::ResultSink;
pub use source::{candidate_lines, ProxyListFetcher, SourceConfig};
