//! End-to-end run: prepare storage, fix the baseline, check every candidate, persist

use crate::proxy::{
    dispatch, HttpOracle, IdentityOracle, ProxyChecker, ProxyListFetcher, ProxyParser, ResultSink,
};
use crate::{Config, Result};
use anyhow::{bail, Context};
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Usable lines read from the candidate source
    pub lines: usize,
    /// Lines that parsed into candidates
    pub candidates: usize,
    /// Lines dropped by the parser
    pub skipped: usize,
    /// Candidates that reached an alive or dead outcome
    pub processed: usize,
    pub dead: usize,
    /// Alive proxies written to the output file
    pub alive: usize,
}

/// Run with the real HTTP oracle
pub async fn run(config: &Config) -> Result<RunSummary> {
    let oracle =
        HttpOracle::new(config.timeout, &config.user_agent).context("failed to build HTTP client")?;
    run_with_oracle(config, Arc::new(oracle)).await
}

/// Run with an explicit oracle.
///
/// Errors returned from here are fatal startup failures; anything that
/// goes wrong with a single candidate is logged and counted instead.
pub async fn run_with_oracle(
    config: &Config,
    oracle: Arc<dyn IdentityOracle>,
) -> Result<RunSummary> {
    fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory {}", config.data_dir.display())
    })?;
    if let Some(parent) = config.output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    let sink = ResultSink::create(&config.output_file).with_context(|| {
        format!("failed to create output file {}", config.output_file.display())
    })?;

    info!("proxy check started");

    let checker = ProxyChecker::new(config.checker_config(), oracle);

    info!(probe = %config.probe_url, "fetching origin identity");
    let baseline = checker
        .fetch_baseline()
        .await
        .context("failed to get origin identity")?;
    if baseline.client_ip.is_empty() {
        bail!("origin identity from {} has no client IP", config.probe_url);
    }
    info!(client_ip = %baseline.client_ip, "origin identity detected");

    let fetcher = ProxyListFetcher::with_config(config.source_config())
        .context("failed to build HTTP client")?;
    let lines = match fetcher
        .load(config.input_url.as_deref(), &config.proxy_file)
        .await
    {
        Ok(lines) => lines,
        Err(e) => {
            warn!(error = %e, "no proxies to check");
            info!("proxy check finished");
            return Ok(RunSummary::default());
        }
    };

    let candidates = ProxyParser::parse_lines(&lines);
    let mut summary = RunSummary {
        lines: lines.len(),
        candidates: candidates.len(),
        skipped: lines.len() - candidates.len(),
        ..RunSummary::default()
    };
    info!(
        candidates = summary.candidates,
        skipped = summary.skipped,
        concurrency = checker.config().concurrency,
        "checking proxies"
    );

    let limit = checker.config().concurrency;
    let report = dispatch(&checker, candidates, Arc::new(baseline), limit).await;
    summary.processed = report.processed;
    summary.dead = report.dead;

    summary.alive = sink.write(&report.alive).with_context(|| {
        format!("failed to open output file {}", sink.path().display())
    })?;

    if summary.alive > 0 {
        info!(count = summary.alive, path = %sink.path().display(), "alive proxies saved");
    } else {
        info!("no alive proxies found");
    }
    info!(
        processed = summary.processed,
        alive = summary.alive,
        dead = summary.dead,
        skipped = summary.skipped,
        "proxy check finished"
    );

    Ok(summary)
}
