use anyhow::Result;
use clap::Parser;
use proxy_probe::{
    proxy::checker::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS},
    proxy::oracle::DEFAULT_PROBE_URL,
    Config, DEFAULT_OUTPUT_FILE, DEFAULT_PROXY_FILE,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Checks which proxies hide your address from an IP-echo service
#[derive(Parser)]
#[command(name = "proxy-probe", version)]
#[command(about = "Checks which proxies hide your address from an IP-echo service")]
struct Cli {
    /// URL of a proxy list (one `ip,port[,country[,org]]` per line)
    #[arg(short, long)]
    input_url: Option<String>,

    /// Local proxy list, used when no URL is given or the URL yields nothing
    #[arg(short, long, default_value = DEFAULT_PROXY_FILE)]
    file: PathBuf,

    /// Output file for alive proxies
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Maximum number of proxies checked at once
    #[arg(short = 'n', long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// IP-echo endpoint returning clientIp, asOrganization and country
    #[arg(long, default_value = DEFAULT_PROBE_URL)]
    probe_url: String,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::new()
        .with_input_url(cli.input_url)
        .with_proxy_file(cli.file)
        .with_output_file(cli.output)
        .with_concurrency(cli.concurrency)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_probe_url(cli.probe_url);

    proxy_probe::run(&config).await?;

    Ok(())
}
