// # ddnsd - DDNS Daemon
//
// Keeps a Cloudflare A record pointed at this host's public IP.
//
// This daemon is a THIN integration layer:
// 1. Parse the command line
// 2. Initialize logging
// 3. Load and validate the JSON configuration
// 4. Build the IP source and Cloudflare provider
// 5. Run the DDNS engine on a single-threaded runtime
//
// All change detection lives in ddns-core.
//
// ## Configuration
//
// ```json
// {
//   "api_token": "cf-token",
//   "zone_id": "023e105f4ecef8ad9ca31a8372d0c353",
//   "record_id": "372e67954025e0ba6aaa6d586b9e0b59",
//   "domain": "home.example.com",
//   "check_interval": 5
// }
// ```
//
// ## Example
//
// ```bash
// ddnsd /etc/ddns/config.json
// ```
//
// ## Output
//
// One line per event on stdout: `[YYYY-MM-DD HH:MM:SS] <message>`

use anyhow::Result;
use clap::Parser;
use ddns_core::timestamp::local_timestamp;
use ddns_core::{DdnsConfig, DdnsEngine};
use ddns_ip_http::HttpIpSource;
use ddns_provider_cloudflare::CloudflareProvider;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command line interface
#[derive(Debug, Parser)]
#[command(name = "ddnsd", version, about = "Keep a Cloudflare A record pointed at this host")]
struct Cli {
    /// Path to the JSON configuration file
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn level(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

/// Log line prefix: `[YYYY-MM-DD HH:MM:SS]` in local time
struct LogTimer;

impl FormatTime for LogTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", local_timestamp())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(log_level) = cli.level() else {
        eprintln!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            cli.log_level
        );
        return DdnsExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_timer(LogTimer)
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");

    let mut engine = match startup(cli.config.as_deref(), build_engine) {
        Ok(engine) => engine,
        Err(code) => return code.into(),
    };

    // One loop, one thread
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = engine.run().await {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Load and validate the configuration, then hand it to `build`
///
/// Every configuration failure returns before `build` is called, so no
/// IP source or provider exists for a config that was rejected.
fn startup<F>(config_path: Option<&Path>, build: F) -> Result<DdnsEngine, DdnsExitCode>
where
    F: FnOnce(&DdnsConfig) -> Result<DdnsEngine>,
{
    let Some(config_path) = config_path else {
        error!("Error: no configuration file path given");
        return Err(DdnsExitCode::ConfigError);
    };

    let config = match DdnsConfig::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to read configuration file: {}", e);
            return Err(DdnsExitCode::ConfigError);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation error: {}", e);
        return Err(DdnsExitCode::ConfigError);
    }

    info!("Managing record: {}", config.domain);

    build(&config).map_err(|e| {
        error!("Failed to initialize daemon: {}", e);
        DdnsExitCode::ConfigError
    })
}

/// Build the engine from a validated configuration
fn build_engine(config: &DdnsConfig) -> Result<DdnsEngine> {
    let ip_source = HttpIpSource::from_config(config)?;
    let provider = CloudflareProvider::from_config(config)?;

    match config.http_timeout() {
        Some(timeout) => info!("HTTP timeout: {:?}", timeout),
        None => info!("HTTP timeout: none"),
    }

    // Events have no consumer in the daemon; the log lines carry everything
    let engine = DdnsEngine::detached(Box::new(ip_source), Box::new(provider), config)?;

    Ok(engine)
}
