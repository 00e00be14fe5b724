use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use error_common::{log_error, Result, ServiceError};
use insurance_service::{EligibilityService, StediConfig};
use logger_redacted::{LogFormat, LoggerConfig};
use mcp_server::{Server, StdioTransport};
use tracing::{info, warn};

/// Insurance eligibility MCP server (JSON-RPC over stdio)
#[derive(Parser, Debug)]
#[command(name = "eligibility-mcp")]
#[command(about = "Voice-agent tools for insurance eligibility and copay lookups")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, env = "LOG_JSON")]
    json_logs: bool,

    /// Load environment from this file instead of .env.local/.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    load_env(args.env_file.as_deref())?;
    init_logging(&args)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting_eligibility_mcp");

    let config =
        StediConfig::from_env().map_err(|e| ServiceError::ConfigError(e.to_string()))?;
    let service = EligibilityService::from_config(&config)
        .map_err(|e| ServiceError::ConfigError(e.to_string()))?;
    info!(endpoint = %config.eligibility_url(), "stedi_client_ready");

    let server = Server::new(Arc::new(service));
    let mut transport = StdioTransport::stdio();

    tokio::select! {
        served = server.serve(&mut transport) => {
            if let Err(e) = served {
                let err = ServiceError::TransportError(e.to_string());
                log_error("serve", &err);
                return Err(err);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("shutdown_signal_received");
            server.session().end();
        }
    }

    info!("eligibility_mcp_stopped");
    Ok(())
}

fn load_env(env_file: Option<&std::path::Path>) -> Result<()> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| {
                ServiceError::ConfigError(format!("failed to load {}: {}", path.display(), e))
            })?;
        }
        None => {
            // Earlier files win; dotenvy never overrides variables already set
            dotenvy::from_filename(".env.local").ok();
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    let mut config = LoggerConfig::from_env();
    if args.verbose {
        config = config.with_level("debug");
    }
    if args.json_logs {
        config = config.with_format(LogFormat::Json);
    }
    logger_redacted::init(&config)?;
    Ok(())
}
