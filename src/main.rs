use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use prism_gateway::Config;
use prism_gateway::api::ApiServer;

/// Prism - Voice-assistant webhook adapters and multi-platform session gateway
#[derive(Parser)]
#[command(name = "prism", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, env = "GATEWAY_PORT")]
    port: Option<u16>,

    /// Base URL of the downstream backend API
    #[arg(long)]
    backend_url: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,prism_gateway=info",
        1 => "info,prism_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(backend_url) = cli.backend_url {
        config.backend_url = backend_url.trim_end_matches('/').to_string();
    }
    tracing::debug!(?config, "loaded configuration");

    tracing::info!(
        port = config.port,
        backend_url = %config.backend_url,
        "starting prism gateway"
    );

    let server = ApiServer::new(&config).await?;
    server.run().await?;

    Ok(())
}
