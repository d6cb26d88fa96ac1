use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use take_home::api::{create_router, AppState};
use take_home::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// UK take-home pay engine: income tax, National Insurance, student loan and
/// pension deductions over HTTP.
#[derive(Parser, Debug)]
#[command(name = "take-home", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the calculation API.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Directory holding the rule-set YAML files. The bundled 2025/26
        /// rules are used when omitted.
        #[arg(short, long)]
        config_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Command::Serve { port, config_dir } => {
            let config = match &config_dir {
                Some(dir) => {
                    info!(config_dir = %dir.display(), "Loading rule set");
                    ConfigLoader::load(dir)
                }
                None => ConfigLoader::bundled(),
            };
            let config = match config {
                Ok(config) => config,
                Err(err) => {
                    error!(error = %err, "Failed to load rule set");
                    std::process::exit(1);
                }
            };

            if let Err(err) = serve(config, port).await {
                error!(error = %err, "Server error");
                std::process::exit(1);
            }
        }
    }
}

async fn serve(config: ConfigLoader, port: u16) -> std::io::Result<()> {
    let tax_year = config.tax_year().code.clone();
    let router = create_router(AppState::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, tax_year = %tax_year, "Listening");
    axum::serve(listener, router).await
}
