use anyhow::Result;
use clap::{Parser, Subcommand};
use remixboard_backend::api;
use remixboard_backend::bootstrap;
use remixboard_backend::config::AppConfig;
use remixboard_backend::telemetry;

#[derive(Parser)]
#[command(author, version, about = "Remixboard backend daemon")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for REST/API access
    Serve {
        /// Override the configured API port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();
    let mut config = AppConfig::from_env()?;

    let Command::Serve { port } = args.command.unwrap_or(Command::Serve { port: None });
    if let Some(port) = port {
        config.api_port = port;
    }

    let bootstrap = bootstrap::initialize(&config)?;
    tracing::info!(
        directories_created = ?bootstrap.directories_created,
        database_initialized = bootstrap.database_initialized,
        api_port = config.api_port,
        "bootstrap complete"
    );

    api::serve_http(config, bootstrap.database).await
}
