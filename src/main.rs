use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use leadline::api::ApiClient;
use leadline::config::Config;
use leadline::gateway::{self, AppState};
use leadline::session::SessionStore;
use leadline::tools::ToolRegistry;

#[derive(Parser, Debug)]
#[command(name = "leadline", version, about = "Outbound sales operator tool gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the gateway daemon
    Start,
    /// Print the tool catalogue as JSON and exit
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let fmt_layer = tracing_subscriber::fmt::layer();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    let cli = Cli::parse();

    let registry = Arc::new(ToolRegistry::with_builtins());

    if let Some(Command::Tools) = cli.command {
        println!("{}", serde_json::to_string_pretty(&registry.list())?);
        return Ok(());
    }

    let config = Config::from_env().context("failed to load configuration")?;
    info!(api_base = %config.api_base, "pipeline API configured");

    let api = Arc::new(ApiClient::new(
        config.api_base.clone(),
        config.internal_key.clone(),
    ));
    let sessions = SessionStore::new(config.session_ttl);

    let state = AppState {
        registry,
        api,
        sessions,
        api_token: config.api_token.clone(),
    };

    let gateway = gateway::start_gateway(config.gateway_addr, state)
        .await
        .context("failed to start gateway")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutting down");
    gateway.handle.abort();

    Ok(())
}
