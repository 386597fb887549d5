//! Support agent server binary
//!
//! Run with: cargo run -p support-agent --bin support-agent-server -- --config config/default.toml

use clap::Parser;
use std::path::PathBuf;
use support_agent::{config::AgentConfig, server::AgentServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "support-agent-server", version, about = "Customer support agent HTTP server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config and SUPPORT_AGENT_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config and SUPPORT_AGENT_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_agent=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgentConfig::from_file(path)?,
        None => AgentConfig::default(),
    };
    config.apply_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - FAQ document: {}", config.faq.document_path.display());
    tracing::info!("  - Model: {} at {}", config.llm.model, config.llm.base_url);
    tracing::info!(
        "  - Policy: {:?}, max steps: {}",
        config.orchestration.policy,
        config.orchestration.max_steps
    );
    tracing::info!("  - API key set: {}", config.api_key_set());

    let server = AgentServer::new(config).await?;

    println!("\nServer starting...");
    println!("  Health: http://{}/health", server.address());
    println!("  Agent:  POST http://{}/api/agents/tool_agent", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
