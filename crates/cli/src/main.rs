mod config;
mod error;
mod format;
mod prompt;
mod transcript;

use std::io;

use chrono::Local;
use clap::Parser;
use runtime::{Agent, McpToolHost, OllamaBackend};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

#[derive(Parser)]
#[command(name = "chat")]
#[command(about = "Ask a local model a question, letting it call MCP tools", long_about = None)]
#[command(version)]
struct Cli {}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let _cli = Cli::parse();
    let config = Config::from_env();
    let prompt = prompt::read_user_prompt()?;

    let backend = OllamaBackend::builder(&config.ollama_url, &config.model)
        .temperature(config.temperature)
        .max_tokens(config.max_tokens)
        .reasoning(config.reasoning)
        .build();
    backend.validate_model().await?;
    info!(model = backend.model(), "using {backend}");

    let tools = McpToolHost::connect(&config.mcp_url)
        .await
        .map_err(|e| Error::Mcp {
            url: config.mcp_url.clone(),
            message: e.to_string(),
        })?;

    let agent = Agent::new(backend, tools).with_system(prompt::build_system_prompt(&Local::now()));
    let result = transcript::print_stream(agent.stream(&prompt), &mut io::stdout()).await;

    if let Err(e) = agent.into_tools().shutdown().await {
        warn!("failed to close mcp session: {e}");
    }
    result
}
