//! Nano Banana MCP Server
//!
//! MCP server for image generation, editing, composition and description
//! using the Gemini API.

use anyhow::{Context, Result};
use clap::Parser;
use nano_banana_mcp::NanoBananaServer;
use nano_banana_mcp_common::tracing::init_tracing;
use nano_banana_mcp_common::{Config, McpServerBuilder, TransportArgs};

/// Command-line arguments for the Nano Banana server.
#[derive(Parser, Debug)]
#[command(name = "nano-banana-mcp")]
#[command(about = "MCP server for image generation and editing using Gemini (Nano Banana)")]
#[command(version)]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("nano-banana-mcp server starting...");

    let args = Args::parse();

    // A missing API key is fatal before any tool can be called.
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(base_url = %config.base_url, "Configuration loaded");

    let server = NanoBananaServer::new(&config);

    let transport = args.transport.into_transport();

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
