//! Gemini Image MCP Server
//!
//! MCP server for image generation using the Google Gemini API.

use anyhow::Result;
use clap::Parser;
use gemini_image_mcp::ImageServer;
use gemini_image_mcp_common::config::API_KEY_VAR;
use gemini_image_mcp_common::tracing::init_tracing;
use gemini_image_mcp_common::{Config, McpServerBuilder, TransportArgs};

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "gemini-image-mcp")]
#[command(about = "MCP server for image generation using Google Gemini")]
#[command(version)]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!(
            "{} is not set; image tools will fail until it is provided",
            API_KEY_VAR
        );
    }
    tracing::info!(
        api_base_url = %config.api_base_url,
        auth = config.auth_token.is_some(),
        "Configuration loaded"
    );

    let auth_token = config.auth_token.clone();
    let server = ImageServer::new(config);

    let transport = args.transport.into_transport();
    tracing::info!(transport = %transport, "Starting MCP server");

    McpServerBuilder::new(server)
        .with_transport(transport)
        .with_auth_token(auth_token)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
