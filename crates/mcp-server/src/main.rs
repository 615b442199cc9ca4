//! Memento MCP Server
//!
//! Gives AI agents durable cross-session continuity via MCP protocol.
//!
//! ## Tools
//!
//! - `create_session_summary` - Save a flat session summary (overview, work, decisions, next steps)
//! - `record_session` - Save a full structured session record
//! - `get_last_session` - Restore the most recent session summary
//!
//! ## Configuration
//!
//! - `MEMENTO_GRAPH_PATH` - graph snapshot file (default `~/.memento/graph.json`)
//! - `MEMENTO_EPHEMERAL=1` - keep the graph in memory only
//! - `MEMENTO_ENVIRONMENT` - environment description stamped into recorded sessions
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "memento": {
//!       "command": "memento-mcp"
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod config;
mod tools;

use config::ServerConfig;
use tools::MementoService;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    log::info!("Starting Memento MCP server ({})", config.store);

    let store = config.open_store().context("failed to open graph store")?;
    let service = MementoService::new(store, config.environment);
    let server = service.serve(stdio()).await?;

    // Wait for shutdown
    server.waiting().await?;

    log::info!("Memento MCP server stopped");
    Ok(())
}
