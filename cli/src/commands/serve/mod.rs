//! # hogbot Server (`hogbot serve`)
//!
//! File: cli/src/commands/serve/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs the chat-bot front end: an HTTP JSON endpoint, a WebSocket event
//! channel, and a small status page, all answering through the same
//! dispatcher.
//!
//! ## Architecture
//!
//! - `config.rs`: Command-line arguments and configuration loading
//! - `state.rs`: State shared by all handlers
//! - `handlers.rs`: `/`, `/bot`, and the request-recording middleware
//! - `ws.rs`: `/ws` event envelopes
//! - `server_logic.rs`: Router assembly, binding, and graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! hogbot serve
//! hogbot -v serve --port 5000 --profile instruction
//! curl 'http://127.0.0.1:5000/bot?query=take%20me%20home'
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

/// Argument parsing and configuration loading.
pub mod config;
/// HTTP route handlers and middleware.
pub mod handlers;
/// Router assembly and the server loop.
pub mod server_logic;
/// Handler state.
pub mod state;
/// WebSocket transport.
pub mod ws;

/// Entry point for `hogbot serve`.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);
    let config = config::load_serve_config(&args)?;
    info!(
        "Effective server config: {}:{} (profile {})",
        config.server.host, config.server.port, config.generation.profile
    );
    server_logic::run_server(config).await?;
    Ok(())
}
