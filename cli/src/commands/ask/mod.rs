//! # One-Shot Query (`hogbot ask`)
//!
//! File: cli/src/commands/ask/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs a single query through the dispatcher without starting a server and
//! prints the same JSON body `GET /bot` would return. Handy for checking
//! tables and engine connectivity from a shell.
//!
//! ## Examples
//!
//! ```bash
//! hogbot ask take me home
//! # {"response":"...","route":"/"}
//!
//! hogbot ask --config ./bot.toml "who is hogist"
//! ```
//!
use crate::commands::args::{ConfigArgs, EngineArgs};
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The query. Several words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Pretty-print the JSON reply.
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Entry point for `hogbot ask`.
pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let mut overrides = args.config.to_overrides();
    args.engine.apply(&mut overrides);
    let config = config::load_config(&overrides)?;
    let dispatcher = config.build_dispatcher()?;

    let query = args.query.join(" ");
    info!("Asking: {}", query);
    let reply = dispatcher.handle(&query).await;
    info!("Answered from the {} branch", reply.source.as_str());

    let body = if args.pretty {
        serde_json::to_string_pretty(&reply)
    } else {
        serde_json::to_string(&reply)
    }
    .context("Failed to serialize reply")?;
    println!("{}", body);
    Ok(())
}
