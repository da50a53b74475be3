//! # hogbot Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the top-level subcommands of the hogbot CLI and
//! the argument groups they share.
//!
//! ## Command Groups
//!
//! - `serve`: HTTP/WebSocket chat-bot server
//! - `ask`: Run one query and print the JSON reply
//! - `tables`: Print the intent and knowledge tables and their shadowed triggers
//!
//! Each command defines its own arguments structure and handler function.
//!

/// Argument groups shared by several commands (`--config`, engine flags).
pub mod args;
/// One-shot query from the command line.
pub mod ask;
/// The chat-bot server: configuration, handlers, WebSocket, and server loop.
pub mod serve;
/// Table inspection and shadowing report.
pub mod tables;
