//! # hogbot Domain Modules (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the bot's domain logic, shared by every command
//! and transport: table matching, the intent and knowledge resolvers, the
//! generation gateway, the dispatch orchestrator, and the request log.
//!
//! Command handlers (`commands::`) wire these pieces to a transport;
//! infrastructure (`core::`) supplies configuration, errors, and templating.
//!
//! ## Architecture
//!
//! - **`matching`**: Query normalization, first-match-wins lookup, and shadowing detection.
//! - **`intent`**: Trigger → {prompt, route} navigation table.
//! - **`knowledge`**: Trigger → canned answer FAQ table.
//! - **`generation`**: The gateway around the external text-generation engine, its profiles, and the HTTP engine client.
//! - **`dispatch`**: Intent → knowledge → generation decision, producing the reply payload.
//! - **`request_log`**: Bounded FIFO of recent requests for the status page.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::dispatch::Dispatcher;
//!
//! # async fn run_example(bot: &Dispatcher) {
//! let reply = bot.handle("take me home").await;
//! assert_eq!(reply.route.as_deref(), Some("/"));
//! # }
//! ```
//!

/// Intent → knowledge → generation decision and the reply payload.
pub mod dispatch;
/// Generation gateway, profiles, and the HTTP engine client.
pub mod generation;
/// Navigation intent table.
pub mod intent;
/// FAQ knowledge table.
pub mod knowledge;
/// Shared trigger-matching discipline.
pub mod matching;
/// Bounded in-memory request log.
pub mod request_log;
