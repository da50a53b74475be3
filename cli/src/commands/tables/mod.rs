//! # Table Inspection (`hogbot tables`)
//!
//! File: cli/src/commands/tables/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Prints the intent and knowledge tables in the order they are matched,
//! followed by every trigger that can never win:
//!
//! - an intent trigger containing an earlier intent trigger,
//! - a knowledge trigger containing an earlier knowledge trigger,
//! - a knowledge trigger containing any intent trigger (intents are checked first).
//!
//! Shadowed entries are reported only; the tables are used as declared.
//!
//! ## Examples
//!
//! ```bash
//! hogbot tables
//! hogbot tables --config ./bot.toml
//! ```
//!
use crate::commands::args::ConfigArgs;
use crate::common::matching;
use crate::core::config::{self, BotConfig};
use crate::core::error::Result;
use clap::Parser;
use std::fmt::Write;

#[derive(Parser, Debug)]
pub struct TablesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Entry point for `hogbot tables`.
pub async fn handle_tables(args: TablesArgs) -> Result<()> {
    let config = config::load_config(&args.config.to_overrides())?;
    print!("{}", render_tables(&config));
    Ok(())
}

fn render_tables(config: &BotConfig) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Intents ({}, checked first):", config.intents.entries().len());
    for (i, entry) in config.intents.entries().iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. \"{}\" -> {}", i + 1, entry.trigger, entry.route);
        let _ = writeln!(out, "      prompt: {}", entry.prompt);
    }

    let _ = writeln!(out, "\nKnowledge ({}):", config.knowledge.entries().len());
    for (i, entry) in config.knowledge.entries().iter().enumerate() {
        let answer = entry.answer.trim();
        let first_line = answer.lines().next().unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:>2}. \"{}\" ({} chars): {}",
            i + 1,
            entry.trigger,
            answer.chars().count(),
            first_line
        );
    }

    let intent_shadows = config.intents.shadowed();
    let knowledge_shadows = config.knowledge.shadowed();
    let cross_shadows =
        matching::shadowed_across(config.intents.entries(), config.knowledge.entries());

    let _ = writeln!(out, "\nShadowed triggers:");
    if intent_shadows.is_empty() && knowledge_shadows.is_empty() && cross_shadows.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for pair in &intent_shadows {
        let _ = writeln!(
            out,
            "  intent \"{}\" is shadowed by intent \"{}\"",
            pair.shadowed, pair.winner
        );
    }
    for pair in &knowledge_shadows {
        let _ = writeln!(
            out,
            "  knowledge \"{}\" is shadowed by knowledge \"{}\"",
            pair.shadowed, pair.winner
        );
    }
    for pair in &cross_shadows {
        let _ = writeln!(
            out,
            "  knowledge \"{}\" is shadowed by intent \"{}\"",
            pair.shadowed, pair.winner
        );
    }
    out
}
