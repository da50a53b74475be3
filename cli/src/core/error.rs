//! # hogbot Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the application-level error types used by hogbot's
//! startup path: configuration loading, table validation, template rendering,
//! and server binding.
//!
//! Request handling never surfaces these errors to a client. Generation
//! failures have their own typed error (`common::generation::GenerationError`)
//! which the gateway converts into a fallback reply before anything reaches
//! the transport layer.
//!
//! ## Architecture
//!
//! - `BotError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! ## Examples
//!
//! ```rust
//! if entry.route.is_empty() {
//!     return Err(anyhow!(BotError::InvalidTable {
//!         table: "intents",
//!         reason: format!("trigger '{}' has an empty route", entry.trigger),
//!     }));
//! }
//!
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read config file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the hogbot application.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {table} table: {reason}")]
    InvalidTable { table: &'static str, reason: String },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Server error: {0}")]
    Server(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
