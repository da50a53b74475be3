//! # hogbot Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the infrastructure the commands stand on:
//! configuration, error types, and the status page template.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, layering, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `templating`: Tera rendering of the diagnostic status page
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{BotError, Result}; // For error handling
//! use crate::core::templating; // For the status page
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
