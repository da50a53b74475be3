//! # hogbot CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! is its own crate and pulls this in with `mod common;`.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Engine URL with nothing listening behind it (discard port).
pub const UNREACHABLE_ENGINE: &str = "http://127.0.0.1:9/generate";

/// # Get hogbot Command (`hogbot_cmd`)
///
/// An `assert_cmd::Command` for the compiled `hogbot` binary, with the
/// `HOGBOT_*` environment variables cleared so the host environment cannot
/// leak into a test.
pub fn hogbot_cmd() -> Command {
    let mut cmd = Command::cargo_bin("hogbot").expect("Failed to find hogbot binary for testing");
    cmd.env_remove("HOGBOT_CONFIG")
        .env_remove("HOGBOT_ENGINE_URL")
        .env_remove("HOGBOT_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `content` to `bot.toml` in a fresh temp dir. Keep the `TempDir` alive.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bot.toml");
    fs::write(&path, content).expect("Failed to write config file");
    (dir, path)
}
