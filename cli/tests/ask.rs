//! # hogbot CLI Ask Integration Tests
//!
//! File: cli/tests/ask.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `hogbot ask`. The engine URL points at a port with
//! nothing listening, so generated branches exercise the failure message
//! while knowledge answers come back untouched.
//!

mod common;
use common::*;
use predicates::prelude::*;
use serde_json::Value;

fn ask(config: &std::path::Path, query: &[&str]) -> Value {
    let output = hogbot_cmd()
        .arg("ask")
        .arg("--config")
        .arg(config)
        .args(["--engine-url", UNREACHABLE_ENGINE])
        .args(query)
        .output()
        .expect("Failed to run hogbot ask");
    assert!(
        output.status.success(),
        "hogbot ask failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("ask did not print JSON")
}

#[test]
fn test_ask_intent_returns_route_with_failure_message() {
    let (_dir, config) = write_config("");
    let reply = ask(&config, &["take", "me", "home"]);
    assert_eq!(reply["route"], "/");
    assert_eq!(
        reply["response"],
        "I had trouble understanding that. Try again."
    );
}

#[test]
fn test_ask_knowledge_is_exact_answer() {
    let (_dir, config) = write_config("");
    let reply = ask(&config, &["Who is Hogist?"]);
    assert_eq!(reply["route"], Value::Null);
    let text = reply["response"].as_str().unwrap();
    assert!(text.starts_with("Founded in 2018, Hogist is a food-tech company"));
    assert_eq!(text, text.trim());
}

#[test]
fn test_ask_fallback_appends_suffix() {
    let (_dir, config) = write_config(
        r#"
        [generation]
        profile = "instruction"
        "#,
    );
    let reply = ask(&config, &["blah", "random", "text"]);
    assert_eq!(reply["route"], Value::Null);
    assert_eq!(
        reply["response"],
        "Hmm... I didn't get that. Let's try something else! Still not sure what you mean? Ask me anything!"
    );
}

#[test]
fn test_ask_uses_configured_tables() {
    let (_dir, config) = write_config(
        r#"
        [[intents]]
        trigger = "menu"
        prompt = "Show the menu."
        route = "/menu"

        [dispatch]
        failure_message = "Kitchen is closed."
        "#,
    );
    let reply = ask(&config, &["show", "me", "the", "MENU"]);
    assert_eq!(reply["route"], "/menu");
    assert_eq!(reply["response"], "Kitchen is closed.");
}

#[test]
fn test_ask_invalid_config_fails() {
    let (_dir, config) = write_config(
        r#"
        [dispatch]
        fallback_prompt = "no placeholder here"
        "#,
    );
    hogbot_cmd()
        .arg("ask")
        .arg("--config")
        .arg(&config)
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("{query}"));
}

#[test]
fn test_ask_requires_query() {
    hogbot_cmd().arg("ask").assert().failure();
}

#[test]
fn test_ask_verbose_logs_answering_branch() {
    let (_dir, config) = write_config("");
    hogbot_cmd()
        .args(["-v", "ask", "--config"])
        .arg(&config)
        .args(["--engine-url", UNREACHABLE_ENGINE])
        .arg("who is hogist")
        .assert()
        .success()
        .stdout(predicate::str::contains("source").not())
        .stderr(predicate::str::contains("Answered from the knowledge branch"));
}
