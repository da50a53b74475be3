//! # hogbot Status Page Rendering
//!
//! File: cli/src/core/templating.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Renders the human-readable diagnostic page served at `GET /`: the server
//! banner, the engine and profile in use, and the most recent request-log
//! entries. The page is for operators glancing at a running instance; nothing
//! parses it.
//!
//! ## Architecture
//!
//! The page is a single inline Tera template rendered with `Tera::one_off`
//! and autoescaping on, so client-controlled values recorded in the request
//! log (URLs, peer addresses) are HTML-escaped.
//!
//! ## Examples
//!
//! ```rust
//! let page = StatusPage {
//!     banner: BANNER,
//!     engine: "http://127.0.0.1:8081/generate (./local_flan_t5_small)".to_string(),
//!     profile: "continuation",
//!     total_logged: log.len(),
//!     capacity: log.capacity(),
//!     entries: log.recent(10),
//! };
//! let html = templating::render_status_page(&page)?;
//! ```
//!
use crate::common::request_log::RequestLogEntry;
use crate::core::error::{BotError, Result};
use anyhow::anyhow;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

/// First line of the status page.
pub const BANNER: &str = "Hogist Voice Bot Server Running";

const STATUS_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>hogbot</title>
</head>
<body>
<h1>{{ banner }}</h1>
<ul>
  <li>Engine: {{ engine }}</li>
  <li>Profile: {{ profile }}</li>
  <li>Requests logged: {{ total_logged }} (keeping the last {{ capacity }})</li>
</ul>
<h2>Recent requests</h2>
{% if entries | length == 0 %}
<p>No requests recorded yet.</p>
{% else %}
<table>
<tr><th>Time (UTC)</th><th>Client</th><th>Method</th><th>URL</th></tr>
{% for entry in entries %}
<tr><td>{{ entry.received_at }}</td><td>{{ entry.client_address }}</td><td>{{ entry.method }}</td><td>{{ entry.url }}</td></tr>
{% endfor %}
</table>
{% endif %}
</body>
</html>
"#;

/// Values shown on the status page.
#[derive(Debug, Serialize)]
pub struct StatusPage<'a> {
    pub banner: &'a str,
    pub engine: String,
    pub profile: &'a str,
    pub total_logged: usize,
    pub capacity: usize,
    /// Oldest first.
    pub entries: Vec<RequestLogEntry>,
}

/// Renders `page` to HTML.
pub fn render_status_page(page: &StatusPage<'_>) -> Result<String> {
    let context = Context::from_serialize(page).map_err(|e| {
        anyhow!(BotError::Template { source: e }).context("Failed to build status page context")
    })?;
    let html = Tera::one_off(STATUS_TEMPLATE, &context, true).map_err(|e| {
        anyhow!(BotError::Template { source: e }).context("Failed to render status page")
    })?;
    debug!("Rendered status page with {} entries", page.entries.len());
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(entries: Vec<RequestLogEntry>) -> StatusPage<'static> {
        StatusPage {
            banner: BANNER,
            engine: "http://127.0.0.1:8081/generate (flan)".to_string(),
            profile: "instruction",
            total_logged: entries.len(),
            capacity: 50,
            entries,
        }
    }

    #[test]
    fn test_renders_banner_engine_and_profile() -> Result<()> {
        let html = render_status_page(&page(Vec::new()))?;
        assert!(html.contains("<h1>Hogist Voice Bot Server Running</h1>"));
        assert!(html.contains("127.0.0.1:8081"));
        assert!(html.contains("(flan)"));
        assert!(html.contains("Profile: instruction"));
        assert!(html.contains("Requests logged: 0 (keeping the last 50)"));
        assert!(html.contains("No requests recorded yet."));
        Ok(())
    }

    #[test]
    fn test_renders_entries_in_given_order() -> Result<()> {
        let entries = vec![
            RequestLogEntry::now("10.0.0.1:1000", "GET", "/bot?query=first"),
            RequestLogEntry::now("10.0.0.2:2000", "WS", "user_message"),
        ];
        let html = render_status_page(&page(entries))?;
        let first = html.find("query=first").unwrap();
        let second = html.find("user_message").unwrap();
        assert!(first < second);
        assert!(html.contains("10.0.0.2:2000"));
        assert!(!html.contains("No requests recorded yet."));
        Ok(())
    }

    #[test]
    fn test_escapes_recorded_urls() -> Result<()> {
        let entries = vec![RequestLogEntry::now(
            "127.0.0.1:1",
            "GET",
            "/bot?query=<script>alert(1)</script>",
        )];
        let html = render_status_page(&page(entries))?;
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        // Tera's escaper also encodes '/'.
        assert!(html.contains("&#x2F;bot?query="));
        Ok(())
    }
}
