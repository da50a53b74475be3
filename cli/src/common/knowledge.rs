//! # Knowledge Resolver
//!
//! File: cli/src/common/knowledge.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Static FAQ answers. Consulted only when no intent matched, and the answer
//! is returned verbatim (trimmed), never passed through the generation engine.
//! Matching follows the same first-match-wins rules as the intent table.
//!
use super::intent::validate_trigger;
use super::matching::{self, Shadowing, Triggered};
use crate::core::error::{BotError, Result};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One canned answer keyed by its trigger phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeEntry {
    pub trigger: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(trigger: &str, answer: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            answer: answer.to_string(),
        }
    }
}

impl Triggered for KnowledgeEntry {
    fn trigger(&self) -> &str {
        &self.trigger
    }
}

/// Ordered, validated knowledge table.
#[derive(Debug, Clone)]
pub struct KnowledgeTable {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeTable {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            validate_trigger("knowledge", &entry.trigger)?;
            if !seen.insert(entry.trigger.as_str()) {
                return Err(anyhow!(BotError::InvalidTable {
                    table: "knowledge",
                    reason: format!("duplicate trigger '{}'", entry.trigger),
                }));
            }
            if entry.answer.trim().is_empty() {
                return Err(anyhow!(BotError::InvalidTable {
                    table: "knowledge",
                    reason: format!("trigger '{}' has an empty answer", entry.trigger),
                }));
            }
        }
        Ok(Self { entries })
    }

    /// Returns the trimmed answer of the first entry whose trigger occurs in `query`.
    pub fn resolve(&self, query: &str) -> Option<&str> {
        matching::first_match(&self.entries, query).map(|entry| entry.answer.trim())
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn shadowed(&self) -> Vec<Shadowing> {
        matching::shadowed_pairs(&self.entries)
    }
}

impl Default for KnowledgeTable {
    fn default() -> Self {
        Self {
            entries: default_knowledge(),
        }
    }
}

/// The built-in FAQ answers.
pub fn default_knowledge() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            "who is hogist",
            r#"
Founded in 2018, Hogist is a food-tech company that makes bulk food ordering simple.
We connect customers with verified caterers for corporate meals, events, and parties,
and take care of menus, delivery, and quality checks along the way.
"#,
        ),
        KnowledgeEntry::new(
            "what is hogist",
            r#"
Hogist is an online platform for bulk and event catering.
Tell us the occasion, headcount, and budget, and we will line up caterers,
menus, and delivery for you.
"#,
        ),
        KnowledgeEntry::new(
            "services",
            r#"
Our services:
- Corporate meal plans and cafeteria management
- Wedding, party, and event catering
- Bulk food orders for functions and gatherings
- Customised menus for every budget
"#,
        ),
        KnowledgeEntry::new(
            "how to order",
            r#"
Ordering is easy:
1. Share your event date, headcount, and cuisine preferences.
2. Pick a menu from the options we send.
3. Confirm, and we handle the cooking and delivery.
"#,
        ),
        KnowledgeEntry::new(
            "working hours",
            r#"
Our team is available Monday to Saturday, 9 AM to 7 PM.
Orders placed outside these hours are picked up the next working day.
"#,
        ),
    ]
}
