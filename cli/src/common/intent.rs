//! # Intent Resolver
//!
//! File: cli/src/common/intent.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Maps navigation requests ("take me home", "open contact us") to a site
//! route plus a flavor-text prompt for the generation engine. The table is an
//! ordered priority list; see `common::matching` for the first-match-wins
//! discipline and its shadowing caveat.
//!
//! Tables are validated once, when built, and are read-only afterwards.
//!
use super::matching::{self, Shadowing, Triggered};
use crate::core::error::{BotError, Result};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One intent: a trigger phrase, the prompt sent to the engine, and the route returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerEntry {
    pub trigger: String,
    pub prompt: String,
    pub route: String,
}

impl TriggerEntry {
    pub fn new(trigger: &str, prompt: &str, route: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            prompt: prompt.to_string(),
            route: route.to_string(),
        }
    }
}

impl Triggered for TriggerEntry {
    fn trigger(&self) -> &str {
        &self.trigger
    }
}

/// Ordered, validated intent table.
#[derive(Debug, Clone)]
pub struct IntentTable {
    entries: Vec<TriggerEntry>,
}

impl IntentTable {
    /// Builds a table, rejecting blank or non-normalized triggers, duplicates,
    /// empty prompts, and routes that do not start with `/`.
    pub fn new(entries: Vec<TriggerEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            validate_trigger("intents", &entry.trigger)?;
            if !seen.insert(entry.trigger.as_str()) {
                return Err(anyhow!(BotError::InvalidTable {
                    table: "intents",
                    reason: format!("duplicate trigger '{}'", entry.trigger),
                }));
            }
            if entry.prompt.trim().is_empty() {
                return Err(anyhow!(BotError::InvalidTable {
                    table: "intents",
                    reason: format!("trigger '{}' has an empty prompt", entry.trigger),
                }));
            }
            if !entry.route.starts_with('/') {
                return Err(anyhow!(BotError::InvalidTable {
                    table: "intents",
                    reason: format!(
                        "route '{}' for trigger '{}' must start with '/'",
                        entry.route, entry.trigger
                    ),
                }));
            }
        }
        Ok(Self { entries })
    }

    /// Returns the first entry whose trigger occurs in the normalized `query`.
    pub fn resolve(&self, query: &str) -> Option<&TriggerEntry> {
        matching::first_match(&self.entries, query)
    }

    pub fn entries(&self) -> &[TriggerEntry] {
        &self.entries
    }

    /// Entries that can never match because an earlier trigger is contained in theirs.
    pub fn shadowed(&self) -> Vec<Shadowing> {
        matching::shadowed_pairs(&self.entries)
    }
}

impl Default for IntentTable {
    fn default() -> Self {
        Self {
            entries: default_intents(),
        }
    }
}

/// Shared trigger checks for both tables.
pub(crate) fn validate_trigger(table: &'static str, trigger: &str) -> Result<()> {
    if trigger.trim().is_empty() {
        return Err(anyhow!(BotError::InvalidTable {
            table,
            reason: "empty trigger".to_string(),
        }));
    }
    if trigger != matching::normalize_query(trigger) {
        return Err(anyhow!(BotError::InvalidTable {
            table,
            reason: format!(
                "trigger '{}' must be lowercase without surrounding whitespace",
                trigger
            ),
        }));
    }
    Ok(())
}

/// The built-in site navigation intents, in priority order.
pub fn default_intents() -> Vec<TriggerEntry> {
    vec![
        TriggerEntry::new(
            "home",
            "Explain going to the home page in a funny way using Indian English.",
            "/",
        ),
        TriggerEntry::new(
            "about pitch",
            "Describe navigating to About Pitch page like a confused college lecturer.",
            "/about/pitch",
        ),
        TriggerEntry::new(
            "about team",
            "Explain About Team page like a local event compere announcing the stars.",
            "/about/team",
        ),
        TriggerEntry::new(
            "contact us",
            "Open Contact Us page like an overenthusiastic government office peon.",
            "/contact",
        ),
        TriggerEntry::new(
            "courses",
            "Show available courses like a desperate coaching center guy trying to impress parents.",
            "/courses",
        ),
        TriggerEntry::new(
            "features",
            "Take them to features page like a local tech support guy explaining rocket science.",
            "/features",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid_and_unshadowed() {
        let table = IntentTable::new(default_intents()).expect("built-in intents must validate");
        assert_eq!(table.entries().len(), 6);
        assert!(table.shadowed().is_empty());
    }

    #[test]
    fn test_resolve_home() {
        let table = IntentTable::default();
        let hit = table.resolve("take me home").unwrap();
        assert_eq!(hit.route, "/");
        assert!(hit.prompt.contains("home page"));
    }

    #[test]
    fn test_resolve_multi_word_trigger() {
        let table = IntentTable::default();
        assert_eq!(table.resolve("open the about team page").unwrap().route, "/about/team");
        assert_eq!(table.resolve("please contact us").unwrap().route, "/contact");
        assert!(table.resolve("about").is_none());
    }

    #[test]
    fn test_resolve_earliest_declared_wins_when_several_match() {
        let table = IntentTable::default();
        // "home" is declared before "features".
        let hit = table.resolve("features on the home page").unwrap();
        assert_eq!(hit.trigger, "home");
    }

    #[test]
    fn test_broad_trigger_shadows_later_specific_one() {
        // Reproduced as declared, not reordered: "about" swallows "about team".
        let table = IntentTable::new(vec![
            TriggerEntry::new("about", "About prompt", "/about"),
            TriggerEntry::new("about team", "Team prompt", "/about/team"),
        ])
        .unwrap();
        assert_eq!(table.resolve("about team").unwrap().route, "/about");
        let shadowed = table.shadowed();
        assert_eq!(shadowed.len(), 1);
        assert_eq!(shadowed[0].shadowed, "about team");
    }

    #[test]
    fn test_rejects_duplicate_triggers() {
        let result = IntentTable::new(vec![
            TriggerEntry::new("home", "a", "/"),
            TriggerEntry::new("home", "b", "/home"),
        ]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate trigger 'home'"));
    }

    #[test]
    fn test_rejects_uppercase_or_blank_trigger() {
        assert!(IntentTable::new(vec![TriggerEntry::new("Home", "a", "/")]).is_err());
        assert!(IntentTable::new(vec![TriggerEntry::new(" home", "a", "/")]).is_err());
        assert!(IntentTable::new(vec![TriggerEntry::new("", "a", "/")]).is_err());
    }

    #[test]
    fn test_rejects_relative_route_and_empty_prompt() {
        let err = IntentTable::new(vec![TriggerEntry::new("home", "a", "home")])
            .unwrap_err()
            .to_string();
        assert!(err.contains("must start with '/'"));
        assert!(IntentTable::new(vec![TriggerEntry::new("home", "  ", "/")]).is_err());
    }
}
