//! # Trigger Matching
//!
//! File: cli/src/common/matching.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Both lookup tables (intents and knowledge) share one matching discipline:
//! the table is an ordered list, each entry carries a lowercase trigger phrase,
//! and the first entry whose trigger occurs anywhere in the query wins.
//! It is not a longest-match or best-match search. A broad
//! trigger declared before a more specific one shadows it; `shadowed_pairs`
//! reports such pairs so they can be surfaced to an operator (`hogbot tables`
//! and config loading warn about them) instead of being reordered silently.
//!
//! Queries must already be normalized (see `normalize_query`); the matching
//! functions themselves never touch case or whitespace.
//!

/// An entry that can be selected by a trigger substring.
pub trait Triggered {
    /// The lowercase phrase searched for in the normalized query.
    fn trigger(&self) -> &str;
}

/// Trims surrounding whitespace and lowercases the query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns the first entry, in table order, whose trigger occurs in `query`.
pub fn first_match<'a, T: Triggered>(entries: &'a [T], query: &str) -> Option<&'a T> {
    entries.iter().find(|entry| query.contains(entry.trigger()))
}

/// A trigger that can never be selected because an earlier one always wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadowing {
    /// The earlier, broader trigger.
    pub winner: String,
    /// The later trigger that contains `winner` and therefore never matches.
    pub shadowed: String,
}

/// Finds later entries whose trigger contains an earlier entry's trigger.
///
/// Any query containing the later trigger also contains the earlier one, so
/// the later entry is unreachable under first-match-wins.
pub fn shadowed_pairs<T: Triggered>(entries: &[T]) -> Vec<Shadowing> {
    let mut pairs = Vec::new();
    for (idx, later) in entries.iter().enumerate() {
        if let Some(earlier) = entries[..idx]
            .iter()
            .find(|earlier| later.trigger().contains(earlier.trigger()))
        {
            pairs.push(Shadowing {
                winner: earlier.trigger().to_string(),
                shadowed: later.trigger().to_string(),
            });
        }
    }
    pairs
}

/// Finds entries of a lower-priority table that a higher-priority table hides.
///
/// Used for knowledge triggers that contain an intent trigger: the intent
/// table is consulted first, so such knowledge entries never answer.
pub fn shadowed_across<H: Triggered, L: Triggered>(higher: &[H], lower: &[L]) -> Vec<Shadowing> {
    lower
        .iter()
        .filter_map(|entry| {
            higher
                .iter()
                .find(|winner| entry.trigger().contains(winner.trigger()))
                .map(|winner| Shadowing {
                    winner: winner.trigger().to_string(),
                    shadowed: entry.trigger().to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Phrase(&'static str);

    impl Triggered for Phrase {
        fn trigger(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Take Me HOME \n"), "take me home");
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_first_match_uses_declaration_order() {
        let table = [Phrase("about"), Phrase("about team")];
        let hit = first_match(&table, "show me the about team page").unwrap();
        assert_eq!(hit.0, "about");
    }

    #[test]
    fn test_first_match_substring_anywhere() {
        let table = [Phrase("contact us"), Phrase("home")];
        assert_eq!(first_match(&table, "homepage please").unwrap().0, "home");
        assert!(first_match(&table, "nothing relevant").is_none());
        assert!(first_match(&table, "").is_none());
    }

    #[test]
    fn test_first_match_does_not_normalize() {
        let table = [Phrase("home")];
        assert!(first_match(&table, "HOME").is_none());
    }

    #[test]
    fn test_shadowed_pairs_reports_broad_before_specific() {
        let table = [Phrase("about"), Phrase("home"), Phrase("about team")];
        let pairs = shadowed_pairs(&table);
        assert_eq!(
            pairs,
            vec![Shadowing {
                winner: "about".into(),
                shadowed: "about team".into()
            }]
        );
    }

    #[test]
    fn test_shadowed_pairs_specific_first_is_fine() {
        let table = [Phrase("about team"), Phrase("about")];
        assert!(shadowed_pairs(&table).is_empty());
    }

    #[test]
    fn test_shadowed_across_tables() {
        let intents = [Phrase("courses")];
        let knowledge = [Phrase("who is hogist"), Phrase("hogist courses fee")];
        let pairs = shadowed_across(&intents, &knowledge);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].winner, "courses");
        assert_eq!(pairs[0].shadowed, "hogist courses fee");
    }
}
