//! # Dispatch Orchestrator
//!
//! File: cli/src/common/dispatch.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns one raw user query into one reply. Every transport (`GET /bot`, the
//! WebSocket `user_message` event, `hogbot ask`) goes through
//! `Dispatcher::handle`, which always produces a `BotReply`. There is no
//! error path out of this module.
//!
//! ## Decision order
//!
//! 1. Normalize the query (trim, lowercase).
//! 2. **Intent** match: generate flavor text from the intent's prompt
//!    (optionally framed with the humor prefix) and return the intent's route.
//! 3. **Knowledge** match: return the canned answer verbatim. The engine is
//!    not called.
//! 4. **Fallback**: generate from the fallback prompt (by default the
//!    normalized query itself) and append the fallback suffix.
//!
//! Each call is independent; no conversation state is kept between queries.
//!
use super::generation::{Gateway, Profile};
use super::intent::IntentTable;
use super::knowledge::KnowledgeTable;
use super::matching::normalize_query;
use serde::Serialize;
use tracing::{debug, info};

/// Placeholder replaced by the normalized query in `fallback_prompt`.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Which branch produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplySource {
    Intent,
    Knowledge,
    #[default]
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Intent => "intent",
            ReplySource::Knowledge => "knowledge",
            ReplySource::Fallback => "fallback",
        }
    }
}

/// The response payload shared by all transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotReply {
    pub response: String,
    pub route: Option<String>,
    /// Logged by the transports; not part of the JSON body.
    #[serde(skip)]
    pub source: ReplySource,
}

/// Fixed strings shaping prompts and replies for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub humor_prefix: Option<String>,
    pub fallback_prompt: String,
    pub fallback_suffix: String,
}

impl DispatchSettings {
    /// The defaults that go with `profile`.
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            humor_prefix: profile.default_humor_prefix().map(str::to_string),
            fallback_prompt: QUERY_PLACEHOLDER.to_string(),
            fallback_suffix: profile.default_fallback_suffix().to_string(),
        }
    }
}

/// Owns the tables and the gateway; shared read-only across requests.
pub struct Dispatcher {
    intents: IntentTable,
    knowledge: KnowledgeTable,
    gateway: Gateway,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        intents: IntentTable,
        knowledge: KnowledgeTable,
        gateway: Gateway,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            intents,
            knowledge,
            gateway,
            settings,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Resolves `raw_query` to a reply. Never fails.
    pub async fn handle(&self, raw_query: &str) -> BotReply {
        let query = normalize_query(raw_query);
        info!("User said: {}", query);

        if let Some(intent) = self.intents.resolve(&query) {
            debug!("Matched intent '{}' -> {}", intent.trigger, intent.route);
            let prompt = match &self.settings.humor_prefix {
                Some(prefix) => format!("{}{}", prefix, intent.prompt),
                None => intent.prompt.clone(),
            };
            let text = self.gateway.generate(&prompt).await.into_text();
            return BotReply {
                response: text,
                route: Some(intent.route.clone()),
                source: ReplySource::Intent,
            };
        }

        if let Some(answer) = self.knowledge.resolve(&query) {
            debug!("Matched knowledge entry for query '{}'", query);
            return BotReply {
                response: answer.to_string(),
                route: None,
                source: ReplySource::Knowledge,
            };
        }

        debug!("No table match, falling back to generation");
        let prompt = self.settings.fallback_prompt.replace(QUERY_PLACEHOLDER, &query);
        let text = self.gateway.generate(&prompt).await.into_text();
        BotReply {
            response: append_suffix(&text, &self.settings.fallback_suffix),
            route: None,
            source: ReplySource::Fallback,
        }
    }
}

/// Joins with a single space; an empty text yields the suffix alone.
fn append_suffix(text: &str, suffix: &str) -> String {
    match (text.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_string(),
        (false, true) => text.to_string(),
        (false, false) => format!("{} {}", text, suffix),
    }
}
