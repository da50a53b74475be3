//! # Generation Gateway
//!
//! File: cli/src/common/generation/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The gateway is the only place hogbot talks to a text-generation engine.
//! It makes exactly one engine call per request, takes the first candidate,
//! and cleans it according to the configured `Profile`.
//!
//! The engine can fail for reasons this code cannot see into (model errors,
//! resource exhaustion, a dead endpoint). Those failures are typed as
//! `GenerationError` and returned by `Gateway::try_generate`; `Gateway::generate`
//! converts them into `GenerationResult::Fallback` carrying a fixed friendly
//! message. Callers above the gateway therefore always receive text.
//!
//! ## Architecture
//!
//! - `profile`: the two capability variants and their parameter sets.
//! - `http`: `HttpEngine`, the `TextEngine` implementation that calls a local
//!   inference server over HTTP.
//! - `TextEngine`: the seam between the gateway and a concrete engine.
//!
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

pub mod http;
pub mod profile;

pub use profile::{GenerationParams, ParamOverrides, Profile};

/// Failure of a single engine call.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode engine response: {0}")]
    Decode(String),

    #[error("engine returned no candidates")]
    EmptyOutput,
}

/// A text-generation backend. Returns raw candidates, best first.
#[async_trait]
pub trait TextEngine: Send + Sync {
    /// Human-readable engine identity for logs and the status page.
    fn describe(&self) -> String;

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, GenerationError>;
}

/// Outcome of `Gateway::generate`. Both variants carry displayable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Generated(String),
    Fallback(String),
}

impl GenerationResult {
    pub fn into_text(self) -> String {
        match self {
            GenerationResult::Generated(text) | GenerationResult::Fallback(text) => text,
        }
    }
}

/// Wraps a `TextEngine` with a fixed profile, parameter set, and failure message.
pub struct Gateway {
    engine: Arc<dyn TextEngine>,
    profile: Profile,
    params: GenerationParams,
    failure_message: String,
}

impl Gateway {
    pub fn new(
        engine: Arc<dyn TextEngine>,
        profile: Profile,
        params: GenerationParams,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            profile,
            params,
            failure_message: failure_message.into(),
        }
    }

    /// Gateway with the profile's own parameters and failure message.
    #[cfg(test)]
    pub fn with_profile_defaults(engine: Arc<dyn TextEngine>, profile: Profile) -> Self {
        Self::new(
            engine,
            profile,
            profile.params(),
            profile.default_failure_message(),
        )
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    pub fn engine_description(&self) -> String {
        self.engine.describe()
    }

    /// One engine call; the first candidate shaped by the profile.
    pub async fn try_generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!("Generating with {} profile for prompt: {}", self.profile, prompt);
        let candidates = self.engine.generate(prompt, &self.params).await?;
        let first = candidates
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyOutput)?;
        Ok(self.profile.shape(&first))
    }

    /// Never fails: engine errors become `GenerationResult::Fallback`.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        match self.try_generate(prompt).await {
            Ok(text) => GenerationResult::Generated(text),
            Err(e) => {
                error!("Error generating response: {}", e);
                GenerationResult::Fallback(self.failure_message.clone())
            }
        }
    }
}

/// Scriptable engine for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) struct StubEngine {
        reply: std::result::Result<Vec<String>, String>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl StubEngine {
        pub(crate) fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(vec![text.to_string()]),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn candidates(texts: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(texts.iter().map(|t| t.to_string()).collect()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextEngine for StubEngine {
        fn describe(&self) -> String {
            "stub".to_string()
        }

        async fn generate(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<Vec<String>, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|body| GenerationError::Status { status: 500, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubEngine;
    use super::*;

    #[tokio::test]
    async fn test_generate_takes_first_candidate_and_shapes_it() {
        let engine = StubEngine::candidates(&["  first line\nsecond  ", "other candidate"]);
        let gateway = Gateway::with_profile_defaults(engine.clone(), Profile::Continuation);

        let result = gateway.generate("prompt").await;
        assert_eq!(result, GenerationResult::Generated("first line".into()));
        assert_eq!(engine.calls(), 1);
        assert_eq!(engine.prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_instruction_profile_keeps_all_lines() {
        let engine = StubEngine::replying("  first line\nsecond  ");
        let gateway = Gateway::with_profile_defaults(engine, Profile::Instruction);
        assert_eq!(
            gateway.generate("prompt").await.into_text(),
            "first line\nsecond"
        );
    }

    #[tokio::test]
    async fn test_engine_failure_becomes_fallback() {
        let engine = StubEngine::failing("CUDA out of memory");
        let gateway = Gateway::with_profile_defaults(engine.clone(), Profile::Continuation);

        let err = gateway.try_generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 500, .. }));

        let result = gateway.generate("prompt").await;
        assert!(matches!(result, GenerationResult::Fallback(_)));
        assert_eq!(
            result.into_text(),
            "I had trouble understanding that. Try again."
        );
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_candidates_becomes_fallback() {
        let engine = StubEngine::candidates(&[]);
        let gateway = Gateway::new(
            engine,
            Profile::Instruction,
            Profile::Instruction.params(),
            "custom failure",
        );
        assert!(matches!(
            gateway.try_generate("x").await,
            Err(GenerationError::EmptyOutput)
        ));
        assert_eq!(
            gateway.generate("x").await,
            GenerationResult::Fallback("custom failure".into())
        );
    }
}
