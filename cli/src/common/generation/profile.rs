//! # Generation Profiles
//!
//! File: cli/src/common/generation/profile.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The gateway runs against one of two kinds of model, and they are kept as
//! separate named profiles because they produce differently shaped output:
//!
//! - **Continuation**: a causal language model that continues the prompt.
//!   Greedy decoding, short output, and only the first line of the
//!   continuation is kept (these models tend to echo the prompt or ramble on
//!   into further paragraphs).
//! - **Instruction**: an instruction-tuned sequence-to-sequence model.
//!   Sampled decoding with a longer budget, and the full text is kept.
//!
//! Each profile also supplies the default dispatch strings for its deployment
//! (humor prefix, fallback suffix, failure message). Every value can be
//! overridden from the config file.
//!
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token id used for padding by GPT-2 style continuation models.
const CONTINUATION_PAD_TOKEN_ID: u32 = 50256;

/// Named generation capability variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Causal continuation model; output truncated to its first line.
    #[default]
    Continuation,
    /// Instruction-tuned seq2seq model; full output kept.
    Instruction,
}

/// Parameters forwarded to the engine with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_length: usize,
    pub num_return_sequences: usize,
    pub do_sample: bool,
    pub truncation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad_token_id: Option<u32>,
}

/// Per-deployment overrides from the `[generation.parameters]` config section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamOverrides {
    pub max_length: Option<usize>,
    pub do_sample: Option<bool>,
    pub truncation: Option<bool>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub repetition_penalty: Option<f32>,
    pub pad_token_id: Option<u32>,
}

impl GenerationParams {
    /// Returns a copy with every `Some` override applied.
    pub fn with_overrides(mut self, overrides: &ParamOverrides) -> Self {
        if let Some(v) = overrides.max_length {
            self.max_length = v;
        }
        if let Some(v) = overrides.do_sample {
            self.do_sample = v;
        }
        if let Some(v) = overrides.truncation {
            self.truncation = v;
        }
        if overrides.temperature.is_some() {
            self.temperature = overrides.temperature;
        }
        if overrides.top_p.is_some() {
            self.top_p = overrides.top_p;
        }
        if overrides.repetition_penalty.is_some() {
            self.repetition_penalty = overrides.repetition_penalty;
        }
        if overrides.pad_token_id.is_some() {
            self.pad_token_id = overrides.pad_token_id;
        }
        self
    }
}

impl Profile {
    /// The fixed parameter set for this profile.
    pub fn params(self) -> GenerationParams {
        match self {
            Profile::Continuation => GenerationParams {
                max_length: 50,
                num_return_sequences: 1,
                do_sample: false,
                truncation: true,
                temperature: None,
                top_p: None,
                repetition_penalty: None,
                pad_token_id: Some(CONTINUATION_PAD_TOKEN_ID),
            },
            Profile::Instruction => GenerationParams {
                max_length: 150,
                num_return_sequences: 1,
                do_sample: true,
                truncation: true,
                temperature: Some(0.85),
                top_p: Some(0.9),
                repetition_penalty: Some(1.2),
                pad_token_id: None,
            },
        }
    }

    /// Cleans one raw engine candidate into the reply text.
    pub fn shape(self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            Profile::Continuation => trimmed.lines().next().unwrap_or("").trim_end().to_string(),
            Profile::Instruction => trimmed.to_string(),
        }
    }

    /// Framing prepended to intent prompts.
    pub fn default_humor_prefix(self) -> Option<&'static str> {
        match self {
            Profile::Continuation => Some("In a funny way: "),
            Profile::Instruction => None,
        }
    }

    /// Appended to generated replies when nothing in the tables matched.
    pub fn default_fallback_suffix(self) -> &'static str {
        match self {
            Profile::Continuation => "Try something else.",
            Profile::Instruction => "Still not sure what you mean? Ask me anything!",
        }
    }

    /// Returned in place of generated text when the engine fails.
    pub fn default_failure_message(self) -> &'static str {
        match self {
            Profile::Continuation => "I had trouble understanding that. Try again.",
            Profile::Instruction => "Hmm... I didn't get that. Let's try something else!",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Continuation => "continuation",
            Profile::Instruction => "instruction",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
