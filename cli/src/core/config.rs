//! # hogbot Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges, and validates hogbot's configuration: server
//! binding, the generation engine and its profile, dispatch strings, and the
//! intent and knowledge tables.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags and their `HOGBOT_*` environment fallbacks (`ConfigOverrides`)
//! 2. An explicit `--config <file>`, which replaces sources 3 and 4 entirely
//! 3. Project-specific `.hogbot.toml` in the current directory or its ancestors
//! 4. User-specific `<config dir>/hogbot/config.toml`
//! 5. Default values defined in the code, including the built-in tables
//!
//! Files are read into `FileConfig`, where every field is optional, merged
//! field by field (tables are replaced whole), and then resolved into a
//! concrete `BotConfig`. Profile-dependent defaults (generation parameters,
//! humor prefix, suffix, failure message) are filled in during resolution,
//! after the profile itself has been settled.
//!
//! ## Examples
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! cors_origins = ["http://localhost:3000"]
//!
//! [generation]
//! profile = "instruction"
//! engine_url = "http://127.0.0.1:8081/generate"
//! model = "~/models/local_flan_t5_small"
//!
//! [generation.parameters]
//! max_length = 120
//!
//! [dispatch]
//! fallback_prompt = "hear me out: '{query}'"
//!
//! [[intents]]
//! trigger = "home"
//! prompt = "Explain going to the home page in a funny way."
//! route = "/"
//!
//! [[knowledge]]
//! trigger = "who is hogist"
//! answer = "Founded in 2018, ..."
//! ```
//!
use crate::common::dispatch::{DispatchSettings, Dispatcher, QUERY_PLACEHOLDER};
use crate::common::generation::http::HttpEngine;
use crate::common::generation::{Gateway, GenerationParams, ParamOverrides, Profile};
use crate::common::intent::{IntentTable, TriggerEntry};
use crate::common::knowledge::{KnowledgeEntry, KnowledgeTable};
use crate::common::matching;
use crate::common::request_log::DEFAULT_CAPACITY;
use crate::core::error::{BotError, Result};
use anyhow::{anyhow, Context};
use axum::http::HeaderValue;
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".hogbot.toml";

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:8081/generate";
const DEFAULT_MODEL: &str = "./local_flan_t5_small";
const DEFAULT_STATUS_ENTRIES: usize = 10;

// --- Raw file layer ---

/// Contents of one config file. Every field is optional so layers can be merged.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub dispatch: DispatchSection,
    pub intents: Option<Vec<TriggerEntry>>,
    pub knowledge: Option<Vec<KnowledgeEntry>>,
}

/// `[server]` section.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    /// Allowed CORS origins. Empty or containing `"*"` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    /// Number of request-log entries shown on the status page.
    pub status_entries: Option<usize>,
}

/// `[generation]` section.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct GenerationSection {
    pub profile: Option<Profile>,
    pub engine_url: Option<String>,
    /// Path or name of the locally materialized model, forwarded to the engine.
    pub model: Option<String>,
    #[serde(default)]
    pub parameters: ParamOverrides,
}

/// `[dispatch]` section.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Prepended to intent prompts. An empty string disables framing.
    pub humor_prefix: Option<String>,
    /// Prompt used when nothing matched; must contain `{query}`.
    pub fallback_prompt: Option<String>,
    pub fallback_suffix: Option<String>,
    pub failure_message: Option<String>,
}

/// Command-line values that take precedence over every file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
    pub profile: Option<Profile>,
    pub engine_url: Option<String>,
    pub model: Option<String>,
}

// --- Resolved layer ---

/// Server binding and status page settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub status_entries: usize,
}

/// Everything needed to build the generation gateway.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub profile: Profile,
    pub engine_url: String,
    pub model: Option<String>,
    pub params: GenerationParams,
    pub failure_message: String,
}

/// Final, validated configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub server: ServerSettings,
    pub generation: GenerationSettings,
    pub dispatch: DispatchSettings,
    pub intents: IntentTable,
    pub knowledge: KnowledgeTable,
    /// Files that contributed to this configuration, lowest precedence first.
    pub sources: Vec<PathBuf>,
}

#[cfg(test)]
impl Default for BotConfig {
    fn default() -> Self {
        resolve(FileConfig::default(), Vec::new()).expect("built-in configuration must resolve")
    }
}

impl BotConfig {
    /// Builds the HTTP engine, the gateway, and the dispatcher described by this configuration.
    pub fn build_dispatcher(&self) -> Result<Dispatcher> {
        let generation = &self.generation;
        let engine = HttpEngine::new(&generation.engine_url, generation.model.clone())
            .with_context(|| {
                format!(
                    "Failed to create generation client for {}",
                    generation.engine_url
                )
            })?;
        let gateway = Gateway::new(
            Arc::new(engine),
            generation.profile,
            generation.params.clone(),
            generation.failure_message.clone(),
        );
        Ok(Dispatcher::new(
            self.intents.clone(),
            self.knowledge.clone(),
            gateway,
            self.dispatch.clone(),
        ))
    }
}

// --- Loading ---

/// Loads every configuration layer, applies `overrides`, and validates the result.
pub fn load_config(overrides: &ConfigOverrides) -> Result<BotConfig> {
    let (mut raw, sources) = match &overrides.config_path {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
            info!("Loading configuration from: {}", path.display());
            (load_config_from_path(&path)?, vec![path])
        }
        None => {
            let mut sources = Vec::new();
            let user = load_user_config()?.map(|(cfg, path)| {
                sources.push(path);
                cfg
            });
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            let project = match find_project_config_path(&current_dir) {
                Some(path) => {
                    info!("Loading project configuration from: {}", path.display());
                    let cfg = load_config_from_path(&path)?;
                    sources.push(path);
                    Some(cfg)
                }
                None => {
                    debug!("No project configuration file (.hogbot.toml) found.");
                    None
                }
            };
            (merge_configs(user.unwrap_or_default(), project), sources)
        }
    };

    apply_overrides(&mut raw, overrides);
    let config = resolve(raw, sources)?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<(FileConfig, PathBuf)>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Hogist", "hogbot") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.is_file() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(|cfg| Some((cfg, config_path)))
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

/// Walks from `start` towards the root looking for `.hogbot.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Field-by-field merge; `project` wins wherever it sets a value.
fn merge_configs(user: FileConfig, project: Option<FileConfig>) -> FileConfig {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    FileConfig {
        server: ServerSection {
            host: project.server.host.or(user.server.host),
            port: project.server.port.or(user.server.port),
            cors_origins: project.server.cors_origins.or(user.server.cors_origins),
            status_entries: project.server.status_entries.or(user.server.status_entries),
        },
        generation: GenerationSection {
            profile: project.generation.profile.or(user.generation.profile),
            engine_url: project.generation.engine_url.or(user.generation.engine_url),
            model: project.generation.model.or(user.generation.model),
            parameters: merge_params(user.generation.parameters, project.generation.parameters),
        },
        dispatch: DispatchSection {
            humor_prefix: project.dispatch.humor_prefix.or(user.dispatch.humor_prefix),
            fallback_prompt: project.dispatch.fallback_prompt.or(user.dispatch.fallback_prompt),
            fallback_suffix: project.dispatch.fallback_suffix.or(user.dispatch.fallback_suffix),
            failure_message: project.dispatch.failure_message.or(user.dispatch.failure_message),
        },
        intents: project.intents.or(user.intents),
        knowledge: project.knowledge.or(user.knowledge),
    }
}

fn merge_params(user: ParamOverrides, project: ParamOverrides) -> ParamOverrides {
    ParamOverrides {
        max_length: project.max_length.or(user.max_length),
        do_sample: project.do_sample.or(user.do_sample),
        truncation: project.truncation.or(user.truncation),
        temperature: project.temperature.or(user.temperature),
        top_p: project.top_p.or(user.top_p),
        repetition_penalty: project.repetition_penalty.or(user.repetition_penalty),
        pad_token_id: project.pad_token_id.or(user.pad_token_id),
    }
}

fn apply_overrides(raw: &mut FileConfig, overrides: &ConfigOverrides) {
    if let Some(host) = overrides.host {
        raw.server.host = Some(host);
    }
    if let Some(port) = overrides.port {
        raw.server.port = Some(port);
    }
    if let Some(origins) = &overrides.cors_origins {
        raw.server.cors_origins = Some(origins.clone());
    }
    if let Some(profile) = overrides.profile {
        raw.generation.profile = Some(profile);
    }
    if let Some(url) = &overrides.engine_url {
        raw.generation.engine_url = Some(url.clone());
    }
    if let Some(model) = &overrides.model {
        raw.generation.model = Some(model.clone());
    }
}

/// Fills defaults, expands paths, builds the tables, and validates.
fn resolve(raw: FileConfig, sources: Vec<PathBuf>) -> Result<BotConfig> {
    let profile = raw.generation.profile.unwrap_or_default();

    let model = raw
        .generation
        .model
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let model = if model.trim().is_empty() {
        None
    } else {
        Some(shellexpand::tilde(&model).into_owned())
    };

    let defaults = DispatchSettings::for_profile(profile);
    let humor_prefix = match raw.dispatch.humor_prefix {
        Some(prefix) if prefix.is_empty() => None,
        Some(prefix) => Some(prefix),
        None => defaults.humor_prefix,
    };

    let config = BotConfig {
        server: ServerSettings {
            host: raw.server.host.unwrap_or(DEFAULT_HOST),
            port: raw.server.port.unwrap_or(DEFAULT_PORT),
            cors_origins: raw.server.cors_origins.unwrap_or_default(),
            status_entries: raw.server.status_entries.unwrap_or(DEFAULT_STATUS_ENTRIES),
        },
        generation: GenerationSettings {
            profile,
            engine_url: raw
                .generation
                .engine_url
                .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string()),
            model,
            params: profile.params().with_overrides(&raw.generation.parameters),
            failure_message: raw
                .dispatch
                .failure_message
                .unwrap_or_else(|| profile.default_failure_message().to_string()),
        },
        dispatch: DispatchSettings {
            humor_prefix,
            fallback_prompt: raw
                .dispatch
                .fallback_prompt
                .unwrap_or(defaults.fallback_prompt),
            fallback_suffix: raw
                .dispatch
                .fallback_suffix
                .unwrap_or(defaults.fallback_suffix),
        },
        intents: match raw.intents {
            Some(entries) => IntentTable::new(entries)?,
            None => IntentTable::default(),
        },
        knowledge: match raw.knowledge {
            Some(entries) => KnowledgeTable::new(entries)?,
            None => KnowledgeTable::default(),
        },
        sources,
    };

    validate_config(&config).context("Configuration validation failed")?;
    warn_about_shadowing(&config);
    Ok(config)
}

fn validate_config(config: &BotConfig) -> Result<()> {
    debug!("Validating final configuration...");
    if config.server.port == 0 {
        return Err(anyhow!(BotError::Config(
            "Server port must be non-zero.".to_string()
        )));
    }
    if config.server.status_entries == 0 || config.server.status_entries > DEFAULT_CAPACITY {
        return Err(anyhow!(BotError::Config(format!(
            "status_entries must be between 1 and {}, got {}.",
            DEFAULT_CAPACITY, config.server.status_entries
        ))));
    }
    for origin in &config.server.cors_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            return Err(anyhow!(BotError::Config(format!(
                "Invalid CORS origin: '{}'.",
                origin
            ))));
        }
    }
    let url = &config.generation.engine_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(anyhow!(BotError::Config(format!(
            "Engine URL must start with http:// or https://, got '{}'.",
            url
        ))));
    }
    if config.generation.params.max_length == 0 {
        return Err(anyhow!(BotError::Config(
            "Generation max_length must be greater than zero.".to_string()
        )));
    }
    if !config.dispatch.fallback_prompt.contains(QUERY_PLACEHOLDER) {
        return Err(anyhow!(BotError::Config(format!(
            "fallback_prompt must contain the {} placeholder.",
            QUERY_PLACEHOLDER
        ))));
    }
    debug!("Configuration validation successful.");
    Ok(())
}

/// Logs triggers that first-match-wins makes unreachable. They are kept as declared.
fn warn_about_shadowing(config: &BotConfig) {
    for pair in config.intents.shadowed() {
        warn!(
            "Intent trigger '{}' is shadowed by earlier trigger '{}'",
            pair.shadowed, pair.winner
        );
    }
    for pair in config.knowledge.shadowed() {
        warn!(
            "Knowledge trigger '{}' is shadowed by earlier trigger '{}'",
            pair.shadowed, pair.winner
        );
    }
    for pair in matching::shadowed_across(config.intents.entries(), config.knowledge.entries()) {
        warn!(
            "Knowledge trigger '{}' is unreachable: intent trigger '{}' matches first",
            pair.shadowed, pair.winner
        );
    }
}
