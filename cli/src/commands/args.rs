//! # Shared Command Arguments
//!
//! File: cli/src/commands/args.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Argument groups flattened into more than one subcommand: where to read
//! configuration from, and which generation engine to talk to. Each group
//! converts into the `ConfigOverrides` understood by `core::config`.
//!
use crate::common::generation::Profile;
use crate::core::config::ConfigOverrides;
use clap::Args;
use std::path::PathBuf;

/// Selects the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Read configuration only from this TOML file, skipping the user and project files.
    #[arg(long, short = 'c', env = "HOGBOT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Overrides for the generation engine.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// URL of the text-generation endpoint (POST, JSON).
    #[arg(long, env = "HOGBOT_ENGINE_URL", value_name = "URL")]
    pub engine_url: Option<String>,

    /// Model path or name forwarded to the engine.
    #[arg(long, env = "HOGBOT_MODEL", value_name = "MODEL")]
    pub model: Option<String>,

    /// Generation profile.
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,
}

impl ConfigArgs {
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            ..Default::default()
        }
    }
}

impl EngineArgs {
    /// Copies the engine flags onto `overrides`.
    pub fn apply(&self, overrides: &mut ConfigOverrides) {
        overrides.engine_url = self.engine_url.clone();
        overrides.model = self.model.clone();
        overrides.profile = self.profile;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
        #[command(flatten)]
        engine: EngineArgs,
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = TestCli::parse_from([
            "test",
            "--config",
            "/tmp/bot.toml",
            "--engine-url",
            "http://127.0.0.1:7000/generate",
            "--model",
            "flan",
            "--profile",
            "instruction",
        ]);
        let mut overrides = cli.config.to_overrides();
        cli.engine.apply(&mut overrides);

        assert_eq!(overrides.config_path, Some(PathBuf::from("/tmp/bot.toml")));
        assert_eq!(
            overrides.engine_url.as_deref(),
            Some("http://127.0.0.1:7000/generate")
        );
        assert_eq!(overrides.model.as_deref(), Some("flan"));
        assert_eq!(overrides.profile, Some(Profile::Instruction));
        assert_eq!(overrides.port, None);
    }
}
