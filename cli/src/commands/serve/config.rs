//! # hogbot Server Arguments
//!
//! File: cli/src/commands/serve/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Command-line arguments for `hogbot serve` and their translation into the
//! layered configuration. Every flag is optional: a flag that is not given
//! leaves the value from the config files (or the built-in default) in place.
//!
//! ## Examples
//!
//! ```bash
//! # Defaults: 127.0.0.1:8080, engine at http://127.0.0.1:8081/generate
//! hogbot serve
//!
//! # Listen on all interfaces and restrict CORS to the web front end
//! hogbot serve --host 0.0.0.0 --port 5000 --cors-origin http://localhost:3000
//!
//! # Point at a different engine and use the instruction profile
//! HOGBOT_ENGINE_URL=http://10.0.0.5:7000/generate hogbot serve --profile instruction
//! ```
//!
use crate::commands::args::{ConfigArgs, EngineArgs};
use crate::core::config::{self, BotConfig, ConfigOverrides};
use crate::core::error::Result;
use clap::Parser;
use std::net::IpAddr;
use tracing::debug;

/// # Serve Command Arguments (`ServeArgs`)
#[derive(Parser, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Network address to bind (e.g. 127.0.0.1 or 0.0.0.0).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Allowed CORS origin. Repeat for several; `*` allows any origin.
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl ServeArgs {
    pub fn to_overrides(&self) -> ConfigOverrides {
        let mut overrides = self.config.to_overrides();
        overrides.host = self.host;
        overrides.port = self.port;
        if !self.cors_origins.is_empty() {
            overrides.cors_origins = Some(self.cors_origins.clone());
        }
        self.engine.apply(&mut overrides);
        overrides
    }
}

/// Loads the layered configuration with the serve flags on top.
pub fn load_serve_config(args: &ServeArgs) -> Result<BotConfig> {
    let overrides = args.to_overrides();
    debug!("Serve overrides: {:?}", overrides);
    config::load_config(&overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_args_parse_into_overrides() {
        let args = ServeArgs::parse_from([
            "serve",
            "--host",
            "0.0.0.0",
            "-p",
            "5000",
            "--cors-origin",
            "http://localhost:3000",
            "--cors-origin",
            "http://localhost:5173",
        ]);
        let overrides = args.to_overrides();
        assert_eq!(overrides.host.map(|h| h.to_string()).as_deref(), Some("0.0.0.0"));
        assert_eq!(overrides.port, Some(5000));
        assert_eq!(
            overrides.cors_origins,
            Some(vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string()
            ])
        );
    }

    #[test]
    fn test_no_cors_flag_keeps_file_value() {
        let args = ServeArgs::default();
        assert_eq!(args.to_overrides().cors_origins, None);
    }

    #[test]
    fn test_cli_port_overrides_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        fs::write(&path, "[server]\nport = 7000\nhost = \"0.0.0.0\"\n").unwrap();

        let args = ServeArgs {
            port: Some(7100),
            config: ConfigArgs {
                config: Some(path),
            },
            ..Default::default()
        };
        let config = load_serve_config(&args).unwrap();
        assert_eq!(config.server.port, 7100);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
    }
}
