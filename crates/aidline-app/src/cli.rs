//! CLI argument definitions for the Aidline terminal client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aidline: first-aid guidance and nearby hospitals from the terminal.
#[derive(Parser, Debug)]
#[command(name = "aidline", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Interactive conversation with the assistant.
    Chat,
    /// Send one message and print the analysis as JSON.
    Ask {
        /// What happened.
        text: String,
    },
    /// List hospitals near a coordinate.
    Hospitals {
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },
}

impl CliArgs {
    /// `--config`, then `AIDLINE_CONFIG`, then the per-user default.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("AIDLINE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }
}

/// `~/.aidline/config.toml`, or `./config.toml` with no home directory.
fn default_config_path() -> PathBuf {
    let home_var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(home_var)
        .map(|home| PathBuf::from(home).join(".aidline").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let args = CliArgs::try_parse_from(["aidline", "ask", "I burned my hand"]).unwrap();
        assert_eq!(
            args.command,
            Command::Ask {
                text: "I burned my hand".to_string()
            }
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_hospitals_negative_coordinates() {
        let args =
            CliArgs::try_parse_from(["aidline", "hospitals", "--lat", "-33.87", "--lon", "151.21"])
                .unwrap();
        assert_eq!(
            args.command,
            Command::Hospitals {
                lat: Some(-33.87),
                lon: Some(151.21)
            }
        );
    }

    #[test]
    fn test_hospitals_requires_both_coordinates() {
        assert!(CliArgs::try_parse_from(["aidline", "hospitals", "--lat", "1.0"]).is_err());
        let args = CliArgs::try_parse_from(["aidline", "hospitals"]).unwrap();
        assert_eq!(args.command, Command::Hospitals { lat: None, lon: None });
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "aidline",
            "chat",
            "--config",
            "/tmp/aidline.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/aidline.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.command, Command::Chat);
    }
}
