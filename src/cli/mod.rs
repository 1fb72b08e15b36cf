//! CLI interface for price-alert
//!
//! Provides subcommands for:
//! - `run`: Start the alert engine
//! - `check`: Validate configuration and list rules
//! - `config`: Show effective configuration

mod check;
mod run;

pub use check::CheckArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "price-alert")]
#[command(about = "Threshold price alerts over a shared price cache")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the alert engine
    Run(RunArgs),
    /// Validate configuration and list rules
    Check(CheckArgs),
    /// Show effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_override() {
        let cli = Cli::try_parse_from([
            "price-alert",
            "-c",
            "alerts.toml",
            "run",
            "--tick-interval-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.config, "alerts.toml");
        match cli.command {
            Commands::Run(args) => assert_eq!(args.tick_interval_secs, Some(5)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["price-alert", "check"]).unwrap();
        assert_eq!(cli.config, "config.toml");
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["price-alert"]).is_err());
    }
}
