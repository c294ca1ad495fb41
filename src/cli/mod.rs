//! Command-line interface for pwordcount
//!
//! Parses flags with clap, layers them over the configuration files, sets up
//! logging and hands a validated request to the dispatch core.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

pub mod commands;
mod output;

pub use output::Output;

use crate::config::PwordcountConfig;
use crate::count::MetricKind;
use crate::dispatch::SplitStrategy;

/// Count words across text files in parallel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Text files to count
    #[arg(value_name = "FILE", required_unless_present = "show_config")]
    pub files: Vec<PathBuf>,

    /// What to count: t (total words), u (unique words), o (occurrences of each word)
    #[arg(short, long, value_enum)]
    pub mode: Option<MetricKind>,

    /// Number of worker threads (0 = one per CPU core)
    #[arg(short = 'p', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// How a single file is split between workers
    #[arg(long, value_enum)]
    pub split: Option<SplitStrategy>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print only results and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,
}

/// Flags that override configuration values; unset flags are left out
#[derive(Debug, Default, Serialize)]
struct ConfigOverrides {
    count: CountOverrides,
}

#[derive(Debug, Default, Serialize)]
struct CountOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<MetricKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    split: Option<SplitStrategy>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<ExitCode> {
        init_logging(self.verbose);
        let output = Output::new(self.verbose > 0, self.quiet);

        let overrides = ConfigOverrides {
            count: CountOverrides {
                mode: self.mode,
                workers: self.workers,
                split: self.split,
            },
        };
        let config = PwordcountConfig::load(self.config.as_deref(), Some(overrides))?;

        if self.show_config {
            print!("{}", config.to_toml()?);
            return Ok(ExitCode::SUCCESS);
        }

        let settings = config.settings()?;
        commands::count::execute(settings, self.files, output).await
    }
}

/// Logs go to stderr so stdout carries only results
fn init_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from(["pwordcount", "-m", "u", "-p", "4", "a.txt", "b.txt"]).unwrap();
        assert_eq!(cli.mode, Some(MetricKind::Unique));
        assert_eq!(cli.workers, Some(4));
        assert_eq!(cli.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_parse_long_mode_alias() {
        let cli = Cli::try_parse_from(["pwordcount", "--mode", "occurrence", "a.txt"]).unwrap();
        assert_eq!(cli.mode, Some(MetricKind::Occurrence));
        assert_eq!(cli.workers, None);
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["pwordcount", "-m", "t"]).is_err());
        assert!(Cli::try_parse_from(["pwordcount", "--show-config"]).is_ok());
    }

    #[test]
    fn test_unset_flags_are_not_serialized() {
        let overrides = ConfigOverrides {
            count: CountOverrides {
                workers: Some(3),
                ..CountOverrides::default()
            },
        };
        let value = serde_json::to_value(&overrides).unwrap();
        assert_eq!(value, serde_json::json!({ "count": { "workers": 3 } }));
    }
}
