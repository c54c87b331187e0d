//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// Name of the snapshot slot file
pub const SLOT_FILE_NAME: &str = "timerState.json";

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "timer-board")]
#[command(about = "A local HTTP service managing multiple persisted countdown timers")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the persisted timers (defaults to the local data directory)
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Keep timers in memory only
    #[arg(long, conflicts_with = "data_file")]
    pub ephemeral: bool,

    /// Seconds between repeats of a completion alert
    #[arg(long, value_name = "SECS", default_value = "2", value_parser = clap::value_parser!(u64).range(1..))]
    pub alert_repeat: u64,

    /// Log completion alerts without ringing the terminal bell
    #[arg(long)]
    pub silent: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Location of the snapshot slot
    pub fn data_path(&self) -> PathBuf {
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("timer-board").join(SLOT_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SLOT_FILE_NAME))
    }

    pub fn alert_repeat(&self) -> Duration {
        Duration::from_secs(self.alert_repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["timer-board"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.alert_repeat(), Duration::from_secs(2));
        assert!(config.data_path().ends_with(SLOT_FILE_NAME));
        assert!(!config.ephemeral);
    }

    #[test]
    fn test_explicit_data_file() {
        let config =
            Config::try_parse_from(["timer-board", "--data-file", "/tmp/t.json", "-v"]).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/t.json"));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_ephemeral_conflicts_with_data_file() {
        assert!(
            Config::try_parse_from(["timer-board", "--ephemeral", "--data-file", "x.json"]).is_err()
        );
    }

    #[test]
    fn test_alert_repeat_must_be_positive() {
        assert!(Config::try_parse_from(["timer-board", "--alert-repeat", "0"]).is_err());
    }
}
