//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::capture::{CaptureSource, Duration};

/// LiveScribe - capture meetings and upload them for minutes
#[derive(Parser, Debug)]
#[command(name = "live-scribe")]
#[command(version = "0.1.0")]
#[command(about = "Record a meeting from mic or system audio and upload it for transcription")]
#[command(long_about = None)]
pub struct Cli {
    /// What to capture
    #[arg(short = 's', long, value_name = "SOURCE")]
    pub source: Option<SourceArg>,

    /// Meeting title used for the uploaded filename
    #[arg(short = 't', long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Upload endpoint URL
    #[arg(short = 'e', long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Stop capturing after this long (e.g., 30s, 2m, 2m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Discard the recording instead of uploading it
    #[arg(long)]
    pub discard: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Capture source argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Microphone only
    Mic,
    /// Screen share with system audio
    System,
}

impl From<SourceArg> for CaptureSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Mic => CaptureSource::Microphone,
            SourceArg::System => CaptureSource::SystemCapture,
        }
    }
}

impl From<CaptureSource> for SourceArg {
    fn from(source: CaptureSource) -> Self {
        match source {
            CaptureSource::Microphone => SourceArg::Mic,
            CaptureSource::SystemCapture => SourceArg::System,
        }
    }
}

/// Parsed recording options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub source: CaptureSource,
    pub title: Option<String>,
    pub endpoint: String,
    pub duration: Option<Duration>,
    pub discard: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["endpoint", "source", "duration"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["live-scribe"]);
        assert!(cli.source.is_none());
        assert!(cli.title.is_none());
        assert!(cli.endpoint.is_none());
        assert!(cli.duration.is_none());
        assert!(!cli.discard);
    }

    #[test]
    fn cli_parses_source() {
        let cli = Cli::parse_from(["live-scribe", "-s", "system"]);
        assert_eq!(cli.source, Some(SourceArg::System));
    }

    #[test]
    fn cli_parses_title_and_endpoint() {
        let cli = Cli::parse_from([
            "live-scribe",
            "-t",
            "Team Sync",
            "-e",
            "http://example.test/upload",
        ]);
        assert_eq!(cli.title, Some("Team Sync".to_string()));
        assert_eq!(cli.endpoint, Some("http://example.test/upload".to_string()));
    }

    #[test]
    fn cli_parses_duration() {
        let cli = Cli::parse_from(["live-scribe", "-d", "30s"]);
        assert_eq!(cli.duration, Some("30s".to_string()));
    }

    #[test]
    fn cli_parses_discard() {
        let cli = Cli::parse_from(["live-scribe", "--discard"]);
        assert!(cli.discard);
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["live-scribe", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["live-scribe", "config", "set", "source", "system"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "source");
            assert_eq!(value, "system");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn source_arg_converts_to_capture_source() {
        assert_eq!(CaptureSource::from(SourceArg::Mic), CaptureSource::Microphone);
        assert_eq!(
            CaptureSource::from(SourceArg::System),
            CaptureSource::SystemCapture
        );
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("endpoint"));
        assert!(is_valid_config_key("source"));
        assert!(is_valid_config_key("duration"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
