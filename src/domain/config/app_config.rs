//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::capture::{CaptureSource, Duration};

/// Default upload endpoint when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/upload";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub source: Option<String>,
    pub duration: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            source: Some("mic".to_string()),
            duration: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            endpoint: other.endpoint.or(self.endpoint),
            source: other.source.or(self.source),
            duration: other.duration.or(self.duration),
        }
    }

    /// Get the upload endpoint, or the built-in default if not set
    pub fn endpoint_or_default(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Get source as parsed CaptureSource, or microphone if not set/invalid
    pub fn source_or_default(&self) -> CaptureSource {
        self.source
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get duration limit as parsed Duration, if one is configured
    pub fn duration_limit(&self) -> Option<Duration> {
        self.duration.as_ref().and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.endpoint, Some(DEFAULT_ENDPOINT.to_string()));
        assert_eq!(config.source, Some("mic".to_string()));
        assert!(config.duration.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.endpoint.is_none());
        assert!(config.source.is_none());
        assert!(config.duration.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            endpoint: Some("http://base:5000/upload".to_string()),
            source: Some("mic".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            endpoint: Some("http://other:5000/upload".to_string()),
            source: None, // Should not override
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.endpoint, Some("http://other:5000/upload".to_string()));
        assert_eq!(merged.source, Some("mic".to_string())); // Kept from base
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            duration: Some("2m".to_string()),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.duration, Some("2m".to_string()));
    }

    #[test]
    fn source_or_default_parses() {
        let config = AppConfig {
            source: Some("system".to_string()),
            ..Default::default()
        };
        assert_eq!(config.source_or_default(), CaptureSource::SystemCapture);
    }

    #[test]
    fn source_or_default_falls_back_on_invalid() {
        let config = AppConfig {
            source: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.source_or_default(), CaptureSource::Microphone);
    }

    #[test]
    fn endpoint_or_default_falls_back() {
        assert_eq!(AppConfig::empty().endpoint_or_default(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn duration_limit_parses() {
        let config = AppConfig {
            duration: Some("1m30s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.duration_limit().map(|d| d.as_secs()), Some(90));
    }

    #[test]
    fn duration_limit_none_when_unset_or_invalid() {
        assert!(AppConfig::empty().duration_limit().is_none());
        let config = AppConfig {
            duration: Some("garbage".to_string()),
            ..Default::default()
        };
        assert!(config.duration_limit().is_none());
    }
}
