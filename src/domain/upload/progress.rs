//! Progress events emitted by the processing service

use std::fmt;

use serde::{Deserialize, Serialize};

/// Processing step reported by the server.
///
/// The set is open-ended: unknown steps deserialize into `Other` so a
/// newer server cannot break an older client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStep {
    Validating,
    Transcribing,
    Summarizing,
    Complete,
    Error,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::Transcribing => write!(f, "transcribing"),
            Self::Summarizing => write!(f, "summarizing"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
            Self::Other(step) => write!(f, "{}", step),
        }
    }
}

/// One decoded progress record from the upload response stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: ProgressStep,
    #[serde(default)]
    pub message: String,
    /// Present only on `complete`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ProgressEvent {
    /// Whether this event resolves the upload (success or failure)
    pub fn is_terminal(&self) -> bool {
        matches!(self.step, ProgressStep::Complete | ProgressStep::Error)
    }
}
