//! Capture source value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidSourceError;

/// Where a capture session gets its media from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    /// Microphone input, audio only
    #[default]
    Microphone,
    /// Screen share with system audio, audio + video
    SystemCapture,
}

/// What kinds of tracks a source produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    AudioOnly,
    AudioVideo,
}

/// Audio processing constraints requested at acquisition time.
///
/// System capture disables all voice processing: the signal is already
/// produced audio, not a voice in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl CaptureSource {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Microphone => "mic",
            Self::SystemCapture => "system",
        }
    }

    /// Media kind produced by this source
    pub const fn media_kind(&self) -> MediaKind {
        match self {
            Self::Microphone => MediaKind::AudioOnly,
            Self::SystemCapture => MediaKind::AudioVideo,
        }
    }

    /// Filename prefix used when deriving upload filenames
    pub const fn filename_prefix(&self) -> &'static str {
        match self {
            Self::Microphone => "mic",
            Self::SystemCapture => "video",
        }
    }

    /// Constraints to request when acquiring the device
    pub const fn constraints(&self) -> CaptureConstraints {
        match self {
            Self::Microphone => CaptureConstraints {
                echo_cancellation: true,
                noise_suppression: true,
                auto_gain_control: true,
            },
            Self::SystemCapture => CaptureConstraints {
                echo_cancellation: false,
                noise_suppression: false,
                auto_gain_control: false,
            },
        }
    }
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaptureSource {
    type Err = InvalidSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mic" | "microphone" => Ok(Self::Microphone),
            "system" | "screen" => Ok(Self::SystemCapture),
            _ => Err(InvalidSourceError {
                input: s.to_string(),
            }),
        }
    }
}

/// Preview variant exposed to the presentation layer after a capture stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Audio,
    Video,
}

impl PreviewState {
    /// Preview variant matching a source's media kind
    pub const fn for_source(source: CaptureSource) -> Self {
        match source.media_kind() {
            MediaKind::AudioOnly => Self::Audio,
            MediaKind::AudioVideo => Self::Video,
        }
    }

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}
