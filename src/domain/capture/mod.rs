//! Capture domain module

mod artifact;
mod duration;
mod format;
mod source;
mod state;

pub use artifact::EncodedArtifact;
pub use duration::Duration;
pub use format::{negotiate_format, MediaFormat};
pub use source::{CaptureConstraints, CaptureSource, MediaKind, PreviewState};
pub use state::{InvalidStateTransition, SessionState};
