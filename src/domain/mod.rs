//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod upload;

// Re-export common types
pub use capture::{
    CaptureSource, Duration, EncodedArtifact, InvalidStateTransition, MediaFormat, PreviewState,
    SessionState,
};
pub use config::AppConfig;
pub use error::*;
pub use upload::{ProgressEvent, ProgressStep, UploadRequest, ValidationError};
