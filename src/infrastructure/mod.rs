//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the audio backend, codecs, and the upload service.

pub mod canvas;
pub mod config;
pub mod device;
pub mod encoding;
pub mod upload;

// Re-export adapters
pub use canvas::TerminalWaveform;
pub use config::XdgConfigStore;
pub use device::CpalCaptureDevice;
pub use encoding::OpusFragmentEncoder;
pub use upload::{HttpUploadClient, UploadError, UploadOutcome};
