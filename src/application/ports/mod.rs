//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod canvas;
pub mod config;
pub mod device;
pub mod encoder;

// Re-export common types
pub use canvas::WaveformCanvas;
pub use config::ConfigStore;
pub use device::{CaptureDevice, CaptureError, MediaStream, MediaTrack, StreamHandle, TrackKind};
pub use encoder::{EncodingError, FragmentEncoder};
