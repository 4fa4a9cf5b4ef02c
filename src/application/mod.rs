//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod ports;
pub mod session;
pub mod timer;
pub mod visualizer;

// Re-export use cases
pub use ports::WaveformCanvas;
pub use session::{CaptureSession, SessionError, FRAGMENT_INTERVAL_MS};
pub use timer::{format_elapsed, TickCallback, Timer, TICK_INTERVAL_MS};
pub use visualizer::{render_frame, Visualizer, ANALYSIS_WINDOW, FRAME_INTERVAL_MS};
