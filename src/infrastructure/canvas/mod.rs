//! Waveform canvas adapters

mod terminal;

pub use terminal::{RowSink, TerminalWaveform};
