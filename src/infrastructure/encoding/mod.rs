//! Media encoding adapters

mod opus_fragments;

pub use opus_fragments::{OpusFragmentEncoder, FRAME_SIZE, TARGET_SAMPLE_RATE};
