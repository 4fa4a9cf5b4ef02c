//! Upload adapters

mod client;
mod event_stream;

pub use client::{
    HttpUploadClient, ProgressEventCallback, UploadError, UploadOutcome, DEFAULT_REDIRECT,
};
pub use event_stream::EventStreamParser;
