//! Upload domain module

mod filename;
mod progress;
mod request;

pub use filename::{derive_filename, sanitize_title};
pub use progress::{ProgressEvent, ProgressStep};
pub use request::{UploadRequest, ValidationError};
