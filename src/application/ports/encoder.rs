//! Fragment encoder port interface

use thiserror::Error;

use crate::domain::capture::MediaFormat;

/// Encoding errors
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("Unsupported media format: {0:?}")]
    UnsupportedFormat(MediaFormat),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Resampling failed: {0}")]
    Resample(String),
}

/// Port for encoding captured PCM into self-contained media fragments.
///
/// Each fragment must be independently decodable so that the byte
/// concatenation of all fragments, in capture order, is itself a valid
/// media file.
pub trait FragmentEncoder: Send + Sync {
    /// Whether this encoder can produce the given format
    fn supports(&self, format: &MediaFormat) -> bool;

    /// Encode one window of mono i16 PCM into a complete fragment.
    ///
    /// # Arguments
    /// * `samples` - Mono PCM samples
    /// * `sample_rate` - Sample rate of `samples` in Hz
    /// * `format` - Target container/codec
    fn encode_fragment(
        &self,
        samples: &[i16],
        sample_rate: u32,
        format: &MediaFormat,
    ) -> Result<Vec<u8>, EncodingError>;
}
