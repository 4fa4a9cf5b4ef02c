//! Container/codec format negotiation

use std::fmt;

use super::source::CaptureSource;

/// A container/codec combination a capture session can encode into.
///
/// The preference lists mirror what recording front-ends probe for:
/// richer combinations first, then plainer containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    /// audio/webm;codecs=opus
    WebmOpus,
    /// audio/ogg;codecs=opus
    OggOpus,
    /// audio/wav (PCM)
    WavPcm,
    /// video/webm;codecs=vp8,opus
    WebmVp8Opus,
    /// video/webm;codecs=vp9,opus
    WebmVp9Opus,
    /// video/webm with whatever codecs the encoder defaults to
    WebmVideo,
}

impl MediaFormat {
    /// MIME type string, including the codecs parameter where one applies
    pub const fn mime(&self) -> &'static str {
        match self {
            Self::WebmOpus => "audio/webm;codecs=opus",
            Self::OggOpus => "audio/ogg;codecs=opus",
            Self::WavPcm => "audio/wav",
            Self::WebmVp8Opus => "video/webm;codecs=vp8,opus",
            Self::WebmVp9Opus => "video/webm;codecs=vp9,opus",
            Self::WebmVideo => "video/webm",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::WebmOpus | Self::WebmVp8Opus | Self::WebmVp9Opus | Self::WebmVideo => "webm",
            Self::OggOpus => "ogg",
            Self::WavPcm => "wav",
        }
    }

    /// Whether this format carries a video stream
    pub const fn is_video(&self) -> bool {
        matches!(self, Self::WebmVp8Opus | Self::WebmVp9Opus | Self::WebmVideo)
    }

    /// Ordered negotiation candidates for a source, richest first
    pub const fn preferred_for(source: CaptureSource) -> &'static [MediaFormat] {
        match source {
            CaptureSource::Microphone => &[Self::WebmOpus, Self::OggOpus],
            CaptureSource::SystemCapture => {
                &[Self::WebmVp8Opus, Self::WebmVp9Opus, Self::WebmVideo]
            }
        }
    }

    /// Minimal default used when no candidate negotiates. Always an
    /// audio container, so the capture stays encodable even when the
    /// encoder carries none of the richer candidates.
    pub const fn fallback_for(_source: CaptureSource) -> MediaFormat {
        Self::OggOpus
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime())
    }
}

/// Pick the first supported format from the source's preference list,
/// falling back to the minimal default when nothing negotiates.
pub fn negotiate_format<F>(source: CaptureSource, supports: F) -> MediaFormat
where
    F: Fn(&MediaFormat) -> bool,
{
    MediaFormat::preferred_for(source)
        .iter()
        .find(|format| supports(format))
        .copied()
        .unwrap_or_else(|| MediaFormat::fallback_for(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_strings() {
        assert_eq!(MediaFormat::WebmOpus.mime(), "audio/webm;codecs=opus");
        assert_eq!(MediaFormat::OggOpus.mime(), "audio/ogg;codecs=opus");
        assert_eq!(MediaFormat::WebmVp8Opus.mime(), "video/webm;codecs=vp8,opus");
    }

    #[test]
    fn extensions() {
        assert_eq!(MediaFormat::WebmOpus.extension(), "webm");
        assert_eq!(MediaFormat::OggOpus.extension(), "ogg");
        assert_eq!(MediaFormat::WavPcm.extension(), "wav");
    }

    #[test]
    fn microphone_prefers_webm_opus() {
        let picked = negotiate_format(CaptureSource::Microphone, |_| true);
        assert_eq!(picked, MediaFormat::WebmOpus);
    }

    #[test]
    fn negotiation_skips_unsupported_candidates() {
        let picked = negotiate_format(CaptureSource::Microphone, |f| {
            *f == MediaFormat::OggOpus
        });
        assert_eq!(picked, MediaFormat::OggOpus);
    }

    #[test]
    fn negotiation_falls_back_when_nothing_supported() {
        let picked = negotiate_format(CaptureSource::Microphone, |_| false);
        assert_eq!(picked, MediaFormat::OggOpus);

        let picked = negotiate_format(CaptureSource::SystemCapture, |_| false);
        assert_eq!(picked, MediaFormat::OggOpus);
    }

    #[test]
    fn system_capture_candidates_are_video() {
        for format in MediaFormat::preferred_for(CaptureSource::SystemCapture) {
            assert!(format.is_video());
        }
    }
}
