//! Upload request value object

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::capture::{CaptureSource, EncodedArtifact};

use super::filename::derive_filename;

/// Validation failures caught before any network traffic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Meeting title must not be empty")]
    EmptyTitle,

    #[error("No recorded data to upload")]
    EmptyArtifact,
}

/// A validated upload: artifact, title, and the derived filename.
///
/// Construction fails fast on an empty title or empty artifact, so a
/// request that exists is always sendable.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    artifact: EncodedArtifact,
    title: String,
    filename: String,
}

impl UploadRequest {
    /// Validate and build an upload request.
    ///
    /// The filename is a pure function of the source kind, `at`, and the
    /// trimmed title; the extension comes from the artifact's negotiated
    /// format.
    pub fn new(
        artifact: EncodedArtifact,
        title: &str,
        source: CaptureSource,
        at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if artifact.is_empty() {
            return Err(ValidationError::EmptyArtifact);
        }

        let filename = derive_filename(source, at, title, artifact.format().extension());

        Ok(Self {
            artifact,
            title: title.to_string(),
            filename,
        })
    }

    pub fn artifact(&self) -> &EncodedArtifact {
        &self.artifact
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Decompose into (artifact, title, filename)
    pub fn into_parts(self) -> (EncodedArtifact, String, String) {
        (self.artifact, self.title, self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::MediaFormat;
    use chrono::NaiveDate;

    fn at_10am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn artifact() -> EncodedArtifact {
        EncodedArtifact::from_fragments(vec![vec![1u8, 2, 3]], MediaFormat::WebmOpus)
    }

    #[test]
    fn builds_request_with_derived_filename() {
        let request =
            UploadRequest::new(artifact(), "Team Sync", CaptureSource::Microphone, at_10am())
                .unwrap();
        assert_eq!(request.filename(), "mic_20240501_100000_Team_Sync.webm");
        assert_eq!(request.title(), "Team Sync");
    }

    #[test]
    fn title_is_trimmed() {
        let request =
            UploadRequest::new(artifact(), "  Standup  ", CaptureSource::Microphone, at_10am())
                .unwrap();
        assert_eq!(request.title(), "Standup");
    }

    #[test]
    fn empty_title_is_rejected() {
        let err = UploadRequest::new(artifact(), "   ", CaptureSource::Microphone, at_10am())
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn empty_artifact_is_rejected() {
        let empty = EncodedArtifact::from_fragments(Vec::new(), MediaFormat::OggOpus);
        let err =
            UploadRequest::new(empty, "Team Sync", CaptureSource::Microphone, at_10am()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyArtifact);
    }

    #[test]
    fn extension_follows_artifact_format() {
        let ogg = EncodedArtifact::from_fragments(vec![vec![1u8]], MediaFormat::OggOpus);
        let request =
            UploadRequest::new(ogg, "Sync", CaptureSource::Microphone, at_10am()).unwrap();
        assert!(request.filename().ends_with(".ogg"));
    }
}
