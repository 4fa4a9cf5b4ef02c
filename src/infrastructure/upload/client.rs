//! HTTP upload client
//!
//! Sends the finalized artifact as one multipart request and follows
//! the progress event stream in the response body until the server
//! reports completion or failure.

use std::sync::Arc;

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::domain::upload::{ProgressEvent, ProgressStep, UploadRequest, ValidationError};

use super::event_stream::EventStreamParser;

/// Where the client navigates when the server omits a redirect
pub const DEFAULT_REDIRECT: &str = "/";

/// Callback invoked for every decoded progress event
pub type ProgressEventCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Upload failed: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Connection lost before the server finished processing")]
    ConnectionLost,
}

/// Successful upload result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Path the server asked the client to navigate to
    pub redirect: String,
}

/// Uploads artifacts to the processing service
pub struct HttpUploadClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploadClient {
    /// Create a client for the given upload endpoint.
    ///
    /// The request carries no overall timeout; transcription and
    /// summarization on the server side can take minutes.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Send the artifact and drive the progress stream to its end
    pub async fn upload(
        &self,
        request: UploadRequest,
        on_progress: Option<ProgressEventCallback>,
    ) -> Result<UploadOutcome, UploadError> {
        let (artifact, title, filename) = request.into_parts();
        let mime = artifact.format().mime();

        let file_part = Part::bytes(artifact.into_data())
            .file_name(filename)
            .mime_str(mime)
            .map_err(|e| UploadError::Network(e.to_string()))?;
        let form = Form::new().part("audio_file", file_part).text("title", title);

        log::info!("uploading to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Server(format!(
                "upload request failed with status {}",
                status
            )));
        }

        let mut parser = EventStreamParser::new();
        let mut completed = false;
        let mut redirect: Option<String> = None;

        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| UploadError::Network(e.to_string()))?;
            for event in parser.push(&chunk) {
                apply_event(event, &on_progress, &mut completed, &mut redirect)?;
            }
        }
        if let Some(event) = parser.finish() {
            apply_event(event, &on_progress, &mut completed, &mut redirect)?;
        }

        if completed {
            Ok(UploadOutcome {
                redirect: redirect.unwrap_or_else(|| DEFAULT_REDIRECT.to_string()),
            })
        } else {
            Err(UploadError::ConnectionLost)
        }
    }
}

/// Fold one event into the outcome. An error step fails the upload
/// immediately; completion is remembered while the stream drains.
fn apply_event(
    event: ProgressEvent,
    on_progress: &Option<ProgressEventCallback>,
    completed: &mut bool,
    redirect: &mut Option<String>,
) -> Result<(), UploadError> {
    if let Some(on_progress) = on_progress {
        on_progress(&event);
    }

    match event.step {
        ProgressStep::Error => {
            let message = if event.message.is_empty() {
                "processing failed".to_string()
            } else {
                event.message
            };
            Err(UploadError::Server(message))
        }
        ProgressStep::Complete => {
            *completed = true;
            if event.redirect.is_some() {
                *redirect = event.redirect;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
