//! Capture device port interface

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::capture::CaptureSource;

/// Capture acquisition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Capture permission was denied")]
    PermissionDenied,

    #[error("System capture has no audio track")]
    NoAudioTrack,

    #[error("No capture device available")]
    NoDevice,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),
}

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Handle to one live track of an acquired stream.
///
/// Stopping a track flips its live flag; the device adapter polls the
/// flag and releases the underlying hardware resource.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    kind: TrackKind,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Release the track's underlying resource
    pub fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Shared flag the owning adapter polls for release
    pub fn live_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.live)
    }
}

/// Producer side of an acquired stream, held by the device adapter.
///
/// Samples are mono i16 PCM at `MediaStream::sample_rate`. Backpressure
/// drops chunks rather than blocking the audio callback.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    samples: mpsc::Sender<Vec<i16>>,
    ended: Arc<AtomicBool>,
}

impl StreamHandle {
    /// Push a chunk of captured samples. The audio callback must never
    /// block, so a full channel drops the chunk and logs it; a closed
    /// channel means the consumer is gone and the chunk is discarded.
    pub fn push_samples(&self, chunk: Vec<i16>) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.samples.try_send(chunk) {
            log::warn!("sample channel full, dropping a chunk of captured audio");
        }
    }

    /// Signal that the source ended on its own (device unplugged,
    /// share revoked). Consumers treat this like an explicit stop.
    pub fn end(&self) {
        self.ended.store(true, Ordering::SeqCst);
    }
}

/// An acquired capture stream: its tracks plus the sample channel
#[derive(Debug)]
pub struct MediaStream {
    tracks: Vec<MediaTrack>,
    samples: mpsc::Receiver<Vec<i16>>,
    ended: Arc<AtomicBool>,
    sample_rate: u32,
}

const SAMPLE_CHANNEL_CAPACITY: usize = 64;

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>, sample_rate: u32) -> (Self, StreamHandle) {
        let (tx, rx) = mpsc::channel(SAMPLE_CHANNEL_CAPACITY);
        let ended = Arc::new(AtomicBool::new(false));
        let handle = StreamHandle {
            samples: tx,
            ended: Arc::clone(&ended),
        };
        let stream = Self {
            tracks,
            samples: rx,
            ended,
            sample_rate,
        };
        (stream, handle)
    }

    pub fn has_track(&self, kind: TrackKind) -> bool {
        self.tracks.iter().any(|t| t.kind() == kind)
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stop every track in the stream
    pub fn release(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    /// Decompose into (tracks, sample receiver, ended flag, sample rate)
    pub fn into_parts(
        self,
    ) -> (
        Vec<MediaTrack>,
        mpsc::Receiver<Vec<i16>>,
        Arc<AtomicBool>,
        u32,
    ) {
        (self.tracks, self.samples, self.ended, self.sample_rate)
    }
}

/// Port for acquiring capture streams from the platform
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire a stream for the given source.
    ///
    /// # Returns
    /// A stream with at least one track, or an error if the platform
    /// refused or has no matching device
    async fn acquire(&self, source: CaptureSource) -> Result<MediaStream, CaptureError>;
}
