//! Capture session use case
//!
//! Owns the Idle -> Capturing -> Stopped lifecycle: acquires a stream
//! from the capture device, pumps its samples through the fragment
//! encoder on a fixed interval, and finalizes the fragments into one
//! encoded artifact when capture ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::domain::capture::{
    negotiate_format, CaptureSource, EncodedArtifact, InvalidStateTransition, MediaFormat,
    PreviewState, SessionState,
};

use super::ports::{CaptureDevice, CaptureError, FragmentEncoder, MediaTrack, TrackKind};
use super::timer::{TickCallback, Timer};
use super::visualizer::Visualizer;
use super::WaveformCanvas;

/// Default time slice per encoded fragment
pub const FRAGMENT_INTERVAL_MS: u64 = 1000;

/// Errors from the capture session use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] InvalidStateTransition),

    #[error("Capture task ended without producing an artifact")]
    TaskFailed,
}

#[derive(Default)]
struct SessionInner {
    state: StdMutex<SessionState>,
    fragments: StdMutex<Vec<Vec<u8>>>,
    artifact: StdMutex<Option<EncodedArtifact>>,
    format: StdMutex<Option<MediaFormat>>,
    source: StdMutex<Option<CaptureSource>>,
    preview: StdMutex<Option<PreviewState>>,
    tracks: StdMutex<Vec<MediaTrack>>,
    stop_requested: AtomicBool,
    finalized: AtomicBool,
    stop_signal: Notify,
}

impl SessionInner {
    fn state(&self) -> SessionState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(SessionState::Idle)
    }

    fn set_state(&self, next: SessionState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Close out the capture exactly once, no matter whether an
    /// explicit stop or an external track end got here first.
    fn finalize(&self, timer: &Timer, visualizer: &Visualizer) {
        if self.finalized.swap(true, Ordering::SeqCst) {
            return;
        }

        visualizer.stop();
        timer.stop();

        let format = self
            .format
            .lock()
            .ok()
            .and_then(|f| *f)
            .unwrap_or(MediaFormat::OggOpus);
        let fragments: Vec<Vec<u8>> = self
            .fragments
            .lock()
            .map(|mut f| f.drain(..).collect())
            .unwrap_or_default();
        if let Ok(mut artifact) = self.artifact.lock() {
            *artifact = Some(EncodedArtifact::from_fragments(fragments, format));
        }

        if let Ok(tracks) = self.tracks.lock() {
            for track in tracks.iter() {
                track.stop();
            }
        }

        let source = self.source.lock().ok().and_then(|s| *s);
        if let (Ok(mut preview), Some(source)) = (self.preview.lock(), source) {
            *preview = Some(PreviewState::for_source(source));
        }

        self.set_state(SessionState::Stopped);
    }
}

/// Capture session use case, generic over its device and encoder ports
pub struct CaptureSession<D, E>
where
    D: CaptureDevice,
    E: FragmentEncoder + 'static,
{
    device: D,
    encoder: Arc<E>,
    inner: Arc<SessionInner>,
    timer: Timer,
    visualizer: Visualizer,
    fragment_interval: StdDuration,
    pump: StdMutex<Option<JoinHandle<()>>>,
}

impl<D, E> CaptureSession<D, E>
where
    D: CaptureDevice,
    E: FragmentEncoder + 'static,
{
    pub fn new(device: D, encoder: E) -> Self {
        Self {
            device,
            encoder: Arc::new(encoder),
            inner: Arc::new(SessionInner::default()),
            timer: Timer::new(),
            visualizer: Visualizer::new(),
            fragment_interval: StdDuration::from_millis(FRAGMENT_INTERVAL_MS),
            pump: StdMutex::new(None),
        }
    }

    /// Override the fragment interval (shorter slices for tests)
    pub fn with_fragment_interval(mut self, interval: StdDuration) -> Self {
        self.fragment_interval = interval;
        self
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    /// The finalized artifact, present once the session is Stopped
    pub fn artifact(&self) -> Option<EncodedArtifact> {
        self.inner.artifact.lock().ok().and_then(|a| a.clone())
    }

    pub fn preview(&self) -> Option<PreviewState> {
        self.inner.preview.lock().ok().and_then(|p| *p)
    }

    pub fn format(&self) -> Option<MediaFormat> {
        self.inner.format.lock().ok().and_then(|f| *f)
    }

    pub fn elapsed(&self) -> StdDuration {
        self.timer.elapsed()
    }

    /// Acquire the source and begin capturing.
    ///
    /// On a refused permission or missing device the session is left in
    /// Idle, so a later start can succeed.
    pub async fn start<C>(
        &self,
        source: CaptureSource,
        canvas: C,
        on_tick: Option<TickCallback>,
    ) -> Result<(), SessionError>
    where
        C: WaveformCanvas + Send + 'static,
    {
        let current = self.inner.state();
        if current != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: current,
                action: "start",
            }
            .into());
        }

        let stream = self.device.acquire(source).await?;

        // A system capture without system audio cannot produce the
        // recording the user asked for; release what was acquired.
        if source == CaptureSource::SystemCapture && !stream.has_track(TrackKind::Audio) {
            stream.release();
            return Err(CaptureError::NoAudioTrack.into());
        }

        let has_audio = stream.has_track(TrackKind::Audio);
        let format = negotiate_format(source, |f| self.encoder.supports(f));
        let (tracks, samples, ended, sample_rate) = stream.into_parts();

        if let Ok(mut slot) = self.inner.format.lock() {
            *slot = Some(format);
        }
        if let Ok(mut slot) = self.inner.source.lock() {
            *slot = Some(source);
        }
        if let Ok(mut slot) = self.inner.tracks.lock() {
            *slot = tracks;
        }
        self.inner.stop_requested.store(false, Ordering::SeqCst);
        self.inner.finalized.store(false, Ordering::SeqCst);
        self.inner.set_state(SessionState::Capturing);

        self.timer.start(on_tick);
        if has_audio {
            self.visualizer.start(canvas);
        }

        let handle = self.spawn_pump(samples, ended, sample_rate, format);
        if let Ok(mut pump) = self.pump.lock() {
            *pump = Some(handle);
        }

        Ok(())
    }

    fn spawn_pump(
        &self,
        mut samples: mpsc::Receiver<Vec<i16>>,
        ended: Arc<AtomicBool>,
        sample_rate: u32,
        format: MediaFormat,
    ) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let encoder = Arc::clone(&self.encoder);
        let timer = self.timer.clone();
        let visualizer = self.visualizer.clone();
        let fragment_interval = self.fragment_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(fragment_interval);
            interval.tick().await; // first tick fires immediately

            // Samples are received as they arrive, not once per tick:
            // the channel is bounded and the device drops chunks when it
            // fills, so letting a full interval of audio queue up would
            // silently lose captured content.
            let mut pcm: Vec<i16> = Vec::new();
            let mut channel_open = true;
            loop {
                let slice_done = tokio::select! {
                    _ = interval.tick() => true,
                    _ = inner.stop_signal.notified() => true,
                    chunk = samples.recv(), if channel_open => {
                        match chunk {
                            Some(chunk) => {
                                visualizer.push_samples(&chunk);
                                pcm.extend_from_slice(&chunk);
                            }
                            None => channel_open = false,
                        }
                        false
                    }
                };
                if !slice_done {
                    continue;
                }

                // Pick up anything still queued for this slice
                while let Ok(chunk) = samples.try_recv() {
                    visualizer.push_samples(&chunk);
                    pcm.extend_from_slice(&chunk);
                }

                if !pcm.is_empty() {
                    match encoder.encode_fragment(&pcm, sample_rate, &format) {
                        Ok(fragment) if !fragment.is_empty() => {
                            if let Ok(mut fragments) = inner.fragments.lock() {
                                fragments.push(fragment);
                            }
                        }
                        Ok(_) => {}
                        Err(err) => {
                            log::warn!("dropping unencodable fragment: {}", err);
                        }
                    }
                    pcm.clear();
                }

                let stop = inner.stop_requested.load(Ordering::SeqCst);
                let source_gone = ended.load(Ordering::SeqCst);
                if stop || source_gone {
                    if source_gone && !stop {
                        log::info!("capture source ended externally, finalizing");
                    }
                    inner.finalize(&timer, &visualizer);
                    break;
                }
            }
        })
    }

    /// Stop capturing and return the finalized artifact
    pub async fn stop(&self) -> Result<EncodedArtifact, SessionError> {
        let current = self.inner.state();
        if current != SessionState::Capturing {
            return Err(InvalidStateTransition {
                current_state: current,
                action: "stop",
            }
            .into());
        }

        self.inner.stop_requested.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so the pump wakes even if it is
        // not parked on the signal at this instant
        self.inner.stop_signal.notify_one();

        let handle = self.pump.lock().ok().and_then(|mut p| p.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        self.artifact().ok_or(SessionError::TaskFailed)
    }

    /// Discard any finalized artifact and return to Idle
    pub fn reset(&self) -> Result<(), SessionError> {
        let current = self.inner.state();
        if current == SessionState::Capturing {
            return Err(InvalidStateTransition {
                current_state: current,
                action: "reset",
            }
            .into());
        }

        self.timer.reset();
        if let Ok(mut fragments) = self.inner.fragments.lock() {
            fragments.clear();
        }
        if let Ok(mut artifact) = self.inner.artifact.lock() {
            *artifact = None;
        }
        if let Ok(mut preview) = self.inner.preview.lock() {
            *preview = None;
        }
        if let Ok(mut format) = self.inner.format.lock() {
            *format = None;
        }
        if let Ok(mut source) = self.inner.source.lock() {
            *source = None;
        }
        if let Ok(mut tracks) = self.inner.tracks.lock() {
            tracks.clear();
        }
        self.inner.stop_requested.store(false, Ordering::SeqCst);
        self.inner.finalized.store(false, Ordering::SeqCst);
        self.inner.set_state(SessionState::Idle);
        Ok(())
    }
}
