//! Live waveform rendering from the capture's audio samples
//!
//! The visualizer keeps a sliding analysis window over the most recent
//! samples and redraws the canvas on a fixed frame interval. It only
//! observes the stream; nothing here feeds back into the encoded output.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration as StdDuration;

use crate::application::ports::WaveformCanvas;

/// Number of most-recent samples rendered per frame
pub const ANALYSIS_WINDOW: usize = 2048;

/// Frame interval in milliseconds (roughly 60fps)
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Render one window of samples as a polyline across the canvas.
///
/// Short windows are zero-padded on the left so the trace always spans
/// the full width. Amplitude maps to vertical position with silence at
/// the vertical center.
pub fn render_frame<C: WaveformCanvas>(samples: &[i16], canvas: &mut C) {
    let (width, height) = canvas.size();
    if width == 0 || height == 0 {
        return;
    }

    let mut window = [0i16; ANALYSIS_WINDOW];
    let take = samples.len().min(ANALYSIS_WINDOW);
    window[ANALYSIS_WINDOW - take..].copy_from_slice(&samples[samples.len() - take..]);

    let x_step = width as f32 / ANALYSIS_WINDOW as f32;
    let half_height = height as f32 / 2.0;
    let points: Vec<(f32, f32)> = window
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let x = i as f32 * x_step;
            let y = (1.0 + s as f32 / 32768.0) * half_height;
            (x, y)
        })
        .collect();

    canvas.clear();
    canvas.draw_polyline(&points);
    canvas.present();
}

#[derive(Debug, Default)]
struct VisualizerInner {
    window: StdMutex<VecDeque<i16>>,
    running: AtomicBool,
}

/// Pumps captured samples into a sliding window and drives a canvas
#[derive(Debug, Clone, Default)]
pub struct Visualizer {
    inner: Arc<VisualizerInner>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append samples, keeping only the newest `ANALYSIS_WINDOW`
    pub fn push_samples(&self, samples: &[i16]) {
        if let Ok(mut window) = self.inner.window.lock() {
            window.extend(samples.iter().copied());
            while window.len() > ANALYSIS_WINDOW {
                window.pop_front();
            }
        }
    }

    /// Spawn the render loop on the given canvas.
    ///
    /// The loop checks the running flag on every frame so a stop lands
    /// before the next redraw and no stale frame is drawn afterwards.
    pub fn start<C>(&self, mut canvas: C)
    where
        C: WaveformCanvas + Send + 'static,
    {
        self.inner.running.store(true, Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(StdDuration::from_millis(FRAME_INTERVAL_MS));
            loop {
                interval.tick().await;
                if !inner.running.load(Ordering::SeqCst) {
                    break;
                }
                let snapshot: Vec<i16> = match inner.window.lock() {
                    Ok(window) => window.iter().copied().collect(),
                    Err(_) => break,
                };
                render_frame(&snapshot, &mut canvas);
            }
        });
    }

    /// Halt the render loop and clear the window
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        if let Ok(mut window) = self.inner.window.lock() {
            window.clear();
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }
}
