//! Elapsed-time display for a running capture

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration as StdDuration, Instant};

/// How often the tick callback fires
pub const TICK_INTERVAL_MS: u64 = 50;

/// Callback receiving the formatted elapsed time on every tick
pub type TickCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Format an elapsed duration as MM:SS:hh (hundredths of a second)
pub fn format_elapsed(elapsed: StdDuration) -> String {
    let total_ms = elapsed.as_millis() as u64;
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1000) % 60;
    let hundredths = (total_ms / 10) % 100;
    format!("{:02}:{:02}:{:02}", minutes, seconds, hundredths)
}

#[derive(Debug, Default)]
struct TimerInner {
    started: StdMutex<Option<Instant>>,
    running: AtomicBool,
}

/// Stopwatch driving the MM:SS:hh readout.
///
/// `start` records the instant and spawns a 50ms tick task; `stop`
/// freezes the readout at the final value, `reset` returns it to zero.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    inner: Arc<TimerInner>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from zero. Replaces any previous start instant.
    pub fn start(&self, on_tick: Option<TickCallback>) {
        if let Ok(mut started) = self.inner.started.lock() {
            *started = Some(Instant::now());
        }
        self.inner.running.store(true, Ordering::SeqCst);

        if let Some(on_tick) = on_tick {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                let mut interval =
                    tokio::time::interval(StdDuration::from_millis(TICK_INTERVAL_MS));
                loop {
                    interval.tick().await;
                    if !inner.running.load(Ordering::SeqCst) {
                        break;
                    }
                    let elapsed = inner
                        .started
                        .lock()
                        .ok()
                        .and_then(|s| s.map(|i| i.elapsed()))
                        .unwrap_or_default();
                    on_tick(&format_elapsed(elapsed));
                }
            });
        }
    }

    /// Stop ticking; the last displayed value stays on screen
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
    }

    /// Return the readout to zero
    pub fn reset(&self) {
        self.stop();
        if let Ok(mut started) = self.inner.started.lock() {
            *started = None;
        }
    }

    /// Time since start, or zero when reset
    pub fn elapsed(&self) -> StdDuration {
        self.inner
            .started
            .lock()
            .ok()
            .and_then(|s| s.map(|i| i.elapsed()))
            .unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }
}
