//! Main app runner for the record-and-upload flow

use std::env;
use std::process::ExitCode;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use chrono::Local;

use crate::application::ports::ConfigStore;
use crate::application::{CaptureSession, TickCallback};
use crate::domain::capture::SessionState;
use crate::domain::config::AppConfig;
use crate::domain::upload::{UploadRequest, ValidationError};
use crate::infrastructure::canvas::RowSink;
use crate::infrastructure::upload::ProgressEventCallback;
use crate::infrastructure::{
    CpalCaptureDevice, HttpUploadClient, OpusFragmentEncoder, TerminalWaveform, UploadError,
    XdgConfigStore,
};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Columns of waveform shown in the status line
const WAVEFORM_WIDTH: u32 = 48;

/// Run one capture and upload it (or discard it)
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    // A title is needed before the upload, so fail early
    let title = match (&options.title, options.discard) {
        (_, true) => String::new(),
        (Some(title), false) if !title.trim().is_empty() => title.clone(),
        _ => {
            presenter.error("A meeting title is required. Pass one with --title, or use --discard.");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    // Setup signal handler
    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    // Create adapters and the session
    let device = CpalCaptureDevice::new();
    let encoder = OpusFragmentEncoder::new();
    let session = CaptureSession::new(device, encoder);

    presenter.start_spinner("Starting capture...");
    let (canvas, on_tick) = status_line(&presenter);

    if let Err(e) = session.start(options.source, canvas, Some(on_tick)).await {
        presenter.stop_spinner();
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    presenter.info("Capturing. Press Ctrl+C to stop.");

    // Wait for Ctrl+C, the duration limit, or the source ending
    let deadline = options.duration.map(|d| Instant::now() + d.as_std());
    loop {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        if shutdown.is_shutdown() {
            break;
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                presenter.info("Duration limit reached, stopping.");
                break;
            }
        }
        // The source can end on its own (device unplugged, share revoked)
        if session.state() == SessionState::Stopped {
            break;
        }
    }

    let artifact = if session.state() == SessionState::Capturing {
        match session.stop().await {
            Ok(artifact) => artifact,
            Err(e) => {
                presenter.stop_spinner();
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        match session.artifact() {
            Some(artifact) => artifact,
            None => {
                presenter.stop_spinner();
                presenter.error("Capture ended without any recorded data");
                return ExitCode::from(EXIT_ERROR);
            }
        }
    };

    presenter.stop_spinner();
    presenter.success(&format!(
        "Capture complete ({})",
        artifact.human_readable_size()
    ));
    if let Some(preview) = session.preview() {
        presenter.info(&format!("Preview ready ({} recording)", preview.as_str()));
    }

    if options.discard {
        if let Err(e) = session.reset() {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        presenter.info("Recording discarded");
        return ExitCode::from(EXIT_SUCCESS);
    }

    // Build the upload request; validation failures are user errors
    let request = match UploadRequest::new(
        artifact,
        &title,
        options.source,
        Local::now().naive_local(),
    ) {
        Ok(request) => request,
        Err(e @ ValidationError::EmptyTitle) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.info(&format!("Uploading as {}", request.filename()));
    presenter.start_spinner("Uploading...");
    let on_progress = progress_callback(&presenter);

    let client = HttpUploadClient::new(&options.endpoint);
    match client.upload(request, Some(on_progress)).await {
        Ok(outcome) => {
            presenter.spinner_success("Processing complete");
            presenter.output(&outcome.redirect);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail("Upload failed");
            presenter.error(&e.to_string());
            match e {
                UploadError::ConnectionLost => {
                    presenter.warn(
                        "The server may still be processing; check the meeting list before retrying.",
                    );
                }
                UploadError::Network(_) => {
                    presenter.info("Check that the server is reachable, then record again.");
                }
                _ => {}
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Wire the waveform canvas and timer callback into one spinner line
fn status_line(presenter: &Presenter) -> (TerminalWaveform, TickCallback) {
    let waveform = Arc::new(StdMutex::new(" ".repeat(WAVEFORM_WIDTH as usize)));
    let elapsed = Arc::new(StdMutex::new("00:00:00".to_string()));
    let spinner = presenter.spinner_handle();

    let redraw = {
        let waveform = Arc::clone(&waveform);
        let elapsed = Arc::clone(&elapsed);
        Arc::new(move || {
            if let Some(ref spinner) = spinner {
                let (wave, time) = match (waveform.lock(), elapsed.lock()) {
                    (Ok(w), Ok(t)) => (w.clone(), t.clone()),
                    _ => return,
                };
                spinner.set_message(Presenter::format_recording_status(&wave, &time));
            }
        })
    };

    let sink: RowSink = {
        let waveform = Arc::clone(&waveform);
        let redraw = Arc::clone(&redraw);
        Arc::new(move |row: &str| {
            if let Ok(mut wave) = waveform.lock() {
                *wave = row.to_string();
            }
            redraw();
        })
    };
    let canvas = TerminalWaveform::new(WAVEFORM_WIDTH, sink);

    let on_tick: TickCallback = {
        let elapsed = Arc::clone(&elapsed);
        Arc::new(move |time: &str| {
            if let Ok(mut slot) = elapsed.lock() {
                *slot = time.to_string();
            }
            redraw();
        })
    };

    (canvas, on_tick)
}

/// Mirror server progress messages onto the spinner
fn progress_callback(presenter: &Presenter) -> ProgressEventCallback {
    let spinner = presenter.spinner_handle();
    Arc::new(move |event| {
        if let Some(ref spinner) = spinner {
            let message = if event.message.is_empty() {
                event.step.to_string()
            } else {
                event.message.clone()
            };
            spinner.set_message(message);
        }
    })
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        endpoint: env::var("LIVE_SCRIBE_ENDPOINT").ok().filter(|s| !s.is_empty()),
        source: env::var("LIVE_SCRIBE_SOURCE").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
