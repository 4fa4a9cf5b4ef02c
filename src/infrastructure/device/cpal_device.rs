//! Cross-platform capture device using cpal
//!
//! Microphone capture opens the default input device. System capture
//! looks for a loopback/monitor input carrying the machine's output
//! mix; a system capture without one is returned audio-less and the
//! session decides whether that is acceptable.

use std::sync::atomic::Ordering;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};

use crate::application::ports::{
    CaptureDevice, CaptureError, MediaStream, MediaTrack, StreamHandle, TrackKind,
};
use crate::domain::capture::CaptureSource;
use crate::infrastructure::encoding::TARGET_SAMPLE_RATE;

/// Nominal rate reported for an audio-less stream
const FALLBACK_SAMPLE_RATE: u32 = 48000;

/// Device name fragments that identify an output-loopback input
const LOOPBACK_MARKERS: [&str; 3] = ["monitor", "loopback", "stereo mix"];

/// Capture device adapter backed by cpal
#[derive(Debug, Default)]
pub struct CpalCaptureDevice;

impl CpalCaptureDevice {
    pub fn new() -> Self {
        Self
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device().ok_or(CaptureError::NoDevice)
    }

    /// Find an input device that monitors the system output mix
    fn get_loopback_device() -> Option<cpal::Device> {
        let host = cpal::default_host();
        let devices = host.input_devices().ok()?;
        for device in devices {
            if let Ok(name) = device.name() {
                let name = name.to_lowercase();
                if LOOPBACK_MARKERS.iter().any(|m| name.contains(m)) {
                    return Some(device);
                }
            }
        }
        None
    }

    /// Get a suitable input configuration
    fn get_input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| map_start_error(e.to_string()))?;

        // Prefer mono and a range covering the encoder's target rate;
        // only i16 and f32 formats are considered
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range =
            best_config.ok_or_else(|| CaptureError::StartFailed("No suitable config found".into()))?;

        let sample_rate = if config_range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved multi-channel samples down to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Run the cpal stream on a dedicated thread until the audio track
    /// is stopped. cpal streams are not Send, so the stream must live
    /// and die on this thread.
    fn spawn_stream_thread(
        pick_device: impl Fn() -> Result<cpal::Device, CaptureError> + Send + 'static,
        audio_track: MediaTrack,
        handle: StreamHandle,
        config: StreamConfig,
        sample_format: SampleFormat,
    ) {
        let live = audio_track.live_flag();
        std::thread::spawn(move || {
            let device = match pick_device() {
                Ok(d) => d,
                Err(err) => {
                    log::warn!("capture device vanished before start: {}", err);
                    handle.end();
                    return;
                }
            };

            let channels = config.channels;
            let push_handle = handle.clone();
            let error_handle = handle.clone();
            let on_error = move |err: cpal::StreamError| {
                log::warn!("audio stream error, ending capture: {}", err);
                error_handle.end();
            };

            let stream_result = match sample_format {
                SampleFormat::I16 => device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let mono = CpalCaptureDevice::mix_to_mono(data, channels);
                        push_handle.push_samples(mono);
                    },
                    on_error,
                    None,
                ),

                SampleFormat::F32 => device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        let mono = CpalCaptureDevice::mix_to_mono(&i16_data, channels);
                        push_handle.push_samples(mono);
                    },
                    on_error,
                    None,
                ),

                _ => {
                    log::warn!("unsupported sample format {:?}", sample_format);
                    handle.end();
                    return;
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(err) => {
                    log::warn!("failed to build input stream: {}", err);
                    handle.end();
                    return;
                }
            };

            if let Err(err) = stream.play() {
                log::warn!("failed to start input stream: {}", err);
                handle.end();
                return;
            }

            // Keep the hardware open until the track is released
            while live.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }

            drop(stream);
        });
    }
}

fn map_start_error(message: String) -> CaptureError {
    if message.to_lowercase().contains("permission") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::StartFailed(message)
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn acquire(&self, source: CaptureSource) -> Result<MediaStream, CaptureError> {
        match source {
            CaptureSource::Microphone => {
                let device = Self::get_input_device()?;
                let (config, sample_format) = Self::get_input_config(&device)?;
                let sample_rate = config.sample_rate.0;

                let audio_track = MediaTrack::new(TrackKind::Audio);
                let (stream, handle) =
                    MediaStream::new(vec![audio_track.clone()], sample_rate);

                Self::spawn_stream_thread(
                    Self::get_input_device,
                    audio_track,
                    handle,
                    config,
                    sample_format,
                );

                Ok(stream)
            }

            CaptureSource::SystemCapture => {
                let video_track = MediaTrack::new(TrackKind::Video);

                let Some(loopback) = Self::get_loopback_device() else {
                    // The display share can exist without a system
                    // audio source; report what was actually acquired.
                    let (stream, _handle) =
                        MediaStream::new(vec![video_track], FALLBACK_SAMPLE_RATE);
                    return Ok(stream);
                };

                let (config, sample_format) = Self::get_input_config(&loopback)?;
                let sample_rate = config.sample_rate.0;

                let audio_track = MediaTrack::new(TrackKind::Audio);
                let (stream, handle) = MediaStream::new(
                    vec![audio_track.clone(), video_track],
                    sample_rate,
                );

                Self::spawn_stream_thread(
                    || Self::get_loopback_device().ok_or(CaptureError::NoDevice),
                    audio_track,
                    handle,
                    config,
                    sample_format,
                );

                Ok(stream)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        let result = CpalCaptureDevice::mix_to_mono(&mono, 1);
        assert_eq!(result, mono);
    }

    #[test]
    fn mix_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        let result = CpalCaptureDevice::mix_to_mono(&stereo, 2);
        assert_eq!(result, vec![150, 350]); // Average of each pair
    }

    #[test]
    fn permission_messages_map_to_permission_denied() {
        assert_eq!(
            map_start_error("Permission denied by system".into()),
            CaptureError::PermissionDenied
        );
        assert!(matches!(
            map_start_error("device busy".into()),
            CaptureError::StartFailed(_)
        ));
    }
}
