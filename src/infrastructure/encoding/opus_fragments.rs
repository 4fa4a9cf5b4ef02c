//! Opus fragment encoder with speech-optimized settings
//!
//! Target settings:
//! - Sample rate: 16kHz (input is resampled when the device differs)
//! - Channels: Mono
//! - Codec: Opus in an Ogg container
//! - Bitrate: 16kbps, VOIP application
//!
//! Every fragment is written as a complete chained-Ogg logical stream
//! (own serial, own headers, explicit end-of-stream), so concatenating
//! fragments in capture order yields one playable Ogg Opus file.

use ogg::writing::{PacketWriteEndInfo, PacketWriter};
use rubato::{FftFixedIn, Resampler};

use crate::application::ports::{EncodingError, FragmentEncoder};
use crate::domain::capture::MediaFormat;

/// Target sample rate for speech-optimized encoding
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Opus frame size in samples (20ms at 16kHz)
pub const FRAME_SIZE: usize = 320;

/// Target bitrate in bits per second
const TARGET_BITRATE: i32 = 16000;

/// Fragment encoder producing self-contained Ogg Opus streams
#[derive(Debug, Default)]
pub struct OpusFragmentEncoder;

impl OpusFragmentEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Resample audio from device rate to 16kHz if needed
    fn resample_to_16k(samples: &[i16], source_rate: u32) -> Result<Vec<i16>, EncodingError> {
        if source_rate == TARGET_SAMPLE_RATE {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            TARGET_SAMPLE_RATE as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| EncodingError::Resample(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());
            let mut chunk = samples_f32[input_pos..end_pos].to_vec();
            if chunk.len() < frames_needed {
                chunk.resize(frames_needed, 0.0);
            }

            let resampled = resampler
                .process(&[chunk], None)
                .map_err(|e| EncodingError::Resample(e.to_string()))?;

            output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
            input_pos = end_pos;
        }

        output.truncate(output_len);

        Ok(output)
    }

    /// Encode 16kHz mono PCM into one complete Ogg Opus stream
    fn encode_stream(pcm_samples: &[i16]) -> Result<Vec<u8>, EncodingError> {
        let mut encoder = opus::Encoder::new(
            TARGET_SAMPLE_RATE,
            opus::Channels::Mono,
            opus::Application::Voip,
        )
        .map_err(|e| EncodingError::Encode(format!("Opus init failed: {}", e)))?;
        encoder
            .set_bitrate(opus::Bitrate::Bits(TARGET_BITRATE))
            .map_err(|e| EncodingError::Encode(e.to_string()))?;
        encoder
            .set_vbr(true)
            .map_err(|e| EncodingError::Encode(e.to_string()))?;
        encoder
            .set_inband_fec(true)
            .map_err(|e| EncodingError::Encode(e.to_string()))?;

        let serial = rand_serial();
        let mut ogg_data = Vec::new();
        let mut packet_writer = PacketWriter::new(std::io::Cursor::new(&mut ogg_data));

        write_opus_headers(&mut packet_writer, serial)?;

        let mut granule_pos = 0u64;
        let mut frame_num = 0;
        for chunk in pcm_samples.chunks(FRAME_SIZE) {
            // Pad last frame if needed
            let frame = if chunk.len() < FRAME_SIZE {
                let mut padded = vec![0i16; FRAME_SIZE];
                padded[..chunk.len()].copy_from_slice(chunk);
                padded
            } else {
                chunk.to_vec()
            };

            let mut opus_packet = vec![0u8; 4000]; // Max Opus packet size
            let len = encoder
                .encode(&frame, &mut opus_packet)
                .map_err(|e| EncodingError::Encode(e.to_string()))?;
            opus_packet.truncate(len);

            granule_pos += FRAME_SIZE as u64;
            frame_num += 1;

            let is_last = (frame_num * FRAME_SIZE) >= pcm_samples.len();
            let end_info = if is_last {
                PacketWriteEndInfo::EndStream
            } else {
                PacketWriteEndInfo::NormalPacket
            };

            packet_writer
                .write_packet(opus_packet, serial, end_info, granule_pos)
                .map_err(|e| EncodingError::Encode(e.to_string()))?;
        }

        drop(packet_writer);

        Ok(ogg_data)
    }
}

/// Write Opus identification and comment headers
fn write_opus_headers<W: std::io::Write>(
    writer: &mut PacketWriter<W>,
    serial: u32,
) -> Result<(), EncodingError> {
    // Opus identification header (RFC 7845, section 5.1)
    let mut id_header = Vec::with_capacity(19);
    id_header.extend_from_slice(b"OpusHead"); // Magic signature
    id_header.push(1); // Version
    id_header.push(1); // Channel count (mono)
    id_header.extend_from_slice(&0u16.to_le_bytes()); // Pre-skip
    id_header.extend_from_slice(&TARGET_SAMPLE_RATE.to_le_bytes()); // Original sample rate
    id_header.extend_from_slice(&0i16.to_le_bytes()); // Output gain
    id_header.push(0); // Channel mapping family

    writer
        .write_packet(id_header, serial, PacketWriteEndInfo::EndPage, 0)
        .map_err(|e| EncodingError::Encode(e.to_string()))?;

    // Opus comment header (RFC 7845, section 5.2)
    let mut comment_header = Vec::new();
    comment_header.extend_from_slice(b"OpusTags"); // Magic signature
    let vendor = b"live-scribe";
    comment_header.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    comment_header.extend_from_slice(vendor);
    comment_header.extend_from_slice(&0u32.to_le_bytes()); // No user comments

    writer
        .write_packet(comment_header, serial, PacketWriteEndInfo::EndPage, 0)
        .map_err(|e| EncodingError::Encode(e.to_string()))?;

    Ok(())
}

/// Pseudo-random serial number for each Ogg logical stream
fn rand_serial() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (duration.as_secs() as u32) ^ duration.subsec_nanos()
}

impl FragmentEncoder for OpusFragmentEncoder {
    fn supports(&self, format: &MediaFormat) -> bool {
        matches!(format, MediaFormat::OggOpus)
    }

    fn encode_fragment(
        &self,
        samples: &[i16],
        sample_rate: u32,
        format: &MediaFormat,
    ) -> Result<Vec<u8>, EncodingError> {
        if !self.supports(format) {
            return Err(EncodingError::UnsupportedFormat(*format));
        }
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let resampled = Self::resample_to_16k(samples, sample_rate)?;
        Self::encode_stream(&resampled)
    }
}
