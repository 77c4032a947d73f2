//! WAV file I/O
//!
//! Reads 8/16/24/32-bit integer and 32-bit float WAV into the per-channel
//! `AudioBuffer` at the file's own sample rate, and writes 16/24-bit integer or
//! 32-bit float WAV back out. No sample-rate conversion is done; the processor
//! is prepared at whatever rate the file carries.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::{AudioBuffer, ChannelLayout};
use crate::error::{MultiFxError, Result};

/// Bit depths accepted by `export_wav`
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Import a WAV file as a mono or stereo buffer
///
/// # Errors
/// * `Io` - If the file does not exist
/// * `Wav` - If the file is not a readable WAV file
/// * `UnsupportedFormat` - More than two channels or an unknown bit depth
/// * `InvalidAudio` - The file holds no samples
pub fn import_wav(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(MultiFxError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    if ChannelLayout::from_count(channels).is_none() {
        return Err(MultiFxError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    let buffer = AudioBuffer::from_interleaved(&interleaved, channels, spec.sample_rate)?;

    if buffer.is_empty() {
        return Err(MultiFxError::InvalidAudio {
            reason: format!("{} contains no samples", path.display()),
        });
    }

    log::debug!(
        "Imported {}: {} ch, {} Hz, {}-bit, {} frames",
        path.display(),
        channels,
        spec.sample_rate,
        spec.bits_per_sample,
        buffer.num_samples()
    );

    Ok(buffer)
}

/// Export a buffer to WAV at the buffer's sample rate
///
/// 16 and 24 are written as integer PCM, 32 as IEEE float.
pub fn export_wav(buffer: &AudioBuffer, path: &Path, bit_depth: u16) -> Result<()> {
    if !SUPPORTED_BIT_DEPTHS.contains(&bit_depth) {
        return Err(MultiFxError::UnsupportedFormat {
            format: format!("{}-bit audio (only 16, 24, 32 supported)", bit_depth),
        });
    }
    if buffer.num_channels() == 0 {
        return Err(MultiFxError::InvalidAudio {
            reason: "cannot export a buffer with no channels".to_string(),
        });
    }

    let spec = WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate,
        bits_per_sample: bit_depth,
        sample_format: if bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, spec)?;
    let interleaved = buffer.to_interleaved();

    match bit_depth {
        16 => {
            for sample in interleaved {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled)?;
            }
        }
        24 => {
            for sample in interleaved {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled)?;
            }
        }
        _ => {
            for sample in interleaved {
                writer.write_sample(sample)?;
            }
        }
    }

    writer.finalize()?;
    log::debug!("Exported {} ({}-bit)", path.display(), bit_depth);
    Ok(())
}

/// Generate a sine test tone
///
/// Every channel of the layout carries the same tone at `amplitude`.
pub fn generate_test_tone(
    frequency: f32,
    amplitude: f32,
    duration_secs: f32,
    sample_rate: u32,
    layout: ChannelLayout,
) -> AudioBuffer {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let mut buffer = AudioBuffer::new(num_samples, layout);
    buffer.sample_rate = sample_rate;

    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;
    for channel in buffer.samples.iter_mut() {
        for (i, sample) in channel.iter_mut().enumerate() {
            *sample = amplitude * (angular_freq * i as f32).sin();
        }
    }

    buffer
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read interleaved samples and convert to f32 in [-1, 1]
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let samples: std::result::Result<Vec<f32>, _> = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect(),
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect(),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect(),
        // 24-bit stored as i32 in hound
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8388608.0))
            .collect(),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2147483648.0))
            .collect(),
        (format, bits) => {
            return Err(MultiFxError::UnsupportedFormat {
                format: format!("{}-bit {:?} audio", bits, format),
            })
        }
    };
    Ok(samples?)
}
