//! Audio Buffer Management
//!
//! Per-channel contiguous sample storage handed to the effect chain each
//! block. Mono and stereo are the only layouts the processor accepts.

use serde::{Deserialize, Serialize};

use crate::error::{MultiFxError, Result};

/// Default sample rate used when nothing else is configured
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Lowest sample rate the effect units are prepared at
pub const MIN_SAMPLE_RATE: u32 = 8000;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Calculate the RMS level of an audio buffer in dB
///
/// Returns -f32::INFINITY for empty or silent buffers.
pub fn calculate_rms(buffer: &AudioBuffer) -> f32 {
    let total_samples = buffer.num_channels() * buffer.num_samples();
    if total_samples == 0 {
        return f32::NEG_INFINITY;
    }

    let sum_squares: f64 = buffer
        .samples
        .iter()
        .flat_map(|channel| channel.iter())
        .map(|&s| (s as f64) * (s as f64))
        .sum();

    let rms = (sum_squares / total_samples as f64).sqrt() as f32;
    linear_to_db(rms)
}

/// Peak absolute sample value (linear)
pub fn calculate_peak(buffer: &AudioBuffer) -> f32 {
    buffer
        .samples
        .iter()
        .flat_map(|channel| channel.iter())
        .map(|&s| s.abs())
        .fold(0.0_f32, f32::max)
}

// ============================================================================
// Channel Layout
// ============================================================================

/// Audio channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Single channel (mono)
    Mono,
    /// Two channels (stereo: left, right)
    #[default]
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    /// Create a ChannelLayout from a channel count
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            _ => None,
        }
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Non-interleaved 32-bit float audio
///
/// # Example
/// ```
/// use multifx::engine::{AudioBuffer, ChannelLayout};
///
/// let buffer = AudioBuffer::new(512, ChannelLayout::Stereo);
/// assert_eq!(buffer.num_channels(), 2);
/// assert_eq!(buffer.num_samples(), 512);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Sample data: outer Vec is channels, inner Vec is samples
    pub samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a zeroed buffer for the given layout
    pub fn new(num_samples: usize, layout: ChannelLayout) -> Self {
        Self::with_channels(layout.num_channels(), num_samples)
    }

    /// Create a zeroed buffer with an explicit channel count
    pub fn with_channels(num_channels: usize, num_samples: usize) -> Self {
        Self {
            samples: vec![vec![0.0_f32; num_samples]; num_channels],
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Create an audio buffer from interleaved sample data
    pub fn from_interleaved(
        interleaved: &[f32],
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if num_channels == 0 {
            return Err(MultiFxError::InvalidAudio {
                reason: "channel count must be at least 1".to_string(),
            });
        }

        if interleaved.len() % num_channels != 0 {
            return Err(MultiFxError::InvalidAudio {
                reason: format!(
                    "Interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    num_channels
                ),
            });
        }

        let num_samples = interleaved.len() / num_channels;
        let mut samples = vec![Vec::with_capacity(num_samples); num_channels];

        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Convert the buffer to interleaved format (L, R, L, R, ...)
    pub fn to_interleaved(&self) -> Vec<f32> {
        let num_channels = self.num_channels();
        let num_samples = self.num_samples();

        let mut interleaved = Vec::with_capacity(num_channels * num_samples);
        for sample_idx in 0..num_samples {
            for channel in &self.samples {
                interleaved.push(channel[sample_idx]);
            }
        }

        interleaved
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples per channel
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }

    /// Zero one channel. Out-of-range indices are ignored.
    #[inline]
    pub fn clear_channel(&mut self, channel: usize) {
        if let Some(ch) = self.samples.get_mut(channel) {
            ch.fill(0.0);
        }
    }

    /// Zero every channel
    pub fn clear(&mut self) {
        for ch in &mut self.samples {
            ch.fill(0.0);
        }
    }

    /// Change the per-channel length, zero-filling new samples.
    ///
    /// Does not allocate while `num_samples` stays within the capacity the
    /// buffer already had.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        for ch in &mut self.samples {
            ch.resize(num_samples, 0.0);
        }
    }

    /// Copy `len` samples of every shared channel from `src[src_offset..]`
    /// into `self[dst_offset..]`.
    pub fn copy_region_from(
        &mut self,
        src: &AudioBuffer,
        src_offset: usize,
        dst_offset: usize,
        len: usize,
    ) {
        for (dst, src) in self.samples.iter_mut().zip(src.samples.iter()) {
            dst[dst_offset..dst_offset + len].copy_from_slice(&src[src_offset..src_offset + len]);
        }
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|s| s.is_finite())
    }

    /// True if every sample is exactly zero
    pub fn is_silent(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|&s| s == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_is_silent() {
        let buffer = AudioBuffer::new(64, ChannelLayout::Mono);
        assert_eq!(buffer.num_channels(), 1);
        assert_eq!(buffer.num_samples(), 64);
        assert!(buffer.is_silent());
    }

    #[test]
    fn test_interleave_round_trip() {
        let interleaved = vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let buffer = AudioBuffer::from_interleaved(&interleaved, 2, 44100).unwrap();
        assert_eq!(buffer.channel(0), &[0.1, 0.2, 0.3]);
        assert_eq!(buffer.channel(1), &[-0.1, -0.2, -0.3]);
        assert_eq!(buffer.to_interleaved(), interleaved);
    }

    #[test]
    fn test_from_interleaved_rejects_ragged_data() {
        assert!(AudioBuffer::from_interleaved(&[0.0; 5], 2, 48000).is_err());
        assert!(AudioBuffer::from_interleaved(&[0.0; 4], 0, 48000).is_err());
    }

    #[test]
    fn test_clear_channel() {
        let mut buffer = AudioBuffer::with_channels(2, 8);
        buffer.channel_mut(0).fill(0.5);
        buffer.channel_mut(1).fill(0.5);
        buffer.clear_channel(1);
        buffer.clear_channel(7);
        assert!(buffer.channel(1).iter().all(|&s| s == 0.0));
        assert!(buffer.channel(0).iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_set_num_samples_and_copy_region() {
        let mut src = AudioBuffer::with_channels(1, 10);
        for (i, s) in src.channel_mut(0).iter_mut().enumerate() {
            *s = i as f32;
        }
        let mut dst = AudioBuffer::with_channels(2, 4);
        dst.copy_region_from(&src, 6, 0, 4);
        assert_eq!(dst.channel(0), &[6.0, 7.0, 8.0, 9.0]);
        assert!(dst.channel(1).iter().all(|&s| s == 0.0));

        dst.set_num_samples(2);
        assert_eq!(dst.num_samples(), 2);
    }

    #[test]
    fn test_levels() {
        let mut buffer = AudioBuffer::with_channels(1, 4);
        buffer.channel_mut(0).copy_from_slice(&[0.5, -1.0, 0.25, 0.0]);
        assert_relative_eq!(calculate_peak(&buffer), 1.0);
        assert_eq!(calculate_rms(&AudioBuffer::with_channels(1, 4)), f32::NEG_INFINITY);
        assert_relative_eq!(linear_to_db(1.0), 0.0);
    }
}
