//! Processor configuration
//!
//! Loaded from JSON or built in code. Everything here is fixed for the
//! lifetime of a prepared processor; changing it means preparing again.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::channel::DEFAULT_ORDER_CAPACITY;
use crate::engine::{ChannelLayout, DEFAULT_SAMPLE_RATE, MIN_SAMPLE_RATE};
use crate::error::{MultiFxError, Result};

/// Default host block size in frames
pub const DEFAULT_BLOCK_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub sample_rate: u32,
    /// Largest block the host will pass to `process_block`
    pub block_size: usize,
    pub input_layout: ChannelLayout,
    pub output_layout: ChannelLayout,
    /// Pending orders the Order Channel can hold
    pub order_fifo_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
            input_layout: ChannelLayout::Stereo,
            output_layout: ChannelLayout::Stereo,
            order_fifo_capacity: DEFAULT_ORDER_CAPACITY,
        }
    }
}

impl ProcessorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < MIN_SAMPLE_RATE {
            return Err(MultiFxError::InvalidConfig {
                reason: format!(
                    "sample_rate {} is below the minimum of {} Hz",
                    self.sample_rate, MIN_SAMPLE_RATE
                ),
            });
        }
        if self.block_size == 0 {
            return Err(MultiFxError::InvalidConfig {
                reason: "block_size must be greater than zero".to_string(),
            });
        }
        if self.order_fifo_capacity == 0 {
            return Err(MultiFxError::InvalidConfig {
                reason: "order_fifo_capacity must be greater than zero".to_string(),
            });
        }
        if !is_layout_supported(self.input_layout, self.output_layout) {
            return Err(MultiFxError::UnsupportedLayout {
                inputs: self.input_layout.num_channels(),
                outputs: self.output_layout.num_channels(),
            });
        }
        Ok(())
    }

    /// Copy with the sample rate and channel layout of an input buffer
    pub fn for_input(&self, sample_rate: u32, layout: ChannelLayout) -> Self {
        Self {
            sample_rate,
            input_layout: layout,
            output_layout: layout,
            ..*self
        }
    }
}

/// Output must be mono or stereo and match the input
pub fn is_layout_supported(input: ChannelLayout, output: ChannelLayout) -> bool {
    matches!(output, ChannelLayout::Mono | ChannelLayout::Stereo) && input == output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.block_size, 512);
        assert_eq!(config.order_fifo_capacity, 8);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "sample_rate": 44100, "input_layout": "mono", "output_layout": "mono" }"#;
        let config = ProcessorConfig::from_json_str(json).unwrap();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.input_layout, ChannelLayout::Mono);
        assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn test_mismatched_layout_rejected() {
        let err = ProcessorConfig::from_json_str(r#"{ "input_layout": "mono" }"#).unwrap_err();
        assert!(matches!(
            err,
            MultiFxError::UnsupportedLayout {
                inputs: 1,
                outputs: 2
            }
        ));
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let err = ProcessorConfig::from_json_str(r#"{ "block_size": 0 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_sample_rate_below_floor_rejected() {
        for rate in [0, 16, 7999] {
            let config = ProcessorConfig {
                sample_rate: rate,
                ..ProcessorConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert_eq!(err.error_code(), "INVALID_CONFIG");
        }
        let config = ProcessorConfig::default().for_input(MIN_SAMPLE_RATE, ChannelLayout::Stereo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "block_size": 128, "order_fifo_capacity": 4 }}"#).unwrap();
        let config = ProcessorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.block_size, 128);
        assert_eq!(config.order_fifo_capacity, 4);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ProcessorConfig::default().for_input(96000, ChannelLayout::Mono);
        let parsed = ProcessorConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
