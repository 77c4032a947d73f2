//! Processor state snapshot
//!
//! Parameter values plus the processing order form the complete persistent
//! state of the processor.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dsp::DspOrder;
use crate::error::{MultiFxError, Result};
use crate::params::ParameterSnapshot;

/// Current state schema version
pub const STATE_VERSION: u32 = 1;

fn default_state_version() -> u32 {
    STATE_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorState {
    #[serde(default = "default_state_version")]
    pub version: u32,
    pub order: DspOrder,
    /// Parameter values keyed by parameter name
    pub parameters: ParameterSnapshot,
    pub saved_at: DateTime<Utc>,
}

impl ProcessorState {
    pub fn new(order: DspOrder, parameters: ParameterSnapshot) -> Self {
        Self {
            version: STATE_VERSION,
            order,
            parameters,
            saved_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)?;
        if state.version > STATE_VERSION {
            return Err(MultiFxError::UnsupportedFormat {
                format: format!(
                    "state version {} (newest supported is {})",
                    state.version, STATE_VERSION
                ),
            });
        }
        Ok(state)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
