//! MultiFx - Real-time Reorderable Multi-Effect Processor
//!
//! Five effect units (phaser, chorus, overdrive, ladder filter and general
//! filter) run in place on each audio block, in an order the control thread
//! can change at any time.
//!
//! # Architecture
//!
//! - `params`: named parameters with lock-free values, written by the control
//!   thread and read by the effect units every block
//! - `dsp`: the effect units, the `Effect` trait and the rack that resolves a
//!   processing order into a chain
//! - `engine`: the Order Channel, the block pipeline driver and its
//!   control-thread handle, state snapshots, offline rendering and WAV I/O
//!
//! ```
//! use multifx::config::ProcessorConfig;
//! use multifx::dsp::{DspOrder, EffectKind};
//! use multifx::engine::{AudioBuffer, ChannelLayout, MultiFxProcessor};
//!
//! let (mut processor, mut controller) = MultiFxProcessor::new(&ProcessorConfig::default())?;
//! controller.set_parameter("Chorus mix %", 0.5)?;
//! controller.request_order(DspOrder::from_kinds(&[EffectKind::Chorus, EffectKind::Phaser])?);
//!
//! let mut block = AudioBuffer::new(512, ChannelLayout::Stereo);
//! processor.process_block(&mut block);
//! assert_eq!(processor.active_order().active_count(), 2);
//! # Ok::<(), multifx::MultiFxError>(())
//! ```

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod params;

pub use error::{MultiFxError, Result};
