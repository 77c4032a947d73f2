//! Block Pipeline Driver
//!
//! `MultiFxProcessor` is the audio-thread side of the system. The host calls
//! `process_block` once per block; each call drains pending order updates,
//! zero-fills output channels that have no input, and streams the block
//! through the effect rack in the active order.

use std::sync::Arc;

use super::buffer::{AudioBuffer, ChannelLayout, MIN_SAMPLE_RATE};
use super::channel::{order_channel, OrderReceiver};
use super::controller::ProcessorController;
use crate::config::{self, ProcessorConfig};
use crate::dsp::{DspOrder, EffectRack, MAX_CHANNELS};
use crate::error::{MultiFxError, Result};
use crate::params::ParameterStore;

pub struct MultiFxProcessor {
    store: Arc<ParameterStore>,
    rack: EffectRack,
    active_order: DspOrder,
    order_rx: OrderReceiver,

    sample_rate: u32,
    block_size: usize,
    input_channels: usize,
    output_channels: usize,
}

impl MultiFxProcessor {
    /// Build a processor with the standard parameter layout and effect units,
    /// prepared for `config`.
    pub fn new(config: &ProcessorConfig) -> Result<(Self, ProcessorController)> {
        let store = Arc::new(ParameterStore::with_default_layout()?);
        let rack = EffectRack::new(&store)?;
        Self::with_rack(config, store, rack)
    }

    /// Build a processor around an existing store and rack
    pub fn with_rack(
        config: &ProcessorConfig,
        store: Arc<ParameterStore>,
        rack: EffectRack,
    ) -> Result<(Self, ProcessorController)> {
        config.validate()?;

        let (order_tx, order_rx) = order_channel(config.order_fifo_capacity);
        let active_order = DspOrder::default();
        let controller = ProcessorController::new(Arc::clone(&store), order_tx, active_order);

        let mut processor = Self {
            store,
            rack,
            active_order,
            order_rx,
            sample_rate: config.sample_rate,
            block_size: config.block_size,
            input_channels: config.input_layout.num_channels(),
            output_channels: config.output_layout.num_channels(),
        };
        processor.prepare_to_play(config.sample_rate, config.block_size);

        log::info!(
            "Processor ready: {} parameters, {} Hz, block {}, {} in / {} out",
            processor.store.len(),
            processor.sample_rate,
            processor.block_size,
            processor.input_channels,
            processor.output_channels
        );

        Ok((processor, controller))
    }

    /// Prepare every unit for a new sample rate or block size.
    ///
    /// Not real-time safe. The host must not be running `process_block`.
    /// Rates below `MIN_SAMPLE_RATE` are raised to it.
    pub fn prepare_to_play(&mut self, sample_rate: u32, block_size: usize) {
        if sample_rate < MIN_SAMPLE_RATE {
            log::warn!("Sample rate {sample_rate} Hz raised to {MIN_SAMPLE_RATE} Hz");
        }
        self.sample_rate = sample_rate.max(MIN_SAMPLE_RATE);
        self.block_size = block_size.max(1);
        self.rack.prepare(self.sample_rate, self.block_size);
        log::debug!(
            "Prepared effect rack at {} Hz, block size {}",
            self.sample_rate,
            self.block_size
        );
    }

    /// Clear all unit state when playback stops
    pub fn release_resources(&mut self) {
        self.rack.reset();
        log::debug!("Effect rack reset");
    }

    pub fn is_layout_supported(&self, input: ChannelLayout, output: ChannelLayout) -> bool {
        config::is_layout_supported(input, output)
    }

    /// Declare how many of the buffer's channels carry input.
    ///
    /// Output channels beyond `inputs` are zero-filled every block.
    pub fn set_channel_counts(&mut self, inputs: usize, outputs: usize) -> Result<()> {
        if outputs == 0 || outputs > MAX_CHANNELS || inputs > outputs {
            return Err(MultiFxError::UnsupportedLayout { inputs, outputs });
        }
        self.input_channels = inputs;
        self.output_channels = outputs;
        Ok(())
    }

    /// Process one block in place.
    ///
    /// Real-time safe: no allocation, locking or logging.
    pub fn process_block(&mut self, buffer: &mut AudioBuffer) {
        self.drain_order_updates();
        self.clear_unused_channels(buffer);
        self.rack.process(&self.active_order, buffer);
    }

    /// Adopt the newest pending order, if any arrived.
    ///
    /// Returns whether the active order was replaced.
    pub fn drain_order_updates(&mut self) -> bool {
        match self.order_rx.drain_latest() {
            Some(order) => {
                self.active_order = order;
                true
            }
            None => false,
        }
    }

    /// Zero every channel at or beyond the input channel count
    pub fn clear_unused_channels(&self, buffer: &mut AudioBuffer) {
        for ch in self.input_channels..buffer.num_channels() {
            buffer.clear_channel(ch);
        }
    }

    pub fn active_order(&self) -> DspOrder {
        self.active_order
    }

    pub fn parameters(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    pub fn output_channels(&self) -> usize {
        self.output_channels
    }
}
