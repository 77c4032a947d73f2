//! Control-thread handle
//!
//! Owns the producing end of the Order Channel and the write path into the
//! shared parameter store.

use std::sync::Arc;

use super::channel::OrderSender;
use super::state::ProcessorState;
use crate::dsp::DspOrder;
use crate::error::Result;
use crate::params::ParameterStore;

pub struct ProcessorController {
    store: Arc<ParameterStore>,
    order_tx: OrderSender,
    requested_order: DspOrder,
}

impl ProcessorController {
    pub(crate) fn new(
        store: Arc<ParameterStore>,
        order_tx: OrderSender,
        initial_order: DspOrder,
    ) -> Self {
        Self {
            store,
            order_tx,
            requested_order: initial_order,
        }
    }

    /// Send a new processing order to the audio thread.
    ///
    /// Returns `false` if the Order Channel was full and the update was
    /// dropped; the caller may retry after the next block.
    pub fn request_order(&mut self, order: DspOrder) -> bool {
        if self.order_tx.push(order) {
            self.requested_order = order;
            log::debug!("Order requested: {}", order);
            true
        } else if self.order_tx.is_abandoned() {
            log::warn!("Processor is gone, dropped {}", order);
            false
        } else {
            log::warn!(
                "Order channel full ({} pending), dropped {}",
                self.order_tx.capacity(),
                order
            );
            false
        }
    }

    /// Last order accepted by the channel
    pub fn requested_order(&self) -> DspOrder {
        self.requested_order
    }

    /// Write a parameter, clamped to its range. Returns the stored value.
    pub fn set_parameter(&self, name: &str, value: f32) -> Result<f32> {
        self.store.set(name, value)
    }

    pub fn parameter_value(&self, name: &str) -> Result<f32> {
        self.store.value(name)
    }

    /// Select a choice parameter by label. Returns the chosen index.
    pub fn set_choice(&self, name: &str, label: &str) -> Result<usize> {
        self.store.set_choice_by_label(name, label)
    }

    pub fn parameters(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    /// Snapshot every parameter and the last requested order
    pub fn capture_state(&self) -> ProcessorState {
        ProcessorState::new(self.requested_order, self.store.snapshot())
    }

    /// Apply a saved state.
    ///
    /// Parameters are written immediately (clamped); the order goes through
    /// the Order Channel. Returns whether the order was accepted.
    pub fn restore_state(&mut self, state: &ProcessorState) -> Result<bool> {
        self.store.apply_snapshot(&state.parameters)?;
        let accepted = self.request_order(state.order);
        log::info!(
            "Restored state saved at {} ({} parameters, order {})",
            state.saved_at,
            state.parameters.len(),
            state.order
        );
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessorConfig;
    use crate::dsp::EffectKind;
    use crate::engine::MultiFxProcessor;
    use crate::params::layout::{GENERAL_FILTER_MODE, PHASER_RATE};
    use approx::assert_relative_eq;

    #[test]
    fn test_set_parameter_clamps() {
        let (_processor, controller) = MultiFxProcessor::new(&ProcessorConfig::default()).unwrap();
        let stored = controller.set_parameter(PHASER_RATE, 50.0).unwrap();
        assert_relative_eq!(stored, 2.0);
        assert_relative_eq!(controller.parameter_value(PHASER_RATE).unwrap(), 2.0);
    }

    #[test]
    fn test_unknown_parameter() {
        let (_processor, controller) = MultiFxProcessor::new(&ProcessorConfig::default()).unwrap();
        let err = controller.set_parameter("Flanger Rate", 1.0).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PARAMETER");
    }

    #[test]
    fn test_set_choice() {
        let (_processor, controller) = MultiFxProcessor::new(&ProcessorConfig::default()).unwrap();
        assert_eq!(controller.set_choice(GENERAL_FILTER_MODE, "Notch").unwrap(), 2);
        assert_relative_eq!(controller.parameter_value(GENERAL_FILTER_MODE).unwrap(), 2.0);
    }

    #[test]
    fn test_dropped_order_not_recorded() {
        let config = ProcessorConfig {
            order_fifo_capacity: 1,
            ..ProcessorConfig::default()
        };
        let (_processor, mut controller) = MultiFxProcessor::new(&config).unwrap();
        let first = DspOrder::from_kinds(&[EffectKind::Chorus]).unwrap();
        let second = DspOrder::from_kinds(&[EffectKind::Phaser]).unwrap();

        assert!(controller.request_order(first));
        assert!(!controller.request_order(second));
        assert_eq!(controller.requested_order(), first);
    }

    #[test]
    fn test_order_dropped_after_processor_gone() {
        let config = ProcessorConfig {
            order_fifo_capacity: 1,
            ..ProcessorConfig::default()
        };
        let (processor, mut controller) = MultiFxProcessor::new(&config).unwrap();
        drop(processor);

        let first = DspOrder::from_kinds(&[EffectKind::Chorus]).unwrap();
        assert!(controller.request_order(first));
        assert!(!controller.request_order(DspOrder::empty()));
        assert_eq!(controller.requested_order(), first);
    }

    #[test]
    fn test_capture_and_restore() {
        let (mut processor, mut controller) =
            MultiFxProcessor::new(&ProcessorConfig::default()).unwrap();
        let order = DspOrder::from_kinds(&[EffectKind::GeneralFilter, EffectKind::Overdrive]).unwrap();
        controller.set_parameter(PHASER_RATE, 1.5).unwrap();
        controller.request_order(order);
        let state = controller.capture_state();
        assert_eq!(state.order, order);

        controller.parameters().reset_to_defaults();
        controller.request_order(DspOrder::default());
        assert!(controller.restore_state(&state).unwrap());

        let mut buffer = crate::engine::AudioBuffer::new(16, crate::engine::ChannelLayout::Stereo);
        processor.process_block(&mut buffer);
        assert_eq!(processor.active_order(), order);
        assert_relative_eq!(controller.parameter_value(PHASER_RATE).unwrap(), 1.5);
    }
}
