//! Effect rack and chain resolution
//!
//! The rack owns one long-lived unit per effect kind. Each block the active
//! `DspOrder` is resolved into a slot-ordered chain of mutable references into
//! the rack, and the buffer is streamed through that chain in place.

use super::chorus::Chorus;
use super::effect::Effect;
use super::filter::GeneralFilter;
use super::kind::{DspOrder, EffectKind, EFFECT_COUNT, SLOT_COUNT};
use super::ladder::LadderFilter;
use super::overdrive::Overdrive;
use super::phaser::Phaser;
use crate::engine::AudioBuffer;
use crate::error::{MultiFxError, Result};
use crate::params::ParameterStore;

/// One unit per real effect kind, indexed by `EffectKind::index`
pub struct EffectRack {
    units: [Box<dyn Effect>; EFFECT_COUNT],
}

impl EffectRack {
    /// Build the five standard units bound to `store`
    pub fn new(store: &ParameterStore) -> Result<Self> {
        let units: [Box<dyn Effect>; EFFECT_COUNT] = [
            Box::new(Phaser::new(store)?),
            Box::new(Chorus::new(store)?),
            Box::new(Overdrive::new(store)?),
            Box::new(LadderFilter::new(store)?),
            Box::new(GeneralFilter::new(store)?),
        ];
        Self::from_units(units)
    }

    /// Build a rack from custom units.
    ///
    /// `units[i]` must report `EffectKind::ALL[i]`.
    pub fn from_units(units: [Box<dyn Effect>; EFFECT_COUNT]) -> Result<Self> {
        for (slot, (unit, expected)) in units.iter().zip(EffectKind::ALL).enumerate() {
            let found = unit.kind();
            if found != expected {
                return Err(MultiFxError::RackMismatch {
                    slot,
                    expected: expected.display_name().to_string(),
                    found: found.display_name().to_string(),
                });
            }
        }
        Ok(Self { units })
    }

    pub fn prepare(&mut self, sample_rate: u32, max_block_size: usize) {
        for unit in &mut self.units {
            unit.prepare(sample_rate, max_block_size);
        }
    }

    pub fn reset(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
    }

    /// Unit for a real kind, `None` for `Empty`
    pub fn unit(&self, kind: EffectKind) -> Option<&dyn Effect> {
        kind.index().map(|idx| self.units[idx].as_ref())
    }

    pub fn unit_mut(&mut self, kind: EffectKind) -> Option<&mut (dyn Effect + 'static)> {
        match kind.index() {
            Some(idx) => Some(self.units[idx].as_mut()),
            None => None,
        }
    }

    /// Resolve an order into slot-ordered unit references.
    ///
    /// Empty slots resolve to `None`. Never allocates.
    pub fn resolve(&mut self, order: &DspOrder) -> ResolvedChain<'_> {
        let mut slot_of = [None; EFFECT_COUNT];
        for (slot, kind) in order.slots().iter().enumerate() {
            if let Some(idx) = kind.index() {
                debug_assert!(slot_of[idx].is_none(), "{kind} appears twice in order");
                slot_of[idx] = Some(slot);
            }
        }

        let mut slots: [Option<&mut (dyn Effect + 'static)>; SLOT_COUNT] =
            std::array::from_fn(|_| None);
        for (idx, unit) in self.units.iter_mut().enumerate() {
            if let Some(slot) = slot_of[idx] {
                slots[slot] = Some(unit.as_mut());
            }
        }
        ResolvedChain { slots }
    }

    /// Resolve `order` and run `buffer` through it
    pub fn process(&mut self, order: &DspOrder, buffer: &mut AudioBuffer) {
        self.resolve(order).process(buffer);
    }
}

// ============================================================================
// Resolved chain
// ============================================================================

/// Borrowed view of the rack in processing order
pub struct ResolvedChain<'a> {
    slots: [Option<&'a mut (dyn Effect + 'static)>; SLOT_COUNT],
}

impl<'a> ResolvedChain<'a> {
    /// Kinds in slot order, `Empty` where no unit is bound
    pub fn kinds(&self) -> DspOrder {
        let mut kinds = [EffectKind::Empty; SLOT_COUNT];
        for (kind, slot) in kinds.iter_mut().zip(&self.slots) {
            if let Some(unit) = slot {
                *kind = unit.kind();
            }
        }
        DspOrder::from_slots_unchecked(kinds)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Process in slot order; each unit sees the previous unit's output.
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        for unit in self.slots.iter_mut().flatten() {
            unit.process(buffer);
        }
    }
}
