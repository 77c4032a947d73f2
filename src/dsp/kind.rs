//! Effect kinds and the processing order
//!
//! A `DspOrder` is a fixed-length sequence of slots. Each slot holds one of
//! the five effect kinds or `Empty`; no real kind may appear twice because
//! every effect is a single long-lived instance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MultiFxError, Result};

/// Number of slots in a processing order
pub const SLOT_COUNT: usize = 5;

/// Number of real (non-empty) effect kinds
pub const EFFECT_COUNT: usize = 5;

/// Effect selector for one slot of the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Phaser,
    Chorus,
    Overdrive,
    LadderFilter,
    GeneralFilter,
    /// No effect in this slot
    Empty,
}

impl EffectKind {
    /// The five real kinds in declaration order
    pub const ALL: [EffectKind; EFFECT_COUNT] = [
        EffectKind::Phaser,
        EffectKind::Chorus,
        EffectKind::Overdrive,
        EffectKind::LadderFilter,
        EffectKind::GeneralFilter,
    ];

    /// Table index of a real kind, `None` for `Empty`
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            EffectKind::Phaser => Some(0),
            EffectKind::Chorus => Some(1),
            EffectKind::Overdrive => Some(2),
            EffectKind::LadderFilter => Some(3),
            EffectKind::GeneralFilter => Some(4),
            EffectKind::Empty => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == EffectKind::Empty
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EffectKind::Phaser => "Phaser",
            EffectKind::Chorus => "Chorus",
            EffectKind::Overdrive => "Overdrive",
            EffectKind::LadderFilter => "Ladder Filter",
            EffectKind::GeneralFilter => "General Filter",
            EffectKind::Empty => "Empty",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Phaser => "phaser",
            EffectKind::Chorus => "chorus",
            EffectKind::Overdrive => "overdrive",
            EffectKind::LadderFilter => "ladder_filter",
            EffectKind::GeneralFilter => "general_filter",
            EffectKind::Empty => "empty",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for EffectKind {
    type Err = MultiFxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "phaser" => Ok(EffectKind::Phaser),
            "chorus" => Ok(EffectKind::Chorus),
            "overdrive" | "drive" => Ok(EffectKind::Overdrive),
            "ladder" | "ladder_filter" | "ladder-filter" => Ok(EffectKind::LadderFilter),
            "filter" | "general_filter" | "general-filter" => Ok(EffectKind::GeneralFilter),
            "empty" | "-" | "" => Ok(EffectKind::Empty),
            other => Err(MultiFxError::UnknownEffect {
                name: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Processing order
// ============================================================================

/// Slot-by-slot processing order of the chain
///
/// Slot 0 runs first. Equality is slot-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<EffectKind>", into = "Vec<EffectKind>")]
pub struct DspOrder {
    slots: [EffectKind; SLOT_COUNT],
}

impl DspOrder {
    /// Validate a full set of slots
    pub fn new(slots: [EffectKind; SLOT_COUNT]) -> Result<Self> {
        let mut seen = [false; EFFECT_COUNT];
        for kind in slots {
            if let Some(idx) = kind.index() {
                if seen[idx] {
                    return Err(MultiFxError::DuplicateEffect {
                        kind: kind.display_name().to_string(),
                    });
                }
                seen[idx] = true;
            }
        }
        Ok(Self { slots })
    }

    /// Build from a leading run of kinds; remaining slots are `Empty`.
    pub fn from_kinds(kinds: &[EffectKind]) -> Result<Self> {
        if kinds.len() > SLOT_COUNT {
            return Err(MultiFxError::TooManySlots {
                count: kinds.len(),
                max: SLOT_COUNT,
            });
        }
        let mut slots = [EffectKind::Empty; SLOT_COUNT];
        slots[..kinds.len()].copy_from_slice(kinds);
        Self::new(slots)
    }

    /// Caller guarantees no real kind repeats.
    pub(crate) fn from_slots_unchecked(slots: [EffectKind; SLOT_COUNT]) -> Self {
        debug_assert!(Self::new(slots).is_ok(), "duplicate effect in resolved order");
        Self { slots }
    }

    /// No validation at all, for exercising the resolver's own checks
    #[cfg(test)]
    pub(crate) fn from_slots_raw(slots: [EffectKind; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// Every slot empty
    pub fn empty() -> Self {
        Self {
            slots: [EffectKind::Empty; SLOT_COUNT],
        }
    }

    pub fn slots(&self) -> &[EffectKind; SLOT_COUNT] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<EffectKind> {
        self.slots.get(slot).copied()
    }

    /// Real kinds in processing order, skipping empty slots
    pub fn active_kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.slots.iter().copied().filter(|k| !k.is_empty())
    }

    pub fn active_count(&self) -> usize {
        self.active_kinds().count()
    }

    pub fn position_of(&self, kind: EffectKind) -> Option<usize> {
        if kind.is_empty() {
            return None;
        }
        self.slots.iter().position(|&k| k == kind)
    }
}

impl Default for DspOrder {
    /// Declaration order of the five effects
    fn default() -> Self {
        Self {
            slots: EffectKind::ALL,
        }
    }
}

impl TryFrom<Vec<EffectKind>> for DspOrder {
    type Error = MultiFxError;

    fn try_from(kinds: Vec<EffectKind>) -> Result<Self> {
        Self::from_kinds(&kinds)
    }
}

impl From<DspOrder> for Vec<EffectKind> {
    fn from(order: DspOrder) -> Self {
        order.slots.to_vec()
    }
}

impl fmt::Display for DspOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.slots.iter().map(|k| k.display_name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl FromStr for DspOrder {
    type Err = MultiFxError;

    /// Parse a comma-separated list such as `"chorus,phaser"`
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }
        let kinds = s
            .split(',')
            .map(EffectKind::from_str)
            .collect::<Result<Vec<_>>>()?;
        Self::from_kinds(&kinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_declaration_order() {
        let order = DspOrder::default();
        assert_eq!(order.slots(), &EffectKind::ALL);
        assert_eq!(order.active_count(), 5);
    }

    #[test]
    fn test_index_matches_all_table() {
        for (i, kind) in EffectKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), Some(i));
        }
        assert_eq!(EffectKind::Empty.index(), None);
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = DspOrder::from_kinds(&[EffectKind::Chorus, EffectKind::Chorus]).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_EFFECT");
    }

    #[test]
    fn test_multiple_empty_slots_allowed() {
        let order = DspOrder::new([
            EffectKind::Empty,
            EffectKind::Chorus,
            EffectKind::Empty,
            EffectKind::Phaser,
            EffectKind::Empty,
        ])
        .unwrap();
        assert_eq!(order.active_count(), 2);
        assert_eq!(order.position_of(EffectKind::Phaser), Some(3));
        assert_eq!(order.position_of(EffectKind::Empty), None);
    }

    #[test]
    fn test_too_many_slots() {
        let kinds = [EffectKind::Empty; SLOT_COUNT + 1];
        assert!(matches!(
            DspOrder::from_kinds(&kinds),
            Err(MultiFxError::TooManySlots { count: 6, max: 5 })
        ));
    }

    #[test]
    fn test_parse() {
        let order: DspOrder = "chorus, phaser".parse().unwrap();
        assert_eq!(
            order.slots(),
            &[
                EffectKind::Chorus,
                EffectKind::Phaser,
                EffectKind::Empty,
                EffectKind::Empty,
                EffectKind::Empty
            ]
        );
        assert!("chorus,flanger".parse::<DspOrder>().is_err());
        assert_eq!("".parse::<DspOrder>().unwrap(), DspOrder::empty());
    }

    #[test]
    fn test_serde_round_trip_and_validation() {
        let order = DspOrder::from_kinds(&[EffectKind::LadderFilter, EffectKind::Overdrive]).unwrap();
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("ladder_filter"));
        let back: DspOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);

        let bad = r#"["phaser","phaser"]"#;
        assert!(serde_json::from_str::<DspOrder>(bad).is_err());
    }

    #[test]
    fn test_display() {
        let order = DspOrder::from_kinds(&[EffectKind::Chorus]).unwrap();
        assert_eq!(order.to_string(), "[Chorus, Empty, Empty, Empty, Empty]");
    }
}
