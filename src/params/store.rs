//! Parameter Store
//!
//! Maps stable names to live values. The set of parameters is fixed at
//! construction; after that the store is only read structurally, so it can be
//! shared through an `Arc` without a lock. Each value is a single atomic `f32`:
//! the control thread stores, the audio thread loads.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use atomic_float::AtomicF32;
use log::debug;

use super::layout::{create_parameter_layout, ParameterKind, ParameterLayout, ParameterSpec};
use crate::error::{MultiFxError, Result};

/// Current values keyed by parameter name (choice parameters as their index)
pub type ParameterSnapshot = BTreeMap<String, f32>;

/// A single live parameter
#[derive(Debug)]
pub struct Parameter {
    spec: ParameterSpec,
    value: AtomicF32,
}

impl Parameter {
    fn new(spec: ParameterSpec) -> Self {
        let value = AtomicF32::new(Self::default_of(&spec.kind));
        Self { spec, value }
    }

    fn default_of(kind: &ParameterKind) -> f32 {
        match kind {
            ParameterKind::Float { default, .. } => *default,
            ParameterKind::Choice { default, .. } => *default as f32,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.spec.kind
    }

    pub fn default_value(&self) -> f32 {
        Self::default_of(&self.spec.kind)
    }

    /// Current plain value. A single relaxed load; may be one block stale.
    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Store a plain value, clamped to the declared range.
    ///
    /// Choice values are rounded to the nearest valid index. Returns the value
    /// actually stored.
    pub fn set(&self, value: f32) -> f32 {
        let stored = self.legalise(value);
        self.value.store(stored, Ordering::Relaxed);
        stored
    }

    fn legalise(&self, value: f32) -> f32 {
        match &self.spec.kind {
            ParameterKind::Float { range, .. } => range.clamp(value),
            ParameterKind::Choice { choices, .. } => {
                if value.is_nan() {
                    return 0.0;
                }
                value.round().clamp(0.0, (choices.len() - 1) as f32)
            }
        }
    }

    /// Current value mapped to 0.0-1.0 (skewed for float parameters).
    pub fn get_normalised(&self) -> f32 {
        match &self.spec.kind {
            ParameterKind::Float { range, .. } => range.to_normalised(self.get()),
            ParameterKind::Choice { choices, .. } => {
                if choices.len() <= 1 {
                    0.0
                } else {
                    self.get() / (choices.len() - 1) as f32
                }
            }
        }
    }

    /// Set from a normalised 0.0-1.0 value, snapped to the step grid.
    pub fn set_normalised(&self, normalised: f32) -> f32 {
        match &self.spec.kind {
            ParameterKind::Float { range, .. } => {
                self.set(range.snap_to_legal_value(range.from_normalised(normalised)))
            }
            ParameterKind::Choice { choices, .. } => {
                let n = if normalised.is_nan() { 0.0 } else { normalised.clamp(0.0, 1.0) };
                self.set(n * (choices.len() - 1) as f32)
            }
        }
    }

    pub fn reset_to_default(&self) {
        self.value.store(self.default_value(), Ordering::Relaxed);
    }

    /// Human-readable current value, e.g. "0.20 Hz" or "LPF24"
    pub fn display(&self) -> String {
        match &self.spec.kind {
            ParameterKind::Float { unit, .. } => {
                if unit.is_empty() {
                    format!("{:.2}", self.get())
                } else {
                    format!("{:.2} {}", self.get(), unit)
                }
            }
            ParameterKind::Choice { choices, .. } => {
                choices[self.choice_index(choices.len())].to_string()
            }
        }
    }

    #[inline]
    fn choice_index(&self, count: usize) -> usize {
        (self.get().max(0.0) as usize).min(count - 1)
    }
}

// ============================================================================
// Resolved handles
// ============================================================================

/// Bound handle to a continuous parameter, resolved once at construction
#[derive(Debug, Clone)]
pub struct FloatHandle(Arc<Parameter>);

impl FloatHandle {
    #[inline]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

/// Bound handle to a choice parameter, resolved once at construction
#[derive(Debug, Clone)]
pub struct ChoiceHandle {
    param: Arc<Parameter>,
    count: usize,
}

impl ChoiceHandle {
    /// Selected index, always `< count`
    #[inline]
    pub fn index(&self) -> usize {
        self.param.choice_index(self.count)
    }

    pub fn name(&self) -> &'static str {
        self.param.name()
    }
}

// ============================================================================
// Store
// ============================================================================

/// Fixed set of named live parameters
#[derive(Debug)]
pub struct ParameterStore {
    params: Vec<Arc<Parameter>>,
    index: HashMap<&'static str, usize>,
}

impl ParameterStore {
    /// Build a store from a layout. Fails if a name is declared twice.
    pub fn new(layout: &ParameterLayout) -> Result<Self> {
        let mut params = Vec::with_capacity(layout.len());
        let mut index = HashMap::with_capacity(layout.len());

        for spec in layout.specs() {
            if index.insert(spec.name, params.len()).is_some() {
                return Err(MultiFxError::DuplicateParameter {
                    name: spec.name.to_string(),
                });
            }
            params.push(Arc::new(Parameter::new(spec.clone())));
        }

        debug!("Parameter store created with {} parameters", params.len());
        Ok(Self { params, index })
    }

    /// Store with every effect parameter at its declared default
    pub fn with_default_layout() -> Result<Self> {
        Self::new(&create_parameter_layout())
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| self.params[i].as_ref())
    }

    fn lookup(&self, name: &str) -> Result<&Arc<Parameter>> {
        self.index
            .get(name)
            .map(|&i| &self.params[i])
            .ok_or_else(|| MultiFxError::UnknownParameter {
                name: name.to_string(),
            })
    }

    /// Resolve a continuous parameter handle
    pub fn float(&self, name: &str) -> Result<FloatHandle> {
        let param = self.lookup(name)?;
        match param.kind() {
            ParameterKind::Float { .. } => Ok(FloatHandle(Arc::clone(param))),
            ParameterKind::Choice { .. } => Err(MultiFxError::ParameterKindMismatch {
                name: name.to_string(),
                expected: "float",
            }),
        }
    }

    /// Resolve a choice parameter handle
    pub fn choice(&self, name: &str) -> Result<ChoiceHandle> {
        let param = self.lookup(name)?;
        match param.kind() {
            ParameterKind::Choice { choices, .. } => Ok(ChoiceHandle {
                param: Arc::clone(param),
                count: choices.len(),
            }),
            ParameterKind::Float { .. } => Err(MultiFxError::ParameterKindMismatch {
                name: name.to_string(),
                expected: "choice",
            }),
        }
    }

    /// Write a plain value (clamped). Returns the stored value.
    pub fn set(&self, name: &str, value: f32) -> Result<f32> {
        Ok(self.lookup(name)?.set(value))
    }

    /// Select a choice by its label (case-insensitive).
    pub fn set_choice_by_label(&self, name: &str, label: &str) -> Result<usize> {
        let param = self.lookup(name)?;
        let ParameterKind::Choice { choices, .. } = param.kind() else {
            return Err(MultiFxError::ParameterKindMismatch {
                name: name.to_string(),
                expected: "choice",
            });
        };
        let index = choices
            .iter()
            .position(|c| c.eq_ignore_ascii_case(label))
            .ok_or_else(|| MultiFxError::InvalidChoice {
                name: name.to_string(),
                label: label.to_string(),
            })?;
        param.set(index as f32);
        Ok(index)
    }

    pub fn value(&self, name: &str) -> Result<f32> {
        Ok(self.lookup(name)?.get())
    }

    /// Iterate parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Enumerate every current value by name
    pub fn snapshot(&self) -> ParameterSnapshot {
        self.params
            .iter()
            .map(|p| (p.name().to_string(), p.get()))
            .collect()
    }

    /// Write a set of values back. Unknown names are rejected before anything
    /// is written.
    pub fn apply_snapshot(&self, snapshot: &ParameterSnapshot) -> Result<()> {
        let resolved = snapshot
            .iter()
            .map(|(name, &value)| self.lookup(name).map(|p| (p, value)))
            .collect::<Result<Vec<_>>>()?;
        for (param, value) in resolved {
            param.set(value);
        }
        Ok(())
    }

    pub fn reset_to_defaults(&self) {
        for param in &self.params {
            param.reset_to_default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::layout::{
        GENERAL_FILTER_MODE, LADDER_MODE, PHASER_FEEDBACK, PHASER_RATE,
    };
    use crate::params::range::NormalisableRange;
    use approx::assert_relative_eq;

    fn store() -> ParameterStore {
        ParameterStore::with_default_layout().unwrap()
    }

    #[test]
    fn test_defaults() {
        let store = store();
        assert_relative_eq!(store.value(PHASER_RATE).unwrap(), 0.2);
        assert_eq!(store.value(LADDER_MODE).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_range_write_is_clamped() {
        let store = store();
        assert_relative_eq!(store.set(PHASER_RATE, -5.0).unwrap(), 0.01);
        assert_relative_eq!(store.value(PHASER_RATE).unwrap(), 0.01);
        assert_relative_eq!(store.set(PHASER_RATE, 99.0).unwrap(), 2.0);
        assert_relative_eq!(store.set(PHASER_FEEDBACK, -3.0).unwrap(), -1.0);
    }

    #[test]
    fn test_choice_is_rounded_and_clamped() {
        let store = store();
        assert_eq!(store.set(LADDER_MODE, 2.6).unwrap(), 3.0);
        assert_eq!(store.set(LADDER_MODE, 42.0).unwrap(), 5.0);
        assert_eq!(store.set(LADDER_MODE, -1.0).unwrap(), 0.0);
        assert_eq!(store.choice(LADDER_MODE).unwrap().index(), 0);
    }

    #[test]
    fn test_handle_sees_later_writes() {
        let store = store();
        let rate = store.float(PHASER_RATE).unwrap();
        store.set(PHASER_RATE, 1.5).unwrap();
        assert_relative_eq!(rate.get(), 1.5);
    }

    #[test]
    fn test_unknown_name_fails_binding() {
        let store = store();
        let err = store.float("Phaser Speed").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PARAMETER");
    }

    #[test]
    fn test_kind_mismatch_fails_binding() {
        let store = store();
        assert!(matches!(
            store.float(LADDER_MODE),
            Err(MultiFxError::ParameterKindMismatch { .. })
        ));
        assert!(matches!(
            store.choice(PHASER_RATE),
            Err(MultiFxError::ParameterKindMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut layout = ParameterLayout::new();
        let spec = ParameterSpec::float("Gain", NormalisableRange::linear(0.0, 1.0, 0.0), 0.5, "");
        layout.add(spec.clone()).add(spec);
        assert!(matches!(
            ParameterStore::new(&layout),
            Err(MultiFxError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn test_set_choice_by_label() {
        let store = store();
        assert_eq!(store.set_choice_by_label(GENERAL_FILTER_MODE, "notch").unwrap(), 2);
        assert_eq!(store.get(GENERAL_FILTER_MODE).unwrap().display(), "Notch");
        assert!(store.set_choice_by_label(GENERAL_FILTER_MODE, "shelf").is_err());
    }

    #[test]
    fn test_normalised_round_trip() {
        let store = store();
        let param = store.get(PHASER_FEEDBACK).unwrap();
        param.set_normalised(0.75);
        assert_relative_eq!(param.get(), 0.5, epsilon = 1e-5);
        assert_relative_eq!(param.get_normalised(), 0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_snapshot_and_apply() {
        let store = store();
        store.set(PHASER_RATE, 1.0).unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), store.len());

        store.reset_to_defaults();
        assert_relative_eq!(store.value(PHASER_RATE).unwrap(), 0.2);

        store.apply_snapshot(&snapshot).unwrap();
        assert_relative_eq!(store.value(PHASER_RATE).unwrap(), 1.0);
    }

    #[test]
    fn test_apply_rejects_unknown_names_atomically() {
        let store = store();
        let mut snapshot = ParameterSnapshot::new();
        snapshot.insert(PHASER_RATE.to_string(), 1.0);
        snapshot.insert("Nope".to_string(), 1.0);
        assert!(store.apply_snapshot(&snapshot).is_err());
        assert_relative_eq!(store.value(PHASER_RATE).unwrap(), 0.2);
    }

    #[test]
    fn test_display() {
        let store = store();
        assert_eq!(store.get(PHASER_RATE).unwrap().display(), "0.20 Hz");
    }
}
