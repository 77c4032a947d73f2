//! Parameter declarations.
//!
//! Every parameter is addressed by a stable, human-readable name. These names
//! are the contract with hosts and automation and must not change between
//! versions.

use super::range::NormalisableRange;

// ============================================================================
// Stable parameter names
// ============================================================================

pub const PHASER_RATE: &str = "Phaser Rate Hz";
pub const PHASER_CENTER_FREQ: &str = "Phaser Center Freq Hz";
pub const PHASER_DEPTH: &str = "Phaser Depth %";
pub const PHASER_FEEDBACK: &str = "Phaser Feedback %";
pub const PHASER_MIX: &str = "Phaser mix %";

pub const CHORUS_RATE: &str = "Chorus Rate Hz";
pub const CHORUS_DEPTH: &str = "Chorus Depth %";
pub const CHORUS_CENTER_DELAY: &str = "Chorus Center delay Ms";
pub const CHORUS_FEEDBACK: &str = "Chorus Feedback %";
pub const CHORUS_MIX: &str = "Chorus mix %";

pub const OVERDRIVE_SATURATION: &str = "OverDrive Saturation";

pub const LADDER_MODE: &str = "Ladder Filter Mode";
pub const LADDER_CUTOFF: &str = "Ladder Filter Cutoff Hz";
pub const LADDER_RESONANCE: &str = "Ladder Filter Resonance";
pub const LADDER_DRIVE: &str = "Ladder Filter Drive";

pub const GENERAL_FILTER_MODE: &str = "General Filter Mode";
pub const GENERAL_FILTER_FREQ: &str = "General Filter Freq hz";
pub const GENERAL_FILTER_QUALITY: &str = "General Filter Quality";
pub const GENERAL_FILTER_GAIN: &str = "General Filter Gain";

/// Choice labels for the ladder filter mode, in index order
pub const LADDER_MODE_CHOICES: &[&str] = &["LPF12", "HPF12", "BPF12", "LPF24", "HPF24", "BPF24"];

/// Choice labels for the general filter mode, in index order
pub const GENERAL_FILTER_MODE_CHOICES: &[&str] = &["Peak", "Bandpass", "Notch", "Allpass"];

// ============================================================================
// Parameter shapes
// ============================================================================

/// Semantic shape of a parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// Continuous value in a range, displayed with a unit suffix
    Float {
        range: NormalisableRange,
        default: f32,
        unit: &'static str,
    },
    /// One of a fixed list of labels, stored as an index
    Choice {
        choices: &'static [&'static str],
        default: usize,
    },
}

impl ParameterKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterKind::Float { .. } => "float",
            ParameterKind::Choice { .. } => "choice",
        }
    }
}

/// Declaration of a single parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParameterKind,
}

impl ParameterSpec {
    /// Declare a continuous parameter. The default is clamped into the range.
    pub fn float(
        name: &'static str,
        range: NormalisableRange,
        default: f32,
        unit: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParameterKind::Float {
                range,
                default: range.clamp(default),
                unit,
            },
        }
    }

    /// Declare a choice parameter.
    ///
    /// # Panics
    ///
    /// Panics if `choices` is empty or `default` is out of bounds.
    pub fn choice(name: &'static str, choices: &'static [&'static str], default: usize) -> Self {
        assert!(!choices.is_empty(), "choice parameter needs at least one label");
        assert!(default < choices.len(), "default choice out of bounds");
        Self {
            name,
            kind: ParameterKind::Choice { choices, default },
        }
    }
}

/// Ordered collection of parameter declarations
#[derive(Debug, Clone, Default)]
pub struct ParameterLayout {
    specs: Vec<ParameterSpec>,
}

impl ParameterLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spec: ParameterSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Build the layout for all five effects.
pub fn create_parameter_layout() -> ParameterLayout {
    let mut layout = ParameterLayout::new();

    // Phaser
    layout
        .add(ParameterSpec::float(
            PHASER_RATE,
            NormalisableRange::linear(0.01, 2.0, 0.01),
            0.2,
            "Hz",
        ))
        .add(ParameterSpec::float(
            PHASER_DEPTH,
            NormalisableRange::linear(0.01, 1.0, 0.01),
            0.05,
            "%",
        ))
        .add(ParameterSpec::float(
            PHASER_CENTER_FREQ,
            NormalisableRange::linear(20.0, 2000.0, 1.0),
            1000.0,
            "Hz",
        ))
        .add(ParameterSpec::float(
            PHASER_FEEDBACK,
            NormalisableRange::linear(-1.0, 1.0, 0.01),
            0.0,
            "%",
        ))
        .add(ParameterSpec::float(
            PHASER_MIX,
            NormalisableRange::linear(0.01, 1.0, 0.01),
            0.05,
            "%",
        ));

    // Chorus
    layout
        .add(ParameterSpec::float(
            CHORUS_RATE,
            NormalisableRange::linear(0.01, 100.0, 0.01),
            0.2,
            "Hz",
        ))
        .add(ParameterSpec::float(
            CHORUS_DEPTH,
            NormalisableRange::linear(0.01, 1.0, 0.01),
            0.05,
            "%",
        ))
        .add(ParameterSpec::float(
            CHORUS_CENTER_DELAY,
            NormalisableRange::linear(1.0, 100.0, 0.1),
            7.0,
            "ms",
        ))
        .add(ParameterSpec::float(
            CHORUS_FEEDBACK,
            NormalisableRange::linear(-1.0, 1.0, 0.01),
            0.0,
            "%",
        ))
        .add(ParameterSpec::float(
            CHORUS_MIX,
            NormalisableRange::linear(0.01, 1.0, 0.01),
            0.05,
            "%",
        ));

    // Overdrive
    layout.add(ParameterSpec::float(
        OVERDRIVE_SATURATION,
        NormalisableRange::linear(1.0, 100.0, 0.1),
        1.0,
        "",
    ));

    // Ladder filter
    layout
        .add(ParameterSpec::choice(LADDER_MODE, LADDER_MODE_CHOICES, 0))
        .add(ParameterSpec::float(
            LADDER_CUTOFF,
            NormalisableRange::linear(20.0, 20000.0, 0.1),
            20000.0,
            "Hz",
        ))
        .add(ParameterSpec::float(
            LADDER_RESONANCE,
            NormalisableRange::linear(0.0, 1.0, 0.01),
            0.0,
            "",
        ))
        .add(ParameterSpec::float(
            LADDER_DRIVE,
            NormalisableRange::linear(1.0, 100.0, 0.1),
            1.0,
            "",
        ));

    // General filter
    layout
        .add(ParameterSpec::choice(
            GENERAL_FILTER_MODE,
            GENERAL_FILTER_MODE_CHOICES,
            0,
        ))
        .add(ParameterSpec::float(
            GENERAL_FILTER_FREQ,
            NormalisableRange::linear(20.0, 20000.0, 1.0),
            750.0,
            "Hz",
        ))
        .add(ParameterSpec::float(
            GENERAL_FILTER_QUALITY,
            NormalisableRange::linear(0.1, 10.0, 0.05),
            1.0,
            "",
        ))
        .add(ParameterSpec::float(
            GENERAL_FILTER_GAIN,
            NormalisableRange::linear(-24.0, 24.0, 0.5),
            0.0,
            "dB",
        ));

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_layout_declares_every_parameter_once() {
        let layout = create_parameter_layout();
        assert_eq!(layout.len(), 19);

        let names: HashSet<_> = layout.specs().iter().map(|s| s.name).collect();
        assert_eq!(names.len(), layout.len());
        assert!(names.contains("Phaser Rate Hz"));
        assert!(names.contains("Ladder Filter Mode"));
    }

    #[test]
    fn test_declared_defaults_lie_in_range() {
        for spec in create_parameter_layout().specs() {
            match &spec.kind {
                ParameterKind::Float { range, default, .. } => {
                    assert!(range.contains(*default), "{} default out of range", spec.name)
                }
                ParameterKind::Choice { choices, default } => {
                    assert!(*default < choices.len())
                }
            }
        }
    }

    #[test]
    fn test_float_default_is_clamped() {
        let spec = ParameterSpec::float("x", NormalisableRange::linear(0.0, 1.0, 0.1), 5.0, "");
        match spec.kind {
            ParameterKind::Float { default, .. } => assert_eq!(default, 1.0),
            _ => panic!("expected float"),
        }
    }
}
