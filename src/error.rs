//! Error handling for MultiFx
//!
//! Only non-real-time paths return errors: parameter binding at construction,
//! order validation, configuration, state restore and file I/O. The audio
//! thread never returns an error; invariant violations there are assertions.

use thiserror::Error;

/// Result type alias for MultiFx operations
pub type Result<T> = std::result::Result<T, MultiFxError>;

/// Main error type for MultiFx operations
#[derive(Error, Debug)]
pub enum MultiFxError {
    // Parameter Errors
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Parameter '{name}' is not a {expected} parameter")]
    ParameterKindMismatch { name: String, expected: &'static str },

    #[error("Parameter '{name}' is declared more than once")]
    DuplicateParameter { name: String },

    #[error("Invalid choice '{label}' for parameter '{name}'")]
    InvalidChoice { name: String, label: String },

    // Ordering Errors
    #[error("Unknown effect: {name}")]
    UnknownEffect { name: String },

    #[error("Effect {kind} appears more than once in the processing order")]
    DuplicateEffect { kind: String },

    #[error("Processing order has {count} slots (maximum {max})")]
    TooManySlots { count: usize, max: usize },

    #[error("Rack slot {slot} expects {expected} but holds {found}")]
    RackMismatch {
        slot: usize,
        expected: String,
        found: String,
    },

    // Configuration Errors
    #[error("Unsupported channel layout: {inputs} in, {outputs} out")]
    UnsupportedLayout { inputs: usize, outputs: usize },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // Audio Errors
    #[error("Invalid audio: {reason}")]
    InvalidAudio { reason: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MultiFxError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MultiFxError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            MultiFxError::ParameterKindMismatch { .. } => "PARAMETER_KIND_MISMATCH",
            MultiFxError::DuplicateParameter { .. } => "DUPLICATE_PARAMETER",
            MultiFxError::InvalidChoice { .. } => "INVALID_CHOICE",
            MultiFxError::UnknownEffect { .. } => "UNKNOWN_EFFECT",
            MultiFxError::DuplicateEffect { .. } => "DUPLICATE_EFFECT",
            MultiFxError::TooManySlots { .. } => "TOO_MANY_SLOTS",
            MultiFxError::RackMismatch { .. } => "RACK_MISMATCH",
            MultiFxError::UnsupportedLayout { .. } => "UNSUPPORTED_LAYOUT",
            MultiFxError::InvalidConfig { .. } => "INVALID_CONFIG",
            MultiFxError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            MultiFxError::InvalidAudio { .. } => "INVALID_AUDIO",
            MultiFxError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            MultiFxError::Io(_) => "IO_ERROR",
            MultiFxError::Wav(_) => "WAV_ERROR",
            MultiFxError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Binding and wiring errors are defects in how the processor was put
    /// together; retrying cannot fix them.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MultiFxError::UnknownParameter { .. }
            | MultiFxError::ParameterKindMismatch { .. }
            | MultiFxError::DuplicateParameter { .. }
            | MultiFxError::RackMismatch { .. } => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MultiFxError::UnknownParameter {
            name: "Phaser Rate".to_string(),
        };
        assert_eq!(err.error_code(), "UNKNOWN_PARAMETER");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_order_errors_are_recoverable() {
        let err = MultiFxError::DuplicateEffect {
            kind: "Chorus".to_string(),
        };
        assert_eq!(err.error_code(), "DUPLICATE_EFFECT");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("Chorus"));
    }
}
