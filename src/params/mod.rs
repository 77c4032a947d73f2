//! Parameters
//!
//! Declarations, ranges and the lock-free store that effect units read from.

pub mod layout;
mod range;
mod store;

pub use layout::{create_parameter_layout, ParameterKind, ParameterLayout, ParameterSpec};
pub use range::NormalisableRange;
pub use store::{ChoiceHandle, FloatHandle, Parameter, ParameterSnapshot, ParameterStore};
