//! Audio Engine Module
//!
//! Core audio processing engine including:
//! - Audio buffer management
//! - The Order Channel between control and audio threads
//! - The block pipeline driver and its control handle
//! - State snapshots, offline rendering and WAV I/O

pub mod buffer;
pub mod channel;
mod controller;
pub mod io;
mod offline;
mod processor;
mod state;

pub use buffer::{
    calculate_peak, calculate_rms, linear_to_db, AudioBuffer, ChannelLayout,
    DEFAULT_SAMPLE_RATE, MIN_SAMPLE_RATE,
};
pub use channel::{order_channel, OrderReceiver, OrderSender, DEFAULT_ORDER_CAPACITY};
pub use controller::ProcessorController;
pub use io::{export_wav, generate_test_tone, import_wav};
pub use offline::render_offline;
pub use processor::MultiFxProcessor;
pub use state::{ProcessorState, STATE_VERSION};
