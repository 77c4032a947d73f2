//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

use super::{ProcessArgs, StateArgs};
use crate::config::ProcessorConfig;
use crate::dsp::DspOrder;
use crate::engine::{
    calculate_peak, export_wav, import_wav, linear_to_db, render_offline, ChannelLayout,
    MultiFxProcessor, ProcessorController, ProcessorState,
};
use crate::params::{Parameter, ParameterKind, ParameterStore};

/// Render a WAV file through the effect chain.
pub fn process(args: &ProcessArgs) -> Result<()> {
    info!("Processing {} -> {}", args.input.display(), args.output.display());

    let mut buffer = import_wav(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut config = match &args.config {
        Some(path) => ProcessorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ProcessorConfig::default(),
    };
    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    let Some(layout) = ChannelLayout::from_count(buffer.num_channels()) else {
        bail!("{} channels are not supported", buffer.num_channels());
    };
    let config = config.for_input(buffer.sample_rate, layout);

    let (mut processor, mut controller) = MultiFxProcessor::new(&config)?;

    if let Some(path) = &args.state {
        let state = load_state(path)
            .with_context(|| format!("failed to load state {}", path.display()))?;
        if !controller.restore_state(&state)? {
            bail!("order channel rejected the saved order");
        }
    }
    apply_overrides(&mut controller, args.order.as_deref(), &args.set)?;

    let input_peak = calculate_peak(&buffer);
    render_offline(&mut processor, &mut buffer, config.block_size)?;
    info!("Active order: {}", processor.active_order());

    export_wav(&buffer, &args.output, args.bit_depth)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Rendered {} frames at {} Hz: peak {:.1} dBFS -> {:.1} dBFS",
        buffer.num_samples(),
        buffer.sample_rate,
        linear_to_db(input_peak),
        linear_to_db(calculate_peak(&buffer))
    );
    Ok(())
}

/// List every parameter with its range, default and unit.
pub fn list_params() -> Result<()> {
    let store = ParameterStore::with_default_layout()?;

    println!(
        "{:<26} {:<7} {:<34} {:>10}",
        "Parameter", "Type", "Range", "Default"
    );
    println!("{:-<80}", "");
    for param in store.iter() {
        println!("{}", param_row(param));
    }
    Ok(())
}

/// Print or write a state snapshot built from defaults plus overrides.
pub fn state(args: &StateArgs) -> Result<()> {
    let (_processor, mut controller) = MultiFxProcessor::new(&ProcessorConfig::default())?;
    apply_overrides(&mut controller, args.order.as_deref(), &args.set)?;

    let json = controller.capture_state().to_json()?;
    match &args.output {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("failed to write {}", path.display()))?;
            info!("State written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn apply_overrides(
    controller: &mut ProcessorController,
    order: Option<&str>,
    assignments: &[String],
) -> Result<()> {
    for assignment in assignments {
        let (name, value) = parse_assignment(assignment)?;
        let stored = set_parameter(controller, name, value)?;
        info!("{} = {}", name, stored);
    }

    if let Some(order) = order {
        let order: DspOrder = order
            .parse()
            .with_context(|| format!("invalid order '{order}'"))?;
        if !controller.request_order(order) {
            bail!("order channel rejected {order}");
        }
    }
    Ok(())
}

fn param_row(param: &Parameter) -> String {
    let range = match param.kind() {
        ParameterKind::Float { range, unit, .. } => {
            format!("{} .. {} {}", range.start, range.end, unit)
        }
        ParameterKind::Choice { choices, .. } => choices.join(" | "),
    };
    format!(
        "{:<26} {:<7} {:<34} {:>10}",
        param.name(),
        param.kind().type_name(),
        range,
        param.display()
    )
}

/// Split "Name=value" at the first '='
fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("expected NAME=VALUE, got '{assignment}'"),
    }
}

/// Numeric values are written directly; anything else is a choice label.
fn set_parameter(controller: &ProcessorController, name: &str, value: &str) -> Result<f32> {
    if let Ok(number) = value.parse::<f32>() {
        return Ok(controller.set_parameter(name, number)?);
    }
    let index = controller
        .set_choice(name, value)
        .with_context(|| format!("cannot set '{name}' to '{value}'"))?;
    Ok(index as f32)
}

/// Load a state snapshot file
pub fn load_state(path: &Path) -> Result<ProcessorState> {
    Ok(ProcessorState::load(path)?)
}
