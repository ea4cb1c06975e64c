//! CircuitLab - DC circuit engine
//!
//! Loads a circuit saved as JSON into a state manager, which validates every
//! component and connection, and prints the solve result.
//!
//! # Usage
//!
//! ```bash
//! circuitlab circuit.json            # full solve result as JSON
//! circuitlab circuit.json --summary  # short text report
//! RUST_LOG=debug circuitlab circuit.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use circuitlab_core::{
    circuit::CircuitInput,
    error::{CircuitError, Result},
    solver::{SolveResult, SolverConfig, DEFAULT_TOLERANCE, SHORT_CIRCUIT_EPSILON},
    state::{EngineConfig, StateManager},
};

/// Solve a DC circuit described as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit file ({ "components": [...], "connections": [...] })
    #[arg(value_name = "CIRCUIT_JSON")]
    circuit_file: PathBuf,

    /// Print a short text report instead of JSON
    #[arg(long)]
    summary: bool,

    /// KCL/KVL tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Resistance below which a path counts as a short, in ohms
    #[arg(long, default_value_t = SHORT_CIRCUIT_EPSILON)]
    short_circuit_epsilon: f64,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&args) {
        for message in err.messages() {
            eprintln!("error: {message}");
        }
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let text = std::fs::read_to_string(&args.circuit_file).map_err(|source| {
        CircuitError::FileRead {
            path: args.circuit_file.display().to_string(),
            source,
        }
    })?;
    let circuit = CircuitInput::from_json(&text)?;

    let solver = SolverConfig::new()
        .with_tolerance(args.tolerance)
        .with_short_circuit_epsilon(args.short_circuit_epsilon);
    let mut state = StateManager::with_config(EngineConfig::new().with_solver(solver));

    let result = state.load_circuit(circuit)?;
    if args.summary {
        print_summary(result);
    } else {
        println!("{}", serde_json::to_string_pretty(result)?);
    }
    Ok(())
}

fn print_summary(result: &SolveResult) {
    println!("Voltage:     {:.4} V", result.total_voltage);
    println!("Current:     {:.6} A", result.total_current);
    println!("Resistance:  {:.4} ohm", result.total_resistance);
    println!("Power:       {:.4} W", result.total_power);
    println!("Efficiency:  {:.1} %", result.power.efficiency * 100.0);
    println!(
        "KCL: {}  KVL: {}  Short circuit: {}",
        if result.kcl_valid { "ok" } else { "violated" },
        if result.kvl_valid { "ok" } else { "violated" },
        if result.is_short_circuit { "yes" } else { "no" },
    );

    for c in &result.components {
        print!(
            "  {:<12} {:<8} {:>10.4} V {:>10.6} A {:>10.4} W",
            c.id.as_str(),
            c.kind.as_str(),
            c.voltage,
            c.current,
            c.power
        );
        if let Some(brightness) = c.brightness {
            print!("  brightness {:.0}%", brightness * 100.0);
        }
        println!();
    }

    for error in &result.errors {
        println!("error: {error}");
    }
    for warning in &result.warnings {
        println!("warning: {warning}");
    }
}
