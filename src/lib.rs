//! # CircuitLab Core
//!
//! The circuit engine behind an interactive electricity simulator.
//!
//! This library provides:
//! - A typed graph model of components (batteries, resistors, bulbs,
//!   switches, wires) and terminal-to-terminal connections
//! - Topology analysis: electrical nodes, subgraphs and independent loops
//! - A DC solver combining series/parallel reduction with nodal analysis,
//!   checking KCL and KVL and flagging short circuits
//! - A state manager with validation-gated edits and bounded undo/redo
//!
//! ## Architecture
//!
//! - [`circuit`] - Identifiers, connections, the circuit collections and the validator
//! - [`components`] - Component kinds and their property records
//! - [`topology`] - Node partition, subgraphs and fundamental loops
//! - [`solver`] - Network reduction, nodal solve and the solve result
//! - [`state`] - Editing session: mutations, history, UI settings
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! circuitlab circuit.json --summary
//! ```
//!
//! ### Library
//!
//! ```
//! use circuitlab_core::{Circuit, Solver};
//! use circuitlab_core::circuit::Connection;
//! use circuitlab_core::components::Component;
//!
//! let circuit = Circuit::from_parts(
//!     vec![Component::battery("b1", 9.0, 0.0), Component::bulb("l1", 90.0, 1.0)],
//!     vec![
//!         Connection::between("c1", "b1", 1, "l1", 0),
//!         Connection::between("c2", "l1", 1, "b1", 0),
//!     ],
//! );
//! let result = Solver::new().solve(&circuit);
//! assert!((result.total_current - 0.1).abs() < 1e-9);
//! assert!(result.kcl_valid && result.kvl_valid);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmCircuitSim } from 'circuitlab_core';
//!
//! const sim = new WasmCircuitSim();
//! const result = JSON.parse(sim.add_component(JSON.stringify(battery)));
//! ```

pub mod circuit;
pub mod components;
pub mod error;
pub mod solver;
pub mod state;
pub mod topology;

// Re-export main types for convenience
pub use circuit::{Circuit, Connection};
pub use components::{Component, ComponentKind};
pub use error::{CircuitError, Result};
pub use solver::{SolveResult, Solver, SolverConfig};
pub use state::{EngineConfig, StateManager};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuitSim;
