//! DC circuit solver.
//!
//! This module derives currents, voltages and power from the circuit graph.
//!
//! ## Method
//!
//! Each connected subgraph that contains a battery is solved on its own:
//!
//! 1. Batteries whose terminals are joined by a path of ideal conductors are
//!    shorted (found by contracting wires and closed switches).
//! 2. The network is reduced with series/parallel rules to a single loop,
//!    giving total EMF, internal resistance and equivalent resistance, and
//!    from those the total current `I = EMF / (R_internal + R_equivalent)`.
//!    Batteries in parallel merge into their Thevenin equivalent. Networks
//!    that still do not reduce (bridges) report their totals as seen from
//!    the terminals of the battery with the largest EMF.
//! 3. Per-component current and voltage are back-propagated with a modified
//!    nodal analysis of the same subgraph, which applies Ohm's law and the
//!    current divider to every branch, including bridges the reduction cannot
//!    collapse.
//! 4. KCL is checked at every node and KVL around every fundamental loop.
//!
//! The nodal system is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ B'  D ] [ j ] = [ e ]
//! ```
//! with G the conductance matrix, B the incidence of source and ideal
//! conductor branches, D the (negated) source internal resistances, v the
//! node potentials, j the branch currents and e the branch EMFs.

mod analysis;
mod mna;
mod reduction;
mod result;

pub use analysis::{Solver, SolverConfig};
pub use mna::{solve_subgraph, MnaMatrix, NodalSolution};
pub use reduction::{reduce, Branch, ReducedLoop};
pub use result::{ComponentPower, ComponentResult, PowerAnalysis, SolveResult};

/// Default KCL/KVL tolerance, absolute or relative to the largest term.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Resistance below which a component or network counts as a short, in ohms.
pub const SHORT_CIRCUIT_EPSILON: f64 = 1e-6;
