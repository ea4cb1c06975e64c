//! Circuit graph representation and validation.
//!
//! This module provides the authoritative model of a circuit: components
//! placed on a canvas and connections between their terminals. The
//! [`Circuit`] struct holds both collections in insertion order; electrical
//! nodes are never stored but derived by [`crate::topology`] on every solve.

mod graph;
mod input;
mod types;
mod validate;

pub use graph::{Circuit, Connection};
pub use input::{CircuitInput, ComponentInput};
pub use types::*;
pub use validate::{validate_circuit, validate_component, validate_connection, ValidationReport};
