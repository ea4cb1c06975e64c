//! Circuit validation.
//!
//! Three entry points with the same contract: a validity flag plus the
//! findings in detection order, identical for identical input.
//!
//! - [`validate_component`] checks a component on its own;
//! - [`validate_connection`] checks a connection against a circuit;
//! - [`validate_circuit`] solves the circuit and reports physical violations.

use serde::Serialize;

use crate::components::Component;
use crate::error::{CircuitError, Result};
use crate::solver::{SolveResult, Solver, SolverConfig};

use super::{Circuit, Connection};

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Findings that make the subject invalid, in detection order
    pub errors: Vec<String>,
    /// Findings worth showing that do not affect validity
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Physical violations of an existing solve result.
    pub fn from_solve(result: &SolveResult) -> Self {
        Self {
            valid: result.errors.is_empty(),
            errors: result.errors.clone(),
            warnings: result.warnings.clone(),
        }
    }

    /// The first error, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    /// Convert into a `Result`, carrying every error on failure.
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(CircuitError::structural(self.errors))
        }
    }
}

/// Validate a single component.
///
/// Checks, in order: non-empty id, finite position, terminal count, finite
/// and distinct terminal offsets, then the kind's property ranges.
pub fn validate_component(component: &Component) -> ValidationReport {
    let mut errors = Vec::new();
    let id = component.id.as_str();

    if id.trim().is_empty() {
        errors.push("Component id must not be empty".to_string());
    }

    if !component.position.is_finite() {
        errors.push(format!("Component '{id}' position must be finite"));
    }

    let kind = component.kind();
    if component.terminal_count() != kind.terminal_count() {
        errors.push(format!(
            "Component '{id}' ({kind}) must have {} terminals, found {}",
            kind.terminal_count(),
            component.terminal_count()
        ));
    }

    for (i, t) in component.terminals.iter().enumerate() {
        if !t.is_finite() {
            errors.push(format!("Component '{id}' terminal {i} offset must be finite"));
        }
    }

    for (i, a) in component.terminals.iter().enumerate() {
        for (j, b) in component.terminals.iter().enumerate().skip(i + 1) {
            if a.is_finite() && a == b {
                errors.push(format!(
                    "Component '{id}' terminals {i} and {j} share the same offset"
                ));
            }
        }
    }

    component.check_properties(&mut errors);

    ValidationReport::from_errors(errors)
}

/// Validate a connection against the components of `circuit`.
///
/// Checks, in order: non-empty id, both endpoints exist, both terminal
/// indices are in range, and the connection does not join a terminal to
/// itself.
pub fn validate_connection(connection: &Connection, circuit: &Circuit) -> ValidationReport {
    let mut errors = Vec::new();
    let id = connection.id.as_str();

    if id.trim().is_empty() {
        errors.push("Connection id must not be empty".to_string());
    }

    let from = circuit.component(&connection.from.component);
    let to = circuit.component(&connection.to.component);

    if from.is_none() {
        errors.push(format!(
            "Connection '{id}' references unknown source component '{}'",
            connection.from.component
        ));
    }
    if to.is_none() {
        errors.push(format!(
            "Connection '{id}' references unknown destination component '{}'",
            connection.to.component
        ));
    }

    for (end, component) in [(&connection.from, from), (&connection.to, to)] {
        if let Some(c) = component {
            if end.terminal >= c.terminal_count() {
                errors.push(format!(
                    "Connection '{id}' references terminal {} of '{}', which has {} terminals",
                    end.terminal,
                    c.id,
                    c.terminal_count()
                ));
            }
        }
    }

    if connection.is_self_loop() {
        errors.push(format!(
            "Connection '{id}' joins {} to itself",
            connection.from
        ));
    }

    ValidationReport::from_errors(errors)
}

/// Solve `circuit` and report its physical violations.
///
/// Errors are short circuits, then KCL residuals, then KVL residuals;
/// warnings are unconnected components and terminals.
pub fn validate_circuit(circuit: &Circuit, config: &SolverConfig) -> ValidationReport {
    let result = Solver::with_config(*config).solve(circuit);
    ValidationReport::from_solve(&result)
}
