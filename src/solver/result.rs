//! Solve results handed to the presentation layer.

use serde::Serialize;

use crate::circuit::ComponentId;
use crate::components::ComponentKind;

/// Electrical state of one component after a solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentResult {
    pub id: ComponentId,
    pub kind: ComponentKind,
    /// Voltage drop from terminal 0 to terminal 1 for passive components;
    /// terminal voltage for batteries
    pub voltage: f64,
    /// Current from terminal 0 to terminal 1 through the component; for
    /// batteries, current delivered out of terminal 1
    pub current: f64,
    /// Power generated (batteries) or dissipated (everything else), in watts
    pub power: f64,
    /// Bulb brightness in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    /// Values are an approximation (short circuit or degenerate sources)
    pub best_effort: bool,
}

impl ComponentResult {
    /// A component carrying no current.
    pub fn idle(id: ComponentId, kind: ComponentKind) -> Self {
        Self {
            id,
            kind,
            voltage: 0.0,
            current: 0.0,
            power: 0.0,
            brightness: if kind == ComponentKind::Bulb {
                Some(0.0)
            } else {
                None
            },
            best_effort: false,
        }
    }
}

/// Power attributed to one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentPower {
    pub id: ComponentId,
    pub power: f64,
}

/// Energy balance of the whole circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PowerAnalysis {
    /// Power delivered by all sources (EMF x current)
    pub generated: f64,
    /// Power dissipated in passive components
    pub consumed: f64,
    /// Power dissipated in source internal resistance
    pub internal_loss: f64,
    /// `consumed / generated`, 0 when nothing is generated
    pub efficiency: f64,
    /// Per-component power, in circuit order
    pub components: Vec<ComponentPower>,
}

/// Derived electrical quantities for a whole circuit.
///
/// A solve result is a value: it is replaced wholesale after every change
/// and never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub total_current: f64,
    pub total_voltage: f64,
    /// Internal plus equivalent resistance; infinite when no current can flow
    pub total_resistance: f64,
    /// Equivalent resistance of the passive network seen by the sources
    pub equivalent_resistance: f64,
    /// Sum of source internal resistances
    pub internal_resistance: f64,
    pub total_power: f64,
    pub is_short_circuit: bool,
    /// Totals are approximations rather than exact physical values
    pub best_effort: bool,
    pub kcl_valid: bool,
    pub kvl_valid: bool,
    /// Physical violations, in detection order
    pub errors: Vec<String>,
    /// Non-fatal findings such as unconnected components
    pub warnings: Vec<String>,
    pub components: Vec<ComponentResult>,
    pub power: PowerAnalysis,
}

impl Default for SolveResult {
    fn default() -> Self {
        Self {
            total_current: 0.0,
            total_voltage: 0.0,
            total_resistance: f64::INFINITY,
            equivalent_resistance: f64::INFINITY,
            internal_resistance: 0.0,
            total_power: 0.0,
            is_short_circuit: false,
            best_effort: false,
            kcl_valid: true,
            kvl_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            components: Vec::new(),
            power: PowerAnalysis::default(),
        }
    }
}

impl SolveResult {
    /// No physical violations were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Result for a component by id.
    pub fn component(&self, id: &str) -> Option<&ComponentResult> {
        self.components.iter().find(|c| c.id.as_str() == id)
    }
}
