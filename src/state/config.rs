//! Engine configuration.

use crate::solver::SolverConfig;

use super::history::DEFAULT_HISTORY_LIMIT;

/// Battery voltage offered to newly placed batteries, in volts.
pub const DEFAULT_VOLTAGE: f64 = 9.0;

/// Configuration for a [`StateManager`](super::StateManager).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Maximum number of undo steps kept
    pub history_limit: usize,
    /// Voltage given to batteries created with
    /// [`StateManager::default_battery`](super::StateManager::default_battery)
    pub default_voltage: f64,
    pub solver: SolverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_voltage: DEFAULT_VOLTAGE,
            solver: SolverConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of undo steps kept (at least one).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn with_default_voltage(mut self, voltage: f64) -> Self {
        self.default_voltage = voltage;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}
