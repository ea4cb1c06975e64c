//! Validated, undoable editing of a circuit.
//!
//! [`StateManager`] owns the live component and connection collections. Every
//! mutation is validated first and either rejected as a whole or applied as
//! a single history step, after which the circuit is solved again and the
//! result cached.
//!
//! ```
//! use circuitlab_core::circuit::Connection;
//! use circuitlab_core::components::Component;
//! use circuitlab_core::state::StateManager;
//!
//! let mut state = StateManager::new();
//! state.add_component(Component::battery("b1", 12.0, 0.001)).unwrap();
//! state.add_component(Component::resistor("r1", 100.0)).unwrap();
//! state.add_connection(Connection::between("c1", "b1", 1, "r1", 0)).unwrap();
//! let result = state.add_connection(Connection::between("c2", "r1", 1, "b1", 0)).unwrap();
//! assert!((result.total_current - 0.12).abs() < 1e-3);
//!
//! state.undo();
//! assert_eq!(state.connections().len(), 1);
//! ```

mod config;
mod history;
mod settings;

pub use config::{EngineConfig, DEFAULT_VOLTAGE};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use settings::{Theme, UiSettings, MAX_ZOOM, MIN_ZOOM};

use serde::Serialize;

use crate::circuit::{
    validate_component, validate_connection, Circuit, ComponentId, Connection, ConnectionId, Point,
    ValidationReport,
};
use crate::components::{Component, Properties};
use crate::error::{CircuitError, Result};
use crate::solver::{SolveResult, Solver};

/// Callback invoked with the new solve result after every state change.
pub type Listener = Box<dyn FnMut(&SolveResult)>;

/// Borrowed view of the live state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CircuitState<'a> {
    pub components: &'a [Component],
    pub connections: &'a [Connection],
    pub result: &'a SolveResult,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Owner of the live circuit, its history and its latest solve result.
pub struct StateManager {
    config: EngineConfig,
    solver: Solver,
    circuit: Circuit,
    history: History,
    result: SolveResult,
    settings: UiSettings,
    last_error: Option<String>,
    validation_errors: Vec<String>,
    listener: Option<Listener>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    /// Create an empty state manager with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty state manager with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let solver = Solver::with_config(config.solver);
        let circuit = Circuit::new();
        let result = solver.solve(&circuit);
        Self {
            config,
            solver,
            circuit,
            history: History::new(config.history_limit),
            result,
            settings: UiSettings::default(),
            last_error: None,
            validation_errors: Vec::new(),
            listener: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ============ Queries ============

    /// Borrowed view of components, connections, result and history flags.
    pub fn state(&self) -> CircuitState<'_> {
        CircuitState {
            components: &self.circuit.components,
            connections: &self.circuit.connections,
            result: &self.result,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn components(&self) -> &[Component] {
        &self.circuit.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.circuit.connections
    }

    pub fn solve_result(&self) -> &SolveResult {
        &self.result
    }

    /// Every finding of the most recently rejected mutation.
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// First finding of the most recently rejected mutation.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
        self.validation_errors.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Physical validity of the live circuit (short circuits, KCL, KVL).
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::from_solve(&self.result)
    }

    // ============ Mutations ============

    /// Add a component.
    pub fn add_component(&mut self, component: Component) -> Result<&SolveResult> {
        let checked = self.check_component(&component).and_then(|()| {
            if self.circuit.component(&component.id).is_some() {
                Err(CircuitError::DuplicateComponent {
                    id: component.id.to_string(),
                })
            } else {
                Ok(())
            }
        });
        self.guard(checked)?;

        let mut next = self.circuit.clone();
        tracing::info!(component = %component.id, kind = %component.kind(), "component added");
        next.components.push(component);
        Ok(self.commit(next))
    }

    /// Remove a component and every connection attached to it.
    pub fn remove_component(&mut self, id: &str) -> Result<&SolveResult> {
        let id = ComponentId::new(id);
        let index = self.component_index(&id);
        let index = self.guard(index)?;

        tracing::info!(
            component = %id,
            connections = self.circuit.connections_of(&id).count(),
            "component removed"
        );
        let mut next = self.circuit.clone();
        next.components.remove(index);
        next.connections.retain(|c| !c.touches(&id));
        Ok(self.commit(next))
    }

    /// Replace the component with the same id.
    pub fn update_component(&mut self, component: Component) -> Result<&SolveResult> {
        let index = self
            .component_index(&component.id)
            .and_then(|i| self.check_component(&component).map(|()| i));
        let index = self.guard(index)?;

        let mut next = self.circuit.clone();
        tracing::info!(component = %component.id, "component updated");
        next.components[index] = component;
        Ok(self.commit(next))
    }

    /// Move a component to a new position.
    pub fn move_component(&mut self, id: &str, position: Point) -> Result<&SolveResult> {
        let id = ComponentId::new(id);
        let index = self.component_index(&id).and_then(|i| {
            if position.is_finite() {
                Ok(i)
            } else {
                Err(CircuitError::structural(vec![format!(
                    "Component '{id}' position must be finite"
                )]))
            }
        });
        let index = self.guard(index)?;

        let mut next = self.circuit.clone();
        next.components[index].position = position;
        tracing::info!(component = %id, x = position.x, y = position.y, "component moved");
        Ok(self.commit(next))
    }

    /// Open a closed switch or close an open one.
    pub fn toggle_switch(&mut self, id: &str) -> Result<&SolveResult> {
        let id = ComponentId::new(id);
        let index = self.component_index(&id).and_then(|i| {
            match self.circuit.components[i].properties {
                Properties::Switch(_) => Ok(i),
                _ => Err(CircuitError::invalid_property(
                    id.as_str(),
                    "closed",
                    "component is not a switch",
                )),
            }
        });
        let index = self.guard(index)?;

        let mut next = self.circuit.clone();
        if let Properties::Switch(switch) = &mut next.components[index].properties {
            switch.toggle();
            tracing::info!(component = %id, closed = switch.closed, "switch toggled");
        }
        Ok(self.commit(next))
    }

    /// Add a connection between two existing terminals.
    pub fn add_connection(&mut self, connection: Connection) -> Result<&SolveResult> {
        let checked = self.check_connection(&connection, &self.circuit);
        self.guard(checked)?;

        let mut next = self.circuit.clone();
        tracing::info!(
            connection = %connection.id,
            from = %connection.from,
            to = %connection.to,
            "connection added"
        );
        next.connections.push(connection);
        Ok(self.commit(next))
    }

    /// Remove a connection.
    pub fn remove_connection(&mut self, id: &str) -> Result<&SolveResult> {
        let id = ConnectionId::new(id);
        let index = self
            .circuit
            .connection_index(&id)
            .ok_or_else(|| CircuitError::ConnectionNotFound { id: id.to_string() });
        let index = self.guard(index)?;

        let mut next = self.circuit.clone();
        next.connections.remove(index);
        tracing::info!(connection = %id, "connection removed");
        Ok(self.commit(next))
    }

    /// Empty the circuit as one undoable step.
    pub fn reset_circuit(&mut self) -> &SolveResult {
        tracing::info!("circuit reset");
        self.commit(Circuit::new())
    }

    /// Replace the whole circuit as one undoable step.
    ///
    /// Every component and connection is validated first; all findings are
    /// reported together and nothing is applied if any fails.
    pub fn load_circuit(&mut self, circuit: Circuit) -> Result<&SolveResult> {
        let mut errors = Vec::new();
        let mut staged = Circuit::new();
        for component in &circuit.components {
            errors.extend(validate_component(component).errors);
            if staged.component(&component.id).is_some() {
                errors.push(format!("Duplicate component id '{}'", component.id));
            } else {
                staged.components.push(component.clone());
            }
        }
        for connection in &circuit.connections {
            match self.check_connection(connection, &staged) {
                Ok(()) => staged.connections.push(connection.clone()),
                Err(err) => errors.extend(err.messages()),
            }
        }
        let checked = if errors.is_empty() {
            Ok(())
        } else {
            Err(CircuitError::structural(errors))
        };
        self.guard(checked)?;

        tracing::info!(
            components = circuit.components.len(),
            connections = circuit.connections.len(),
            "circuit loaded"
        );
        Ok(self.commit(circuit))
    }

    // ============ History ============

    /// Restore the state before the last mutation. No-op when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> CircuitState<'_> {
        match self.history.undo(&mut self.circuit) {
            Ok(()) => {
                tracing::info!(remaining = self.history.undo_depth(), "undo");
                self.refresh();
            }
            Err(err) => tracing::debug!("{err}"),
        }
        self.state()
    }

    /// Re-apply the last undone mutation. No-op when there is nothing to redo.
    pub fn redo(&mut self) -> CircuitState<'_> {
        match self.history.redo(&mut self.circuit) {
            Ok(()) => {
                tracing::info!(remaining = self.history.redo_depth(), "redo");
                self.refresh();
            }
            Err(err) => tracing::debug!("{err}"),
        }
        self.state()
    }

    /// Forget all history without touching the live state.
    pub fn clear_history(&mut self) -> CircuitState<'_> {
        self.history.clear();
        tracing::info!("history cleared");
        self.state()
    }

    // ============ Settings ============

    pub fn settings(&self) -> &UiSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut UiSettings {
        &mut self.settings
    }

    pub fn is_simulating(&self) -> bool {
        self.settings.simulating
    }

    pub fn set_simulating(&mut self, simulating: bool) {
        self.settings.simulating = simulating;
    }

    /// Voltage offered to newly placed batteries.
    pub fn default_voltage(&self) -> f64 {
        self.config.default_voltage
    }

    /// A battery with the configured default voltage and no internal resistance.
    pub fn default_battery(&self, id: impl Into<String>) -> Component {
        Component::battery(id, self.config.default_voltage, 0.0)
    }

    /// Reject a mutation that failed before reaching the manager, such as
    /// malformed editor input, and hand the error back.
    ///
    /// The live state is untouched; `last_error` and `validation_errors`
    /// report the failure exactly as for a rejected edit.
    pub fn reject(&mut self, err: CircuitError) -> CircuitError {
        let messages = err.messages();
        tracing::info!(error = %err, "mutation rejected");
        self.last_error = messages.first().cloned();
        self.validation_errors = messages;
        err
    }

    /// Register the callback invoked after every state change.
    pub fn set_listener(&mut self, listener: impl FnMut(&SolveResult) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    // ============ Internals ============

    fn component_index(&self, id: &ComponentId) -> Result<usize> {
        self.circuit
            .component_index(id)
            .ok_or_else(|| CircuitError::ComponentNotFound { id: id.to_string() })
    }

    fn check_component(&self, component: &Component) -> Result<()> {
        validate_component(component).into_result()
    }

    /// Validate `connection` against `circuit`, including uniqueness.
    fn check_connection(&self, connection: &Connection, circuit: &Circuit) -> Result<()> {
        validate_connection(connection, circuit).into_result()?;
        if circuit.connection(&connection.id).is_some() {
            return Err(CircuitError::DuplicateConnection {
                id: connection.id.to_string(),
            });
        }
        if let Some(existing) = circuit
            .connections
            .iter()
            .find(|c| c.joins_same_terminals(connection))
        {
            return Err(CircuitError::structural(vec![format!(
                "Connection '{}' duplicates '{}' between {} and {}",
                connection.id, existing.id, connection.from, connection.to
            )]));
        }
        Ok(())
    }

    /// Record a rejection: surface its messages and pass the error on.
    fn guard<T>(&mut self, checked: Result<T>) -> Result<T> {
        checked.map_err(|err| self.reject(err))
    }

    /// Apply an accepted mutation as one history step.
    fn commit(&mut self, next: Circuit) -> &SolveResult {
        let previous = std::mem::replace(&mut self.circuit, next);
        self.history.record(previous);
        self.last_error = None;
        self.validation_errors.clear();
        self.refresh();
        &self.result
    }

    /// Solve the live circuit and notify the listener.
    fn refresh(&mut self) {
        self.result = self.solver.solve(&self.circuit);
        if self.result.is_short_circuit {
            tracing::warn!(errors = ?self.result.errors, "live circuit is shorted");
        }
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.result);
        }
    }
}
