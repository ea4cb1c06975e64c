//! WASM bindings for CircuitLab Core.
//!
//! This module provides JavaScript-friendly bindings for a browser-based
//! circuit editor. Components and connections travel as JSON in the same
//! shape the serde derives produce.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuitSim } from 'circuitlab_core';
//!
//! await init();
//!
//! const sim = new WasmCircuitSim();
//! sim.add_component(JSON.stringify({
//!   id: "b1", kind: "battery", position: { x: 0, y: 0 },
//!   terminals: [{ x: -20, y: 0 }, { x: 20, y: 0 }],
//!   voltage: 12, internal_resistance: 0.001,
//! }));
//!
//! try {
//!   sim.add_connection(JSON.stringify({
//!     id: "c1",
//!     from: { component: "b1", terminal: 1 },
//!     to: { component: "r1", terminal: 0 },
//!   }));
//! } catch (message) {
//!   showToast(message); // first validation error
//! }
//!
//! const state = JSON.parse(sim.undo());
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{CircuitInput, ComponentInput, Connection, Point};
use crate::error::CircuitError;
use crate::solver::{SolveResult, SolverConfig};
use crate::state::{EngineConfig, StateManager};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: CircuitError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js(e.into()))
}


fn result_json(result: Result<&SolveResult, CircuitError>) -> Result<String, JsValue> {
    result.map_err(to_js).and_then(to_json)
}

/// WASM-compatible circuit editing session.
///
/// Wraps one [`StateManager`]. Mutations return the new solve result as JSON
/// or throw the first validation error; the full list stays available from
/// `validation_errors()`. Input that cannot be parsed is rejected the same
/// way, so `last_error` is set whenever a mutation throws.
#[wasm_bindgen]
pub struct WasmCircuitSim {
    state: StateManager,
}

#[wasm_bindgen]
impl WasmCircuitSim {
    /// Create an empty session with default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCircuitSim {
        WasmCircuitSim {
            state: StateManager::new(),
        }
    }

    /// Create an empty session with custom configuration.
    ///
    /// # Arguments
    /// * `history_limit` - Maximum undo steps (default: 50)
    /// * `tolerance` - KCL/KVL tolerance (default: 1e-6)
    /// * `short_circuit_epsilon` - Short-circuit threshold in ohms (default: 1e-6)
    #[wasm_bindgen]
    pub fn with_config(
        history_limit: usize,
        tolerance: f64,
        short_circuit_epsilon: f64,
    ) -> WasmCircuitSim {
        let solver = SolverConfig::new()
            .with_tolerance(tolerance)
            .with_short_circuit_epsilon(short_circuit_epsilon);
        let config = EngineConfig::new()
            .with_history_limit(history_limit)
            .with_solver(solver);
        WasmCircuitSim {
            state: StateManager::with_config(config),
        }
    }

    // ============ Mutations ============

    #[wasm_bindgen]
    pub fn add_component(&mut self, component_json: &str) -> Result<String, JsValue> {
        let component = self.parsed(ComponentInput::from_json(component_json))?;
        result_json(self.state.add_component(component))
    }

    #[wasm_bindgen]
    pub fn update_component(&mut self, component_json: &str) -> Result<String, JsValue> {
        let component = self.parsed(ComponentInput::from_json(component_json))?;
        result_json(self.state.update_component(component))
    }

    #[wasm_bindgen]
    pub fn remove_component(&mut self, id: &str) -> Result<String, JsValue> {
        result_json(self.state.remove_component(id))
    }

    #[wasm_bindgen]
    pub fn move_component(&mut self, id: &str, x: f64, y: f64) -> Result<String, JsValue> {
        result_json(self.state.move_component(id, Point::new(x, y)))
    }

    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, id: &str) -> Result<String, JsValue> {
        result_json(self.state.toggle_switch(id))
    }

    #[wasm_bindgen]
    pub fn add_connection(&mut self, connection_json: &str) -> Result<String, JsValue> {
        let parsed = serde_json::from_str::<Connection>(connection_json).map_err(CircuitError::from);
        let connection = self.parsed(parsed)?;
        result_json(self.state.add_connection(connection))
    }

    #[wasm_bindgen]
    pub fn remove_connection(&mut self, id: &str) -> Result<String, JsValue> {
        result_json(self.state.remove_connection(id))
    }

    /// Replace the whole circuit (`{ components, connections }`).
    #[wasm_bindgen]
    pub fn load_circuit(&mut self, circuit_json: &str) -> Result<String, JsValue> {
        let circuit = self.parsed(CircuitInput::from_json(circuit_json))?;
        result_json(self.state.load_circuit(circuit))
    }

    #[wasm_bindgen]
    pub fn reset_circuit(&mut self) -> Result<String, JsValue> {
        to_json(self.state.reset_circuit())
    }

    // ============ History ============

    /// Undo the last mutation and return the live state as JSON.
    #[wasm_bindgen]
    pub fn undo(&mut self) -> Result<String, JsValue> {
        to_json(&self.state.undo())
    }

    /// Redo the last undone mutation and return the live state as JSON.
    #[wasm_bindgen]
    pub fn redo(&mut self) -> Result<String, JsValue> {
        to_json(&self.state.redo())
    }

    #[wasm_bindgen]
    pub fn clear_history(&mut self) -> Result<String, JsValue> {
        to_json(&self.state.clear_history())
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    // ============ Queries ============

    /// Components, connections, solve result and history flags as JSON.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<String, JsValue> {
        to_json(&self.state.state())
    }

    #[wasm_bindgen]
    pub fn solve_result(&self) -> Result<String, JsValue> {
        to_json(self.state.solve_result())
    }

    /// Physical validation report of the live circuit as JSON.
    #[wasm_bindgen]
    pub fn validate(&self) -> Result<String, JsValue> {
        to_json(&self.state.validate())
    }

    /// Every finding of the last rejected mutation, as a JSON array.
    #[wasm_bindgen]
    pub fn validation_errors(&self) -> Result<String, JsValue> {
        to_json(self.state.validation_errors())
    }

    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.state.last_error().map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    // ============ Settings ============

    #[wasm_bindgen(getter)]
    pub fn simulating(&self) -> bool {
        self.state.is_simulating()
    }

    #[wasm_bindgen(setter)]
    pub fn set_simulating(&mut self, simulating: bool) {
        self.state.set_simulating(simulating);
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.state.settings().zoom()
    }

    #[wasm_bindgen(setter)]
    pub fn set_zoom(&mut self, zoom: f64) {
        self.state.settings_mut().set_zoom(zoom);
    }

    #[wasm_bindgen]
    pub fn toggle_grid(&mut self) -> bool {
        self.state.settings_mut().toggle_grid();
        self.state.settings().grid_visible
    }

    #[wasm_bindgen]
    pub fn toggle_snap(&mut self) -> bool {
        let settings = self.state.settings_mut();
        settings.snap_to_grid = !settings.snap_to_grid;
        settings.snap_to_grid
    }

    /// Switch theme and return the new one ("light" or "dark").
    #[wasm_bindgen]
    pub fn toggle_theme(&mut self) -> String {
        self.state.settings_mut().toggle_theme();
        self.state.settings().theme.as_str().to_string()
    }

    /// Voltage offered to newly placed batteries.
    #[wasm_bindgen(getter)]
    pub fn default_voltage(&self) -> f64 {
        self.state.default_voltage()
    }
}

impl WasmCircuitSim {
    /// Unwrap parsed input, recording a parse failure as a rejected edit.
    fn parsed<T>(&mut self, input: Result<T, CircuitError>) -> Result<T, JsValue> {
        input.map_err(|err| to_js(self.state.reject(err)))
    }
}

impl Default for WasmCircuitSim {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
