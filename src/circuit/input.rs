//! Loosely-typed circuit input from an editor or a saved file.
//!
//! Editors send components as flat JSON objects whose kind is a string and
//! whose properties sit next to the id and position. Deserializing straight
//! into [`Component`] would turn an unknown kind or a missing property into
//! an opaque parse error, so input is read into these shapes first and then
//! converted with [`Component::from_parts`].

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::{Circuit, Connection, Point};
use crate::components::{Component, ComponentKind, PropertyValue};
use crate::error::{CircuitError, Result};

/// A component as an editor describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentInput {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub terminals: Option<Vec<Point>>,
    /// Every other field, by name
    #[serde(flatten)]
    pub properties: BTreeMap<String, Value>,
}

impl ComponentInput {
    /// Parse a single component from JSON.
    pub fn from_json(json: &str) -> Result<Component> {
        let input: ComponentInput = serde_json::from_str(json)?;
        input.into_component()
    }

    /// Build the typed component.
    ///
    /// Numbers and booleans become properties. Any other value is an error
    /// for a property the kind requires and is ignored otherwise.
    pub fn into_component(self) -> Result<Component> {
        let Self {
            id,
            kind,
            position,
            terminals,
            properties: raw,
        } = self;
        let parsed: ComponentKind = kind.parse()?;

        let mut properties = BTreeMap::new();
        for (name, value) in raw {
            let scalar = match value {
                Value::Bool(b) => Some(PropertyValue::Bool(b)),
                Value::Number(n) => n.as_f64().map(PropertyValue::Number),
                _ => None,
            };
            match scalar {
                Some(v) => {
                    properties.insert(name, v);
                }
                None if parsed.required_properties().contains(&name.as_str()) => {
                    return Err(CircuitError::invalid_property(
                        id,
                        name,
                        "expected a number or true/false",
                    ));
                }
                None => tracing::debug!(component = %id, property = %name, "ignoring non-scalar field"),
            }
        }

        Component::from_parts(id, &kind, position, terminals, &properties)
    }
}

/// A whole circuit as an editor or a saved file describes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CircuitInput {
    #[serde(default)]
    pub components: Vec<ComponentInput>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl CircuitInput {
    /// Parse a circuit from JSON.
    pub fn from_json(json: &str) -> Result<Circuit> {
        let input: CircuitInput = serde_json::from_str(json)?;
        input.into_circuit()
    }

    /// Build every component, reporting all failures together.
    ///
    /// A single failure is returned as is; several are merged into one
    /// structural error in component order.
    pub fn into_circuit(self) -> Result<Circuit> {
        let mut components = Vec::with_capacity(self.components.len());
        let mut failures = Vec::new();
        for input in self.components {
            match input.into_component() {
                Ok(component) => components.push(component),
                Err(err) => failures.push(err),
            }
        }

        match failures.len() {
            0 => Ok(Circuit::from_parts(components, self.connections)),
            1 => Err(failures.remove(0)),
            _ => Err(CircuitError::structural(
                failures.iter().flat_map(CircuitError::messages).collect(),
            )),
        }
    }
}
