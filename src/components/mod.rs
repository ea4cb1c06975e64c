//! Component models for the circuit graph.
//!
//! This module provides the typed component record and every supported kind:
//! - Sources: Battery
//! - Linear: Resistor, Bulb
//! - Controls: Switch
//! - Wire (no properties)
//!
//! Each kind carries exactly the properties it needs as a tagged variant of
//! [`Properties`]; loosely-typed property maps coming from an editor are
//! converted with [`Component::from_parts`].

mod controls;
mod linear;
mod sources;

pub use controls::Switch;
pub use linear::{Bulb, Resistor};
pub use sources::{Battery, MAX_VOLTAGE};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Point};
use crate::error::{CircuitError, Result};

/// Largest resistance accepted for any component, in ohms.
pub const MAX_RESISTANCE: f64 = 1e12;

/// Local terminal offsets given to a component when none are supplied.
pub const DEFAULT_TERMINALS: [Point; 2] = [Point::new(-20.0, 0.0), Point::new(20.0, 0.0)];

/// Supported component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Battery,
    Resistor,
    Bulb,
    Switch,
    Wire,
}

impl ComponentKind {
    /// All kinds, in declaration order.
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Battery,
        ComponentKind::Resistor,
        ComponentKind::Bulb,
        ComponentKind::Switch,
        ComponentKind::Wire,
    ];

    /// Lowercase name used in messages and serialized data.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Battery => "battery",
            ComponentKind::Resistor => "resistor",
            ComponentKind::Bulb => "bulb",
            ComponentKind::Switch => "switch",
            ComponentKind::Wire => "wire",
        }
    }

    /// Number of terminals a component of this kind must have.
    pub fn terminal_count(&self) -> usize {
        2
    }

    /// Names of the properties this kind requires.
    pub fn required_properties(&self) -> &'static [&'static str] {
        match self {
            ComponentKind::Battery => &["voltage", "internal_resistance"],
            ComponentKind::Resistor => &["resistance"],
            ComponentKind::Bulb => &["resistance", "rated_power"],
            ComponentKind::Switch => &["closed"],
            ComponentKind::Wire => &[],
        }
    }

    /// True for kinds that drive current around the circuit.
    pub fn is_source(&self) -> bool {
        matches!(self, ComponentKind::Battery)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CircuitError::InvalidKind {
                kind: s.to_string(),
            })
    }
}

/// A loosely-typed property value as produced by an editor form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Number(_) => None,
        }
    }
}

/// Kind-specific properties, one variant per [`ComponentKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Properties {
    Battery(Battery),
    Resistor(Resistor),
    Bulb(Bulb),
    Switch(Switch),
    Wire,
}

impl Properties {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Properties::Battery(_) => ComponentKind::Battery,
            Properties::Resistor(_) => ComponentKind::Resistor,
            Properties::Bulb(_) => ComponentKind::Bulb,
            Properties::Switch(_) => ComponentKind::Switch,
            Properties::Wire => ComponentKind::Wire,
        }
    }
}

/// How a component behaves electrically, as seen by topology and solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    /// EMF rising from terminal 0 to terminal 1, with series resistance
    Source { emf: f64, internal_resistance: f64 },
    /// Linear resistance in ohms (at or above the ideal-conductor threshold)
    Resistance(f64),
    /// Zero-resistance conductor: wire, closed switch, near-zero resistor
    Conductor,
    /// No conduction: open switch
    Open,
}

impl Element {
    pub fn is_source(&self) -> bool {
        matches!(self, Element::Source { .. })
    }
}

/// A circuit component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    /// Position of the component origin in editor coordinates
    pub position: Point,
    /// Terminal offsets relative to `position`, indexed by terminal number
    pub terminals: Vec<Point>,
    #[serde(flatten)]
    pub properties: Properties,
}

impl Component {
    /// Create a component at the origin with default terminals.
    pub fn new(id: impl Into<String>, properties: Properties) -> Self {
        Self {
            id: ComponentId::new(id),
            position: Point::default(),
            terminals: DEFAULT_TERMINALS.to_vec(),
            properties,
        }
    }

    /// Create a battery.
    pub fn battery(id: impl Into<String>, voltage: f64, internal_resistance: f64) -> Self {
        Self::new(id, Properties::Battery(Battery::new(voltage, internal_resistance)))
    }

    /// Create a resistor.
    pub fn resistor(id: impl Into<String>, resistance: f64) -> Self {
        Self::new(id, Properties::Resistor(Resistor::new(resistance)))
    }

    /// Create a bulb.
    pub fn bulb(id: impl Into<String>, resistance: f64, rated_power: f64) -> Self {
        Self::new(id, Properties::Bulb(Bulb::new(resistance, rated_power)))
    }

    /// Create a switch.
    pub fn switch(id: impl Into<String>, closed: bool) -> Self {
        Self::new(id, Properties::Switch(Switch::new(closed)))
    }

    /// Create a wire.
    pub fn wire(id: impl Into<String>) -> Self {
        Self::new(id, Properties::Wire)
    }

    /// Place the component at `(x, y)`.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Replace the terminal offsets.
    pub fn with_terminals(mut self, terminals: Vec<Point>) -> Self {
        self.terminals = terminals;
        self
    }

    /// Build a component from an editor's loosely-typed property map.
    ///
    /// Fails with [`CircuitError::InvalidKind`] for an unknown kind,
    /// [`CircuitError::MissingProperty`] when a required property is absent,
    /// and [`CircuitError::InvalidProperty`] when it has the wrong type.
    /// Unknown extra properties are ignored.
    pub fn from_parts(
        id: impl Into<String>,
        kind: &str,
        position: Point,
        terminals: Option<Vec<Point>>,
        properties: &BTreeMap<String, PropertyValue>,
    ) -> Result<Self> {
        let id = id.into();
        let kind: ComponentKind = kind.parse()?;

        let number = |name: &str| -> Result<f64> {
            match properties.get(name) {
                Some(PropertyValue::Number(v)) => Ok(*v),
                Some(PropertyValue::Bool(_)) => {
                    Err(CircuitError::invalid_property(&id, name, "expected a number"))
                }
                None => Err(CircuitError::missing_property(&id, kind.as_str(), name)),
            }
        };
        let flag = |name: &str| -> Result<bool> {
            match properties.get(name) {
                Some(PropertyValue::Bool(b)) => Ok(*b),
                Some(PropertyValue::Number(_)) => {
                    Err(CircuitError::invalid_property(&id, name, "expected true or false"))
                }
                None => Err(CircuitError::missing_property(&id, kind.as_str(), name)),
            }
        };

        let props = match kind {
            ComponentKind::Battery => Properties::Battery(Battery::new(
                number("voltage")?,
                number("internal_resistance")?,
            )),
            ComponentKind::Resistor => Properties::Resistor(Resistor::new(number("resistance")?)),
            ComponentKind::Bulb => {
                Properties::Bulb(Bulb::new(number("resistance")?, number("rated_power")?))
            }
            ComponentKind::Switch => Properties::Switch(Switch::new(flag("closed")?)),
            ComponentKind::Wire => Properties::Wire,
        };

        for name in properties.keys() {
            if !kind.required_properties().contains(&name.as_str()) {
                tracing::debug!(component = %id, property = %name, "ignoring unknown property");
            }
        }

        Ok(Self {
            id: ComponentId(id),
            position,
            terminals: terminals.unwrap_or_else(|| DEFAULT_TERMINALS.to_vec()),
            properties: props,
        })
    }

    /// Get the component kind.
    pub fn kind(&self) -> ComponentKind {
        self.properties.kind()
    }

    /// Get the local offset of terminal `index`.
    pub fn terminal(&self, index: usize) -> Option<Point> {
        self.terminals.get(index).copied()
    }

    /// Absolute position of terminal `index` in editor coordinates.
    pub fn terminal_position(&self, index: usize) -> Option<Point> {
        self.terminal(index)
            .map(|t| Point::new(self.position.x + t.x, self.position.y + t.y))
    }

    /// Number of terminals.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        let number = |v: f64| Some(PropertyValue::Number(v));
        match (&self.properties, name) {
            (Properties::Battery(b), "voltage") => number(b.voltage),
            (Properties::Battery(b), "internal_resistance") => number(b.internal_resistance),
            (Properties::Resistor(r), "resistance") => number(r.resistance),
            (Properties::Bulb(b), "resistance") => number(b.resistance),
            (Properties::Bulb(b), "rated_power") => number(b.rated_power),
            (Properties::Switch(s), "closed") => Some(PropertyValue::Bool(s.closed)),
            _ => None,
        }
    }

    /// Numeric property, or `default` when absent or not a number.
    pub fn number_or(&self, name: &str, default: f64) -> f64 {
        self.property(name)
            .and_then(|v| v.as_number())
            .unwrap_or(default)
    }

    /// Boolean property, or `default` when absent or not a boolean.
    pub fn flag_or(&self, name: &str, default: bool) -> bool {
        self.property(name)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    /// Electrical behavior of this component.
    ///
    /// Resistances below `short_epsilon` are treated as ideal conductors.
    pub fn element(&self, short_epsilon: f64) -> Element {
        let resistance = |r: f64| {
            if r < short_epsilon {
                Element::Conductor
            } else {
                Element::Resistance(r)
            }
        };
        match &self.properties {
            Properties::Battery(b) => Element::Source {
                emf: b.voltage,
                internal_resistance: b.internal_resistance,
            },
            Properties::Resistor(r) => resistance(r.resistance),
            Properties::Bulb(b) => resistance(b.resistance),
            Properties::Switch(s) if s.closed => Element::Conductor,
            Properties::Switch(_) => Element::Open,
            Properties::Wire => Element::Conductor,
        }
    }

    /// Append kind-specific range violations to `errors`.
    pub fn check_properties(&self, errors: &mut Vec<String>) {
        let id = self.id.as_str();
        match &self.properties {
            Properties::Battery(b) => b.check(id, errors),
            Properties::Resistor(r) => r.check(id, errors),
            Properties::Bulb(b) => b.check(id, errors),
            Properties::Switch(_) | Properties::Wire => {}
        }
    }
}

/// Shared range check for resistance-valued properties.
fn check_resistance(id: &str, label: &str, value: f64, errors: &mut Vec<String>) {
    if !value.is_finite() {
        errors.push(format!("Component '{id}' {label} must be finite"));
    } else if value < 0.0 {
        errors.push(format!("Component '{id}' {label} must be non-negative"));
    } else if value > MAX_RESISTANCE {
        errors.push(format!(
            "Component '{id}' {label} must not exceed {MAX_RESISTANCE:e} ohms"
        ));
    }
}
