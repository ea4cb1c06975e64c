//! Circuit graph structure.

use serde::{Deserialize, Serialize};

use super::types::{ComponentId, ConnectionId, TerminalRef};
use crate::components::Component;

/// A wire-level link between two component terminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    /// Source endpoint
    pub from: TerminalRef,
    /// Destination endpoint
    pub to: TerminalRef,
}

impl Connection {
    /// Create a connection between `from` and `to`.
    pub fn new(id: impl Into<String>, from: TerminalRef, to: TerminalRef) -> Self {
        Self {
            id: ConnectionId::new(id),
            from,
            to,
        }
    }

    /// Shorthand: connect `from_component.from_terminal` to `to_component.to_terminal`.
    pub fn between(
        id: impl Into<String>,
        from_component: &str,
        from_terminal: usize,
        to_component: &str,
        to_terminal: usize,
    ) -> Self {
        Self::new(
            id,
            TerminalRef::new(from_component, from_terminal),
            TerminalRef::new(to_component, to_terminal),
        )
    }

    /// Check whether either endpoint belongs to `component`.
    pub fn touches(&self, component: &ComponentId) -> bool {
        &self.from.component == component || &self.to.component == component
    }

    /// Both endpoints are the same terminal.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Check whether this connection joins the same terminal pair as `other`,
    /// in either direction.
    pub fn joins_same_terminals(&self, other: &Connection) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

/// A complete circuit: the component and connection collections.
///
/// This is the unit the solver consumes and the value captured by history
/// snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from existing collections.
    pub fn from_parts(components: Vec<Component>, connections: Vec<Connection>) -> Self {
        Self {
            components,
            connections,
        }
    }

    /// Check if the circuit has no components and no connections.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.connections.is_empty()
    }

    /// Find a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    /// Index of a component by id.
    pub fn component_index(&self, id: &ComponentId) -> Option<usize> {
        self.components.iter().position(|c| &c.id == id)
    }

    /// Find a connection by id.
    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    /// Index of a connection by id.
    pub fn connection_index(&self, id: &ConnectionId) -> Option<usize> {
        self.connections.iter().position(|c| &c.id == id)
    }

    /// Connections that reference `component` at either end.
    pub fn connections_of<'a>(
        &'a self,
        component: &'a ComponentId,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.touches(component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_loop_and_duplicates() {
        let a = Connection::between("c1", "r1", 0, "r1", 0);
        assert!(a.is_self_loop());

        let b = Connection::between("c2", "r1", 1, "b1", 0);
        let c = Connection::between("c3", "b1", 0, "r1", 1);
        assert!(!b.is_self_loop());
        assert!(b.joins_same_terminals(&c));
    }

    #[test]
    fn test_lookup() {
        let circuit = Circuit::from_parts(
            vec![Component::resistor("r1", 10.0), Component::wire("w1")],
            vec![Connection::between("c1", "r1", 1, "w1", 0)],
        );
        assert_eq!(circuit.component_index(&"w1".into()), Some(1));
        assert!(circuit.connection(&"c1".into()).is_some());
        assert_eq!(circuit.connections_of(&"r1".into()).count(), 1);
        assert_eq!(circuit.connections_of(&"b1".into()).count(), 0);
    }
}
