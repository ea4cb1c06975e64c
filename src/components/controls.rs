//! Control components: Switch.

use serde::{Deserialize, Serialize};

/// A switch component.
///
/// Modeled as an ideal conductor when closed and as a break in the circuit
/// when open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub closed: bool,
}

impl Switch {
    /// Create a new switch.
    pub fn new(closed: bool) -> Self {
        Self { closed }
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut s = Switch::new(false);
        s.toggle();
        assert!(s.closed);
        s.toggle();
        assert!(!s.closed);
    }
}
