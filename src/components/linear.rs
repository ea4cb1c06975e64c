//! Linear passive components: Resistor and Bulb.

use serde::{Deserialize, Serialize};

/// A resistor component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resistor {
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(resistance: f64) -> Self {
        Self { resistance }
    }

    /// Append range violations for this resistor to `errors`.
    pub fn check(&self, id: &str, errors: &mut Vec<String>) {
        super::check_resistance(id, "resistance", self.resistance, errors);
    }
}

/// A light bulb.
///
/// Electrically a fixed resistor. The rated power only drives the
/// brightness reported to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bulb {
    /// Filament resistance in ohms
    pub resistance: f64,
    /// Power at which the bulb reaches full brightness, in watts
    pub rated_power: f64,
}

impl Bulb {
    /// Create a new bulb.
    pub fn new(resistance: f64, rated_power: f64) -> Self {
        Self {
            resistance,
            rated_power,
        }
    }

    /// Brightness in `[0, 1]` when dissipating `power` watts.
    pub fn brightness(&self, power: f64) -> f64 {
        if self.rated_power <= 0.0 || !power.is_finite() {
            return 0.0;
        }
        (power / self.rated_power).clamp(0.0, 1.0)
    }

    /// Append range violations for this bulb to `errors`.
    pub fn check(&self, id: &str, errors: &mut Vec<String>) {
        super::check_resistance(id, "resistance", self.resistance, errors);
        if !self.rated_power.is_finite() || self.rated_power <= 0.0 {
            errors.push(format!("Bulb '{id}' rated power must be positive and finite"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulb_brightness_saturates() {
        let bulb = Bulb::new(10.0, 2.0);
        assert!((bulb.brightness(1.0) - 0.5).abs() < 1e-12);
        assert_eq!(bulb.brightness(5.0), 1.0);
        assert_eq!(bulb.brightness(-1.0), 0.0);
    }

    #[test]
    fn test_negative_resistance_rejected() {
        let mut errors = Vec::new();
        Resistor::new(-5.0).check("r1", &mut errors);
        assert_eq!(errors, vec!["Component 'r1' resistance must be non-negative"]);
    }

    #[test]
    fn test_bulb_requires_rating() {
        let mut errors = Vec::new();
        Bulb::new(10.0, 0.0).check("l1", &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
