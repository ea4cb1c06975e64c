//! Voltage sources.

use serde::{Deserialize, Serialize};

/// Largest EMF accepted for a battery, in volts.
pub const MAX_VOLTAGE: f64 = 1e6;

/// A battery component.
///
/// Modeled as an ideal EMF in series with its internal resistance (Thevenin
/// form). The EMF rises from terminal 0 (negative) to terminal 1 (positive),
/// so current leaves the battery through terminal 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    /// Open-circuit voltage in volts
    pub voltage: f64,
    /// Series internal resistance in ohms
    pub internal_resistance: f64,
}

impl Battery {
    /// Create a new battery.
    pub fn new(voltage: f64, internal_resistance: f64) -> Self {
        Self {
            voltage,
            internal_resistance,
        }
    }

    /// Terminal voltage while delivering `current` amps.
    pub fn terminal_voltage(&self, current: f64) -> f64 {
        self.voltage - current * self.internal_resistance
    }

    /// Power dissipated inside the battery at `current` amps.
    pub fn internal_loss(&self, current: f64) -> f64 {
        current * current * self.internal_resistance
    }

    /// Append range violations for this battery to `errors`.
    pub fn check(&self, id: &str, errors: &mut Vec<String>) {
        if !self.voltage.is_finite() {
            errors.push(format!("Battery '{id}' voltage must be finite"));
        } else if self.voltage < 0.0 {
            errors.push(format!("Battery '{id}' voltage must be non-negative"));
        } else if self.voltage > MAX_VOLTAGE {
            errors.push(format!("Battery '{id}' voltage must not exceed {MAX_VOLTAGE} V"));
        }
        super::check_resistance(id, "internal resistance", self.internal_resistance, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_voltage_sags_under_load() {
        let b = Battery::new(12.0, 0.5);
        assert!((b.terminal_voltage(2.0) - 11.0).abs() < 1e-12);
        assert!((b.internal_loss(2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_battery_ranges() {
        let mut errors = Vec::new();
        Battery::new(-1.0, 0.0).check("b1", &mut errors);
        Battery::new(f64::INFINITY, -2.0).check("b2", &mut errors);
        assert_eq!(
            errors,
            vec![
                "Battery 'b1' voltage must be non-negative",
                "Battery 'b2' voltage must be finite",
                "Component 'b2' internal resistance must be non-negative",
            ]
        );
    }
}
