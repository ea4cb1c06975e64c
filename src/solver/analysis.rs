//! Solver entry point.

use crate::circuit::{Circuit, NodeId};
use crate::components::{Battery, Element, Properties};
use crate::topology::{Subgraph, Topology};

use super::mna::{solve_subgraph, NodalSolution};
use super::reduction::{reduce, Branch};
use super::result::{ComponentPower, ComponentResult, PowerAnalysis, SolveResult};
use super::{DEFAULT_TOLERANCE, SHORT_CIRCUIT_EPSILON};

/// Configuration for the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// KCL/KVL tolerance, absolute or relative to the largest term.
    pub tolerance: f64,
    /// Resistance below which a path counts as a short, in ohms.
    pub short_circuit_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            short_circuit_epsilon: SHORT_CIRCUIT_EPSILON,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the KCL/KVL tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the short-circuit threshold (in ohms).
    ///
    /// Also the floor applied to battery internal resistance when a short
    /// would otherwise make the current infinite.
    pub fn with_short_circuit_epsilon(mut self, epsilon: f64) -> Self {
        self.short_circuit_epsilon = epsilon;
        self
    }
}

/// Lumped quantities of one powered subgraph.
#[derive(Debug, Clone, Copy)]
struct SubgraphTotals {
    voltage: f64,
    current: f64,
    resistance: f64,
    equivalent: f64,
    internal: f64,
    power: f64,
}

/// Everything learned about one powered subgraph.
struct SubgraphOutcome {
    solution: NodalSolution,
    totals: SubgraphTotals,
    /// Resistance actually used for each source edge (index into edges)
    source_resistance: Vec<(usize, f64)>,
    short_messages: Vec<String>,
    best_effort: bool,
}

/// The DC circuit solver.
///
/// Solving is a pure function of the circuit: the solver holds only its
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve a circuit.
    pub fn solve(&self, circuit: &Circuit) -> SolveResult {
        let topology = Topology::analyze(circuit);
        self.solve_topology(circuit, &topology)
    }

    /// Solve a circuit whose topology has already been analyzed.
    pub fn solve_topology(&self, circuit: &Circuit, topology: &Topology) -> SolveResult {
        let _span = tracing::debug_span!(
            "solve",
            components = circuit.components.len(),
            nodes = topology.num_nodes
        )
        .entered();

        let eps = self.config.short_circuit_epsilon;
        let elements: Vec<Element> = circuit
            .components
            .iter()
            .map(|c| c.element(eps))
            .collect();

        let mut result = SolveResult {
            warnings: connectivity_warnings(circuit, topology),
            ..SolveResult::default()
        };

        let mut currents = vec![0.0; topology.edges.len()];
        let mut potentials = vec![0.0; topology.num_nodes];
        let mut used_resistance = vec![0.0; topology.edges.len()];
        let mut best_effort_edge = vec![false; topology.edges.len()];
        let mut totals = Vec::new();

        for subgraph in topology.subgraphs.iter().filter(|sg| sg.has_source) {
            let outcome = self.solve_powered(circuit, topology, subgraph, &elements);
            for &n in &subgraph.nodes {
                potentials[n.0] = outcome.solution.potentials[n.0];
            }
            for &ei in &subgraph.edges {
                currents[ei] = outcome.solution.currents[ei];
                best_effort_edge[ei] = outcome.best_effort;
            }
            for &(ei, r) in &outcome.source_resistance {
                used_resistance[ei] = r;
            }
            if !outcome.short_messages.is_empty() {
                result.is_short_circuit = true;
                result.errors.extend(outcome.short_messages);
            }
            result.best_effort |= outcome.best_effort;
            totals.push(outcome.totals);
        }

        apply_totals(&mut result, &totals);

        // Voltage drop t0 -> t1 of every edge
        let drops: Vec<f64> = topology
            .edges
            .iter()
            .enumerate()
            .map(|(ei, e)| match elements[e.component] {
                Element::Source { emf, .. } => {
                    -Battery::new(emf, used_resistance[ei]).terminal_voltage(currents[ei])
                }
                Element::Resistance(r) => currents[ei] * r,
                Element::Conductor => 0.0,
                Element::Open => potentials[e.nodes[0].0] - potentials[e.nodes[1].0],
            })
            .collect();

        self.check_kirchhoff(circuit, topology, &currents, &drops, &mut result);

        // Per-component results and power balance
        let mut power = PowerAnalysis::default();
        for (ci, component) in circuit.components.iter().enumerate() {
            let mut entry = ComponentResult::idle(component.id.clone(), component.kind());
            if let Some(ei) = topology.edge_of(ci) {
                let current = currents[ei];
                match elements[ci] {
                    Element::Source { emf, .. } => {
                        entry.voltage = -drops[ei];
                        entry.power = emf * current;
                        power.generated += entry.power;
                        power.internal_loss +=
                            Battery::new(emf, used_resistance[ei]).internal_loss(current);
                    }
                    _ => {
                        entry.voltage = drops[ei];
                        entry.power = drops[ei] * current;
                        power.consumed += entry.power;
                    }
                }
                entry.current = current;
                entry.best_effort = best_effort_edge[ei];
            }
            if let Properties::Bulb(bulb) = &component.properties {
                entry.brightness = Some(bulb.brightness(entry.power));
            }
            power.components.push(ComponentPower {
                id: component.id.clone(),
                power: entry.power,
            });
            result.components.push(entry);
        }
        power.efficiency = if power.generated > 0.0 {
            power.consumed / power.generated
        } else {
            0.0
        };
        result.power = power;

        tracing::debug!(
            current = result.total_current,
            voltage = result.total_voltage,
            short = result.is_short_circuit,
            errors = result.errors.len(),
            "solve complete"
        );
        result
    }

    fn solve_powered(
        &self,
        circuit: &Circuit,
        topology: &Topology,
        subgraph: &Subgraph,
        elements: &[Element],
    ) -> SubgraphOutcome {
        let eps = self.config.short_circuit_epsilon;

        // Batteries bridged by ideal conductors
        let groups = topology.contract(|ei| elements[topology.edges[ei].component] == Element::Conductor);
        let mut short_messages: Vec<String> = subgraph
            .edges
            .iter()
            .map(|&ei| topology.edges[ei])
            .filter(|e| {
                elements[e.component].is_source() && groups[e.nodes[0].0] == groups[e.nodes[1].0]
            })
            .map(|e| {
                format!(
                    "Short circuit: battery '{}' is connected across a zero-resistance path",
                    circuit.components[e.component].id
                )
            })
            .collect();

        let mut best_effort = !short_messages.is_empty();
        let mut floor = if best_effort { eps } else { 0.0 };

        let solution = match solve_subgraph(topology, subgraph, elements, floor) {
            Ok(solution) => solution,
            Err(err) => {
                tracing::warn!(%err, "ideal sources conflict, flooring internal resistance");
                floor = eps;
                best_effort = true;
                solve_subgraph(topology, subgraph, elements, floor).unwrap_or_else(|err| {
                    tracing::warn!(%err, "subgraph left unsolved");
                    NodalSolution::empty(topology.num_nodes, topology.edges.len())
                })
            }
        };

        let mut branches = Vec::with_capacity(subgraph.edges.len());
        let mut source_resistance = Vec::new();
        // Source with the largest EMF: (edge, |EMF|, internal resistance used)
        let mut principal: Option<(usize, f64, f64)> = None;
        let mut load_power = 0.0;
        for &ei in &subgraph.edges {
            let e = &topology.edges[ei];
            let (a, b) = (e.nodes[0].0, e.nodes[1].0);
            match elements[e.component] {
                Element::Source {
                    emf,
                    internal_resistance,
                } => {
                    let r = internal_resistance.max(floor);
                    branches.push(Branch::source(a, b, emf, r));
                    source_resistance.push((ei, r));
                    if principal.map_or(true, |(_, strongest, _)| emf.abs() > strongest) {
                        principal = Some((ei, emf.abs(), r));
                    }
                }
                Element::Resistance(r) => {
                    let current = solution.currents[ei];
                    load_power += current * current * r;
                    branches.push(Branch::passive(a, b, r));
                }
                Element::Conductor => branches.push(Branch::passive(a, b, 0.0)),
                Element::Open => {}
            }
        }

        let totals = match reduce(branches) {
            Some(reduced) => {
                if reduced.equivalent < eps && short_messages.is_empty() {
                    short_messages.push(format!(
                        "Short circuit: equivalent resistance {:.3e} ohms is below {eps:e} ohms",
                        reduced.equivalent
                    ));
                    best_effort = true;
                }
                let voltage = reduced.emf.abs();
                let resistance = reduced.total_resistance();
                let current = voltage / resistance.max(eps);
                SubgraphTotals {
                    voltage,
                    current,
                    resistance,
                    equivalent: reduced.equivalent,
                    internal: reduced.internal,
                    power: voltage * current,
                }
            }
            None => {
                tracing::debug!(
                    nodes = subgraph.nodes.len(),
                    edges = subgraph.edges.len(),
                    "network is not series-parallel, using nodal totals"
                );
                port_totals(topology, &solution, principal, load_power)
            }
        };

        for message in &short_messages {
            tracing::warn!("{message}");
        }

        SubgraphOutcome {
            solution,
            totals,
            source_resistance,
            short_messages,
            best_effort,
        }
    }

    fn check_kirchhoff(
        &self,
        circuit: &Circuit,
        topology: &Topology,
        currents: &[f64],
        drops: &[f64],
        result: &mut SolveResult,
    ) {
        let tol = self.config.tolerance;

        for (n, residual) in topology.node_residuals(currents).iter().enumerate() {
            if !residual.within(tol) {
                result.kcl_valid = false;
                result.errors.push(format!(
                    "KCL violated at node {}: net current {:.3e} A",
                    NodeId(n),
                    residual.sum
                ));
            }
        }

        for (l, residual) in topology.loop_residuals(drops).iter().enumerate() {
            if !residual.within(tol) {
                result.kvl_valid = false;
                let path: Vec<&str> = topology.loops[l]
                    .branches
                    .iter()
                    .map(|b| circuit.components[topology.edges[b.edge].component].id.as_str())
                    .collect();
                result.errors.push(format!(
                    "KVL violated around loop {} ({}): residual {:.3e} V",
                    l,
                    path.join(" -> "),
                    residual.sum
                ));
            }
        }
    }
}

fn connectivity_warnings(circuit: &Circuit, topology: &Topology) -> Vec<String> {
    let isolated = topology
        .isolated
        .iter()
        .map(|&ci| format!("Component '{}' is not connected", circuit.components[ci].id));
    let dangling = topology.dangling.iter().map(|&(ci, t)| {
        format!(
            "Component '{}' terminal {} is not connected",
            circuit.components[ci].id, t
        )
    });
    isolated.chain(dangling).collect()
}

/// Totals of an irreducible subgraph, seen from the terminals of its
/// principal source.
///
/// The port voltage is the potential across those terminals and the port
/// current is the one that delivers the power dissipated in the passive
/// network at that voltage. The equivalent resistance is their ratio, and
/// the loop closes through the principal source's internal resistance.
/// With a single source this is exactly its EMF, current and loop
/// resistance.
fn port_totals(
    topology: &Topology,
    solution: &NodalSolution,
    principal: Option<(usize, f64, f64)>,
    load_power: f64,
) -> SubgraphTotals {
    let (port_voltage, internal) = match principal {
        Some((ei, _, r)) => {
            let e = &topology.edges[ei];
            let v = solution.potentials[e.nodes[1].0] - solution.potentials[e.nodes[0].0];
            (v.abs(), r)
        }
        None => (0.0, 0.0),
    };
    let current = if port_voltage > 0.0 {
        load_power / port_voltage
    } else {
        0.0
    };
    let equivalent = if current > 0.0 {
        port_voltage / current
    } else {
        f64::INFINITY
    };
    let voltage = port_voltage + current * internal;
    SubgraphTotals {
        voltage,
        current,
        resistance: equivalent + internal,
        equivalent,
        internal,
        power: voltage * current,
    }
}

fn apply_totals(result: &mut SolveResult, totals: &[SubgraphTotals]) {
    match totals {
        [] => {}
        [only] => {
            result.total_voltage = only.voltage;
            result.total_current = only.current;
            result.total_resistance = only.resistance;
            result.equivalent_resistance = only.equivalent;
            result.internal_resistance = only.internal;
            result.total_power = only.power;
        }
        many => {
            let voltage: f64 = many.iter().map(|t| t.voltage).sum();
            let current: f64 = many.iter().map(|t| t.current).sum();
            let internal: f64 = many.iter().map(|t| t.internal).sum();
            let resistance = if current > 0.0 {
                voltage / current
            } else {
                f64::INFINITY
            };
            result.total_voltage = voltage;
            result.total_current = current;
            result.total_resistance = resistance;
            result.equivalent_resistance = (resistance - internal).max(0.0);
            result.internal_resistance = internal;
            result.total_power = many.iter().map(|t| t.power).sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Connection;
    use crate::components::Component;
    use approx::assert_relative_eq;

    fn lamp_circuit() -> Circuit {
        Circuit::from_parts(
            vec![
                Component::battery("b1", 12.0, 0.001),
                Component::resistor("r1", 100.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "r1", 0),
                Connection::between("c2", "r1", 1, "b1", 0),
            ],
        )
    }

    #[test]
    fn test_series_loop() {
        let result = Solver::new().solve(&lamp_circuit());
        let expected = 12.0 / 100.001;
        assert_relative_eq!(result.total_current, expected, max_relative = 1e-9);
        assert_relative_eq!(result.total_voltage, 12.0);
        assert_relative_eq!(result.total_resistance, 100.001, max_relative = 1e-12);
        assert_relative_eq!(result.total_power, 12.0 * expected, max_relative = 1e-9);
        assert!(result.kcl_valid && result.kvl_valid);
        assert!(!result.is_short_circuit);
        assert!(result.errors.is_empty());

        let r1 = result.component("r1").unwrap();
        assert_relative_eq!(r1.current, expected, max_relative = 1e-9);
        assert_relative_eq!(r1.voltage, 100.0 * expected, max_relative = 1e-9);

        let b1 = result.component("b1").unwrap();
        assert_relative_eq!(b1.current, expected, max_relative = 1e-9);
        assert_relative_eq!(b1.voltage, 12.0 - 0.001 * expected, max_relative = 1e-9);
    }

    #[test]
    fn test_current_divider() {
        // 10 V, 10 ohm in series with 30 || 60
        let circuit = Circuit::from_parts(
            vec![
                Component::battery("b1", 10.0, 0.0),
                Component::resistor("r1", 10.0),
                Component::resistor("r2", 30.0),
                Component::resistor("r3", 60.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "r1", 0),
                Connection::between("c2", "r1", 1, "r2", 0),
                Connection::between("c3", "r1", 1, "r3", 0),
                Connection::between("c4", "r2", 1, "b1", 0),
                Connection::between("c5", "r3", 1, "b1", 0),
            ],
        );
        let result = Solver::new().solve(&circuit);
        assert_relative_eq!(result.equivalent_resistance, 30.0, max_relative = 1e-12);
        assert_relative_eq!(result.total_current, 1.0 / 3.0, max_relative = 1e-9);

        let i2 = result.component("r2").unwrap().current;
        let i3 = result.component("r3").unwrap().current;
        assert_relative_eq!(i2, 2.0 / 9.0, max_relative = 1e-9);
        assert_relative_eq!(i3, 1.0 / 9.0, max_relative = 1e-9);
        assert!(result.kcl_valid && result.kvl_valid);
        assert_relative_eq!(result.power.efficiency, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_bridge_uses_nodal_totals() {
        // Balanced Wheatstone bridge: no current through the middle resistor
        let circuit = Circuit::from_parts(
            vec![
                Component::battery("b1", 10.0, 0.0),
                Component::resistor("ra", 10.0),
                Component::resistor("rb", 10.0),
                Component::resistor("rc", 10.0),
                Component::resistor("rd", 10.0),
                Component::resistor("rm", 50.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "ra", 0),
                Connection::between("c2", "b1", 1, "rb", 0),
                Connection::between("c3", "ra", 1, "rc", 0),
                Connection::between("c4", "rb", 1, "rd", 0),
                Connection::between("c5", "rc", 1, "b1", 0),
                Connection::between("c6", "rd", 1, "b1", 0),
                Connection::between("c7", "ra", 1, "rm", 0),
                Connection::between("c8", "rm", 1, "rb", 1),
            ],
        );
        let result = Solver::new().solve(&circuit);
        assert_relative_eq!(result.total_current, 1.0, max_relative = 1e-9);
        assert_relative_eq!(result.total_resistance, 10.0, max_relative = 1e-9);
        assert!(result.component("rm").unwrap().current.abs() < 1e-9);
        assert!(result.kcl_valid && result.kvl_valid);
    }

    fn parallel_batteries(r_internal: f64) -> Circuit {
        Circuit::from_parts(
            vec![
                Component::battery("b1", 9.0, r_internal),
                Component::battery("b2", 6.0, r_internal),
                Component::resistor("r1", 10.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "r1", 0),
                Connection::between("c2", "b2", 1, "r1", 0),
                Connection::between("c3", "r1", 1, "b1", 0),
                Connection::between("c4", "r1", 1, "b2", 0),
            ],
        )
    }

    #[test]
    fn test_parallel_batteries_totals_describe_the_load() {
        let result = Solver::new().solve(&parallel_batteries(0.5));
        let load_voltage = 300.0 / 41.0;
        let load_current = 30.0 / 41.0;

        assert_relative_eq!(result.total_current, load_current, max_relative = 1e-9);
        assert_relative_eq!(result.total_voltage, 7.5, max_relative = 1e-9);
        assert_relative_eq!(result.internal_resistance, 0.25, max_relative = 1e-9);
        assert_relative_eq!(result.equivalent_resistance, 10.0, max_relative = 1e-9);
        assert!(!result.best_effort && !result.is_short_circuit);
        assert!(result.kcl_valid && result.kvl_valid);

        let r1 = result.component("r1").unwrap();
        assert_relative_eq!(r1.voltage, load_voltage, max_relative = 1e-9);
        assert_relative_eq!(r1.current, load_current, max_relative = 1e-9);
        // The weaker battery is being charged
        let b2 = result.component("b2").unwrap();
        assert_relative_eq!(b2.current, (6.0 - load_voltage) / 0.5, max_relative = 1e-9);
    }

    #[test]
    fn test_ideal_parallel_batteries_fall_back_to_floor() {
        let result = Solver::new().solve(&parallel_batteries(0.0));
        assert!(result.best_effort);
        assert!(!result.is_short_circuit);
        assert!(result.component("b1").unwrap().best_effort);

        // Both floored sources meet halfway
        assert_relative_eq!(result.total_current, 0.75, max_relative = 1e-6);
        let r1 = result.component("r1").unwrap();
        assert_relative_eq!(r1.current, 0.75, max_relative = 1e-6);
        assert!(result.total_current.is_finite());
    }

    #[test]
    fn test_irreducible_totals_match_the_load_power() {
        // Bridge with a second source in the middle branch
        let circuit = Circuit::from_parts(
            vec![
                Component::battery("b1", 12.0, 0.2),
                Component::resistor("ra", 10.0),
                Component::resistor("rb", 20.0),
                Component::resistor("rc", 30.0),
                Component::resistor("rd", 40.0),
                Component::battery("b2", 3.0, 1.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "ra", 0),
                Connection::between("c2", "b1", 1, "rb", 0),
                Connection::between("c3", "ra", 1, "rc", 0),
                Connection::between("c4", "rb", 1, "rd", 0),
                Connection::between("c5", "rc", 1, "b1", 0),
                Connection::between("c6", "rd", 1, "b1", 0),
                Connection::between("c7", "ra", 1, "b2", 0),
                Connection::between("c8", "b2", 1, "rb", 1),
            ],
        );
        let result = Solver::new().solve(&circuit);
        assert!(result.kcl_valid && result.kvl_valid);

        let b1 = result.component("b1").unwrap();
        let load: f64 = ["ra", "rb", "rc", "rd"]
            .iter()
            .map(|id| result.component(id).unwrap().power)
            .sum();
        // Seen from b1's terminals: V * I is the power the resistors dissipate
        assert_relative_eq!(result.total_current * b1.voltage, load, max_relative = 1e-9);
        assert_relative_eq!(result.internal_resistance, 0.2, max_relative = 1e-12);
        assert_relative_eq!(
            result.total_voltage,
            b1.voltage + result.total_current * 0.2,
            max_relative = 1e-9
        );
        assert!(result.total_voltage < 15.0);
    }

    #[test]
    fn test_short_circuit_is_flagged() {
        let circuit = Circuit::from_parts(
            vec![Component::battery("b1", 12.0, 0.0), Component::wire("w1")],
            vec![
                Connection::between("c1", "b1", 1, "w1", 0),
                Connection::between("c2", "w1", 1, "b1", 0),
            ],
        );
        let result = Solver::new().solve(&circuit);
        assert!(result.is_short_circuit);
        assert!(result.best_effort);
        assert!(result.errors[0].starts_with("Short circuit"));
        assert!(result.total_current.is_finite());
        let b1 = result.component("b1").unwrap();
        assert_relative_eq!(b1.current, 12.0 / SHORT_CIRCUIT_EPSILON, max_relative = 1e-6);
        assert!(b1.best_effort);
    }

    #[test]
    fn test_open_switch_stops_current() {
        let mut circuit = lamp_circuit();
        circuit.components.push(Component::switch("s1", false));
        circuit.connections[1] = Connection::between("c2", "r1", 1, "s1", 0);
        circuit
            .connections
            .push(Connection::between("c3", "s1", 1, "b1", 0));

        let result = Solver::new().solve(&circuit);
        assert!(result.total_current.abs() < 1e-12);
        assert!(result.total_resistance > 1e9);
        assert!(result.component("r1").unwrap().current.abs() < 1e-9);
        assert!(result.kcl_valid && result.kvl_valid);
        assert_eq!(result.power.efficiency, 0.0);
    }

    #[test]
    fn test_bulb_brightness() {
        let circuit = Circuit::from_parts(
            vec![
                Component::battery("b1", 6.0, 0.0),
                Component::bulb("l1", 12.0, 6.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "l1", 0),
                Connection::between("c2", "l1", 1, "b1", 0),
            ],
        );
        let result = Solver::new().solve(&circuit);
        let l1 = result.component("l1").unwrap();
        assert_relative_eq!(l1.power, 3.0, max_relative = 1e-9);
        assert_relative_eq!(l1.brightness.unwrap(), 0.5, max_relative = 1e-9);
    }

    #[test]
    fn test_disconnected_circuits_add_up() {
        let circuit = Circuit::from_parts(
            vec![
                Component::battery("b1", 10.0, 0.0),
                Component::resistor("r1", 10.0),
                Component::battery("b2", 5.0, 0.0),
                Component::resistor("r2", 5.0),
                Component::resistor("spare", 1.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "r1", 0),
                Connection::between("c2", "r1", 1, "b1", 0),
                Connection::between("c3", "b2", 1, "r2", 0),
                Connection::between("c4", "r2", 1, "b2", 0),
            ],
        );
        let result = Solver::new().solve(&circuit);
        assert_relative_eq!(result.total_voltage, 15.0);
        assert_relative_eq!(result.total_current, 2.0, max_relative = 1e-9);
        assert_relative_eq!(result.total_power, 15.0, max_relative = 1e-9);
        assert_eq!(result.warnings, vec!["Component 'spare' is not connected"]);
    }

    #[test]
    fn test_empty_circuit() {
        let result = Solver::new().solve(&Circuit::new());
        assert_eq!(result.total_current, 0.0);
        assert!(result.errors.is_empty());
        assert!(result.components.is_empty());
    }
}
