//! Nodal matrix assembly and solving.

use crate::components::Element;
use crate::error::{CircuitError, Result};
use crate::topology::{DisjointSet, Subgraph, Topology};

/// MNA matrix system Ax = z.
#[derive(Debug)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    pub lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
}

impl MnaMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp a voltage source with series resistance between two nodes, with
    /// branch current at index br.
    /// V[n+] - V[n-] - R * I = E
    ///
    /// The branch current flows from n+ through the source to n-.
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: f64,
        series_resistance: f64,
    ) {
        if let Some(i) = n_pos {
            self.add(br, i, 1.0);
            self.add(i, br, 1.0);
        }
        if let Some(j) = n_neg {
            self.add(br, j, -1.0);
            self.add(j, br, -1.0);
        }
        if series_resistance != 0.0 {
            self.add(br, br, -series_resistance);
        }
        self.z[br] = voltage;
    }

    /// Perform LU decomposition with partial pivoting.
    pub fn factor(&mut self) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < 1e-15 {
                return Err(CircuitError::SingularMatrix);
            }

            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<()> {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            let diag = self.lu[i * n + i];
            if diag.abs() < 1e-15 {
                return Err(CircuitError::SingularMatrix);
            }
            self.x[i] /= diag;
        }

        Ok(())
    }

    /// Get the voltage at a node (None is the reference node).
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        match node {
            Some(i) => self.x[i],
            None => 0.0,
        }
    }
}

/// Node potentials and edge currents of one solved subgraph.
#[derive(Debug, Clone)]
pub struct NodalSolution {
    /// Potential per topology node relative to its island reference
    pub potentials: Vec<f64>,
    /// Current per topology edge, positive from terminal 0 to terminal 1
    pub currents: Vec<f64>,
}

impl NodalSolution {
    /// All potentials and currents zero.
    pub fn empty(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            potentials: vec![0.0; num_nodes],
            currents: vec![0.0; num_edges],
        }
    }
}

/// Solve one subgraph by modified nodal analysis.
///
/// `elements` is indexed by component. Batteries are Thevenin branches whose
/// internal resistance is raised to at least `source_floor`. Ideal conductors
/// on a spanning forest become 0 V branches; a conductor that would close a
/// loop of ideal conductors carries no current. Open elements are not stamped,
/// so the subgraph may fall apart into conducting islands; each island is
/// referenced to terminal 0 of its first source, or to its lowest node.
///
/// Potentials and currents outside the subgraph are left at zero.
pub fn solve_subgraph(
    topology: &Topology,
    subgraph: &Subgraph,
    elements: &[Element],
    source_floor: f64,
) -> Result<NodalSolution> {
    let mut solution = NodalSolution::empty(topology.num_nodes, topology.edges.len());

    // Conducting islands
    let mut islands = DisjointSet::new(topology.num_nodes);
    for &ei in &subgraph.edges {
        let e = &topology.edges[ei];
        if elements[e.component] != Element::Open {
            islands.union(e.nodes[0].0, e.nodes[1].0);
        }
    }
    let mut reference_of = vec![None; topology.num_nodes];
    for &ei in &subgraph.edges {
        let e = &topology.edges[ei];
        if elements[e.component].is_source() {
            let root = islands.find(e.nodes[0].0);
            if reference_of[root].is_none() {
                reference_of[root] = Some(e.nodes[0]);
            }
        }
    }
    for &n in &subgraph.nodes {
        let root = islands.find(n.0);
        if reference_of[root].is_none() {
            reference_of[root] = Some(n);
        }
    }

    // Matrix row per non-reference node
    let mut row_of = vec![None; topology.num_nodes];
    let mut next_row = 0usize;
    for &n in &subgraph.nodes {
        if reference_of[islands.find(n.0)] != Some(n) {
            row_of[n.0] = Some(next_row);
            next_row += 1;
        }
    }

    // Branch rows: sources and tree conductors
    let mut forest = DisjointSet::new(topology.num_nodes);
    let mut branch_of = vec![None; topology.edges.len()];
    let mut next_branch = next_row;
    for &ei in &subgraph.edges {
        let e = &topology.edges[ei];
        let takes_branch = match elements[e.component] {
            Element::Source { .. } => true,
            Element::Conductor => forest.union(e.nodes[0].0, e.nodes[1].0),
            Element::Resistance(_) | Element::Open => false,
        };
        if takes_branch {
            branch_of[ei] = Some(next_branch);
            next_branch += 1;
        }
    }

    let mut matrix = MnaMatrix::new(next_branch);
    for &ei in &subgraph.edges {
        let e = &topology.edges[ei];
        let n0 = row_of[e.nodes[0].0];
        let n1 = row_of[e.nodes[1].0];
        match elements[e.component] {
            Element::Source {
                emf,
                internal_resistance,
            } => {
                if let Some(br) = branch_of[ei] {
                    let r = internal_resistance.max(source_floor);
                    matrix.stamp_voltage_source(n1, n0, br, emf, r);
                }
            }
            Element::Conductor => {
                if let Some(br) = branch_of[ei] {
                    matrix.stamp_voltage_source(n0, n1, br, 0.0, 0.0);
                }
            }
            Element::Resistance(r) => matrix.stamp_conductance(n0, n1, 1.0 / r),
            Element::Open => {}
        }
    }

    matrix.factor()?;
    matrix.solve()?;

    for &n in &subgraph.nodes {
        solution.potentials[n.0] = matrix.voltage(row_of[n.0]);
    }

    for &ei in &subgraph.edges {
        let e = &topology.edges[ei];
        let v0 = solution.potentials[e.nodes[0].0];
        let v1 = solution.potentials[e.nodes[1].0];
        solution.currents[ei] = match (elements[e.component], branch_of[ei]) {
            // Branch current runs from terminal 1 through the source to terminal 0
            (Element::Source { .. }, Some(br)) => -matrix.x[br],
            (Element::Conductor, Some(br)) => matrix.x[br],
            (Element::Resistance(r), _) => (v0 - v1) / r,
            _ => 0.0,
        };
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_divider() {
        // V1 = 10 V at node 0, R 1k from node 0 to node 1, R 1k to ground
        let mut m = MnaMatrix::new(3);
        m.stamp_voltage_source(Some(0), None, 2, 10.0, 0.0);
        m.stamp_conductance(Some(0), Some(1), 1e-3);
        m.stamp_conductance(Some(1), None, 1e-3);
        m.factor().unwrap();
        m.solve().unwrap();
        assert!((m.voltage(Some(0)) - 10.0).abs() < 1e-9);
        assert!((m.voltage(Some(1)) - 5.0).abs() < 1e-9);
        // 5 mA drawn from the source
        assert!((m.x[2] + 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        let mut m = MnaMatrix::new(2);
        m.stamp_conductance(Some(0), Some(1), 1.0);
        assert!(matches!(m.factor(), Err(CircuitError::SingularMatrix)));
    }
}
