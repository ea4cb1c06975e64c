//! Topology analysis: electrical nodes, subgraphs and independent loops.
//!
//! Terminals joined by connections are merged into nodes with union-find.
//! Every connected two-terminal component then becomes an edge of an
//! undirected multigraph over those nodes. Independent loops come from a
//! BFS spanning forest: each non-tree edge closes exactly one fundamental
//! loop, so a subgraph with `E` edges and `V` nodes has `E - V + 1` loops.
//!
//! Sign conventions used throughout the crate:
//! - an edge current is positive when it flows through the component from
//!   terminal 0 to terminal 1;
//! - an edge voltage drop is `V(terminal 0) - V(terminal 1)`.

mod dsu;

pub use dsu::DisjointSet;

use std::collections::VecDeque;

use crate::circuit::{Circuit, NodeId};

/// A component seen as an edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Index into `Circuit::components`
    pub component: usize,
    /// Nodes of terminal 0 and terminal 1
    pub nodes: [NodeId; 2],
}

impl Edge {
    /// The node on the other side of `node`.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.nodes[0] == node {
            self.nodes[1]
        } else {
            self.nodes[0]
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.nodes[0] == self.nodes[1]
    }
}

/// One edge of a loop, with its traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopBranch {
    /// Index into `Topology::edges`
    pub edge: usize,
    /// True when traversed from terminal 0 to terminal 1
    pub forward: bool,
}

/// A closed walk through the multigraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub branches: Vec<LoopBranch>,
}

/// A connected piece of the node multigraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph {
    /// Nodes in ascending order
    pub nodes: Vec<NodeId>,
    /// Indices into `Topology::edges`, ascending
    pub edges: Vec<usize>,
    /// Contains at least one source component
    pub has_source: bool,
}

/// Result of a topology pass over a circuit.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Node per terminal, indexed by component then terminal. `None` for
    /// isolated components.
    terminal_nodes: Vec<Vec<Option<NodeId>>>,
    /// Number of distinct nodes
    pub num_nodes: usize,
    /// One edge per connected two-terminal component
    pub edges: Vec<Edge>,
    /// Connected pieces, ordered by their lowest node
    pub subgraphs: Vec<Subgraph>,
    /// Fundamental loops of every subgraph
    pub loops: Vec<Loop>,
    /// Components without any connection (component indices)
    pub isolated: Vec<usize>,
    /// Unconnected terminals of otherwise connected components
    pub dangling: Vec<(usize, usize)>,
}

impl Topology {
    /// Analyze the circuit's connection graph.
    ///
    /// Connections referring to unknown components or terminals are skipped;
    /// the validator reports them.
    pub fn analyze(circuit: &Circuit) -> Self {
        let components = &circuit.components;

        // Global terminal numbering
        let mut offsets = Vec::with_capacity(components.len() + 1);
        let mut total = 0usize;
        for c in components {
            offsets.push(total);
            total += c.terminal_count();
        }
        offsets.push(total);

        let mut dsu = DisjointSet::new(total);
        let mut used = vec![false; total];
        let mut connected = vec![false; components.len()];

        for conn in &circuit.connections {
            let from = circuit
                .component_index(&conn.from.component)
                .filter(|&i| conn.from.terminal < components[i].terminal_count());
            let to = circuit
                .component_index(&conn.to.component)
                .filter(|&i| conn.to.terminal < components[i].terminal_count());
            let (Some(a), Some(b)) = (from, to) else {
                tracing::debug!(connection = %conn.id, "skipping connection with unresolved endpoint");
                continue;
            };
            if conn.is_self_loop() {
                continue;
            }
            let ta = offsets[a] + conn.from.terminal;
            let tb = offsets[b] + conn.to.terminal;
            dsu.union(ta, tb);
            used[ta] = true;
            used[tb] = true;
            connected[a] = true;
            connected[b] = true;
        }

        // Dense node ids in order of first appearance, connected components only
        let mut node_of_root = vec![usize::MAX; total];
        let mut num_nodes = 0usize;
        let mut terminal_nodes = Vec::with_capacity(components.len());
        let mut isolated = Vec::new();
        let mut dangling = Vec::new();

        for (ci, c) in components.iter().enumerate() {
            if !connected[ci] {
                isolated.push(ci);
                terminal_nodes.push(vec![None; c.terminal_count()]);
                continue;
            }
            let mut nodes = Vec::with_capacity(c.terminal_count());
            for t in 0..c.terminal_count() {
                let global = offsets[ci] + t;
                if !used[global] {
                    dangling.push((ci, t));
                }
                let root = dsu.find(global);
                if node_of_root[root] == usize::MAX {
                    node_of_root[root] = num_nodes;
                    num_nodes += 1;
                }
                nodes.push(Some(NodeId(node_of_root[root])));
            }
            terminal_nodes.push(nodes);
        }

        let edges: Vec<Edge> = terminal_nodes
            .iter()
            .enumerate()
            .filter_map(|(ci, nodes)| match nodes.as_slice() {
                [Some(a), Some(b), ..] => Some(Edge {
                    component: ci,
                    nodes: [*a, *b],
                }),
                _ => None,
            })
            .collect();

        let subgraphs = build_subgraphs(circuit, num_nodes, &edges);
        let loops = subgraphs
            .iter()
            .flat_map(|sg| fundamental_loops(sg, &edges, num_nodes))
            .collect();

        Self {
            terminal_nodes,
            num_nodes,
            edges,
            subgraphs,
            loops,
            isolated,
            dangling,
        }
    }

    /// Node of a component terminal, if the component is connected.
    pub fn node_of(&self, component: usize, terminal: usize) -> Option<NodeId> {
        self.terminal_nodes
            .get(component)
            .and_then(|nodes| nodes.get(terminal))
            .copied()
            .flatten()
    }

    /// Edge index of a component, if it takes part in the graph.
    pub fn edge_of(&self, component: usize) -> Option<usize> {
        self.edges.iter().position(|e| e.component == component)
    }

    /// Map every node to a representative after merging across the edges for
    /// which `merge(edge_index)` holds.
    pub fn contract(&self, merge: impl Fn(usize) -> bool) -> Vec<NodeId> {
        let mut dsu = DisjointSet::new(self.num_nodes);
        for (i, e) in self.edges.iter().enumerate() {
            if merge(i) {
                dsu.union(e.nodes[0].0, e.nodes[1].0);
            }
        }
        (0..self.num_nodes).map(|n| NodeId(dsu.find(n))).collect()
    }

    /// Net current into every node (entering minus leaving).
    ///
    /// `currents` is indexed like `edges`.
    pub fn node_residuals(&self, currents: &[f64]) -> Vec<Residual> {
        let mut residuals = vec![Residual::default(); self.num_nodes];
        for (e, &i) in self.edges.iter().zip(currents) {
            residuals[e.nodes[0].0].add(-i);
            residuals[e.nodes[1].0].add(i);
        }
        residuals
    }

    /// Sum of voltage drops around every fundamental loop.
    ///
    /// `drops` is indexed like `edges`.
    pub fn loop_residuals(&self, drops: &[f64]) -> Vec<Residual> {
        self.loops
            .iter()
            .map(|l| {
                let mut r = Residual::default();
                for b in &l.branches {
                    let v = drops[b.edge];
                    r.add(if b.forward { v } else { -v });
                }
                r
            })
            .collect()
    }
}

/// Signed sum of terms plus the largest term magnitude, for tolerance checks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Residual {
    pub sum: f64,
    pub scale: f64,
}

impl Residual {
    fn add(&mut self, term: f64) {
        self.sum += term;
        self.scale = self.scale.max(term.abs());
    }

    /// Within `tolerance` absolute or relative to the largest term,
    /// whichever is larger.
    pub fn within(&self, tolerance: f64) -> bool {
        self.sum.abs() <= tolerance.max(tolerance * self.scale)
    }
}

fn build_subgraphs(circuit: &Circuit, num_nodes: usize, edges: &[Edge]) -> Vec<Subgraph> {
    let mut dsu = DisjointSet::new(num_nodes);
    for e in edges {
        dsu.union(e.nodes[0].0, e.nodes[1].0);
    }
    let (labels, count) = dsu.labels();

    let mut subgraphs: Vec<Subgraph> = (0..count)
        .map(|_| Subgraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            has_source: false,
        })
        .collect();
    for (n, &label) in labels.iter().enumerate() {
        subgraphs[label].nodes.push(NodeId(n));
    }
    for (i, e) in edges.iter().enumerate() {
        let sg = &mut subgraphs[labels[e.nodes[0].0]];
        sg.edges.push(i);
        if circuit.components[e.component].kind().is_source() {
            sg.has_source = true;
        }
    }
    subgraphs
}

fn fundamental_loops(subgraph: &Subgraph, edges: &[Edge], num_nodes: usize) -> Vec<Loop> {
    let Some(&root) = subgraph.nodes.first() else {
        return Vec::new();
    };

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    for &ei in &subgraph.edges {
        let e = &edges[ei];
        adjacency[e.nodes[0].0].push(ei);
        if !e.is_self_loop() {
            adjacency[e.nodes[1].0].push(ei);
        }
    }

    // BFS spanning tree
    let mut parent_edge: Vec<Option<usize>> = vec![None; num_nodes];
    let mut depth = vec![usize::MAX; num_nodes];
    let mut in_tree = vec![false; edges.len()];
    let mut queue = VecDeque::new();
    depth[root.0] = 0;
    queue.push_back(root);
    while let Some(node) = queue.pop_front() {
        for &ei in &adjacency[node.0] {
            let next = edges[ei].other(node);
            if depth[next.0] == usize::MAX {
                depth[next.0] = depth[node.0] + 1;
                parent_edge[next.0] = Some(ei);
                in_tree[ei] = true;
                queue.push_back(next);
            }
        }
    }

    // Step from `node` to its tree parent: (edge, parent, traversed forward)
    let up = |node: NodeId| -> Option<(usize, NodeId, bool)> {
        parent_edge[node.0].map(|ei| {
            let e = &edges[ei];
            (ei, e.other(node), e.nodes[0] == node)
        })
    };

    let mut loops = Vec::new();
    for &ei in &subgraph.edges {
        if in_tree[ei] {
            continue;
        }
        let e = &edges[ei];
        let (start, end) = (e.nodes[0], e.nodes[1]);
        let mut branches = vec![LoopBranch {
            edge: ei,
            forward: true,
        }];

        // Walk `end` and `start` up to their lowest common ancestor
        let mut a = end;
        let mut b = start;
        let mut ascent = Vec::new();
        let mut descent = Vec::new();
        while a != b {
            if depth[a.0] >= depth[b.0] {
                let Some((pe, p, forward)) = up(a) else { break };
                ascent.push(LoopBranch { edge: pe, forward });
                a = p;
            } else {
                let Some((pe, p, forward)) = up(b) else { break };
                // Traversed later from parent down to child
                descent.push(LoopBranch {
                    edge: pe,
                    forward: !forward,
                });
                b = p;
            }
        }
        branches.extend(ascent);
        branches.extend(descent.into_iter().rev());
        loops.push(Loop { branches });
    }
    loops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Connection;
    use crate::components::Component;

    fn series_loop() -> Circuit {
        Circuit::from_parts(
            vec![
                Component::battery("b1", 12.0, 0.0),
                Component::resistor("r1", 100.0),
            ],
            vec![
                Connection::between("c1", "b1", 1, "r1", 0),
                Connection::between("c2", "r1", 1, "b1", 0),
            ],
        )
    }

    #[test]
    fn test_series_loop_nodes() {
        let topo = Topology::analyze(&series_loop());
        assert_eq!(topo.num_nodes, 2);
        assert_eq!(topo.edges.len(), 2);
        assert_eq!(topo.node_of(0, 1), topo.node_of(1, 0));
        assert_eq!(topo.node_of(1, 1), topo.node_of(0, 0));
        assert_eq!(topo.subgraphs.len(), 1);
        assert!(topo.subgraphs[0].has_source);
        assert_eq!(topo.loops.len(), 1);
        assert_eq!(topo.loops[0].branches.len(), 2);
        assert!(topo.isolated.is_empty());
        assert!(topo.dangling.is_empty());
    }

    #[test]
    fn test_loop_count_is_cyclomatic() {
        // Battery feeding three parallel resistors: E=4, V=2, loops=3
        let mut circuit = series_loop();
        for (i, r) in ["r2", "r3"].iter().enumerate() {
            circuit.components.push(Component::resistor(*r, 50.0));
            circuit
                .connections
                .push(Connection::between(format!("p{i}"), "r1", 0, r, 0));
            circuit
                .connections
                .push(Connection::between(format!("q{i}"), "r1", 1, r, 1));
        }
        let topo = Topology::analyze(&circuit);
        assert_eq!(topo.num_nodes, 2);
        assert_eq!(topo.loops.len(), 3);
    }

    #[test]
    fn test_isolated_and_dangling() {
        let circuit = Circuit::from_parts(
            vec![
                Component::battery("b1", 9.0, 0.0),
                Component::resistor("r1", 10.0),
                Component::bulb("l1", 5.0, 1.0),
            ],
            vec![Connection::between("c1", "b1", 1, "r1", 0)],
        );
        let topo = Topology::analyze(&circuit);
        assert_eq!(topo.isolated, vec![2]);
        assert_eq!(topo.dangling, vec![(0, 0), (1, 1)]);
        assert_eq!(topo.node_of(2, 0), None);
        assert!(topo.loops.is_empty());
    }

    #[test]
    fn test_unresolved_connection_skipped() {
        let mut circuit = series_loop();
        circuit
            .connections
            .push(Connection::between("bad", "r1", 0, "ghost", 0));
        let topo = Topology::analyze(&circuit);
        assert_eq!(topo.num_nodes, 2);
    }

    #[test]
    fn test_kirchhoff_residuals() {
        let topo = Topology::analyze(&series_loop());
        // 0.12 A flowing out of b1 terminal 1 and through r1 from terminal 0
        let currents = vec![0.12, 0.12];
        assert!(topo.node_residuals(&currents).iter().all(|r| r.within(1e-6)));

        // Battery drop t0->t1 is -12 V, resistor drop +12 V
        let drops = vec![-12.0, 12.0];
        assert!(topo.loop_residuals(&drops).iter().all(|r| r.within(1e-6)));

        let bad = vec![-12.0, 11.0];
        assert!(!topo.loop_residuals(&bad)[0].within(1e-6));
    }

    #[test]
    fn test_contract_merges_conductors() {
        let circuit = Circuit::from_parts(
            vec![Component::battery("b1", 9.0, 0.0), Component::wire("w1")],
            vec![
                Connection::between("c1", "b1", 1, "w1", 0),
                Connection::between("c2", "w1", 1, "b1", 0),
            ],
        );
        let topo = Topology::analyze(&circuit);
        let groups = topo.contract(|i| i == 1);
        let b = topo.edges[0];
        assert_eq!(groups[b.nodes[0].0], groups[b.nodes[1].0]);
    }
}
