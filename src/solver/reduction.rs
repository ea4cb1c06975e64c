//! Series/parallel network reduction.
//!
//! Each branch is a Thevenin edge: an EMF plus a series resistance split into
//! the part that lives inside sources (internal) and the part contributed by
//! passive components (external). The rules applied until nothing changes:
//!
//! - a passive branch whose ends meet carries no current and is dropped;
//! - a branch hanging off a node of degree one carries no current and is dropped;
//! - two passive branches across the same node pair combine in parallel;
//! - two branches meeting at a node of degree two combine in series;
//! - failing all of the above, two source branches across the same node pair
//!   combine into their Thevenin equivalent (Millman's theorem).
//!
//! A series-parallel network collapses to one source branch closing on
//! itself: the lumped circuit loop. Anything else (bridges, ideal sources in
//! parallel) is irreducible and yields `None`.

/// A Thevenin edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    /// Node indices; the EMF rises from `nodes[0]` to `nodes[1]`
    pub nodes: [usize; 2],
    pub emf: f64,
    /// Resistance inside sources
    pub internal: f64,
    /// Resistance of passive components
    pub external: f64,
    /// Contains at least one source
    pub source: bool,
}

impl Branch {
    /// A passive branch of resistance `r`.
    pub fn passive(a: usize, b: usize, r: f64) -> Self {
        Self {
            nodes: [a, b],
            emf: 0.0,
            internal: 0.0,
            external: r,
            source: false,
        }
    }

    /// A source branch with EMF rising from `a` to `b`.
    pub fn source(a: usize, b: usize, emf: f64, internal: f64) -> Self {
        Self {
            nodes: [a, b],
            emf,
            internal,
            external: 0.0,
            source: true,
        }
    }

    fn is_self_loop(&self) -> bool {
        self.nodes[0] == self.nodes[1]
    }

    fn touches(&self, node: usize) -> bool {
        self.nodes[0] == node || self.nodes[1] == node
    }

    fn resistance(&self) -> f64 {
        self.internal + self.external
    }

    fn same_pair(&self, other: &Branch) -> bool {
        (self.nodes[0] == other.nodes[0] && self.nodes[1] == other.nodes[1])
            || (self.nodes[0] == other.nodes[1] && self.nodes[1] == other.nodes[0])
    }

    /// Orient as leaving `node`: (far node, EMF rise from `node` to far node).
    fn leaving(&self, node: usize) -> (usize, f64) {
        if self.nodes[0] == node {
            (self.nodes[1], self.emf)
        } else {
            (self.nodes[0], -self.emf)
        }
    }
}

/// The single loop a network collapses to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedLoop {
    /// Net EMF around the loop (sign follows the first source's orientation)
    pub emf: f64,
    /// Sum of source internal resistances around the loop
    pub internal: f64,
    /// Equivalent resistance of the passive network seen by the sources
    pub equivalent: f64,
}

impl ReducedLoop {
    /// Total series resistance of the loop.
    pub fn total_resistance(&self) -> f64 {
        self.internal + self.equivalent
    }
}

/// Reduce a network to a single source loop.
///
/// Returns `None` when no loop carries current or the network is not
/// series-parallel.
pub fn reduce(mut branches: Vec<Branch>) -> Option<ReducedLoop> {
    loop {
        let before = branches.len();

        // Passive self-loops and dangling branches carry no current
        branches.retain(|b| b.source || !b.is_self_loop());
        if let Some(idx) = find_dangling(&branches) {
            branches.remove(idx);
            continue;
        }

        if let Some((i, j)) = find_parallel_pair(&branches) {
            let (a, b) = (branches[i], branches[j]);
            branches[i].external = parallel(a.external, b.external);
            branches.remove(j);
            continue;
        }

        if let Some((node, i, j)) = find_series_pair(&branches) {
            let merged = series(&branches[i], &branches[j], node);
            branches[i] = merged;
            branches.remove(j);
            continue;
        }

        if let Some((i, j)) = find_parallel_sources(&branches) {
            let merged = thevenin_parallel(&branches[i], &branches[j]);
            branches[i] = merged;
            branches.remove(j);
            continue;
        }

        if branches.len() == before {
            break;
        }
    }

    match branches.as_slice() {
        [only] if only.source && only.is_self_loop() => Some(ReducedLoop {
            emf: only.emf,
            internal: only.internal,
            equivalent: only.external,
        }),
        _ => None,
    }
}

fn degree(branches: &[Branch], node: usize) -> usize {
    branches
        .iter()
        .map(|b| {
            if b.is_self_loop() {
                if b.nodes[0] == node {
                    2
                } else {
                    0
                }
            } else {
                usize::from(b.touches(node))
            }
        })
        .sum()
}

fn find_dangling(branches: &[Branch]) -> Option<usize> {
    branches.iter().position(|b| {
        !b.is_self_loop() && (degree(branches, b.nodes[0]) == 1 || degree(branches, b.nodes[1]) == 1)
    })
}

fn find_parallel_pair(branches: &[Branch]) -> Option<(usize, usize)> {
    for i in 0..branches.len() {
        if branches[i].source || branches[i].is_self_loop() {
            continue;
        }
        for j in (i + 1)..branches.len() {
            if !branches[j].source && branches[i].same_pair(&branches[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

/// A node of degree two joined by two distinct branches: (node, first, second).
fn find_series_pair(branches: &[Branch]) -> Option<(usize, usize, usize)> {
    for (i, b) in branches.iter().enumerate() {
        if b.is_self_loop() {
            continue;
        }
        for &node in &b.nodes {
            if degree(branches, node) != 2 {
                continue;
            }
            let other = branches
                .iter()
                .enumerate()
                .position(|(j, o)| j != i && o.touches(node));
            if let Some(j) = other {
                return Some((node, i.min(j), i.max(j)));
            }
        }
    }
    None
}

/// Two source branches across the same node pair, both with resistance.
fn find_parallel_sources(branches: &[Branch]) -> Option<(usize, usize)> {
    let candidate = |b: &Branch| b.source && !b.is_self_loop() && b.resistance() > 0.0;
    for i in 0..branches.len() {
        if !candidate(&branches[i]) {
            continue;
        }
        for j in (i + 1)..branches.len() {
            if candidate(&branches[j]) && branches[i].same_pair(&branches[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Thevenin equivalent of `p` and `q` in parallel, oriented like `p`.
///
/// The combined resistance is split between internal and external in
/// proportion to each branch's internal share, weighted by conductance.
fn thevenin_parallel(p: &Branch, q: &Branch) -> Branch {
    let q_emf = if q.nodes[0] == p.nodes[0] { q.emf } else { -q.emf };
    let (rp, rq) = (p.resistance(), q.resistance());
    let (gp, gq) = (1.0 / rp, 1.0 / rq);
    let g = gp + gq;
    let r = 1.0 / g;
    let internal_share = (gp * p.internal / rp + gq * q.internal / rq) / g;
    Branch {
        nodes: p.nodes,
        emf: (p.emf * gp + q_emf * gq) / g,
        internal: r * internal_share,
        external: r * (1.0 - internal_share),
        source: true,
    }
}

fn parallel(r1: f64, r2: f64) -> f64 {
    let sum = r1 + r2;
    if sum <= 0.0 {
        0.0
    } else {
        r1 * r2 / sum
    }
}

/// Merge `p` and `q`, which meet at `node`, into one branch.
fn series(p: &Branch, q: &Branch, node: usize) -> Branch {
    // p walked towards `node`, then q walked away from it
    let (x, rise_out_p) = p.leaving(node);
    let (y, rise_q) = q.leaving(node);
    Branch {
        nodes: [x, y],
        emf: -rise_out_p + rise_q,
        internal: p.internal + q.internal,
        external: p.external + q.external,
        source: p.source || q.source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_loop() {
        let reduced = reduce(vec![
            Branch::source(0, 1, 12.0, 0.001),
            Branch::passive(1, 0, 100.0),
        ])
        .unwrap();
        assert_relative_eq!(reduced.emf.abs(), 12.0);
        assert_relative_eq!(reduced.internal, 0.001);
        assert_relative_eq!(reduced.equivalent, 100.0);
    }

    #[test]
    fn test_series_parallel_network() {
        // 10 V across 10 ohm in series with (30 || 60)
        let reduced = reduce(vec![
            Branch::source(0, 1, 10.0, 0.0),
            Branch::passive(1, 2, 10.0),
            Branch::passive(2, 0, 30.0),
            Branch::passive(2, 0, 60.0),
        ])
        .unwrap();
        assert_relative_eq!(reduced.equivalent, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_series_sources_add() {
        let aiding = reduce(vec![
            Branch::source(0, 1, 1.5, 0.1),
            Branch::source(1, 2, 1.5, 0.1),
            Branch::passive(2, 0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(aiding.emf.abs(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(aiding.internal, 0.2, epsilon = 1e-12);

        let opposing = reduce(vec![
            Branch::source(0, 1, 9.0, 0.0),
            Branch::source(2, 1, 1.5, 0.0),
            Branch::passive(2, 0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(opposing.emf.abs(), 7.5, epsilon = 1e-12);
    }

    #[test]
    fn test_dangling_branch_ignored() {
        let reduced = reduce(vec![
            Branch::source(0, 1, 5.0, 0.0),
            Branch::passive(1, 0, 5.0),
            Branch::passive(1, 3, 1000.0),
        ])
        .unwrap();
        assert_relative_eq!(reduced.equivalent, 5.0);
    }

    #[test]
    fn test_open_circuit_has_no_loop() {
        assert!(reduce(vec![
            Branch::source(0, 1, 5.0, 0.0),
            Branch::passive(1, 2, 5.0),
        ])
        .is_none());
    }

    #[test]
    fn test_bridge_is_irreducible() {
        // Wheatstone bridge: nodes 0 (bottom), 1 (top), 2 and 3 (midpoints)
        let branches = vec![
            Branch::source(0, 1, 10.0, 0.0),
            Branch::passive(1, 2, 10.0),
            Branch::passive(1, 3, 20.0),
            Branch::passive(2, 0, 30.0),
            Branch::passive(3, 0, 40.0),
            Branch::passive(2, 3, 50.0),
        ];
        assert!(reduce(branches).is_none());
    }

    #[test]
    fn test_parallel_sources_merge() {
        // 9 V / 0.5 ohm and 6 V / 0.5 ohm (reversed) in parallel feeding 10 ohm
        let reduced = reduce(vec![
            Branch::source(0, 1, 9.0, 0.5),
            Branch::source(0, 1, 6.0, 0.5),
            Branch::passive(1, 0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(reduced.emf.abs(), 7.5, epsilon = 1e-12);
        assert_relative_eq!(reduced.internal, 0.25, epsilon = 1e-12);
        assert_relative_eq!(reduced.equivalent, 10.0, epsilon = 1e-12);

        let opposed = reduce(vec![
            Branch::source(0, 1, 9.0, 0.5),
            Branch::source(1, 0, 6.0, 0.5),
            Branch::passive(1, 0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(opposed.emf.abs(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_two_sources_alone_form_a_loop() {
        let reduced = reduce(vec![
            Branch::source(0, 1, 9.0, 0.5),
            Branch::source(0, 1, 6.0, 0.5),
        ])
        .unwrap();
        assert_relative_eq!(reduced.emf.abs(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(reduced.internal, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ideal_parallel_sources_are_irreducible() {
        assert!(reduce(vec![
            Branch::source(0, 1, 9.0, 0.0),
            Branch::source(0, 1, 6.0, 0.0),
            Branch::passive(1, 0, 10.0),
        ])
        .is_none());
    }

    #[test]
    fn test_short_reduces_to_zero_equivalent() {
        let reduced = reduce(vec![
            Branch::source(0, 1, 9.0, 0.5),
            Branch::passive(1, 0, 0.0),
            Branch::passive(1, 0, 100.0),
        ])
        .unwrap();
        assert_eq!(reduced.equivalent, 0.0);
        assert_relative_eq!(reduced.total_resistance(), 0.5);
    }
}
