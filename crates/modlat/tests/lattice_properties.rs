//! Property-based tests over generated lattices.
//!
//! Every catalog entry up to 68 elements is generated once; proptest then
//! draws lattices and element pairs or triples from that pool and checks
//! order and lattice laws against the relation matrix.

use std::collections::HashSet;
use std::sync::OnceLock;

use modlat::catalog;
use modlat::relations::{find_elements_between, find_infimum_or_supremum, Bound};
use modlat::{
    generate_lattice, GenerationOptions, Graph, LatticeController, Operator, Relation,
    RelationMap,
};
use proptest::prelude::*;
use proptest::sample::Index;

struct Generated {
    name: &'static str,
    controller: LatticeController,
    edges: Vec<[usize; 2]>,
    graph: Graph,
}

fn pool() -> &'static [Generated] {
    static POOL: OnceLock<Vec<Generated>> = OnceLock::new();
    POOL.get_or_init(|| {
        catalog::all()
            .iter()
            .filter(|d| d.elements <= 68)
            .map(|def| {
                let controller = generate_lattice(def, &GenerationOptions::default(), |_| {})
                    .unwrap_or_else(|e| panic!("{} failed: {e}", def.name));
                let edges = modlat::lattice_graph_edges(controller.relation_map());
                let graph = Graph::new(controller.len(), &edges);
                Generated {
                    name: def.name,
                    controller,
                    edges,
                    graph,
                }
            })
            .collect()
    })
}

fn bound(rm: &RelationMap, a: usize, b: usize, op: Operator) -> usize {
    match find_infimum_or_supremum(rm, a, b, op) {
        Bound::Found(x) => x,
        other => panic!("{a} {op} {b} evaluates to {other}"),
    }
}

// =============================================================================
// Whole-lattice checks
// =============================================================================

#[test]
fn closure_is_idempotent() {
    for g in pool() {
        let mut rm = g.controller.relation_map().clone();
        assert_eq!(rm.complete_element_relation_chains(), Ok(0), "{}", g.name);
    }
}

#[test]
fn rows_are_distinct() {
    for g in pool() {
        let rm = g.controller.relation_map();
        let rows: HashSet<&[Relation]> = (0..rm.len()).map(|no| rm.row(no)).collect();
        assert_eq!(rows.len(), rm.len(), "{}", g.name);
    }
}

#[test]
fn covering_graph_is_connected() {
    for g in pool() {
        assert!(g.graph.is_connected(), "{}", g.name);
    }
}

#[test]
fn relations_are_complete() {
    for g in pool() {
        let mut c = g.controller.clone();
        assert_eq!(c.check_relations(), Ok(()), "{}", g.name);
    }
}

// =============================================================================
// Pairwise and triple laws
// =============================================================================

proptest! {
    /// rel(a, b) = -rel(b, a), and no element is related to itself.
    #[test]
    fn prop_antisymmetry(l in any::<Index>(), a in any::<Index>(), b in any::<Index>()) {
        let g = l.get(pool());
        let rm = g.controller.relation_map();
        let (a, b) = (a.index(rm.len()), b.index(rm.len()));
        prop_assert_eq!(rm.get(a, b), -rm.get(b, a));
        prop_assert_eq!(rm.get(a, a), Relation::Undef);
    }

    /// Absorption: a * (a + b) = a and a + (a * b) = a.
    #[test]
    fn prop_absorption(l in any::<Index>(), a in any::<Index>(), b in any::<Index>()) {
        let g = l.get(pool());
        let rm = g.controller.relation_map();
        let (a, b) = (a.index(rm.len()), b.index(rm.len()));
        let join = bound(rm, a, b, Operator::Join);
        let meet = bound(rm, a, b, Operator::Meet);
        prop_assert_eq!(bound(rm, a, join, Operator::Meet), a);
        prop_assert_eq!(bound(rm, a, meet, Operator::Join), a);
    }

    /// Cached combinations agree with the bounds read from the matrix.
    #[test]
    fn prop_cache_matches_bounds(l in any::<Index>(), a in any::<Index>(), b in any::<Index>()) {
        let g = l.get(pool());
        let rm = g.controller.relation_map();
        let cm = g.controller.combination_map();
        let (a, b) = (a.index(rm.len()), b.index(rm.len()));
        for op in Operator::ALL {
            if let Some(x) = cm.get_pair(a, b, op) {
                prop_assert_eq!(bound(rm, a, b, op), x, "{} {} {}", a, op, b);
            }
        }
    }

    /// Modular law: a <= b implies a + (b * x) = b * (a + x).
    #[test]
    fn prop_modular_law(
        l in any::<Index>(),
        a in any::<Index>(),
        b in any::<Index>(),
        x in any::<Index>(),
    ) {
        let g = l.get(pool());
        let rm = g.controller.relation_map();
        let n = rm.len();
        let (mut a, mut b, x) = (a.index(n), b.index(n), x.index(n));
        if rm.get(a, b) == Relation::Higher {
            std::mem::swap(&mut a, &mut b);
        }
        prop_assume!(a == b || rm.get(a, b) == Relation::Lower);
        let left = bound(rm, a, bound(rm, b, x, Operator::Meet), Operator::Join);
        let right = bound(rm, b, bound(rm, a, x, Operator::Join), Operator::Meet);
        prop_assert_eq!(left, right, "{}: {} {} {}", g.name, a, b, x);
    }

    /// Graph distances are symmetric.
    #[test]
    fn prop_distance_symmetry(l in any::<Index>(), a in any::<Index>(), b in any::<Index>()) {
        let g = l.get(pool());
        let n = g.controller.len();
        let (a, b) = (a.index(n), b.index(n));
        prop_assert_eq!(g.graph.distance(a, b), g.graph.distance(b, a));
        prop_assert!(g.graph.distance(a, b).is_some());
    }

    /// a < b is a covering edge exactly when nothing lies strictly between.
    #[test]
    fn prop_covering_edges(l in any::<Index>(), a in any::<Index>(), b in any::<Index>()) {
        let g = l.get(pool());
        let rm = g.controller.relation_map();
        let (a, b) = (a.index(rm.len()), b.index(rm.len()));
        prop_assume!(rm.get(a, b) == Relation::Lower);
        let empty = find_elements_between(rm, a, b).is_empty();
        prop_assert_eq!(g.edges.contains(&[a, b]), empty);
    }
}
