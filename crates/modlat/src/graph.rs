//! Covering graph of a lattice.
//!
//! An edge `[lower, higher]` joins each element to every element covering
//! it. [`Graph`] holds the undirected adjacency of those edges and answers
//! breadth-first distance queries, which the layout builds on.
//!
//! # Examples
//!
//! ```
//! use modlat::graph::Graph;
//!
//! // bottom 0, atoms 1 and 2, top 3
//! let g = Graph::new(4, &[[0, 1], [0, 2], [1, 3], [2, 3]]);
//! assert_eq!(g.distance(0, 3), Some(2));
//! assert_eq!(g.distances(1), [Some(1), Some(0), Some(2), Some(1)]);
//! ```

use std::collections::VecDeque;

use crate::core::{Relation, RelationMap};
use crate::relations::find_direct_predecessors;

/// Covering edges as `[lower, higher]` pairs, ordered by lower element.
#[must_use]
pub fn lattice_graph_edges(rm: &RelationMap) -> Vec<[usize; 2]> {
    (0..rm.len())
        .flat_map(|e1| {
            find_direct_predecessors(rm, e1, Relation::Higher)
                .into_iter()
                .map(move |e2| [e1, e2])
        })
        .collect()
}

/// Undirected graph over `0..vertex_count`.
#[derive(Debug, Clone)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Builds the adjacency lists.
    ///
    /// Edge endpoints must be below `vertex_count`.
    #[must_use]
    pub fn new(vertex_count: usize, edges: &[[usize; 2]]) -> Self {
        let mut adjacency = vec![Vec::new(); vertex_count];
        for &[a, b] in edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        Self {
            adjacency,
            edge_count: edges.len(),
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edge distance from `v` to every vertex; `None` where unreachable.
    #[must_use]
    pub fn distances(&self, v: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.vertex_count()];
        dist[v] = Some(0);
        let mut queue = VecDeque::from([v]);
        while let Some(v1) = queue.pop_front() {
            let d = dist[v1].map_or(0, |d| d + 1);
            for &v2 in &self.adjacency[v1] {
                if dist[v2].is_none() {
                    dist[v2] = Some(d);
                    queue.push_back(v2);
                }
            }
        }
        dist
    }

    /// Edge distance between `a` and `b`, stopping as soon as `b` is reached.
    #[must_use]
    pub fn distance(&self, a: usize, b: usize) -> Option<usize> {
        if a == b {
            return Some(0);
        }
        let mut visited = vec![false; self.vertex_count()];
        visited[a] = true;
        let mut frontier = vec![a];
        let mut d = 0;
        while !frontier.is_empty() {
            d += 1;
            let mut next = Vec::new();
            for &v1 in &frontier {
                for &v2 in &self.adjacency[v1] {
                    if v2 == b {
                        return Some(d);
                    }
                    if !visited[v2] {
                        visited[v2] = true;
                        next.push(v2);
                    }
                }
            }
            frontier = next;
        }
        None
    }

    /// Returns true if every vertex is reachable from vertex 0.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.vertex_count() == 0 || self.distances(0).iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 < 1 < 3, 0 < 2 < 3, plus 3 < 4
    fn diamond() -> RelationMap {
        let mut rm = RelationMap::new(5);
        rm.grow_to(5).expect("capacity");
        for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)] {
            rm.set(a, b, Relation::Lower).expect("fresh");
        }
        rm.complete_element_relation_chains().expect("consistent");
        rm
    }

    #[test]
    fn edges_skip_transitive_pairs() {
        let edges = lattice_graph_edges(&diamond());
        assert_eq!(edges, [[0, 1], [0, 2], [1, 3], [2, 3], [3, 4]]);
    }

    #[test]
    fn distances_are_symmetric() {
        let g = Graph::new(5, &lattice_graph_edges(&diamond()));
        for a in 0..5 {
            for b in 0..5 {
                assert_eq!(g.distance(a, b), g.distance(b, a));
                assert_eq!(g.distance(a, b), g.distances(a)[b]);
            }
        }
        assert_eq!(g.distance(1, 2), Some(2));
        assert_eq!(g.distance(0, 4), Some(3));
    }

    #[test]
    fn unreachable_vertices() {
        let g = Graph::new(3, &[[0, 1]]);
        assert_eq!(g.distance(0, 2), None);
        assert_eq!(g.distances(2), [None, None, Some(0)]);
        assert!(!g.is_connected());
        assert!(Graph::new(2, &[[1, 0]]).is_connected());
    }
}
