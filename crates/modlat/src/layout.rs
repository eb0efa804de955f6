//! 3D layout of the covering graph.
//!
//! Coordinates are `[x, y, z]` with `y` pointing up. The height of an
//! element is its position between bottom (`y = -1`) and top (`y = +1`)
//! measured in covering edges. Related generators share a "corner"; the
//! corners sit on a circle in the `x`/`z` plane and each element is pulled
//! towards the corners it is close to. The horizontal extent is then scaled
//! to the graph's width/height ratio.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::{ElementTable, RelationMap};
use crate::error::{LatticeError, Result};
use crate::graph::Graph;

/// Angular offset of the first corner, in turns of `2π / corner_count`.
const CORNER_PHASE: f64 = 0.19;

/// Element positions and graph extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeLayout {
    /// `[x, y, z]` per element, rounded to 6 decimals.
    pub positions: Vec<[f64; 3]>,
    /// Edge distance from bottom to top.
    pub graph_height: usize,
    /// Approximate width in edges.
    pub graph_width: usize,
}

// Generators grouped by comparability; each group is a corner.
fn corner_generators(rm: &RelationMap, generator_count: usize) -> Vec<Vec<usize>> {
    let mut corners: Vec<Vec<usize>> = Vec::new();
    let mut corner_of = vec![0; generator_count];
    for e1 in 0..generator_count {
        let corner = match (0..e1).find(|&e2| rm.is_related(e1, e2)) {
            Some(e2) => corner_of[e2],
            None => {
                corners.push(Vec::new());
                corners.len() - 1
            }
        };
        corners[corner].push(e1);
        corner_of[e1] = corner;
    }
    corners
}

fn center<T>(a: &[T]) -> Option<&T> {
    a.get(a.len() / 2)
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

fn all_distances(graph: &Graph, from: usize) -> Result<Vec<usize>> {
    graph
        .distances(from)
        .into_iter()
        .enumerate()
        .map(|(to, d)| d.ok_or(LatticeError::Disconnected { from, to }))
        .collect()
}

/// Computes the layout of a complete lattice.
///
/// # Errors
///
/// - [`LatticeError::MissingExtremum`] if top or bottom is not registered.
/// - [`LatticeError::Disconnected`] if the covering graph is not connected.
pub fn lattice_graph_layout(
    table: &ElementTable,
    graph: &Graph,
    rm: &RelationMap,
    generator_count: usize,
) -> Result<LatticeLayout> {
    let bottom = table.bottom().ok_or(LatticeError::MissingExtremum { which: "bottom" })?;
    let top = table.top().ok_or(LatticeError::MissingExtremum { which: "top" })?;
    let n = table.len();
    let corners = corner_generators(rm, generator_count);
    let bottom_dist = all_distances(graph, bottom)?;
    let top_dist = all_distances(graph, top)?;
    let generator_dist = (0..generator_count)
        .map(|g| all_distances(graph, g))
        .collect::<Result<Vec<_>>>()?;

    let graph_height = bottom_dist[top];
    let graph_width = match (
        corners.first().and_then(|c| center(c)),
        center(&corners).and_then(|c| center(c)),
    ) {
        (Some(&e1), Some(&e2)) => graph
            .distance(e1, e2)
            .ok_or(LatticeError::Disconnected { from: e1, to: e2 })?,
        _ => 0,
    };

    let corner_count = corners.len();
    let corner_pos: Vec<(f64, f64)> = (0..corner_count)
        .map(|i| {
            let alpha = (i as f64 + CORNER_PHASE) * 2.0 * PI / corner_count as f64;
            (alpha.cos(), -alpha.sin())
        })
        .collect();

    let mut positions: Vec<[f64; 3]> = (0..n)
        .map(|e| {
            let (db, dt) = (bottom_dist[e] as f64, top_dist[e] as f64);
            let y = if db + dt > 0.0 { (db - dt) / (db + dt) } else { 0.0 };
            let corner_dist: Vec<f64> = corners
                .iter()
                .map(|gens| {
                    gens.iter()
                        .map(|&g| generator_dist[g][e])
                        .min()
                        .unwrap_or(0) as f64
                })
                .collect();
            let dist_sum: f64 = corner_dist.iter().sum();
            let (mut x, mut z) = (0.0, 0.0);
            for (dist, (cx, cz)) in corner_dist.iter().zip(&corner_pos) {
                let w = if dist_sum > 0.0 { 1.0 - dist / dist_sum } else { 1.0 };
                x += w * cx;
                z += w * cz;
            }
            [x, y, z]
        })
        .collect();

    let max_r = positions
        .iter()
        .map(|p| p[0].hypot(p[2]))
        .fold(0.0_f64, f64::max);
    if max_r >= 1e-6 && graph_height > 0 {
        let r = graph_width as f64 / (graph_height as f64 * max_r);
        for p in &mut positions {
            p[0] *= r;
            p[2] *= r;
        }
    }
    for p in &mut positions {
        for v in p.iter_mut() {
            *v = round6(*v);
        }
    }
    Ok(LatticeLayout {
        positions,
        graph_height,
        graph_width,
    })
}
