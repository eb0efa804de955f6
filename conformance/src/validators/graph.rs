//! Covering graph validators: connectivity and distance symmetry.

use modlat::Graph;

use super::MAX_DETAILS;
use crate::report::{ConformanceReport, TestResult};

/// Validates the covering graph of one lattice.
#[must_use]
pub fn validate(name: &str, graph: &Graph) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let n = graph.vertex_count();
    let distances: Vec<Vec<Option<usize>>> = (0..n).map(|v| graph.distances(v)).collect();

    let unreachable: Vec<String> = (0..n)
        .filter(|&v| distances.first().is_some_and(|d| d[v].is_none()))
        .map(|v| v.to_string())
        .collect();
    if unreachable.is_empty() {
        report.push(TestResult::pass(
            "graph/connected",
            name,
            format!("{n} vertices, {} edges", graph.edge_count()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            "graph/connected",
            name,
            format!("{} vertices unreachable from 0", unreachable.len()),
            unreachable.into_iter().take(MAX_DETAILS).collect(),
        ));
    }

    let mut details = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            if distances[a][b] != distances[b][a] {
                details.push(format!(
                    "d({a},{b}) = {:?} but d({b},{a}) = {:?}",
                    distances[a][b], distances[b][a]
                ));
            }
        }
    }
    if details.is_empty() {
        let diameter = distances.iter().flatten().flatten().max().copied();
        report.push(TestResult::pass(
            "graph/distance",
            name,
            format!("symmetric distances, diameter {}", diameter.unwrap_or(0)),
        ));
    } else {
        details.truncate(MAX_DETAILS);
        report.push(TestResult::fail_with_details(
            "graph/distance",
            name,
            "asymmetric distances",
            details,
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_passes() {
        let graph = Graph::new(4, &[[0, 1], [0, 2], [1, 3], [2, 3]]);
        let report = validate("diamond", &graph);
        assert!(report.all_passed(), "{:#?}", report.results);
        assert_eq!(report.results[1].message, "symmetric distances, diameter 2");
    }

    #[test]
    fn split_graph_fails() {
        let graph = Graph::new(4, &[[0, 1], [2, 3]]);
        let report = validate("split", &graph);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.results[0].details, ["2", "3"]);
    }
}
