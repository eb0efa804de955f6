//! Layout validator.
//!
//! The bottom sits at y = -1, the top at y = +1, every other element in
//! between, and the reported height is positive. A lattice one element
//! wide is legal but flat, so it only warns.

use modlat::LatticeStructure;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "layout/extents";

/// Validates the layout of one generated structure.
#[must_use]
pub fn validate(name: &str, structure: &LatticeStructure) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let layout = &structure.layout;

    let mut details = Vec::new();
    if layout.positions.len() != structure.elements {
        details.push(format!(
            "{} positions for {} elements",
            layout.positions.len(),
            structure.elements
        ));
    }
    let y = |no: usize| layout.positions.get(no).map(|p| p[1]);
    if y(structure.bottom) != Some(-1.0) {
        details.push(format!(
            "bottom {} at y = {:?}",
            structure.bottom,
            y(structure.bottom)
        ));
    }
    if y(structure.top) != Some(1.0) {
        details.push(format!("top {} at y = {:?}", structure.top, y(structure.top)));
    }
    for (no, p) in layout.positions.iter().enumerate() {
        if !(-1.0..=1.0).contains(&p[1]) {
            details.push(format!("element {no} at y = {}", p[1]));
        }
    }
    if layout.graph_height == 0 {
        details.push("zero graph height".to_string());
    }

    if !details.is_empty() {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            name,
            "layout out of bounds",
            details,
        ));
    } else if layout.graph_width < 2 {
        report.push(TestResult::warn(
            VALIDATOR,
            name,
            format!("flat layout, width {}", layout.graph_width),
        ));
    } else {
        report.push(TestResult::pass(
            VALIDATOR,
            name,
            format!("height {}, width {}", layout.graph_height, layout.graph_width),
        ));
    }
    report
}
