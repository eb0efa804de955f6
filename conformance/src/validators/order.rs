//! Order validators: antisymmetry, closure idempotence, row uniqueness.

use std::collections::HashMap;

use modlat::core::format_relations;
use modlat::{Relation, RelationMap};

use super::MAX_DETAILS;
use crate::report::{ConformanceReport, TestResult};

/// Validates the relation matrix of one lattice.
#[must_use]
pub fn validate(name: &str, rm: &RelationMap) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.push(validate_antisymmetry(name, rm));
    report.push(validate_closure(name, rm));
    report.push(validate_rows(name, rm));
    report
}

fn validate_antisymmetry(name: &str, rm: &RelationMap) -> TestResult {
    let n = rm.len();
    let mut details = Vec::new();
    for a in 0..n {
        if rm.get(a, a) != Relation::Undef {
            details.push(format!("rel({a},{a}) = {}", rm.get(a, a)));
        }
        for b in a + 1..n {
            if rm.get(a, b) != -rm.get(b, a) {
                details.push(format!(
                    "rel({a},{b}) = {} but rel({b},{a}) = {}",
                    rm.get(a, b),
                    rm.get(b, a)
                ));
            }
        }
    }
    if details.is_empty() {
        TestResult::pass("order/antisymmetry", name, format!("{n}x{n} matrix"))
    } else {
        let count = details.len();
        details.truncate(MAX_DETAILS);
        TestResult::fail_with_details(
            "order/antisymmetry",
            name,
            format!("{count} asymmetric cell(s)"),
            details,
        )
    }
}

fn validate_closure(name: &str, rm: &RelationMap) -> TestResult {
    let mut closed = rm.clone();
    match closed.complete_element_relation_chains() {
        Ok(0) => TestResult::pass("order/closure", name, "relation chains are closed"),
        Ok(added) => TestResult::fail(
            "order/closure",
            name,
            format!("closing chains added {added} relation(s)"),
        ),
        Err(e) => TestResult::fail("order/closure", name, e.to_string()),
    }
}

fn validate_rows(name: &str, rm: &RelationMap) -> TestResult {
    let mut rows: HashMap<&[Relation], usize> = HashMap::new();
    let mut details = Vec::new();
    for no in 0..rm.len() {
        if let Some(first) = rows.insert(rm.row(no), no) {
            details.push(format!(
                "elements {first} and {no} share row {}",
                format_relations(rm.row(no))
            ));
        }
    }
    if details.is_empty() {
        TestResult::pass("order/rows", name, "every element has a distinct row")
    } else {
        details.truncate(MAX_DETAILS);
        TestResult::fail_with_details("order/rows", name, "indistinguishable elements", details)
    }
}
