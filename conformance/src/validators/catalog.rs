//! Catalog validator.
//!
//! Checks the static lattice definitions before anything is generated:
//! catalog names are unique, generator names within an entry are distinct
//! and single letters, and every seed refers to two different generators of
//! its entry.

use std::collections::HashSet;

use modlat_catalog::LatticeDef;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "catalog";

/// Validates every catalog definition.
#[must_use]
pub fn validate(defs: &[LatticeDef]) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let mut names = HashSet::new();
    let duplicates: Vec<String> = defs
        .iter()
        .filter(|d| !names.insert(d.name))
        .map(|d| d.name.to_string())
        .collect();
    if duplicates.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            "*",
            format!("{} entries with unique names", defs.len()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "*",
            "duplicate catalog names",
            duplicates,
        ));
    }

    for def in defs {
        report.push(validate_def(def));
    }
    report
}

fn validate_def(def: &LatticeDef) -> TestResult {
    let mut problems = Vec::new();

    let mut seen = HashSet::new();
    for g in def.generators {
        if !seen.insert(*g) {
            problems.push(format!("generator {g} is listed twice"));
        }
        if g.chars().count() != 1 || !g.chars().all(|c| c.is_ascii_lowercase()) {
            problems.push(format!("generator name {g:?} is not a single lowercase letter"));
        }
    }
    for seed in &def.relations {
        for name in [seed.first, seed.second] {
            if !seen.contains(name) {
                problems.push(format!("seed {seed} names unknown generator {name}"));
            }
        }
        if seed.first == seed.second {
            problems.push(format!("seed {seed} relates a generator to itself"));
        }
    }
    if def.elements < def.generators.len() {
        problems.push(format!(
            "declares {} elements for {} generators",
            def.elements,
            def.generators.len()
        ));
    }

    if problems.is_empty() {
        TestResult::pass(
            VALIDATOR,
            def.name,
            format!(
                "{} generators, {} seeds",
                def.generators.len(),
                def.relations.len()
            ),
        )
    } else {
        TestResult::fail_with_details(VALIDATOR, def.name, "malformed definition", problems)
    }
}
