//! modlat conformance suite.
//!
//! Generates every catalog lattice up to a size cap and checks the
//! resulting structure against the order and lattice invariants the
//! generator promises. Library tests cover individual laws on sampled
//! inputs; this suite checks every pair and every element of whole
//! lattices and reports each finding instead of stopping at the first.
//!
//! # Checks
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `catalog` | Unique names, distinct generators, seeds on known generators |
//! | `generation` | Generation completes with the declared element count |
//! | `bounds/primary` | Every primary combination evaluates to its element |
//! | `bounds/modular` | No two elements share a modular group |
//! | `order/antisymmetry` | `rel(a,b) = -rel(b,a)`, undefined diagonal |
//! | `order/closure` | Closing relation chains adds nothing |
//! | `order/rows` | No two elements have the same relation row |
//! | `graph/connected` | Every element is reachable in the covering graph |
//! | `graph/distance` | Covering-graph distances are symmetric |
//! | `layout/extents` | Bottom at y = -1, top at y = +1, positive height |
//!
//! # Entry Point
//!
//! ```no_run
//! use modlat_conformance::{run_all, ConformanceOptions};
//!
//! let report = run_all(&ConformanceOptions::default())?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::time::Instant;

use modlat::{generate_lattice, GenerationOptions, LatticeStructure};
use modlat_catalog::LatticeDef;
use tracing::{info, warn};

pub use report::{ConformanceReport, Severity, TestResult};

/// Options for a conformance run.
#[derive(Debug, Clone)]
pub struct ConformanceOptions {
    /// Catalog entries declaring more elements than this are skipped.
    pub max_elements: usize,
    /// Options passed to every generation.
    pub generation: GenerationOptions,
}

impl Default for ConformanceOptions {
    fn default() -> Self {
        Self {
            max_elements: 200,
            generation: GenerationOptions::default(),
        }
    }
}

/// Runs the catalog validator, then generates and validates every catalog
/// entry within the size cap.
///
/// Per lattice, validators run in this order:
/// 1. Generation
/// 2. Primary bounds and modular groups
/// 3. Relation matrix (antisymmetry, closure, rows)
/// 4. Covering graph (connectivity, distances)
/// 5. Layout
///
/// A lattice that fails to generate is reported and skipped.
///
/// # Errors
///
/// Returns an error if no catalog entry fits within `max_elements`.
pub fn run_all(options: &ConformanceOptions) -> anyhow::Result<ConformanceReport> {
    let defs: Vec<&LatticeDef> = modlat_catalog::all()
        .iter()
        .filter(|d| d.elements <= options.max_elements)
        .collect();
    if defs.is_empty() {
        anyhow::bail!(
            "no catalog entry has at most {} elements",
            options.max_elements
        );
    }

    let mut report = validators::catalog::validate(modlat_catalog::all());
    for def in defs {
        report.extend(validate_lattice(def, &options.generation));
    }
    Ok(report)
}

/// Generates one catalog lattice and runs every per-lattice validator on it.
#[must_use]
pub fn validate_lattice(def: &LatticeDef, options: &GenerationOptions) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let name = def.name;

    let started = Instant::now();
    let controller = match generate_lattice(def, options, |_| {}) {
        Ok(c) => c,
        Err(e) => {
            warn!(lattice = name, error = %e, "generation failed");
            report.push(TestResult::fail("generation", name, e.to_string()));
            return report;
        }
    };
    let elapsed = started.elapsed();
    info!(lattice = name, elements = controller.len(), ?elapsed, "generated");
    report.push(TestResult::pass(
        "generation",
        name,
        format!("{} elements in {} ms", controller.len(), elapsed.as_millis()),
    ));

    report.extend(validators::bounds::validate(name, &controller));
    report.extend(validators::order::validate(name, controller.relation_map()));

    match LatticeStructure::from_controller(&controller) {
        Ok(structure) => {
            report.extend(validators::graph::validate(name, &structure.graph()));
            report.extend(validators::layout::validate(name, &structure));
        }
        Err(e) => report.push(TestResult::fail("layout/extents", name, e.to_string())),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_catalog_entries_conform() {
        let report = run_all(&ConformanceOptions {
            max_elements: 30,
            ..ConformanceOptions::default()
        })
        .expect("entries within the cap");
        assert!(report.all_passed(), "{:#?}", report.results);
        // catalog header, 12 definitions, then 9 results for each of the
        // six entries up to 28 elements
        assert_eq!(report.results.len(), 1 + 12 + 6 * 9);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let err = run_all(&ConformanceOptions {
            max_elements: 2,
            ..ConformanceOptions::default()
        })
        .expect_err("nothing to run");
        assert_eq!(err.to_string(), "no catalog entry has at most 2 elements");
    }

    #[test]
    fn size_mismatch_stops_the_lattice() {
        let mut def = modlat_catalog::lookup("2-1").expect("catalog entry").clone();
        def.elements = 9;
        let report = validate_lattice(&def, &GenerationOptions::default());
        assert_eq!(report.results.len(), 1);
        assert!(report.results[0].is_failure());
        assert_eq!(report.results[0].validator, "generation");
    }
}
