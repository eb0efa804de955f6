//! Bound validators.
//!
//! Re-derives every primary combination's meet or join from the relation
//! matrix and compares it with the element it names, then checks that no
//! two elements belong to the same modular group.

use modlat::verify::{verify_modular_groups, verify_primary_bounds};
use modlat::LatticeController;

use crate::report::{ConformanceReport, TestResult};

/// Validates primary bounds and modular uniqueness of one lattice.
#[must_use]
pub fn validate(name: &str, controller: &LatticeController) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let table = controller.element_table();
    let rm = controller.relation_map();

    report.push(match verify_primary_bounds(table, rm) {
        Ok(()) => TestResult::pass(
            "bounds/primary",
            name,
            "every primary combination evaluates to its element",
        ),
        Err(e) => TestResult::fail("bounds/primary", name, e.to_string()),
    });

    report.push(
        match verify_modular_groups(table, rm, controller.combination_map()) {
            Ok(()) => TestResult::pass(
                "bounds/modular",
                name,
                "no two elements share a modular group",
            ),
            Err(e) => TestResult::fail("bounds/modular", name, e.to_string()),
        },
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlat::{generate_lattice, GenerationOptions};

    #[test]
    fn generated_lattice_passes() {
        let def = modlat_catalog::lookup("3-2").expect("catalog entry");
        let c = generate_lattice(def, &GenerationOptions::default(), |_| {}).expect("generates");
        let report = validate("3-2", &c);
        assert_eq!(report.results.len(), 2);
        assert!(report.all_passed(), "{:#?}", report.results);
    }
}
