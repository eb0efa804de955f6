//! Consistency checks over a generated (or partially generated) lattice.
//!
//! The two verification passes re-derive facts the generator committed to
//! and fail on the first disagreement. The relation checks are development
//! aids: they re-run closure steps and report whether anything was still
//! missing.

use tracing::{debug, warn};

use crate::controller::LatticeController;
use crate::core::{format_combinations, CombinationMap, ElementTable, RelationMap};
use crate::error::{LatticeError, Result};
use crate::modular::find_modular_alias_combinations;
use crate::relations::{find_infimum_or_supremum, update_all_element_relations, Bound};

/// Re-evaluates every combination of every element from the relation matrix.
///
/// # Errors
///
/// Returns [`LatticeError::PrimaryBoundDrift`] for the first combination that
/// no longer evaluates to its element.
pub fn verify_primary_bounds(table: &ElementTable, rm: &RelationMap) -> Result<()> {
    for (no, e) in table.iter().enumerate() {
        for &comb in &e.combinations {
            let bound = find_infimum_or_supremum(rm, comb.e1, comb.e2, comb.op);
            if bound != Bound::Found(no) {
                return Err(LatticeError::PrimaryBoundDrift {
                    element: no,
                    name: e.name.clone(),
                    combination: comb,
                    found: bound.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Re-runs modular deduction from every element's defining combination.
///
/// # Errors
///
/// - [`LatticeError::DuplicateModularElements`] if a closure group reaches a
///   second element.
/// - Errors from [`find_modular_alias_combinations`].
pub fn verify_modular_groups(table: &ElementTable, rm: &RelationMap, cm: &CombinationMap) -> Result<()> {
    for (no, e) in table.iter().enumerate() {
        let Some(comb) = e.first_combination() else {
            continue;
        };
        let group = find_modular_alias_combinations(comb, table, rm, cm)?;
        if !group.missing_precursors.is_empty() {
            debug!(
                element = %e.name,
                missing = %format_combinations(&group.missing_precursors),
                "possibly incomplete modular group"
            );
        }
        if let Some(alias) = group.alias.filter(|&alias| alias != no) {
            return Err(LatticeError::DuplicateModularElements {
                element: no,
                name: e.name.clone(),
                alias,
            });
        }
        if !group.combinations.is_empty() {
            debug!(
                element = %e.name,
                combinations = %format_combinations(&group.combinations),
                "missing modular combinations"
            );
        }
    }
    Ok(())
}

/// Runs the chain completion and the full relation update and fails if
/// either adds a relation.
///
/// # Errors
///
/// Returns [`LatticeError::IncompleteRelations`] naming the check that made
/// updates, or a relation error if a re-derived relation contradicts the
/// matrix.
pub fn check_relations(rm: &mut RelationMap, table: &ElementTable) -> Result<()> {
    let updates = rm.complete_element_relation_chains()?;
    if updates > 0 {
        warn!(updates, "incomplete relation chains detected");
        return Err(LatticeError::IncompleteRelations {
            kind: "relation chains",
            updates,
        });
    }
    let updates = update_all_element_relations(rm, table)?;
    if updates > 0 {
        warn!(updates, "incomplete element relations detected");
        return Err(LatticeError::IncompleteRelations {
            kind: "element relations",
            updates,
        });
    }
    Ok(())
}

impl LatticeController {
    /// Runs both verification passes: modular groups, then primary bounds.
    ///
    /// # Errors
    ///
    /// See [`verify_modular_groups`] and [`verify_primary_bounds`].
    pub fn verify_lattice_consistency(&self) -> Result<()> {
        verify_modular_groups(&self.table, &self.relations, &self.combinations)?;
        verify_primary_bounds(&self.table, &self.relations)
    }

    /// Runs the development relation checks on the controller's matrix.
    ///
    /// # Errors
    ///
    /// See [`check_relations`].
    pub fn check_relations(&mut self) -> Result<()> {
        check_relations(&mut self.relations, &self.table)
    }
}
