//! Modular-law alias deduction.
//!
//! In a modular lattice `a ≤ b ⇒ a + (b * x) = b * (a + x)`, and dually
//! `a ≥ b ⇒ a * (b + x) = b + (a * x)`. Starting from a seed combination,
//! every combination forced equal to it by repeated use of the law is
//! collected into one closure group. If any member of the group is already
//! resolved, the whole group is an alias of that element.
//!
//! The search walks an explicit stack. A member whose derived precursor
//! `a + x` is still unknown cannot be expanded further and is reported as a
//! missing precursor instead.

use std::collections::HashSet;

use tracing::trace;

use crate::core::{format_combinations, Combination, CombinationMap, ElementTable, RelationMap};
use crate::error::{LatticeError, Result};
use crate::relations::evaluate_simple;

/// Maximum depth of the deduction stack.
pub const MAX_DEPTH: usize = 500;

/// Closure group found for a seed combination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModularResult {
    /// Group members not yet tied to an element, seed first.
    pub combinations: Vec<Combination>,
    /// Precursors `a + x` whose result is still unknown.
    pub missing_precursors: Vec<Combination>,
    /// Existing element the group equals, if any.
    pub alias: Option<usize>,
}

impl ModularResult {
    /// Returns true if the group can be registered now: it has members, and
    /// either nothing is missing or the alias is already known.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.combinations.is_empty() && (self.missing_precursors.is_empty() || self.alias.is_some())
    }
}

// (a, b, x) triples still to try for one combination on the stack.
struct Frame {
    comb: Combination,
    triples: Vec<(usize, usize, usize)>,
    next: usize,
}

impl Frame {
    fn new(comb: Combination, table: &ElementTable) -> Self {
        let mut triples = Vec::new();
        for (a, other) in [(comb.e1, comb.e2), (comb.e2, comb.e1)] {
            for c2 in &table.get(other).combinations {
                if c2.op == comb.op {
                    continue;
                }
                triples.push((a, c2.e1, c2.e2));
                triples.push((a, c2.e2, c2.e1));
            }
        }
        Self {
            comb,
            triples,
            next: 0,
        }
    }
}

fn resolve(rm: &RelationMap, cm: &CombinationMap, comb: &Combination) -> Option<usize> {
    evaluate_simple(rm, comb).or_else(|| cm.get(comb))
}

/// Collects the closure group of `seed` under the modular law.
///
/// # Errors
///
/// - [`LatticeError::MultipleModularAliases`] if the group resolves to two
///   different elements.
/// - [`LatticeError::ModularRecursionOverflow`] if the stack exceeds
///   [`MAX_DEPTH`].
pub fn find_modular_alias_combinations(
    seed: Combination,
    table: &ElementTable,
    rm: &RelationMap,
    cm: &CombinationMap,
) -> Result<ModularResult> {
    collect_closure(seed, table, rm, cm, MAX_DEPTH)
}

fn collect_closure(
    seed: Combination,
    table: &ElementTable,
    rm: &RelationMap,
    cm: &CombinationMap,
    max_depth: usize,
) -> Result<ModularResult> {
    let mut result = ModularResult::default();
    match cm.get(&seed) {
        Some(no) => result.alias = Some(no),
        None => result.combinations.push(seed),
    }
    let mut processed: HashSet<Combination> = HashSet::from([seed]);
    let mut stack = vec![Frame::new(seed, table)];

    while let Some(frame) = stack.last_mut() {
        let Some(&(a, b, x)) = frame.triples.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let op = frame.comb.op;
        if rm.get(a, b) != -op.relation() {
            continue;
        }
        // comb3 is (a + x), comb4 is b * (a + x).
        let comb3 = Combination::new(a, x, op);
        let Some(e3) = resolve(rm, cm, &comb3) else {
            if !result.missing_precursors.contains(&comb3) {
                result.missing_precursors.push(comb3);
            }
            continue;
        };
        let comb4 = Combination::new(b, e3, op.dual());
        if !processed.insert(comb4) {
            continue;
        }
        match resolve(rm, cm, &comb4) {
            Some(e4) => match result.alias {
                Some(known) if known != e4 => {
                    return Err(LatticeError::MultipleModularAliases {
                        seed,
                        first: known,
                        second: e4,
                    });
                }
                _ => result.alias = Some(e4),
            },
            None => result.combinations.push(comb4),
        }
        if stack.len() >= max_depth {
            return Err(LatticeError::ModularRecursionOverflow {
                seed,
                current: comb4,
                limit: max_depth,
            });
        }
        stack.push(Frame::new(comb4, table));
    }

    trace!(
        seed = %seed,
        group = %format_combinations(&result.combinations),
        missing = %format_combinations(&result.missing_precursors),
        alias = ?result.alias,
        "modular closure"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Operator, Relation};
    use crate::relations;

    // a < b, c unrelated, with b*c and optionally a+c registered.
    fn setup_with(register_ac: bool) -> (ElementTable, RelationMap, CombinationMap) {
        let mut t = ElementTable::new();
        for name in ["a", "b", "c"] {
            t.add(name, true, None, 0, 1);
        }
        let mut rm = RelationMap::new(16);
        rm.grow_to(3).expect("capacity");
        rm.set(0, 1, Relation::Lower).expect("a<b");
        let mut cm = CombinationMap::new(16).expect("capacity");

        let mut combs = vec![("b*c", Combination::new(1, 2, Operator::Meet))];
        if register_ac {
            combs.push(("a+c", Combination::new(0, 2, Operator::Join)));
        }
        for (name, comb) in combs {
            let rels = relations::combination_relations(&rm, &t, &comb);
            let no = t.add(name, false, Some(comb), 0, 2);
            rm.add_row(&rels).expect("capacity");
            cm.set(&comb, no).expect("capacity");
        }
        (t, rm, cm)
    }

    fn setup() -> (ElementTable, RelationMap, CombinationMap) {
        setup_with(true)
    }

    #[test]
    fn modular_law_groups_both_sides() {
        let (t, rm, cm) = setup();
        // a + (b*c) = b * (a+c)
        let seed = Combination::new(0, 3, Operator::Join);
        let r = find_modular_alias_combinations(seed, &t, &rm, &cm).expect("deduction");
        assert_eq!(r.alias, None);
        assert_eq!(
            r.combinations,
            [seed, Combination::new(1, 4, Operator::Meet)]
        );
        assert!(r.missing_precursors.is_empty());
        assert!(r.is_resolved());
    }

    #[test]
    fn cached_seed_is_its_own_alias() {
        let (t, rm, cm) = setup();
        let seed = Combination::new(0, 2, Operator::Join);
        let r = find_modular_alias_combinations(seed, &t, &rm, &cm).expect("deduction");
        assert_eq!(r.alias, Some(4));
        assert!(r.combinations.is_empty());
        assert!(!r.is_resolved());
    }

    #[test]
    fn unresolved_precursor_is_reported() {
        let (t, rm, cm) = setup_with(false);
        let seed = Combination::new(0, 3, Operator::Join);
        let r = find_modular_alias_combinations(seed, &t, &rm, &cm).expect("deduction");
        assert_eq!(r.combinations, [seed]);
        assert_eq!(
            r.missing_precursors,
            [Combination::new(0, 2, Operator::Join)]
        );
        assert!(!r.is_resolved());
    }

    #[test]
    fn group_resolving_to_two_elements() {
        let (t, rm, mut cm) = setup();
        // Cache a + (b*c) and b * (a+c) to different elements.
        let seed = Combination::new(0, 3, Operator::Join);
        cm.set(&seed, 2).expect("capacity");
        cm.set(&Combination::new(1, 4, Operator::Meet), 3).expect("capacity");
        assert_eq!(
            find_modular_alias_combinations(seed, &t, &rm, &cm),
            Err(LatticeError::MultipleModularAliases {
                seed,
                first: 2,
                second: 3,
            })
        );
    }

    #[test]
    fn deduction_stack_is_capped() {
        let (t, rm, cm) = setup();
        let seed = Combination::new(0, 3, Operator::Join);
        assert_eq!(
            collect_closure(seed, &t, &rm, &cm, 1),
            Err(LatticeError::ModularRecursionOverflow {
                seed,
                current: Combination::new(1, 4, Operator::Meet),
                limit: 1,
            })
        );
        assert!(collect_closure(seed, &t, &rm, &cm, 2).is_ok());
    }
}
