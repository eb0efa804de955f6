//! Relation derivation and order queries.
//!
//! The central operation is [`create_new_element_relations`], which computes
//! the relation vector of a not-yet-registered element (or alias group)
//! against every existing element. A relation vector `rels` stores
//! `rels[e] = rel(new, e)`.
//!
//! Two rule families are alternated until neither makes progress:
//!
//! - **Forward**: from the combination's own operands. For `x = a+b`, every
//!   element above both operands lies above `x`, and every element below one
//!   of them lies below `x`.
//! - **Reverse**: from the combinations of existing elements. If `e3 = c+d` and
//!   `x` is above both `c` and `d`, then `x` is above `e3`. A relation found
//!   this way is transported to every element already on the same side of
//!   `e3`.

use crate::core::{Combination, ElementTable, Operator, Relation, RelationMap};
use crate::error::{LatticeError, Result};

/// Relation of the combination `c1 op c2` to `e3`, given `r31 = rel(e3, c1)`
/// and `r32 = rel(e3, c2)`.
///
/// For a join: `e3` above both operands puts the join below `e3`; `e3` below
/// either operand puts the join above `e3`. Meet is the dual.
#[inline]
#[must_use]
pub fn gen_combination_relation(r31: Relation, r32: Relation, op: Operator) -> Relation {
    let bound = op.relation();
    if r31 == bound && r32 == bound {
        -bound
    } else if r31 == -bound || r32 == -bound {
        bound
    } else {
        Relation::Undef
    }
}

/// Evaluates a combination whose result is one of its operands.
///
/// Returns the operand for `a op a` and for comparable operands, `None`
/// otherwise.
#[inline]
#[must_use]
pub fn evaluate_simple(rm: &RelationMap, comb: &Combination) -> Option<usize> {
    if comb.e1 == comb.e2 {
        return Some(comb.e1);
    }
    match rm.get(comb.e1, comb.e2) {
        Relation::Undef => None,
        rel if rel == comb.op.relation() => Some(comb.e1),
        _ => Some(comb.e2),
    }
}

fn complete_forward(rels: &mut [Relation], rm: &RelationMap, comb: &Combination) -> usize {
    let bound = comb.op.relation();
    let mut updates = 0;
    for e3 in 0..rels.len() {
        if rels[e3].is_defined() {
            continue;
        }
        let rel = if comb.has_operand(e3) {
            bound
        } else {
            gen_combination_relation(rm.get(e3, comb.e1), rm.get(e3, comb.e2), comb.op)
        };
        if rel.is_defined() {
            rels[e3] = rel;
            updates += 1;
        }
    }
    updates
}

// Relation of (a1 op a2) to (b1 op b2) by operand-wise monotonicity.
fn operand_relation(rm: &RelationMap, a1: usize, a2: usize, b1: usize, b2: usize) -> Relation {
    let r1 = rm.get(a1, b1);
    let r2 = rm.get(a2, b2);
    if a1 == b1 {
        r2
    } else if a2 == b2 || r1 == r2 {
        r1
    } else {
        Relation::Undef
    }
}

fn same_operator_relation(rm: &RelationMap, comb: &Combination, other: &Combination) -> Relation {
    if comb.op != other.op {
        return Relation::Undef;
    }
    let straight = operand_relation(rm, comb.e1, comb.e2, other.e1, other.e2);
    if straight.is_defined() {
        return straight;
    }
    operand_relation(rm, comb.e1, comb.e2, other.e2, other.e1)
}

fn reverse_relation(
    rm: &RelationMap,
    table: &ElementTable,
    comb: &Combination,
    rels: &[Relation],
    e3: usize,
) -> Relation {
    for c2 in &table.get(e3).combinations {
        let r = gen_combination_relation(rels[c2.e1], rels[c2.e2], c2.op);
        if r.is_defined() {
            return -r;
        }
        let r = same_operator_relation(rm, comb, c2);
        if r.is_defined() {
            return r;
        }
    }
    Relation::Undef
}

fn complete_reverse(
    rels: &mut [Relation],
    rm: &RelationMap,
    table: &ElementTable,
    comb: &Combination,
) -> usize {
    let n = rels.len();
    let mut updates = 0;
    for e3 in 0..n {
        if rels[e3].is_defined() {
            continue;
        }
        let rel = reverse_relation(rm, table, comb, rels, e3);
        if !rel.is_defined() {
            continue;
        }
        rels[e3] = rel;
        updates += 1;
        let row = rm.row(e3);
        for e4 in 0..n {
            if !rels[e4].is_defined() && row[e4] == rel {
                rels[e4] = rel;
                updates += 1;
            }
        }
    }
    updates
}

/// Relation vector of a single combination against all existing elements.
#[must_use]
pub fn combination_relations(
    rm: &RelationMap,
    table: &ElementTable,
    comb: &Combination,
) -> Vec<Relation> {
    let mut rels = vec![Relation::Undef; rm.len()];
    let mut pass = 0;
    loop {
        pass += 1;
        let forward = complete_forward(&mut rels, rm, comb);
        if forward == 0 && pass > 1 {
            break;
        }
        let reverse = complete_reverse(&mut rels, rm, table, comb);
        if reverse == 0 && (pass > 1 || forward == 0) {
            break;
        }
    }
    rels
}

/// Relation vector of an alias group, plus the alias the merge settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRelations {
    /// `relations[e] = rel(group, e)`.
    pub relations: Vec<Relation>,
    /// Existing element the group collapses onto, if any.
    pub alias: Option<usize>,
}

/// Computes the relation vector of a group of equivalent combinations.
///
/// Component vectors are merged element by element. When two components
/// disagree on an element and no alias is known yet, that element is the
/// group itself and becomes the alias.
///
/// # Errors
///
/// Returns [`LatticeError::ConflictingGroupRelations`] when components
/// disagree although an alias is already known.
pub fn create_new_element_relations(
    rm: &RelationMap,
    table: &ElementTable,
    combs: &[Combination],
    alias: Option<usize>,
) -> Result<GroupRelations> {
    let vectors: Vec<Vec<Relation>> = combs
        .iter()
        .map(|c| combination_relations(rm, table, c))
        .collect();
    let mut alias = alias;
    let mut relations = vec![Relation::Undef; rm.len()];
    let Some((first, rest)) = vectors.split_first() else {
        return Ok(GroupRelations { relations, alias });
    };
    for e in 0..relations.len() {
        if alias == Some(e) {
            continue;
        }
        let mut rel = first[e];
        for v in rest {
            let rel2 = v[e];
            if !rel2.is_defined() || rel2 == rel {
                continue;
            }
            if !rel.is_defined() {
                rel = rel2;
                continue;
            }
            match alias {
                None => {
                    alias = Some(e);
                    rel = Relation::Undef;
                    break;
                }
                Some(known) => {
                    return Err(LatticeError::ConflictingGroupRelations {
                        element: e,
                        combinations: combs.to_vec(),
                        alias: known,
                    });
                }
            }
        }
        relations[e] = rel;
    }
    Ok(GroupRelations { relations, alias })
}

/// Finds an element one of whose combinations is consistent with `rels`.
///
/// Element `e` with combination `c` matches when `rels[e]` is defined and `c`
/// places `e` on the same side of the new element as `rels` places the new
/// element of `e`. Both orders holding at once means the two are equal.
/// Returns the first match in table order.
#[must_use]
pub fn find_new_element_alias_combination(
    table: &ElementTable,
    rels: &[Relation],
) -> Option<usize> {
    table.iter().enumerate().find_map(|(no, e)| {
        let rel4 = rels[no];
        if !rel4.is_defined() {
            return None;
        }
        e.combinations
            .iter()
            .any(|c| gen_combination_relation(rels[c.e1], rels[c.e2], c.op) == rel4)
            .then_some(no)
    })
}

/// Outcome of evaluating a meet or join from the relation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The unique infimum or supremum.
    Found(usize),
    /// The operands have no common bound yet.
    Missing,
    /// Several incomparable extremal candidates.
    Ambiguous,
}

impl core::fmt::Display for Bound {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Bound::Found(no) => write!(f, "{no}"),
            Bound::Missing => f.write_str("missing"),
            Bound::Ambiguous => f.write_str("ambiguous"),
        }
    }
}

/// Evaluates `e1 op e2` from the relation matrix alone.
///
/// Comparable operands evaluate to the extremal one. Otherwise the common
/// bounds on the operator's side are collected and their unique extremal
/// element is returned: the greatest common lower bound for meet, the least
/// common upper bound for join.
#[must_use]
pub fn find_infimum_or_supremum(rm: &RelationMap, e1: usize, e2: usize, op: Operator) -> Bound {
    if e1 == e2 {
        return Bound::Found(e1);
    }
    let bound = op.relation();
    let rel12 = rm.get(e1, e2);
    if rel12.is_defined() {
        return Bound::Found(if rel12 == bound { e1 } else { e2 });
    }
    let candidates: Vec<usize> = (0..rm.len())
        .filter(|&e3| rm.get(e3, e1) == bound && rm.get(e3, e2) == bound)
        .collect();
    let Some((&first, rest)) = candidates.split_first() else {
        return Bound::Missing;
    };
    // Tournament: keep the candidate furthest towards the operands.
    let toward = -bound;
    let best = rest
        .iter()
        .fold(first, |best, &x| if rm.get(x, best) == toward { x } else { best });
    if candidates
        .iter()
        .all(|&x| x == best || rm.get(best, x) == toward)
    {
        Bound::Found(best)
    } else {
        Bound::Ambiguous
    }
}

/// Covering neighbours of `no` on the `rel` side.
///
/// With [`Relation::Higher`] these are the elements covering `no`; with
/// [`Relation::Lower`] the elements `no` covers. A running minimal antichain
/// is maintained: a candidate beyond an accepted one is skipped, and accepted
/// ones beyond the candidate are dropped.
#[must_use]
pub fn find_direct_predecessors(rm: &RelationMap, no: usize, rel: Relation) -> Vec<usize> {
    let row = rm.row(no);
    let mut out: Vec<usize> = Vec::new();
    for (e2, &r) in row.iter().enumerate() {
        if -r != rel {
            continue;
        }
        if out.iter().any(|&e3| rm.get(e2, e3) == rel) {
            continue;
        }
        out.retain(|&e3| rm.get(e2, e3) != -rel);
        out.push(e2);
    }
    out
}

/// Elements strictly between `lower` and `upper`.
#[must_use]
pub fn find_elements_between(rm: &RelationMap, lower: usize, upper: usize) -> Vec<usize> {
    let r1 = rm.row(lower);
    let r2 = rm.row(upper);
    (0..rm.len())
        .filter(|&e| r1[e] == Relation::Lower && r2[e] == Relation::Higher)
        .collect()
}

/// Recomputes each element's relations from all its combinations and merges
/// them into the matrix. Returns the number of new relations; a complete
/// matrix yields 0.
///
/// # Errors
///
/// Returns an error if the recomputed relations contradict the matrix.
pub fn update_all_element_relations(rm: &mut RelationMap, table: &ElementTable) -> Result<usize> {
    let mut updates = 0;
    for (no, e) in table.iter().enumerate() {
        if e.combinations.is_empty() {
            continue;
        }
        let group = create_new_element_relations(rm, table, &e.combinations, Some(no))?;
        updates += rm.merge_row(no, &group.relations)?;
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Relation::{Higher, Lower, Undef};

    // a < b, c unrelated, plus d = a+c.
    fn setup() -> (RelationMap, ElementTable) {
        let mut t = ElementTable::new();
        for name in ["a", "b", "c"] {
            t.add(name, true, None, 0, 1);
        }
        let mut rm = RelationMap::new(16);
        rm.grow_to(3).expect("capacity");
        rm.set(0, 1, Lower).expect("a<b");
        let comb = Combination::new(0, 2, Operator::Join);
        let rels = combination_relations(&rm, &t, &comb);
        t.add("a+c", false, Some(comb), 0, 2);
        rm.add_row(&rels).expect("capacity");
        (rm, t)
    }

    #[test]
    fn gen_relation_rules() {
        let op = Operator::Join;
        assert_eq!(gen_combination_relation(Higher, Higher, op), Lower);
        assert_eq!(gen_combination_relation(Lower, Undef, op), Higher);
        assert_eq!(gen_combination_relation(Higher, Undef, op), Undef);
        assert_eq!(gen_combination_relation(Lower, Lower, Operator::Meet), Higher);
        assert_eq!(gen_combination_relation(Higher, Undef, Operator::Meet), Lower);
    }

    #[test]
    fn join_is_above_operands() {
        let (rm, _) = setup();
        assert_eq!(rm.row(3), &[Higher, Undef, Higher, Undef]);
    }

    #[test]
    fn simple_evaluation() {
        let (rm, _) = setup();
        assert_eq!(evaluate_simple(&rm, &Combination::new(0, 1, Operator::Join)), Some(1));
        assert_eq!(evaluate_simple(&rm, &Combination::new(0, 1, Operator::Meet)), Some(0));
        assert_eq!(evaluate_simple(&rm, &Combination::new(2, 2, Operator::Meet)), Some(2));
        assert_eq!(evaluate_simple(&rm, &Combination::new(1, 2, Operator::Meet)), None);
    }

    #[test]
    fn bound_evaluation() {
        let (rm, _) = setup();
        assert_eq!(find_infimum_or_supremum(&rm, 0, 2, Operator::Join), Bound::Found(3));
        assert_eq!(find_infimum_or_supremum(&rm, 1, 0, Operator::Join), Bound::Found(1));
        assert_eq!(find_infimum_or_supremum(&rm, 1, 2, Operator::Join), Bound::Missing);
        assert_eq!(find_infimum_or_supremum(&rm, 0, 2, Operator::Meet), Bound::Missing);
        assert_eq!(Bound::Ambiguous.to_string(), "ambiguous");
    }

    #[test]
    fn ambiguous_bounds_are_reported() {
        // Two incomparable common upper bounds of a and b.
        let mut rm = RelationMap::new(4);
        rm.grow_to(4).expect("capacity");
        for upper in [2, 3] {
            rm.set(0, upper, Lower).expect("a below");
            rm.set(1, upper, Lower).expect("b below");
        }
        assert_eq!(find_infimum_or_supremum(&rm, 0, 1, Operator::Join), Bound::Ambiguous);
        assert_eq!(find_infimum_or_supremum(&rm, 2, 3, Operator::Meet), Bound::Ambiguous);
    }

    #[test]
    fn covering_neighbours() {
        let (rm, _) = setup();
        assert_eq!(find_direct_predecessors(&rm, 0, Higher), vec![1, 3]);
        assert_eq!(find_direct_predecessors(&rm, 3, Lower), vec![0, 2]);
        assert!(find_direct_predecessors(&rm, 1, Higher).is_empty());
    }

    #[test]
    fn elements_between() {
        let mut rm = RelationMap::new(4);
        rm.grow_to(4).expect("capacity");
        rm.set(0, 1, Lower).expect("0<1");
        rm.set(1, 2, Lower).expect("1<2");
        rm.set(0, 3, Lower).expect("0<3");
        rm.complete_element_relation_chains().expect("closure");
        assert_eq!(find_elements_between(&rm, 0, 2), vec![1]);
        assert!(find_elements_between(&rm, 1, 2).is_empty());
    }

    #[test]
    fn reverse_rule_places_new_meet() {
        // (a+c)*b: below b and below a+c, above a.
        let (rm, t) = setup();
        let rels = combination_relations(&rm, &t, &Combination::new(1, 3, Operator::Meet));
        assert_eq!(rels, [Higher, Lower, Undef, Lower]);
    }

    #[test]
    fn group_disagreement_selects_alias() {
        let (rm, t) = setup();
        // The two combinations disagree on b, so the group collapses onto b.
        let combs = [
            Combination::new(1, 3, Operator::Meet),
            Combination::new(0, 1, Operator::Join),
        ];
        let group = create_new_element_relations(&rm, &t, &combs, None).expect("no alias yet");
        assert_eq!(group.alias, Some(1));
        assert_eq!(group.relations[1], Undef);

        let err = create_new_element_relations(&rm, &t, &combs, Some(2)).unwrap_err();
        assert!(matches!(err, LatticeError::ConflictingGroupRelations { element: 1, .. }));
    }

    #[test]
    fn alias_scan_matches_existing_combination() {
        let (rm, t) = setup();
        // c+a recomputed: the vector puts it below a+c while a+c's own
        // combination puts a+c below it, so they are equal.
        let rels = combination_relations(&rm, &t, &Combination::new(2, 0, Operator::Join));
        assert_eq!(rels, [Higher, Undef, Higher, Lower]);
        assert_eq!(find_new_element_alias_combination(&t, &rels), Some(3));
        let rels = combination_relations(&rm, &t, &Combination::new(1, 3, Operator::Meet));
        assert_eq!(find_new_element_alias_combination(&t, &rels), None);
    }

    #[test]
    fn update_all_on_complete_matrix_is_noop() {
        let (mut rm, t) = setup();
        assert_eq!(update_all_element_relations(&mut rm, &t), Ok(0));
    }
}
