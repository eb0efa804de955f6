//! Generation controller.
//!
//! [`LatticeController`] owns the element table, the relation matrix and the
//! combination cache of one generation run. Each call to
//! [`LatticeController::create_new_element`] performs one step: it picks a
//! closure group of equivalent combinations, derives the group's relations,
//! and either registers a new element or attaches the group to an existing
//! one. Secondary aliases are then written to the cache so that later steps
//! do not re-derive combinations whose result is already implied.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use modlat_catalog::{LatticeDef, SeedRelation};
use tracing::{debug, info, trace};

use crate::core::{
    format_combinations, Combination, CombinationMap, ElementTable, Operator, Relation, RelationMap,
};
use crate::error::{LatticeError, Result};
use crate::expr::{
    combination_expression, complexity, expression_depth, expression_width, sort_by_complexity,
};
use crate::modular::{find_modular_alias_combinations, ModularResult};
use crate::relations::{
    create_new_element_relations, find_elements_between, find_new_element_alias_combination,
};

/// Seeds tried by one selection beyond the element capacity.
const BACKTRACK_MARGIN: usize = 100;

/// Result of one generation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A new element was registered.
    NewElement {
        /// Index of the new element.
        element: usize,
        /// Its closure group, defining combination first.
        combinations: Vec<Combination>,
    },
    /// The group turned out to equal an existing element.
    Alias {
        /// The existing element.
        element: usize,
        /// Combinations attached to it.
        combinations: Vec<Combination>,
    },
}

impl StepOutcome {
    /// Index of the element the step touched.
    #[must_use]
    pub fn element(&self) -> usize {
        match self {
            StepOutcome::NewElement { element, .. } | StepOutcome::Alias { element, .. } => *element,
        }
    }

    /// Returns true for a newly registered element.
    #[must_use]
    pub fn is_new_element(&self) -> bool {
        matches!(self, StepOutcome::NewElement { .. })
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::NewElement {
                element,
                combinations,
            } => write!(f, "{element}: {}", format_combinations(combinations)),
            StepOutcome::Alias {
                element,
                combinations,
            } => write!(f, "Alias: {} -> {element}", format_combinations(combinations)),
        }
    }
}

/// State of one generation run.
#[derive(Debug, Clone)]
pub struct LatticeController {
    pub(crate) max_elements: usize,
    pub(crate) generator_count: usize,
    pub(crate) table: ElementTable,
    pub(crate) relations: RelationMap,
    pub(crate) combinations: CombinationMap,
    backtrack_limit: usize,
    last_min_complexity: Option<u32>,
}

impl LatticeController {
    /// Creates a controller with the generators registered and the seed
    /// relations closed under transitivity.
    ///
    /// # Errors
    ///
    /// - [`LatticeError::CapacityExceeded`] if the generators do not fit.
    /// - [`LatticeError::UnknownElement`] if a seed names an unknown generator.
    /// - [`LatticeError::RelationCollision`] if the seeds contradict each other.
    pub fn new(max_elements: usize, generators: &[&str], seeds: &[SeedRelation]) -> Result<Self> {
        if generators.len() > max_elements {
            return Err(LatticeError::CapacityExceeded {
                what: "element table",
                requested: generators.len(),
                limit: max_elements,
            });
        }
        let mut table = ElementTable::new();
        for name in generators {
            table.add(name, true, None, 0, 1);
        }
        let mut relations = RelationMap::new(max_elements);
        relations.grow_to(table.len())?;
        for seed in seeds {
            let e1 = table.lookup(seed.first)?;
            let e2 = table.lookup(seed.second)?;
            relations.set(e1, e2, Relation::from(seed.order))?;
        }
        let closed = relations.complete_element_relation_chains()?;
        debug!(
            generators = generators.len(),
            seeds = seeds.len(),
            closed,
            "generators loaded"
        );
        Ok(Self {
            max_elements,
            generator_count: generators.len(),
            table,
            relations,
            combinations: CombinationMap::new(max_elements)?,
            backtrack_limit: max_elements + BACKTRACK_MARGIN,
            last_min_complexity: None,
        })
    }

    /// Creates a controller sized for a catalog entry.
    ///
    /// # Errors
    ///
    /// See [`LatticeController::new`].
    pub fn from_def(def: &LatticeDef) -> Result<Self> {
        Self::new(def.elements, def.generators, &def.relations)
    }

    /// Element capacity.
    #[must_use]
    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Number of generators; they occupy indices `0..generator_count`.
    #[must_use]
    pub fn generator_count(&self) -> usize {
        self.generator_count
    }

    /// Number of elements found so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true before any element is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The element table.
    #[must_use]
    pub fn element_table(&self) -> &ElementTable {
        &self.table
    }

    /// The relation matrix.
    #[must_use]
    pub fn relation_map(&self) -> &RelationMap {
        &self.relations
    }

    /// The combination cache.
    #[must_use]
    pub fn combination_map(&self) -> &CombinationMap {
        &self.combinations
    }

    /// Performs one generation step.
    ///
    /// Returns `None` once no unresolved combination is left, i.e. the
    /// lattice is complete.
    ///
    /// # Errors
    ///
    /// Any [`LatticeError`] raised by seed selection, relation derivation or
    /// alias propagation. The controller state is unusable afterwards.
    pub fn create_new_element(&mut self) -> Result<Option<StepOutcome>> {
        let Some(group) = self.find_new_element_combinations()? else {
            return Ok(None);
        };
        let mut combs = group.combinations;
        sort_by_complexity(&self.table, &mut combs);
        let derived = create_new_element_relations(&self.relations, &self.table, &combs, group.alias)?;
        let scanned = find_new_element_alias_combination(&self.table, &derived.relations);
        let alias = reconcile_aliases(derived.alias, scanned, &combs)?;

        let outcome = match alias {
            Some(element) => {
                self.register_alias_combinations(element, &combs, &derived.relations)?;
                self.process_secondary_aliases_for_target(element)?;
                StepOutcome::Alias {
                    element,
                    combinations: combs,
                }
            }
            None => {
                let element = self.register_new_element(&combs, &derived.relations)?;
                self.process_secondary_aliases_for_source(element)?;
                self.process_secondary_aliases_for_target(element)?;
                StepOutcome::NewElement {
                    element,
                    combinations: combs,
                }
            }
        };
        Ok(Some(outcome))
    }

    fn register_alias_combinations(
        &mut self,
        element: usize,
        combs: &[Combination],
        rels: &[Relation],
    ) -> Result<()> {
        for comb in combs {
            let expr = combination_expression(&self.table, comb, false);
            debug!(element, name = %self.table.get(element).name, alias = %expr, "alias");
            self.table.add_alias(element, expr, Some(*comb));
            self.combinations.set(comb, element)?;
        }
        let updates = self.relations.merge_row(element, rels)?;
        if updates > 0 {
            debug!(element, updates, "relations updated for alias");
        }
        Ok(())
    }

    fn register_new_element(&mut self, combs: &[Combination], rels: &[Relation]) -> Result<usize> {
        let n = self.table.len();
        if n >= self.max_elements {
            return Err(LatticeError::CapacityExceeded {
                what: "element table",
                requested: n + 1,
                limit: self.max_elements,
            });
        }
        let Some((&first, rest)) = combs.split_first() else {
            return Err(LatticeError::EmptyCombinationGroup);
        };
        let full = combination_expression(&self.table, &first, false);
        let simplified = combination_expression(&self.table, &first, true);
        let name = if rels.iter().all(|&r| r == Relation::Higher) {
            crate::core::TOP_NAME.to_string()
        } else if rels.iter().all(|&r| r == Relation::Lower) {
            crate::core::BOTTOM_NAME.to_string()
        } else {
            simplified.clone()
        };
        let depth = expression_depth(&self.table, first.e1, first.e2, first.op);
        let width = expression_width(&self.table, first.e1, first.e2);
        let no = self.table.add(&name, false, Some(first), depth, width);
        if simplified != name {
            self.table.add_alias(no, simplified.clone(), None);
        }
        if full != simplified {
            self.table.add_alias(no, full, None);
        }
        for comb in rest {
            let expr = combination_expression(&self.table, comb, true);
            self.table.add_alias(no, expr, Some(*comb));
        }
        for comb in combs {
            self.combinations.set(comb, no)?;
        }
        self.relations.add_row(rels)?;
        info!(
            element = no,
            name = %name,
            combinations = %format_combinations(combs),
            "new element"
        );
        Ok(no)
    }

    /// Picks the next closure group to register.
    ///
    /// Seeds are drawn from queued missing precursors first, then from each
    /// element's defining combination, and finally from the cheapest
    /// uncached pair of unrelated elements. A group with missing precursors
    /// is deferred; its precursors are queued in the hope that one of them
    /// resolves first.
    fn find_new_element_combinations(&mut self) -> Result<Option<ModularResult>> {
        let n = self.table.len();
        let limit = self.backtrack_limit;
        let mut checked: HashSet<Combination> = HashSet::new();
        let mut backlog: VecDeque<Combination> = VecDeque::new();
        let mut scanned = 0;
        let mut candidate: Option<ModularResult> = None;
        let mut iteration = 0;
        loop {
            let mut element = None;
            let mut seed = backlog.pop_front();
            if seed.is_none() && scanned < n {
                let no = scanned;
                scanned += 1;
                let Some(comb) = self.table.get(no).first_combination() else {
                    continue;
                };
                element = Some(no);
                seed = Some(comb);
            }
            let seed = match seed {
                Some(comb) => comb,
                None => {
                    if let Some(group) = candidate {
                        trace!(group = %format_combinations(&group.combinations), "selecting deferred candidate");
                        return Ok(Some(group));
                    }
                    if scanned != n {
                        return Err(LatticeError::WorklistExhausted);
                    }
                    scanned += 1;
                    match self.find_min_complex_new_element_combination() {
                        Some(comb) => comb,
                        None => return Ok(None),
                    }
                }
            };
            if checked.contains(&seed) {
                continue;
            }
            if iteration > limit {
                return Err(LatticeError::BacktrackLimitExceeded { limit });
            }
            iteration += 1;
            let group =
                find_modular_alias_combinations(seed, &self.table, &self.relations, &self.combinations)?;
            if let (Some(alias), Some(element)) = (group.alias, element) {
                if alias != element {
                    return Err(LatticeError::ConflictingModularAlias {
                        seed,
                        element,
                        alias,
                    });
                }
            }
            if group.is_resolved() {
                return Ok(Some(group));
            }
            checked.extend(group.combinations.iter().copied());
            backlog.extend(group.missing_precursors.iter().copied());
            if !group.combinations.is_empty() && candidate.is_none() {
                trace!(iteration, seed = %seed, "deferring candidate");
                candidate = Some(group);
            }
        }
    }

    /// Cheapest uncached combination of two unrelated elements.
    ///
    /// A combination as cheap as the previous minimum is taken at once,
    /// since nothing cheaper can appear.
    fn find_min_complex_new_element_combination(&mut self) -> Option<Combination> {
        let n = self.table.len();
        let mut best: Option<(u32, Combination)> = None;
        for e2 in 1..n {
            for e1 in 0..e2 {
                if self.relations.is_related(e1, e2) {
                    continue;
                }
                for op in Operator::ALL {
                    if self.combinations.get_pair(e1, e2, op).is_some() {
                        continue;
                    }
                    let c = complexity(&self.table, e1, e2, op);
                    let comb = Combination::new(e1, e2, op);
                    if Some(c) == self.last_min_complexity {
                        trace!(combination = %comb, complexity = c, "min complex combination");
                        return Some(comb);
                    }
                    if best.map_or(true, |(min, _)| c < min) {
                        best = Some((c, comb));
                    }
                }
            }
        }
        let (c, comb) = best?;
        trace!(combination = %comb, complexity = c, "min complex combination");
        self.last_min_complexity = Some(c);
        Some(comb)
    }

    fn cache_secondary_alias(&mut self, a: usize, b: usize, op: Operator, target: usize) -> Result<()> {
        match self.combinations.get_pair(a, b, op) {
            Some(existing) if existing == target => Ok(()),
            Some(existing) => Err(LatticeError::SecondaryAliasConflict {
                combination: Combination::new(a, b, op),
                existing,
                target,
            }),
            None => {
                trace!(combination = %Combination::new(a, b, op), target, "secondary alias");
                self.combinations.set_pair(a, b, op, target)
            }
        }
    }

    // Operand side of the interval between an operand and the target.
    fn operand_interval(&self, operand: usize, op: Operator, target: usize) -> Vec<usize> {
        let mut between = match op {
            Operator::Join => find_elements_between(&self.relations, operand, target),
            Operator::Meet => find_elements_between(&self.relations, target, operand),
        };
        between.push(operand);
        between
    }

    // For t = c1 op c2, every x1 op x2 with x1 in [c1, t] and x2 in [c2, t]
    // (dually for meet) also equals t.
    fn process_secondary_aliases_for_target(&mut self, target: usize) -> Result<()> {
        let combs = self.table.get(target).combinations.clone();
        for comb in combs {
            let a1 = self.operand_interval(comb.e1, comb.op, target);
            let a2 = self.operand_interval(comb.e2, comb.op, target);
            for &x1 in &a1 {
                for &x2 in &a2 {
                    self.cache_secondary_alias(x1, x2, comb.op, target)?;
                }
            }
        }
        Ok(())
    }

    fn process_secondary_aliases_for_source(&mut self, source: usize) -> Result<()> {
        for target in 0..self.table.len() {
            let rel = self.relations.get(target, source);
            if !rel.is_defined() {
                continue;
            }
            let combs = self.table.get(target).combinations.clone();
            for comb in combs {
                let bound = comb.op.relation();
                if bound != rel {
                    continue;
                }
                let start = if self.relations.get(source, comb.e1) == bound {
                    comb.e2
                } else if self.relations.get(source, comb.e2) == bound {
                    comb.e1
                } else {
                    continue;
                };
                for x in self.operand_interval(start, comb.op, target) {
                    self.cache_secondary_alias(source, x, comb.op, target)?;
                }
            }
        }
        Ok(())
    }
}

// The alias found by modular deduction and the one found by scanning the
// relation vector must agree when both exist.
fn reconcile_aliases(
    modular: Option<usize>,
    scanned: Option<usize>,
    combs: &[Combination],
) -> Result<Option<usize>> {
    match (modular, scanned) {
        (Some(modular), Some(scanned)) if modular != scanned => {
            Err(LatticeError::ConflictingAliasElements {
                modular,
                scanned,
                combinations: combs.to_vec(),
            })
        }
        (modular, scanned) => Ok(scanned.or(modular)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlat_catalog::SeedRelation;

    fn free3() -> LatticeController {
        LatticeController::new(28, &["a", "b", "c"], &[]).expect("valid generators")
    }

    #[test]
    fn seeds_are_closed_into_chains() {
        let seeds = [SeedRelation::lower("a", "b"), SeedRelation::lower("b", "c")];
        let c = LatticeController::new(13, &["a", "b", "c", "d"], &seeds).expect("valid seeds");
        assert_eq!(c.len(), 4);
        assert_eq!(c.generator_count(), 4);
        assert_eq!(c.relation_map().get(0, 2), Relation::Lower);
        assert_eq!(c.relation_map().get(3, 0), Relation::Undef);
    }

    #[test]
    fn unknown_seed_name_is_rejected() {
        let seeds = [SeedRelation::lower("a", "x")];
        let err = LatticeController::new(8, &["a", "b"], &seeds).expect_err("x is unknown");
        assert_eq!(
            err,
            LatticeError::UnknownElement {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn too_many_generators() {
        assert!(matches!(
            LatticeController::new(2, &["a", "b", "c"], &[]),
            Err(LatticeError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn first_steps_take_cheapest_combinations() {
        let mut c = free3();
        let s1 = c.create_new_element().expect("step").expect("not done");
        assert_eq!(
            s1,
            StepOutcome::NewElement {
                element: 3,
                combinations: vec![Combination::new(0, 1, Operator::Meet)],
            }
        );
        assert_eq!(s1.to_string(), "3: [0*1]");
        let s2 = c.create_new_element().expect("step").expect("not done");
        assert_eq!(s2.to_string(), "4: [0+1]");
        let t = c.element_table();
        assert_eq!(t.get(3).name, "a*b");
        assert_eq!(t.get(4).name, "a+b");
        assert_eq!(c.relation_map().get(3, 0), Relation::Lower);
        assert_eq!(c.relation_map().get(4, 3), Relation::Higher);
        assert_eq!(c.relation_map().get(4, 2), Relation::Undef);
    }

    #[test]
    fn secondary_aliases_are_cached() {
        let mut c = free3();
        for _ in 0..7 {
            c.create_new_element().expect("step");
        }
        // 9 = c*(a*b); a*c and b*c lie between it and c.
        assert_eq!(c.element_table().get(9).name, "0");
        assert_eq!(c.combination_map().get_pair(3, 5, Operator::Meet), Some(9));
        assert_eq!(c.combination_map().get_pair(3, 7, Operator::Meet), Some(9));
    }

    #[test]
    fn free_lattice_on_two_generators_completes() {
        let mut c = LatticeController::new(4, &["a", "b"], &[]).expect("valid generators");
        let mut steps = Vec::new();
        while let Some(step) = c.create_new_element().expect("step") {
            steps.push(step);
        }
        assert_eq!(c.len(), 4);
        assert_eq!(c.element_table().names(), ["a", "b", "0", "1"]);
        assert!(steps.iter().all(StepOutcome::is_new_element));
        assert_eq!(c.element_table().bottom(), Some(2));
        assert_eq!(c.element_table().top(), Some(3));
    }

    #[test]
    fn deduced_and_scanned_aliases_must_agree() {
        let combs = [Combination::new(0, 1, Operator::Join)];
        assert_eq!(reconcile_aliases(None, None, &combs), Ok(None));
        assert_eq!(reconcile_aliases(Some(4), None, &combs), Ok(Some(4)));
        assert_eq!(reconcile_aliases(None, Some(5), &combs), Ok(Some(5)));
        assert_eq!(reconcile_aliases(Some(5), Some(5), &combs), Ok(Some(5)));
        assert_eq!(
            reconcile_aliases(Some(4), Some(5), &combs),
            Err(LatticeError::ConflictingAliasElements {
                modular: 4,
                scanned: 5,
                combinations: combs.to_vec(),
            })
        );
    }

    #[test]
    fn seed_selection_budget() {
        let mut c = free3();
        c.create_new_element().expect("step");
        // The second step first re-checks a*b, which is already cached, and
        // needs a second seed to make progress.
        c.backtrack_limit = 0;
        assert_eq!(
            c.create_new_element(),
            Err(LatticeError::BacktrackLimitExceeded { limit: 0 })
        );
    }

    #[test]
    fn secondary_alias_must_match_cache() {
        let mut c = free3();
        c.create_new_element().expect("step");
        assert_eq!(c.cache_secondary_alias(1, 0, Operator::Meet, 3), Ok(()));
        assert_eq!(
            c.cache_secondary_alias(0, 1, Operator::Meet, 2),
            Err(LatticeError::SecondaryAliasConflict {
                combination: Combination::new(0, 1, Operator::Meet),
                existing: 3,
                target: 2,
            })
        );
    }

    #[test]
    fn empty_group_is_not_registered() {
        let mut c = free3();
        let rels = vec![Relation::Undef; c.len()];
        assert_eq!(
            c.register_new_element(&[], &rels),
            Err(LatticeError::EmptyCombinationGroup)
        );
        assert_eq!(c.len(), 3);
    }
}
