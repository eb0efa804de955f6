//! Dense relation matrix between elements.
//!
//! The matrix is `max_elements × max_elements` with one byte per cell and is
//! sized once at construction. The live size `n` only grows. Every write
//! stores both `rel(a,b)` and `rel(b,a) = -rel(a,b)`, so the matrix stays
//! antisymmetric. A defined cell is never changed.

use super::relation::Relation;
use crate::error::{LatticeError, Result};

/// Antisymmetric relation matrix.
#[derive(Debug, Clone)]
pub struct RelationMap {
    max_elements: usize,
    n: usize,
    defined: usize,
    cells: Vec<Relation>,
}

impl RelationMap {
    /// Creates an empty map with room for `max_elements` rows.
    #[must_use]
    pub fn new(max_elements: usize) -> Self {
        Self {
            max_elements,
            n: 0,
            defined: 0,
            cells: vec![Relation::Undef; max_elements * max_elements],
        }
    }

    /// Number of live rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns true if no row is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Row capacity.
    #[must_use]
    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Number of defined unordered pairs.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.defined
    }

    /// Grows the live size to `n` rows of undefined relations.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::CapacityExceeded`] if `n` exceeds the capacity.
    pub fn grow_to(&mut self, n: usize) -> Result<()> {
        if n > self.max_elements {
            return Err(LatticeError::CapacityExceeded {
                what: "relation map",
                requested: n,
                limit: self.max_elements,
            });
        }
        self.n = self.n.max(n);
        Ok(())
    }

    /// Relation of `a` to `b`.
    #[inline]
    #[must_use]
    pub fn get(&self, a: usize, b: usize) -> Relation {
        self.cells[a * self.max_elements + b]
    }

    /// Returns true if `a` and `b` are comparable.
    #[inline]
    #[must_use]
    pub fn is_related(&self, a: usize, b: usize) -> bool {
        self.get(a, b).is_defined()
    }

    /// Live row of `no`: `row(no)[j] == get(no, j)`.
    #[inline]
    #[must_use]
    pub fn row(&self, no: usize) -> &[Relation] {
        let p = no * self.max_elements;
        &self.cells[p..p + self.n]
    }

    /// Sets `rel(a,b)` and `rel(b,a)`.
    ///
    /// # Errors
    ///
    /// - [`LatticeError::InvalidSelfRelation`] for `a == b` with a defined `rel`.
    /// - [`LatticeError::RelationCollision`] if a different relation is stored.
    pub fn set(&mut self, a: usize, b: usize, rel: Relation) -> Result<()> {
        if a == b {
            if rel.is_defined() {
                return Err(LatticeError::InvalidSelfRelation { element: a });
            }
            return Ok(());
        }
        let i1 = a * self.max_elements + b;
        let old = self.cells[i1];
        if old == rel {
            return Ok(());
        }
        if old.is_defined() {
            return Err(LatticeError::RelationCollision {
                e1: a,
                e2: b,
                old,
                new: rel,
            });
        }
        self.cells[i1] = rel;
        self.cells[b * self.max_elements + a] = -rel;
        self.defined += 1;
        Ok(())
    }

    /// Appends a row for a new element and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::CapacityExceeded`] when the map is full.
    pub fn add_row(&mut self, rels: &[Relation]) -> Result<usize> {
        debug_assert_eq!(rels.len(), self.n);
        let no = self.n;
        self.grow_to(no + 1)?;
        for (j, &rel) in rels.iter().enumerate().take(no) {
            self.set(no, j, rel)?;
        }
        Ok(no)
    }

    /// Merges `rels` into row `no` and returns the number of newly set cells.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::RelationMergeConflict`] if a stored relation
    /// disagrees with a defined candidate.
    pub fn merge_row(&mut self, no: usize, rels: &[Relation]) -> Result<usize> {
        debug_assert_eq!(rels.len(), self.n);
        let mut updates = 0;
        for (j, &rel2) in rels.iter().enumerate().take(self.n) {
            if j == no {
                continue;
            }
            let rel1 = self.get(no, j);
            let merged = rel1.merge(rel2).ok_or(LatticeError::RelationMergeConflict {
                e1: no,
                e2: j,
                rel1,
                rel2,
            })?;
            if merged != rel1 {
                self.set(no, j, merged)?;
                updates += 1;
            }
        }
        Ok(updates)
    }

    /// Returns the first element whose row equals `rels`.
    ///
    /// With `ignore_self`, the diagonal cell is skipped.
    #[must_use]
    pub fn find_row(&self, rels: &[Relation], ignore_self: bool) -> Option<usize> {
        (0..self.n).find(|&no| {
            self.row(no)
                .iter()
                .zip(rels)
                .enumerate()
                .all(|(j, (a, b))| (ignore_self && j == no) || a == b)
        })
    }

    /// Fills in relations implied by transitivity until a pass makes no update.
    ///
    /// For each comparable pair `(e1, e2)` and each third element `e3`:
    /// `e1 < e2 ∧ e2 < e3 ⇒ e1 < e3` and `e1 < e2 ∧ e3 < e1 ⇒ e3 < e2`
    /// (plus the mirrored cases). Returns the total number of updates.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::RelationCollision`] if closure contradicts a
    /// stored relation.
    pub fn complete_element_relation_chains(&mut self) -> Result<usize> {
        let n = self.n;
        let mut total = 0;
        loop {
            let mut updates = 0;
            for e1 in 0..n {
                for e2 in e1 + 1..n {
                    let rel12 = self.get(e1, e2);
                    if !rel12.is_defined() {
                        continue;
                    }
                    let rel21 = -rel12;
                    for e3 in 0..n {
                        if e3 == e1 || e3 == e2 {
                            continue;
                        }
                        let rel13 = self.get(e1, e3);
                        let rel23 = self.get(e2, e3);
                        if !rel13.is_defined() && rel12 == rel23 {
                            self.set(e1, e3, rel12)?;
                            updates += 1;
                        }
                        if !rel23.is_defined() && rel21 == rel13 {
                            self.set(e2, e3, rel21)?;
                            updates += 1;
                        }
                    }
                }
            }
            if updates == 0 {
                return Ok(total);
            }
            total += updates;
        }
    }

    /// Renders every row as `no: <>-...`.
    #[must_use]
    pub fn dump_raw(&self) -> String {
        (0..self.n)
            .map(|no| format!("{}: {}", no, format_relations(self.row(no))))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Formats a relation row with `|` every 10 cells and ` |` every 100.
#[must_use]
pub fn format_relations(rels: &[Relation]) -> String {
    let mut s = String::with_capacity(rels.len() + rels.len() / 10 + 1);
    for (i, rel) in rels.iter().enumerate() {
        if i > 0 && i % 10 == 0 {
            s.push('|');
        }
        if i > 0 && i % 100 == 0 {
            s.push_str(" |");
        }
        s.push_str(if rel.is_defined() { rel.symbol() } else { "-" });
    }
    s
}
