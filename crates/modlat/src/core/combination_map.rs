//! Combination cache: (element, element, operator) → result element.
//!
//! One dense pair map per operator, written symmetrically. The cell width is
//! fixed at construction from the element capacity:
//!
//! | Capacity | Cell |
//! |----------|------|
//! | ≤ 127 | `i8` |
//! | ≤ 32767 | `i16` |
//!
//! `-1` marks "no mapping". Entries are never removed.

use super::relation::{Combination, Operator};
use crate::error::{LatticeError, Result};

#[derive(Debug, Clone)]
enum Cells {
    Narrow(Vec<i8>),
    Wide(Vec<i16>),
}

#[derive(Debug, Clone)]
struct PairMap {
    max_elements: usize,
    cells: Cells,
}

impl PairMap {
    fn new(max_elements: usize) -> Self {
        let size = max_elements * max_elements;
        let cells = if max_elements <= i8::MAX as usize {
            Cells::Narrow(vec![-1; size])
        } else {
            Cells::Wide(vec![-1; size])
        };
        Self {
            max_elements,
            cells,
        }
    }

    #[inline]
    fn get(&self, a: usize, b: usize) -> Option<usize> {
        let i = a * self.max_elements + b;
        let v = match &self.cells {
            Cells::Narrow(c) => i16::from(c[i]),
            Cells::Wide(c) => c[i],
        };
        usize::try_from(v).ok()
    }

    fn set(&mut self, a: usize, b: usize, no: usize) {
        let i1 = a * self.max_elements + b;
        let i2 = b * self.max_elements + a;
        match &mut self.cells {
            // Capacity checks in `CombinationMap::set` keep `no` in range.
            Cells::Narrow(c) => {
                let v = i8::try_from(no).unwrap_or(-1);
                c[i1] = v;
                c[i2] = v;
            }
            Cells::Wide(c) => {
                let v = i16::try_from(no).unwrap_or(-1);
                c[i1] = v;
                c[i2] = v;
            }
        }
    }
}

/// Cache of resolved combinations.
#[derive(Debug, Clone)]
pub struct CombinationMap {
    max_elements: usize,
    meets: PairMap,
    joins: PairMap,
}

impl CombinationMap {
    /// Creates an empty cache for up to `max_elements` elements.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::CapacityExceeded`] if element indices would
    /// not fit a 16-bit cell.
    pub fn new(max_elements: usize) -> Result<Self> {
        let limit = i16::MAX as usize;
        if max_elements > limit {
            return Err(LatticeError::CapacityExceeded {
                what: "combination cache",
                requested: max_elements,
                limit,
            });
        }
        Ok(Self {
            max_elements,
            meets: PairMap::new(max_elements),
            joins: PairMap::new(max_elements),
        })
    }

    /// Returns true if the cache uses 16-bit cells.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        matches!(self.meets.cells, Cells::Wide(_))
    }

    fn pair_map(&self, op: Operator) -> &PairMap {
        match op {
            Operator::Meet => &self.meets,
            Operator::Join => &self.joins,
        }
    }

    /// Cached result of `comb`.
    #[inline]
    #[must_use]
    pub fn get(&self, comb: &Combination) -> Option<usize> {
        self.get_pair(comb.e1, comb.e2, comb.op)
    }

    /// Cached result of `a op b`.
    #[inline]
    #[must_use]
    pub fn get_pair(&self, a: usize, b: usize, op: Operator) -> Option<usize> {
        self.pair_map(op).get(a, b)
    }

    /// Caches `comb → no`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::CapacityExceeded`] if `no` is beyond capacity.
    pub fn set(&mut self, comb: &Combination, no: usize) -> Result<()> {
        self.set_pair(comb.e1, comb.e2, comb.op, no)
    }

    /// Caches `a op b → no`.
    ///
    /// A cell, once set, keeps its value; writing the same result again is
    /// allowed. Debug builds assert on a different one.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::CapacityExceeded`] if `no` is beyond capacity.
    pub fn set_pair(&mut self, a: usize, b: usize, op: Operator, no: usize) -> Result<()> {
        if no >= self.max_elements {
            return Err(LatticeError::CapacityExceeded {
                what: "combination cache",
                requested: no + 1,
                limit: self.max_elements,
            });
        }
        let map = match op {
            Operator::Meet => &mut self.meets,
            Operator::Join => &mut self.joins,
        };
        debug_assert!(
            map.get(a, b).map_or(true, |old| old == no),
            "{a}{}{b} is already cached as {:?}, not {no}",
            op.symbol(),
            map.get(a, b)
        );
        map.set(a, b, no);
        Ok(())
    }
}
