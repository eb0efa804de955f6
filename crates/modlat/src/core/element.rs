//! Element table: the append-only registry of discovered elements.

use std::collections::HashMap;

use super::relation::{Combination, Operator};
use crate::error::{LatticeError, Result};

/// Name of the top element.
pub const TOP_NAME: &str = "1";
/// Name of the bottom element.
pub const BOTTOM_NAME: &str = "0";

/// A lattice element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Primary name: a generator name, `"0"`, `"1"`, or an expression.
    pub name: String,
    /// Top-level operator of `name` when it is an expression.
    pub name_operator: Option<Operator>,
    /// Alternate names of equivalent expressions.
    pub aliases: Vec<String>,
    /// Combinations whose result is this element; the first one defines it.
    pub combinations: Vec<Combination>,
    /// Registered as a generator.
    pub is_generator: bool,
    /// Some defining combination is a join.
    pub is_join: bool,
    /// Some defining combination is a meet.
    pub is_meet: bool,
    /// The top element.
    pub is_top: bool,
    /// The bottom element.
    pub is_bottom: bool,
    /// Bracket nesting of the simplified expression.
    pub depth: u32,
    /// Number of generator leaves in the expression.
    pub width: u32,
}

impl Element {
    /// The defining combination, absent for generators.
    #[must_use]
    pub fn first_combination(&self) -> Option<Combination> {
        self.combinations.first().copied()
    }
}

/// Ordered registry of elements.
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    elements: Vec<Element>,
    names: HashMap<String, usize>,
    top: Option<usize>,
    bottom: Option<usize>,
}

impl ElementTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no element has been registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends an element and returns its index.
    ///
    /// `combination` is `None` exactly for generators. If `name` is already
    /// registered, [`lookup`](Self::lookup) keeps resolving it to the earlier
    /// element.
    pub fn add(
        &mut self,
        name: &str,
        is_generator: bool,
        combination: Option<Combination>,
        depth: u32,
        width: u32,
    ) -> usize {
        debug_assert_eq!(is_generator, combination.is_none());
        let is_top = name == TOP_NAME;
        let is_bottom = name == BOTTOM_NAME;
        let op = combination.map(|c| c.op);
        let no = self.elements.len();
        self.elements.push(Element {
            name: name.to_string(),
            name_operator: if is_top || is_bottom { None } else { op },
            aliases: Vec::new(),
            combinations: combination.into_iter().collect(),
            is_generator,
            is_join: op == Some(Operator::Join),
            is_meet: op == Some(Operator::Meet),
            is_top,
            is_bottom,
            depth,
            width,
        });
        self.names.entry(name.to_string()).or_insert(no);
        if is_top {
            self.top = Some(no);
        }
        if is_bottom {
            self.bottom = Some(no);
        }
        no
    }

    /// Appends an alias name and, optionally, an alias combination.
    pub fn add_alias(&mut self, no: usize, name: String, combination: Option<Combination>) {
        let e = &mut self.elements[no];
        e.aliases.push(name);
        if let Some(c) = combination {
            e.combinations.push(c);
            match c.op {
                Operator::Join => e.is_join = true,
                Operator::Meet => e.is_meet = true,
            }
        }
    }

    /// Returns the element at `no`.
    ///
    /// Indices come from this table; an index at or beyond [`len`](Self::len)
    /// is a caller bug.
    #[inline]
    #[must_use]
    pub fn get(&self, no: usize) -> &Element {
        &self.elements[no]
    }

    /// Iterates over elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Index of the top element, once discovered.
    #[must_use]
    pub fn top(&self) -> Option<usize> {
        self.top
    }

    /// Index of the bottom element, once discovered.
    #[must_use]
    pub fn bottom(&self) -> Option<usize> {
        self.bottom
    }

    /// Resolves a primary name to its index.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::UnknownElement`] if the name is not registered.
    pub fn lookup(&self, name: &str) -> Result<usize> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| LatticeError::UnknownElement {
                name: name.to_string(),
            })
    }

    /// Name of `no`, or `"undef"` when absent.
    #[must_use]
    pub fn name_of(&self, no: Option<usize>) -> &str {
        match no.and_then(|no| self.elements.get(no)) {
            Some(e) => &e.name,
            None => "undef",
        }
    }

    /// Formats a list of element names as `[a, b]`.
    #[must_use]
    pub fn names_of(&self, nos: &[usize]) -> String {
        let names: Vec<&str> = nos.iter().map(|&no| self.name_of(Some(no))).collect();
        format!("[{}]", names.join(", "))
    }

    /// Primary names in index order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.elements.iter().map(|e| e.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generators() -> ElementTable {
        let mut t = ElementTable::new();
        for name in ["a", "b", "c"] {
            t.add(name, true, None, 0, 1);
        }
        t
    }

    #[test]
    fn add_assigns_sequential_indices() {
        let mut t = generators();
        assert_eq!(t.len(), 3);
        let no = t.add("a+b", false, Some(Combination::new(0, 1, Operator::Join)), 0, 2);
        assert_eq!(no, 3);
        let e = t.get(no);
        assert!(e.is_join && !e.is_meet && !e.is_generator);
        assert_eq!(e.name_operator, Some(Operator::Join));
        assert_eq!(t.lookup("a+b"), Ok(3));
    }

    #[test]
    fn top_and_bottom_have_no_name_operator() {
        let mut t = generators();
        let top = t.add(TOP_NAME, false, Some(Combination::new(0, 1, Operator::Join)), 0, 2);
        let bottom = t.add(BOTTOM_NAME, false, Some(Combination::new(0, 1, Operator::Meet)), 0, 2);
        assert_eq!(t.top(), Some(top));
        assert_eq!(t.bottom(), Some(bottom));
        assert!(t.get(top).is_top && t.get(top).name_operator.is_none());
        assert!(t.get(bottom).is_bottom && t.get(bottom).name_operator.is_none());
    }

    #[test]
    fn alias_combination_sets_flags() {
        let mut t = generators();
        let no = t.add("a+b", false, Some(Combination::new(0, 1, Operator::Join)), 0, 2);
        t.add_alias(no, "(a+b)".to_string(), None);
        assert!(!t.get(no).is_meet);
        t.add_alias(no, "x*y".to_string(), Some(Combination::new(1, 2, Operator::Meet)));
        let e = t.get(no);
        assert!(e.is_meet && e.is_join);
        assert_eq!(e.combinations.len(), 2);
        assert_eq!(e.aliases, ["(a+b)", "x*y"]);
    }

    #[test]
    fn lookup_unknown_fails() {
        let t = generators();
        assert_eq!(
            t.lookup("z"),
            Err(LatticeError::UnknownElement {
                name: "z".to_string()
            })
        );
    }

    #[test]
    fn repeated_name_resolves_to_first_element() {
        let mut t = generators();
        let no = t.add("a", false, Some(Combination::new(0, 0, Operator::Join)), 0, 2);
        assert_eq!(no, 3);
        assert_eq!(t.get(no).name, "a");
        assert_eq!(t.lookup("a"), Ok(0));
    }

    #[test]
    fn name_formatting() {
        let t = generators();
        assert_eq!(t.name_of(None), "undef");
        assert_eq!(t.name_of(Some(9)), "undef");
        assert_eq!(t.names_of(&[2, 0]), "[c, a]");
        assert_eq!(t.names(), ["a", "b", "c"]);
    }
}
