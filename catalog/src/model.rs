//! Catalog model types.
//!
//! A [`LatticeDef`] names a free modular lattice by its generators and the
//! seed order relations between them. The declared element count is the size
//! the generated lattice must reach; the engine also uses it to size its
//! internal tables.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Direction of a seed relation between two generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SeedOrder {
    /// The first generator lies below the second.
    Lower,
    /// The first generator lies above the second.
    Higher,
}

impl SeedOrder {
    /// Returns the comparison symbol used in catalog listings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SeedOrder::Lower => "<",
            SeedOrder::Higher => ">",
        }
    }
}

/// A seed constraint between two generator names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SeedRelation {
    /// Name of the first generator.
    pub first: &'static str,
    /// Name of the second generator.
    pub second: &'static str,
    /// Order of `first` relative to `second`.
    pub order: SeedOrder,
}

impl SeedRelation {
    /// Seed stating `first < second`.
    #[must_use]
    pub const fn lower(first: &'static str, second: &'static str) -> Self {
        Self {
            first,
            second,
            order: SeedOrder::Lower,
        }
    }
}

impl core::fmt::Display for SeedRelation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}{}", self.first, self.order.as_str(), self.second)
    }
}

/// A named lattice definition.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LatticeDef {
    /// Catalog name, e.g. `"1-1-1"`.
    pub name: &'static str,
    /// Number of elements the generated lattice must have.
    pub elements: usize,
    /// Generator names in registration order.
    pub generators: &'static [&'static str],
    /// Seed relations between generators.
    pub relations: Vec<SeedRelation>,
    /// Excluded from the default listing (small lattices used for development).
    pub hidden: bool,
}

impl LatticeDef {
    /// Builds a definition whose seed relations form chains.
    ///
    /// Each inner slice `["a", "b", "c"]` contributes `a<b` and `b<c`.
    #[must_use]
    pub fn with_chains(
        name: &'static str,
        elements: usize,
        generators: &'static [&'static str],
        chains: &[&[&'static str]],
    ) -> Self {
        let relations = chains
            .iter()
            .flat_map(|chain| chain.windows(2).map(|w| SeedRelation::lower(w[0], w[1])))
            .collect();
        Self {
            name,
            elements,
            generators,
            relations,
            hidden: false,
        }
    }

    /// Marks this definition as hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Number of generator elements.
    #[must_use]
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Label used in listings: `"1-1-1 (28 elements)"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({} elements)", self.name, self.elements)
    }
}

/// Catalog lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No definition carries the requested name.
    #[error("no definition found for lattice name \"{name}\"")]
    UnknownLattice {
        /// The requested name.
        name: String,
    },
}
