//! Catalog of named free modular lattices.
//!
//! Each entry lists the generator names, the seed order relations between
//! them, and the number of elements the closed lattice has. Names encode the
//! chain structure of the generators: `"3-1-1"` is one chain of three
//! generators plus two unrelated singletons.
//!
//! # Entry Point
//!
//! ```
//! let def = modlat_catalog::lookup("1-1-1").expect("catalog entry");
//! assert_eq!(def.elements, 28);
//! assert_eq!(def.generators, &["a", "b", "c"]);
//! ```
//!
//! # Catalog
//!
//! | Name | Elements | Chains |
//! |------|----------|--------|
//! | 2-2 | 18 | a<b, c<d |
//! | 5-1 | 26 | a<b<c<d<e |
//! | 1-1-1 | 28 | none |
//! | 3-2 | 33 | a<b<c, d<e |
//! | 4-2 | 54 | a<b<c<d, e<f |
//! | 3-3 | 68 | a<b<c, d<e<f |
//! | 2-1-1 | 138 | a<b |
//! | 3-1-1 | 629 | a<b<c |
//! | 4-1-1 | 2784 | a<b<c<d |
//!
//! The hidden entries `2-1`, `3-1` and `4-1` are small enough to step through
//! by hand.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;

pub use model::{CatalogError, LatticeDef, SeedOrder, SeedRelation};

/// Returns every catalog entry in ascending element-count order.
#[must_use]
pub fn all() -> &'static [LatticeDef] {
    static CATALOG: std::sync::OnceLock<Vec<LatticeDef>> = std::sync::OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            LatticeDef::with_chains("2-1", 8, &["a", "b", "c"], &[&["a", "b"]]).hidden(),
            LatticeDef::with_chains("3-1", 13, &["a", "b", "c", "d"], &[&["a", "b", "c"]])
                .hidden(),
            LatticeDef::with_chains("2-2", 18, &["a", "b", "c", "d"], &[&["a", "b"], &["c", "d"]]),
            LatticeDef::with_chains(
                "4-1",
                19,
                &["a", "b", "c", "d", "e"],
                &[&["a", "b", "c", "d"]],
            )
            .hidden(),
            LatticeDef::with_chains(
                "5-1",
                26,
                &["a", "b", "c", "d", "e", "f"],
                &[&["a", "b", "c", "d", "e"]],
            ),
            LatticeDef::with_chains("1-1-1", 28, &["a", "b", "c"], &[]),
            LatticeDef::with_chains(
                "3-2",
                33,
                &["a", "b", "c", "d", "e"],
                &[&["a", "b", "c"], &["d", "e"]],
            ),
            LatticeDef::with_chains(
                "4-2",
                54,
                &["a", "b", "c", "d", "e", "f"],
                &[&["a", "b", "c", "d"], &["e", "f"]],
            ),
            LatticeDef::with_chains(
                "3-3",
                68,
                &["a", "b", "c", "d", "e", "f"],
                &[&["a", "b", "c"], &["d", "e", "f"]],
            ),
            LatticeDef::with_chains("2-1-1", 138, &["a", "b", "c", "d"], &[&["a", "b"]]),
            LatticeDef::with_chains(
                "3-1-1",
                629,
                &["a", "b", "c", "d", "e"],
                &[&["a", "b", "c"]],
            ),
            LatticeDef::with_chains(
                "4-1-1",
                2784,
                &["a", "b", "c", "d", "e", "f"],
                &[&["a", "b", "c", "d"]],
            ),
            // "2-2-1" (5 generators, a<b, c<d) does not converge yet.
        ]
    })
}

/// Returns the entries shown in the default listing.
pub fn visible() -> impl Iterator<Item = &'static LatticeDef> {
    all().iter().filter(|def| !def.hidden)
}

/// Looks up a definition by name.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownLattice`] if no entry has this name.
pub fn lookup(name: &str) -> Result<&'static LatticeDef, CatalogError> {
    all()
        .iter()
        .find(|def| def.name == name)
        .ok_or_else(|| CatalogError::UnknownLattice {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_count() {
        assert_eq!(all().len(), 12);
        assert_eq!(visible().count(), 9);
    }

    #[test]
    fn names_unique() {
        let mut names = std::collections::HashSet::new();
        for def in all() {
            assert!(names.insert(def.name), "Duplicate lattice name: {}", def.name);
        }
    }

    #[test]
    fn sorted_by_element_count() {
        for pair in all().windows(2) {
            assert!(
                pair[0].elements <= pair[1].elements,
                "{} listed before {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn seeds_reference_generators() {
        for def in all() {
            for rel in &def.relations {
                assert!(
                    def.generators.contains(&rel.first) && def.generators.contains(&rel.second),
                    "{}: seed {} names an unknown generator",
                    def.name,
                    rel
                );
            }
        }
    }

    #[test]
    fn chains_expand_to_seeds() {
        let def = lookup("3-3").expect("3-3 is catalogued");
        let seeds: Vec<String> = def.relations.iter().map(ToString::to_string).collect();
        assert_eq!(seeds, ["a<b", "b<c", "d<e", "e<f"]);
    }

    #[test]
    fn generator_count_matches_name() {
        // "4-1-1" has 4 + 1 + 1 generators.
        for def in all() {
            let parts: usize = def
                .name
                .split('-')
                .map(|p| p.parse::<usize>().unwrap_or(0))
                .sum();
            assert_eq!(def.generator_count(), parts, "{}", def.name);
        }
    }

    #[test]
    fn unknown_name_fails() {
        let err = lookup("2-2-1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "no definition found for lattice name \"2-2-1\""
        );
    }

    #[test]
    fn label_format() {
        let def = lookup("2-2").expect("2-2 is catalogued");
        assert_eq!(def.label(), "2-2 (18 elements)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_to_json() {
        let def = lookup("2-2").expect("2-2 is catalogued");
        let json = serde_json::to_value(def).expect("serializable");
        assert_eq!(json["elements"], 18);
        assert_eq!(json["relations"][1]["order"], "Lower");
    }
}
