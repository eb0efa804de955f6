//! Core data structures: relations, elements, the relation matrix, and the
//! combination cache.

pub mod combination_map;
pub mod element;
pub mod relation;
pub mod relation_map;

pub use combination_map::CombinationMap;
pub use element::{Element, ElementTable, BOTTOM_NAME, TOP_NAME};
pub use relation::{format_combinations, Combination, Operator, Relation};
pub use relation_map::{format_relations, RelationMap};
