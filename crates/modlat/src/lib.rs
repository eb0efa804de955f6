//! modlat - Free Modular Lattice Generator
//!
//! Generates the free modular lattice over a finite set of generators that
//! may carry chain relations among themselves. Starting from the generators,
//! the engine repeatedly picks the cheapest unresolved meet or join, derives
//! its order relations to every known element, groups it with the
//! combinations the modular law forces equal to it, and either registers a
//! new element or records an alias of an existing one. The run ends when
//! every pair of elements has a cached meet and join.
//!
//! # Pipeline
//!
//! ```text
//! catalog entry ──► LatticeController::new   (generators, seed chains)
//!                        │
//!                        ▼  create_new_element, repeated
//!               seed selection ─► modular closure group
//!                        │
//!                        ▼
//!               relation derivation ─► alias scan
//!                        │
//!                ┌───────┴────────┐
//!                ▼                ▼
//!           new element        alias
//!                └───────┬────────┘
//!                        ▼
//!               secondary alias propagation
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`core`] | Relations, operators, element table, relation matrix, combination cache |
//! | [`expr`] | Expression text and complexity |
//! | [`relations`] | Relation derivation and order queries |
//! | [`modular`] | Modular-law closure groups |
//! | [`controller`] | One generation step |
//! | [`driver`] | Runs steps to completion |
//! | [`verify`] | Consistency checks |
//! | [`graph`] | Covering graph and distances |
//! | [`layout`] | 3D layout |
//! | [`structure`] | Serializable result |
//! | [`dump`] | Text dump |
//! | [`worker`] | Background generation thread |
//!
//! # Example
//!
//! ```
//! use modlat::{generate_structure, GenerationOptions};
//!
//! let s = generate_structure("2-2", &GenerationOptions::default(), |_| {})?;
//! assert_eq!(s.elements, 18);
//! assert_eq!(s.element_names[..4], ["a", "b", "c", "d"]);
//! # Ok::<(), modlat::LatticeError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod controller;
pub mod core;
pub mod driver;
pub mod dump;
pub mod error;
pub mod expr;
pub mod graph;
pub mod layout;
pub mod modular;
pub mod relations;
pub mod structure;
pub mod verify;
pub mod worker;

pub use crate::controller::{LatticeController, StepOutcome};
pub use crate::core::{Combination, Element, ElementTable, Operator, Relation, RelationMap};
pub use crate::driver::{generate_lattice, generate_structure, run_generation, GenerationOptions};
pub use crate::error::{LatticeError, Result};
pub use crate::graph::{lattice_graph_edges, Graph};
pub use crate::layout::LatticeLayout;
pub use crate::structure::LatticeStructure;
pub use crate::worker::{LatticeWorker, WorkerRequest, WorkerResponse};

pub use modlat_catalog as catalog;
