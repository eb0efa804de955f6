//! Error type for lattice generation.
//!
//! Every error aborts the current generation run. The variants fall into
//! four groups:
//!
//! - data invariant violations, which indicate an engine defect or an invalid
//!   catalog entry;
//! - safety limits, which guard against runaway search;
//! - lookup failures, including a lattice too incomplete to lay out;
//! - worker state.

use crate::core::{Combination, Relation};

/// Failure of a lattice generation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LatticeError {
    /// A defined relation would be overwritten by a different one.
    #[error("relation collision: e1={e1}, e2={e2}, old={old}, new={new}")]
    RelationCollision {
        /// First element.
        e1: usize,
        /// Second element.
        e2: usize,
        /// Relation already stored.
        old: Relation,
        /// Relation that was requested.
        new: Relation,
    },

    /// An element was given a defined relation to itself.
    #[error("the self-relation of element {element} must be undefined")]
    InvalidSelfRelation {
        /// The element.
        element: usize,
    },

    /// A row merge found two different defined relations.
    #[error("relation merging conflict: e1={e1}, e2={e2}, rel1={rel1}, rel2={rel2}")]
    RelationMergeConflict {
        /// Row being merged into.
        e1: usize,
        /// Column with the conflict.
        e2: usize,
        /// Stored relation.
        rel1: Relation,
        /// Candidate relation.
        rel2: Relation,
    },

    /// Two combinations of one group disagree while an alias is already known.
    #[error("conflicting group relations for element {element} in group {combinations:?} (alias {alias})")]
    ConflictingGroupRelations {
        /// Element on which the combinations disagree.
        element: usize,
        /// The group.
        combinations: Vec<Combination>,
        /// The alias already identified for the group.
        alias: usize,
    },

    /// Modular deduction and the relation scan found different aliases.
    #[error("conflicting alias elements {modular} and {scanned} for group {combinations:?}")]
    ConflictingAliasElements {
        /// Alias found by modular deduction or the group merge.
        modular: usize,
        /// Alias found by the element table scan.
        scanned: usize,
        /// The group.
        combinations: Vec<Combination>,
    },

    /// One closure group resolved to two different elements.
    #[error("multiple modular alias elements found for {seed}: ({first}, {second})")]
    MultipleModularAliases {
        /// Seed combination of the deduction.
        seed: Combination,
        /// Alias found first.
        first: usize,
        /// Alias found second.
        second: usize,
    },

    /// A seed taken from an element resolved to a different element.
    #[error("modular alias {alias} of {seed} differs from its element {element}")]
    ConflictingModularAlias {
        /// Seed combination.
        seed: Combination,
        /// Element the seed was taken from.
        element: usize,
        /// Alias found by deduction.
        alias: usize,
    },

    /// A secondary alias points at an element other than the target.
    #[error("secondary alias {combination} already maps to {existing}, not {target}")]
    SecondaryAliasConflict {
        /// The secondary combination.
        combination: Combination,
        /// Element already cached for it.
        existing: usize,
        /// Element it should map to.
        target: usize,
    },

    /// A defining combination no longer evaluates to its element.
    #[error("primary bound drift: {combination} of element {element} ({name}) evaluates to {found}")]
    PrimaryBoundDrift {
        /// The element.
        element: usize,
        /// Its name.
        name: String,
        /// The combination.
        combination: Combination,
        /// What the evaluator returned (`missing`, `ambiguous` or an index).
        found: String,
    },

    /// Two elements belong to the same modular closure group.
    #[error("duplicate modular elements: {element} ({name}) and {alias}")]
    DuplicateModularElements {
        /// The element re-checked.
        element: usize,
        /// Its name.
        name: String,
        /// The other element of its closure group.
        alias: usize,
    },

    /// A development check found relations that the closure had missed.
    #[error("incomplete {kind}: {updates} relation(s) were added by a re-check")]
    IncompleteRelations {
        /// Which check found them.
        kind: &'static str,
        /// Number of relations added.
        updates: usize,
    },

    /// Generation ended with a different element count than declared.
    #[error("lattice {name} has {actual} elements, expected {expected}")]
    ElementCountMismatch {
        /// Catalog name.
        name: String,
        /// Declared count.
        expected: usize,
        /// Generated count.
        actual: usize,
    },

    /// Modular deduction exceeded its depth limit.
    #[error("modular deduction for {seed} exceeded depth {limit} at {current}")]
    ModularRecursionOverflow {
        /// Seed combination.
        seed: Combination,
        /// Combination being expanded when the limit was hit.
        current: Combination,
        /// The limit.
        limit: usize,
    },

    /// The driver loop did not terminate.
    #[error("aborting main loop after {limit} iterations")]
    IterationLimitExceeded {
        /// The limit.
        limit: usize,
    },

    /// Seed selection tried too many combinations.
    #[error("seed selection did not settle after {limit} combinations")]
    BacktrackLimitExceeded {
        /// The limit.
        limit: usize,
    },

    /// Seed selection ran out of work in an unexpected state.
    #[error("seed selection ran out of combinations")]
    WorklistExhausted,

    /// A new element was requested for an empty closure group.
    #[error("cannot register an element without a defining combination")]
    EmptyCombinationGroup,

    /// An internal table is full.
    #[error("capacity exceeded: {what} needs {requested}, limit is {limit}")]
    CapacityExceeded {
        /// The table.
        what: &'static str,
        /// Requested size.
        requested: usize,
        /// Maximum size.
        limit: usize,
    },

    /// The lattice has no top or no bottom element yet.
    #[error("the lattice has no {which} element")]
    MissingExtremum {
        /// `"top"` or `"bottom"`.
        which: &'static str,
    },

    /// The covering graph does not connect two elements.
    #[error("element {to} is not reachable from element {from} in the covering graph")]
    Disconnected {
        /// Start element.
        from: usize,
        /// Unreachable element.
        to: usize,
    },

    /// An element name is not registered.
    #[error("element \"{name}\" is not known")]
    UnknownElement {
        /// The name.
        name: String,
    },

    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] modlat_catalog::CatalogError),

    /// The worker is already generating a lattice.
    #[error("a worker is still active")]
    WorkerBusy,

    /// The worker thread is gone.
    #[error("the worker thread has stopped")]
    WorkerDisconnected,
}

/// Result alias for lattice operations.
pub type Result<T> = core::result::Result<T, LatticeError>;
