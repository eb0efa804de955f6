//! Per-lattice validators.
//!
//! Each validator inspects one generated lattice and returns a
//! [`ConformanceReport`](crate::report::ConformanceReport). Findings that
//! break an invariant are failures; degenerate but legal shapes are
//! warnings.

pub mod bounds;
pub mod catalog;
pub mod graph;
pub mod layout;
pub mod order;

/// Cap on the detail lines attached to one failure.
pub(crate) const MAX_DETAILS: usize = 8;
