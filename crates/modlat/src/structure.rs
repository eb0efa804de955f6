//! Serializable result of a generation run.

use serde::{Deserialize, Serialize};

use crate::controller::LatticeController;
use crate::error::{LatticeError, Result};
use crate::graph::{lattice_graph_edges, Graph};
use crate::layout::{lattice_graph_layout, LatticeLayout};

/// A generated lattice: names, covering edges and a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeStructure {
    /// Number of elements.
    pub elements: usize,
    /// Index of the bottom element.
    pub bottom: usize,
    /// Index of the top element.
    pub top: usize,
    /// Primary names in index order.
    pub element_names: Vec<String>,
    /// Covering edges as `[lower, higher]`.
    pub edges: Vec<[usize; 2]>,
    /// Element positions.
    pub layout: LatticeLayout,
}

impl LatticeStructure {
    /// Extracts the structure of a completed run.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::MissingExtremum`] or
    /// [`LatticeError::Disconnected`] when the run is not complete.
    pub fn from_controller(controller: &LatticeController) -> Result<Self> {
        let table = controller.element_table();
        let rm = controller.relation_map();
        let bottom = table.bottom().ok_or(LatticeError::MissingExtremum { which: "bottom" })?;
        let top = table.top().ok_or(LatticeError::MissingExtremum { which: "top" })?;
        let edges = lattice_graph_edges(rm);
        let graph = Graph::new(table.len(), &edges);
        let layout = lattice_graph_layout(table, &graph, rm, controller.generator_count())?;
        Ok(Self {
            elements: table.len(),
            bottom,
            top,
            element_names: table.names(),
            edges,
            layout,
        })
    }

    /// Covering graph over the edges.
    #[must_use]
    pub fn graph(&self) -> Graph {
        Graph::new(self.elements, &self.edges)
    }
}
