//! Plain-text diagnostic dump of the controller state.

use crate::controller::LatticeController;
use crate::core::{ElementTable, Relation};
use crate::relations::find_direct_predecessors;

/// One line per element: `no: name aliases: x, y`.
#[must_use]
pub fn dump_elements(table: &ElementTable) -> String {
    table
        .iter()
        .enumerate()
        .map(|(no, e)| {
            if e.aliases.is_empty() {
                format!("{no}: {}", e.name)
            } else {
                format!("{no}: {} aliases: {}", e.name, e.aliases.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per element listing its combinations, either by operand name
/// (`a + b`) or by index (`0+1`).
#[must_use]
pub fn dump_combinations(table: &ElementTable, numeric: bool) -> String {
    table
        .iter()
        .enumerate()
        .map(|(no, e)| {
            let combs: Vec<String> = e
                .combinations
                .iter()
                .map(|c| {
                    if numeric {
                        c.to_string()
                    } else {
                        format!(
                            "{} {} {}",
                            table.name_of(Some(c.e1)),
                            c.op.symbol(),
                            table.name_of(Some(c.e2))
                        )
                    }
                })
                .collect();
            if combs.is_empty() {
                format!("{no}: {}", e.name)
            } else {
                format!("{no}: {} = {}", e.name, combs.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl LatticeController {
    /// Covering neighbours of every element: `[lower] => name => [higher]`.
    #[must_use]
    pub fn dump_graph(&self) -> String {
        (0..self.table.len())
            .map(|no| {
                let lower = find_direct_predecessors(&self.relations, no, Relation::Lower);
                let higher = find_direct_predecessors(&self.relations, no, Relation::Higher);
                format!(
                    "{} => {} => {}",
                    self.table.names_of(&lower),
                    self.table.name_of(Some(no)),
                    self.table.names_of(&higher)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full dump: elements, combinations, raw relations and the graph.
    #[must_use]
    pub fn dump_all(&self) -> String {
        format!(
            "Elements:\n{}\n\nCombinations expr:\n{}\n\nCombinations numeric:\n{}\n\nRaw relations:\n{}\n\nGraph:\n{}",
            dump_elements(&self.table),
            dump_combinations(&self.table, false),
            dump_combinations(&self.table, true),
            self.relations.dump_raw(),
            self.dump_graph()
        )
    }
}
