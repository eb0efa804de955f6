//! Expression text and complexity of combinations.
//!
//! An operand whose name is itself an expression is bracketed. With
//! `simplify`, brackets are dropped when the operand's top-level operator
//! matches the combination's: `(a+b)+c` becomes `a+b+c`, while `(a*b)+c`
//! keeps its brackets.
//!
//! Complexity orders candidate combinations: `width × 1000 + depth`, where
//! width counts generator leaves and depth counts bracket nesting.

use crate::core::{Combination, Element, ElementTable, Operator};

/// Weight of one generator leaf relative to one bracket level.
pub const WIDTH_WEIGHT: u32 = 1000;

fn operand_expression(e: &Element, op: Operator, simplify: bool) -> String {
    match e.name_operator {
        Some(name_op) if name_op != op || !simplify => format!("({})", e.name),
        _ => e.name.clone(),
    }
}

/// Expression of `comb` built from its operands' names.
#[must_use]
pub fn combination_expression(table: &ElementTable, comb: &Combination, simplify: bool) -> String {
    let op = comb.op;
    format!(
        "{}{}{}",
        operand_expression(table.get(comb.e1), op, simplify),
        op.symbol(),
        operand_expression(table.get(comb.e2), op, simplify)
    )
}

fn depth_delta(e: &Element, op: Operator) -> u32 {
    match e.first_combination() {
        Some(c) if c.op != op => 1,
        _ => 0,
    }
}

/// Bracket depth of `a op b`.
#[must_use]
pub fn expression_depth(table: &ElementTable, a: usize, b: usize, op: Operator) -> u32 {
    let e1 = table.get(a);
    let e2 = table.get(b);
    (e1.depth + depth_delta(e1, op)).max(e2.depth + depth_delta(e2, op))
}

/// Generator leaf count of `a op b`.
#[must_use]
pub fn expression_width(table: &ElementTable, a: usize, b: usize) -> u32 {
    table.get(a).width + table.get(b).width
}

/// Complexity of `a op b`.
#[must_use]
pub fn complexity(table: &ElementTable, a: usize, b: usize, op: Operator) -> u32 {
    expression_width(table, a, b) * WIDTH_WEIGHT + expression_depth(table, a, b, op)
}

/// Complexity of a combination.
#[must_use]
pub fn combination_complexity(table: &ElementTable, comb: &Combination) -> u32 {
    complexity(table, comb.e1, comb.e2, comb.op)
}

/// Sorts combinations by ascending complexity, keeping the order of ties.
pub fn sort_by_complexity(table: &ElementTable, combs: &mut [Combination]) {
    combs.sort_by_key(|c| combination_complexity(table, c));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ElementTable {
        let mut t = ElementTable::new();
        for name in ["a", "b", "c"] {
            t.add(name, true, None, 0, 1);
        }
        t.add("a+b", false, Some(Combination::new(0, 1, Operator::Join)), 0, 2);
        t
    }

    #[test]
    fn generators_are_not_bracketed() {
        let t = table();
        let c = Combination::new(0, 2, Operator::Meet);
        assert_eq!(combination_expression(&t, &c, false), "a*c");
        assert_eq!(combination_expression(&t, &c, true), "a*c");
    }

    #[test]
    fn simplify_drops_same_operator_brackets() {
        let t = table();
        let join = Combination::new(3, 2, Operator::Join);
        assert_eq!(combination_expression(&t, &join, false), "c+(a+b)");
        assert_eq!(combination_expression(&t, &join, true), "c+a+b");
        let meet = Combination::new(3, 2, Operator::Meet);
        assert_eq!(combination_expression(&t, &meet, true), "c*(a+b)");
    }

    #[test]
    fn depth_counts_operator_changes() {
        let t = table();
        assert_eq!(expression_depth(&t, 0, 1, Operator::Join), 0);
        assert_eq!(expression_depth(&t, 3, 2, Operator::Join), 0);
        assert_eq!(expression_depth(&t, 3, 2, Operator::Meet), 1);
    }

    #[test]
    fn complexity_weights_width() {
        let t = table();
        assert_eq!(complexity(&t, 0, 1, Operator::Meet), 2000);
        assert_eq!(complexity(&t, 3, 2, Operator::Meet), 3001);
    }

    #[test]
    fn sort_is_stable() {
        let t = table();
        let mut combs = vec![
            Combination::new(3, 2, Operator::Meet),
            Combination::new(1, 2, Operator::Join),
            Combination::new(0, 2, Operator::Meet),
        ];
        sort_by_complexity(&t, &mut combs);
        assert_eq!(
            combs,
            [
                Combination::new(1, 2, Operator::Join),
                Combination::new(0, 2, Operator::Meet),
                Combination::new(3, 2, Operator::Meet),
            ]
        );
        assert_eq!(combination_expression(&t, &combs[0], false), "b+c");
    }
}
