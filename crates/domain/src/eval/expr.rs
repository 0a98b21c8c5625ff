//! Expression tree reconstruction for flattened rule token streams
//!
//! Rule entries arrive as a flat list where each entry carries bracket-depth
//! deltas and the operator joining it to the next entry. This module folds
//! that stream back into a binary tree: unbracketed sequences group
//! left-to-right pairwise, bracketed sub-expressions bind tighter.
//!
//! The builder keeps a cursor into an index arena. Per entry: descend
//! `brackets_open + 1` nodes (splitting a full node through a proxy parent
//! that takes the *previous* entry's operator), attach the leaf, ascend
//! `brackets_close` nodes, and if the parent then holds a single child adopt
//! this entry's operator as the parent's join operator. Unbalanced bracket
//! counts saturate at the root rather than failing; the evaluator never
//! errors on malformed rules.

use crate::schema::{RuleEntry, RuleOp, RuleTerm};

#[derive(Debug, Default)]
struct ExprNode {
    op: RuleOp,
    /// Index into the entry list for leaves
    entry: Option<usize>,
    /// At most two children
    children: Vec<usize>,
    parent: Option<usize>,
}

/// A binary expression tree over a rule's entry list
#[derive(Debug)]
pub(crate) struct ExprTree {
    nodes: Vec<ExprNode>,
    root: usize,
}

impl ExprTree {
    pub fn build(entries: &[RuleEntry]) -> Self {
        let mut nodes = vec![ExprNode::default()];
        let mut root = 0;
        let mut node = 0;

        for (entry_index, entry) in entries.iter().enumerate() {
            for _ in 0..entry.brackets_open + 1 {
                if nodes[node].children.len() == 2 {
                    // Full node: split it through a proxy parent joined by
                    // the operator that followed the previous entry.
                    let proxy = nodes.len();
                    nodes.push(ExprNode {
                        op: entries[entry_index - 1].op,
                        ..ExprNode::default()
                    });

                    let parent = nodes[node].parent;
                    if let Some(parent) = parent {
                        nodes[parent].children.retain(|&child| child != node);
                        nodes[parent].children.push(proxy);
                    }
                    nodes[proxy].parent = parent;
                    nodes[node].parent = Some(proxy);
                    nodes[proxy].children.push(node);

                    if node == root {
                        root = proxy;
                    }
                    node = proxy;
                }

                let child = nodes.len();
                nodes.push(ExprNode {
                    parent: Some(node),
                    ..ExprNode::default()
                });
                nodes[node].children.push(child);
                node = child;
            }

            nodes[node].entry = Some(entry_index);

            for _ in 0..entry.brackets_close {
                if let Some(parent) = nodes[node].parent {
                    node = parent;
                }
            }

            if let Some(parent) = nodes[node].parent {
                // The join operator between siblings belongs to the nearest
                // ancestor still waiting for its second child.
                if nodes[parent].children.len() == 1 {
                    nodes[parent].op = entry.op;
                }
                node = parent;
            }
        }

        Self { nodes, root }
    }

    /// Post-order evaluation. Leaves defer to `leaf`; an empty tree is
    /// trivially satisfied.
    pub fn evaluate(
        &self,
        entries: &[RuleEntry],
        leaf: &mut impl FnMut(&RuleTerm) -> bool,
    ) -> bool {
        self.eval_node(self.root, entries, leaf)
    }

    fn eval_node(
        &self,
        index: usize,
        entries: &[RuleEntry],
        leaf: &mut impl FnMut(&RuleTerm) -> bool,
    ) -> bool {
        let node = &self.nodes[index];
        if let Some(entry) = node.entry {
            return leaf(&entries[entry].term);
        }
        if node.children.is_empty() {
            return true;
        }

        let mut result = self.eval_node(node.children[0], entries, leaf);
        if node.children.len() == 2 {
            let second = self.eval_node(node.children[1], entries, leaf);
            result = match node.op {
                RuleOp::Or => result || second,
                RuleOp::And => result && second,
            };
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;

    // Leaves are keyed by distinct item ids; `values[i]` is the truth value
    // of the entry built from item i.
    fn entry(index: usize) -> RuleEntry {
        RuleEntry::new(RuleTerm::ProgressItem(ItemId::from_index(index)))
    }

    fn eval(entries: &[RuleEntry], values: &[bool]) -> bool {
        let tree = ExprTree::build(entries);
        tree.evaluate(entries, &mut |term| match *term {
            RuleTerm::ProgressItem(item) => values[item.index()],
            _ => false,
        })
    }

    #[test]
    fn empty_entry_list_is_trivially_satisfied() {
        assert!(eval(&[], &[]));
    }

    #[test]
    fn single_entry_is_its_own_value() {
        let entries = [entry(0)];
        assert!(eval(&entries, &[true]));
        assert!(!eval(&entries, &[false]));
    }

    #[test]
    fn unbracketed_sequence_folds_left_to_right() {
        // x Or y And z  ==  (x Or y) And z
        let entries = [
            entry(0).with_op(RuleOp::Or),
            entry(1).with_op(RuleOp::And),
            entry(2),
        ];

        // (T Or F) And T = T
        assert!(eval(&entries, &[true, false, true]));
        // (F Or F) And T = F
        assert!(!eval(&entries, &[false, false, true]));
        // (T Or T) And F = F
        assert!(!eval(&entries, &[true, true, false]));
    }

    #[test]
    fn brackets_bind_tighter_than_the_left_fold() {
        // x Or ( y And z )
        let grouped = [
            entry(0).with_op(RuleOp::Or),
            entry(1).with_op(RuleOp::And).with_brackets(1, 0),
            entry(2).with_brackets(0, 1),
        ];
        // x Or y And z
        let flat = [
            entry(0).with_op(RuleOp::Or),
            entry(1).with_op(RuleOp::And),
            entry(2),
        ];

        // x=T, y=?, z=F: flat folds to (T Or y) And F = F, while the
        // grouped form short-circuits to T Or (y And F) = T.
        let diverging = [true, true, false];
        assert!(eval(&grouped, &diverging));
        assert!(!eval(&flat, &diverging));

        // Agreeing assignment as a sanity check.
        let agreeing = [false, true, true];
        assert!(eval(&grouped, &agreeing));
        assert!(eval(&flat, &agreeing));
    }

    #[test]
    fn nested_brackets_reconstruct() {
        // ( ( x And y ) Or z ) And w
        let entries = [
            entry(0).with_op(RuleOp::And).with_brackets(2, 0),
            entry(1).with_op(RuleOp::Or).with_brackets(0, 1),
            entry(2).with_op(RuleOp::And).with_brackets(0, 1),
            entry(3),
        ];

        assert!(eval(&entries, &[true, true, false, true]));
        assert!(eval(&entries, &[false, false, true, true]));
        assert!(!eval(&entries, &[true, true, true, false]));
        assert!(!eval(&entries, &[true, false, false, true]));
    }

    #[test]
    fn long_unbracketed_and_chain_needs_every_entry() {
        let entries = [
            entry(0).with_op(RuleOp::And),
            entry(1).with_op(RuleOp::And),
            entry(2).with_op(RuleOp::And),
            entry(3),
        ];

        assert!(eval(&entries, &[true, true, true, true]));
        for missing in 0..4 {
            let mut values = [true; 4];
            values[missing] = false;
            assert!(!eval(&entries, &values), "entry {missing} should gate");
        }
    }

    #[test]
    fn unbalanced_close_brackets_saturate_at_the_root() {
        let entries = [
            entry(0).with_op(RuleOp::Or).with_brackets(0, 3),
            entry(1),
        ];
        // Must not panic; folds as a plain Or.
        assert!(eval(&entries, &[false, true]));
        assert!(!eval(&entries, &[false, false]));
    }
}
