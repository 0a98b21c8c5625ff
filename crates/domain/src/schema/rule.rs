//! Rules - named boolean expressions over a bracketed infix token stream
//!
//! A rule is an ordered list of entries. Each entry carries the term it
//! tests, bracket-depth deltas, and the operator joining it to the *next*
//! entry. The flattened form is what save files store and what the schema
//! editor manipulates; [`crate::eval`] rebuilds the expression tree on
//! evaluation.

use serde::{Deserialize, Serialize};

use crate::catalog::Milestone;
use crate::ids::{CheckId, ItemId, LocationId, RegionId, RuleId};

/// Operator joining a rule entry to the next one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleOp {
    #[default]
    Or,
    And,
}

/// Whether a check's own rule gates only arrival, or departure as well
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessKind {
    /// The rule gates entering through this check only
    #[default]
    Entrance,
    /// The rule also has to hold to exit through a connection
    EntranceAndExit,
}

/// What a rule entry tests, resolved to typed references at load
///
/// A value that failed name resolution degrades to `Inaccessible` when the
/// schema is loaded, preserving the evaluate-to-false contract without
/// re-resolving names at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTerm {
    /// Player holds this progression item
    ProgressItem(ItemId),
    /// This location's progress is marked cleared
    ProgressLocation(LocationId),
    /// A milestone condition holds
    Milestone(Milestone),
    /// Another rule holds
    Rule(RuleId),
    /// A schema check is reachable
    Check(CheckId),
    /// A schema region is reachable
    Region(RegionId),
    /// Literal "never" marker; also the degraded form of unresolved values
    Inaccessible,
}

/// One token of a rule's flattened expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEntry {
    pub term: RuleTerm,
    /// Joins this entry to the next entry
    pub op: RuleOp,
    /// Opening brackets preceding this entry
    pub brackets_open: u32,
    /// Closing brackets following this entry
    pub brackets_close: u32,
}

impl RuleEntry {
    pub fn new(term: RuleTerm) -> Self {
        Self {
            term,
            op: RuleOp::Or,
            brackets_open: 0,
            brackets_close: 0,
        }
    }

    pub fn with_op(mut self, op: RuleOp) -> Self {
        self.op = op;
        self
    }

    pub fn with_brackets(mut self, open: u32, close: u32) -> Self {
        self.brackets_open = open;
        self.brackets_close = close;
        self
    }
}

/// A named boolean expression definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub entries: Vec<RuleEntry>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }
}
