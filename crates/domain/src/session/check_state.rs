//! Per-check run state

use crate::ids::{CheckId, EntityId, ItemId, LocationId};

/// Mutable run state for one schema check
///
/// One of these exists for every check in the schema, created when the
/// session is constructed and never destroyed for the session's lifetime.
/// The back-reference to the schema check is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckState {
    check: CheckId,
    /// Progression items the player noted as needed to open this check.
    /// Display data only; the evaluator does not read it.
    pub required_items: Vec<ItemId>,
    /// Location the player assigned to this check, if any
    pub location: Option<LocationId>,
    /// Which of the assigned location's entrances was chosen
    pub entrance: Option<EntityId>,
    /// Whether the player marked this check done
    pub cleared: bool,
}

impl CheckState {
    pub fn new(check: CheckId) -> Self {
        Self {
            check,
            required_items: Vec::new(),
            location: None,
            entrance: None,
            cleared: false,
        }
    }

    /// The schema check this state belongs to.
    pub fn check(&self) -> CheckId {
        self.check
    }
}
