//! Regions - named map areas with an optional gating rule

use crate::ids::RuleId;

/// A named area of the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    /// Display color, opaque to the engine (e.g. "#7fc8a0")
    pub color: String,
    /// Gating rule; a region without one is unconditionally reachable
    pub rule: Option<RuleId>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: String::new(),
            rule: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_rule(mut self, rule: RuleId) -> Self {
        self.rule = Some(rule);
        self
    }
}
