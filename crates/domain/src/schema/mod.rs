//! Schema - the authored map definition
//!
//! A schema bundles three name-keyed arenas: rules, regions, and checks.
//! It is read-mostly at runtime; only the external editor mutates it.
//! Because rules can reference each other (and regions and checks) by name,
//! construction is two-phase: mint every rule id first with [`Schema::add_rule`],
//! then attach resolved entries with [`Schema::set_rule_entries`].

mod check;
mod region;
mod rule;

use std::collections::HashMap;

pub use check::{Check, MapHalf, MapPoint};
pub use region::Region;
pub use rule::{AccessKind, Rule, RuleEntry, RuleOp, RuleTerm};

use crate::error::DomainError;
use crate::ids::{CheckId, RegionId, RuleId};

/// The authored map definition: rules, regions, and checks
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<Rule>,
    rules_by_name: HashMap<String, RuleId>,
    regions: Vec<Region>,
    regions_by_name: HashMap<String, RegionId>,
    checks: Vec<Check>,
    checks_by_name: HashMap<String, CheckId>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Mint a rule id for `name` with no entries yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateName` if the name is taken.
    pub fn add_rule(&mut self, name: impl Into<String>) -> Result<RuleId, DomainError> {
        let name = name.into();
        if self.rules_by_name.contains_key(&name) {
            return Err(DomainError::DuplicateName {
                entity_type: "rule",
                name,
            });
        }
        let id = RuleId::from_index(self.rules.len());
        self.rules_by_name.insert(name.clone(), id);
        self.rules.push(Rule::new(name));
        Ok(id)
    }

    /// Attach the resolved entry list to a previously minted rule.
    pub fn set_rule_entries(&mut self, id: RuleId, entries: Vec<RuleEntry>) {
        self.rules[id.index()].entries = entries;
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn find_rule(&self, name: &str) -> Option<RuleId> {
        self.rules_by_name.get(name).copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::from_index(i), rule))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    // =========================================================================
    // Regions
    // =========================================================================

    /// Insert a region, minting its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateName` if the name is taken.
    pub fn add_region(&mut self, region: Region) -> Result<RegionId, DomainError> {
        if self.regions_by_name.contains_key(&region.name) {
            return Err(DomainError::DuplicateName {
                entity_type: "region",
                name: region.name,
            });
        }
        let id = RegionId::from_index(self.regions.len());
        self.regions_by_name.insert(region.name.clone(), id);
        self.regions.push(region);
        Ok(id)
    }

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    pub fn find_region(&self, name: &str) -> Option<RegionId> {
        self.regions_by_name.get(name).copied()
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(i, region)| (RegionId::from_index(i), region))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    // =========================================================================
    // Checks
    // =========================================================================

    /// Insert a check, minting its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateName` if the name is taken.
    pub fn add_check(&mut self, check: Check) -> Result<CheckId, DomainError> {
        if self.checks_by_name.contains_key(&check.name) {
            return Err(DomainError::DuplicateName {
                entity_type: "check",
                name: check.name,
            });
        }
        let id = CheckId::from_index(self.checks.len());
        self.checks_by_name.insert(check.name.clone(), id);
        self.checks.push(check);
        Ok(id)
    }

    pub fn check(&self, id: CheckId) -> &Check {
        &self.checks[id.index()]
    }

    pub fn find_check(&self, name: &str) -> Option<CheckId> {
        self.checks_by_name.get(name).copied()
    }

    pub fn checks(&self) -> impl Iterator<Item = (CheckId, &Check)> {
        self.checks
            .iter()
            .enumerate()
            .map(|(i, check)| (CheckId::from_index(i), check))
    }

    pub fn check_count(&self) -> usize {
        self.checks.len()
    }
}
