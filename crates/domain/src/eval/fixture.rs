//! Shared test fixture for the evaluator suites

use crate::catalog::{Catalogs, Entity, Location};
use crate::ids::{CheckId, EntityId, ItemId, LocationId, RegionId, RuleId};
use crate::schema::{Check, Region, RuleEntry, RuleTerm, Schema};
use crate::session::Session;

/// A small world under construction: catalogs plus schema
pub(crate) struct Fixture {
    pub catalogs: Catalogs,
    pub schema: Schema,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self {
            catalogs: Catalogs::new(),
            schema: Schema::new(),
        }
    }

    /// Insert a bare entity (used for location entrances).
    pub fn entity(&mut self, name: &str) -> EntityId {
        self.catalogs
            .entities
            .insert(Entity::new(name, name))
            .unwrap()
    }

    /// Insert an entity and the item wrapping it.
    pub fn item(&mut self, name: &str) -> ItemId {
        let entity = self.entity(name);
        self.catalogs
            .items
            .insert(entity, &self.catalogs.entities)
            .unwrap()
    }

    /// Insert an entity and a plain location wrapping it.
    pub fn location(&mut self, name: &str) -> LocationId {
        self.location_with(name, |location| location)
    }

    /// Insert an entity and a location built from it.
    pub fn location_with(
        &mut self,
        name: &str,
        build: impl FnOnce(Location) -> Location,
    ) -> LocationId {
        let entity = self.entity(name);
        self.catalogs
            .locations
            .insert(build(Location::new(entity)), &self.catalogs.entities)
            .unwrap()
    }

    pub fn rule(&mut self, name: &str, entries: Vec<RuleEntry>) -> RuleId {
        let id = self.schema.add_rule(name).unwrap();
        self.schema.set_rule_entries(id, entries);
        id
    }

    /// A rule that can never hold.
    pub fn never_rule(&mut self, name: &str) -> RuleId {
        self.rule(name, vec![RuleEntry::new(RuleTerm::Inaccessible)])
    }

    /// A rule satisfied by holding one item.
    pub fn item_rule(&mut self, name: &str, item: ItemId) -> RuleId {
        self.rule(name, vec![RuleEntry::new(RuleTerm::ProgressItem(item))])
    }

    pub fn region(&mut self, name: &str, rule: Option<RuleId>) -> RegionId {
        let mut region = Region::new(name);
        region.rule = rule;
        self.schema.add_region(region).unwrap()
    }

    pub fn check(&mut self, name: &str, build: impl FnOnce(Check) -> Check) -> CheckId {
        self.schema.add_check(build(Check::new(name))).unwrap()
    }

    /// A fresh session over the current schema and catalogs.
    pub fn session(&self) -> Session {
        Session::new(&self.schema, &self.catalogs.locations)
    }
}
