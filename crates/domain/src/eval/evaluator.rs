//! The reachability evaluator
//!
//! Four mutually recursive matchers decide, for the current session state,
//! whether a rule, a check, a region, or a location-internal path holds.
//! Rules, checks, and regions can reference each other freely, so each
//! matcher family carries a pass-scoped "currently visiting" stack: an
//! entity revisited while still in flight evaluates to unreachable. That
//! trades completeness in pathologically cyclic schemas for guaranteed
//! termination, and it is the contract - not a defect - for this engine.
//!
//! Regions are additionally memoized per pass because they are revisited
//! constantly; the memo is filled by the refresh pass as each top-level
//! region result completes, never by recursive evaluation.

use crate::catalog::{
    Catalogs, Location, LocationRequirement, Milestone, RequirementMatch, RequirementSource,
};
use crate::ids::{CheckId, EntityId, RegionId, RuleId};
use crate::schema::{AccessKind, RuleTerm, Schema};
use crate::session::{CheckState, Session};

use super::expr::ExprTree;

/// Pass-scoped evaluation state over borrowed world data
pub struct Evaluator<'a> {
    catalogs: &'a Catalogs,
    schema: &'a Schema,
    session: &'a Session,
    rule_stack: Vec<RuleId>,
    check_stack: Vec<CheckId>,
    region_stack: Vec<RegionId>,
    region_memo: Vec<Option<bool>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalogs: &'a Catalogs, schema: &'a Schema, session: &'a Session) -> Self {
        Self {
            catalogs,
            schema,
            session,
            rule_stack: Vec::new(),
            check_stack: Vec::new(),
            region_stack: Vec::new(),
            region_memo: vec![None; schema.region_count()],
        }
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Whether one rule term holds.
    pub fn term(&mut self, term: &RuleTerm) -> bool {
        match *term {
            RuleTerm::ProgressItem(item) => self.session.has_item(item),
            RuleTerm::ProgressLocation(location) => {
                self.session.location_progress(location).cleared
            }
            RuleTerm::Milestone(milestone) => self.milestone(milestone),
            RuleTerm::Rule(rule) => self.rule(rule),
            RuleTerm::Check(check) => self.check(check),
            RuleTerm::Region(region) => self.region(region),
            RuleTerm::Inaccessible => false,
        }
    }

    /// Whether a milestone condition holds, counted over cleared location
    /// progress.
    pub fn milestone(&self, milestone: Milestone) -> bool {
        let cleared = |flag: fn(&crate::session::LocationProgress) -> bool| {
            self.session
                .location_progress_iter()
                .filter(|progress| progress.cleared && flag(progress))
                .count()
        };

        match milestone {
            Milestone::Pendant1 => cleared(|p| p.pendant_green) >= 1,
            Milestone::Pendant2 => cleared(|p| p.pendant) >= 1,
            Milestone::Pendant3 => cleared(|p| p.pendant) >= 2,
            Milestone::Crystal5 => cleared(|p| p.crystal_red) >= 1,
            Milestone::Crystal6 => cleared(|p| p.crystal_red) >= 2,
            Milestone::Crystal7 => cleared(|p| p.crystal || p.crystal_red) >= 7,
        }
    }

    /// Whether a rule holds. A rule revisited while still being evaluated
    /// yields false.
    pub fn rule(&mut self, id: RuleId) -> bool {
        if self.rule_stack.contains(&id) {
            return false;
        }
        self.rule_stack.push(id);

        let entries = &self.schema.rule(id).entries;
        let tree = ExprTree::build(entries);
        let result = tree.evaluate(entries, &mut |term| self.term(term));

        self.rule_stack.pop();
        result
    }

    // =========================================================================
    // Checks
    // =========================================================================

    /// Whether a check is reachable. A check revisited while still being
    /// evaluated yields false.
    pub fn check(&mut self, id: CheckId) -> bool {
        if self.check_stack.contains(&id) {
            return false;
        }
        self.check_stack.push(id);
        let result = self.check_reachable(id);
        self.check_stack.pop();
        result
    }

    /// Whether the check backing this session state is reachable.
    pub fn check_state(&mut self, state: &CheckState) -> bool {
        self.check(state.check())
    }

    fn check_reachable(&mut self, id: CheckId) -> bool {
        let schema = self.schema;
        let session = self.session;
        let locations = &self.catalogs.locations;
        let check = schema.check(id);

        // Plain region-and-rule gate.
        let region_open = match check.region {
            None => true,
            Some(region) => self.region(region),
        };
        if region_open {
            let rule_open = match check.rule {
                None => true,
                Some(rule) => self.rule(rule),
            };
            if rule_open {
                return true;
            }
        }

        // Reachable through a placed link whose far end is reachable.
        for link in session.links() {
            let Some(other) = link.other_end(id) else {
                continue;
            };
            if self.check(other) {
                return true;
            }
        }

        // Location semantics: a start position is trivially reachable.
        let state = session.check_state(id);
        let location = state.location.map(|l| locations.get(l));
        if location.is_some_and(|l| l.is_start) {
            return true;
        }

        // Checks sharing a location with entrances see each other once one
        // of them is open.
        if let Some(location) = location {
            if !location.entrances.is_empty() {
                for (other_id, other_state) in session.check_states() {
                    if other_id != id
                        && other_state.location == state.location
                        && self.check(other_id)
                    {
                        return true;
                    }
                }
            }
        }

        false
    }

    // =========================================================================
    // Regions
    // =========================================================================

    /// Whether a region is reachable. Consults the per-pass memo first; this
    /// is the only cache-based short-circuit in the evaluator.
    pub fn region(&mut self, id: RegionId) -> bool {
        if let Some(cached) = self.region_memo[id.index()] {
            return cached;
        }
        self.check_region(id)
    }

    /// Record a completed top-level region result for the rest of the pass.
    pub fn memoize_region(&mut self, id: RegionId, accessible: bool) {
        self.region_memo[id.index()] = Some(accessible);
    }

    fn check_region(&mut self, id: RegionId) -> bool {
        if self.region_stack.contains(&id) {
            return false;
        }
        self.region_stack.push(id);
        let result = self.check_region_inner(id);
        self.region_stack.pop();
        result
    }

    fn check_region_inner(&mut self, id: RegionId) -> bool {
        let schema = self.schema;
        let session = self.session;
        let locations = &self.catalogs.locations;
        let region = schema.region(id);

        // A region without a gating rule, or with a satisfied one, is open.
        match region.rule {
            None => return true,
            Some(rule) => {
                if self.rule(rule) {
                    return true;
                }
            }
        }

        // A link reaching into this region can open it from the far side.
        for link in session.links() {
            let [end_a, end_b] = link.ends();
            let (this_end, other_end) = if schema.check(end_a).region == Some(id) {
                (end_a, end_b)
            } else if schema.check(end_b).region == Some(id) {
                (end_b, end_a)
            } else {
                continue;
            };

            if schema.check(this_end).region == schema.check(other_end).region {
                return true;
            }

            let this_check = schema.check(this_end);
            let exit_open = match (this_check.rule, this_check.access) {
                (None, _) => true,
                (Some(_), AccessKind::Entrance) => true,
                (Some(rule), AccessKind::EntranceAndExit) => self.rule(rule),
            };
            if exit_open && self.check(other_end) {
                return true;
            }
        }

        // Assigned locations: start positions grant access outright, and a
        // location's internal entrance graph can carry access in from a
        // reachable check in another region.
        for (check_id, state) in session.check_states() {
            let Some(location_id) = state.location else {
                continue;
            };
            if schema.check(check_id).region != Some(id) {
                continue;
            }
            let location = locations.get(location_id);

            if location.is_start {
                let check = schema.check(check_id);
                let entry_open = match (check.rule, check.access) {
                    (None, _) => true,
                    (Some(_), AccessKind::Entrance) => true,
                    (Some(rule), AccessKind::EntranceAndExit) => self.rule(rule),
                };
                if entry_open {
                    return true;
                }
            }

            if !location.connections.is_empty() {
                let other = session.check_states().find(|(other_id, other_state)| {
                    other_state.location == Some(location_id)
                        && *other_id != check_id
                        && schema.check(*other_id).region != Some(id)
                });
                let Some((other_id, other_state)) = other else {
                    continue;
                };

                if self.check(other_id) {
                    let other_region_open = match schema.check(other_id).region {
                        None => true,
                        Some(region) => self.check_region(region),
                    };
                    if other_region_open
                        && self.location_path_open(location, other_state.entrance, state.entrance)
                    {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// DFS over a location's internal connections from `from` toward
    /// `target`, honoring each connection's requirements. A connection that
    /// contains the target entrance completes the path outright; requirements
    /// gate only the intermediate hops.
    fn location_path_open(
        &self,
        location: &Location,
        from: Option<EntityId>,
        target: Option<EntityId>,
    ) -> bool {
        let mut visited: Vec<[EntityId; 2]> = Vec::new();
        self.walk_entrances(location, from, target, &mut visited)
    }

    fn walk_entrances(
        &self,
        location: &Location,
        entrance: Option<EntityId>,
        target: Option<EntityId>,
        visited: &mut Vec<[EntityId; 2]>,
    ) -> bool {
        for connection in &location.connections {
            if !connection.entrances.iter().any(|&e| Some(e) == entrance) {
                continue;
            }
            if visited.contains(&connection.entrances) {
                continue;
            }
            visited.push(connection.entrances);

            if connection.entrances.iter().any(|&e| Some(e) == target) {
                return true;
            }
            if self.requirements(&connection.requirements) == RequirementMatch::No {
                continue;
            }

            let next = if Some(connection.entrances[0]) == entrance {
                connection.entrances[1]
            } else {
                connection.entrances[0]
            };
            if self.walk_entrances(location, Some(next), target, visited) {
                return true;
            }
        }
        false
    }

    // =========================================================================
    // Location requirements
    // =========================================================================

    /// One requirement set: the best entry result wins (`Yes` > `Maybe` >
    /// `No`); an optional entry that fails yields `Maybe`.
    pub fn requirement(&self, requirement: &LocationRequirement) -> RequirementMatch {
        let mut result = RequirementMatch::No;
        for entry in &requirement.entries {
            let satisfied = match entry.source {
                RequirementSource::Item(item) => self.session.has_item(item),
                RequirementSource::Location(location) => {
                    self.session.location_progress(location).cleared
                }
                RequirementSource::Milestone(milestone) => self.milestone(milestone),
                RequirementSource::Unresolved => false,
            };
            let matched = if satisfied {
                RequirementMatch::Yes
            } else if entry.optional {
                RequirementMatch::Maybe
            } else {
                RequirementMatch::No
            };
            result = result.max(matched);
        }
        result
    }

    /// A requirement list: all sets must hold, so the weakest result
    /// dominates. An empty list is unconstrained and yields `Maybe`.
    pub fn requirements(&self, requirements: &[LocationRequirement]) -> RequirementMatch {
        if requirements.is_empty() {
            return RequirementMatch::Maybe;
        }
        requirements
            .iter()
            .fold(RequirementMatch::Yes, |worst, requirement| {
                worst.min(self.requirement(requirement))
            })
    }
}
