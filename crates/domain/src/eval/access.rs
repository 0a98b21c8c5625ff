//! Accessibility cache - the per-pass result table consumers read
//!
//! Cached results live here, outside the entity records, so the entities
//! stay immutable and the cache's lifecycle is explicit: a refresh pass
//! rebuilds the whole table from scratch after every session mutation.
//! There is no incremental invalidation; catalog sizes are bounded by a
//! hand-authored schema and the full recompute is cheap enough to run
//! inline on the mutating thread.

use tracing::debug;

use crate::catalog::Catalogs;
use crate::ids::{CheckId, RegionId};
use crate::schema::Schema;
use crate::session::Session;

use super::Evaluator;

/// Cached accessibility flags for every region and check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accessibility {
    regions: Vec<bool>,
    checks: Vec<bool>,
}

impl Accessibility {
    /// An empty table; every lookup reads false. Placeholder until the
    /// first refresh.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recompute the whole table for the current session state.
    ///
    /// One evaluator serves the entire pass: regions are evaluated in
    /// arena order and memoized as each top-level result completes, so
    /// later evaluations - including the check pass - reuse finished
    /// region results while in-flight cycles still resolve through the
    /// guard stacks.
    pub fn refresh(catalogs: &Catalogs, schema: &Schema, session: &Session) -> Self {
        let mut evaluator = Evaluator::new(catalogs, schema, session);

        let mut regions = vec![false; schema.region_count()];
        for (id, _) in schema.regions() {
            let accessible = evaluator.region(id);
            evaluator.memoize_region(id, accessible);
            regions[id.index()] = accessible;
        }

        let mut checks = vec![false; schema.check_count()];
        for (id, _) in schema.checks() {
            checks[id.index()] = evaluator.check(id);
        }

        debug!(
            regions_open = regions.iter().filter(|&&open| open).count(),
            regions_total = regions.len(),
            checks_open = checks.iter().filter(|&&open| open).count(),
            checks_total = checks.len(),
            "accessibility refreshed"
        );

        Self { regions, checks }
    }

    /// Cached accessibility of a region as of the last refresh.
    pub fn region(&self, id: RegionId) -> bool {
        self.regions.get(id.index()).copied().unwrap_or(false)
    }

    /// Cached accessibility of a check as of the last refresh.
    pub fn check(&self, id: CheckId) -> bool {
        self.checks.get(id.index()).copied().unwrap_or(false)
    }
}
