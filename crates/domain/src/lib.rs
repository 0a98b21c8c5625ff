//! Wayfndr Domain - the map-tracker core
//!
//! Pure data model plus the reachability engine: static reference catalogs,
//! the authored schema (rules, regions, checks), the mutable session state
//! of one tracking run, and the evaluator that decides what is currently
//! reachable. No I/O lives here; persistence and the mutate-then-refresh
//! service surface are `wayfndr-engine`'s concern.

pub mod catalog;
pub mod error;
pub mod eval;
pub mod ids;
pub mod schema;
pub mod session;

pub use catalog::{
    Catalogs, Entity, EntityCatalog, Item, ItemCatalog, Location, LocationCatalog,
    LocationConnection, LocationRequirement, Milestone, RequirementEntry, RequirementMatch,
    RequirementSource,
};
pub use error::DomainError;
pub use eval::{Accessibility, Evaluator};
pub use ids::{CheckId, EntityId, ItemId, LocationId, RegionId, RuleId};
pub use schema::{
    AccessKind, Check, MapHalf, MapPoint, Region, Rule, RuleEntry, RuleOp, RuleTerm, Schema,
};
pub use session::{CheckState, ItemProgress, Link, LocationProgress, Session};
