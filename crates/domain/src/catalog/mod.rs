//! Static reference catalogs
//!
//! Catalogs load once at startup and live for the process lifetime. Every
//! higher-level object (schema rules, session progress) refers into them by
//! typed id, never by copy.

mod entity;
mod item;
mod location;

pub use entity::{Entity, EntityCatalog};
pub use item::{Item, ItemCatalog};
pub use location::{
    Location, LocationCatalog, LocationConnection, LocationRequirement, Milestone,
    RequirementEntry, RequirementMatch, RequirementSource,
};

/// The three reference catalogs bundled for convenience
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub entities: EntityCatalog,
    pub items: ItemCatalog,
    pub locations: LocationCatalog,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }
}
