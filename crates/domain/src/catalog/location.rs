//! Location catalog - dungeon/check locations and their entrance graphs
//!
//! A location wraps an entity and carries the static data the evaluator
//! traverses: treasure counts, the start-position flag, its named entrances,
//! requirement sets gating those entrances, and the internal connections
//! between entrance pairs. Requirement references are resolved to typed ids
//! when the catalog is built; a name that failed to resolve is kept as
//! [`RequirementSource::Unresolved`], which never evaluates satisfied.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::EntityCatalog;
use crate::error::DomainError;
use crate::ids::{EntityId, ItemId, LocationId};

/// Hard-coded milestone conditions counted over cleared location progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    Pendant1,
    Pendant2,
    Pendant3,
    Crystal5,
    Crystal6,
    Crystal7,
}

impl Milestone {
    pub const ALL: [Milestone; 6] = [
        Milestone::Pendant1,
        Milestone::Pendant2,
        Milestone::Pendant3,
        Milestone::Crystal5,
        Milestone::Crystal6,
        Milestone::Crystal7,
    ];

    /// Resolve a milestone token from its save-file name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// The stable token name used by save files and rule values.
    pub fn name(self) -> &'static str {
        match self {
            Milestone::Pendant1 => "Pendant1",
            Milestone::Pendant2 => "Pendant2",
            Milestone::Pendant3 => "Pendant3",
            Milestone::Crystal5 => "Crystal5",
            Milestone::Crystal6 => "Crystal6",
            Milestone::Crystal7 => "Crystal7",
        }
    }
}

/// Three-valued requirement result, ordered `No < Maybe < Yes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequirementMatch {
    No,
    Maybe,
    Yes,
}

/// What a requirement entry checks against the session, resolved at load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementSource {
    /// Player holds this progression item
    Item(ItemId),
    /// This location's progress is marked cleared
    Location(LocationId),
    /// A milestone condition holds
    Milestone(Milestone),
    /// A reference that failed name resolution at load; never satisfied
    Unresolved,
}

/// One condition inside a requirement set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementEntry {
    pub source: RequirementSource,
    /// An optional entry that fails yields `Maybe` instead of `No`
    pub optional: bool,
}

impl RequirementEntry {
    pub fn new(source: RequirementSource) -> Self {
        Self {
            source,
            optional: false,
        }
    }

    pub fn optional(source: RequirementSource) -> Self {
        Self {
            source,
            optional: true,
        }
    }
}

/// Alternative set of conditions; the best entry result wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRequirement {
    pub entries: Vec<RequirementEntry>,
}

impl LocationRequirement {
    pub fn new(entries: Vec<RequirementEntry>) -> Self {
        Self { entries }
    }
}

/// An internal traversal between two of a location's entrances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationConnection {
    /// Unordered entrance pair the connection joins
    pub entrances: [EntityId; 2],
    /// All requirement sets must hold to traverse
    pub requirements: Vec<LocationRequirement>,
}

/// A physical check location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub entity: EntityId,
    pub treasure: u32,
    pub treasure_keys: u32,
    pub treasure_etc: u32,
    /// Start positions are trivially reachable
    pub is_start: bool,
    /// Named entrances belonging to this location
    pub entrances: Vec<EntityId>,
    /// Requirement sets gating each entrance, parallel to `entrances`
    pub requirements: Vec<LocationRequirement>,
    /// Internal entrance-to-entrance connections
    pub connections: Vec<LocationConnection>,
}

impl Location {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            treasure: 0,
            treasure_keys: 0,
            treasure_etc: 0,
            is_start: false,
            entrances: Vec::new(),
            requirements: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_treasure(mut self, treasure: u32, keys: u32, etc: u32) -> Self {
        self.treasure = treasure;
        self.treasure_keys = keys;
        self.treasure_etc = etc;
        self
    }

    pub fn as_start(mut self) -> Self {
        self.is_start = true;
        self
    }

    pub fn with_entrances(mut self, entrances: Vec<EntityId>) -> Self {
        self.entrances = entrances;
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<LocationRequirement>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_connections(mut self, connections: Vec<LocationConnection>) -> Self {
        self.connections = connections;
        self
    }
}

/// Load-once arena of locations with lookup by entity or entity type name
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    locations: Vec<Location>,
    by_entity: HashMap<EntityId, LocationId>,
    by_name: HashMap<String, LocationId>,
}

impl LocationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a location, minting its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateName` if a location already wraps the
    /// entity.
    pub fn insert(
        &mut self,
        location: Location,
        entities: &EntityCatalog,
    ) -> Result<LocationId, DomainError> {
        let type_name = &entities.get(location.entity).type_name;
        if self.by_entity.contains_key(&location.entity) {
            return Err(DomainError::DuplicateName {
                entity_type: "location",
                name: type_name.clone(),
            });
        }
        let id = LocationId::from_index(self.locations.len());
        self.by_entity.insert(location.entity, id);
        self.by_name.insert(type_name.clone(), id);
        self.locations.push(location);
        Ok(id)
    }

    /// Patch a location's requirement and connection data in place.
    ///
    /// Requirement sources can reference locations defined later in the same
    /// catalog file, so loaders insert every record first and resolve
    /// requirements in a second pass through this method.
    pub fn set_gating(
        &mut self,
        id: LocationId,
        requirements: Vec<LocationRequirement>,
        connections: Vec<LocationConnection>,
    ) {
        let location = &mut self.locations[id.index()];
        location.requirements = requirements;
        location.connections = connections;
    }

    pub fn get(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    /// Exact-match lookup by the wrapped entity's type name.
    pub fn find(&self, type_name: &str) -> Option<LocationId> {
        self.by_name.get(type_name).copied()
    }

    pub fn find_by_entity(&self, entity: EntityId) -> Option<LocationId> {
        self.by_entity.get(&entity).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, location)| (LocationId::from_index(i), location))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
