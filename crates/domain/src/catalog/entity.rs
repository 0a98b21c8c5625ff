//! Entity catalog - the base reference records everything else points at
//!
//! An entity is an immutable catalog record: a unique type name (the primary
//! key used by save files and rule values), a display name for the UI, and an
//! opaque image handle. Items, locations, and location entrances all wrap or
//! reference entities; nothing ever copies one.

use std::collections::HashMap;

use crate::error::DomainError;
use crate::ids::EntityId;

/// An immutable catalog record identified by its unique type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Unique type name, e.g. "hookshot" or "desert-palace". Primary key.
    pub type_name: String,
    /// Human-readable name shown in the UI
    pub display_name: String,
    /// Opaque image asset handle; the core never interprets it
    pub image: Option<String>,
}

impl Entity {
    pub fn new(type_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            display_name: display_name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Load-once arena of entities with exact-name lookup
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: Vec<Entity>,
    by_name: HashMap<String, EntityId>,
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, minting its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateName` if the type name is already taken.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, DomainError> {
        if self.by_name.contains_key(&entity.type_name) {
            return Err(DomainError::DuplicateName {
                entity_type: "entity",
                name: entity.type_name,
            });
        }
        let id = EntityId::from_index(self.entities.len());
        self.by_name.insert(entity.type_name.clone(), id);
        self.entities.push(entity);
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    /// Exact-match lookup by type name.
    pub fn find(&self, type_name: &str) -> Option<EntityId> {
        self.by_name.get(type_name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::from_index(i), e))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_mints_sequential_ids_and_find_matches_exactly() {
        let mut catalog = EntityCatalog::new();
        let sword = catalog.insert(Entity::new("sword", "Sword")).unwrap();
        let shield = catalog.insert(Entity::new("shield", "Shield")).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("sword"), Some(sword));
        assert_eq!(catalog.find("shield"), Some(shield));
        assert_eq!(catalog.find("Sword"), None);
        assert_eq!(catalog.get(sword).display_name, "Sword");
    }

    #[test]
    fn duplicate_type_name_is_rejected() {
        let mut catalog = EntityCatalog::new();
        catalog.insert(Entity::new("sword", "Sword")).unwrap();
        let err = catalog.insert(Entity::new("sword", "Other")).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateName { .. }));
    }
}
