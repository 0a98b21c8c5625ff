//! Item catalog - collectible progression item types
//!
//! An item wraps exactly one entity; at most one item exists per entity.
//! Rules and session progress reference items by id.

use std::collections::HashMap;

use crate::catalog::EntityCatalog;
use crate::error::DomainError;
use crate::ids::{EntityId, ItemId};

/// A collectible progression item type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub entity: EntityId,
}

/// Load-once arena of items with lookup by entity or entity type name
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Item>,
    by_entity: HashMap<EntityId, ItemId>,
    by_name: HashMap<String, ItemId>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item wrapping `entity`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateName` if an item already wraps the
    /// entity.
    pub fn insert(
        &mut self,
        entity: EntityId,
        entities: &EntityCatalog,
    ) -> Result<ItemId, DomainError> {
        let type_name = &entities.get(entity).type_name;
        if self.by_entity.contains_key(&entity) {
            return Err(DomainError::DuplicateName {
                entity_type: "item",
                name: type_name.clone(),
            });
        }
        let id = ItemId::from_index(self.items.len());
        self.by_entity.insert(entity, id);
        self.by_name.insert(type_name.clone(), id);
        self.items.push(Item { entity });
        Ok(id)
    }

    pub fn get(&self, id: ItemId) -> &Item {
        &self.items[id.index()]
    }

    /// Exact-match lookup by the wrapped entity's type name.
    pub fn find(&self, type_name: &str) -> Option<ItemId> {
        self.by_name.get(type_name).copied()
    }

    pub fn find_by_entity(&self, entity: EntityId) -> Option<ItemId> {
        self.by_entity.get(&entity).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (ItemId::from_index(i), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Entity;

    #[test]
    fn one_item_per_entity() {
        let mut entities = EntityCatalog::new();
        let bow = entities.insert(Entity::new("bow", "Bow")).unwrap();

        let mut items = ItemCatalog::new();
        let id = items.insert(bow, &entities).unwrap();
        assert_eq!(items.find("bow"), Some(id));
        assert_eq!(items.find_by_entity(bow), Some(id));

        let err = items.insert(bow, &entities).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateName { .. }));
    }
}
