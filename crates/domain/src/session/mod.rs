//! Session - the mutable state of one tracking run
//!
//! A session enumerates one [`CheckState`] per schema check and one
//! [`LocationProgress`] per catalog location at construction. Links and
//! item progress come and go as the player plays. The session itself is
//! plain state: it does not recompute accessibility. Callers follow the
//! mutate-then-refresh contract, which `wayfndr-engine`'s tracker service
//! enforces at its API boundary.

mod check_state;
mod link;
mod progress;

pub use check_state::CheckState;
pub use link::Link;
pub use progress::{ItemProgress, LocationProgress};

use crate::catalog::LocationCatalog;
use crate::error::DomainError;
use crate::ids::{CheckId, EntityId, ItemId, LocationId};
use crate::schema::Schema;

/// Mutable run-time state for one playthrough
#[derive(Debug, Clone, Default)]
pub struct Session {
    checks: Vec<CheckState>,
    links: Vec<Link>,
    item_progress: Vec<ItemProgress>,
    location_progress: Vec<LocationProgress>,
}

impl Session {
    /// Create a fresh session: one check state per schema check, one
    /// location progress per catalog location.
    pub fn new(schema: &Schema, locations: &LocationCatalog) -> Self {
        Self {
            checks: schema.checks().map(|(id, _)| CheckState::new(id)).collect(),
            links: Vec::new(),
            item_progress: Vec::new(),
            location_progress: locations
                .iter()
                .map(|(id, _)| LocationProgress::new(id))
                .collect(),
        }
    }

    // =========================================================================
    // Check states
    // =========================================================================

    pub fn check_state(&self, check: CheckId) -> &CheckState {
        &self.checks[check.index()]
    }

    pub fn check_state_mut(&mut self, check: CheckId) -> &mut CheckState {
        &mut self.checks[check.index()]
    }

    pub fn check_states(&self) -> impl Iterator<Item = (CheckId, &CheckState)> {
        self.checks.iter().map(|state| (state.check(), state))
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Place an entrance link between two distinct checks.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if both ends are the same check.
    pub fn add_link(&mut self, a: CheckId, b: CheckId) -> Result<(), DomainError> {
        let link = Link::new(a, b)?;
        self.links.push(link);
        Ok(())
    }

    /// Remove the first link joining the unordered pair. Returns whether one
    /// was removed.
    pub fn remove_link(&mut self, a: CheckId, b: CheckId) -> bool {
        match self.links.iter().position(|link| link.joins(a, b)) {
            Some(index) => {
                self.links.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    // =========================================================================
    // Item progress
    // =========================================================================

    /// Record one more of `item` collected.
    pub fn add_item(&mut self, item: ItemId) {
        match self.item_progress.iter_mut().find(|p| p.item == item) {
            Some(progress) => progress.count += 1,
            None => self.item_progress.push(ItemProgress { item, count: 1 }),
        }
    }

    /// Remove one of `item`; the entry disappears when the count hits zero.
    pub fn remove_item(&mut self, item: ItemId) {
        if let Some(index) = self.item_progress.iter().position(|p| p.item == item) {
            let progress = &mut self.item_progress[index];
            progress.count = progress.count.saturating_sub(1);
            if progress.count == 0 {
                self.item_progress.remove(index);
            }
        }
    }

    /// Set the held count outright; zero removes the entry. Used when
    /// restoring a saved session.
    pub fn set_item_count(&mut self, item: ItemId, count: u32) {
        match self.item_progress.iter().position(|p| p.item == item) {
            Some(index) if count == 0 => {
                self.item_progress.remove(index);
            }
            Some(index) => self.item_progress[index].count = count,
            None if count > 0 => self.item_progress.push(ItemProgress { item, count }),
            None => {}
        }
    }

    /// Whether the player holds at least one of `item`. Rules test presence,
    /// not counts.
    pub fn has_item(&self, item: ItemId) -> bool {
        self.item_progress.iter().any(|p| p.item == item)
    }

    pub fn item_count(&self, item: ItemId) -> u32 {
        self.item_progress
            .iter()
            .find(|p| p.item == item)
            .map_or(0, |p| p.count)
    }

    pub fn item_progress(&self) -> &[ItemProgress] {
        &self.item_progress
    }

    // =========================================================================
    // Location progress
    // =========================================================================

    pub fn location_progress(&self, location: LocationId) -> &LocationProgress {
        &self.location_progress[location.index()]
    }

    pub fn location_progress_mut(&mut self, location: LocationId) -> &mut LocationProgress {
        &mut self.location_progress[location.index()]
    }

    pub fn location_progress_iter(&self) -> impl Iterator<Item = &LocationProgress> {
        self.location_progress.iter()
    }

    // =========================================================================
    // Convenience mutators
    // =========================================================================

    pub fn set_cleared(&mut self, check: CheckId, cleared: bool) {
        self.check_state_mut(check).cleared = cleared;
    }

    pub fn set_location(&mut self, check: CheckId, location: Option<LocationId>) {
        let state = self.check_state_mut(check);
        state.location = location;
        // A stale entrance cannot belong to the new location.
        state.entrance = None;
    }

    pub fn set_entrance(&mut self, check: CheckId, entrance: Option<EntityId>) {
        self.check_state_mut(check).entrance = entrance;
    }

    pub fn set_required_items(&mut self, check: CheckId, items: Vec<ItemId>) {
        self.check_state_mut(check).required_items = items;
    }
}
