//! Progress records - what the player has collected and cleared

use crate::ids::{ItemId, LocationId};

/// How many of a progression item the player holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemProgress {
    pub item: ItemId,
    pub count: u32,
}

/// Per-location run state
///
/// One of these exists for every catalog location, created when the session
/// is constructed. Counters and flags are plain data; any combination is a
/// valid state, so fields are public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationProgress {
    location: LocationId,
    /// Treasure items found so far
    pub items_found: u32,
    /// Small keys currently held for this location
    pub keys_current: u32,
    /// Small keys found in total
    pub keys_total: u32,
    pub has_map: bool,
    pub has_compass: bool,
    pub has_big_key: bool,
    /// Dungeon reward flags
    pub pendant: bool,
    pub pendant_green: bool,
    pub crystal: bool,
    pub crystal_red: bool,
    /// Whether the location has been fully cleared
    pub cleared: bool,
}

impl LocationProgress {
    pub fn new(location: LocationId) -> Self {
        Self {
            location,
            items_found: 0,
            keys_current: 0,
            keys_total: 0,
            has_map: false,
            has_compass: false,
            has_big_key: false,
            pendant: false,
            pendant_green: false,
            crystal: false,
            crystal_red: false,
            cleared: false,
        }
    }

    /// The catalog location this progress belongs to.
    pub fn location(&self) -> LocationId {
        self.location
    }
}
