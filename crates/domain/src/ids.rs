//! Typed index ids for catalog and schema entities
//!
//! Every cross-reference in the domain is a typed index into the owning
//! arena (catalog or schema). Ids are minted by the arena when a record is
//! inserted and are only meaningful against the arena that minted them.
//! Persistence never stores these indices - save files reference records by
//! their unique names, and ids are re-minted on load.

use std::fmt;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Wrap an arena index. Only arenas mint ids; callers outside
            /// the owning collection should treat ids as opaque.
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// The arena slot this id points at.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// Catalog ids
define_id!(EntityId);
define_id!(ItemId);
define_id!(LocationId);

// Schema ids
define_id!(RuleId);
define_id!(RegionId);
define_id!(CheckId);
