//! Persistence ports
//!
//! Narrow interfaces the tracker consumes for loading and saving. Adapters
//! live in [`crate::persistence`]; tests mock these traits directly. All
//! operations are synchronous - the tracker core is single-threaded and
//! file sizes are bounded by a hand-authored schema.

use std::path::{Path, PathBuf};

use wayfndr_domain::{Catalogs, Schema, Session};

use crate::error::{LoadReport, StoreError};

/// Loads the three reference catalogs from their backing store.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CatalogStore {
    /// Load entities, items, and locations, fully name-resolved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for structural failures; unresolved references
    /// degrade in place and accumulate in the report instead.
    fn load_catalogs(&self) -> Result<(Catalogs, LoadReport), StoreError>;
}

/// Loads and saves authored schemas.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SchemaStore {
    /// Load a schema document, resolving names against the catalogs.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for structural failures; unresolved references
    /// degrade in place and accumulate in the report instead.
    fn load_schema(
        &self,
        path: &Path,
        catalogs: &Catalogs,
    ) -> Result<(Schema, LoadReport), StoreError>;

    /// Write a schema document, re-emitting names from ids.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be serialized or written.
    fn save_schema(
        &self,
        path: &Path,
        schema: &Schema,
        catalogs: &Catalogs,
    ) -> Result<(), StoreError>;
}

/// Loads and saves the run state of one playthrough.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionStore {
    /// Load a session document against an already-loaded schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for structural failures; unresolved references
    /// degrade in place and accumulate in the report instead.
    fn load_session(
        &self,
        path: &Path,
        catalogs: &Catalogs,
        schema: &Schema,
    ) -> Result<(Session, LoadReport), StoreError>;

    /// Write a session document, re-emitting names from ids.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be serialized or written.
    fn save_session(
        &self,
        path: &Path,
        session: &Session,
        catalogs: &Catalogs,
        schema: &Schema,
    ) -> Result<(), StoreError>;

    /// Write a timestamped autosave into `dir` and return its path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be serialized or written.
    fn save_session_auto(
        &self,
        dir: &Path,
        session: &Session,
        catalogs: &Catalogs,
        schema: &Schema,
    ) -> Result<PathBuf, StoreError>;
}
