//! Wayfndr Engine - tracker services and JSON persistence
//!
//! The layer around `wayfndr-domain` that the desktop UI talks to:
//! [`TrackerService`] enforces the mutate-then-refresh contract over one
//! tracking run, and the persistence ports/adapters load and save the
//! catalogs, schema, and session documents with warning-level name
//! resolution.

pub mod error;
pub mod persistence;
pub mod ports;
pub mod services;

pub use error::{LoadReport, StoreError};
pub use persistence::{JsonCatalogStore, JsonSchemaStore, JsonSessionStore};
pub use ports::{CatalogStore, SchemaStore, SessionStore};
pub use services::{AccessibilityObserver, TrackerService};
