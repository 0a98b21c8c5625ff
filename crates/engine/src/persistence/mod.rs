//! JSON persistence adapters
//!
//! One adapter per port, all speaking versioned JSON documents through the
//! DTO layer. Loading is a resolution pass: names in the document become
//! typed ids against the catalogs/schema, with unresolved references
//! degrading to warnings rather than failures.

mod catalog_store;
pub mod dto;
mod schema_store;
mod session_store;

pub use catalog_store::JsonCatalogStore;
pub use schema_store::JsonSchemaStore;
pub use session_store::JsonSessionStore;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use wayfndr_domain::{
    Catalogs, LocationRequirement, Milestone, RequirementEntry, RequirementSource,
};

use crate::error::{LoadReport, StoreError};

use dto::{RequirementDto, RequirementKindDto};

/// Supported catalog document version
pub const CATALOG_VERSION: u32 = 1;
/// Supported schema document version
pub const SCHEMA_VERSION: u32 = 1;
/// Supported session document version
pub const SESSION_VERSION: u32 = 1;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string_pretty(value).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, raw).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn check_version(
    kind: &'static str,
    found: u32,
    supported: u32,
) -> Result<(), StoreError> {
    if found == supported {
        Ok(())
    } else {
        Err(StoreError::UnsupportedVersion {
            kind,
            found,
            supported,
        })
    }
}

/// Resolve requirement DTOs against the catalogs. Unresolved names warn and
/// degrade to [`RequirementSource::Unresolved`], which never satisfies -
/// the same verdict an unmatched name would have produced at evaluation
/// time.
pub(crate) fn resolve_requirements(
    dtos: &[RequirementDto],
    catalogs: &Catalogs,
    context: &str,
    report: &mut LoadReport,
) -> Vec<LocationRequirement> {
    dtos.iter()
        .map(|requirement| {
            let entries = requirement
                .entries
                .iter()
                .map(|entry| {
                    let source = match entry.kind {
                        RequirementKindDto::ProgressItem => {
                            match catalogs.items.find(&entry.value) {
                                Some(item) => RequirementSource::Item(item),
                                None => {
                                    report.warn(format!(
                                        "{context}: unknown item '{}' in requirement",
                                        entry.value
                                    ));
                                    RequirementSource::Unresolved
                                }
                            }
                        }
                        RequirementKindDto::ProgressLocation => {
                            match catalogs.locations.find(&entry.value) {
                                Some(location) => RequirementSource::Location(location),
                                None => {
                                    report.warn(format!(
                                        "{context}: unknown location '{}' in requirement",
                                        entry.value
                                    ));
                                    RequirementSource::Unresolved
                                }
                            }
                        }
                        RequirementKindDto::ProgressSpecial => {
                            match Milestone::from_name(&entry.value) {
                                Some(milestone) => RequirementSource::Milestone(milestone),
                                None => {
                                    report.warn(format!(
                                        "{context}: unknown milestone '{}' in requirement",
                                        entry.value
                                    ));
                                    RequirementSource::Unresolved
                                }
                            }
                        }
                    };
                    RequirementEntry {
                        source,
                        optional: entry.optional,
                    }
                })
                .collect();
            LocationRequirement::new(entries)
        })
        .collect()
}
