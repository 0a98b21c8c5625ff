//! Store errors and the non-fatal load report
//!
//! Failures split into two levels. Structural problems - an unreadable
//! file, an unparsable document, an unsupported version - abort the whole
//! operation as a [`StoreError`]. Name-resolution failures never do: the
//! record loads with the reference degraded and a message accumulates in
//! the [`LoadReport`] for the UI to surface.

use std::path::PathBuf;

use thiserror::Error;

use wayfndr_domain::DomainError;

/// Fatal persistence failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported {kind} version {found} (supported: {supported})")]
    UnsupportedVersion {
        kind: &'static str,
        found: u32,
        supported: u32,
    },

    /// Structural domain failure, e.g. a duplicate primary name
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Accumulated non-fatal warnings from one load pass
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    warnings: Vec<String>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning; also emitted on the `tracing` warn level.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(warning = %message, "load warning");
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Fold another report's warnings into this one.
    pub fn merge(&mut self, other: LoadReport) {
        self.warnings.extend(other.warnings);
    }
}
