//! Error types for registrar-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::EntityKind;

/// All errors that can arise from registry operations.
///
/// Business refusals (course full, already enrolled, not enrolled) are not
/// errors; they come back as [`crate::types::EnrollmentResult`] or `false`.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed input: blank name, capacity below one, grade out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// A student or course identifier that does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u64 },

    /// Every identifier of this kind has been handed out.
    #[error("no {0} identifiers left to allocate")]
    Exhausted(EntityKind),

    /// The two sides of an enrollment disagree, or a capacity was exceeded.
    #[error("registry is inconsistent: {0}")]
    Inconsistent(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration YAML is malformed; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration parsed but holds a value the registry cannot use.
    #[error("invalid config at {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// `dirs::home_dir()` returned `None`, so `~/.registrar/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

impl RegistryError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn student_not_found(id: impl Into<u64>) -> Self {
        Self::NotFound { kind: EntityKind::Student, id: id.into() }
    }

    pub(crate) fn course_not_found(id: impl Into<u64>) -> Self {
        Self::NotFound { kind: EntityKind::Course, id: id.into() }
    }
}
