//! Registrar core library — in-memory student/course registry.
//!
//! Public API surface:
//! - [`types`] — identifier newtypes, grades, enrollment outcomes
//! - [`allocator`] — per-kind monotonic identifiers
//! - [`store`] — generic keyed entity store
//! - [`course`] / [`student`] — entities and their registries
//! - [`service`] — [`RegistryService`], the paired-update entry point
//! - [`config`] — [`RegistryConfig`] load
//! - [`error`] — [`RegistryError`]

pub mod allocator;
pub mod config;
pub mod course;
pub mod error;
pub mod service;
pub mod store;
pub mod student;
pub mod types;

pub use config::RegistryConfig;
pub use course::{Course, CourseRegistry};
pub use error::RegistryError;
pub use service::{CourseReport, RegistryService, RegistryStats, StudentReport};
pub use student::{Student, StudentRegistry};
pub use types::{
    AveragePolicy, CourseId, EnrollmentResult, EntityKind, Grade, LetterGrade, StudentId,
};
