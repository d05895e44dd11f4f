//! Domain types shared by the registries.
//!
//! Identifiers are newtypes over `u64` so a student id can never stand in for
//! a course id. All types serialize via serde so front ends can emit JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a student.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for StudentId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl From<StudentId> for u64 {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

impl FromStr for StudentId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_id(s, EntityKind::Student).map(Self)
    }
}

/// A strongly-typed identifier for a course.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CourseId(pub u64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for CourseId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl From<CourseId> for u64 {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl FromStr for CourseId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_id(s, EntityKind::Course).map(Self)
    }
}

fn parse_id(s: &str, kind: EntityKind) -> Result<u64, RegistryError> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| RegistryError::validation(format!("'{s}' is not a valid {kind} id")))
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The closed set of record kinds held by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Student,
    Course,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Student => write!(f, "student"),
            EntityKind::Course => write!(f, "course"),
        }
    }
}

/// How ungraded enrollments take part in an average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AveragePolicy {
    /// Left out of both the sum and the count.
    #[default]
    ExcludeUngraded,
    /// Counted as 0.
    UngradedAsZero,
}

/// Outcome of pairing a student with a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result", content = "kind")]
pub enum EnrollmentResult {
    Success,
    CourseFull,
    AlreadyEnrolled,
    NotFound(EntityKind),
}

impl EnrollmentResult {
    pub fn is_success(self) -> bool {
        self == EnrollmentResult::Success
    }
}

impl fmt::Display for EnrollmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentResult::Success => write!(f, "enrollment successful"),
            EnrollmentResult::CourseFull => write!(f, "course is full"),
            EnrollmentResult::AlreadyEnrolled => write!(f, "student already enrolled"),
            EnrollmentResult::NotFound(kind) => write!(f, "{kind} not found"),
        }
    }
}

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

/// Letter grade symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Percentage used when a letter takes part in an average.
    pub fn percent_equivalent(self) -> f64 {
        match self {
            LetterGrade::A => 95.0,
            LetterGrade::B => 85.0,
            LetterGrade::C => 75.0,
            LetterGrade::D => 65.0,
            LetterGrade::F => 50.0,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        f.write_str(s)
    }
}

/// The grade a student holds in one course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Grade {
    #[default]
    Ungraded,
    /// Numeric percentage in `[0, 100]`.
    Percent(f64),
    Letter(LetterGrade),
}

impl Grade {
    pub const MIN_PERCENT: f64 = 0.0;
    pub const MAX_PERCENT: f64 = 100.0;

    /// Rejects percentages outside `[0, 100]` and non-finite values.
    pub fn validate(&self) -> Result<(), RegistryError> {
        match *self {
            Grade::Percent(p) if !p.is_finite() => {
                Err(RegistryError::validation("grade must be a finite number"))
            }
            Grade::Percent(p) if !(Self::MIN_PERCENT..=Self::MAX_PERCENT).contains(&p) => Err(
                RegistryError::validation(format!("grade must be between 0 and 100, got {p}")),
            ),
            _ => Ok(()),
        }
    }

    pub fn is_graded(&self) -> bool {
        !matches!(self, Grade::Ungraded)
    }

    /// The value this grade contributes to an average, or `None` when it is
    /// left out under `policy`.
    pub fn points(&self, policy: AveragePolicy) -> Option<f64> {
        match (self, policy) {
            (Grade::Ungraded, AveragePolicy::ExcludeUngraded) => None,
            (Grade::Ungraded, AveragePolicy::UngradedAsZero) => Some(0.0),
            (Grade::Percent(p), _) => Some(*p),
            (Grade::Letter(l), _) => Some(l.percent_equivalent()),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Ungraded => write!(f, "Not graded"),
            Grade::Percent(p) => write!(f, "{p:.2}%"),
            Grade::Letter(l) => l.fmt(f),
        }
    }
}

/// Parses `A`..`F` (any case), a number (optionally suffixed with `%`), or
/// `-` / `none` / `ungraded`. Range is checked by [`Grade::validate`], not here.
impl FromStr for Grade {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match t.to_ascii_lowercase().as_str() {
            "-" | "none" | "ungraded" => return Ok(Grade::Ungraded),
            "a" => return Ok(Grade::Letter(LetterGrade::A)),
            "b" => return Ok(Grade::Letter(LetterGrade::B)),
            "c" => return Ok(Grade::Letter(LetterGrade::C)),
            "d" => return Ok(Grade::Letter(LetterGrade::D)),
            "f" => return Ok(Grade::Letter(LetterGrade::F)),
            _ => {}
        }
        t.trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(Grade::Percent)
            .map_err(|_| {
                RegistryError::validation(format!(
                    "unknown grade '{t}'; expected a percentage or one of A, B, C, D, F"
                ))
            })
    }
}

/// Arithmetic mean of `grades` under `policy`; 0.0 when nothing counts.
pub fn average<'a>(grades: impl IntoIterator<Item = &'a Grade>, policy: AveragePolicy) -> f64 {
    let (sum, count) = grades
        .into_iter()
        .filter_map(|g| g.points(policy))
        .fold((0.0, 0usize), |(sum, count), p| (sum + p, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(StudentId::from(1000).to_string(), "1000");
        assert_eq!(CourseId::from(100).to_string(), "100");
    }

    #[test]
    fn id_parse_rejects_garbage() {
        assert_eq!("  42 ".parse::<StudentId>().unwrap(), StudentId(42));
        let err = "abc".parse::<CourseId>().unwrap_err();
        assert!(err.to_string().contains("not a valid course id"));
    }

    #[test]
    fn grade_parse_variants() {
        assert_eq!("b".parse::<Grade>().unwrap(), Grade::Letter(LetterGrade::B));
        assert_eq!("87.5".parse::<Grade>().unwrap(), Grade::Percent(87.5));
        assert_eq!("90%".parse::<Grade>().unwrap(), Grade::Percent(90.0));
        assert_eq!("none".parse::<Grade>().unwrap(), Grade::Ungraded);
        assert!("excellent".parse::<Grade>().is_err());
    }

    #[test]
    fn grade_validate_bounds() {
        assert!(Grade::Percent(0.0).validate().is_ok());
        assert!(Grade::Percent(100.0).validate().is_ok());
        assert!(Grade::Percent(-1.0).validate().is_err());
        assert!(Grade::Percent(101.0).validate().is_err());
        assert!(Grade::Percent(f64::NAN).validate().is_err());
        assert!(Grade::Letter(LetterGrade::F).validate().is_ok());
    }

    #[test]
    fn grade_display() {
        assert_eq!(Grade::Percent(90.0).to_string(), "90.00%");
        assert_eq!(Grade::Letter(LetterGrade::A).to_string(), "A");
        assert_eq!(Grade::Ungraded.to_string(), "Not graded");
    }

    #[test]
    fn grade_json_shape() {
        let v = serde_json::to_value(Grade::Percent(90.0)).unwrap();
        assert_eq!(v, serde_json::json!({ "kind": "percent", "value": 90.0 }));
        let v = serde_json::to_value(Grade::Ungraded).unwrap();
        assert_eq!(v, serde_json::json!({ "kind": "ungraded" }));
        let v = serde_json::to_value(EnrollmentResult::NotFound(EntityKind::Course)).unwrap();
        assert_eq!(v, serde_json::json!({ "result": "not_found", "kind": "course" }));
    }

    #[test]
    fn average_respects_policy() {
        let grades = [Grade::Percent(90.0), Grade::Ungraded, Grade::Percent(60.0)];
        assert_eq!(average(&grades, AveragePolicy::ExcludeUngraded), 75.0);
        assert_eq!(average(&grades, AveragePolicy::UngradedAsZero), 50.0);
        assert_eq!(average(&[] as &[Grade], AveragePolicy::ExcludeUngraded), 0.0);
        assert_eq!(average(&[Grade::Ungraded], AveragePolicy::ExcludeUngraded), 0.0);
    }

    #[test]
    fn letters_average_through_equivalents() {
        let grades = [Grade::Letter(LetterGrade::A), Grade::Letter(LetterGrade::C)];
        assert_eq!(average(&grades, AveragePolicy::ExcludeUngraded), 85.0);
    }
}
