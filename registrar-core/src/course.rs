//! Course entity and the registry that owns it.
//!
//! The registry enforces capacity and duplicate-enrollment rules on the
//! course side only. Keeping the student side in step is the job of
//! [`crate::service::RegistryService`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::allocator::IdentifierAllocator;
use crate::error::RegistryError;
use crate::store::EntityStore;
use crate::types::{average, AveragePolicy, CourseId, EnrollmentResult, EntityKind, Grade, StudentId};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    id: CourseId,
    name: String,
    max_capacity: u32,
    created_at: DateTime<Utc>,
    enrolled: BTreeSet<StudentId>,
}

impl Course {
    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Read-only view of the enrolled students.
    pub fn enrolled(&self) -> &BTreeSet<StudentId> {
        &self.enrolled
    }

    pub fn is_enrolled(&self, student: StudentId) -> bool {
        self.enrolled.contains(&student)
    }

    pub fn enrolled_count(&self) -> usize {
        self.enrolled.len()
    }

    pub fn is_full(&self) -> bool {
        self.enrolled.len() >= self.max_capacity as usize
    }

    pub fn seats_left(&self) -> usize {
        (self.max_capacity as usize).saturating_sub(self.enrolled.len())
    }

    /// `"enrolled/max"`, e.g. `"2/30"`.
    pub fn occupancy(&self) -> String {
        format!("{}/{}", self.enrolled.len(), self.max_capacity)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CourseRegistry {
    store: EntityStore<CourseId, Course>,
}

impl CourseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, allocate an id and store a course with no students.
    pub fn create(
        &mut self,
        ids: &mut IdentifierAllocator,
        name: &str,
        max_capacity: u32,
    ) -> Result<Course, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("rejected course with blank name");
            return Err(RegistryError::validation("course name cannot be empty"));
        }
        if max_capacity < 1 {
            tracing::warn!(course = name, "rejected course with zero capacity");
            return Err(RegistryError::validation("course capacity must be at least 1"));
        }

        let id = ids.next(EntityKind::Course).ok_or(RegistryError::Exhausted(EntityKind::Course))?;
        let course = Course {
            id: CourseId(id),
            name: name.to_owned(),
            max_capacity,
            created_at: Utc::now(),
            enrolled: BTreeSet::new(),
        };
        tracing::debug!(course = %course.id, name = %course.name, max_capacity, "course created");
        self.store.insert(course.id, course.clone());
        Ok(course)
    }

    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.store.get(&id)
    }

    pub fn contains(&self, id: CourseId) -> bool {
        self.store.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Every course, sorted by id.
    pub fn all(&self) -> Vec<Course> {
        let mut courses = self.store.all();
        courses.sort_by_key(|c| c.id);
        courses
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.store.values()
    }

    /// Remove the course record only. Students still holding it must be
    /// scrubbed by the caller.
    pub fn remove(&mut self, id: CourseId) -> bool {
        self.store.remove(&id)
    }

    /// Try to seat `student` in `course`, reporting why it was refused.
    pub fn admit(&mut self, course: CourseId, student: StudentId) -> EnrollmentResult {
        let Some(c) = self.store.get_mut(&course) else {
            return EnrollmentResult::NotFound(EntityKind::Course);
        };
        if c.enrolled.contains(&student) {
            return EnrollmentResult::AlreadyEnrolled;
        }
        if c.is_full() {
            return EnrollmentResult::CourseFull;
        }
        c.enrolled.insert(student);
        EnrollmentResult::Success
    }

    /// `true` iff `student` was added. Refusals (duplicate, full, unknown
    /// course) return `false` without error.
    pub fn enroll(&mut self, course: CourseId, student: StudentId) -> bool {
        self.admit(course, student).is_success()
    }

    /// Remove `student` from `course`; no-op if either is absent.
    pub fn unenroll(&mut self, course: CourseId, student: StudentId) {
        if let Some(c) = self.store.get_mut(&course) {
            c.enrolled.remove(&student);
        }
    }

    /// Drop `student` from every course. Returns how many seats were freed.
    pub fn scrub_student(&mut self, student: StudentId) -> usize {
        self.store
            .values_mut()
            .map(|c| c.enrolled.remove(&student))
            .filter(|removed| *removed)
            .count()
    }

    /// Mean grade of the students currently enrolled in `course`.
    ///
    /// `lookup` yields each student's grade for this course; students for
    /// which it returns `None` are skipped. 0.0 for an unknown or empty course.
    pub fn average_grade(
        &self,
        course: CourseId,
        lookup: impl Fn(StudentId) -> Option<Grade>,
        policy: AveragePolicy,
    ) -> f64 {
        let Some(c) = self.store.get(&course) else {
            return 0.0;
        };
        let grades: Vec<Grade> = c.enrolled.iter().filter_map(|s| lookup(*s)).collect();
        average(&grades, policy)
    }

    /// Case-insensitive substring match on course name, whitespace included;
    /// blank query matches nothing.
    pub fn search_by_name(&self, query: &str) -> Vec<Course> {
        if query.trim().is_empty() {
            return vec![];
        }
        let needle = query.to_lowercase();
        let mut hits: Vec<Course> = self
            .store
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        hits.sort_by_key(|c| c.id);
        hits
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
