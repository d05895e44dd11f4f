//! Student entity and the registry that owns it.
//!
//! Each student carries its own course→grade map. An entry exists exactly
//! while the student is enrolled in that course.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::allocator::IdentifierAllocator;
use crate::error::RegistryError;
use crate::store::EntityStore;
use crate::types::{average, AveragePolicy, CourseId, EntityKind, Grade, StudentId};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    id: StudentId,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<u32>,
    created_at: DateTime<Utc>,
    grades: BTreeMap<CourseId, Grade>,
}

impl Student {
    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Read-only view of course→grade.
    pub fn grades(&self) -> &BTreeMap<CourseId, Grade> {
        &self.grades
    }

    pub fn grade(&self, course: CourseId) -> Option<Grade> {
        self.grades.get(&course).copied()
    }

    pub fn is_enrolled(&self, course: CourseId) -> bool {
        self.grades.contains_key(&course)
    }

    pub fn course_count(&self) -> usize {
        self.grades.len()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StudentRegistry {
    store: EntityStore<StudentId, Student>,
}

impl StudentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, allocate an id and store a student with no courses.
    pub fn create(
        &mut self,
        ids: &mut IdentifierAllocator,
        name: &str,
    ) -> Result<Student, RegistryError> {
        let name = validate_name(name)?;
        let id = ids.next(EntityKind::Student).ok_or(RegistryError::Exhausted(EntityKind::Student))?;
        let student = Student {
            id: StudentId(id),
            name,
            age: None,
            created_at: Utc::now(),
            grades: BTreeMap::new(),
        };
        tracing::debug!(student = %student.id, name = %student.name, "student created");
        self.store.insert(student.id, student.clone());
        Ok(student)
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.store.get(&id)
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.store.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Every student, sorted by id.
    pub fn all(&self) -> Vec<Student> {
        let mut students = self.store.all();
        students.sort_by_key(|s| s.id);
        students
    }

    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.store.values()
    }

    /// Remove the student record only. Courses still listing the student
    /// must be scrubbed by the caller.
    pub fn remove(&mut self, id: StudentId) -> bool {
        self.store.remove(&id)
    }

    /// Replace the student's name after the same validation as `create`.
    pub fn rename(&mut self, id: StudentId, name: &str) -> Result<(), RegistryError> {
        let name = validate_name(name)?;
        let Some(mut student) = self.store.get(&id).cloned() else {
            return Err(RegistryError::student_not_found(id));
        };
        student.name = name;
        self.store.update(&id, student);
        Ok(())
    }

    /// Set or clear (`None`) the student's age.
    pub fn set_age(&mut self, id: StudentId, age: Option<u32>) -> Result<(), RegistryError> {
        let student = self
            .store
            .get_mut(&id)
            .ok_or_else(|| RegistryError::student_not_found(id))?;
        student.age = age;
        Ok(())
    }

    /// Record an ungraded enrollment. Keeps the existing grade if the
    /// student already holds the course.
    pub fn enroll_in_course(&mut self, student: StudentId, course: CourseId) {
        if let Some(s) = self.store.get_mut(&student) {
            s.grades.entry(course).or_insert(Grade::Ungraded);
        }
    }

    /// Overwrite the grade for an enrolled course.
    ///
    /// Out-of-range grades are a `Validation` error and leave the stored
    /// grade untouched. Returns `false` when the student is unknown or not
    /// enrolled in `course`.
    pub fn assign_grade(
        &mut self,
        student: StudentId,
        course: CourseId,
        grade: Grade,
    ) -> Result<bool, RegistryError> {
        if let Err(err) = grade.validate() {
            tracing::warn!(student = %student, course = %course, "rejected grade: {err}");
            return Err(err);
        }
        let Some(slot) = self
            .store
            .get_mut(&student)
            .and_then(|s| s.grades.get_mut(&course))
        else {
            return Ok(false);
        };
        *slot = grade;
        tracing::debug!(student = %student, course = %course, grade = %grade, "grade assigned");
        Ok(true)
    }

    /// Remove `course` from the student's grade map if present.
    pub fn drop_course(&mut self, student: StudentId, course: CourseId) {
        if let Some(s) = self.store.get_mut(&student) {
            s.grades.remove(&course);
        }
    }

    /// Drop `course` from every student. Returns how many entries were removed.
    pub fn scrub_course(&mut self, course: CourseId) -> usize {
        self.store
            .values_mut()
            .map(|s| s.grades.remove(&course).is_some())
            .filter(|removed| *removed)
            .count()
    }

    /// Mean of the student's grades across enrolled courses; 0.0 when
    /// unknown or nothing counts.
    pub fn average(&self, student: StudentId, policy: AveragePolicy) -> f64 {
        self.store
            .get(&student)
            .map(|s| average(s.grades.values(), policy))
            .unwrap_or(0.0)
    }

    /// Case-insensitive substring match on name, sorted by id.
    ///
    /// A blank query yields nothing rather than every student. The query is
    /// matched as given, surrounding whitespace included.
    pub fn search_by_name(&self, query: &str) -> Vec<Student> {
        if query.trim().is_empty() {
            return vec![];
        }
        let needle = query.to_lowercase();
        let mut hits: Vec<Student> = self
            .store
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        hits.sort_by_key(|s| s.id);
        hits
    }
}

fn validate_name(name: &str) -> Result<String, RegistryError> {
    let name = name.trim();
    if name.is_empty() {
        tracing::warn!("rejected blank student name");
        return Err(RegistryError::validation("student name cannot be empty"));
    }
    Ok(name.to_owned())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
