//! Registry service — the one entry point front ends talk to.
//!
//! Owns the identifier allocator and both registries, and is the only place
//! where the two sides of an enrollment are changed together:
//!
//! - enroll: course side first (capacity / duplicate rules), student side
//!   only if the course accepted
//! - drop: both sides
//! - remove student / course: record removed, reciprocal references scrubbed
//!
//! There is no global instance. Build one with [`RegistryService::new`] and
//! hand it to whatever layer needs it.

use serde::Serialize;

use crate::allocator::IdentifierAllocator;
use crate::config::RegistryConfig;
use crate::course::{Course, CourseRegistry};
use crate::error::RegistryError;
use crate::student::{Student, StudentRegistry};
use crate::types::{
    average, AveragePolicy, CourseId, EnrollmentResult, EntityKind, Grade, StudentId,
};

/// Courses created by [`RegistryService::seed_sample_courses`].
pub const SAMPLE_COURSES: [(&str, u32); 3] =
    [("Programming I", 30), ("Programming II", 25), ("Database I", 20)];

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// One line of a student's transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGrade {
    pub course: CourseId,
    pub course_name: String,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReport {
    pub id: StudentId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub courses: Vec<CourseGrade>,
    pub average: f64,
}

/// One line of a course roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentGrade {
    pub student: StudentId,
    pub student_name: String,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseReport {
    pub id: CourseId,
    pub name: String,
    pub max_capacity: u32,
    pub occupancy: String,
    pub students: Vec<StudentGrade>,
    pub average: f64,
}

/// Registry-wide counts and averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStats {
    pub students: usize,
    pub courses: usize,
    pub enrollments: usize,
    pub graded: usize,
    pub overall_average: f64,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RegistryService {
    ids: IdentifierAllocator,
    students: StudentRegistry,
    courses: CourseRegistry,
    policy: AveragePolicy,
}

impl Default for RegistryService {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl RegistryService {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            ids: IdentifierAllocator::with_bases(config.student_id_base, config.course_id_base),
            students: StudentRegistry::new(),
            courses: CourseRegistry::new(),
            policy: config.average_policy,
        }
    }

    pub fn policy(&self) -> AveragePolicy {
        self.policy
    }

    /// Read-only access to the student side.
    pub fn students(&self) -> &StudentRegistry {
        &self.students
    }

    /// Read-only access to the course side.
    pub fn courses(&self) -> &CourseRegistry {
        &self.courses
    }

    // -- creation ----------------------------------------------------------

    pub fn add_student(&mut self, name: &str) -> Result<StudentId, RegistryError> {
        Ok(self.students.create(&mut self.ids, name)?.id())
    }

    pub fn add_course(&mut self, name: &str, capacity: u32) -> Result<CourseId, RegistryError> {
        Ok(self.courses.create(&mut self.ids, name, capacity)?.id())
    }

    /// Create the three sample courses.
    pub fn seed_sample_courses(&mut self) -> Result<Vec<CourseId>, RegistryError> {
        SAMPLE_COURSES
            .iter()
            .map(|(name, cap)| self.add_course(name, *cap))
            .collect()
    }

    // -- enrollment --------------------------------------------------------

    /// Pair a student with a course on both sides, or report why not.
    ///
    /// The student side is only touched when the course accepted, so a
    /// refusal leaves the registry exactly as it was.
    pub fn enroll_student_in_course(
        &mut self,
        student: StudentId,
        course: CourseId,
    ) -> EnrollmentResult {
        if !self.students.contains(student) {
            return EnrollmentResult::NotFound(EntityKind::Student);
        }
        let result = self.courses.admit(course, student);
        if result.is_success() {
            self.students.enroll_in_course(student, course);
            tracing::debug!(student = %student, course = %course, "enrolled");
        } else {
            tracing::debug!(student = %student, course = %course, %result, "enrollment refused");
        }
        result
    }

    /// Undo an enrollment on both sides. `Ok(false)` if the pair was not enrolled.
    pub fn drop_student_from_course(
        &mut self,
        student: StudentId,
        course: CourseId,
    ) -> Result<bool, RegistryError> {
        let s = self.student_ref(student)?;
        let c = self.course_ref(course)?;
        if !s.is_enrolled(course) && !c.is_enrolled(student) {
            return Ok(false);
        }
        self.courses.unenroll(course, student);
        self.students.drop_course(student, course);
        tracing::debug!(student = %student, course = %course, "dropped");
        Ok(true)
    }

    /// Grade an enrolled student. `Ok(false)` if the pair is not enrolled.
    pub fn update_grade(
        &mut self,
        student: StudentId,
        course: CourseId,
        grade: Grade,
    ) -> Result<bool, RegistryError> {
        self.student_ref(student)?;
        self.course_ref(course)?;
        self.students.assign_grade(student, course, grade)
    }

    pub fn rename_student(&mut self, student: StudentId, name: &str) -> Result<(), RegistryError> {
        self.students.rename(student, name)
    }

    /// Set or clear a student's age.
    pub fn set_student_age(
        &mut self,
        student: StudentId,
        age: Option<u32>,
    ) -> Result<(), RegistryError> {
        self.students.set_age(student, age)
    }

    // -- removal -----------------------------------------------------------

    /// Remove a student and free every seat it held.
    pub fn remove_student(&mut self, student: StudentId) -> bool {
        if !self.students.remove(student) {
            return false;
        }
        let freed = self.courses.scrub_student(student);
        tracing::info!(student = %student, freed, "student removed");
        true
    }

    /// Remove a course and strip it from every student's grades.
    pub fn remove_course(&mut self, course: CourseId) -> bool {
        if !self.courses.remove(course) {
            return false;
        }
        let dropped = self.students.scrub_course(course);
        tracing::info!(course = %course, dropped, "course removed");
        true
    }

    // -- queries -----------------------------------------------------------

    pub fn student(&self, id: StudentId) -> Result<Student, RegistryError> {
        self.student_ref(id).cloned()
    }

    pub fn course(&self, id: CourseId) -> Result<Course, RegistryError> {
        self.course_ref(id).cloned()
    }

    pub fn list_students(&self) -> Vec<Student> {
        self.students.all()
    }

    pub fn list_courses(&self) -> Vec<Course> {
        self.courses.all()
    }

    /// Students whose name contains `query`, ignoring case. Blank → empty.
    pub fn search(&self, query: &str) -> Vec<Student> {
        self.students.search_by_name(query)
    }

    pub fn search_courses(&self, query: &str) -> Vec<Course> {
        self.courses.search_by_name(query)
    }

    pub fn course_average_grade(&self, course: CourseId) -> Result<f64, RegistryError> {
        self.course_ref(course)?;
        let students = &self.students;
        Ok(self.courses.average_grade(
            course,
            |s| students.get(s).and_then(|st| st.grade(course)),
            self.policy,
        ))
    }

    pub fn student_average(&self, student: StudentId) -> Result<f64, RegistryError> {
        self.student_ref(student)?;
        Ok(self.students.average(student, self.policy))
    }

    /// Mean over every enrollment in the registry; 0.0 when there is none.
    pub fn overall_average_grade(&self) -> f64 {
        average(self.students.iter().flat_map(|s| s.grades().values()), self.policy)
    }

    pub fn student_report(&self, id: StudentId) -> Result<StudentReport, RegistryError> {
        let s = self.student_ref(id)?;
        let courses = s
            .grades()
            .iter()
            .map(|(course, grade)| CourseGrade {
                course: *course,
                course_name: self
                    .courses
                    .get(*course)
                    .map(|c| c.name().to_owned())
                    .unwrap_or_default(),
                grade: *grade,
            })
            .collect();
        Ok(StudentReport {
            id,
            name: s.name().to_owned(),
            age: s.age(),
            courses,
            average: self.students.average(id, self.policy),
        })
    }

    pub fn course_report(&self, id: CourseId) -> Result<CourseReport, RegistryError> {
        let c = self.course_ref(id)?;
        let students = c
            .enrolled()
            .iter()
            .filter_map(|sid| self.students.get(*sid))
            .map(|s| StudentGrade {
                student: s.id(),
                student_name: s.name().to_owned(),
                grade: s.grade(id).unwrap_or_default(),
            })
            .collect();
        Ok(CourseReport {
            id,
            name: c.name().to_owned(),
            max_capacity: c.max_capacity(),
            occupancy: c.occupancy(),
            students,
            average: self.course_average_grade(id)?,
        })
    }

    pub fn stats(&self) -> RegistryStats {
        let (enrollments, graded) = self
            .students
            .iter()
            .flat_map(|s| s.grades().values())
            .fold((0, 0), |(n, g), grade| (n + 1, g + usize::from(grade.is_graded())));
        RegistryStats {
            students: self.students.len(),
            courses: self.courses.len(),
            enrollments,
            graded,
            overall_average: self.overall_average_grade(),
        }
    }

    /// Verify both sides of every enrollment agree and no course is over capacity.
    pub fn check_invariants(&self) -> Result<(), RegistryError> {
        for c in self.courses.iter() {
            if c.enrolled_count() > c.max_capacity() as usize {
                return Err(RegistryError::Inconsistent(format!(
                    "course {} holds {} students over capacity {}",
                    c.id(),
                    c.enrolled_count(),
                    c.max_capacity()
                )));
            }
            for sid in c.enrolled() {
                match self.students.get(*sid) {
                    Some(s) if s.is_enrolled(c.id()) => {}
                    Some(_) => {
                        return Err(RegistryError::Inconsistent(format!(
                            "course {} lists student {sid} who has no grade entry for it",
                            c.id()
                        )))
                    }
                    None => {
                        return Err(RegistryError::Inconsistent(format!(
                            "course {} lists unknown student {sid}",
                            c.id()
                        )))
                    }
                }
            }
        }
        for s in self.students.iter() {
            for cid in s.grades().keys() {
                match self.courses.get(*cid) {
                    Some(c) if c.is_enrolled(s.id()) => {}
                    Some(_) => {
                        return Err(RegistryError::Inconsistent(format!(
                            "student {} holds a grade for course {cid} that does not list them",
                            s.id()
                        )))
                    }
                    None => {
                        return Err(RegistryError::Inconsistent(format!(
                            "student {} holds a grade for unknown course {cid}",
                            s.id()
                        )))
                    }
                }
            }
        }
        Ok(())
    }

    fn student_ref(&self, id: StudentId) -> Result<&Student, RegistryError> {
        self.students.get(id).ok_or_else(|| RegistryError::student_not_found(id))
    }

    fn course_ref(&self, id: CourseId) -> Result<&Course, RegistryError> {
        self.courses.get(id).ok_or_else(|| RegistryError::course_not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
