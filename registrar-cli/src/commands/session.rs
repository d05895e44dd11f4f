//! One-line commands accepted by `registrar shell`, and their execution
//! against a [`RegistryService`].

use std::io::Write;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use registrar_core::{CourseId, EnrollmentResult, EntityKind, Grade, RegistryService, StudentId};

use super::render;

/// Parser for a single shell line (no binary name).
#[derive(Parser, Debug)]
#[command(
    name = "registrar",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<command> [args]"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Register a student: add-student <name…>
    AddStudent {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Create a course: add-course <capacity> <name…>
    AddCourse {
        capacity: u32,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Enroll a student in a course.
    Enroll { student: StudentId, course: CourseId },

    /// Remove a student from a course (both sides).
    Drop { student: StudentId, course: CourseId },

    /// Set a grade: a percentage, a letter A–F, or `-` for ungraded.
    Grade {
        student: StudentId,
        course: CourseId,
        #[arg(allow_hyphen_values = true, allow_negative_numbers = true)]
        grade: Grade,
    },

    /// Change a student's name.
    Rename {
        student: StudentId,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Set a student's age; omit the age to clear it.
    SetAge { student: StudentId, age: Option<u32> },

    /// Delete a student and free its seats.
    RemoveStudent { id: StudentId },

    /// Delete a course and strip it from every student.
    RemoveCourse { id: CourseId },

    /// List all students.
    Students {
        #[arg(long)]
        json: bool,
    },

    /// List all courses with occupancy and average grade.
    Courses {
        #[arg(long)]
        json: bool,
    },

    /// Find students by name (case-insensitive substring).
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Show a student's courses and grades.
    ShowStudent {
        id: StudentId,
        #[arg(long)]
        json: bool,
    },

    /// Show a course roster and average.
    ShowCourse {
        id: CourseId,
        #[arg(long)]
        json: bool,
    },

    /// Average grade of a course, a student, or (default) everyone.
    Average {
        #[arg(long, conflicts_with = "student")]
        course: Option<CourseId>,
        #[arg(long)]
        student: Option<StudentId>,
    },

    /// Registry-wide counts.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Verify every enrollment is recorded on both sides.
    Check,

    /// End the session.
    #[command(alias = "exit")]
    Quit,
}

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command. Registry errors are returned; business refusals
/// (course full, not enrolled, …) are printed and count as success.
pub fn execute(svc: &mut RegistryService, cmd: ShellCommand, out: &mut dyn Write) -> Result<Flow> {
    match cmd {
        ShellCommand::AddStudent { name } => {
            let name = name.join(" ");
            let id = svc.add_student(&name)?;
            writeln!(out, "{} Added student '{}' (ID {id})", ok(), name.trim())?;
        }
        ShellCommand::AddCourse { capacity, name } => {
            let name = name.join(" ");
            let id = svc.add_course(&name, capacity)?;
            writeln!(
                out,
                "{} Added course '{}' (ID {id}, capacity {capacity})",
                ok(),
                name.trim()
            )?;
        }
        ShellCommand::Enroll { student, course } => {
            match svc.enroll_student_in_course(student, course) {
                EnrollmentResult::Success => {
                    writeln!(out, "{} Enrolled student {student} in course {course}", ok())?
                }
                EnrollmentResult::NotFound(kind) => {
                    let id = match kind {
                        EntityKind::Student => student.0,
                        EntityKind::Course => course.0,
                    };
                    bail!("{kind} {id} not found");
                }
                refused => writeln!(out, "{} Enrollment refused: {refused}", no())?,
            }
        }
        ShellCommand::Drop { student, course } => {
            if svc.drop_student_from_course(student, course)? {
                writeln!(out, "{} Dropped student {student} from course {course}", ok())?;
            } else {
                writeln!(out, "{} Student {student} is not enrolled in course {course}", no())?;
            }
        }
        ShellCommand::Grade { student, course, grade } => {
            if svc.update_grade(student, course, grade)? {
                writeln!(
                    out,
                    "{} Grade for student {student} in course {course} set to {grade}",
                    ok()
                )?;
            } else {
                writeln!(out, "{} Student {student} is not enrolled in course {course}", no())?;
            }
        }
        ShellCommand::Rename { student, name } => {
            let name = name.join(" ");
            svc.rename_student(student, &name)?;
            writeln!(out, "{} Renamed student {student} to '{}'", ok(), name.trim())?;
        }
        ShellCommand::SetAge { student, age } => {
            svc.set_student_age(student, age)?;
            match age {
                Some(age) => writeln!(out, "{} Set age of student {student} to {age}", ok())?,
                None => writeln!(out, "{} Cleared age of student {student}", ok())?,
            }
        }
        ShellCommand::RemoveStudent { id } => {
            if svc.remove_student(id) {
                writeln!(out, "{} Removed student {id}", ok())?;
            } else {
                bail!("student {id} not found");
            }
        }
        ShellCommand::RemoveCourse { id } => {
            if svc.remove_course(id) {
                writeln!(out, "{} Removed course {id}", ok())?;
            } else {
                bail!("course {id} not found");
            }
        }
        ShellCommand::Students { json } => {
            let students = svc.list_students();
            if json {
                render::json(out, &students)?;
            } else {
                render::students(out, &students)?;
            }
        }
        ShellCommand::Courses { json } => {
            let courses = svc.list_courses();
            if json {
                render::courses_json(out, svc, &courses)?;
            } else {
                render::courses(out, svc, &courses)?;
            }
        }
        ShellCommand::Search { query, json } => {
            let hits = svc.search(&query.join(" "));
            if json {
                render::json(out, &hits)?;
            } else {
                render::students(out, &hits)?;
            }
        }
        ShellCommand::ShowStudent { id, json } => {
            let report = svc.student_report(id)?;
            if json {
                render::json(out, &report)?;
            } else {
                render::student_report(out, &report)?;
            }
        }
        ShellCommand::ShowCourse { id, json } => {
            let report = svc.course_report(id)?;
            if json {
                render::json(out, &report)?;
            } else {
                render::course_report(out, &report)?;
            }
        }
        ShellCommand::Average { course, student } => match (course, student) {
            (Some(course), _) => {
                let avg = svc.course_average_grade(course)?;
                writeln!(out, "Average grade for course {course}: {}", render::percent(avg))?;
            }
            (None, Some(student)) => {
                let avg = svc.student_average(student)?;
                writeln!(out, "Average grade for student {student}: {}", render::percent(avg))?;
            }
            (None, None) => {
                let avg = svc.overall_average_grade();
                writeln!(out, "Overall average grade: {}", render::percent(avg))?;
            }
        },
        ShellCommand::Stats { json } => {
            let stats = svc.stats();
            if json {
                render::json(out, &stats)?;
            } else {
                render::stats(out, &stats)?;
            }
        }
        ShellCommand::Check => {
            svc.check_invariants()?;
            writeln!(out, "{} Registry is consistent", ok())?;
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn ok() -> colored::ColoredString {
    "✓".green()
}

fn no() -> colored::ColoredString {
    "✗".yellow()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(svc: &mut RegistryService, line: &str) -> Result<String> {
        let parsed = ShellLine::try_parse_from(line.split_whitespace())?;
        let mut out = Vec::new();
        execute(svc, parsed.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn multi_word_names_are_joined() {
        let mut svc = RegistryService::default();
        let out = run(&mut svc, "add-course 30 Programming I").unwrap();
        assert!(out.contains("'Programming I' (ID 100, capacity 30)"), "got: {out}");
        let out = run(&mut svc, "add-student Cory Janowski").unwrap();
        assert!(out.contains("'Cory Janowski' (ID 1000)"), "got: {out}");
    }

    #[test]
    fn negative_grade_parses_and_is_rejected() {
        let mut svc = RegistryService::default();
        run(&mut svc, "add-student Alice").unwrap();
        run(&mut svc, "add-course 2 Math").unwrap();
        run(&mut svc, "enroll 1000 100").unwrap();
        let err = run(&mut svc, "grade 1000 100 -1").unwrap_err();
        assert!(err.to_string().contains("between 0 and 100"), "got: {err}");
    }

    #[test]
    fn enroll_refusal_is_not_an_error() {
        let mut svc = RegistryService::default();
        run(&mut svc, "add-student Alice").unwrap();
        run(&mut svc, "add-course 1 Math").unwrap();
        run(&mut svc, "enroll 1000 100").unwrap();
        let out = run(&mut svc, "enroll 1000 100").unwrap();
        assert!(out.contains("student already enrolled"), "got: {out}");
        let err = run(&mut svc, "enroll 1000 999").unwrap_err();
        assert_eq!(err.to_string(), "course 999 not found");
    }

    #[test]
    fn quit_and_exit_stop_the_session() {
        let mut svc = RegistryService::default();
        for line in ["quit", "exit"] {
            let parsed = ShellLine::try_parse_from(line.split_whitespace()).unwrap();
            assert_eq!(execute(&mut svc, parsed.command, &mut Vec::new()).unwrap(), Flow::Quit);
        }
    }

    #[test]
    fn age_is_shown_and_negative_age_rejected() {
        let mut svc = RegistryService::default();
        run(&mut svc, "add-student Alice").unwrap();
        run(&mut svc, "set-age 1000 20").unwrap();
        let out = run(&mut svc, "show-student 1000").unwrap();
        assert!(out.contains("Age: 20"), "got: {out}");
        assert!(run(&mut svc, "set-age 1000 -3").is_err());
        assert_eq!(svc.student(StudentId(1000)).unwrap().age(), Some(20));
        run(&mut svc, "set-age 1000").unwrap();
        let out = run(&mut svc, "show-student 1000").unwrap();
        assert!(!out.contains("Age:"), "got: {out}");
    }

    #[test]
    fn bad_ids_fail_to_parse() {
        assert!(ShellLine::try_parse_from("enroll abc 100".split_whitespace()).is_err());
    }
}
