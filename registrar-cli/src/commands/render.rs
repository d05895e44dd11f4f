//! Table and JSON rendering for registry read models.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use registrar_core::{Course, CourseReport, RegistryService, RegistryStats, Student, StudentReport};

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Courses Enrolled")]
    courses: usize,
}

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enrolled/Max")]
    occupancy: String,
    #[tabled(rename = "Average")]
    average: String,
}

#[derive(Tabled)]
struct GradeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Grade")]
    grade: String,
}

/// Course listing entry for `--json`: the course plus its average.
#[derive(Serialize)]
struct CourseSummaryJson<'a> {
    #[serde(flatten)]
    course: &'a Course,
    average: f64,
}

pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    writeln!(out, "{text}")?;
    Ok(())
}

pub fn students(out: &mut dyn Write, students: &[Student]) -> Result<()> {
    if students.is_empty() {
        writeln!(out, "No students found.")?;
        return Ok(());
    }
    let rows: Vec<StudentRow> = students
        .iter()
        .map(|s| StudentRow {
            id: s.id().to_string(),
            name: s.name().to_owned(),
            courses: s.course_count(),
        })
        .collect();
    write_table(out, rows)
}

pub fn courses(out: &mut dyn Write, svc: &RegistryService, courses: &[Course]) -> Result<()> {
    if courses.is_empty() {
        writeln!(out, "No courses found.")?;
        return Ok(());
    }
    let rows = courses
        .iter()
        .map(|c| -> Result<CourseRow> {
            Ok(CourseRow {
                id: c.id().to_string(),
                name: c.name().to_owned(),
                occupancy: c.occupancy(),
                average: percent(svc.course_average_grade(c.id())?),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    write_table(out, rows)
}

pub fn courses_json(out: &mut dyn Write, svc: &RegistryService, courses: &[Course]) -> Result<()> {
    let payload = courses
        .iter()
        .map(|course| -> Result<CourseSummaryJson<'_>> {
            Ok(CourseSummaryJson { course, average: svc.course_average_grade(course.id())? })
        })
        .collect::<Result<Vec<_>>>()?;
    json(out, &payload)
}

pub fn student_report(out: &mut dyn Write, report: &StudentReport) -> Result<()> {
    writeln!(out, "{}", "Student Information".bold())?;
    writeln!(out, "ID: {}", report.id)?;
    writeln!(out, "Name: {}", report.name)?;
    if let Some(age) = report.age {
        writeln!(out, "Age: {age}")?;
    }
    if report.courses.is_empty() {
        writeln!(out, "Not enrolled in any courses.")?;
        return Ok(());
    }
    let rows: Vec<GradeRow> = report
        .courses
        .iter()
        .map(|c| GradeRow {
            id: c.course.to_string(),
            name: c.course_name.clone(),
            grade: c.grade.to_string(),
        })
        .collect();
    write_table(out, rows)?;
    writeln!(out, "Average: {}", percent(report.average))?;
    Ok(())
}

pub fn course_report(out: &mut dyn Write, report: &CourseReport) -> Result<()> {
    writeln!(out, "{}", "Course Information".bold())?;
    writeln!(out, "ID: {}", report.id)?;
    writeln!(out, "Name: {}", report.name)?;
    writeln!(out, "Enrolled/Max: {}", report.occupancy)?;
    writeln!(out, "Average Grade: {}", percent(report.average))?;
    if report.students.is_empty() {
        writeln!(out, "No students enrolled.")?;
        return Ok(());
    }
    let rows: Vec<GradeRow> = report
        .students
        .iter()
        .map(|s| GradeRow {
            id: s.student.to_string(),
            name: s.student_name.clone(),
            grade: s.grade.to_string(),
        })
        .collect();
    write_table(out, rows)
}

pub fn stats(out: &mut dyn Write, stats: &RegistryStats) -> Result<()> {
    writeln!(
        out,
        "{} students | {} courses | {} enrollments ({} graded) | overall average {}",
        stats.students,
        stats.courses,
        stats.enrollments,
        stats.graded,
        percent(stats.overall_average),
    )?;
    Ok(())
}

fn write_table<T: Tabled>(out: &mut dyn Write, rows: Vec<T>) -> Result<()> {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    writeln!(out, "{table}")?;
    Ok(())
}
