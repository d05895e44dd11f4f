//! `registrar demo` — the capacity/averaging walkthrough on a fresh registry.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use registrar_core::{Grade, RegistryConfig, RegistryService};

use super::render;

/// Arguments for `registrar demo`.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Skip the sample courses and only create Math.
    #[arg(long)]
    pub no_seed: bool,
}

impl DemoArgs {
    pub fn run(self, config: RegistryConfig) -> Result<()> {
        let mut svc = RegistryService::new(config);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run_demo(&mut svc, !self.no_seed, &mut out)
    }
}

/// Math (capacity 2); Alice and Bob get in, Carol is refused; grades 90 and 70.
pub fn run_demo(svc: &mut RegistryService, seed: bool, out: &mut dyn Write) -> Result<()> {
    if seed {
        svc.seed_sample_courses().context("failed to seed sample courses")?;
    }
    let math = svc.add_course("Math", 2)?;
    writeln!(out, "Created course Math (ID {math}, capacity 2)")?;

    let mut students = Vec::new();
    for name in ["Alice", "Bob", "Carol"] {
        let id = svc.add_student(name)?;
        writeln!(out, "Created student {name} (ID {id})")?;
        students.push((name, id));
    }

    for (name, id) in &students {
        let result = svc.enroll_student_in_course(*id, math);
        let mark = if result.is_success() { "✓".green() } else { "✗".yellow() };
        writeln!(out, "{mark} Enroll {name} → Math: {result}")?;
    }

    for ((name, id), pct) in students.iter().zip([90.0, 70.0]) {
        svc.update_grade(*id, math, Grade::Percent(pct))?;
        writeln!(out, "Graded {name}: {}", Grade::Percent(pct))?;
    }

    writeln!(out)?;
    render::course_report(out, &svc.course_report(math)?)?;
    writeln!(out)?;
    render::courses(out, svc, &svc.list_courses())?;
    render::students(out, &svc.list_students())?;
    svc.check_invariants()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_average_is_eighty() {
        let mut svc = RegistryService::default();
        let mut out = Vec::new();
        run_demo(&mut svc, true, &mut out).expect("demo");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Enroll Carol → Math: course is full"), "got: {text}");
        assert!(text.contains("Average Grade: 80.00%"), "got: {text}");
        assert_eq!(svc.list_courses().len(), 4);
    }
}
