//! End-to-end tests: pipe scripts into `registrar shell` and run `demo`.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn registrar_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("registrar"));
    cmd.env("HOME", home).env("USERPROFILE", home).env("NO_COLOR", "1");
    cmd
}

const MATH_SCRIPT: &str = "\
# canonical capacity scenario
add-course 2 Math
add-student Alice
add-student Bob
add-student Carol
enroll 1000 100
enroll 1001 100
enroll 1002 100
grade 1000 100 90
grade 1001 100 70
average --course 100
check
";

#[test]
fn math_scenario_through_shell() {
    let home = TempDir::new().expect("home");
    registrar_cmd(home.path())
        .arg("shell")
        .write_stdin(MATH_SCRIPT)
        .assert()
        .success()
        .stdout(contains("Enrolled student 1000 in course 100"))
        .stdout(contains("Enrollment refused: course is full"))
        .stdout(contains("Average grade for course 100: 80.00%"))
        .stdout(contains("Registry is consistent"));
}

#[test]
fn validation_errors_go_to_stderr_and_session_continues() {
    let home = TempDir::new().expect("home");
    registrar_cmd(home.path())
        .arg("shell")
        .write_stdin("add-course 0 Empty\nadd-student Alice\nstudents\n")
        .assert()
        .success()
        .stderr(contains("course capacity must be at least 1"))
        .stdout(contains("Alice"))
        .stdout(contains("Empty").not());
}

#[test]
fn unknown_ids_report_not_found() {
    let home = TempDir::new().expect("home");
    registrar_cmd(home.path())
        .arg("shell")
        .write_stdin("add-student Alice\ngrade 1000 555 50\nshow-student 4242\n")
        .assert()
        .success()
        .stderr(contains("course 555 not found"))
        .stderr(contains("student 4242 not found"));
}

#[test]
fn seeded_courses_listed_as_json() {
    let home = TempDir::new().expect("home");
    let assert = registrar_cmd(home.path())
        .args(["shell", "--seed"])
        .write_stdin("courses --json\n")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let courses: serde_json::Value = serde_json::from_str(&stdout).expect("json");
    let names: Vec<&str> = courses
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["Programming I", "Programming II", "Database I"]);
    assert_eq!(courses[0]["max_capacity"], 30);
    assert_eq!(courses[0]["average"], 0.0);
}

#[test]
fn cascade_delete_through_shell() {
    let home = TempDir::new().expect("home");
    registrar_cmd(home.path())
        .arg("shell")
        .write_stdin(
            "add-course 5 Math\nadd-student Alice\nenroll 1000 100\nremove-course 100\nshow-student 1000\ncheck\n",
        )
        .assert()
        .success()
        .stdout(contains("Removed course 100"))
        .stdout(contains("Not enrolled in any courses."))
        .stdout(contains("Registry is consistent"));
}

#[test]
fn config_file_changes_id_bases() {
    let home = TempDir::new().expect("home");
    let cfg = home.path().join(".registrar");
    fs::create_dir_all(&cfg).expect("mkdir");
    fs::write(cfg.join("config.yaml"), "student_id_base: 1\ncourse_id_base: 500\n").expect("write");

    registrar_cmd(home.path())
        .arg("shell")
        .write_stdin("add-student Alice\nadd-course 3 Art\n")
        .assert()
        .success()
        .stdout(contains("'Alice' (ID 1)"))
        .stdout(contains("'Art' (ID 500, capacity 3)"));
}

#[test]
fn explicit_config_that_is_corrupt_fails() {
    let home = TempDir::new().expect("home");
    let path = home.path().join("bad.yaml");
    fs::write(&path, "course_id_base: [oops").expect("write");

    registrar_cmd(home.path())
        .args(["--config", path.to_str().expect("utf8 path"), "shell"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("failed to load config"));
}

#[test]
fn demo_prints_scenario() {
    let home = TempDir::new().expect("home");
    registrar_cmd(home.path())
        .arg("demo")
        .assert()
        .success()
        .stdout(contains("Enroll Carol → Math: course is full"))
        .stdout(contains("Average Grade: 80.00%"))
        .stdout(contains("Programming II"));
}
