//! Configuration loading: defaults, overrides and error messages.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use registrar_core::{
    config, AveragePolicy, CourseId, RegistryConfig, RegistryError, RegistryService, StudentId,
};

#[test]
fn missing_config_yields_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = config::config_path_at(home.path());
    let cfg = config::load_at(&path).expect("load");
    assert_eq!(cfg, RegistryConfig::default());
    home.child(".registrar/config.yaml").assert(predicate::path::missing());
}

#[test]
fn overrides_drive_allocation_and_policy() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child(".registrar/config.yaml");
    file.write_str("student_id_base: 1\ncourse_id_base: 1\naverage_policy: ungraded_as_zero\n")
        .expect("write");

    let cfg = config::load_at(file.path()).expect("load");
    assert_eq!(cfg.average_policy, AveragePolicy::UngradedAsZero);

    let mut svc = RegistryService::new(cfg);
    assert_eq!(svc.add_student("Alice").expect("student"), StudentId(1));
    assert_eq!(svc.add_course("Math", 3).expect("course"), CourseId(1));
    assert_eq!(svc.policy(), AveragePolicy::UngradedAsZero);
}

#[test]
fn empty_file_yields_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("config.yaml");
    file.write_str("\n").expect("write");
    assert_eq!(config::load_at(file.path()).expect("load"), RegistryConfig::default());
}

#[test]
fn corrupt_config_reports_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("config.yaml");
    file.write_str("student_id_base: [unclosed").expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Config { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn unknown_keys_are_rejected() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("config.yaml");
    file.write_str("avg_policy: exclude_ungraded\n").expect("write");
    assert!(matches!(config::load_at(file.path()), Err(RegistryError::Config { .. })));
}

#[test]
fn id_base_without_headroom_is_rejected() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("config.yaml");
    file.write_str(&format!("student_id_base: {}\n", u64::MAX)).expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidConfig { .. }), "got: {err}");
    assert!(err.to_string().contains("student_id_base"), "got: {err}");
}

#[test]
fn exhausted_allocator_errors_instead_of_panicking() {
    let cfg = RegistryConfig { student_id_base: u64::MAX, ..RegistryConfig::default() };
    let mut svc = RegistryService::new(cfg);

    assert_eq!(svc.add_student("Alice").expect("last id"), StudentId(u64::MAX));
    let err = svc.add_student("Bob").unwrap_err();
    assert!(matches!(err, RegistryError::Exhausted(_)), "got: {err}");
    assert_eq!(svc.list_students().len(), 1);
    assert_eq!(svc.add_course("Math", 2).expect("course"), CourseId(100));
}
