//! Start-up configuration.
//!
//! # File layout
//!
//! ```text
//! ~/.registrar/
//!   config.yaml
//! ```
//!
//! ```yaml
//! student_id_base: 1000
//! course_id_base: 100
//! average_policy: exclude_ungraded   # or ungraded_as_zero
//! ```
//!
//! Every field is optional. As with the rest of the crate, `load_at` takes an
//! explicit path (used by tests) and `load` derives it from `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::allocator::{COURSE_ID_BASE, MAX_ID_BASE, STUDENT_ID_BASE};
use crate::error::RegistryError;
use crate::types::AveragePolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub student_id_base: u64,
    pub course_id_base: u64,
    pub average_policy: AveragePolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            student_id_base: STUDENT_ID_BASE,
            course_id_base: COURSE_ID_BASE,
            average_policy: AveragePolicy::default(),
        }
    }
}

/// `<home>/.registrar/config.yaml`. Pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".registrar").join("config.yaml")
}

/// Load configuration from `path`.
///
/// A missing file yields [`RegistryConfig::default`]; malformed YAML yields
/// `RegistryError::Config` carrying the path. An id base above
/// [`MAX_ID_BASE`] is rejected with `RegistryError::InvalidConfig`.
pub fn load_at(path: &Path) -> Result<RegistryConfig, RegistryError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(RegistryConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(RegistryConfig::default());
    }
    let config: RegistryConfig =
        serde_yaml::from_str(&contents).map_err(|e| RegistryError::Config {
            path: path.to_path_buf(),
            source: e,
        })?;
    check_bases(&config).map_err(|reason| RegistryError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(config)
}

fn check_bases(config: &RegistryConfig) -> Result<(), String> {
    for (field, base) in [
        ("student_id_base", config.student_id_base),
        ("course_id_base", config.course_id_base),
    ] {
        if base > MAX_ID_BASE {
            return Err(format!("{field} must be at most {MAX_ID_BASE}, got {base}"));
        }
    }
    Ok(())
}

/// `load_at(~/.registrar/config.yaml)` convenience wrapper.
pub fn load() -> Result<RegistryConfig, RegistryError> {
    load_at(&config_path_at(&home()?))
}

fn home() -> Result<PathBuf, RegistryError> {
    dirs::home_dir().ok_or(RegistryError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_correct() {
        let home = TempDir::new().expect("tempdir");
        assert!(config_path_at(home.path()).ends_with(".registrar/config.yaml"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let home = TempDir::new().expect("tempdir");
        let cfg = load_at(&config_path_at(home.path())).expect("load");
        assert_eq!(cfg, RegistryConfig::default());
        assert_eq!(cfg.student_id_base, 1000);
        assert_eq!(cfg.course_id_base, 100);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let home = TempDir::new().expect("tempdir");
        let path = home.path().join("config.yaml");
        std::fs::write(&path, "average_policy: ungraded_as_zero\n").expect("write");
        let cfg = load_at(&path).expect("load");
        assert_eq!(cfg.average_policy, AveragePolicy::UngradedAsZero);
        assert_eq!(cfg.student_id_base, 1000);
    }

    #[test]
    fn base_at_limit_is_accepted() {
        let home = TempDir::new().expect("tempdir");
        let path = home.path().join("config.yaml");
        std::fs::write(&path, format!("course_id_base: {MAX_ID_BASE}\n")).expect("write");
        assert_eq!(load_at(&path).expect("load").course_id_base, MAX_ID_BASE);
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(RegistryError::HomeNotFound.to_string().contains("home directory"));
    }
}
