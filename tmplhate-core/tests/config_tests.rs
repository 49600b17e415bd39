//! Config-file lookup and error-message tests.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use tmplhate_core::{config, CaseConvention, ConfigError, EnvPolicy};

// ---------------------------------------------------------------------------
// 1. Lookup
// ---------------------------------------------------------------------------

#[test]
fn default_file_in_home_is_loaded() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".tmplhate.yaml")
        .write_str("values: ~/values.yaml\ncase: title\nenv_policy: single-uppercased\n")
        .expect("write");

    let loaded = config::load_at(None, Some(home.path()))
        .expect("load")
        .expect("config present");
    assert_eq!(loaded.config.values.as_deref(), Some("~/values.yaml"));
    assert_eq!(loaded.config.case, Some(CaseConvention::Title));
    assert_eq!(loaded.config.env_policy, Some(EnvPolicy::SingleUppercased));
    assert_eq!(loaded.config.dont_normalize, None);
}

#[test]
fn yml_extension_is_found() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".tmplhate.yml").write_str("dont_normalize: true\n").expect("write");

    let loaded = config::load_at(None, Some(home.path())).unwrap().expect("config present");
    assert_eq!(loaded.config.dont_normalize, Some(true));
    home.child(".tmplhate.yml").assert(predicate::path::is_file());
}

#[test]
fn explicit_path_wins_over_home() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".tmplhate.yaml").write_str("case: upper\n").expect("write");
    let explicit = home.child("custom.yaml");
    explicit.write_str("case: title\n").expect("write");

    let loaded = config::load_at(Some(explicit.path()), Some(home.path()))
        .unwrap()
        .expect("config present");
    assert_eq!(loaded.config.case, Some(CaseConvention::Title));
    assert_eq!(loaded.path, explicit.path());
}

// ---------------------------------------------------------------------------
// 2. Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_explicit_path_is_read_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let missing = home.child("absent.yaml");

    let err = config::load_at(Some(missing.path()), Some(home.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }), "got: {err}");
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn invalid_case_value_is_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".tmplhate.yaml").write_str("case: camel\n").expect("write");

    let err = config::load_at(None, Some(home.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains(".tmplhate.yaml"));
}

#[test]
fn list_root_is_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".tmplhate.yaml").write_str("- a\n- b\n").expect("write");

    let err = config::load_at(None, Some(home.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}
