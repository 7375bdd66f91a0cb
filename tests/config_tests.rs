//! Integration tests for configuration loading.
//!
//! These tests mutate process environment variables, so they are serialized
//! with `serial_test`.

use daybook::Config;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
#[serial]
fn test_load_uses_daybook_dir_env_var() {
    env::set_var("DAYBOOK_DIR", "/custom/journal/path");

    let config = Config::load().expect("load config");
    assert_eq!(config.data_dir, PathBuf::from("/custom/journal/path"));
    assert_eq!(
        config.db_path(),
        PathBuf::from("/custom/journal/path/daybook.db")
    );

    env::remove_var("DAYBOOK_DIR");
}

#[test]
#[serial]
fn test_load_falls_back_to_home() {
    env::remove_var("DAYBOOK_DIR");
    env::set_var("HOME", "/home/tester");

    let config = Config::load().expect("load config");
    assert_eq!(config.data_dir, PathBuf::from("/home/tester/.daybook"));
}

#[test]
#[serial]
fn test_load_expands_tilde() {
    env::set_var("HOME", "/home/tester");
    env::set_var("DAYBOOK_DIR", "~/journals");

    let config = Config::load().expect("load config");
    assert_eq!(config.data_dir, PathBuf::from("/home/tester/journals"));

    env::remove_var("DAYBOOK_DIR");
}

#[test]
#[serial]
fn test_load_fails_without_home_or_daybook_dir() {
    let saved_home = env::var("HOME").ok();
    env::remove_var("DAYBOOK_DIR");
    env::remove_var("HOME");

    let result = Config::load();
    assert!(result.is_err());

    if let Some(home) = saved_home {
        env::set_var("HOME", home);
    }
}
