//! Credential resolution order: file, then environment, then static config.
//!
//! All tests are serialized because they manipulate process-wide environment
//! variables.

use std::collections::HashMap;
use std::env;
use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use spotscale_core::config::credential::{ENV_ACCOUNT, ENV_CREDENTIALS_FILE, ENV_TOKEN};
use spotscale_core::config::{ConfigError, TargetConfig, resolve_credentials};

/// Remove every ambient credential source so each test starts clean.
fn scrub_env() {
    unsafe {
        env::remove_var(ENV_TOKEN);
        env::remove_var(ENV_ACCOUNT);
        env::set_var(ENV_CREDENTIALS_FILE, "/nonexistent/spot/credentials");
    }
}

fn config(pairs: &[(&str, &str)]) -> TargetConfig {
    let mut map = HashMap::from([
        ("provider".to_string(), "aws".to_string()),
        ("group_id".to_string(), "sig-1".to_string()),
    ]);
    for (key, value) in pairs {
        map.insert(key.to_string(), value.to_string());
    }
    TargetConfig::from_map(&map).unwrap()
}

fn write_credential_file(dir: &TempDir, contents: &str) {
    let path = dir.path().join("credentials");
    fs::write(&path, contents).unwrap();
    unsafe {
        env::set_var(ENV_CREDENTIALS_FILE, &path);
    }
}

// ---------------------------------------------------------------------------
// Source precedence
// ---------------------------------------------------------------------------

#[test]
#[serial]
fn file_source_wins_over_environment_and_static() {
    scrub_env();
    let dir = TempDir::new().unwrap();
    write_credential_file(&dir, "token = \"file-token\"\naccount = \"file-acct\"\n");
    unsafe {
        env::set_var(ENV_TOKEN, "env-token");
        env::set_var(ENV_ACCOUNT, "env-acct");
    }

    let creds = resolve_credentials(&config(&[
        ("token", "static-token"),
        ("account_id", "static-acct"),
    ]))
    .unwrap();

    assert_eq!(creds.token, "file-token");
    assert_eq!(creds.account_id, "file-acct");
    scrub_env();
}

#[test]
#[serial]
fn environment_wins_over_static_config() {
    scrub_env();
    unsafe {
        env::set_var(ENV_TOKEN, "env-token");
        env::set_var(ENV_ACCOUNT, "env-acct");
    }

    let creds = resolve_credentials(&config(&[
        ("token", "static-token"),
        ("account_id", "static-acct"),
    ]))
    .unwrap();

    assert_eq!(creds.token, "env-token");
    assert_eq!(creds.account_id, "env-acct");
    scrub_env();
}

#[test]
#[serial]
fn static_config_is_the_last_resort() {
    scrub_env();

    let creds = resolve_credentials(&config(&[
        ("token", "static-token"),
        ("account_id", "static-acct"),
    ]))
    .unwrap();

    assert_eq!(creds.token, "static-token");
    assert_eq!(creds.account_id, "static-acct");
}

// ---------------------------------------------------------------------------
// Incomplete sources
// ---------------------------------------------------------------------------

#[test]
#[serial]
fn a_partial_file_falls_through_to_the_next_source() {
    scrub_env();
    let dir = TempDir::new().unwrap();
    write_credential_file(&dir, "token = \"file-token-only\"\n");

    let creds = resolve_credentials(&config(&[
        ("token", "static-token"),
        ("account_id", "static-acct"),
    ]))
    .unwrap();

    assert_eq!(creds.token, "static-token");
    scrub_env();
}

#[test]
#[serial]
fn environment_with_only_a_token_is_not_a_credential() {
    scrub_env();
    unsafe {
        env::set_var(ENV_TOKEN, "env-token-only");
    }

    let creds = resolve_credentials(&config(&[
        ("token", "static-token"),
        ("account_id", "static-acct"),
    ]))
    .unwrap();

    assert_eq!(creds.token, "static-token");
    scrub_env();
}

#[test]
#[serial]
fn partial_static_credentials_name_the_missing_field() {
    scrub_env();

    let err = resolve_credentials(&config(&[("token", "static-token")])).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::IncompleteStaticCredentials {
            field: "account_id"
        }
    ));

    let err = resolve_credentials(&config(&[("account_id", "static-acct")])).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::IncompleteStaticCredentials { field: "token" }
    ));
}

// ---------------------------------------------------------------------------
// Exhaustion and file errors
// ---------------------------------------------------------------------------

#[test]
#[serial]
fn exhausting_every_source_is_a_config_error() {
    scrub_env();

    let err = resolve_credentials(&config(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::NoCredentials));
    assert!(err.to_string().contains("unable to find Spot credentials"));
}

#[test]
#[serial]
fn a_malformed_credential_file_is_a_hard_error() {
    scrub_env();
    let dir = TempDir::new().unwrap();
    write_credential_file(&dir, "[[[broken");

    let err = resolve_credentials(&config(&[
        ("token", "static-token"),
        ("account_id", "static-acct"),
    ]))
    .unwrap_err();

    assert!(matches!(err, ConfigError::CredentialFileParse { .. }));
    scrub_env();
}

#[test]
#[serial]
fn a_missing_credential_file_just_falls_through() {
    scrub_env();
    unsafe {
        env::set_var(ENV_CREDENTIALS_FILE, "/definitely/not/here");
        env::set_var(ENV_TOKEN, "env-token");
        env::set_var(ENV_ACCOUNT, "env-acct");
    }

    let creds = resolve_credentials(&config(&[])).unwrap();
    assert_eq!(creds.token, "env-token");
    scrub_env();
}
