//! Configuration resolution tests
//!
//! Uses serial_test to prevent ENV variable race conditions between tests
//! that set COURTSTATS_CONFIG / COURTSTATS_KB_URL.

use courtstats_common::config::{
    load_config, load_toml_config, resolve_config_path, CONFIG_ENV_VAR, KB_URL_ENV_VAR,
};
use courtstats_common::Error;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_cli_argument_wins_over_env() {
    let cli = write_config("[logging]\nlevel = \"debug\"\n");
    let env = write_config("[logging]\nlevel = \"warn\"\n");
    std::env::set_var(CONFIG_ENV_VAR, env.path());

    let resolved = resolve_config_path(Some(cli.path())).unwrap();
    assert_eq!(resolved.as_deref(), Some(cli.path()));

    let config = load_config(Some(cli.path())).unwrap();
    assert_eq!(config.logging.level, "debug");

    std::env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_variable_used_without_cli_argument() {
    let env = write_config("[knowledge_base]\nlabel_language = \"en\"\n");
    std::env::set_var(CONFIG_ENV_VAR, env.path());

    let config = load_config(None).unwrap();
    assert_eq!(config.knowledge_base.label_language, "en");

    std::env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    let result = load_config(Some(std::path::Path::new("/nonexistent/courtstats.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_kb_url_override() {
    let file = write_config("[knowledge_base]\napi_url = \"https://example.org/w/api.php\"\n");
    std::env::set_var(KB_URL_ENV_VAR, "http://127.0.0.1:9000/api.php");

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.knowledge_base.api_url, "http://127.0.0.1:9000/api.php");

    std::env::remove_var(KB_URL_ENV_VAR);
}

#[test]
#[serial]
fn test_invalid_values_rejected_on_load() {
    let file = write_config("[knowledge_base]\nmax_attempts = 0\n");
    assert!(matches!(load_config(Some(file.path())), Err(Error::Config(_))));
}

#[test]
fn test_malformed_toml_reports_config_error() {
    let file = write_config("[knowledge_base\nmax_attempts = ");
    assert!(matches!(load_toml_config(file.path()), Err(Error::Config(_))));
}
