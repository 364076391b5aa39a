use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn app_prefixed_env_wins_over_plain_name() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("TODO_API_BASE_URL", "http://plain/"),
            ("APP__API_BASE_URL", "http://app/"),
            ("TODO_API_KEY", "k"),
            ("TODO_REQUEST_TIMEOUT_SECS", "5"),
        ]),
    )
    .expect("apply env");

    assert_eq!(settings.api_base_url, "http://app/");
    assert_eq!(settings.api_key.as_deref(), Some("k"));
    assert_eq!(settings.request_timeout(), Duration::from_secs(5));
}

#[test]
fn invalid_timeout_is_an_error() {
    let mut settings = Settings::default();
    let err = apply_env(
        &mut settings,
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]),
    )
    .expect_err("must fail");
    assert!(err.to_string().contains("invalid request timeout"));
}

fn temp_settings_file(tag: &str, contents: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("todo_sync_config_{tag}_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(DEFAULT_CONFIG_FILE);
    fs::write(&path, contents).expect("write settings");
    (temp_root, path)
}

#[test]
fn loads_file_settings_over_defaults() {
    let (temp_root, path) = temp_settings_file(
        "file",
        "api_base_url = \"http://file-host/api\"\napi_key = \"from-file\"\n",
    );

    let settings = load_settings(&path).expect("load");

    // Fields set through the environment of the test runner would win here.
    if env::var("APP__API_BASE_URL").is_err() && env::var("TODO_API_BASE_URL").is_err() {
        assert_eq!(settings.api_base_url, "http://file-host/api");
    }
    if env::var("APP__API_KEY").is_err() && env::var("TODO_API_KEY").is_err() {
        assert_eq!(settings.api_key.as_deref(), Some("from-file"));
    }

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn unparsable_settings_file_names_the_file() {
    let (temp_root, path) = temp_settings_file("broken", "request_timeout_secs = \"soon\"\n");

    let err = load_settings(&path).expect_err("must fail");

    assert!(
        err.to_string().contains("failed to parse settings file"),
        "unexpected: {err}"
    );
    assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn file_values_apply_field_by_field() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        toml::from_str("request_timeout_secs = 12\n").expect("parse"),
    );

    assert_eq!(settings.request_timeout(), Duration::from_secs(12));
    assert_eq!(settings.api_base_url, Settings::default().api_base_url);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let settings = load_settings(Path::new("definitely/not/here.toml")).expect("load");
    assert!(!settings.api_base_url.is_empty());
}
