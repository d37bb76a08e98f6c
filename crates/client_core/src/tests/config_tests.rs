use super::*;

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(tag: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("trivia_client_config_{tag}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("client.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings =
        load_settings_with(Path::new("/nonexistent/client.toml"), env_from(&[])).expect("load");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.base_url(), "http://127.0.0.1:5000");
}

#[test]
fn env_overrides_file_values() {
    let path = temp_config("env", "api_server_url = \"http://file.example:5000/api/\"\n");
    let settings = load_settings_with(
        &path,
        env_from(&[("APP__API_SERVER_URL", "http://env.example:8080/api")]),
    )
    .expect("load");
    assert_eq!(settings.api_server_url, "http://env.example:8080/api");

    let from_file = load_settings_with(&path, env_from(&[])).expect("load");
    assert_eq!(from_file.base_url(), "http://file.example:5000/api");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn auth_requires_domain_audience_and_client_id() {
    let partial = load_settings_with(
        Path::new("/nonexistent/client.toml"),
        env_from(&[("AUTH_DOMAIN", "team.eu"), ("AUTH_AUDIENCE", "coffee")]),
    )
    .expect("load");
    assert!(partial.auth.is_none());

    let path = temp_config(
        "auth",
        "auth_domain = \"team.eu\"\nauth_audience = \"coffee\"\nauth_client_id = \"abc123\"\n",
    );
    let full = load_settings_with(
        &path,
        env_from(&[("AUTH_CALLBACK_URL", "http://localhost:8100")]),
    )
    .expect("load");
    let auth = full.auth.expect("auth settings");
    assert_eq!(auth.client_id, "abc123");
    assert_eq!(auth.callback_url.as_deref(), Some("http://localhost:8100"));
    assert_eq!(auth.tenant_url(), "https://team.eu.auth0.com");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn tenant_url_keeps_full_hosts() {
    let mut auth = AuthSettings {
        domain: "team.eu.auth0.com".into(),
        audience: "coffee".into(),
        client_id: "abc".into(),
        callback_url: None,
    };
    assert_eq!(auth.tenant_url(), "https://team.eu.auth0.com");
    auth.domain = "https://login.example.org/".into();
    assert_eq!(auth.tenant_url(), "https://login.example.org");
}

#[test]
fn rejects_non_http_base_url() {
    let err = load_settings_with(
        Path::new("/nonexistent/client.toml"),
        env_from(&[("API_SERVER_URL", "ftp://example.org")]),
    )
    .expect_err("should fail");
    assert!(err.to_string().contains("must use http or https"));

    let err = load_settings_with(
        Path::new("/nonexistent/client.toml"),
        env_from(&[("API_SERVER_URL", "not a url")]),
    )
    .expect_err("should fail");
    assert!(err.to_string().contains("invalid api server url"));
}

#[test]
fn malformed_file_is_an_error() {
    let path = temp_config("malformed", "api_server_url = [1, 2]\n");
    let err = load_settings_with(&path, env_from(&[])).expect_err("should fail");
    assert!(err.to_string().contains("failed to parse config file"));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn server_url_override_is_validated() {
    let mut settings = Settings::default();

    assert!(settings.override_server_url("ftp://x").is_err());
    assert!(settings.override_server_url("garbage").is_err());
    assert_eq!(settings.base_url(), "http://127.0.0.1:5000");

    settings
        .override_server_url("https://trivia.example/")
        .expect("https override");
    assert_eq!(settings.base_url(), "https://trivia.example");
}
