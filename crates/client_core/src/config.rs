use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_server_url: String,
    pub auth: Option<AuthSettings>,
}

/// External identity provider settings. Consumed as static values only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub domain: String,
    pub audience: String,
    pub client_id: String,
    pub callback_url: Option<String>,
}

impl AuthSettings {
    /// Expands a bare tenant prefix like `team.eu` to `https://team.eu.auth0.com`.
    pub fn tenant_url(&self) -> String {
        let domain = self.domain.trim().trim_end_matches('/');
        if domain.contains("://") {
            domain.to_string()
        } else if domain.ends_with(".auth0.com") {
            format!("https://{domain}")
        } else {
            format!("https://{domain}.auth0.com")
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_server_url: "http://127.0.0.1:5000".into(),
            auth: None,
        }
    }
}

impl Settings {
    pub fn base_url(&self) -> &str {
        self.api_server_url.trim_end_matches('/')
    }

    /// Replaces the base URL, applying the same checks as the file and env values.
    pub fn override_server_url(&mut self, raw: impl Into<String>) -> anyhow::Result<()> {
        let raw = raw.into();
        validate_base_url(&raw)?;
        self.api_server_url = raw;
        Ok(())
    }
}

#[derive(Default)]
struct AuthParts {
    domain: Option<String>,
    audience: Option<String>,
    client_id: Option<String>,
    callback_url: Option<String>,
}

impl AuthParts {
    fn apply(&mut self, key: &str, value: String) {
        match key {
            "auth_domain" => self.domain = Some(value),
            "auth_audience" => self.audience = Some(value),
            "auth_client_id" => self.client_id = Some(value),
            "auth_callback_url" => self.callback_url = Some(value),
            _ => {}
        }
    }

    fn finish(self) -> Option<AuthSettings> {
        Some(AuthSettings {
            domain: self.domain?,
            audience: self.audience?,
            client_id: self.client_id?,
            callback_url: self.callback_url,
        })
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_with(Path::new(DEFAULT_CONFIG_FILE), |key| std::env::var(key).ok())
}

/// File values first, then environment overrides, then validation.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    let mut auth = AuthParts::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        for (key, value) in file_cfg {
            if key == "api_server_url" {
                settings.api_server_url = value;
            } else {
                auth.apply(&key, value);
            }
        }
    }

    if let Some(v) = env("API_SERVER_URL") {
        settings.api_server_url = v;
    }
    if let Some(v) = env("APP__API_SERVER_URL") {
        settings.api_server_url = v;
    }

    for (var, key) in [
        ("AUTH_DOMAIN", "auth_domain"),
        ("AUTH_AUDIENCE", "auth_audience"),
        ("AUTH_CLIENT_ID", "auth_client_id"),
        ("AUTH_CALLBACK_URL", "auth_callback_url"),
    ] {
        if let Some(v) = env(var) {
            auth.apply(key, v);
        }
    }

    settings.auth = auth.finish();
    validate_base_url(&settings.api_server_url)?;
    Ok(settings)
}

fn validate_base_url(raw: &str) -> anyhow::Result<()> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid api server url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("api server url '{raw}' must use http or https");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
