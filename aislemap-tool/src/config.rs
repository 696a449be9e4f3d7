use std::path::{Path, PathBuf};

use aislemap_client::{DEFAULT_PAGE_SIZE, Endpoints, Session};
use serde::Deserialize;
use tracing::warn;

use crate::error::ToolError;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub session_id: Option<String>,
    pub csrf_token: Option<String>,
    pub page_size: Option<u32>,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Endpoint path overrides for servers mounted elsewhere.
#[derive(Debug, Deserialize, Default)]
pub struct EndpointsConfig {
    pub locations: Option<String>,
    pub groups: Option<String>,
    pub aisles: Option<String>,
    pub map_save: Option<String>,
}

impl EndpointsConfig {
    fn apply(self, defaults: Endpoints) -> Endpoints {
        Endpoints {
            locations: self.locations.unwrap_or(defaults.locations),
            groups: self.groups.unwrap_or(defaults.groups),
            aisles: self.aisles.unwrap_or(defaults.aisles),
            map_save: self.map_save.unwrap_or(defaults.map_save),
        }
    }
}

/// Everything needed to talk to the server.
#[derive(Debug)]
pub struct Settings {
    pub base_url: String,
    pub session: Session,
    pub endpoints: Endpoints,
    pub page_size: u32,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("aislemap").join("config.toml"))
}

/// Reads a config file. A missing file yields the default config.
pub fn load_config_from(path: &Path) -> Result<Config, ToolError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    load_config_from(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), "ignoring config file: {e}");
        Config::default()
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Merges CLI flags, environment and config file, in that order of priority.
pub fn resolve_settings_with(
    cli_base_url: Option<String>,
    config: Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ToolError> {
    let base_url = non_empty(cli_base_url)
        .or_else(|| non_empty(env("AISLEMAP_BASE_URL")))
        .or_else(|| non_empty(config.base_url))
        .ok_or(ToolError::BaseUrlNotFound)?;

    let session = Session {
        session_id: non_empty(env("AISLEMAP_SESSION_ID")).or_else(|| non_empty(config.session_id)),
        csrf_token: non_empty(env("AISLEMAP_CSRF_TOKEN")).or_else(|| non_empty(config.csrf_token)),
    };

    Ok(Settings {
        base_url,
        session,
        endpoints: config.endpoints.apply(Endpoints::default()),
        page_size: config.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    })
}

pub fn resolve_settings(cli_base_url: Option<String>) -> Result<Settings, ToolError> {
    resolve_settings_with(cli_base_url, load_config(), |key| std::env::var(key).ok())
}
