//! Loader for bot configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, then `WARDEN_`-prefixed
//! environment variables win over all of them (`WARDEN_SEARCH__API_KEY` sets
//! `search.api_key`). String values may reference other environment variables
//! as `${VAR}`; references are expanded recursively up to a fixed depth.
//!
//! ```yaml
//! version: "1"
//! owners: [80088516616269824]
//! search:
//!   api_key: "${GOOGLE_API_KEY}"
//!   engine_id: "0123456789:abcdef"
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use warden_common::UserId;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_WEB_ENDPOINT: &str = "https://www.google.com/search";
pub const DEFAULT_API_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Default, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub version: Option<String>,
    /// Users treated as bot owners by every permission check.
    #[serde(default)]
    pub owners: Vec<UserId>,
    #[serde(default)]
    pub search: SearchSettings,
}

/// Endpoints and credentials for web search.
///
/// The credentials are only needed when the results page cannot be fetched
/// and the JSON API is queried instead.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Custom search engine identifier (`cx`).
    #[serde(default)]
    pub engine_id: Option<String>,
    #[serde(default = "default_web_endpoint")]
    pub web_endpoint: String,
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            web_endpoint: default_web_endpoint(),
            api_endpoint: default_api_endpoint(),
        }
    }
}

impl SearchSettings {
    /// `(api_key, engine_id)` when both are configured and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let cx = self.engine_id.as_deref().filter(|c| !c.trim().is_empty())?;
        Some((key, cx))
    }
}

fn default_web_endpoint() -> String {
    DEFAULT_WEB_ENDPOINT.into()
}
fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => {
            let mut cur = std::mem::take(s);
            for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                let expanded = match shellexpand::env(&cur) {
                    Ok(cow) => cow.into_owned(),
                    Err(_) => break,
                };
                if expanded == cur {
                    break;
                }
                cur = expanded;
            }
            *s = cur;
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct WardenConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for WardenConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl WardenConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, for deployments configured purely
    /// through the environment.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use warden_config::WardenConfigLoader;
    ///
    /// let cfg = WardenConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nowners: [7]")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("1"));
    /// assert_eq!(cfg.owners[0].get(), 7);
    /// assert_eq!(cfg.search.web_endpoint, warden_config::DEFAULT_WEB_ENDPOINT);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, apply `WARDEN_` overrides, expand `${VAR}` references
    /// and deserialize into [`WardenConfig`].
    pub fn load(self) -> Result<WardenConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("WARDEN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: WardenConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        tracing::debug!(
            owners = typed.owners.len(),
            has_search_credentials = typed.search.credentials().is_some(),
            "config.loaded"
        );
        Ok(typed)
    }
}
