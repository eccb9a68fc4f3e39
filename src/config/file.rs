//! Optional server configuration file in the project root.
//!
//! # Example
//!
//! ```json
//! {
//!   "port": 3456,
//!   "rootDir": "/custom",
//!   "lwc": { "modules": [{ "dir": "$rootDir/src/modules" }] },
//!   "moduleProviders": ["lwc-preview/fs"],
//!   "routes": [{ "id": "about", "path": "/about", "rootComponent": "example/about" }]
//! }
//! ```
//!
//! Keys the server does not interpret are kept and written back out
//! unchanged in the effective configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{PreviewError, Result};

/// Conventional file name of the server configuration.
pub const CONFIG_FILE: &str = "lwr.config.json";

/// Server mode of the preview runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// Sources are read from disk on every request and never cached.
    #[default]
    Dev,
    Prod,
}

impl std::fmt::Display for ServerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dev => write!(f, "dev"),
            Self::Prod => write!(f, "prod"),
        }
    }
}

/// The `lwc` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LwcSection {
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `lwc.modules` record. Only `dir` records add search directories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleRecord {
    pub fn dir(dir: impl Into<String>) -> Self {
        Self {
            dir: Some(dir.into()),
            extra: Map::new(),
        }
    }
}

/// A `moduleProviders` entry: a name, or `[name, options]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderSpec {
    Name(String),
    WithOptions(String, Value),
}

impl ProviderSpec {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::WithOptions(name, _) => name,
        }
    }
}

/// A route serving a root component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub id: String,
    pub path: String,
    pub root_component: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Contents of the configuration file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_mode: Option<ServerMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lwc: Option<LwcSection>,
    #[serde(default)]
    pub module_providers: Vec<ProviderSpec>,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserConfig {
    /// Parse configuration JSON. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| PreviewError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PreviewError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        tracing::debug!("Loaded server configuration from {}", path.display());
        Ok(config)
    }

    /// Load `<project_dir>/lwr.config.json` when present.
    pub fn discover(project_dir: &Path) -> Result<Option<Self>> {
        let path = project_dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Declared `lwc.modules` records.
    pub fn modules(&self) -> &[ModuleRecord] {
        self.lwc.as_ref().map(|lwc| lwc.modules.as_slice()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_full_config() {
        let content = json!({
            "port": 3456,
            "rootDir": "/custom",
            "cacheDir": "/tmp/cache",
            "serverMode": "prod",
            "lwc": { "modules": [{ "dir": "$rootDir/modules" }, { "npm": "lightning-base" }] },
            "moduleProviders": ["lwc-preview/fs", ["lwc-preview/label", { "strict": true }]],
            "routes": [{ "id": "about", "path": "/about", "rootComponent": "example/about", "layoutTemplate": "x.html" }],
            "bundleConfig": { "exclude": ["lwc"] }
        })
        .to_string();

        let config = UserConfig::parse(&content, Path::new(CONFIG_FILE)).unwrap();

        assert_eq!(config.port, Some(3456));
        assert_eq!(config.root_dir, Some(PathBuf::from("/custom")));
        assert_eq!(config.server_mode, Some(ServerMode::Prod));
        assert_eq!(config.modules().len(), 2);
        assert_eq!(config.modules()[0].dir.as_deref(), Some("$rootDir/modules"));
        assert_eq!(config.modules()[1].extra["npm"], json!("lightning-base"));
        assert_eq!(config.module_providers[1].name(), "lwc-preview/label");
        assert_eq!(config.routes[0].root_component, "example/about");
        assert_eq!(config.routes[0].extra["layoutTemplate"], json!("x.html"));
        assert_eq!(config.extra["bundleConfig"], json!({ "exclude": ["lwc"] }));
    }

    #[test]
    fn test_parse_empty_object() {
        let config = UserConfig::parse("{}", Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(config, UserConfig::default());
        assert!(config.modules().is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let err = UserConfig::parse(r#"{"port":"abc"}"#, Path::new(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, PreviewError::ConfigParse { .. }));

        let err = UserConfig::parse(r#"{"routes":[{"path":"/"}]}"#, Path::new(CONFIG_FILE))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_discover_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(UserConfig::discover(dir.path()).unwrap(), None);

        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"port":4000}"#).unwrap();
        assert_eq!(UserConfig::discover(dir.path()).unwrap().unwrap().port, Some(4000));
    }
}
