//! Mobile app preview configuration
//!
//! Lists the native apps a component can be previewed in, per platform:
//!
//! ```json
//! {
//!   "apps": {
//!     "ios": [
//!       {
//!         "id": "com.example.previewer",
//!         "name": "Previewer",
//!         "get_app_bundle": "build/Previewer.app",
//!         "launch_arguments": [{ "name": "theme", "value": "dark" }],
//!         "preview_server_enabled": true
//!       }
//!     ],
//!     "android": []
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::launcher::Platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppPreviewConfig {
    #[serde(default)]
    pub apps: PlatformApps,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformApps {
    #[serde(default)]
    pub ios: Vec<AppEntry>,
    #[serde(default)]
    pub android: Vec<AppEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppEntry {
    pub id: String,
    pub name: String,
    /// App bundle (`.app` or `.apk`), relative to the configuration file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_app_bundle: Option<String>,
    #[serde(default)]
    pub launch_arguments: Vec<LaunchArgument>,
    /// Whether the app should be told where the preview server runs.
    #[serde(default)]
    pub preview_server_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchArgument {
    pub name: String,
    pub value: String,
}

impl AppPreviewConfig {
    /// Load configuration from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read app configuration {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse app configuration {}", path.display()))
    }

    /// Apps declared for `platform`
    pub fn apps(&self, platform: Platform) -> &[AppEntry] {
        match platform {
            Platform::Ios => &self.apps.ios,
            Platform::Android => &self.apps.android,
            Platform::Desktop => &[],
        }
    }

    /// Find the app with `id` for `platform`
    pub fn find(&self, platform: Platform, id: &str) -> Option<&AppEntry> {
        self.apps(platform).iter().find(|app| app.id == id)
    }
}

impl AppEntry {
    /// Bundle path resolved against the directory of the configuration file.
    pub fn bundle_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.get_app_bundle.as_ref().map(|bundle| {
            let path = Path::new(bundle);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                config_dir.join(path)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"{
        "apps": {
            "ios": [
                {
                    "id": "com.example.previewer",
                    "name": "Previewer",
                    "get_app_bundle": "build/Previewer.app",
                    "launch_arguments": [{ "name": "theme", "value": "dark" }],
                    "preview_server_enabled": true
                }
            ],
            "android": [{ "id": "com.example.android", "name": "Android Previewer" }]
        }
    }"#;

    fn config() -> AppPreviewConfig {
        serde_json::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_find_app_per_platform() {
        let config = config();

        let ios = config.find(Platform::Ios, "com.example.previewer").unwrap();
        assert_eq!(ios.name, "Previewer");
        assert!(ios.preview_server_enabled);
        assert_eq!(ios.launch_arguments[0].value, "dark");

        let android = config.find(Platform::Android, "com.example.android").unwrap();
        assert!(android.get_app_bundle.is_none());
        assert!(!android.preview_server_enabled);

        assert!(config.find(Platform::Android, "com.example.previewer").is_none());
        assert!(config.find(Platform::Desktop, "com.example.previewer").is_none());
    }

    #[test]
    fn test_bundle_path_is_relative_to_config() {
        let config = config();
        let app = config.find(Platform::Ios, "com.example.previewer").unwrap();
        assert_eq!(
            app.bundle_path(Path::new("/work/mobile")),
            Some(PathBuf::from("/work/mobile/build/Previewer.app"))
        );
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, "{ broken").unwrap();

        let err = AppPreviewConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("apps.json"));
    }
}
