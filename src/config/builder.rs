//! Effective server configuration.
//!
//! [`ConfigBuilder`] merges a component reference and project directory with
//! the optional configuration file. Values present in the file are kept
//! verbatim; absent values get computed defaults. For the three list fields
//! (`lwc.modules`, `moduleProviders`, `routes`) the computed entries are
//! prepended to whatever the file declares, so they resolve first.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::file::{LwcSection, ModuleRecord, ProviderSpec, RouteConfig, ServerMode, UserConfig};
use crate::error::Result;
use crate::port::{find_free_port, BindProbe, PortProbe, DEFAULT_START_PORT};
use crate::project::ComponentRef;
use crate::resolver::{COMPONENT_PROVIDER, LABEL_PROVIDER, RESOURCE_PROVIDER};

/// Token replaced by the root directory in module record paths.
const ROOT_DIR_TOKEN: &str = "$rootDir";

/// Configuration the preview server runs with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub root_dir: PathBuf,
    pub server_mode: ServerMode,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    pub lwc: LwcSection,
    pub module_providers: Vec<ProviderSpec>,
    pub routes: Vec<RouteConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub component: ComponentRef,
}

impl ServerConfig {
    /// Module search directories with `$rootDir` expanded and relative
    /// paths anchored at the root directory.
    pub fn module_dirs(&self) -> Vec<PathBuf> {
        self.lwc
            .modules
            .iter()
            .filter_map(|record| record.dir.as_deref())
            .map(|dir| self.expand_dir(dir))
            .collect()
    }

    fn expand_dir(&self, dir: &str) -> PathBuf {
        let path = match dir.strip_prefix(ROOT_DIR_TOKEN) {
            Some(rest) => self.root_dir.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(dir),
        };
        if path.is_absolute() {
            path
        } else {
            self.root_dir.join(path)
        }
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.module_providers.iter().map(ProviderSpec::name)
    }
}

/// Builds a [`ServerConfig`].
pub struct ConfigBuilder {
    component: String,
    project_dir: PathBuf,
    config_file: Option<PathBuf>,
    probe: Box<dyn PortProbe>,
}

impl ConfigBuilder {
    pub fn new(component: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            component: component.into(),
            project_dir: project_dir.into(),
            config_file: None,
            probe: Box::new(BindProbe),
        }
    }

    /// Read this file instead of `<project>/lwr.config.json`.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Probe used when the port must be computed.
    pub fn port_probe(mut self, probe: impl PortProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn build(self) -> Result<ServerConfig> {
        let component = ComponentRef::resolve(&self.component, &self.project_dir)?;
        let user = match &self.config_file {
            Some(path) => UserConfig::load(path)?,
            None => UserConfig::discover(&component.project_dir)?.unwrap_or_default(),
        };
        merge(component, user, self.probe.as_ref())
    }
}

/// Build the effective configuration for `component` in `project_dir`.
pub fn build_config(
    component: &str,
    project_dir: &Path,
    override_file: Option<&Path>,
) -> Result<ServerConfig> {
    let builder = ConfigBuilder::new(component, project_dir);
    match override_file {
        Some(path) => builder.config_file(path).build(),
        None => builder.build(),
    }
}

fn merge(component: ComponentRef, user: UserConfig, probe: &dyn PortProbe) -> Result<ServerConfig> {
    let port = match user.port {
        Some(port) => port,
        None => find_free_port(probe, DEFAULT_START_PORT)?,
    };
    let root_dir = user
        .root_dir
        .unwrap_or_else(|| component.project_dir.clone());

    let mut lwc = user.lwc.unwrap_or_default();
    lwc.modules.insert(
        0,
        ModuleRecord::dir(component.modules_root_dir.to_string_lossy()),
    );

    let mut module_providers: Vec<ProviderSpec> =
        [COMPONENT_PROVIDER, LABEL_PROVIDER, RESOURCE_PROVIDER]
            .into_iter()
            .map(|name| ProviderSpec::Name(name.to_string()))
            .collect();
    module_providers.extend(user.module_providers);

    let mut routes = vec![default_route(&component)];
    routes.extend(user.routes);

    Ok(ServerConfig {
        root_dir,
        server_mode: user.server_mode.unwrap_or_default(),
        port,
        cache_dir: user.cache_dir,
        lwc,
        module_providers,
        routes,
        extra: user.extra,
        component,
    })
}

/// `/` route for the previewed component. The id embeds the current time.
fn default_route(component: &ComponentRef) -> RouteConfig {
    RouteConfig {
        id: format!(
            "{}-{}",
            component.dashed_id(),
            chrono::Utc::now().timestamp_millis()
        ),
        path: "/".to_string(),
        root_component: component.root_component_id.clone(),
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::CONFIG_FILE;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct AllFree;

    impl PortProbe for AllFree {
        fn is_in_use(&self, _port: u16) -> bool {
            false
        }
    }

    const COMPONENT: &str = "force-app/main/default/lwc/helloWorld";

    #[test]
    fn test_defaults_without_config_file() {
        let config = ConfigBuilder::new(COMPONENT, "/proj")
            .port_probe(AllFree)
            .build()
            .unwrap();

        assert_eq!(config.root_dir, PathBuf::from("/proj"));
        assert_eq!(config.server_mode, ServerMode::Dev);
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_dir, None);
        assert_eq!(
            config.module_dirs(),
            vec![PathBuf::from("/proj/force-app/main/default")]
        );
        assert_eq!(
            config.provider_names().collect::<Vec<_>>(),
            vec![COMPONENT_PROVIDER, LABEL_PROVIDER, RESOURCE_PROVIDER]
        );
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].path, "/");
        assert_eq!(config.routes[0].root_component, "lwc/helloWorld");
        assert!(config.routes[0].id.starts_with("lwc-helloWorld-"));
    }

    #[test]
    fn test_build_twice_differs_only_in_route_id() {
        let build = || {
            let mut config = ConfigBuilder::new(COMPONENT, "/proj")
                .port_probe(AllFree)
                .build()
                .unwrap();
            config.routes[0].id.clear();
            config
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_user_values_are_kept_and_lists_prepended() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &file,
            json!({
                "port": 3456,
                "rootDir": "/custom",
                "lwc": { "modules": [{ "dir": "$rootDir/modules" }] },
                "moduleProviders": ["lwc-preview/fs"],
                "routes": [{ "id": "about", "path": "/about", "rootComponent": "example/about" }],
                "bundleConfig": { "minify": false }
            })
            .to_string(),
        )
        .unwrap();

        let config = ConfigBuilder::new(COMPONENT, dir.path())
            .config_file(&file)
            .build()
            .unwrap();

        assert_eq!(config.port, 3456);
        assert_eq!(config.root_dir, PathBuf::from("/custom"));
        assert_eq!(config.lwc.modules.len(), 2);
        let computed_dir = dir
            .path()
            .join("force-app/main/default")
            .to_string_lossy()
            .into_owned();
        assert_eq!(config.lwc.modules[0].dir, Some(computed_dir));
        assert_eq!(config.lwc.modules[1].dir.as_deref(), Some("$rootDir/modules"));
        assert_eq!(config.module_dirs()[1], PathBuf::from("/custom/modules"));
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].path, "/");
        assert_eq!(config.routes[1].id, "about");
        assert_eq!(config.module_providers.len(), 4);
        assert_eq!(config.module_providers[3].name(), "lwc-preview/fs");
        assert_eq!(config.extra["bundleConfig"], json!({ "minify": false }));
    }

    #[test]
    fn test_project_config_file_is_discovered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"port":4100}"#).unwrap();

        let config = build_config(COMPONENT, dir.path(), None).unwrap();
        assert_eq!(config.port, 4100);
        assert_eq!(config.root_dir, dir.path());
    }

    #[test]
    fn test_missing_override_file_is_an_error() {
        let err = build_config(COMPONENT, Path::new("/proj"), Some(Path::new("/nope.json")))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_effective_config_serializes_camel_case() {
        let config = ConfigBuilder::new(COMPONENT, "/proj")
            .port_probe(AllFree)
            .build()
            .unwrap();
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["rootDir"], json!("/proj"));
        assert_eq!(value["serverMode"], json!("dev"));
        assert_eq!(value["routes"][0]["rootComponent"], json!("lwc/helloWorld"));
        assert!(value.get("component").is_none());
    }
}
