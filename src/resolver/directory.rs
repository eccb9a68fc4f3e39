//! Base provider for ordinary modules.
//!
//! Resolves `namespace/name` against the configured module directories
//! (`<dir>/<namespace>/<name>/<name>.js`) and bare package specifiers
//! (`lwc`, `@scope/pkg`, `pkg/sub/file.js`) against `node_modules` under the
//! root directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{read_source, ModuleEntry, ModuleProvider, ModuleSource};

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    module: Option<String>,
    main: Option<String>,
}

/// Filesystem-backed fallback provider.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    module_dirs: Vec<PathBuf>,
    node_modules: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root_dir: &Path, module_dirs: Vec<PathBuf>) -> Self {
        Self {
            module_dirs,
            node_modules: root_dir.join("node_modules"),
        }
    }

    fn entry_path(&self, specifier: &str) -> Option<PathBuf> {
        self.module_dir_entry(specifier)
            .or_else(|| self.package_entry(specifier))
    }

    fn module_dir_entry(&self, specifier: &str) -> Option<PathBuf> {
        let (namespace, name) = specifier.split_once('/')?;
        if namespace.starts_with('@') || name.contains('/') || name.is_empty() {
            return None;
        }

        self.module_dirs.iter().find_map(|dir| {
            let bundle = dir.join(namespace).join(name);
            ["js", "css"]
                .iter()
                .map(|ext| bundle.join(format!("{name}.{ext}")))
                .find(|path| path.is_file())
        })
    }

    fn package_entry(&self, specifier: &str) -> Option<PathBuf> {
        let mut parts = specifier.splitn(3, '/');
        let package = match parts.next()? {
            scope if scope.starts_with('@') => format!("{}/{}", scope, parts.next()?),
            name => name.to_string(),
        };
        let subpath: Vec<&str> = parts.collect();
        let package_dir = self.node_modules.join(&package);

        if !subpath.is_empty() {
            let file = package_dir.join(subpath.join("/"));
            return file.is_file().then_some(file);
        }

        let manifest: PackageJson = std::fs::read_to_string(package_dir.join("package.json"))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        let entry = manifest
            .module
            .or(manifest.main)
            .unwrap_or_else(|| "index.js".to_string());
        let file = package_dir.join(entry);
        file.is_file().then_some(file)
    }
}

impl ModuleProvider for DirectoryProvider {
    fn name(&self) -> &'static str {
        super::FS_PROVIDER
    }

    fn resolve_entry(&self, specifier: &str) -> Option<ModuleEntry> {
        self.entry_path(specifier)
            .map(|path| ModuleEntry::file(specifier, path))
    }

    fn materialize(&self, specifier: &str) -> Option<ModuleSource> {
        let path = self.entry_path(specifier)?;
        read_source(specifier, &path)
    }
}
