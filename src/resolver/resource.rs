//! `@salesforce/resourceUrl/` and `@salesforce/contentAssetUrl/` modules.
//!
//! The module default-exports the resource path relative to the server root
//! directory. The real extension is discovered by globbing next to the
//! metadata sidecar. A missing resource still resolves, with no extension.
//!
//! Resource folders are looked up under the highest priority module
//! directory, which is where the metadata lives in a DX project. A `rootDir`
//! outside that tree only changes the exported path, which then starts with
//! `../`.

use std::path::{Path, PathBuf};

use super::{to_slash, ModuleEntry, ModuleProvider, ModuleSource};

/// Kind of file asset addressed by a specifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    StaticResource,
    ContentAsset,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [Self::StaticResource, Self::ContentAsset];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::StaticResource => "@salesforce/resourceUrl/",
            Self::ContentAsset => "@salesforce/contentAssetUrl/",
        }
    }

    /// Metadata folder under the modules root.
    pub fn folder(self) -> &'static str {
        match self {
            Self::StaticResource => "staticresources",
            Self::ContentAsset => "contentassets",
        }
    }

    /// Marker of the metadata sidecar files to skip.
    fn meta_marker(self) -> &'static str {
        match self {
            Self::StaticResource => ".resource-meta.",
            Self::ContentAsset => ".asset-meta.",
        }
    }

    fn from_specifier(specifier: &str) -> Option<(Self, &str)> {
        Self::ALL.into_iter().find_map(|kind| {
            specifier
                .strip_prefix(kind.prefix())
                .filter(|name| !name.is_empty() && !name.contains('/'))
                .map(|name| (kind, name))
        })
    }
}

/// Resolves static resources and content assets to relative paths.
#[derive(Debug, Clone)]
pub struct ResourceProvider {
    root_dir: PathBuf,
    modules_dir: PathBuf,
}

impl ResourceProvider {
    /// `modules_dir` is the directory holding the `staticresources` and
    /// `contentassets` folders; paths are exported relative to `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>, modules_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            modules_dir: modules_dir.into(),
        }
    }

    /// Relative path exported for `specifier`.
    pub fn resource_path(&self, specifier: &str) -> Option<String> {
        let (kind, name) = ResourceKind::from_specifier(specifier)?;
        let name = name.strip_suffix(".js").unwrap_or(name);
        let folder = self.modules_dir.join(kind.folder());

        let path = find_resource(&folder, name, kind).unwrap_or_else(|| folder.join(name));
        let relative = pathdiff::diff_paths(&path, &self.root_dir).unwrap_or(path);
        Some(to_slash(&relative))
    }
}

fn find_resource(folder: &Path, name: &str, kind: ResourceKind) -> Option<PathBuf> {
    let exact = folder.join(name);
    if exact.is_dir() {
        return Some(exact);
    }

    let pattern = format!(
        "{}/{}.*",
        glob::Pattern::escape(&folder.to_string_lossy()),
        glob::Pattern::escape(name)
    );
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.contains(kind.meta_marker()))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

impl ModuleProvider for ResourceProvider {
    fn name(&self) -> &'static str {
        super::RESOURCE_PROVIDER
    }

    fn resolve_entry(&self, specifier: &str) -> Option<ModuleEntry> {
        ResourceKind::from_specifier(specifier).map(|_| ModuleEntry::virtual_module(specifier))
    }

    fn materialize(&self, specifier: &str) -> Option<ModuleSource> {
        let path = self.resource_path(specifier)?;
        Some(ModuleSource::default_export(specifier, &path))
    }
}
