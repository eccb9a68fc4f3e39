//! Module providers for Salesforce virtual namespaces.
//!
//! Every provider implements the two-phase [`ModuleProvider`] contract:
//! [`resolve_entry`](ModuleProvider::resolve_entry) decides whether the
//! provider owns a specifier, and [`materialize`](ModuleProvider::materialize)
//! produces its source. A provider that does not recognise a specifier returns
//! `None` from both, and the [`ProviderChain`] moves on to the next provider.
//!
//! Providers hold only read-only state, so one chain is shared by every
//! in-flight request.

mod component;
mod directory;
mod label;
mod registry;
mod resource;

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub use component::{ComponentProvider, COMPONENT_NAMESPACE};
pub use directory::DirectoryProvider;
pub use label::{LabelProvider, LABEL_PREFIX};
pub use registry::{
    ProviderContext, ProviderRegistry, COMPONENT_PROVIDER, FS_PROVIDER, LABEL_PROVIDER,
    RESOURCE_PROVIDER,
};
pub use resource::{ResourceKind, ResourceProvider};

/// Where a resolved module lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "location", rename_all = "snake_case")]
pub enum EntryLocation {
    /// A real file on disk.
    File(PathBuf),
    /// A module synthesised in memory, identified by its specifier.
    Virtual(String),
}

/// Result of the first resolution phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEntry {
    pub specifier: String,
    pub location: EntryLocation,
}

impl ModuleEntry {
    pub fn file(specifier: &str, path: PathBuf) -> Self {
        Self {
            specifier: specifier.to_string(),
            location: EntryLocation::File(path),
        }
    }

    pub fn virtual_module(specifier: &str) -> Self {
        Self {
            specifier: specifier.to_string(),
            location: EntryLocation::Virtual(specifier.to_string()),
        }
    }
}

/// Result of the second resolution phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    pub specifier: String,
    /// File name used to pick a content type (`*.js` for virtual modules).
    pub filename: String,
    pub content: String,
    /// Hex SHA-256 of `content`, used as the cache key.
    pub hash: String,
}

impl ModuleSource {
    pub fn new(specifier: &str, filename: impl Into<String>, content: String) -> Self {
        Self {
            specifier: specifier.to_string(),
            filename: filename.into(),
            hash: content_hash(&content),
            content,
        }
    }

    /// A virtual module whose default export is the string `value`.
    pub fn default_export(specifier: &str, value: &str) -> Self {
        let literal = serde_json::Value::String(value.to_string()).to_string();
        Self::new(
            specifier,
            format!("{}.js", specifier.rsplit('/').next().unwrap_or(specifier)),
            format!("export default {literal};\n"),
        )
    }
}

/// A resolver for one module namespace.
pub trait ModuleProvider: Send + Sync {
    /// Registered provider name.
    fn name(&self) -> &'static str;

    fn resolve_entry(&self, specifier: &str) -> Option<ModuleEntry>;

    fn materialize(&self, specifier: &str) -> Option<ModuleSource>;
}

/// A module resolved by a [`ProviderChain`].
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    pub provider: &'static str,
    pub entry: ModuleEntry,
    pub source: ModuleSource,
}

/// Providers queried in priority order.
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn ModuleProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn ModuleProvider>>) -> Self {
        Self { providers }
    }

    /// Provider names in query order.
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve `specifier` with the first provider that both recognises and
    /// materialises it.
    pub fn resolve(&self, specifier: &str) -> Option<ResolvedModule> {
        if !is_safe_specifier(specifier) {
            tracing::debug!("Rejected module specifier '{}'", specifier);
            return None;
        }

        self.providers.iter().find_map(|provider| {
            let entry = provider.resolve_entry(specifier)?;
            let source = provider.materialize(specifier)?;
            tracing::debug!("Resolved '{}' via {}", specifier, provider.name());
            Some(ResolvedModule {
                provider: provider.name(),
                entry,
                source,
            })
        })
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.names())
            .finish()
    }
}

/// Hex-encoded SHA-256 of `content`.
pub fn content_hash(content: &str) -> String {
    Sha256::digest(content.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Specifiers must be relative, including any `#` fragment, and free of
/// `..` segments.
fn is_safe_specifier(specifier: &str) -> bool {
    !specifier.is_empty()
        && !specifier.starts_with('/')
        && !specifier.contains("#/")
        && !specifier.contains('\\')
        && !specifier.contains(':')
        && !specifier
            .split(['/', '#'])
            .any(|segment| segment == "..")
}

/// Read a module file, logging instead of failing.
pub(crate) fn read_source(specifier: &str, path: &Path) -> Option<ModuleSource> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(ModuleSource::new(specifier, filename, content))
        },
        Err(err) => {
            tracing::debug!("Failed to read module file {}: {}", path.display(), err);
            None
        },
    }
}

/// Render a relative path with `/` separators.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
