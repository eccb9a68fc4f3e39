//! `c/` component modules.
//!
//! Specifier forms:
//!
//! - `c/card` resolves to `card/card.js`, or `card/card.css` for style-only
//!   components
//! - `c/card.css` names a file of the bundle explicitly
//! - `c/card#shared.css` imports an arbitrary file from the bundle directory
//!
//! Names missing from the component map are left to the providers after
//! this one.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::{read_source, ModuleEntry, ModuleProvider, ModuleSource};
use crate::locator::ProjectIndex;

/// Namespace prefix of project components.
pub const COMPONENT_NAMESPACE: &str = "c/";

const FRAGMENT_SEPARATOR: char = '#';

/// Resolves `c/` specifiers against the component map.
#[derive(Debug, Clone)]
pub struct ComponentProvider {
    index: Arc<ProjectIndex>,
}

impl ComponentProvider {
    pub fn new(index: Arc<ProjectIndex>) -> Self {
        Self { index }
    }

    fn entry_path(&self, specifier: &str) -> Option<PathBuf> {
        let rest = specifier.strip_prefix(COMPONENT_NAMESPACE)?;
        let (name, fragment) = match rest.split_once(FRAGMENT_SEPARATOR) {
            Some((name, fragment)) => (name, Some(fragment).filter(|f| !f.is_empty())),
            None => (rest, None),
        };

        let (base, extension) = match name.rsplit_once('.') {
            Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
            _ => (name, None),
        };
        let dir = self.index.component(base)?;

        match (fragment, extension) {
            (Some(fragment), _) => bundle_file(dir, fragment),
            (None, Some(_)) => Some(dir.join(name)),
            (None, None) => probe_script_or_style(dir, base),
        }
    }
}

/// `fragment` inside `dir`. Only plain relative segments are accepted.
fn bundle_file(dir: &Path, fragment: &str) -> Option<PathBuf> {
    let relative = Path::new(fragment);
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        tracing::debug!("Rejected bundle fragment '{}'", fragment);
        return None;
    }
    Some(dir.join(relative))
}

/// `<name>.js` if it exists, else `<name>.css`.
fn probe_script_or_style(dir: &Path, name: &str) -> Option<PathBuf> {
    ["js", "css"]
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
}

impl ModuleProvider for ComponentProvider {
    fn name(&self) -> &'static str {
        super::COMPONENT_PROVIDER
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
