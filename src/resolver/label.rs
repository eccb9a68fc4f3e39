//! `@salesforce/label/` virtual modules.

use std::sync::Arc;

use super::{ModuleEntry, ModuleProvider, ModuleSource};
use crate::locator::ProjectIndex;

/// Specifier prefix of custom labels.
pub const LABEL_PREFIX: &str = "@salesforce/label/";

/// Resolves custom labels to a module that default-exports the label value.
#[derive(Debug, Clone)]
pub struct LabelProvider {
    index: Arc<ProjectIndex>,
}

impl LabelProvider {
    pub fn new(index: Arc<ProjectIndex>) -> Self {
        Self { index }
    }

    fn value(&self, specifier: &str) -> Option<&str> {
        let name = label_name(specifier)?;
        self.index.label(name).map(|label| label.value.as_str())
    }
}

/// Label name from `@salesforce/label/<ns>.<name>[.js]`.
///
/// The name is the third path segment with the `.js` qualifier and the
/// namespace removed.
fn label_name(specifier: &str) -> Option<&str> {
    if !specifier.starts_with(LABEL_PREFIX) {
        return None;
    }
    let segment = specifier.split('/').nth(2)?;
    let segment = segment.strip_suffix(".js").unwrap_or(segment);
    let name = match segment.split_once('.') {
        Some((_namespace, name)) => name,
        None => segment,
    };
    (!name.is_empty()).then_some(name)
}

impl ModuleProvider for LabelProvider {
    fn name(&self) -> &'static str {
        super::LABEL_PROVIDER
    }

    fn resolve_entry(&self, specifier: &str) -> Option<ModuleEntry> {
        self.value(specifier)
            .map(|_| ModuleEntry::virtual_module(specifier))
    }

    fn materialize(&self, specifier: &str) -> Option<ModuleSource> {
        self.value(specifier)
            .map(|value| ModuleSource::default_export(specifier, value))
    }
}
