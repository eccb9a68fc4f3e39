use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::{
    ComponentProvider, DirectoryProvider, LabelProvider, ModuleProvider, ProviderChain,
    ResourceProvider,
};
use crate::config::CONFIG_FILE;
use crate::locator::{Diagnostic, DiagnosticKind, ProjectIndex};

pub const COMPONENT_PROVIDER: &str = "lwc-preview/component";
pub const LABEL_PROVIDER: &str = "lwc-preview/label";
pub const RESOURCE_PROVIDER: &str = "lwc-preview/resource";
pub const FS_PROVIDER: &str = "lwc-preview/fs";

/// Everything a provider factory may need.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub root_dir: PathBuf,
    /// Module search directories, highest priority first.
    pub module_dirs: Vec<PathBuf>,
    pub index: Arc<ProjectIndex>,
}

type Factory = Box<dyn Fn(&ProviderContext) -> Arc<dyn ModuleProvider> + Send + Sync>;

/// Registry mapping provider names to factories
pub struct ProviderRegistry {
    factories: HashMap<String, Factory>,
}

impl ProviderRegistry {
    /// Create a registry with the built-in providers
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };

        registry.register(COMPONENT_PROVIDER, |ctx| {
            Arc::new(ComponentProvider::new(ctx.index.clone()))
        });
        registry.register(LABEL_PROVIDER, |ctx| {
            Arc::new(LabelProvider::new(ctx.index.clone()))
        });
        registry.register(RESOURCE_PROVIDER, |ctx| {
            let modules_dir = ctx
                .module_dirs
                .first()
                .cloned()
                .unwrap_or_else(|| ctx.root_dir.clone());
            Arc::new(ResourceProvider::new(ctx.root_dir.clone(), modules_dir))
        });
        registry.register(FS_PROVIDER, |ctx| {
            Arc::new(DirectoryProvider::new(&ctx.root_dir, ctx.module_dirs.clone()))
        });

        registry
    }

    /// Register a provider factory
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&ProviderContext) -> Arc<dyn ModuleProvider> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Check if a provider name is registered
    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a chain from `names` in order.
    ///
    /// Repeated names are instantiated once, at their first position. The
    /// filesystem provider is appended when not named, so ordinary modules
    /// always have a last resort. Names with no registered factory stay in
    /// the effective config but are left out of the chain, each with a
    /// diagnostic.
    pub fn build<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        ctx: &ProviderContext,
    ) -> (ProviderChain, Vec<Diagnostic>) {
        let mut seen: Vec<&str> = Vec::new();
        for name in names {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        if !seen.contains(&FS_PROVIDER) {
            seen.push(FS_PROVIDER);
        }

        let mut providers = Vec::with_capacity(seen.len());
        let mut diagnostics = Vec::new();
        for name in seen {
            match self.factories.get(name) {
                Some(factory) => providers.push(factory(ctx)),
                None => {
                    tracing::warn!("Module provider '{}' is not available and is skipped", name);
                    diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::UnknownProvider,
                        path: PathBuf::from(CONFIG_FILE),
                        message: format!("module provider '{name}' is not available"),
                    });
                },
            }
        }
        (ProviderChain::new(providers), diagnostics)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
