//! Shared request state and router assembly.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use super::handlers;
use super::idle::IdleTimer;
use crate::config::{RouteConfig, ServerConfig};
use crate::error::{PreviewError, Result};
use crate::locator::{Diagnostic, ProjectIndex};
use crate::resolver::{ProviderChain, ProviderContext, ProviderRegistry};

/// Mount point of the module endpoint.
pub const MODULE_PREFIX: &str = "/__preview/module/";

/// Paths reserved for the runtime itself.
const RESERVED_PREFIX: &str = "/__preview";

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub index: Arc<ProjectIndex>,
    pub chain: ProviderChain,
    /// Routes that get a page, in declaration order.
    pub routes: Vec<RouteConfig>,
    pub idle: Option<IdleTimer>,
    /// Providers named in the config that could not be built.
    provider_diagnostics: Vec<Diagnostic>,
}

impl AppState {
    /// Scan the project and build the provider chain for `config`.
    pub fn new(config: ServerConfig) -> Result<Self> {
        Self::with_registry(config, &ProviderRegistry::new())
    }

    pub fn with_registry(config: ServerConfig, registry: &ProviderRegistry) -> Result<Self> {
        let routes = servable_routes(&config.routes)?;

        let index = Arc::new(ProjectIndex::locate(&config.component.project_dir));
        tracing::debug!(
            "Indexed {} component(s) and {} label file(s) with {} diagnostic(s)",
            index.components().len(),
            index.label_files().len(),
            index.diagnostics().len()
        );

        let ctx = ProviderContext {
            root_dir: config.root_dir.clone(),
            module_dirs: config.module_dirs(),
            index: index.clone(),
        };
        let (chain, provider_diagnostics) = registry.build(config.provider_names(), &ctx);
        tracing::debug!("Module providers: {:?}", chain.names());

        Ok(Self {
            config,
            index,
            chain,
            routes,
            idle: None,
            provider_diagnostics,
        })
    }

    /// Touch `timer` on every request.
    pub fn with_idle_timer(mut self, timer: IdleTimer) -> Self {
        self.idle = Some(timer);
        self
    }

    /// Discovery diagnostics followed by skipped providers.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.index
            .diagnostics()
            .iter()
            .chain(&self.provider_diagnostics)
            .cloned()
            .collect()
    }

    pub fn route(&self, path: &str) -> Option<&RouteConfig> {
        self.routes.iter().find(|route| route.path == path)
    }
}

/// Routes that can be mounted: absolute, outside the reserved prefix, and
/// without router capture syntax. A repeated path keeps its first route.
fn servable_routes(routes: &[RouteConfig]) -> Result<Vec<RouteConfig>> {
    let mut servable: Vec<RouteConfig> = Vec::with_capacity(routes.len());
    for route in routes {
        let path = route.path.as_str();
        if !path.starts_with('/') || path.contains(['{', '}', '*', ':']) {
            return Err(PreviewError::ConfigValidation {
                message: format!("route '{}' has unsupported path '{}'", route.id, path),
            });
        }
        if path.starts_with(RESERVED_PREFIX) {
            return Err(PreviewError::ConfigValidation {
                message: format!("route '{}' uses reserved path '{}'", route.id, path),
            });
        }
        if servable.iter().any(|kept| kept.path == route.path) {
            tracing::warn!(
                "Route '{}' duplicates path '{}' and is ignored",
                route.id,
                route.path
            );
            continue;
        }
        servable.push(route.clone());
    }
    Ok(servable)
}

/// Build the preview router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/__preview/module/{*specifier}", get(handlers::module::serve))
        .route("/__preview/config", get(handlers::api::get_config))
        .route("/__preview/status", get(handlers::api::status));

    for route in &state.routes {
        app = app.route(&route.path, get(handlers::page::serve));
    }

    app.fallback_service(ServeDir::new(&state.config.root_dir))
        .layer(middleware::from_fn_with_state(state.clone(), touch_idle_timer))
        .layer(cors)
        .with_state(state)
}

async fn touch_idle_timer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(idle) = &state.idle {
        idle.touch();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn route(id: &str, path: &str) -> RouteConfig {
        RouteConfig {
            id: id.to_string(),
            path: path.to_string(),
            root_component: "lwc/helloWorld".to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_duplicate_route_paths_keep_first() {
        let routes =
            servable_routes(&[route("a", "/"), route("b", "/about"), route("c", "/")]).unwrap();
        let ids: Vec<_> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_rejects_unmountable_paths() {
        for path in ["about", "/items/{id}", "/files/*rest", "/:id", "/__preview/x"] {
            let err = servable_routes(&[route("r", path)]).unwrap_err();
            assert!(err.is_configuration_error(), "{path}");
        }
    }
}
