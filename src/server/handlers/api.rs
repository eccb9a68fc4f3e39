//! Introspection endpoints

use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::config::{ServerConfig, ServerMode};
use crate::locator::Diagnostic;
use crate::server::state::AppState;

/// Effective configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ServerConfig> {
    Json(state.config.clone())
}

/// Status response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub port: u16,
    pub server_mode: ServerMode,
    pub root_component: String,
    pub components: usize,
    pub label_files: usize,
    pub providers: Vec<&'static str>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Server status and discovery diagnostics
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        port: state.config.port,
        server_mode: state.config.server_mode,
        root_component: state.config.component.root_component_id.clone(),
        components: state.index.components().len(),
        label_files: state.index.label_files().len(),
        providers: state.chain.names(),
        diagnostics: state.diagnostics(),
    })
}
