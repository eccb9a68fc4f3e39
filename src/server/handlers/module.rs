//! Module source handler

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::ServerMode;
use crate::server::state::AppState;

/// Resolve a module specifier through the provider chain.
pub async fn serve(
    State(state): State<Arc<AppState>>,
    Path(specifier): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(module) = state.chain.resolve(&specifier) else {
        tracing::debug!("Module not found: {}", specifier);
        return (
            StatusCode::NOT_FOUND,
            format!("module not found: {specifier}"),
        )
            .into_response();
    };

    let etag = format!("\"{}\"", module.source.hash);
    let cache_control = match state.config.server_mode {
        ServerMode::Dev => "no-cache",
        ServerMode::Prod => "public, max-age=300",
    };

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == etag);
    if not_modified {
        return (
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag), (header::CACHE_CONTROL, cache_control.to_string())],
        )
            .into_response();
    }

    let mime = mime_guess::from_path(&module.source.filename)
        .first_raw()
        .unwrap_or("text/javascript");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, cache_control.to_string()),
        ],
        module.source.content,
    )
        .into_response()
}
