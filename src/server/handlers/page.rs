//! Route page handler
//!
//! Each route gets an HTML shell whose import map points bare LWC
//! specifiers at the module endpoint, plus a bootstrap module that mounts
//! the route's root component.

use axum::{
    extract::{MatchedPath, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::RouteConfig;
use crate::server::state::{AppState, MODULE_PREFIX};

/// Specifier prefixes always mapped to the module endpoint.
const MAPPED_PREFIXES: &[&str] = &["c/", "lwc/", "@salesforce/"];

/// Serve the page for the matched route.
pub async fn serve(State(state): State<Arc<AppState>>, matched: MatchedPath) -> Response {
    match state.route(matched.as_str()) {
        Some(route) => Html(render(route)).into_response(),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Render the page for `route`.
pub fn render(route: &RouteConfig) -> String {
    let import_map = import_map(&route.root_component);
    let bootstrap = format!(
        "import {{ createElement }} from \"lwc\";\n\
         import Root from {component};\n\
         const element = createElement({tag}, {{ is: Root }});\n\
         document.getElementById(\"root\").appendChild(element);",
        component = script_safe(&json!(route.root_component).to_string()),
        tag = script_safe(&json!(custom_element_name(&route.root_component)).to_string()),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script type="importmap">{import_map}</script>
</head>
<body>
<div id="root"></div>
<script type="module">
{bootstrap}
</script>
</body>
</html>
"#,
        title = escape_html(&route.root_component),
    )
}

fn import_map(root_component: &str) -> String {
    let mut imports = BTreeMap::new();
    imports.insert("lwc".to_string(), format!("{MODULE_PREFIX}lwc"));
    for prefix in MAPPED_PREFIXES {
        imports.insert(prefix.to_string(), format!("{MODULE_PREFIX}{prefix}"));
    }
    if let Some((namespace, _)) = root_component.split_once('/') {
        imports.insert(format!("{namespace}/"), format!("{MODULE_PREFIX}{namespace}/"));
    }
    script_safe(&json!({ "imports": imports }).to_string())
}

/// Custom element tag for a `namespace/camelName` component.
pub fn custom_element_name(root_component: &str) -> String {
    let (namespace, name) = root_component
        .rsplit_once('/')
        .unwrap_or(("c", root_component));
    let namespace = namespace.rsplit('/').next().unwrap_or(namespace);

    let mut tag = String::with_capacity(root_component.len() + 4);
    tag.push_str(&namespace.to_lowercase());
    tag.push('-');
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            tag.push('-');
            tag.push(ch.to_ascii_lowercase());
        } else {
            tag.push(ch);
        }
    }
    tag
}

/// Keep inline script content from closing its element.
fn script_safe(content: &str) -> String {
    content.replace("</", "<\\/")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
