//! HTTP behaviour of the preview router, driven with `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{config, project, write, HELLO_WORLD_JS};
use http_body_util::BodyExt;
use lwc_preview::config::CONFIG_FILE;
use lwc_preview::server::{router, AppState, IdleTimer};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(project: &Path) -> Router {
    router(Arc::new(AppState::new(config(project)).unwrap()))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_root_route_serves_page() {
    let dir = project();
    let (status, headers, body) = get(&app(dir.path()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(body.contains(r#"<script type="importmap">"#));
    assert!(body.contains(r#"import Root from "lwc/helloWorld";"#));
    assert!(body.contains(r#"createElement("lwc-hello-world""#));
}

#[tokio::test]
async fn test_user_route_gets_its_own_page() {
    let dir = project();
    write(
        dir.path(),
        CONFIG_FILE,
        r#"{"routes":[{"id":"about","path":"/about","rootComponent":"example/about"}]}"#,
    );
    let (status, _, body) = get(&app(dir.path()), "/about").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"import Root from "example/about";"#));
}

#[tokio::test]
async fn test_component_module_headers() {
    let dir = project();
    let (status, headers, body) = get(&app(dir.path()), "/__preview/module/c/helloWorld").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, HELLO_WORLD_JS);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().contains("javascript"));
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    let etag = headers[header::ETAG].to_str().unwrap();
    assert_eq!(etag.len(), 66);
}

#[tokio::test]
async fn test_matching_etag_returns_not_modified() {
    let dir = project();
    let app = app(dir.path());
    let (_, headers, _) = get(&app, "/__preview/module/c/helloWorld").await;
    let etag = headers[header::ETAG].clone();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/__preview/module/c/helloWorld")
                .header(header::IF_NONE_MATCH, etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_encoded_fragment_selects_bundle_file() {
    let dir = project();
    let (status, headers, body) = get(
        &app(dir.path()),
        "/__preview/module/c/helloWorld%23helloWorld.html",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert_eq!(body, "<template><p>{greeting}</p></template>");
}

#[tokio::test]
async fn test_encoded_absolute_fragment_is_not_served() {
    let dir = project();
    let outside = tempfile::tempdir().unwrap();
    write(outside.path(), "secret.txt", "not a module");
    let secret = outside.path().join("secret.txt");

    let uri = format!("/__preview/module/c/helloWorld%23{}", secret.display());
    let (status, _, body) = get(&app(dir.path()), &uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.contains("not a module"));
}

#[tokio::test]
async fn test_label_and_resource_modules() {
    let dir = project();
    let app = app(dir.path());

    let (status, _, body) = get(&app, "/__preview/module/@salesforce/label/c.greeting").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "export default \"Hello there\";\n");

    let (status, _, body) = get(&app, "/__preview/module/@salesforce/resourceUrl/myImage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "export default \"force-app/main/default/staticresources/myImage.png\";\n"
    );
}

#[tokio::test]
async fn test_unresolved_module_is_not_found() {
    let dir = project();
    let (status, _, body) = get(&app(dir.path()), "/__preview/module/c/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "module not found: c/missing");
}

#[tokio::test]
async fn test_static_files_served_from_root_dir() {
    let dir = project();
    let (status, _, body) = get(
        &app(dir.path()),
        "/force-app/main/default/staticresources/myImage.png",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "png");
}

#[tokio::test]
async fn test_config_and_status_endpoints() {
    let dir = project();
    let app = app(dir.path());

    let (status, _, body) = get(&app, "/__preview/config").await;
    assert_eq!(status, StatusCode::OK);
    let config: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(config["rootDir"], dir.path().to_str().unwrap());
    assert_eq!(config["serverMode"], "dev");
    assert_eq!(config["moduleProviders"][0], "lwc-preview/component");

    let (status, _, body) = get(&app, "/__preview/status").await;
    assert_eq!(status, StatusCode::OK);
    let status: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(status["components"], 2);
    assert_eq!(status["labelFiles"], 1);
    assert_eq!(status["rootComponent"], "lwc/helloWorld");
    assert_eq!(status["providers"][3], "lwc-preview/fs");
    assert_eq!(status["diagnostics"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_reserved_route_path_is_rejected() {
    let dir = project();
    write(
        dir.path(),
        CONFIG_FILE,
        r#"{"routes":[{"id":"x","path":"/__preview/config","rootComponent":"c/x"}]}"#,
    );
    let err = AppState::new(config(dir.path())).unwrap_err();
    assert!(err.is_configuration_error());
}

#[tokio::test(start_paused = true)]
async fn test_requests_keep_idle_timer_alive() {
    let dir = project();
    let fired = Arc::new(AtomicBool::new(false));
    let timer = {
        let fired = fired.clone();
        IdleTimer::arm(Duration::from_secs(10), move || {
            fired.store(true, Ordering::SeqCst)
        })
    };
    let state = AppState::new(config(dir.path()))
        .unwrap()
        .with_idle_timer(timer);
    let app = router(Arc::new(state));

    for _ in 0..4 {
        tokio::time::sleep(Duration::from_secs(8)).await;
        let (status, _, _) = get(&app, "/__preview/status").await;
        assert_eq!(status, StatusCode::OK);
    }
    tokio::time::sleep(Duration::from_secs(9)).await;
    assert!(!fired.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(fired.load(Ordering::SeqCst));
}
