//! Requests against compiled route maps.

use std::{fs, path::Path};

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{Method, StatusCode},
    Router,
};
use route_table::{
    app::{manifest, routes},
    compile, CompileOptions, DefaultStatus, Diagnostic, Handler, MethodMap, RouteMap, Verb, View,
};
use tower::ServiceExt;

async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn h1() -> &'static str {
    "h1"
}

async fn h2() -> &'static str {
    "h2"
}

#[tokio::test]
async fn file_route_serves_get_and_defaults_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    let options = CompileOptions {
        static_root: Some(dir.path().to_owned()),
        ..CompileOptions::default()
    };

    let router = compile(RouteMap::new().route("/", "index.html"), &options)
        .unwrap()
        .into_router();

    assert_eq!(
        send(&router, Method::GET, "/").await,
        (StatusCode::OK, "<h1>home</h1>".to_owned())
    );
    assert_eq!(
        send(&router, Method::POST, "/").await,
        (StatusCode::METHOD_NOT_ALLOWED, String::new())
    );
}

#[tokio::test]
async fn method_map_dispatches_per_verb() {
    let router = RouteMap::new()
        .route(
            "/hello",
            MethodMap::new()
                .with(Verb::Get, Handler::new(h1))
                .with(Verb::Post, Handler::new(h2)),
        )
        .into_router();

    assert_eq!(
        send(&router, Method::GET, "/hello").await,
        (StatusCode::OK, "h1".to_owned())
    );
    assert_eq!(
        send(&router, Method::POST, "/hello").await,
        (StatusCode::OK, "h2".to_owned())
    );
    assert_eq!(
        send(&router, Method::DELETE, "/hello").await,
        (StatusCode::METHOD_NOT_ALLOWED, String::new())
    );
    // HEAD is bound on its own, so it does not borrow the GET handler
    assert_eq!(
        send(&router, Method::HEAD, "/hello").await.0,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[tokio::test]
async fn every_verb_is_answered() {
    let all = Verb::ALL
        .into_iter()
        .fold(MethodMap::new(), |map, verb| map.with(verb, Handler::new(h1)));
    let router = RouteMap::new()
        .route("/all", all)
        .route("/none", MethodMap::new())
        .into_router();

    for verb in Verb::ALL {
        assert_eq!(send(&router, verb.method(), "/all").await.0, StatusCode::OK);
        assert_eq!(
            send(&router, verb.method(), "/none").await.0,
            StatusCode::METHOD_NOT_ALLOWED,
            "{verb} /none"
        );
    }
}

#[tokio::test]
async fn not_found_policy_answers_404() {
    let options = CompileOptions {
        default_status: DefaultStatus::NotFound,
        ..CompileOptions::default()
    };
    let router = compile(RouteMap::new().route("/", View::handler(h1)), &options)
        .unwrap()
        .into_router();

    assert_eq!(
        send(&router, Method::GET, "/").await,
        (StatusCode::OK, "h1".to_owned())
    );
    assert_eq!(
        send(&router, Method::PUT, "/").await,
        (StatusCode::NOT_FOUND, String::new())
    );
}

#[tokio::test]
async fn sub_router_receives_subpaths() {
    let sub = RouteMap::new().route("/x", View::handler(h2)).into_sub_router();
    let router = RouteMap::new()
        .route("/app", sub.clone())
        .route("/", View::handler(h1))
        .into_router();

    assert_eq!(
        send(&router, Method::GET, "/app/x").await,
        (StatusCode::OK, "h2".to_owned())
    );
    // the sub-router's own defaults apply, not the parent's
    assert_eq!(
        send(&router, Method::POST, "/app/x").await.0,
        StatusCode::METHOD_NOT_ALLOWED
    );
    assert_eq!(
        send(&router, Method::GET, "/app/y").await.0,
        StatusCode::NOT_FOUND
    );

    let merged = RouteMap::new().route("/", sub).into_router();
    assert_eq!(
        send(&merged, Method::GET, "/x").await,
        (StatusCode::OK, "h2".to_owned())
    );
}

#[tokio::test]
async fn dotfiles_follow_the_option() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".secret"), "hunter2").unwrap();
    let routes = || RouteMap::new().route("/secret", ".secret");

    let open = compile(
        routes(),
        &CompileOptions {
            static_root: Some(dir.path().to_owned()),
            ..CompileOptions::default()
        },
    )
    .unwrap()
    .into_router();
    assert_eq!(
        send(&open, Method::GET, "/secret").await,
        (StatusCode::OK, "hunter2".to_owned())
    );

    let closed = compile(
        routes(),
        &CompileOptions {
            static_root: Some(dir.path().to_owned()),
            allow_dotfiles: false,
            ..CompileOptions::default()
        },
    )
    .unwrap();
    assert_eq!(closed.diagnostics().len(), 1);
    let closed = closed.into_router();
    assert_eq!(
        send(&closed, Method::GET, "/secret").await,
        (StatusCode::NOT_FOUND, String::new())
    );
}

#[tokio::test]
async fn missing_file_is_a_request_time_404() {
    let dir = tempfile::tempdir().unwrap();
    let options = CompileOptions {
        static_root: Some(dir.path().to_owned()),
        ..CompileOptions::default()
    };
    let table = compile(RouteMap::new().route("/gone", "gone.html"), &options).unwrap();
    assert!(table.diagnostics().is_empty());

    let router = table.into_router();
    assert_eq!(
        send(&router, Method::GET, "/gone").await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn bundled_manifest_serves_from_working_directory() {
    let manifest = manifest::load(Path::new("routes.toml"), &routes::registry()).unwrap();
    assert!(manifest.diagnostics.is_empty());

    let table = compile(manifest.routes, &CompileOptions::default()).unwrap();
    assert!(table.diagnostics().is_empty());
    let router = table.into_router();

    let index = fs::read_to_string("public/index.html").unwrap();
    assert_eq!(
        send(&router, Method::GET, "/index").await,
        (StatusCode::OK, index)
    );
    assert_eq!(
        send(&router, Method::GET, "/").await,
        (StatusCode::OK, "Hello, World!".to_owned())
    );
    assert_eq!(
        send(&router, Method::POST, "/foo").await,
        (StatusCode::OK, "Hi from `POST /foo`".to_owned())
    );
    assert_eq!(
        send(&router, Method::DELETE, "/echo/a/b").await,
        (StatusCode::OK, "DELETE /echo/a/b".to_owned())
    );
    assert_eq!(
        send(&router, Method::GET, "/api/health").await.0,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        send(&router, Method::PUT, "/api/echo").await,
        (StatusCode::OK, "PUT /echo".to_owned())
    );
    assert_eq!(
        send(&router, Method::PATCH, "/foo").await.0,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[tokio::test]
async fn unregistrable_paths_are_skipped_not_fatal() {
    let sub = || RouteMap::new().route("/x", View::handler(h2)).into_sub_router();
    let routes = RouteMap::new()
        .route("/users/:id", View::handler(h2))
        .route("hello", View::handler(h2))
        .route("/a/{*rest}", sub())
        .route("/", sub())
        .route("/x", View::handler(h1))
        .route("/users/{id}", View::handler(h1));
    let table = compile(routes, &CompileOptions::default()).unwrap();

    let skipped: Vec<&str> = table
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::InvalidPath { .. }))
        .map(Diagnostic::path)
        .collect();
    assert_eq!(skipped, ["/users/:id", "hello", "/a/{*rest}", "/x"]);

    let router = table.into_router();
    // the merged sub-router keeps `/x`, the later sibling is dropped
    assert_eq!(
        send(&router, Method::GET, "/x").await,
        (StatusCode::OK, "h2".to_owned())
    );
    assert_eq!(
        send(&router, Method::GET, "/users/7").await,
        (StatusCode::OK, "h1".to_owned())
    );
}

#[tokio::test]
async fn bad_manifest_keys_do_not_stop_the_rest() {
    let manifest = manifest::parse(
        r#"
        [routes]
        "/users/:id" = { handler = "root" }
        "no-slash" = { handler = "root" }
        "/" = { handler = "root" }
        "#,
        &routes::registry(),
    )
    .unwrap();
    let table = compile(manifest.routes, &CompileOptions::default()).unwrap();
    assert_eq!(table.diagnostics().len(), 2);

    let router = table.into_router();
    assert_eq!(
        send(&router, Method::GET, "/").await,
        (StatusCode::OK, "Hello, World!".to_owned())
    );
}
