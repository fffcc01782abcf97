//! Built-in handlers the demo server exposes to route manifests.

use axum::{extract::Request, http::StatusCode, response::IntoResponse};

use super::{
    manifest::Registry,
    method::Verb,
    route_map::RouteMap,
    view::{Handler, MethodMap, SubRouter, View},
};

pub fn registry() -> Registry {
    Registry::new()
        .handler("root", Handler::new(root))
        .handler("get_foo", Handler::new(get_foo))
        .handler("post_foo", Handler::new(post_foo))
        .handler("echo", Handler::new(echo))
        .router("api", api())
}

async fn root() -> &'static str {
    "Hello, World!"
}

async fn get_foo() -> &'static str {
    "Hi from `GET /foo`"
}

async fn post_foo() -> &'static str {
    "Hi from `POST /foo`"
}

async fn echo(req: Request) -> impl IntoResponse {
    format!("{} {}", req.method(), req.uri().path())
}

/// Sub-router mounted by manifests as `mount = "api"`.
fn api() -> SubRouter {
    async fn health() -> StatusCode {
        StatusCode::NO_CONTENT
    }

    RouteMap::new()
        .route("/health", View::handler(health))
        .route(
            "/echo",
            MethodMap::new()
                .with(Verb::Get, Handler::new(echo))
                .with(Verb::Post, Handler::new(echo))
                .with(Verb::Put, Handler::new(echo)),
        )
        .into_sub_router()
}
