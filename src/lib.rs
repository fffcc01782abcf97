//! Compile declarative route maps into axum routers.
//!
//! Every path declared in a [`RouteMap`] answers all nine standard verbs:
//! the ones given a handler call it, the rest get a fixed 404 or 405 with an
//! empty body.
//!
//! ```no_run
//! use route_table::{Handler, MethodMap, RouteMap, Verb, View};
//!
//! async fn hello() -> &'static str {
//!     "hello"
//! }
//!
//! let app = RouteMap::new()
//!     .route("/", "index.html")
//!     .route("/hello", MethodMap::new().with(Verb::Get, Handler::new(hello)))
//!     .route("/hi", View::handler(hello))
//!     .into_router();
//! # let _: axum::Router = app;
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod telemetry;

pub use app::{
    compile::{
        compile, Binding, Bindings, CompileOptions, CompiledRoute, DefaultStatus, DuplicatePolicy,
        RouteTable, Target,
    },
    diagnostic::Diagnostic,
    manifest::{Manifest, Registry},
    method::Verb,
    route_map::RouteMap,
    view::{Handler, MethodMap, SubRouter, View},
};
pub use error::{CompileError, ConfigError, ManifestError};
