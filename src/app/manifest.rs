//! Route maps declared in TOML.
//!
//! ```toml
//! [routes]
//! "/" = "public/index.html"                    # file
//! "/hello" = { handler = "hello" }             # GET handler
//! "/foo" = { get = "get_foo", post = "post_foo" }
//! "/api" = { mount = "api" }                   # sub-router
//! ```
//!
//! Handler and router names are looked up in a [`Registry`].

use std::{collections::HashMap, fs, path::Path};

use toml::{Table, Value};

use super::{
    diagnostic::Diagnostic,
    route_map::RouteMap,
    view::{Handler, MethodMap, SubRouter, View},
};
use crate::error::ManifestError;

/// Named handlers and sub-routers a manifest can refer to.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
    routers: HashMap<String, SubRouter>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn router(mut self, name: impl Into<String>, router: SubRouter) -> Self {
        self.routers.insert(name.into(), router);
        self
    }

    pub fn get_handler(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn get_router(&self, name: &str) -> Option<&SubRouter> {
        self.routers.get(name)
    }
}

/// A route map read from a manifest, with whatever could not be resolved.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub routes: RouteMap,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn load(path: &Path, registry: &Registry) -> Result<Manifest, ManifestError> {
    tracing::info!(manifest = %path.display(), "loading route manifest");
    let source = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse(&source, registry)
}

pub fn parse(source: &str, registry: &Registry) -> Result<Manifest, ManifestError> {
    let mut doc: Table = source.parse()?;
    let routes = match doc.remove("routes") {
        Some(Value::Table(routes)) => routes,
        _ => return Err(ManifestError::MissingRoutes),
    };

    let mut diagnostics = Vec::new();
    let routes = routes
        .into_iter()
        .map(|(path, value)| {
            let view = view(&path, value, registry, &mut diagnostics);
            (path, view)
        })
        .collect();

    Ok(Manifest {
        routes,
        diagnostics,
    })
}

fn view(path: &str, value: Value, registry: &Registry, diagnostics: &mut Vec<Diagnostic>) -> View {
    match value {
        Value::String(file) => View::file(file),
        Value::Table(table) => table_view(path, table, registry, diagnostics),
        other => View::Unsupported {
            kind: other.type_str().to_owned(),
        },
    }
}

fn table_view(
    path: &str,
    table: Table,
    registry: &Registry,
    diagnostics: &mut Vec<Diagnostic>,
) -> View {
    let single = match table.iter().next() {
        Some((key, Value::String(name))) if table.len() == 1 => Some((key.as_str(), name)),
        _ => None,
    };

    match single {
        Some(("handler", name)) => match registry.get_handler(name) {
            Some(handler) => View::Handler(handler.clone()),
            None => unresolved(path, name, diagnostics),
        },
        Some(("mount", name)) => match registry.get_router(name) {
            Some(router) => View::Router(router.clone()),
            None => unresolved(path, name, diagnostics),
        },
        _ => View::Methods(method_map(path, &table, registry, diagnostics)),
    }
}

fn method_map(
    path: &str,
    table: &Table,
    registry: &Registry,
    diagnostics: &mut Vec<Diagnostic>,
) -> MethodMap {
    let mut map = MethodMap::new();
    for (key, value) in table {
        let Value::String(name) = value else {
            Diagnostic::UnsupportedView {
                path: path.to_owned(),
                kind: format!("`{key}` is a {}, expected a handler name", value.type_str()),
            }
            .report(diagnostics);
            continue;
        };
        match registry.get_handler(name) {
            Some(handler) => map.insert_named(key, handler.clone()),
            None => Diagnostic::UnknownHandler {
                path: path.to_owned(),
                name: name.clone(),
            }
            .report(diagnostics),
        }
    }
    map
}

/// A name that resolves to nothing leaves every verb on the default.
fn unresolved(path: &str, name: &str, diagnostics: &mut Vec<Diagnostic>) -> View {
    Diagnostic::UnknownHandler {
        path: path.to_owned(),
        name: name.to_owned(),
    }
    .report(diagnostics);
    View::Methods(MethodMap::new())
}
