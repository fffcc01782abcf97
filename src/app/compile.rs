//! Route table compilation.
//!
//! Turns a [`RouteMap`] into a [`RouteTable`] where every declared path
//! either mounts a sub-router or carries exactly one [`Binding`] for each of
//! the nine verbs, then hands the table to axum.

use std::{
    collections::{HashMap, HashSet},
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use axum::{
    extract::Request,
    http::StatusCode,
    routing::MethodRouter,
    Router,
};
use tower_http::services::ServeFile;

use super::{
    diagnostic::Diagnostic,
    method::Verb,
    paths::PathSet,
    route_map::RouteMap,
    view::{Handler, SubRouter, View},
};
use crate::error::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultStatus {
    NotFound,
    #[default]
    MethodNotAllowed,
}

impl DefaultStatus {
    pub fn status(self) -> StatusCode {
        match self {
            DefaultStatus::NotFound => StatusCode::NOT_FOUND,
            DefaultStatus::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl FromStr for DefaultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "404" | "not_found" | "not-found" => Ok(DefaultStatus::NotFound),
            "405" | "method_not_allowed" | "method-not-allowed" => {
                Ok(DefaultStatus::MethodNotAllowed)
            }
            other => Err(format!("expected 404 or 405, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    #[default]
    Overwrite,
    /// Last declaration wins and a [`Diagnostic::DuplicatePath`] is recorded.
    Warn,
    /// Compilation fails with [`CompileError::DuplicatePath`].
    Error,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            "warn" => Ok(DuplicatePolicy::Warn),
            "error" => Ok(DuplicatePolicy::Error),
            other => Err(format!("expected overwrite, warn or error, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub default_status: DefaultStatus,
    /// Serve file routes whose path has a component starting with `.`.
    pub allow_dotfiles: bool,
    pub on_duplicate_path: DuplicatePolicy,
    /// Base directory for file routes. Unset means the working directory.
    pub static_root: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_status: DefaultStatus::default(),
            allow_dotfiles: true,
            on_duplicate_path: DuplicatePolicy::default(),
            static_root: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Binding {
    Handler(Handler),
    File(PathBuf),
    Status(StatusCode),
}

impl Binding {
    pub fn handler(&self) -> Option<&Handler> {
        match self {
            Binding::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Binding::Status(status) => Some(*status),
            _ => None,
        }
    }
}

/// One binding per verb, indexed in [`Verb::ALL`] order.
#[derive(Debug, Clone)]
pub struct Bindings([Binding; 9]);

impl Bindings {
    pub fn get(&self, verb: Verb) -> &Binding {
        &self.0[verb.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Verb, &Binding)> {
        Verb::ALL.into_iter().zip(self.0.iter())
    }

    fn into_method_router(self) -> MethodRouter {
        Verb::ALL
            .into_iter()
            .zip(self.0)
            .fold(MethodRouter::new(), |router, (verb, binding)| match binding {
                Binding::Handler(handler) => {
                    router.on(verb.filter(), move |req: Request| handler.call(req))
                }
                Binding::File(path) => router.on_service(verb.filter(), ServeFile::new(path)),
                Binding::Status(status) => router.on(verb.filter(), move || async move { status }),
            })
    }
}

#[derive(Debug, Clone)]
pub enum Target {
    Methods(Bindings),
    Mount(SubRouter),
}

#[derive(Debug, Clone)]
pub struct CompiledRoute {
    path: String,
    target: Target,
}

impl CompiledRoute {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn bindings(&self) -> Option<&Bindings> {
        match &self.target {
            Target::Methods(bindings) => Some(bindings),
            Target::Mount(_) => None,
        }
    }

    pub fn is_mount(&self) -> bool {
        matches!(self.target, Target::Mount(_))
    }
}

/// A compiled route map, in declaration order.
///
/// Only routes axum will accept make it in; the rest are dropped with a
/// [`Diagnostic::InvalidPath`], so [`RouteTable::into_router`] cannot panic.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    paths: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl RouteTable {
    /// Compiles without ever failing: [`DuplicatePolicy::Error`] behaves
    /// like [`DuplicatePolicy::Overwrite`] here.
    pub(crate) fn build(routes: RouteMap, options: &CompileOptions) -> Self {
        let mut diagnostics = Vec::new();
        let entries = dedupe(routes, options.on_duplicate_path, &mut diagnostics);

        let mut claimed = PathSet::default();
        let routes: Vec<CompiledRoute> = entries
            .into_iter()
            .filter_map(|(path, view)| {
                let route = compile_entry(path, view, options, &mut diagnostics);
                let claim = match &route.target {
                    Target::Methods(_) => claimed.claim_route(&route.path),
                    Target::Mount(sub) => claimed.claim_mount(&route.path, &sub.paths),
                };
                match claim {
                    Ok(()) => Some(route),
                    Err(reason) => {
                        Diagnostic::InvalidPath {
                            path: route.path,
                            reason,
                        }
                        .report(&mut diagnostics);
                        None
                    }
                }
            })
            .collect();

        tracing::info!(
            routes = routes.len(),
            diagnostics = diagnostics.len(),
            "compiled route table"
        );
        Self {
            routes,
            paths: claimed.into_paths(),
            diagnostics,
        }
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn get(&self, path: &str) -> Option<&CompiledRoute> {
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_router(self) -> Router {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, route| match route.target {
                // axum cannot nest at the root
                Target::Mount(sub) if route.path == "/" => router.merge(sub.router),
                Target::Mount(sub) => router.nest(&route.path, sub.router),
                Target::Methods(bindings) => {
                    router.route(&route.path, bindings.into_method_router())
                }
            })
    }

    pub fn into_sub_router(self) -> SubRouter {
        SubRouter {
            paths: self.paths.clone(),
            router: self.into_router(),
        }
    }
}

/// Compiles `routes`, binding every verb of every non-mounted path.
pub fn compile(routes: RouteMap, options: &CompileOptions) -> Result<RouteTable, CompileError> {
    if options.on_duplicate_path == DuplicatePolicy::Error {
        let mut seen = HashSet::new();
        for (path, _) in routes.iter() {
            if !seen.insert(path) {
                return Err(CompileError::DuplicatePath(path.to_owned()));
            }
        }
    }
    Ok(RouteTable::build(routes, options))
}

/// Collapses repeated paths: the first position is kept, the last view wins.
fn dedupe(
    routes: RouteMap,
    policy: DuplicatePolicy,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<(String, View)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, View)> = Vec::with_capacity(routes.len());

    for (path, view) in routes {
        match positions.get(&path) {
            Some(&i) => {
                if policy == DuplicatePolicy::Warn {
                    Diagnostic::DuplicatePath { path: path.clone() }.report(diagnostics);
                }
                entries[i].1 = view;
            }
            None => {
                positions.insert(path.clone(), entries.len());
                entries.push((path, view));
            }
        }
    }
    entries
}

fn compile_entry(
    path: String,
    view: View,
    options: &CompileOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> CompiledRoute {
    let mut slots: [Option<Binding>; 9] = Default::default();

    match view {
        View::Router(router) => {
            tracing::debug!(path = %path, "mounting sub-router");
            return CompiledRoute {
                path,
                target: Target::Mount(router),
            };
        }
        View::File(file) => {
            slots[Verb::Get.index()] = Some(file_binding(&path, file, options, diagnostics));
        }
        View::Handler(handler) => {
            slots[Verb::Get.index()] = Some(Binding::Handler(handler));
        }
        View::Methods(map) => {
            for name in map.ignored() {
                Diagnostic::UnknownMethod {
                    path: path.clone(),
                    name: name.clone(),
                }
                .report(diagnostics);
            }
            for verb in Verb::ALL {
                if let Some(handler) = map.get(verb) {
                    slots[verb.index()] = Some(Binding::Handler(handler.clone()));
                }
            }
        }
        View::Unsupported { kind } => {
            Diagnostic::UnsupportedView {
                path: path.clone(),
                kind,
            }
            .report(diagnostics);
        }
    }

    let fallback = options.default_status.status();
    let supplied: Vec<Verb> = Verb::ALL
        .into_iter()
        .filter(|verb| slots[verb.index()].is_some())
        .collect();
    tracing::debug!(path = %path, supplied = ?supplied, fallback = %fallback, "binding route");

    CompiledRoute {
        path,
        target: Target::Methods(Bindings(
            slots.map(|slot| slot.unwrap_or(Binding::Status(fallback))),
        )),
    }
}

fn file_binding(
    path: &str,
    file: PathBuf,
    options: &CompileOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Binding {
    if !options.allow_dotfiles && is_dotfile(&file) {
        Diagnostic::DotfileBlocked {
            path: path.to_owned(),
        }
        .report(diagnostics);
        return Binding::Status(StatusCode::NOT_FOUND);
    }
    match &options.static_root {
        Some(root) => Binding::File(root.join(file)),
        None => Binding::File(file),
    }
}

fn is_dotfile(file: &Path) -> bool {
    file.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}
