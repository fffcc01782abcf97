use super::{
    compile::{compile, CompileOptions, RouteTable},
    view::{SubRouter, View},
};
use crate::error::CompileError;

/// Ordered path → view declarations.
///
/// Repeated paths are kept as written; the compiler decides what to do with
/// them according to [`CompileOptions::on_duplicate_path`].
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    entries: Vec<(String, View)>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: impl Into<String>, view: impl Into<View>) -> Self {
        self.insert(path, view);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, view: impl Into<View>) {
        self.entries.push((path.into(), view.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &View)> {
        self.entries.iter().map(|(path, view)| (path.as_str(), view))
    }

    pub fn compile(self, options: &CompileOptions) -> Result<RouteTable, CompileError> {
        compile(self, options)
    }

    /// Compiles with default options straight into an axum router.
    pub fn into_router(self) -> axum::Router {
        RouteTable::build(self, &CompileOptions::default()).into_router()
    }

    /// Like [`RouteMap::into_router`], but ready to be placed in another route map.
    pub fn into_sub_router(self) -> SubRouter {
        RouteTable::build(self, &CompileOptions::default()).into_sub_router()
    }
}

impl IntoIterator for RouteMap {
    type Item = (String, View);
    type IntoIter = std::vec::IntoIter<(String, View)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<P: Into<String>, V: Into<View>> FromIterator<(P, V)> for RouteMap {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut map = RouteMap::new();
        for (path, view) in iter {
            map.insert(path, view);
        }
        map
    }
}
