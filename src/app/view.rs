//! View descriptors: what a route map entry resolves to.

use std::{fmt, path::PathBuf, sync::Arc};

use axum::{extract::Request, handler::Handler as AxumHandler, response::Response, Router};
use futures_util::future::{BoxFuture, FutureExt};

use super::method::Verb;

type HandlerFn = dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync;

/// A type-erased request handler.
///
/// Clones share the same underlying function, so identity survives
/// compilation and can be checked with [`Handler::ptr_eq`].
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<H, T>(handler: H) -> Self
    where
        H: AxumHandler<T, ()>,
        T: 'static,
    {
        Self(Arc::new(move |req: Request| handler.clone().call(req, ()).boxed()))
    }

    pub fn call(&self, req: Request) -> BoxFuture<'static, Response> {
        (self.0)(req)
    }

    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodMap {
    handlers: [Option<Handler>; 9],
    ignored: Vec<String>,
}

impl MethodMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, verb: Verb, handler: Handler) -> Self {
        self.insert(verb, handler);
        self
    }

    /// Sets the handler for `verb`, returning the one it replaces.
    pub fn insert(&mut self, verb: Verb, handler: Handler) -> Option<Handler> {
        self.handlers[verb.index()].replace(handler)
    }

    /// Sets a handler by verb name, case-insensitive.
    ///
    /// Names that are not a verb are remembered so the compiler can report
    /// them; the handler itself is dropped.
    pub fn insert_named(&mut self, name: &str, handler: Handler) {
        match name.parse::<Verb>() {
            Ok(verb) => {
                self.insert(verb, handler);
            }
            Err(_) => self.ignored.push(name.to_owned()),
        }
    }

    pub fn get(&self, verb: Verb) -> Option<&Handler> {
        self.handlers[verb.index()].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.iter().all(Option::is_none)
    }

    /// Names passed to [`MethodMap::insert_named`] that were not verbs.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}

impl<S: AsRef<str>> FromIterator<(S, Handler)> for MethodMap {
    fn from_iter<I: IntoIterator<Item = (S, Handler)>>(iter: I) -> Self {
        let mut map = MethodMap::new();
        for (name, handler) in iter {
            map.insert_named(name.as_ref(), handler);
        }
        map
    }
}

/// A router compiled from a route map, along with every path it registered.
#[derive(Debug, Clone)]
pub struct SubRouter {
    pub(crate) router: Router,
    pub(crate) paths: Vec<String>,
}

impl SubRouter {
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

#[derive(Debug, Clone)]
pub enum View {
    /// Serve this file for GET.
    File(PathBuf),
    /// Answer GET with this handler.
    Handler(Handler),
    /// Mounted under the path, or merged when the path is `/`.
    Router(SubRouter),
    Methods(MethodMap),
    /// `kind` names what was found instead of a descriptor.
    Unsupported { kind: String },
}

impl View {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        View::File(path.into())
    }

    pub fn handler<H, T>(handler: H) -> Self
    where
        H: AxumHandler<T, ()>,
        T: 'static,
    {
        View::Handler(Handler::new(handler))
    }
}

impl From<&str> for View {
    fn from(path: &str) -> Self {
        View::file(path)
    }
}

impl From<PathBuf> for View {
    fn from(path: PathBuf) -> Self {
        View::File(path)
    }
}

impl From<Handler> for View {
    fn from(handler: Handler) -> Self {
        View::Handler(handler)
    }
}

impl From<SubRouter> for View {
    fn from(router: SubRouter) -> Self {
        View::Router(router)
    }
}

impl From<MethodMap> for View {
    fn from(map: MethodMap) -> Self {
        View::Methods(map)
    }
}
