use std::fmt;

/// A non-fatal problem found while reading or compiling a route map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A method map key that is not one of the nine verbs.
    UnknownMethod { path: String, name: String },
    /// A descriptor whose shape could not be bound; all verbs defaulted.
    UnsupportedView { path: String, kind: String },
    /// A handler or router name that is not in the registry.
    UnknownHandler { path: String, name: String },
    /// The path was declared more than once; the last declaration won.
    DuplicatePath { path: String },
    /// A file route pointing at a dotfile while dotfiles are disallowed.
    DotfileBlocked { path: String },
    /// The router would refuse the path, so the entry was skipped.
    InvalidPath { path: String, reason: String },
}

impl Diagnostic {
    pub fn path(&self) -> &str {
        match self {
            Diagnostic::UnknownMethod { path, .. }
            | Diagnostic::UnsupportedView { path, .. }
            | Diagnostic::UnknownHandler { path, .. }
            | Diagnostic::DuplicatePath { path }
            | Diagnostic::DotfileBlocked { path }
            | Diagnostic::InvalidPath { path, .. } => path,
        }
    }

    /// Logs the diagnostic and appends it to `sink`.
    pub(crate) fn report(self, sink: &mut Vec<Diagnostic>) {
        tracing::warn!(path = self.path(), "{}", self);
        sink.push(self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownMethod { path, name } => {
                write!(f, "ignoring unknown method `{name}` on {path}")
            }
            Diagnostic::UnsupportedView { path, kind } => {
                write!(f, "unsupported view ({kind}) on {path}, all methods defaulted")
            }
            Diagnostic::UnknownHandler { path, name } => {
                write!(f, "no handler or router named `{name}` for {path}")
            }
            Diagnostic::DuplicatePath { path } => {
                write!(f, "{path} declared more than once, keeping the last")
            }
            Diagnostic::DotfileBlocked { path } => {
                write!(f, "refusing to serve dotfile for {path}")
            }
            Diagnostic::InvalidPath { path, reason } => {
                write!(f, "skipping {path}: {reason}")
            }
        }
    }
}
