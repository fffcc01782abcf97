use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("path `{0}` is declared more than once")]
    DuplicatePath(String),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("reading route manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing route manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("route manifest has no `[routes]` table")]
    MissingRoutes,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
