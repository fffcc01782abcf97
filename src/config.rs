//! Environment configuration. `.env` is loaded by `main` before this runs.

use std::{env, path::PathBuf, str::FromStr};

use axum::http::HeaderValue;

use crate::{app::compile::CompileOptions, error::ConfigError};

#[derive(Debug, Clone)]
pub struct Config {
    pub service_addr: String,
    pub routes_file: PathBuf,
    pub compile: CompileOptions,
    /// Allowed CORS origins; CORS is off when empty.
    pub origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Reads configuration through `lookup`, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let compile = CompileOptions {
            default_status: parsed(&lookup, "DEFAULT_STATUS")?.unwrap_or_default(),
            allow_dotfiles: match lookup("ALLOW_DOTFILES") {
                Some(value) => flag("ALLOW_DOTFILES", &value)?,
                None => true,
            },
            on_duplicate_path: parsed(&lookup, "ON_DUPLICATE_PATH")?.unwrap_or_default(),
            static_root: lookup("STATIC_ROOT").map(PathBuf::from),
        };

        let origins = ["BACKEND_URL", "FRONTEND_URL"]
            .into_iter()
            .filter_map(|var| lookup(var).map(|value| (var, value)))
            .map(|(var, value)| {
                value.parse::<HeaderValue>().map_err(|e| ConfigError::Invalid {
                    var,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            service_addr: lookup("SERVICE_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_owned()),
            routes_file: lookup("ROUTES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("routes.toml")),
            compile,
            origins,
        })
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
{
    lookup(var)
        .map(|value| value.parse().map_err(|reason| ConfigError::Invalid { var, reason }))
        .transpose()
}

fn flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            var,
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}
