//! Path checks mirroring the ones axum asserts while registering routes.
//!
//! axum panics on a path it rejects. Every route is claimed here first so a
//! bad entry can be skipped with a diagnostic instead.

/// Concrete paths registered so far, kept in a matchit tree like axum's own.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathSet {
    node: matchit::Router<()>,
    paths: Vec<String>,
}

impl PathSet {
    /// Registers a route answered directly at `path`.
    pub(crate) fn claim_route(&mut self, path: &str) -> Result<(), String> {
        check_route(path)?;
        self.insert_all([path.to_owned()])
    }

    /// Registers the paths a sub-router brings when mounted at `prefix`.
    /// A mount at `/` is merged, so its paths are taken as they are.
    pub(crate) fn claim_mount(&mut self, prefix: &str, inner: &[String]) -> Result<(), String> {
        if prefix == "/" {
            return self.insert_all(inner.iter().cloned());
        }
        check_route(prefix)?;
        if prefix.split('/').any(is_wildcard) {
            return Err("sub-routers cannot be mounted under a wildcard".to_owned());
        }
        self.insert_all(inner.iter().map(|path| nested_path(prefix, path)))
    }

    pub(crate) fn into_paths(self) -> Vec<String> {
        self.paths
    }

    /// All or nothing: a rejected path leaves the set untouched.
    fn insert_all(&mut self, paths: impl IntoIterator<Item = String>) -> Result<(), String> {
        let mut node = self.node.clone();
        let mut added = Vec::new();
        for path in paths {
            node.insert(path.as_str(), ())
                .map_err(|e| format!("`{path}` cannot be registered: {e}"))?;
            added.push(path);
        }
        self.node = node;
        self.paths.extend(added);
        Ok(())
    }
}

fn check_route(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err("paths must start with `/`".to_owned());
    }
    for segment in path.split('/') {
        if segment.starts_with(':') {
            return Err(format!(
                "segment `{segment}` uses `:` captures, write `{{{}}}` instead",
                &segment[1..]
            ));
        }
        if segment.starts_with('*') {
            return Err(format!(
                "segment `{segment}` uses `*` wildcards, write `{{*{}}}` instead",
                &segment[1..]
            ));
        }
    }
    Ok(())
}

fn is_wildcard(segment: &str) -> bool {
    segment.starts_with("{*") && segment.ends_with('}') && !segment.ends_with("}}")
}

/// Where axum registers `path` of a router nested at `prefix`.
fn nested_path(prefix: &str, path: &str) -> String {
    if prefix.ends_with('/') {
        format!("{prefix}{}", path.trim_start_matches('/'))
    } else if path == "/" {
        prefix.to_owned()
    } else {
        format!("{prefix}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_what_axum_rejects() {
        let mut set = PathSet::default();
        assert!(set.claim_route("hello").is_err());
        assert!(set.claim_route("").is_err());
        assert!(set.claim_route("/users/:id").is_err());
        assert!(set.claim_route("/files/*rest").is_err());
        assert!(set.claim_route("/broken/{id").is_err());
        assert!(set.claim_route("/users/{id}").is_ok());
        // same shape, different capture name
        assert!(set.claim_route("/users/{name}").is_err());
        assert!(set.claim_route("/users/{id}").is_err());
        assert_eq!(set.into_paths(), ["/users/{id}"]);
    }

    #[test]
    fn mounts_expand_under_prefix() {
        let inner = ["/".to_owned(), "/x".to_owned()];
        let mut set = PathSet::default();
        set.claim_mount("/app", &inner).unwrap();
        set.claim_mount("/", &["/y".to_owned()]).unwrap();

        assert!(set.claim_route("/app/x").is_err());
        assert!(set.claim_route("/y").is_err());
        assert!(set.claim_mount("/a/{*rest}", &inner).is_err());
        assert!(set.claim_mount("/", &["/app".to_owned()]).is_err());
        assert_eq!(set.into_paths(), ["/app", "/app/x", "/y"]);
    }

    #[test]
    fn rejected_mount_claims_nothing() {
        let mut set = PathSet::default();
        set.claim_route("/b").unwrap();
        assert!(set
            .claim_mount("/", &["/a".to_owned(), "/b".to_owned()])
            .is_err());
        assert!(set.claim_route("/a").is_ok());
    }

    #[test]
    fn nested_paths_follow_axum() {
        assert_eq!(nested_path("/app", "/"), "/app");
        assert_eq!(nested_path("/app", "/x"), "/app/x");
        assert_eq!(nested_path("/app/", "/x"), "/app/x");
    }
}
