//! Catalog location resolution.
//!
//! A catalog is chosen in this order:
//!
//! 1. an explicit path (the CLI's `--catalog` flag)
//! 2. the path in the `SHIPYARD_CATALOG` environment variable
//! 3. `catalog.json` in the platform data directory, when it exists
//! 4. the catalog embedded in the crate

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogOrigin};
use crate::error::{Error, Result};

/// Environment variable naming a catalog file.
pub const CATALOG_ENV_VAR: &str = "SHIPYARD_CATALOG";

const CATALOG_FILENAME: &str = "catalog.json";

/// Platform data directory location of a user catalog.
pub fn default_catalog_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "shipyard", "shipyard").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(CATALOG_FILENAME))
}

/// Where the next catalog should come from, without reading it.
///
/// Explicit and environment paths must exist; the data-directory default is
/// skipped silently when absent.
pub fn resolve_catalog_origin(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    default_path: Option<PathBuf>,
) -> Result<CatalogOrigin> {
    if let Some(path) = explicit {
        return existing(path.to_path_buf());
    }
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        debug!(var = CATALOG_ENV_VAR, path = %path.display(), "catalog path from environment");
        return existing(path);
    }
    match default_path {
        Some(path) if path.is_file() => Ok(CatalogOrigin::File(path)),
        _ => Ok(CatalogOrigin::Builtin),
    }
}

fn existing(path: PathBuf) -> Result<CatalogOrigin> {
    if path.is_file() {
        Ok(CatalogOrigin::File(path))
    } else {
        Err(Error::CatalogNotFound { path })
    }
}

/// Resolve and load the catalog used by a session.
pub fn load_catalog(explicit: Option<&Path>) -> Result<(Catalog, CatalogOrigin)> {
    let from_env = env::var_os(CATALOG_ENV_VAR).map(PathBuf::from);
    // A platform without a data directory still has the built-in catalog.
    let default_path = default_catalog_path().ok();

    let origin = resolve_catalog_origin(explicit, from_env, default_path)?;
    let catalog = match &origin {
        CatalogOrigin::File(path) => Catalog::from_path(path)?,
        CatalogOrigin::Builtin => Catalog::builtin()?,
    };

    match &origin {
        CatalogOrigin::File(path) => info!(path = %path.display(), "using catalog file"),
        CatalogOrigin::Builtin => debug!("using built-in catalog"),
    }
    Ok((catalog, origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_path_wins_and_must_exist() {
        let dir = tempdir().expect("tempdir");
        let explicit = dir.path().join("mine.json");
        let env_path = dir.path().join("env.json");
        fs::write(&explicit, "{}").expect("write");
        fs::write(&env_path, "{}").expect("write");

        let origin =
            resolve_catalog_origin(Some(&explicit), Some(env_path.clone()), None).expect("exists");
        assert_eq!(origin, CatalogOrigin::File(explicit));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            resolve_catalog_origin(Some(&missing), Some(env_path), None),
            Err(Error::CatalogNotFound { .. })
        ));
    }

    #[test]
    fn environment_path_must_exist() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            resolve_catalog_origin(None, Some(missing), None),
            Err(Error::CatalogNotFound { .. })
        ));
    }

    #[test]
    fn falls_back_to_builtin_when_default_is_absent() {
        let dir = tempdir().expect("tempdir");
        let default_path = dir.path().join(CATALOG_FILENAME);
        let origin =
            resolve_catalog_origin(None, Some(PathBuf::new()), Some(default_path.clone()))
                .expect("fallback");
        assert_eq!(origin, CatalogOrigin::Builtin);

        fs::write(&default_path, "{}").expect("write");
        let origin = resolve_catalog_origin(None, None, Some(default_path.clone())).expect("file");
        assert_eq!(origin, CatalogOrigin::File(default_path));
    }
}
