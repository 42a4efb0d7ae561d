//! Layered `.env` loading.
//!
//! Given a directory, files are looked up in this order (highest priority
//! first):
//!
//! 1. `.env.<NODE_ENV>.local`
//! 2. `.env.local` (not loaded when `NODE_ENV=test`)
//! 3. `.env.<NODE_ENV>`
//! 4. `.env`
//!
//! Given a file, the same overlays are derived from its name, e.g.
//! `config.env.production`. Variables already set are never overwritten.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::store::{EnvStore, ProcessEnv};

const BASE_NAME: &str = ".env";

/// Load `.env` files at `path` into the process environment.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    load_into(&mut ProcessEnv, path)
}

/// Load `.env` files at `path` into `store`, returning the files read.
pub fn load_into<S: EnvStore + ?Sized>(store: &mut S, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let node_env = store.get("NODE_ENV").filter(|v| !v.is_empty());
    let candidates = layered_paths(path, node_env.as_deref());
    debug!("Env file candidates: {:?}", candidates);

    let mut loaded = Vec::new();
    for candidate in candidates {
        if !candidate.is_file() {
            continue;
        }

        let iter = dotenvy::from_path_iter(&candidate).map_err(|source| Error::EnvFile {
            path: candidate.clone(),
            source,
        })?;
        for item in iter {
            let (key, value) = item.map_err(|source| Error::EnvFile {
                path: candidate.clone(),
                source,
            })?;
            if store.get(&key).is_none() {
                store.set(&key, &value);
            }
        }

        info!("Loaded {}", candidate.display());
        loaded.push(candidate);
    }

    if loaded.is_empty() {
        return Err(Error::EnvFileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(loaded)
}

/// Candidate files for `path`, highest priority first.
pub fn layered_paths(path: &Path, node_env: Option<&str>) -> Vec<PathBuf> {
    let (dir, base) = if path.is_dir() {
        (path.to_path_buf(), BASE_NAME.to_string())
    } else {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let base = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| BASE_NAME.to_string());
        (dir, base)
    };

    let mut names = Vec::new();
    if let Some(env) = node_env {
        names.push(format!("{}.{}.local", base, env));
    }
    if node_env != Some("test") {
        names.push(format!("{}.local", base));
    }
    if let Some(env) = node_env {
        names.push(format!("{}.{}", base, env));
    }
    names.push(base);

    names.into_iter().map(|name| dir.join(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEnv;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_layered_paths_for_directory() {
        let dir = tempfile::tempdir().unwrap();

        let paths = layered_paths(dir.path(), Some("production"));

        assert_eq!(
            paths,
            vec![
                dir.path().join(".env.production.local"),
                dir.path().join(".env.local"),
                dir.path().join(".env.production"),
                dir.path().join(".env"),
            ]
        );
    }

    #[test]
    fn test_layered_paths_for_file_without_node_env() {
        let paths = layered_paths(Path::new("/etc/app/config.env"), None);

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/etc/app/config.env.local"),
                PathBuf::from("/etc/app/config.env"),
            ]
        );
    }

    #[test]
    fn test_layered_paths_skip_local_in_test() {
        let paths = layered_paths(Path::new("/srv/.env"), Some("test"));

        assert!(!paths.contains(&PathBuf::from("/srv/.env.local")));
        assert!(paths.contains(&PathBuf::from("/srv/.env.test.local")));
    }

    #[test]
    fn test_load_into_overlay_priority() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".env", "A=base\nB=base\nC=base\n");
        write(dir.path(), ".env.staging", "B=staging\nC=staging\n");
        write(dir.path(), ".env.local", "C=local\n");
        let mut store: MemoryEnv = [("NODE_ENV", "staging")].into_iter().collect();

        let loaded = load_into(&mut store, dir.path()).unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(store.get("A").as_deref(), Some("base"));
        assert_eq!(store.get("B").as_deref(), Some("staging"));
        assert_eq!(store.get("C").as_deref(), Some("local"));
    }

    #[test]
    fn test_load_into_keeps_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".env", "PORT=8080\nHOST=localhost\n");
        let mut store: MemoryEnv = [("PORT", "9000")].into_iter().collect();

        load_into(&mut store, dir.path().join(".env")).unwrap();

        assert_eq!(store.get("PORT").as_deref(), Some("9000"));
        assert_eq!(store.get("HOST").as_deref(), Some("localhost"));
    }

    #[test]
    fn test_load_into_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MemoryEnv::new();

        let err = load_into(&mut store, dir.path()).unwrap_err();

        assert!(matches!(err, Error::EnvFileNotFound { .. }));
    }

    #[test]
    fn test_load_into_parse_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".env", "NOT VALID LINE WITH SPACES\n");
        let mut store = MemoryEnv::new();

        let err = load_into(&mut store, dir.path()).unwrap_err();

        assert!(matches!(err, Error::EnvFile { .. }));
    }
}
