use std::sync::OnceLock;

use crate::store::{EnvStore, ProcessEnv};

static IS_PROD: OnceLock<bool> = OnceLock::new();

/// Read a variable from the process environment.
pub fn get_env(key: &str) -> Option<String> {
    ProcessEnv.get(key)
}

/// Whether `NODE_ENV` in `store` is exactly `production`.
pub fn is_production<S: EnvStore + ?Sized>(store: &S) -> bool {
    store.get("NODE_ENV").as_deref() == Some("production")
}

/// [`is_production`] for the process environment, evaluated on first call
/// and cached afterwards. Decode blobs before calling this if they may set
/// `NODE_ENV`.
pub fn is_prod() -> bool {
    *IS_PROD.get_or_init(|| is_production(&ProcessEnv))
}
