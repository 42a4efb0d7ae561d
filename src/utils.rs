use anyhow::{bail, Result};
use std::env;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use xenv::Pair;

/// Parse `--env` flags of the form `KEY=VALUE`.
///
/// Values are taken verbatim, quotes included, since the shell has already
/// done its own unquoting.
pub fn parse_overrides(env_flags: &[String]) -> Result<Vec<Pair>> {
    let mut result = Vec::new();

    for env_flag in env_flags {
        match env_flag.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                result.push(Pair::new(key.trim(), value));
            }
            _ => bail!("Invalid --env value '{}', expected KEY=VALUE", env_flag),
        }
    }

    Ok(result)
}

/// Render pairs as `KEY=VALUE` lines.
pub fn render(pairs: &[Pair]) -> Vec<String> {
    pairs
        .iter()
        .map(|pair| format!("{}={}", pair.key, pair.value))
        .collect()
}

/// The current process environment as `KEY=VALUE` entries for exec, bytes
/// passed through unchanged.
pub fn environment_entries() -> Vec<CString> {
    env::vars_os()
        .filter_map(|(k, v)| {
            let mut entry = Vec::with_capacity(k.len() + v.len() + 1);
            entry.extend_from_slice(k.as_bytes());
            entry.push(b'=');
            entry.extend_from_slice(v.as_bytes());
            // The OS never hands out entries with interior NULs.
            CString::new(entry).ok()
        })
        .collect()
}
