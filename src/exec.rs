use anyhow::{Context, Result};
use log::{debug, error, info};
use nix::unistd::execvpe;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use which::which;

/// Resolve `command` against `PATH`. The lookup happens after the
/// environment has been populated, so a decoded `PATH` is honoured.
pub fn resolve(command: &str) -> Result<PathBuf> {
    let path = which(command).with_context(|| format!("Failed to find binary: {}", command))?;
    debug!("Resolved {} to {}", command, path.display());
    Ok(path)
}

/// Replace the current process with `binary`, passing `args` and `env_vars`
/// (`KEY=VALUE` entries). Only returns on failure.
pub fn run(binary: &Path, args: &[String], env_vars: &[CString]) -> Result<()> {
    info!("Executing: {} with args: {:?}", binary.display(), args);
    debug!("Passing {} environment variables", env_vars.len());

    let binary_cstr = CString::new(binary.as_os_str().as_bytes())
        .context("Failed to convert command to CString")?;

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(binary_cstr.clone());
    for arg in args {
        argv.push(CString::new(arg.as_str()).context("Failed to convert argument to CString")?);
    }

    match execvpe(&binary_cstr, &argv, env_vars) {
        Ok(_) => unreachable!(), // execvpe only returns on error
        Err(err) => {
            error!("Failed to execute command: {}", err);
            Err(anyhow::anyhow!("Failed to execute {}: {}", binary.display(), err))
        }
    }
}
