use log::{debug, error, info, warn};

use crate::blob::{self, Pair};
use crate::error::{Error, Result};
use crate::store::EnvStore;

/// Source key looked up when nothing else is configured.
pub const DEFAULT_SOURCE_KEY: &str = "X_ENV";

#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Any key containing this substring is treated as a blob source.
    pub pattern: String,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_SOURCE_KEY.to_string(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one [`EnvBlobDecoder::decode_and_populate`] run.
#[derive(Debug, Default)]
pub struct Report {
    /// Source keys whose blobs were decoded, in processing order.
    pub decoded: Vec<String>,
    /// Source keys that were present but empty.
    pub skipped: Vec<String>,
    /// Source keys whose blobs were rejected.
    pub failed: Vec<(String, Error)>,
    /// Every assignment applied, in order. Later entries win.
    pub applied: Vec<Pair>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Finds base64 env blobs in an [`EnvStore`] and merges their contents back
/// into it.
#[derive(Debug, Clone, Default)]
pub struct EnvBlobDecoder {
    config: DecoderConfig,
}

impl EnvBlobDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Keys containing the configured pattern, shortest first, ties broken
    /// alphabetically.
    pub fn discover<S: EnvStore + ?Sized>(&self, store: &S) -> Vec<String> {
        let mut keys: Vec<String> = store
            .keys()
            .into_iter()
            .filter(|k| k.contains(self.config.pattern.as_str()))
            .collect();
        keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        keys
    }

    /// Decode blobs from `store` and write their assignments into it.
    ///
    /// With `Some(key)` only that key is processed and any failure is
    /// returned. With `None` every discovered key is processed; failures are
    /// logged, recorded in the [`Report`] and do not stop the remaining keys.
    pub fn decode_and_populate<S: EnvStore + ?Sized>(
        &self,
        store: &mut S,
        key: Option<&str>,
    ) -> Result<Report> {
        let mut report = Report::default();

        match key {
            Some(key) => {
                let value = store
                    .get(key)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| Error::MissingSource {
                        key: key.to_string(),
                    })?;
                let pairs = decode_source(key, &value)?;
                apply(store, &pairs);
                report.decoded.push(key.to_string());
                report.applied = pairs;
            }
            None => {
                let keys = self.discover(store);
                debug!("Discovered source keys: {:?}", keys);

                for key in keys {
                    let value = match store.get(&key) {
                        Some(v) if !v.is_empty() => v,
                        _ => {
                            warn!("Skipping {}: empty value", key);
                            report.skipped.push(key);
                            continue;
                        }
                    };

                    match decode_source(&key, &value) {
                        Ok(pairs) => {
                            apply(store, &pairs);
                            report.decoded.push(key);
                            report.applied.extend(pairs);
                        }
                        Err(err) => {
                            error!("Error setting up environment from {}: {}", key, err);
                            report.failed.push((key, err));
                        }
                    }
                }
            }
        }

        info!(
            "Applied {} variables from {} source(s)",
            report.applied.len(),
            report.decoded.len()
        );
        Ok(report)
    }
}

/// Decode and parse one blob. The blob is rejected as a whole if any
/// assignment could not be stored in a process environment.
fn decode_source(key: &str, value: &str) -> Result<Vec<Pair>> {
    let pairs = blob::parse(&blob::decode(value));
    if let Some(bad) = pairs
        .iter()
        .find(|p| p.key.contains('\0') || p.value.contains('\0'))
    {
        return Err(Error::InvalidAssignment {
            key: key.to_string(),
            name: bad.key.clone(),
        });
    }
    Ok(pairs)
}

fn apply<S: EnvStore + ?Sized>(store: &mut S, pairs: &[Pair]) {
    for pair in pairs {
        debug!("Setting {}", pair.key);
        store.set(&pair.key, &pair.value);
    }
}
