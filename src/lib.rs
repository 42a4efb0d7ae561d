//! Decode base64 encoded environment blobs into regular environment
//! variables.
//!
//! Some deployment targets can only hand a process a single opaque secret.
//! Storing a whole `.env` document base64 encoded under `X_ENV` (or any key
//! containing `X_ENV`) and decoding it at startup lets the rest of the
//! application read its configuration as usual.
//!
//! ```no_run
//! use xenv::{EnvBlobDecoder, ProcessEnv};
//!
//! # fn main() -> xenv::Result<()> {
//! EnvBlobDecoder::default().decode_and_populate(&mut ProcessEnv, None)?;
//! let database_url = xenv::get_env("DATABASE_URL");
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod decoder;
pub mod dotenv;
pub mod error;
pub mod runtime;
pub mod store;

pub use blob::{encode_env_file, Pair};
pub use decoder::{DecoderConfig, EnvBlobDecoder, Report, DEFAULT_SOURCE_KEY};
pub use dotenv::load;
pub use error::{Error, Result};
pub use runtime::{get_env, is_prod, is_production};
pub use store::{EnvStore, MemoryEnv, ProcessEnv};
