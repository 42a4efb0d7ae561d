mod exec;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, error, info};
use std::path::PathBuf;
use std::process;
use xenv::blob::encode_file;
use xenv::{DecoderConfig, EnvBlobDecoder, EnvStore, ProcessEnv, DEFAULT_SOURCE_KEY};

/// Decode base64 environment blobs into the environment, then run a command
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Decode only this key and fail if it is missing or invalid. Takes
    /// precedence over --pattern
    #[arg(long, value_name = "KEY")]
    key: Option<String>,

    /// Decode every key containing this substring
    #[arg(long, value_name = "PATTERN", env = "XENV_PATTERN", default_value = DEFAULT_SOURCE_KEY)]
    pattern: String,

    /// Load a .env file, or a directory of layered .env files, before decoding
    #[arg(long = "dotenv", value_name = "PATH")]
    dotenv_paths: Vec<PathBuf>,

    /// Set KEY=VALUE after decoding, overriding decoded values
    #[arg(long = "env", value_name = "KEY=VALUE")]
    env_vars: Vec<String>,

    /// Print the base64 encoding of FILE and exit
    #[arg(long, value_name = "FILE")]
    encode: Option<PathBuf>,

    /// Command to run and its arguments. Without one, decoded variables are printed
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.to_filter())
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("CLI arguments: {:?}", cli);

    if let Some(path) = &cli.encode {
        let encoded = encode_file(path).context("Failed to encode env file")?;
        println!("{}", encoded);
        return Ok(());
    }

    let mut store = ProcessEnv;

    for path in &cli.dotenv_paths {
        if let Err(err) = xenv::dotenv::load_into(&mut store, path) {
            error!("Failed to load env file: {}", err);
            process::exit(1);
        }
    }

    let decoder = EnvBlobDecoder::new(DecoderConfig {
        pattern: cli.pattern.clone(),
    });
    let report = match decoder.decode_and_populate(&mut store, cli.key.as_deref()) {
        Ok(report) => report,
        Err(err) => {
            error!("Error setting up environment: {}", err);
            process::exit(1);
        }
    };

    let overrides = utils::parse_overrides(&cli.env_vars)?;
    for pair in &overrides {
        debug!("Overriding {}", pair.key);
        store.set(&pair.key, &pair.value);
    }

    if cli.command.is_empty() {
        let mut applied = report.applied;
        applied.extend(overrides);
        for line in utils::render(&applied) {
            println!("{}", line);
        }
        return Ok(());
    }

    let command = &cli.command[0];
    let args = cli.command[1..].to_vec();
    info!("Command: {}, args: {:?}", command, args);

    let binary_path = exec::resolve(command)?;

    // Replaces the current process on success
    if let Err(err) = exec::run(&binary_path, &args, &utils::environment_entries()) {
        error!("Failed to execute command: {}", err);
        process::exit(1);
    }

    Ok(())
}
