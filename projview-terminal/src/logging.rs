/// Logging setup.
///
/// The viewer owns the terminal, so log records go to a file when one is
/// configured. Without a file, logging stays off unless a filter is given
/// explicitly (then it goes to stderr).
use std::fs::File;
use std::path::PathBuf;
use std::sync::Once;

use crate::error::{Error, Result};

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "projview_terminal=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub log_file: Option<PathBuf>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            log_file: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Fails only if the log file cannot be created.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let file = match &config.log_file {
        Some(path) => Some(
            File::create(path)
                .map_err(|e| Error::Logging(format!("cannot create {}: {}", path.display(), e)))?,
        ),
        None => None,
    };

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = config
            .env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok());
        match (&filter, &file) {
            (Some(filter), _) => {
                builder.parse_filters(filter);
            }
            (None, Some(_)) => {
                builder.filter_level(log::LevelFilter::Warn);
            }
            (None, None) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }

        match file {
            Some(file) => {
                builder
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .write_style(env_logger::WriteStyle::Never);
            }
            None => {
                builder.write_style(config.write_style);
            }
        }

        // Another logger may already be installed (tests, embedding apps)
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
    Ok(())
}
