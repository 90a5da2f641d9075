//! Structured logging for the rollgraph CLI.
//!
//! A single global `tracing` subscriber writes to `stderr`, leaving the
//! output file as the only data sink. `ROLLGRAPH_LOG_FORMAT` selects human or
//! JSON rendering and `RUST_LOG` the filter. Records from the `log` facade are
//! bridged into the same subscriber.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting the log rendering.
pub const LOG_FORMAT_ENV: &str = "ROLLGRAPH_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

static INSTALLED: OnceLock<Installation> = OnceLock::new();

/// Errors raised while configuring structured logging.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying lookup failure.
        #[source]
        source: env::VarError,
    },
    /// Unsupported value in `ROLLGRAPH_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
}

/// Rendering used for log lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Compact text for terminals.
    #[default]
    Human,
    /// One JSON object per line, with the active span list.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

impl LogFormat {
    /// Reads the format from [`LOG_FORMAT_ENV`], defaulting to
    /// [`LogFormat::Human`] when unset.
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the variable is not valid UTF-8 or names
    /// an unknown format.
    pub fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Result of the first call to [`init_logging`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Installation {
    /// This process now routes `tracing` through the rollgraph subscriber.
    Installed(LogFormat),
    /// Another global subscriber was already in place and was kept.
    Preexisting,
}

/// Installs the global subscriber once and reports what happened.
///
/// Later calls return the outcome of the first successful call without
/// touching the environment again.
///
/// # Errors
/// Returns [`LoggingError`] when [`LOG_FORMAT_ENV`] is invalid. Nothing is
/// installed in that case, so a corrected retry is possible.
pub fn init_logging() -> Result<Installation, LoggingError> {
    if let Some(installation) = INSTALLED.get() {
        return Ok(*installation);
    }
    let format = LogFormat::from_env()?;
    Ok(*INSTALLED.get_or_init(|| install(format)))
}

fn install(format: LogFormat) -> Installation {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let fmt_layer = match format {
        LogFormat::Human => fmt_layer.boxed(),
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // A logger already owning the `log` slot is left in place.
    let _ = LogTracer::init();

    match tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
    {
        Ok(()) => Installation::Installed(format),
        Err(_) => Installation::Preexisting,
    }
}
