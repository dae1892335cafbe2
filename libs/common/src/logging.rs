//! Logging bootstrap shared by the ESS services
//!
//! Console output uses a compact `timestamp [LEVEL] message` layout; an optional
//! daily-rolling file sink can be written either in the same layout or as JSON.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{
        self,
        format::{FmtSpan, Writer},
        FmtContext, FormatEvent, FormatFields,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::{Error, Result};

/// Custom format for log level with brackets: `[INFO]`, `[WARN]`, etc.
fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Custom event formatter that outputs: `timestamp [LEVEL] message`
///
/// Example output: `2026-03-02T00:50:44.809112Z [INFO] Poller ess-link-1 started`
struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m", // magenta
                Level::DEBUG => "\x1b[34m", // blue
                Level::INFO => "\x1b[32m",  // green
                Level::WARN => "\x1b[33m",  // yellow
                Level::ERROR => "\x1b[31m", // red
            };
            write!(writer, "{}{}\x1b[0m ", color, format_level(&level))?;
        } else {
            write!(writer, "{} ", format_level(&level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

// Keeps the non-blocking file writer alive for the process lifetime
static GUARDS: OnceLock<Mutex<Vec<WorkerGuard>>> = OnceLock::new();

fn default_service_name() -> String {
    "essrv".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging configuration, embeddable in a service config file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LogConfig {
    /// Service name, used as the log file prefix
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Filter directive used when `RUST_LOG` is not set (e.g. "info,essrv=debug")
    #[serde(default = "default_level")]
    pub level: String,
    /// Directory for the rolling file sink
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Enable the daily rolling file sink
    #[serde(default)]
    pub file: bool,
    /// Write the file sink as JSON lines
    #[serde(default)]
    pub json: bool,
    /// Colourize console output
    #[serde(default = "default_true")]
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            level: default_level(),
            dir: None,
            file: false,
            json: false,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Directory used by the file sink
    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("logs"))
    }
}

/// Build the env filter, honouring `RUST_LOG` first
fn build_filter(level: &str) -> Result<EnvFilter> {
    match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => Ok(EnvFilter::new(directives)),
        _ => EnvFilter::try_new(level)
            .map_err(|e| Error::Logging(format!("invalid log level '{}': {}", level, e))),
    }
}

/// Initialize the global subscriber from a [`LogConfig`]
///
/// Fails if a global subscriber is already installed.
pub fn init_with_config(config: &LogConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;

    let console_layer = fmt::layer()
        .with_ansi(config.ansi)
        .event_format(BracketedLevelFormat)
        .boxed();

    let file_layer = if config.file {
        let dir = config.log_dir();
        fs::create_dir_all(&dir)?;

        let appender =
            tracing_appender::rolling::daily(&dir, format!("{}.log", config.service_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        let guards = GUARDS.get_or_init(|| Mutex::new(Vec::new()));
        match guards.lock() {
            Ok(mut guards) => guards.push(guard),
            Err(poisoned) => poisoned.into_inner().push(guard),
        }

        let layer = if config.json {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_level(true)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .event_format(BracketedLevelFormat)
                .boxed()
        };
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    if config.file {
        tracing::info!("Logging: {} @ {:?}", config.service_name, config.log_dir());
    }

    Ok(())
}

/// Console-only logging at the given level
pub fn init(level: &str) -> Result<()> {
    let config = LogConfig {
        level: level.to_string(),
        ..LogConfig::default()
    };
    init_with_config(&config)
}
