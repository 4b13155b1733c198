//! Structured logging setup.
//!
//! Initialization and configuration for structured logging on the `tracing`
//! ecosystem: pretty console output by default, optional JSON output for
//! build-server logs, and environment-based filtering via `RUST_LOG`.
//! Initialization is guarded and runs at most once per process.
//!
//! # Example
//!
//! ```no_run
//! use auditbox::util::logging;
//!
//! logging::init_from_env();
//!
//! tracing::info!("harness ready");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Controls how the logging system behaves.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display.
    pub level: Level,

    /// Use JSON output instead of pretty console formatting.
    pub use_json: bool,

    /// Include the module target (e.g. `auditbox::scan`) in log lines.
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string, falling back to INFO.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initializes the global tracing subscriber with the given configuration.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string().to_lowercase()));

        if config.use_json {
            let layer = fmt::layer().json().with_target(config.include_target);
            tracing_subscriber::registry().with(filter).with(layer).init();
        } else {
            let layer = fmt::layer().with_target(config.include_target);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    });
}

/// Initializes logging from `AUDITBOX_LOG_LEVEL` / `AUDITBOX_LOG_JSON`,
/// with `RUST_LOG` taking precedence for filtering when set.
pub fn init_from_env() {
    let level = env::var("AUDITBOX_LOG_LEVEL")
        .map(|v| parse_level(&v))
        .unwrap_or(Level::INFO);
    let use_json = env::var("AUDITBOX_LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        ..Default::default()
    });
}

/// Initializes logging with defaults (INFO, pretty console output).
pub fn init_default() {
    init_logging(LoggingConfig::default());
}
