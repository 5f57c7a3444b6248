//! Logging setup for component-resolver
//!
//! The container emits `tracing` events under the `component_resolver`
//! target when the `logging` feature is on. This module installs a
//! `tracing-subscriber` to print them.
//!
//! # Features
//!
//! - `logging` - Emit resolver events (default)
//! - `logging-json` - JSON subscriber output
//! - `logging-pretty` - Multi-line human readable subscriber output
//!
//! Without either subscriber feature the `init*` functions do nothing.
//!
//! # Example
//!
//! ```rust,ignore
//! use component_resolver::logging;
//!
//! logging::init();
//!
//! // Or configure explicitly
//! logging::builder()
//!     .trace()
//!     .resolver_only()
//!     .compact()
//!     .init();
//! ```
//!
//! `RUST_LOG` takes precedence over the configured level and target when it
//! is set.

use tracing::Level;

/// Target used by every event the container emits
pub const TARGET: &str = "component_resolver";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Multi-line, colored
    Pretty,
    /// Single line per event
    Compact,
}

/// Builder for the global subscriber
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
    with_file: bool,
    with_line_number: bool,
    with_thread_ids: bool,
    with_thread_names: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Json,
            target: None,
            with_file: false,
            with_line_number: false,
            with_thread_ids: false,
            with_thread_names: false,
        }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Show resolver internals, including cache hits and constructor calls
    pub fn trace(self) -> Self {
        self.with_level(Level::TRACE)
    }

    /// Show registrations, bindings, constructions and failures
    pub fn debug(self) -> Self {
        self.with_level(Level::DEBUG)
    }

    pub fn info(self) -> Self {
        self.with_level(Level::INFO)
    }

    pub fn warn(self) -> Self {
        self.with_level(Level::WARN)
    }

    /// Only show events from `target`
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show container events
    pub fn resolver_only(self) -> Self {
        self.with_target_filter(TARGET)
    }

    pub fn with_file(mut self) -> Self {
        self.with_file = true;
        self
    }

    pub fn with_line_number(mut self) -> Self {
        self.with_line_number = true;
        self
    }

    pub fn with_thread_ids(mut self) -> Self {
        self.with_thread_ids = true;
        self
    }

    pub fn with_thread_names(mut self) -> Self {
        self.with_thread_names = true;
        self
    }

    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    pub fn compact(mut self) -> Self {
        self.format = LogFormat::Compact;
        self
    }

    /// Filter directive built from the configured level and target
    pub fn directive(&self) -> String {
        match self.target {
            Some(target) => format!("{target}={}", self.level),
            None => self.level.to_string(),
        }
    }

    /// Install the subscriber globally.
    ///
    /// Returns `false` if another global subscriber was already installed.
    /// Without the `logging-json` feature, JSON output falls back to the
    /// default line format.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) -> bool {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()));

        macro_rules! install {
            ($layer:expr) => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        $layer
                            .with_file(self.with_file)
                            .with_line_number(self.with_line_number)
                            .with_thread_ids(self.with_thread_ids)
                            .with_thread_names(self.with_thread_names)
                            .with_target(true),
                    )
                    .try_init()
                    .is_ok()
            };
        }

        match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => install!(fmt::layer().json()),
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => install!(fmt::layer()),
            LogFormat::Pretty => install!(fmt::layer().pretty()),
            LogFormat::Compact => install!(fmt::layer().compact()),
        }
    }

    /// No subscriber feature enabled; nothing is installed
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) -> bool {
        false
    }
}

/// Create a new logging builder
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Install a debug-level subscriber.
///
/// JSON when `logging-json` is enabled, pretty otherwise.
pub fn init() -> bool {
    if cfg!(feature = "logging-json") {
        init_json()
    } else {
        init_pretty()
    }
}

/// Install a debug-level JSON subscriber
///
/// ```json
/// {"timestamp":"2026-01-01T00:00:00.000Z","level":"DEBUG","fields":{"message":"Constructing component","class":"Mailer","depth":0,"parameters":1},"target":"component_resolver"}
/// ```
pub fn init_json() -> bool {
    builder().json().debug().init()
}

/// Install a debug-level pretty subscriber
///
/// ```text
///   2026-01-01T00:00:00.000Z DEBUG component_resolver: Constructing component, class: Mailer, depth: 0, parameters: 1
/// ```
pub fn init_pretty() -> bool {
    builder().pretty().debug().init()
}

/// Install a debug-level subscriber that drops events from other crates
pub fn init_resolver_only() -> bool {
    builder().resolver_only().debug().init()
}
