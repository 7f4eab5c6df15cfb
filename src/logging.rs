//! Tracing subscriber setup.
//!
//! The filter comes from `TODO_KEEPER_LOG` (any `EnvFilter` directive),
//! defaulting to `todo_keeper=info,warn`, or `todo_keeper=debug,info` when
//! `DEBUG` is set. `TODO_KEEPER_LOG_FORMAT=json` switches to JSON lines.
//! Output goes to stderr so command output on stdout stays clean.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TODO_KEEPER_LOG";

/// Environment variable selecting `compact` or `json` output.
pub const LOG_FORMAT_ENV: &str = "TODO_KEEPER_LOG_FORMAT";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single lines.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything but `json` is compact.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// The default filter directive for the given debug setting.
#[must_use]
pub const fn default_directive(debug: bool) -> &'static str {
    if debug {
        "todo_keeper=debug,info"
    } else {
        "todo_keeper=info,warn"
    }
}

/// Install the global subscriber from the environment.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(std::env::var("DEBUG").is_ok())));
    let format =
        std::env::var(LOG_FORMAT_ENV).map(|f| LogFormat::from_name(&f)).unwrap_or_default();

    let registry = tracing_subscriber::registry().with(filter);

    // try_init fails only when a subscriber is already installed
    let _ = match format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_ansi(false).with_writer(std::io::stderr);
            registry.with(layer).try_init()
        }
        LogFormat::Compact => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).try_init()
        }
    };
}
