//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick the log level from `RUST_LOG`, then config, then the debug flag
//!
//! # Design Decisions
//! - Events go to stderr so command output on stdout stays machine-readable
//! - `RUST_LOG` always wins over configuration

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(config: &ObservabilityConfig, debug_mode: bool) -> String {
    let level = if debug_mode { "debug" } else { config.log_level.as_str() };
    format!("project_portal={},warn", level)
}

/// Install the global subscriber.
pub fn init_logging(
    config: &ObservabilityConfig,
    debug_mode: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(config, debug_mode).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let config = ObservabilityConfig::default();
        assert_eq!(default_directive(&config, false), "project_portal=info,warn");
        assert_eq!(default_directive(&config, true), "project_portal=debug,warn");
    }
}
