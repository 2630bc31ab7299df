//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events to stderr)
//!     → metrics.rs (counters through the `metrics` facade)
//!
//! Consumers:
//!     → the CLI's fmt subscriber
//!     → any metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (endpoint, request id, outcome)
//! - Request id flows from the API client into its span
//! - No recorder is installed here; without one, metric calls are no-ops

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
