//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! ApiClient::call(endpoint, options)
//!     → client.rs (https check, RequestDescriptor, mandatory headers)
//!     → request.rs (X-Request-Id, tracing span)
//!     → signing::RequestSigner (Authorization, x-amz-*)
//!     → transport.rs (reqwest, under tokio timeout)
//!     → security::headers (advisory nosniff check)
//!     → ApiResponse to caller
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod transport;

pub use client::{ApiClient, CallOptions, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ApiError, CONNECTION_FAILED_MESSAGE};
pub use request::X_REQUEST_ID;
pub use transport::{ApiResponse, ReqwestTransport, Transport};
