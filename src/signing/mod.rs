//! Request signing subsystem.
//!
//! # Data Flow
//! ```text
//! RequestDescriptor (unsigned, built per call)
//!     → RequestSigner::sign
//!         → CredentialsProvider::credentials (cached / refreshed by provider)
//!         → sigv4.rs (canonical request, string to sign, HMAC chain)
//!     → SignedRequest (immutable, never reused)
//! ```
//!
//! # Design Decisions
//! - Signing sits behind a narrow trait so the API client never sees the algorithm
//! - A `SignedRequest` cannot be built without an `Authorization` header
//! - Providers own credential caching; the signer never stores secrets

pub mod cognito;
pub mod credentials;
pub mod sigv4;
pub mod types;

pub use cognito::CognitoCredentialsProvider;
pub use credentials::{Credentials, CredentialsProvider, StaticCredentialsProvider};
pub use sigv4::{RequestSigner, SigV4Signer};
pub use types::{RequestDescriptor, SignedRequest, SigningError, SigningResult};
