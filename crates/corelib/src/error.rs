//! Error types for the core library.
//!
//! Errors carry owned strings rather than source errors so they stay `Clone`
//! and can be stored inside observable cells.

use std::time::Duration;

use thiserror::Error;

use crate::address::Address;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bad static configuration; fatal.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A remote read failed; the caller decides whether to retry.
    #[error(transparent)]
    RemoteRead(#[from] RemoteReadError),
}

/// Invalid textual address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// Static configuration is missing or malformed.
///
/// Indicates a deployment defect. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("missing required configuration value `{key}`")]
    Missing { key: &'static str },
    #[error("malformed address in `{key}` ({value}): {source}")]
    MalformedAddress {
        key: &'static str,
        value: String,
        #[source]
        source: AddressError,
    },
    #[error("`{key}` must not be the zero address")]
    ZeroAddress { key: &'static str },
    #[error("malformed endpoint `{value}`: {reason}")]
    MalformedEndpoint { value: String, reason: String },
    #[error("invalid integer in `{key}`: {value}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

/// A read against a remote service failed.
///
/// Recoverable; surfaced to the caller, who owns retry and backoff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteReadError {
    /// The transport could not complete the request.
    #[error("transport error: {0}")]
    Transport(String),
    /// The node answered with a JSON-RPC error object (reverts land here).
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The call returned data that does not decode as the expected type.
    #[error("cannot decode return data: {0}")]
    Decode(String),
    /// The call did not complete in time.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    /// The remote returned the zero sentinel where a handle address was required.
    #[error("`{operation}` on {contract} returned the zero address")]
    UnsetAddress {
        operation: &'static str,
        contract: Address,
    },
}
