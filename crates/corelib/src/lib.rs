//! Core library for governance handle resolution.
//!
//! This crate provides the fundamental abstractions the resolvers build on:
//! - Addresses and the zero sentinel
//! - Interface selectors and the ABI words used by read calls
//! - Connection contexts and their publisher
//! - Typed service handles and the factory that binds them
//! - Process configuration

pub mod abi;
pub mod address;
pub mod config;
pub mod context;
pub mod error;
pub mod handle;
pub mod interface;
pub mod selector;

pub use address::Address;
pub use config::GovernanceConfig;
pub use context::{
    AddressIdentity, CallRequest, ConnectionContext, ContextId, ContextSource, ReadEndpoint,
    WriteIdentity,
};
pub use error::{AddressError, ConfigurationError, Error, RemoteReadError, Result};
pub use handle::{HandleFactory, ServiceHandle};
pub use interface::{GaslessVoting, Governance, Interface, PollAcl};
pub use selector::Selector;
