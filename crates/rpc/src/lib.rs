//! JSON-RPC read transport.
//!
//! This crate provides the HTTP implementation of `corelib::ReadEndpoint`:
//! - JSON-RPC 2.0 envelopes for `eth_call`
//! - Hex encoding of call objects and return data
//! - Mapping of transport and node errors onto `RemoteReadError`

pub mod endpoint;
pub mod protocol;

pub use endpoint::{HttpEndpoint, DEFAULT_REQUEST_TIMEOUT};
pub use protocol::{CallObject, RpcErrorObject, RpcRequest, RpcResponse};
