//! Connection contexts.
//!
//! A `ConnectionContext` is an immutable snapshot of how to reach the chain: a
//! read endpoint plus an optional write identity. Changing either produces a
//! new snapshot with a higher `ContextId`; nothing is mutated in place, so
//! anything derived from an older snapshot can be recognized as stale by
//! comparing ids.
//!
//! Ids are minted from a process-wide counter. Two distinct snapshots never
//! share an id, however they were built.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::watch;
use tracing::debug;

use crate::address::Address;
use crate::error::RemoteReadError;

/// A read-only call against a remote service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRequest {
    /// Target service.
    pub to: Address,
    /// Encoded calldata.
    pub data: Bytes,
    /// Caller identity, set when a write identity is attached.
    pub from: Option<Address>,
}

/// Transport used for read calls.
///
/// Implementations must not mutate remote state.
#[async_trait]
pub trait ReadEndpoint: Send + Sync + 'static {
    /// Execute a read call and return the raw return data.
    async fn call(&self, request: CallRequest) -> Result<Bytes, RemoteReadError>;

    /// Short human-readable description (for logging).
    fn describe(&self) -> String;
}

/// Authenticated identity able to sign writes.
///
/// Signing lives outside this workspace; reads only need the account address.
pub trait WriteIdentity: Send + Sync + 'static {
    fn address(&self) -> Address;
}

/// Identity known only by its account address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressIdentity(pub Address);

impl WriteIdentity for AddressIdentity {
    fn address(&self) -> Address {
        self.0
    }
}

/// Generation number of a context snapshot. Larger is newer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct ContextId(pub u64);

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ContextId {
    /// A fresh generation, newer than every id minted before it.
    pub fn mint() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// Snapshot of (read endpoint, optional write identity).
#[derive(Clone)]
pub struct ConnectionContext {
    id: ContextId,
    endpoint: Arc<dyn ReadEndpoint>,
    identity: Option<Arc<dyn WriteIdentity>>,
}

impl ConnectionContext {
    /// A read-only context with a freshly minted id.
    pub fn new(endpoint: Arc<dyn ReadEndpoint>) -> Self {
        Self {
            id: ContextId::mint(),
            endpoint,
            identity: None,
        }
    }

    /// New snapshot with `identity` attached.
    pub fn with_identity(self, identity: Arc<dyn WriteIdentity>) -> Self {
        Self {
            id: ContextId::mint(),
            endpoint: self.endpoint,
            identity: Some(identity),
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn endpoint(&self) -> &Arc<dyn ReadEndpoint> {
        &self.endpoint
    }

    pub fn identity(&self) -> Option<&Arc<dyn WriteIdentity>> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// New snapshot on the same endpoint with the identity stripped.
    pub fn read_only(&self) -> Self {
        Self {
            id: ContextId::mint(),
            endpoint: Arc::clone(&self.endpoint),
            identity: None,
        }
    }

    /// Issue a read call through this context's endpoint.
    ///
    /// When an identity is attached the call is made on its behalf.
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RemoteReadError> {
        let request = CallRequest {
            to,
            data,
            from: self.identity.as_ref().map(|identity| identity.address()),
        };
        self.endpoint.call(request).await
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint.describe())
            .field("identity", &self.identity.as_ref().map(|i| i.address()))
            .finish()
    }
}

/// Publisher of context snapshots.
///
/// Every mutation publishes a new snapshot with a freshly minted `ContextId`.
/// Subscribers observe the latest snapshot through a `watch` channel.
pub struct ContextSource {
    tx: watch::Sender<ConnectionContext>,
}

impl ContextSource {
    /// Start publishing from a read-only context on `endpoint`.
    pub fn new(endpoint: Arc<dyn ReadEndpoint>) -> Self {
        let initial = ConnectionContext::new(endpoint);
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionContext> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> ConnectionContext {
        self.tx.borrow().clone()
    }

    pub fn attach_identity(&self, identity: Arc<dyn WriteIdentity>) -> ContextId {
        self.publish(|prev| ConnectionContext {
            id: prev.id,
            endpoint: Arc::clone(&prev.endpoint),
            identity: Some(identity),
        })
    }

    pub fn detach_identity(&self) -> ContextId {
        self.publish(|prev| prev.read_only())
    }

    pub fn replace_endpoint(&self, endpoint: Arc<dyn ReadEndpoint>) -> ContextId {
        self.publish(|prev| ConnectionContext {
            id: prev.id,
            endpoint,
            identity: prev.identity.clone(),
        })
    }

    fn publish(&self, derive: impl FnOnce(&ConnectionContext) -> ConnectionContext) -> ContextId {
        let mut next_id = ContextId::default();
        self.tx.send_modify(|current| {
            let mut next = derive(current);
            next.id = ContextId::mint();
            next_id = next.id;
            *current = next;
        });
        debug!(context = %next_id, "published connection context");
        next_id
    }
}
