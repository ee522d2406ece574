//! Scripted in-memory read endpoint shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use corelib::abi::Word;
use corelib::{Address, CallRequest, ReadEndpoint, RemoteReadError, Selector};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub const ROOT: Address = Address([0x01; 20]);
pub const ACL: Address = Address([0xaa; 20]);
pub const SUPPORTED: Address = Address([0xbb; 20]);
pub const UNSUPPORTED: Address = Address([0xcc; 20]);

/// One scripted reply.
#[derive(Clone)]
pub enum Reply {
    Address(Address),
    Bool(bool),
    Raw(Vec<u8>),
    Error(RemoteReadError),
    /// Never answers.
    Hang,
    /// Waits for the gate to open, then answers with the inner reply.
    Gated(Arc<Notify>, Box<Reply>),
}

type Key = (Address, Selector);

/// Endpoint answering from a per-(target, selector) script.
///
/// Each key holds a queue of replies; the last one repeats once the queue is
/// down to a single entry. Unscripted calls fail with a transport error.
#[derive(Default)]
pub struct ScriptedEndpoint {
    script: Mutex<HashMap<Key, Vec<Reply>>>,
    calls: Mutex<Vec<CallRequest>>,
}

impl ScriptedEndpoint {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, to: Address, signature: &str, reply: Reply) -> &Self {
        self.script
            .lock()
            .entry((to, Selector::from_signature(signature)))
            .or_default()
            .push(reply);
        self
    }

    pub fn calls(&self) -> Vec<CallRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_to(&self, to: Address, signature: &str) -> usize {
        let selector = Selector::from_signature(signature);
        self.calls
            .lock()
            .iter()
            .filter(|c| c.to == to && c.data.len() >= 4 && c.data[..4] == selector.0)
            .count()
    }

    fn next_reply(&self, key: &Key) -> Option<Reply> {
        let mut script = self.script.lock();
        let queue = script.get_mut(key)?;
        if queue.len() > 1 {
            Some(queue.remove(0))
        } else {
            queue.first().cloned()
        }
    }
}

#[async_trait]
impl ReadEndpoint for ScriptedEndpoint {
    async fn call(&self, request: CallRequest) -> Result<Bytes, RemoteReadError> {
        self.calls.lock().push(request.clone());
        if request.data.len() < 4 {
            return Err(RemoteReadError::Transport("short calldata".into()));
        }
        let selector = Selector([
            request.data[0],
            request.data[1],
            request.data[2],
            request.data[3],
        ]);
        let reply = self
            .next_reply(&(request.to, selector))
            .ok_or_else(|| RemoteReadError::Transport(format!("unscripted call to {}", request.to)))?;
        answer(reply).await
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

async fn answer(mut reply: Reply) -> Result<Bytes, RemoteReadError> {
    while let Reply::Gated(gate, inner) = reply {
        gate.notified().await;
        reply = *inner;
    }
    match reply {
        Reply::Address(address) => Ok(Bytes::copy_from_slice(&Word::from_address(address).0)),
        Reply::Bool(value) => {
            let mut word = [0u8; 32];
            word[31] = value as u8;
            Ok(Bytes::copy_from_slice(&word))
        }
        Reply::Raw(data) => Ok(Bytes::from(data)),
        Reply::Error(error) => Err(error),
        Reply::Hang => std::future::pending().await,
        Reply::Gated(..) => unreachable!("gates are unwrapped above"),
    }
}
