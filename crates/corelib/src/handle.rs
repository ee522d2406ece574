//! Typed service handles and the factory that binds them.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use bytes::Bytes;

use crate::abi::{self, Word};
use crate::address::Address;
use crate::context::ConnectionContext;
use crate::error::RemoteReadError;
use crate::interface::Interface;
use crate::selector::Selector;

/// A typed binding of an address and a connection context.
///
/// Holds no per-call state: two handles with the same address and context
/// behave identically. Cloning is cheap.
pub struct ServiceHandle<I: Interface> {
    address: Address,
    context: ConnectionContext,
    _interface: PhantomData<fn() -> I>,
}

impl<I: Interface> ServiceHandle<I> {
    /// Address this handle is bound to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Context this handle is bound to.
    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    /// Issue a raw read call against the bound address.
    pub async fn call_raw(&self, data: Bytes) -> Result<Bytes, RemoteReadError> {
        self.context.call(self.address, data).await
    }

    pub(crate) async fn read_address(
        &self,
        selector: Selector,
        args: &[Word],
    ) -> Result<Address, RemoteReadError> {
        let out = self.call_raw(abi::encode_call(selector, args)).await?;
        abi::decode_address(&out)
    }

    pub(crate) async fn read_bool(
        &self,
        selector: Selector,
        args: &[Word],
    ) -> Result<bool, RemoteReadError> {
        let out = self.call_raw(abi::encode_call(selector, args)).await?;
        abi::decode_bool(&out)
    }
}

impl<I: Interface> Clone for ServiceHandle<I> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            context: self.context.clone(),
            _interface: PhantomData,
        }
    }
}

impl<I: Interface> PartialEq for ServiceHandle<I> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.context.id() == other.context.id()
            && self.context.identity().map(|i| i.address())
                == other.context.identity().map(|i| i.address())
    }
}

impl<I: Interface> Eq for ServiceHandle<I> {}

impl<I: Interface> Debug for ServiceHandle<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("interface", &I::NAME)
            .field("address", &self.address)
            .field("context", &self.context.id())
            .finish()
    }
}

/// Binds addresses to contexts.
///
/// Pure and synchronous; binding never observes whether anything lives at
/// the address.
#[derive(Clone, Copy, Debug, Default)]
pub struct HandleFactory;

impl HandleFactory {
    pub fn bind<I: Interface>(address: Address, context: &ConnectionContext) -> ServiceHandle<I> {
        ServiceHandle {
            address,
            context: context.clone(),
            _interface: PhantomData,
        }
    }
}
