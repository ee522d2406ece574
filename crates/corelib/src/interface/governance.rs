//! Governance root (the DAO contract).

use crate::address::Address;
use crate::error::RemoteReadError;
use crate::handle::ServiceHandle;
use crate::interface::Interface;
use crate::selector::Selector;

/// Root of the governance graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Governance;

impl Interface for Governance {
    const NAME: &'static str = "Governance";
}

impl Governance {
    pub const GET_ACL: &'static str = "getACL()";
    pub const PROXY_VOTER: &'static str = "proxyVoter()";
}

impl ServiceHandle<Governance> {
    /// Address of the poll access-control contract.
    pub async fn acl(&self) -> Result<Address, RemoteReadError> {
        self.read_address(Selector::from_signature(Governance::GET_ACL), &[])
            .await
    }

    /// Address of the delegated (gasless) voter; zero when none is configured.
    pub async fn proxy_voter(&self) -> Result<Address, RemoteReadError> {
        self.read_address(Selector::from_signature(Governance::PROXY_VOTER), &[])
            .await
    }
}
