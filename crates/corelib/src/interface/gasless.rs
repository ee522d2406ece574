//! Gasless (delegated) voting.

use crate::abi::Word;
use crate::error::RemoteReadError;
use crate::handle::ServiceHandle;
use crate::interface::Interface;
use crate::selector::Selector;

/// Optional delegated-execution capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaslessVoting;

impl Interface for GaslessVoting {
    const NAME: &'static str = "GaslessVoting";
}

impl GaslessVoting {
    /// Operation a conforming provider must declare support for.
    ///
    /// Parameter list of `makeVoteTransaction` in the `GaslessVoting` contract
    /// of `@oasisprotocol/demo-voting-backend`, whose ABI the web front-end
    /// derives the selector from. It is not checked against a deployed
    /// contract; set `CAPABILITY_SIGNATURE` when the deployment differs.
    pub const MAKE_VOTE_TRANSACTION: &'static str =
        "makeVoteTransaction(address,bytes32,uint256)";
}

impl ServiceHandle<GaslessVoting> {
    /// ERC-165 style `supportsInterface(bytes4)`.
    pub async fn supports_interface(&self, selector: Selector) -> Result<bool, RemoteReadError> {
        self.read_bool(Selector::SUPPORTS_INTERFACE, &[Word::from_selector(selector)])
            .await
    }
}
