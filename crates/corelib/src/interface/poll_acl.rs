//! Poll access control.

use crate::abi::Word;
use crate::address::Address;
use crate::error::RemoteReadError;
use crate::handle::ServiceHandle;
use crate::interface::Interface;
use crate::selector::Selector;

/// Access-control contract consulted for poll operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollAcl;

impl Interface for PollAcl {
    const NAME: &'static str = "PollAcl";
}

impl PollAcl {
    pub const CAN_CREATE_POLL: &'static str = "canCreatePoll(address,address)";
}

impl ServiceHandle<PollAcl> {
    pub async fn can_create_poll(
        &self,
        dao: Address,
        user: Address,
    ) -> Result<bool, RemoteReadError> {
        self.read_bool(
            Selector::from_signature(PollAcl::CAN_CREATE_POLL),
            &[Word::from_address(dao), Word::from_address(user)],
        )
        .await
    }
}
