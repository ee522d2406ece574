//! Interface selectors.
//!
//! A selector is the first four bytes of the Keccak-256 digest of a canonical
//! function signature such as `supportsInterface(bytes4)`. Computing one never
//! touches the network and gives the same value in every process.

use std::fmt;

use sha3::{Digest, Keccak256};

/// Fixed-width fingerprint of a remote operation signature.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// `supportsInterface(bytes4)`, the interface-support probe itself.
    pub const SUPPORTS_INTERFACE: Selector = Selector([0x01, 0xff, 0xc9, 0xa7]);

    /// Derive the selector for a canonical signature.
    ///
    /// The signature must already be canonical: no spaces, no parameter
    /// names, full type names (`uint256`, not `uint`).
    pub fn from_signature(signature: &str) -> Self {
        let digest = Keccak256::digest(signature.as_bytes());
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest[..4]);
        Selector(out)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({})", self)
    }
}
