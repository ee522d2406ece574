//! Minimal ABI word codec for the handful of read calls this workspace makes.
//!
//! Every argument and return value used here is a single static 32-byte word,
//! so calldata is `selector ++ word*` and return data is one word.

use bytes::{BufMut, Bytes, BytesMut};

use crate::address::Address;
use crate::error::RemoteReadError;
use crate::selector::Selector;

/// Size of one ABI word.
pub const WORD_LEN: usize = 32;

/// One 32-byte ABI word.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Word(pub [u8; WORD_LEN]);

impl Word {
    /// Addresses are right-aligned.
    pub fn from_address(address: Address) -> Self {
        let mut word = [0u8; WORD_LEN];
        word[WORD_LEN - Address::LEN..].copy_from_slice(address.as_bytes());
        Word(word)
    }

    /// `bytes4` is left-aligned.
    pub fn from_selector(selector: Selector) -> Self {
        let mut word = [0u8; WORD_LEN];
        word[..4].copy_from_slice(selector.as_bytes());
        Word(word)
    }

    pub fn from_bytes32(raw: [u8; WORD_LEN]) -> Self {
        Word(raw)
    }
}

/// Encode calldata for `selector(args...)`.
pub fn encode_call(selector: Selector, args: &[Word]) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + args.len() * WORD_LEN);
    buf.put_slice(selector.as_bytes());
    for arg in args {
        buf.put_slice(&arg.0);
    }
    buf.freeze()
}

fn first_word(data: &[u8]) -> Result<&[u8], RemoteReadError> {
    if data.len() < WORD_LEN {
        return Err(RemoteReadError::Decode(format!(
            "expected at least {} bytes, got {}",
            WORD_LEN,
            data.len()
        )));
    }
    Ok(&data[..WORD_LEN])
}

/// Decode a returned `address`.
pub fn decode_address(data: &[u8]) -> Result<Address, RemoteReadError> {
    let word = first_word(data)?;
    let (padding, body) = word.split_at(WORD_LEN - Address::LEN);
    if padding.iter().any(|b| *b != 0) {
        return Err(RemoteReadError::Decode(
            "address word has non-zero padding".to_string(),
        ));
    }
    Address::from_slice(body).map_err(|e| RemoteReadError::Decode(e.to_string()))
}

/// Decode a returned `bool`. Anything other than 0 or 1 is rejected.
pub fn decode_bool(data: &[u8]) -> Result<bool, RemoteReadError> {
    let word = first_word(data)?;
    let (padding, last) = word.split_at(WORD_LEN - 1);
    if padding.iter().any(|b| *b != 0) {
        return Err(RemoteReadError::Decode("bool word out of range".to_string()));
    }
    match last[0] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RemoteReadError::Decode(format!("bool word has value {}", other))),
    }
}
