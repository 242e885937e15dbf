//! Boundary between user-entered text and engine parameters.
//!
//! The engine takes a `u64` key and a `u32` frame. How eight key bytes
//! become that `u64` is a front-end convention, so it is an explicit
//! [`KeyByteOrder`] here rather than something baked into the engine.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::A51Error;
use crate::hex_codec::HexCodec;

pub const KEY_BYTES: usize = 8;
pub const KEY_HEX_DIGITS: usize = KEY_BYTES * 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyByteOrder {
    /// Byte 0 occupies bits 0-7 of the key value.
    #[default]
    LittleEndian,
    /// Byte 0 occupies bits 56-63 of the key value.
    BigEndian,
}

pub fn pack_key(bytes: &[u8; KEY_BYTES], order: KeyByteOrder) -> u64 {
    match order {
        KeyByteOrder::LittleEndian => u64::from_le_bytes(*bytes),
        KeyByteOrder::BigEndian => u64::from_be_bytes(*bytes),
    }
}

/// Parses key material written as hex. Whitespace is ignored; the first 16
/// digits are used and anything after them is dropped.
pub fn parse_key_hex(text: &str, order: KeyByteOrder) -> Result<u64, A51Error> {
    let digits = Zeroizing::new(
        text.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>(),
    );
    let found = digits.chars().count();
    if found < KEY_HEX_DIGITS {
        return Err(A51Error::KeyTooShort {
            required: KEY_HEX_DIGITS,
            found,
        });
    }
    let head: Zeroizing<String> = Zeroizing::new(digits.chars().take(KEY_HEX_DIGITS).collect());
    let decoded = Zeroizing::new(HexCodec::decode(&head)?);
    let mut bytes = Zeroizing::new([0u8; KEY_BYTES]);
    bytes.copy_from_slice(&decoded);
    Ok(pack_key(&bytes, order))
}

/// Parses a decimal frame number. Values wider than 22 bits are accepted
/// and truncated by the engine.
pub fn parse_frame(text: &str) -> Result<u32, A51Error> {
    let trimmed = text.trim();
    trimmed.parse::<u32>().map_err(|err| A51Error::InvalidFrame {
        input: trimmed.to_string(),
        reason: err.to_string(),
    })
}
