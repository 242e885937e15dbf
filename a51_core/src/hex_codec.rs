//! Hex text <-> bytes conversion used by front ends and vectors.

use hex::FromHexError;

use crate::error::A51Error;

pub struct HexCodec;

impl HexCodec {
    /// Two uppercase digits per byte, no separators.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        hex::encode_upper(bytes)
    }

    /// Ignores whitespace and left-pads an odd digit count with a single
    /// `0`, so `"ABC"` decodes as `[0x0A, 0xBC]`. Both digit cases are
    /// accepted.
    pub fn decode(text: &str) -> Result<Vec<u8>, A51Error> {
        let mut digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() % 2 != 0 {
            digits.insert(0, '0');
        }
        hex::decode(&digits).map_err(|err| match err {
            FromHexError::InvalidHexCharacter { c, index } => A51Error::InvalidHexCharacter {
                character: c,
                index,
            },
            other => A51Error::MalformedHex(other.to_string()),
        })
    }
}
