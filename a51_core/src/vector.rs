//! Reproducible keystream records for interoperability checks.
//!
//! A vector pins the key text, key byte order and frame to the keystream
//! they produce. Front ends emit them as JSON; tests and `verify` replay
//! them against the engine.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::KeystreamEngine;
use crate::error::A51Error;
use crate::hex_codec::HexCodec;
use crate::key::{KeyByteOrder, parse_key_hex};
use crate::versioning::{KEYSTREAM_VECTOR_VERSION, expect_version};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeystreamVector {
    pub version: u16,
    pub key_hex: String,
    pub key_order: KeyByteOrder,
    pub frame: u32,
    pub keystream_hex: String,
}

impl<'de> Deserialize<'de> for KeystreamVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            version: u16,
            key_hex: String,
            #[serde(default)]
            key_order: KeyByteOrder,
            frame: u32,
            keystream_hex: String,
        }
        let helper = Helper::deserialize(deserializer)?;
        expect_version::<D::Error>(helper.version, KEYSTREAM_VECTOR_VERSION, "KeystreamVector")?;
        Ok(Self {
            version: helper.version,
            key_hex: helper.key_hex,
            key_order: helper.key_order,
            frame: helper.frame,
            keystream_hex: helper.keystream_hex,
        })
    }
}

impl KeystreamVector {
    /// Runs a fresh engine for `byte_count` keystream bytes.
    pub fn generate(
        key_hex: &str,
        frame: u32,
        key_order: KeyByteOrder,
        byte_count: usize,
    ) -> Result<Self, A51Error> {
        let keystream = keystream_for(key_hex, frame, key_order, byte_count)?;
        debug!("generated {byte_count}-byte vector for frame {frame}");
        Ok(Self {
            version: KEYSTREAM_VECTOR_VERSION,
            key_hex: key_hex.to_string(),
            key_order,
            frame,
            keystream_hex: HexCodec::encode(keystream),
        })
    }

    /// Replays the vector and fails with [`A51Error::VectorMismatch`] if the
    /// engine no longer produces the recorded keystream.
    pub fn verify(&self) -> Result<(), A51Error> {
        let expected = HexCodec::decode(&self.keystream_hex)?;
        let actual = keystream_for(&self.key_hex, self.frame, self.key_order, expected.len())?;
        if actual != expected {
            return Err(A51Error::VectorMismatch {
                expected: HexCodec::encode(expected),
                actual: HexCodec::encode(actual),
            });
        }
        debug!("vector for frame {} verified", self.frame);
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, A51Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, A51Error> {
        Ok(serde_json::from_str(text)?)
    }
}

fn keystream_for(
    key_hex: &str,
    frame: u32,
    key_order: KeyByteOrder,
    byte_count: usize,
) -> Result<Vec<u8>, A51Error> {
    let key = parse_key_hex(key_hex, key_order)?;
    let mut engine = KeystreamEngine::new();
    engine.initialize(key, frame);
    Ok(engine.generate_keystream_bytes(byte_count))
}
