//! Keystream generator in the A5/1 family: three linear feedback shift
//! registers (19, 22 and 23 bits) clocked by majority vote.
//!
//! The algorithm is reproduced as-is for interoperability and study. It
//! offers no integrity protection and is **not** secure against known
//! attacks on this cipher family.
//!
//! ```
//! use a51_core::{KeyByteOrder, KeystreamEngine, parse_key_hex};
//!
//! let key = parse_key_hex("0123456789ABCDEF", KeyByteOrder::LittleEndian).unwrap();
//!
//! let mut sender = KeystreamEngine::new();
//! sender.initialize(key, 0);
//! let ciphertext = sender.encrypt(b"HELLO");
//!
//! let mut receiver = KeystreamEngine::new();
//! receiver.initialize(key, 0);
//! assert_eq!(receiver.encrypt(&ciphertext), b"HELLO");
//! ```

pub mod engine;
pub mod error;
pub mod hex_codec;
pub mod key;
pub mod register;
pub mod session;
pub mod vector;
pub mod versioning;

pub use crate::engine::{
    BURST_KEYSTREAM_BYTES, FRAME_BITS, FRAME_MASK, GSM_BURST_BITS, KEY_BITS, KeystreamEngine,
    WARMUP_CYCLES, majority,
};
pub use crate::error::A51Error;
pub use crate::hex_codec::HexCodec;
pub use crate::key::{KEY_BYTES, KEY_HEX_DIGITS, KeyByteOrder, pack_key, parse_frame, parse_key_hex};
pub use crate::register::{R1, R2, R3, REGISTER_SPECS, Register, RegisterSpec};
pub use crate::session::CipherSession;
pub use crate::vector::KeystreamVector;
pub use crate::versioning::*;
