use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::engine::{BURST_KEYSTREAM_BYTES, KeystreamEngine};
use crate::error::A51Error;
use crate::hex_codec::HexCodec;
use crate::key::{KeyByteOrder, parse_frame, parse_key_hex};

const FILE_CHUNK_BYTES: usize = 1 << 16;

/// Text-level session for front ends: hex key and decimal frame in, hex
/// keystream and ciphertext out.
///
/// Parsing happens before the engine is touched, so a rejected input leaves
/// the previous keystream position intact.
#[derive(Clone, Debug, Default)]
pub struct CipherSession {
    engine: KeystreamEngine,
    key_order: KeyByteOrder,
}

impl CipherSession {
    pub fn new(key_order: KeyByteOrder) -> Self {
        Self {
            engine: KeystreamEngine::new(),
            key_order,
        }
    }

    pub fn key_order(&self) -> KeyByteOrder {
        self.key_order
    }

    pub fn engine(&self) -> &KeystreamEngine {
        &self.engine
    }

    /// Parses `key_hex` and `frame` and re-initializes the engine.
    pub fn initialize(&mut self, key_hex: &str, frame: &str) -> Result<(), A51Error> {
        let key = parse_key_hex(key_hex, self.key_order)?;
        let frame = parse_frame(frame)?;
        self.engine.initialize(key, frame);
        debug!(
            "session initialized key_order={:?} frame={}",
            self.key_order, frame
        );
        Ok(())
    }

    pub fn keystream_bits(&mut self, count: usize) -> Vec<bool> {
        self.engine.generate_keystream_bits(count)
    }

    pub fn keystream_hex(&mut self, byte_count: usize) -> String {
        HexCodec::encode(self.engine.generate_keystream_bytes(byte_count))
    }

    /// Keystream for one 114-bit burst, padded to 15 bytes.
    pub fn burst_keystream_hex(&mut self) -> String {
        self.keystream_hex(BURST_KEYSTREAM_BYTES)
    }

    pub fn encrypt_bytes(&mut self, data: &[u8]) -> Vec<u8> {
        self.engine.encrypt(data)
    }

    /// Encrypts the UTF-8 bytes of `text` and returns the ciphertext as hex.
    pub fn encrypt_text(&mut self, text: &str) -> String {
        HexCodec::encode(self.encrypt_bytes(text.as_bytes()))
    }

    /// Decodes `hex` and XORs it with the keystream.
    pub fn xor_hex(&mut self, hex: &str) -> Result<Vec<u8>, A51Error> {
        let data = HexCodec::decode(hex)?;
        Ok(self.engine.encrypt(&data))
    }

    /// Streams `input` through the keystream into `output`. Returns the
    /// number of bytes processed.
    pub fn encrypt_file(&mut self, input: &Path, output: &Path) -> Result<u64, A51Error> {
        let mut reader = BufReader::new(File::open(input)?);
        let mut writer = BufWriter::new(File::create(output)?);
        let mut buffer = vec![0u8; FILE_CHUNK_BYTES];
        let mut total = 0u64;
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            let chunk = &mut buffer[..read];
            self.engine.apply_keystream(chunk);
            writer.write_all(chunk)?;
            total += read as u64;
        }
        writer.flush()?;
        debug!(
            "encrypted {} bytes from {} into {}",
            total,
            input.display(),
            output.display()
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    const KEY: &str = "0123456789ABCDEF";

    fn ready_session() -> CipherSession {
        let mut session = CipherSession::default();
        session.initialize(KEY, "0").unwrap();
        session
    }

    #[test]
    fn burst_keystream_matches_reference() {
        let mut session = ready_session();
        assert_eq!(session.burst_keystream_hex(), "DA9B5622C57E795DCE8A9880531101");
    }

    #[test]
    fn text_roundtrip_through_hex() {
        let mut sender = ready_session();
        let cipher_hex = sender.encrypt_text("HELLO");
        assert_eq!(cipher_hex, "92DE1A6E8A");

        let mut receiver = ready_session();
        assert_eq!(receiver.xor_hex(&cipher_hex).unwrap(), b"HELLO");
    }

    #[test]
    fn big_endian_sessions_differ() {
        let mut session = CipherSession::new(KeyByteOrder::BigEndian);
        session.initialize(KEY, "0").unwrap();
        assert_eq!(session.key_order(), KeyByteOrder::BigEndian);
        assert_eq!(session.burst_keystream_hex(), "80786A88773A86E5AAC706A94E4EAE");
    }

    #[test]
    fn rejected_input_keeps_engine_state() {
        let mut session = ready_session();
        session.keystream_hex(3);
        let before = session.engine().clone();

        assert!(matches!(
            session.initialize("0123", "0"),
            Err(A51Error::KeyTooShort { .. })
        ));
        assert!(matches!(
            session.initialize(KEY, "frame"),
            Err(A51Error::InvalidFrame { .. })
        ));
        assert!(matches!(
            session.xor_hex("not hex"),
            Err(A51Error::InvalidHexCharacter { .. })
        ));
        assert_eq!(session.engine(), &before);
    }

    #[test]
    fn file_encryption_matches_in_memory() {
        let data: Vec<u8> = (0..FILE_CHUNK_BYTES + 77).map(|i| (i % 251) as u8).collect();
        let input = NamedTempFile::new().unwrap();
        let encrypted = NamedTempFile::new().unwrap();
        let decrypted = NamedTempFile::new().unwrap();
        fs::write(input.path(), &data).unwrap();

        let written = ready_session()
            .encrypt_file(input.path(), encrypted.path())
            .unwrap();
        assert_eq!(written, data.len() as u64);

        let ciphertext = fs::read(encrypted.path()).unwrap();
        let mut expected = ready_session();
        assert_eq!(ciphertext, expected.engine.encrypt(&data));

        ready_session()
            .encrypt_file(encrypted.path(), decrypted.path())
            .unwrap();
        assert_eq!(fs::read(decrypted.path()).unwrap(), data);
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let output = NamedTempFile::new().unwrap();
        let err = ready_session()
            .encrypt_file(Path::new("/nonexistent/a51-input"), output.path())
            .unwrap_err();
        assert!(matches!(err, A51Error::Io(_)));
    }
}
