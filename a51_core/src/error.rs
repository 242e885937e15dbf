use thiserror::Error;

/// Errors produced while turning user input into engine parameters.
///
/// Engine operations themselves never fail; every variant here comes from
/// parsing text (hex, frame numbers) or from checking stored vectors.
#[derive(Debug, Error)]
pub enum A51Error {
    #[error("invalid hex character {character:?} at position {index}")]
    InvalidHexCharacter { character: char, index: usize },

    #[error("malformed hex input: {0}")]
    MalformedHex(String),

    #[error("key must contain at least {required} hex digits, found {found}")]
    KeyTooShort { required: usize, found: usize },

    #[error("invalid frame number {input:?}: {reason}")]
    InvalidFrame { input: String, reason: String },

    #[error("keystream vector drifted: expected {expected}, found {actual}")]
    VectorMismatch { expected: String, actual: String },

    #[error("vector serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
