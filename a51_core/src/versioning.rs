//! Serialization versioning helpers.

use serde::de::Error as DeError;

pub const KEYSTREAM_VECTOR_VERSION: u16 = 1;

pub fn expect_version<E: DeError>(found: u16, expected: u16, label: &'static str) -> Result<(), E> {
    if found != expected {
        return Err(E::custom(format!(
            "{} version mismatch: expected {}, found {}",
            label, expected, found
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_the_label() {
        let err = expect_version::<serde_json::Error>(2, 1, "KeystreamVector").unwrap_err();
        assert_eq!(
            err.to_string(),
            "KeystreamVector version mismatch: expected 1, found 2"
        );
        assert!(expect_version::<serde_json::Error>(1, 1, "KeystreamVector").is_ok());
    }
}
