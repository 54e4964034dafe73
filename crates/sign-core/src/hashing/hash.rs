//! Digest SHA-256 en hex minúsculo (64 caracteres).
//!
//! No se mezcla ningún secreto aquí: el digest aporta integridad, la
//! autenticación viene de los campos ligados a la sesión.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::extract::{extract_map, extract_value};
use crate::errors::SignError;

/// Hashea un string y devuelve hex.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// `sha256_hex(extract_map(fields))`.
pub fn digest_fields(fields: &Map<String, Value>) -> String {
    sha256_hex(&extract_map(fields))
}

pub fn digest_value(value: &Value) -> Result<String, SignError> {
    Ok(sha256_hex(&extract_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_string_digest() {
        assert_eq!(sha256_hex(""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn digest_is_lowercase_hex_64() {
        let h = digest_value(&json!({ "b": "Beta", "a": "Alpha", "c": "Gamma" })).unwrap();
        assert_eq!(h, "3e3e94e2ddf6dba12f5b397ab0f4f5f045b694399f06023664c78cdc3c858aa1");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn digest_value_propagates_invalid_argument() {
        assert!(matches!(digest_value(&Value::Null), Err(SignError::InvalidArgument(_))));
    }
}
