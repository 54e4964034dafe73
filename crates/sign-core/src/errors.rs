//! Errores del núcleo de firma.
//!
//! Son errores locales: impiden que el request se envíe y nunca se
//! reintentan en silencio.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum SignError {
    /// Entrada nula o con forma inválida para la serialización canónica.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Falta el id de sesión o la referencia de canal al momento de firmar.
    #[error("missing signing context: {0}")]
    MissingContext(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_variant_format() {
        let err = SignError::Config("SIGNFLOW_TIMEOUT_MS".into());
        assert_eq!(err.to_string(), "configuration error: SIGNFLOW_TIMEOUT_MS");
    }

    #[test]
    fn errors_roundtrip_through_json() {
        let err = SignError::MissingContext("channelRefNo".into());
        let raw = serde_json::to_string(&err).expect("serialize");
        let back: SignError = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back, err);
    }
}
