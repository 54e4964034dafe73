//! Descriptor del request saliente.
//!
//! El descriptor es propiedad del caller hasta que lo entrega al pipeline.
//! Firmar nunca lo muta: el assembler devuelve una `HeaderBag` nueva y
//! `with_headers` produce el descriptor resultante.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::HeaderBag;
use crate::endpoint::EndpointCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    /// Datos del request: puede incluir `application`, `applicant(s)` y campos
    /// propios del flujo (OTP, móvil, ...).
    #[serde(default)]
    pub payload: Value,
    /// Etiqueta explícita del endpoint; si falta se clasifica por URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub headers: HeaderBag,
}

impl OutboundRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { url: url.into(),
               method,
               payload: Value::Null,
               endpoint: None,
               headers: HeaderBag::new() }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_endpoint(mut self, label: impl Into<String>) -> Self {
        self.endpoint = Some(label.into());
        self
    }

    pub fn with_headers(mut self, headers: HeaderBag) -> Self {
        self.headers = headers;
        self
    }

    /// Categoría decidida una sola vez para este request.
    pub fn category(&self) -> EndpointCategory {
        EndpointCategory::resolve(self.endpoint.as_deref(), &self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_with_defaults() {
        let req: OutboundRequest = serde_json::from_value(json!({ "url": "https://api.bank/verify" })).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.payload.is_null());
        assert!(req.headers.is_empty());
        assert_eq!(req.category(), EndpointCategory::Verify);
    }

    #[test]
    fn explicit_endpoint_wins() {
        let req = OutboundRequest::new(HttpMethod::Post, "https://api.bank/apply").with_endpoint("authorize");
        assert_eq!(req.category(), EndpointCategory::Authorize);
        assert_eq!(req.method.to_string(), "POST");
    }
}
