use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sign_core::{EndpointCategory, HeaderBag, HttpMethod};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::TransportFailure;

/// Request ya firmado, listo para salir por un `Transport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedRequest {
    pub id: Uuid,
    pub category: EndpointCategory,
    pub method: HttpMethod,
    pub url: String,
    pub payload: Value,
    pub headers: HeaderBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: HeaderBag,
    #[serde(default)]
    pub body: Value,
}

impl TransportResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200,
               headers: HeaderBag::new(),
               body }
    }
}

/// Cliente HTTP abstracto. Las implementaciones deberían abandonar el envío
/// cuando `cancel` se dispara; el pipeline igualmente deja de esperar.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SignedRequest, cancel: CancellationToken)
                  -> Result<TransportResponse, TransportFailure>;
}

/// Devuelve los headers firmados como body. Útil para dry-runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTransport;

#[async_trait]
impl Transport for EchoTransport {
    async fn send(&self, request: SignedRequest, _cancel: CancellationToken)
                  -> Result<TransportResponse, TransportFailure> {
        let headers: Map<String, Value> = request.headers
                                                 .iter()
                                                 .map(|(k, v)| (k.to_string(), Value::from(v)))
                                                 .collect();
        Ok(TransportResponse::ok(Value::Object(headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_returns_signed_headers() {
        let mut headers = HeaderBag::new();
        headers.insert("authorization", "abc");
        let req = SignedRequest { id: Uuid::new_v4(),
                                  category: EndpointCategory::Resume,
                                  method: HttpMethod::Post,
                                  url: "/resume".into(),
                                  payload: Value::Null,
                                  headers };
        let resp = EchoTransport.send(req, CancellationToken::new()).await.unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["authorization"], "abc");
    }
}
