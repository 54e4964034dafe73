//! Errores normalizados del pipeline.
//!
//! Todo fallo que llega al caller tiene la forma `HookError`: un `ErrorKind`
//! estable, un mensaje y, cuando se conocen, el id del request y el status
//! HTTP. Los errores de firma (`SignError`) se convierten con `From`.

use serde::{Deserialize, Serialize};
use sign_core::SignError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::state::RequestState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgument,
    MissingContext,
    Timeout,
    Cancelled,
    TransportError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::MissingContext => "missing_context",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::TransportError => "transport_error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct HookError {
    pub kind: ErrorKind,
    pub message: String,
    pub request_id: Option<Uuid>,
    pub status: Option<u16>,
}

impl HookError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind,
               message: message.into(),
               request_id: None,
               status: None }
    }

    pub fn with_request(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn timeout(request_id: Uuid, after: Duration) -> Self {
        Self::new(ErrorKind::Timeout, format!("no response after {} ms", after.as_millis())).with_request(request_id)
    }

    pub fn cancelled(request_id: Uuid) -> Self {
        Self::new(ErrorKind::Cancelled, "request cancelled").with_request(request_id)
    }

    pub fn transport(request_id: Uuid, failure: TransportFailure) -> Self {
        let err = Self::new(ErrorKind::TransportError, failure.to_string()).with_request(request_id);
        match failure.status() {
            Some(status) => err.with_status(status),
            None => err,
        }
    }

    pub fn invalid_transition(request_id: Uuid, from: RequestState, to: RequestState) -> Self {
        Self::new(ErrorKind::InvalidArgument, format!("invalid transition {from:?} -> {to:?}")).with_request(request_id)
    }
}

impl From<SignError> for HookError {
    fn from(err: SignError) -> Self {
        let kind = match &err {
            SignError::MissingContext(_) => ErrorKind::MissingContext,
            SignError::InvalidArgument(_) | SignError::Config(_) => ErrorKind::InvalidArgument,
        };
        Self::new(kind, err.to_string())
    }
}

/// Fallo reportado por un `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransportFailure {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("http status {status}: {message}")]
    Status { status: u16, message: String },
}

impl TransportFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Connection(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_errors_keep_their_kind() {
        let err: HookError = SignError::MissingContext("sessionUid".into()).into();
        assert_eq!(err.kind, ErrorKind::MissingContext);
        assert_eq!(err.message, "missing signing context: sessionUid");
        let err: HookError = SignError::InvalidArgument("null".into()).into();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn transport_failure_carries_status() {
        let id = Uuid::new_v4();
        let err = HookError::transport(id,
                                       TransportFailure::Status { status: 503,
                                                                  message: "unavailable".into() });
        assert_eq!(err.kind, ErrorKind::TransportError);
        assert_eq!(err.status, Some(503));
        assert_eq!(err.request_id, Some(id));
        assert_eq!(err.to_string(), "transport_error: http status 503: unavailable");
    }

    #[test]
    fn timeout_message_names_the_budget() {
        let err = HookError::timeout(Uuid::nil(), Duration::from_millis(250));
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.message, "no response after 250 ms");
        assert!(err.status.is_none());
    }
}
