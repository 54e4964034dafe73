//! Contexto de sesión inyectado en el assembler.
//!
//! Reemplaza la lectura del store global de autenticación: el caller
//! construye un `SessionContext` y lo pasa explícitamente. Es de solo lectura
//! y se comparte entre requests concurrentes.

use serde::{Deserialize, Serialize};

use crate::errors::SignError;
use crate::lookup::ChannelResolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    session_uid: String,
    channel_ref_no: String,
    #[serde(default)]
    application_ref_no: Option<String>,
    #[serde(default)]
    channel_code: Option<String>,
}

impl SessionContext {
    /// Falla con `MissingContext` si alguno de los dos ids está vacío.
    pub fn new(session_uid: impl Into<String>, channel_ref_no: impl Into<String>) -> Result<Self, SignError> {
        let ctx = Self { session_uid: session_uid.into(),
                         channel_ref_no: channel_ref_no.into(),
                         application_ref_no: None,
                         channel_code: None };
        ctx.ensure_complete()?;
        Ok(ctx)
    }

    /// Construye el contexto a partir del id de sesión autenticada y el
    /// resolver de canal.
    pub fn resolve(session_uid: Option<&str>, resolver: &dyn ChannelResolver) -> Result<Self, SignError> {
        let uid = session_uid.ok_or_else(|| SignError::MissingContext("sessionUid".into()))?;
        let channel = resolver.channel_reference()
                              .ok_or_else(|| SignError::MissingContext("channelRefNo".into()))?;
        let mut ctx = Self::new(uid, channel.channel_ref_no)?;
        ctx.application_ref_no = channel.application_ref_no;
        ctx.channel_code = channel.code;
        Ok(ctx)
    }

    pub fn with_application_ref(mut self, application_ref_no: impl Into<String>) -> Self {
        self.application_ref_no = Some(application_ref_no.into());
        self
    }

    pub fn with_channel_code(mut self, code: impl Into<String>) -> Self {
        self.channel_code = Some(code.into());
        self
    }

    /// Un contexto deserializado no pasa por `new`; el assembler lo valida
    /// de nuevo antes de firmar.
    pub fn ensure_complete(&self) -> Result<(), SignError> {
        if self.session_uid.trim().is_empty() {
            return Err(SignError::MissingContext("sessionUid".into()));
        }
        if self.channel_ref_no.trim().is_empty() {
            return Err(SignError::MissingContext("channelRefNo".into()));
        }
        Ok(())
    }

    pub fn session_uid(&self) -> &str {
        &self.session_uid
    }

    pub fn channel_ref_no(&self) -> &str {
        &self.channel_ref_no
    }

    pub fn application_ref_no(&self) -> Option<&str> {
        self.application_ref_no.as_deref()
    }

    pub fn channel_code(&self) -> Option<&str> {
        self.channel_code.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{ChannelReference, StaticLookups};

    #[test]
    fn empty_ids_are_missing_context() {
        assert_eq!(SessionContext::new("", "CH").unwrap_err(), SignError::MissingContext("sessionUid".into()));
        assert_eq!(SessionContext::new("uid", " ").unwrap_err(), SignError::MissingContext("channelRefNo".into()));
    }

    #[test]
    fn resolve_copies_channel_reference() {
        let lookups = StaticLookups::new().with_channel(ChannelReference::new("CH-9").with_application_ref("APP-1")
                                                                                    .with_code("C1"));
        let ctx = SessionContext::resolve(Some("uid-9"), &lookups).unwrap();
        assert_eq!(ctx.channel_ref_no(), "CH-9");
        assert_eq!(ctx.application_ref_no(), Some("APP-1"));
        assert_eq!(ctx.channel_code(), Some("C1"));
    }

    #[test]
    fn resolve_without_channel_fails() {
        let err = SessionContext::resolve(Some("uid"), &StaticLookups::new()).unwrap_err();
        assert_eq!(err, SignError::MissingContext("channelRefNo".into()));
        let err = SessionContext::resolve(None, &StaticLookups::new()).unwrap_err();
        assert_eq!(err, SignError::MissingContext("sessionUid".into()));
    }

    #[test]
    fn deserialized_context_is_checked() {
        let ctx: SessionContext = serde_json::from_str(r#"{"sessionUid":"","channelRefNo":"CH"}"#).unwrap();
        assert!(ctx.ensure_complete().is_err());
    }
}
