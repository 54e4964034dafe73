//! Carga de configuración del firmador desde variables de entorno.
//! Usa `SIGNFLOW_XRTOB` (o `REACT_APP_XRTOB`) y parámetros opcionales de
//! timeout y del sobre `SC-CLIENT-CONTEXT`.

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::constants::DEFAULT_TIMEOUT_MS;
use crate::errors::SignError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const ENV_XRTOB: &str = "SIGNFLOW_XRTOB";
pub const ENV_XRTOB_LEGACY: &str = "REACT_APP_XRTOB";
pub const ENV_TIMEOUT_MS: &str = "SIGNFLOW_TIMEOUT_MS";
pub const ENV_CLIENT_CONTEXT: &str = "SIGNFLOW_CLIENT_CONTEXT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    /// Secreto de contexto del cliente que entra en ciertos digests.
    pub client_secret: String,
    pub timeout: Duration,
    /// Emitir el header `SC-CLIENT-CONTEXT`.
    pub client_context: bool,
}

impl SignerConfig {
    pub fn new(client_secret: impl Into<String>) -> Self {
        Self { client_secret: client_secret.into(),
               timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
               client_context: true }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_client_context(mut self, enabled: bool) -> Self {
        self.client_context = enabled;
        self
    }

    pub fn from_env() -> Result<Self, SignError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente arbitraria (tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SignError>
        where F: Fn(&str) -> Option<String>
    {
        let client_secret = lookup(ENV_XRTOB).or_else(|| lookup(ENV_XRTOB_LEGACY))
                                             .filter(|v| !v.is_empty())
                                             .ok_or_else(|| SignError::Config(format!("{ENV_XRTOB} no definido")))?;
        let timeout_ms = match lookup(ENV_TIMEOUT_MS) {
            Some(raw) => raw.trim()
                            .parse::<u64>()
                            .ok()
                            .filter(|ms| *ms > 0)
                            .ok_or_else(|| SignError::Config(format!("{ENV_TIMEOUT_MS} inválido: {raw}")))?,
            None => DEFAULT_TIMEOUT_MS,
        };
        let client_context = match lookup(ENV_CLIENT_CONTEXT) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| SignError::Config(format!("{ENV_CLIENT_CONTEXT} inválido: {raw}")))?,
            None => true,
        };
        Ok(Self { client_secret,
                  timeout: Duration::from_millis(timeout_ms),
                  client_context })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = SignerConfig::from_lookup(source(&[(ENV_XRTOB, "x1")])).unwrap();
        assert_eq!(cfg.client_secret, "x1");
        assert_eq!(cfg.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert!(cfg.client_context);
    }

    #[test]
    fn legacy_secret_and_overrides() {
        let cfg = SignerConfig::from_lookup(source(&[(ENV_XRTOB_LEGACY, "legacy"),
                                                     (ENV_TIMEOUT_MS, "1500"),
                                                     (ENV_CLIENT_CONTEXT, "off")])).unwrap();
        assert_eq!(cfg.client_secret, "legacy");
        assert_eq!(cfg.timeout, Duration::from_millis(1500));
        assert!(!cfg.client_context);
    }

    #[test]
    fn missing_secret_or_bad_values_fail() {
        assert!(matches!(SignerConfig::from_lookup(source(&[])), Err(SignError::Config(_))));
        assert!(matches!(SignerConfig::from_lookup(source(&[(ENV_XRTOB, "x"), (ENV_TIMEOUT_MS, "soon")])),
                         Err(SignError::Config(_))));
        assert!(matches!(SignerConfig::from_lookup(source(&[(ENV_XRTOB, "x"), (ENV_TIMEOUT_MS, "0")])),
                         Err(SignError::Config(_))));
        assert!(matches!(SignerConfig::from_lookup(source(&[(ENV_XRTOB, "x"), (ENV_CLIENT_CONTEXT, "maybe")])),
                         Err(SignError::Config(_))));
    }
}
