use sign_core::SignError;
use sign_hooks::{ErrorKind, HookError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignflowError {
    #[error(transparent)]
    Sign(#[from] SignError),
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl SignflowError {
    /// Forma normalizada, igual a la que devuelve el pipeline.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Sign(err) => HookError::from(err.clone()).kind,
            Self::Hook(err) => err.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_normalise_to_invalid_argument() {
        let err: SignflowError = SignError::Config("bad".into()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err: SignflowError = SignError::MissingContext("sessionUid".into()).into();
        assert_eq!(err.kind(), ErrorKind::MissingContext);
    }
}
