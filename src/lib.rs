//! Signflow Rust Library
//!
//! Fachada sobre los crates del workspace:
//! - `sign_core`: serialización canónica, digest, clasificación y assembler.
//! - `sign_hooks`: pipeline de request/respuesta (timeout, cancelación, eventos).
//! - `errors`: error unificado para clientes que usan ambos.
//! - `bootstrap`: construcción del `Interceptor` a partir del entorno.

pub mod bootstrap;
pub mod errors;

pub use sign_core;
pub use sign_hooks;

pub use bootstrap::{interceptor_from_env, interceptor_with_config};
pub use errors::SignflowError;
