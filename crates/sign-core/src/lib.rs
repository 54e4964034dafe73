//! sign-core: firma determinista de requests salientes.
//!
//! Contiene todo lo que ocurre antes de que un request salga del proceso:
//! - `hashing`: serialización canónica (`extract_value`) y digest SHA-256.
//! - `endpoint`: clasificación del endpoint en una `EndpointCategory`.
//! - `model`: descriptor del request, bolsa de headers y contexto de sesión.
//! - `lookup`: resolvers externos (canal, productos, query params).
//! - `assembler`: construcción de la bolsa de headers firmada.
//! - `config`: configuración cargada desde el entorno (.env).
pub mod assembler;
pub mod config;
pub mod constants;
pub mod endpoint;
pub mod errors;
pub mod hashing;
pub mod lookup;
pub mod model;

pub use assembler::HeaderAssembler;
pub use config::SignerConfig;
pub use endpoint::EndpointCategory;
pub use errors::SignError;
pub use hashing::{digest_fields, extract_value, sha256_hex, to_canonical_json};
pub use lookup::{ChannelReference, ChannelResolver, ProductDescriptor, ProductResolver, QueryReader, StaticLookups};
pub use model::{HeaderBag, HttpMethod, OutboundRequest, SessionContext};
