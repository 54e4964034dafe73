//! Módulo de hashing y canonicalización.

pub mod canonical_json;
pub mod extract;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use extract::{coerce, extract_map, extract_value};
pub use hash::{digest_fields, digest_value, sha256_hex};
