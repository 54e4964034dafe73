//! Constantes del protocolo de firma.
//!
//! Los nombres de header son literales sensibles a mayúsculas: el verificador
//! del lado servidor los busca exactamente así.

/// Header con el digest de reanudación (`resume`).
pub const HEADER_AUTHORIZATION: &str = "authorization";
/// Headers del endpoint `customer`.
pub const HEADER_TOKEN_KEYS: &str = "tokenKeys";
pub const HEADER_PERSON_KEYS: &str = "personKeys";
/// Headers de OTP.
pub const HEADER_GENERATE_OTP: &str = "generate_otp";
pub const HEADER_VERIFY_OTP: &str = "verify_otp";
/// Headers de la solicitud (application / applicants).
pub const HEADER_APPLICATION: &str = "application";
pub const HEADER_APPLICANTS: &str = "applicants";

/// Unión de todos los headers calculados. Cualquier header de esta lista que
/// no pertenezca a la categoría actual se elimina de la bolsa.
pub const ALL_COMPUTED_HEADERS: [&str; 7] = [HEADER_AUTHORIZATION,
                                             HEADER_TOKEN_KEYS,
                                             HEADER_PERSON_KEYS,
                                             HEADER_GENERATE_OTP,
                                             HEADER_VERIFY_OTP,
                                             HEADER_APPLICATION,
                                             HEADER_APPLICANTS];

// Headers estáticos (presentes sin importar la categoría).
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_REQUEST_ID: &str = "requestId";
pub const HEADER_VIRTUAL: &str = "virtual";
pub const HEADER_TRANSFER_TOKEN: &str = "transfer-token";
pub const HEADER_SS_CODE: &str = "SSCode";
pub const HEADER_CLIENT_CONTEXT: &str = "SC-CLIENT-CONTEXT";

pub const CONTENT_TYPE_JSON: &str = "application/json;charset=UTF-8";

// Query params leídos por el assembler.
pub const PARAM_VIRTUAL_NRIC: &str = "isMyInfoVirtualNRIC";
pub const PARAM_TRANSFER_TOKEN: &str = "transfer-token";
pub const PARAM_SS_CODE: &str = "SSCode";

/// Segmento de path que identifica llamadas de banca en línea.
pub const IBANK_SEGMENT: &str = "ibank";

/// Representación fija de un objeto anidado dentro de la cadena canónica.
pub const OBJECT_PLACEHOLDER: &str = "[object Object]";

/// Timeout por defecto de cada request (ms).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
