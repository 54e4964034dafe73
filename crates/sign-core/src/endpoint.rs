//! Clasificación del endpoint destino.
//!
//! La categoría se decide una sola vez (en el call site o a partir de la URL)
//! y se pasa como enum al assembler; ninguna otra capa compara strings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::*;

/// Categorías de endpoint. `Apply` es la categoría por defecto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointCategory {
    Resume,
    Customer,
    Generate,
    Verify,
    Authorize,
    Create,
    Preserve,
    Apply,
}

/// Marcadores en orden de prioridad: gana el primero que coincide.
const MARKERS: [(&str, EndpointCategory); 7] = [("resume", EndpointCategory::Resume),
                                                ("customer", EndpointCategory::Customer),
                                                ("generate", EndpointCategory::Generate),
                                                ("verify", EndpointCategory::Verify),
                                                ("authorize", EndpointCategory::Authorize),
                                                ("create", EndpointCategory::Create),
                                                ("preserve", EndpointCategory::Preserve)];

impl EndpointCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Customer => "customer",
            Self::Generate => "generate",
            Self::Verify => "verify",
            Self::Authorize => "authorize",
            Self::Create => "create",
            Self::Preserve => "preserve",
            Self::Apply => "apply",
        }
    }

    /// Coincidencia exacta (sin distinguir mayúsculas) de una etiqueta
    /// explícita. Etiquetas desconocidas caen en `Apply`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        MARKERS.iter()
               .find(|(marker, _)| marker.eq_ignore_ascii_case(label))
               .map(|(_, category)| *category)
               .unwrap_or(Self::Apply)
    }

    /// Clasifica por el primer marcador contenido en el path de `url`, sin
    /// distinguir mayúsculas (`/otp/generateOtp`, `/recreate`). Esquema,
    /// host, query y fragmento se ignoran.
    pub fn classify(url: &str) -> Self {
        let path = url_path(url).to_ascii_lowercase();
        MARKERS.iter()
               .find(|(marker, _)| path.contains(marker))
               .map(|(_, category)| *category)
               .unwrap_or(Self::Apply)
    }

    /// La etiqueta explícita tiene prioridad sobre la URL.
    pub fn resolve(explicit: Option<&str>, url: &str) -> Self {
        match explicit {
            Some(label) if !label.trim().is_empty() => Self::from_label(label),
            _ => Self::classify(url),
        }
    }

    /// Headers calculados que emite esta categoría.
    pub fn computed_headers(self) -> &'static [&'static str] {
        match self {
            Self::Resume => &[HEADER_AUTHORIZATION],
            Self::Customer => &[HEADER_TOKEN_KEYS, HEADER_PERSON_KEYS],
            Self::Generate => &[HEADER_GENERATE_OTP],
            Self::Verify => &[HEADER_VERIFY_OTP],
            Self::Authorize | Self::Create | Self::Preserve | Self::Apply => &[HEADER_APPLICATION, HEADER_APPLICANTS],
        }
    }

    pub fn emits(self, header: &str) -> bool {
        self.computed_headers().contains(&header)
    }
}

impl fmt::Display for EndpointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Path de una URL absoluta o relativa, sin query ni fragmento.
fn url_path(url: &str) -> &str {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    match without_query.find("://") {
        Some(idx) => {
            let rest = &without_query[idx + 3..];
            rest.find('/').map(|slash| &rest[slash..]).unwrap_or("")
        }
        None => without_query,
    }
}

/// Segmentos no vacíos del path de una URL absoluta o relativa.
pub fn path_segments(url: &str) -> impl Iterator<Item = &str> {
    url_path(url).split('/').filter(|s| !s.is_empty())
}

/// `true` si algún segmento del path es `ibank`.
pub fn is_ibank(url: &str) -> bool {
    path_segments(url).any(|s| s.eq_ignore_ascii_case(IBANK_SEGMENT))
}
