//! Resolvers externos consumidos por el assembler.
//!
//! Cada trait cubre una fuente de datos del proceso anfitrión (referencia de
//! canal, metadatos de producto, query params de la URL). Se inyectan como
//! `Arc<dyn ...>` para compartirlos entre requests en vuelo.

pub mod static_lookups;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use static_lookups::StaticLookups;

/// Referencia de canal de la instancia de solicitud actual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReference {
    pub channel_ref_no: String,
    #[serde(default)]
    pub application_ref_no: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ChannelReference {
    pub fn new(channel_ref_no: impl Into<String>) -> Self {
        Self { channel_ref_no: channel_ref_no.into(), ..Self::default() }
    }

    pub fn with_application_ref(mut self, application_ref_no: impl Into<String>) -> Self {
        self.application_ref_no = Some(application_ref_no.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Descriptor de producto (`product_description`, `company_category`,
/// `product_category_name`, ... ). Los campos se conservan como JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductDescriptor {
    fields: Map<String, Value>,
}

impl ProductDescriptor {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

pub trait ChannelResolver: Send + Sync {
    /// Referencia de canal actual; `None` si la sesión aún no la tiene.
    fn channel_reference(&self) -> Option<ChannelReference>;
    /// Token asociado a una clave (usado por el endpoint `customer`).
    fn key_token(&self, key: &str) -> Option<String>;
}

pub trait ProductResolver: Send + Sync {
    fn product_info(&self) -> Vec<ProductDescriptor>;
}

pub trait QueryReader: Send + Sync {
    /// Valor de un query param de la URL de la aplicación.
    fn parameter(&self, name: &str) -> Option<String>;
}
