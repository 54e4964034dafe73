//! Construcción de la bolsa de headers firmada.
//!
//! Rol en el flujo:
//! - Recibe el descriptor del request, el `SessionContext` y la categoría ya
//!   decidida.
//! - Elimina los headers calculados que no pertenecen a la categoría
//!   (re-clasificar es idempotente).
//! - Calcula cada receta: sub-mapa → `extract_map` → SHA-256 hex.
//! - Añade los headers estáticos (`Content-Type`, `requestId`, `virtual`, ...)
//!   y, si está habilitado, el sobre `SC-CLIENT-CONTEXT`.
//!
//! Devuelve una `HeaderBag` nueva; el request de entrada no se toca.

pub mod recipe;

use log::debug;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SignerConfig;
use crate::constants::*;
use crate::endpoint::{is_ibank, EndpointCategory};
use crate::errors::SignError;
use crate::hashing::{coerce, digest_fields, to_canonical_json};
use crate::lookup::{ChannelResolver, ProductDescriptor, ProductResolver, QueryReader};
use crate::model::{HeaderBag, OutboundRequest, SessionContext};

pub use recipe::{recipes_for, FieldSource, HeaderRecipe};

pub struct HeaderAssembler {
    channel: Arc<dyn ChannelResolver>,
    products: Arc<dyn ProductResolver>,
    query: Arc<dyn QueryReader>,
    client_secret: String,
    client_context: bool,
}

impl std::fmt::Debug for HeaderAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderAssembler")
         .field("client_context", &self.client_context)
         .finish_non_exhaustive()
    }
}

impl HeaderAssembler {
    pub fn new(config: &SignerConfig,
               channel: Arc<dyn ChannelResolver>,
               products: Arc<dyn ProductResolver>,
               query: Arc<dyn QueryReader>)
               -> Self {
        Self { channel,
               products,
               query,
               client_secret: config.client_secret.clone(),
               client_context: config.client_context }
    }

    /// Atajo cuando un mismo tipo implementa los tres resolvers.
    pub fn from_lookups<L>(config: &SignerConfig, lookups: Arc<L>) -> Self
        where L: ChannelResolver + ProductResolver + QueryReader + 'static
    {
        Self::new(config, lookups.clone(), lookups.clone(), lookups)
    }

    /// Firma `request` para `category` y devuelve la bolsa resultante.
    ///
    /// Falla con `MissingContext` si la sesión está incompleta; en ese caso no
    /// se emite ningún header.
    pub fn assemble(&self,
                    request: &OutboundRequest,
                    session: &SessionContext,
                    category: EndpointCategory)
                    -> Result<HeaderBag, SignError> {
        session.ensure_complete()?;

        let mut bag = request.headers.clone();
        for name in ALL_COMPUTED_HEADERS {
            if !category.emits(name) {
                bag.remove(name);
            }
        }

        let mut products: Option<Vec<ProductDescriptor>> = None;
        for recipe in recipes_for(category) {
            let fields = self.build_fields(recipe, request, session, &mut products);
            debug!("sign {} header={} fields={}", category, recipe.header, fields.len());
            bag.insert(recipe.header, digest_fields(&fields));
        }

        self.attach_static(&mut bag, request);

        if self.client_context {
            let envelope = client_context_envelope(&bag, session, category);
            bag.insert(HEADER_CLIENT_CONTEXT, envelope);
        } else {
            bag.remove(HEADER_CLIENT_CONTEXT);
        }
        Ok(bag)
    }

    /// Sub-mapa de campos de una receta, antes de canonicalizar.
    pub fn build_fields(&self,
                        recipe: &HeaderRecipe,
                        request: &OutboundRequest,
                        session: &SessionContext,
                        products: &mut Option<Vec<ProductDescriptor>>)
                        -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(object) = recipe.splice
                                    .iter()
                                    .find_map(|ptr| request.payload.pointer(ptr).and_then(Value::as_object))
        {
            fields.extend(object.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        for (key, source) in recipe.fields {
            let value = match source {
                FieldSource::SessionUid => Value::from(session.session_uid()),
                FieldSource::ChannelRef => Value::from(session.channel_ref_no()),
                FieldSource::ChannelCode => Value::from(session.channel_code().unwrap_or_default()),
                FieldSource::ApplicationRef => Value::from(session.application_ref_no().unwrap_or_default()),
                FieldSource::ClientSecret => Value::from(self.client_secret.as_str()),
                FieldSource::Payload(ptr) => request.payload.pointer(ptr).cloned().unwrap_or_else(|| Value::from("")),
                FieldSource::KeyToken(name) => Value::from(self.channel.key_token(name).unwrap_or_default()),
                FieldSource::Product(name) => {
                    let list = products.get_or_insert_with(|| self.products.product_info());
                    let joined = list.iter()
                                     .map(|p| p.field(name).map(coerce).unwrap_or_default())
                                     .collect::<Vec<_>>()
                                     .join(",");
                    Value::from(joined)
                }
            };
            fields.insert((*key).to_string(), value);
        }
        fields
    }

    fn attach_static(&self, bag: &mut HeaderBag, request: &OutboundRequest) {
        bag.insert(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        bag.insert(HEADER_REQUEST_ID, Uuid::new_v4().to_string());

        let virtual_nric = self.query
                               .parameter(PARAM_VIRTUAL_NRIC)
                               .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        bag.insert(HEADER_VIRTUAL, if virtual_nric { "YES" } else { "NO" });

        match self.query.parameter(PARAM_TRANSFER_TOKEN) {
            Some(token) if is_ibank(&request.url) => {
                bag.insert(HEADER_TRANSFER_TOKEN, token);
            }
            _ => {
                bag.remove(HEADER_TRANSFER_TOKEN);
            }
        }

        if let Some(code) = self.query.parameter(PARAM_SS_CODE) {
            bag.insert(HEADER_SS_CODE, code);
        }
    }
}

/// JSON canónico con el `sessionUid` y los headers calculados de la
/// categoría. Se reconstruye en cada firma.
pub fn client_context_envelope(bag: &HeaderBag, session: &SessionContext, category: EndpointCategory) -> String {
    let mut envelope = Map::new();
    envelope.insert("sessionUid".to_string(), Value::from(session.session_uid()));
    for name in category.computed_headers() {
        if let Some(value) = bag.get(name) {
            envelope.insert((*name).to_string(), Value::from(value));
        }
    }
    to_canonical_json(&Value::Object(envelope))
}
