//! Tabla de recetas: qué campos entran en cada header calculado.
//!
//! Una receta es una lista ordenada de `(clave canónica, fuente)`. El orden
//! no afecta al digest (`extract_value` ordena por clave), pero se mantiene
//! alfabético para que la tabla se lea igual que la cadena resultante.
//!
//! `splice` lista punteros JSON al payload; el primero que apunte a un objeto
//! aporta todos sus campos de primer nivel. Las claves explícitas de
//! `fields` prevalecen sobre las del objeto.

use crate::constants::*;
use crate::endpoint::EndpointCategory;

/// Origen de un campo dentro del sub-mapa a hashear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    SessionUid,
    ChannelRef,
    ChannelCode,
    ApplicationRef,
    /// Secreto de contexto del cliente, bajo la clave `XRTOB`.
    ClientSecret,
    /// Puntero JSON dentro del payload (`/application/stage/stage_id`).
    Payload(&'static str),
    /// Token resuelto por `ChannelResolver::key_token`.
    KeyToken(&'static str),
    /// Campo de producto unido con `,` a través de todos los productos.
    Product(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct HeaderRecipe {
    pub header: &'static str,
    pub splice: &'static [&'static str],
    pub fields: &'static [(&'static str, FieldSource)],
}

const APPLICANT_OBJECTS: &[&str] = &["/applicants", "/applicant"];

/// Clave del secreto del cliente. En mayúsculas ordena antes que las claves
/// camelCase, así que su valor abre siempre la cadena canónica.
const SECRET_KEY: &str = "XRTOB";

const AUTHORIZATION: HeaderRecipe = HeaderRecipe { header: HEADER_AUTHORIZATION,
                                                   splice: &[],
                                                   fields: &[(SECRET_KEY, FieldSource::ClientSecret),
                                                             ("channelRefNo", FieldSource::ChannelRef),
                                                             ("code", FieldSource::ChannelCode),
                                                             ("sessionUid", FieldSource::SessionUid)] };

const TOKEN_KEYS: HeaderRecipe = HeaderRecipe { header: HEADER_TOKEN_KEYS,
                                                splice: &[],
                                                fields: &[(SECRET_KEY, FieldSource::ClientSecret),
                                                          ("channelRefNo", FieldSource::ChannelRef),
                                                          ("code", FieldSource::ChannelCode),
                                                          ("token", FieldSource::KeyToken(HEADER_TOKEN_KEYS))] };

const PERSON_KEYS: HeaderRecipe = HeaderRecipe { header: HEADER_PERSON_KEYS,
                                                 splice: &[],
                                                 fields: &[("applnRefNo", FieldSource::ApplicationRef),
                                                           ("mobileNo", FieldSource::Payload("/mobileNo")),
                                                           ("person", FieldSource::KeyToken(HEADER_PERSON_KEYS)),
                                                           ("sessionUid", FieldSource::SessionUid)] };

const GENERATE_OTP: HeaderRecipe = HeaderRecipe { header: HEADER_GENERATE_OTP,
                                                  splice: &[],
                                                  fields: &[(SECRET_KEY, FieldSource::ClientSecret),
                                                            ("flowType", FieldSource::Payload("/flowType")),
                                                            ("mobileNo", FieldSource::Payload("/mobileNo")),
                                                            ("sessionUid", FieldSource::SessionUid)] };

const VERIFY_OTP: HeaderRecipe = HeaderRecipe { header: HEADER_VERIFY_OTP,
                                                splice: &[],
                                                fields: &[("enc-otp", FieldSource::Payload("/enc-otp")),
                                                          ("flow-type", FieldSource::Payload("/flow-type")),
                                                          ("key-index", FieldSource::Payload("/key-index")),
                                                          ("mobile-no", FieldSource::Payload("/mobile-no")),
                                                          ("otp-sn", FieldSource::Payload("/otp-sn")),
                                                          ("user-id", FieldSource::Payload("/user-id"))] };

/// `application` para authorize / create / preserve: secreto, etapa del
/// payload y categoría de producto.
const PRODUCT_APPLICATION: HeaderRecipe =
    HeaderRecipe { header: HEADER_APPLICATION,
                   splice: &[],
                   fields: &[(SECRET_KEY, FieldSource::ClientSecret),
                             ("pageId", FieldSource::Payload("/application/stage/page_id")),
                             ("productCategory", FieldSource::Product("product_category_name")),
                             ("stageId", FieldSource::Payload("/application/stage/stage_id"))] };

const PRODUCT_APPLICANTS: HeaderRecipe = HeaderRecipe { header: HEADER_APPLICANTS,
                                                        splice: APPLICANT_OBJECTS,
                                                        fields: &[(SECRET_KEY, FieldSource::ClientSecret),
                                                                  ("applnRefNo", FieldSource::ApplicationRef),
                                                                  ("channelRefNo", FieldSource::ChannelRef)] };

/// `application` por defecto: el objeto `application` completo del payload.
const PAYLOAD_APPLICATION: HeaderRecipe =
    HeaderRecipe { header: HEADER_APPLICATION,
                   splice: &["/application"],
                   fields: &[("applnRefNo", FieldSource::ApplicationRef),
                             ("channelRefNo", FieldSource::ChannelRef),
                             ("pageId", FieldSource::Payload("/application/stage/page_id")),
                             ("stageId", FieldSource::Payload("/application/stage/stage_id"))] };

const PAYLOAD_APPLICANTS: HeaderRecipe = HeaderRecipe { header: HEADER_APPLICANTS,
                                                        splice: APPLICANT_OBJECTS,
                                                        fields: &[("sessionUid", FieldSource::SessionUid)] };

const RESUME: &[HeaderRecipe] = &[AUTHORIZATION];
const CUSTOMER: &[HeaderRecipe] = &[TOKEN_KEYS, PERSON_KEYS];
const GENERATE: &[HeaderRecipe] = &[GENERATE_OTP];
const VERIFY: &[HeaderRecipe] = &[VERIFY_OTP];
const PRODUCT: &[HeaderRecipe] = &[PRODUCT_APPLICATION, PRODUCT_APPLICANTS];
const APPLY: &[HeaderRecipe] = &[PAYLOAD_APPLICATION, PAYLOAD_APPLICANTS];

pub fn recipes_for(category: EndpointCategory) -> &'static [HeaderRecipe] {
    match category {
        EndpointCategory::Resume => RESUME,
        EndpointCategory::Customer => CUSTOMER,
        EndpointCategory::Generate => GENERATE,
        EndpointCategory::Verify => VERIFY,
        EndpointCategory::Authorize | EndpointCategory::Create | EndpointCategory::Preserve => PRODUCT,
        EndpointCategory::Apply => APPLY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EndpointCategory; 8] = [EndpointCategory::Resume,
                                        EndpointCategory::Customer,
                                        EndpointCategory::Generate,
                                        EndpointCategory::Verify,
                                        EndpointCategory::Authorize,
                                        EndpointCategory::Create,
                                        EndpointCategory::Preserve,
                                        EndpointCategory::Apply];

    #[test]
    fn recipes_match_category_headers() {
        for category in ALL {
            let headers: Vec<&str> = recipes_for(category).iter().map(|r| r.header).collect();
            assert_eq!(headers, category.computed_headers(), "{category}");
        }
    }

    #[test]
    fn recipe_keys_are_sorted_and_unique() {
        for category in ALL {
            for recipe in recipes_for(category) {
                let keys: Vec<&str> = recipe.fields.iter().map(|(k, _)| *k).collect();
                let mut sorted = keys.clone();
                sorted.sort();
                sorted.dedup();
                assert_eq!(keys, sorted, "{}", recipe.header);
            }
        }
    }
}
