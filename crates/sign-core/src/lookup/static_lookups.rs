use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ChannelReference, ChannelResolver, ProductDescriptor, ProductResolver, QueryReader};
use crate::errors::SignError;

/// Implementación en memoria de los tres resolvers.
///
/// Se puede cargar desde JSON:
///
/// ```json
/// {
///   "channel": { "channelRefNo": "CH-1", "applicationRefNo": "APP-1", "code": "C1" },
///   "products": [ { "product_description": "Savings", "company_category": "RB" } ],
///   "keyTokens": { "tokenKeys": "tk" },
///   "query": { "isMyInfoVirtualNRIC": "true" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticLookups {
    #[serde(default)]
    pub channel: Option<ChannelReference>,
    #[serde(default)]
    pub products: Vec<ProductDescriptor>,
    #[serde(default)]
    pub key_tokens: HashMap<String, String>,
    #[serde(default)]
    pub query: HashMap<String, String>,
}

impl StaticLookups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SignError> {
        serde_json::from_str(raw).map_err(|e| SignError::InvalidArgument(format!("lookups json: {e}")))
    }

    pub fn with_channel(mut self, channel: ChannelReference) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_product(mut self, product: ProductDescriptor) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_key_token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.key_tokens.insert(key.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }
}

impl ChannelResolver for StaticLookups {
    fn channel_reference(&self) -> Option<ChannelReference> {
        self.channel.clone()
    }

    fn key_token(&self, key: &str) -> Option<String> {
        self.key_tokens.get(key).cloned()
    }
}

impl ProductResolver for StaticLookups {
    fn product_info(&self) -> Vec<ProductDescriptor> {
        self.products.clone()
    }
}

impl QueryReader for StaticLookups {
    fn parameter(&self, name: &str) -> Option<String> {
        self.query.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_from_json() {
        let raw = r#"{
            "channel": { "channelRefNo": "CH-1", "code": "C1" },
            "products": [ { "product_description": "Savings", "product_category_name": ["CA"] } ],
            "keyTokens": { "tokenKeys": "tk" },
            "query": { "SSCode": "ss-1" }
        }"#;
        let lookups = StaticLookups::from_json_str(raw).unwrap();
        assert_eq!(lookups.channel_reference().unwrap().channel_ref_no, "CH-1");
        assert_eq!(lookups.product_info()[0].field("product_category_name"), Some(&json!(["CA"])));
        assert_eq!(lookups.key_token("tokenKeys").as_deref(), Some("tk"));
        assert_eq!(lookups.parameter("SSCode").as_deref(), Some("ss-1"));
        assert!(lookups.parameter("missing").is_none());
    }

    #[test]
    fn invalid_json_is_invalid_argument() {
        assert!(matches!(StaticLookups::from_json_str("[1,2"), Err(SignError::InvalidArgument(_))));
    }
}
