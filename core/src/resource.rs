//! Back-reference wiring between decoded entities and the client.
//!
//! # Design
//! Entities that expose follow-on operations keep an `Option<Client>` that
//! serde skips. The dispatcher calls `Resource::attach` exactly once, right
//! after a successful decode and before the value reaches the caller, so a
//! fetched entity is never seen without its client. List envelopes forward
//! `attach` to each element.
//!
//! Nested resources also need their parent's identity to build paths (a
//! variant lives under `/ecommerce/stores/{store}/products/{product}`).
//! Those keys travel with the `Request` as `ParentKeys` and are handed to
//! `attach` alongside the client.

use std::collections::{BTreeMap, HashMap};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ApiError;

/// Identity of the entity a nested resource was reached through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentKeys {
    pub store_id: String,
    pub product_id: String,
}

impl ParentKeys {
    pub fn store(store_id: impl Into<String>) -> Self {
        Self { store_id: store_id.into(), ..Default::default() }
    }

    pub fn product(store_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self { store_id: store_id.into(), product_id: product_id.into() }
    }
}

/// A decoded response payload.
///
/// The default `attach` does nothing, which suits plain data shapes.
pub trait Resource {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        let _ = (client, parent);
    }
}

impl<T: Resource> Resource for Vec<T> {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        for item in self.iter_mut() {
            item.attach(client, parent);
        }
    }
}

impl<T: Resource> Resource for Option<T> {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        if let Some(item) = self {
            item.attach(client, parent);
        }
    }
}

impl Resource for () {}
impl Resource for serde_json::Value {}
impl<V> Resource for HashMap<String, V> {}
impl<V> Resource for BTreeMap<String, V> {}

/// HATEOAS link attached to most responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub method: String,
    #[serde(default, rename = "targetSchema", skip_serializing_if = "String::is_empty")]
    pub target_schema: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schema: String,
}

/// Fail with a `Validation` error when an identity field is empty.
pub fn require_id(kind: &str, field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{kind} requires a non-empty {field}")));
    }
    Ok(())
}

/// Characters escaped in a single path segment, matching the URL standard's
/// path-percent-encode set plus `/` and `%`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Escape an identifier for use as one path segment.
pub(crate) fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// The client an entity was fetched through.
pub(crate) fn attached<'a>(client: &'a Option<Client>, kind: &str) -> Result<&'a Client, ApiError> {
    client
        .as_ref()
        .ok_or_else(|| ApiError::Validation(format!("{kind} is not attached to a client")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_id_rejects_empty() {
        let err = require_id("campaign", "id", "").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "validation failed: campaign requires a non-empty id");
        assert!(require_id("campaign", "id", "42").is_ok());
    }

    #[test]
    fn detached_entity_has_no_client() {
        let err = attached(&None, "automation").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn link_reads_target_schema() {
        let link: Link = serde_json::from_str(
            r#"{"rel":"self","href":"https://x/3.0/lists","method":"GET","targetSchema":"https://x/schema.json"}"#,
        )
        .unwrap();
        assert_eq!(link.rel, "self");
        assert_eq!(link.target_schema, "https://x/schema.json");
        assert!(link.schema.is_empty());
    }

    #[test]
    fn segment_escapes_reserved_path_characters() {
        assert_eq!(segment("first?last#x@example.com"), "first%3Flast%23x@example.com");
        assert_eq!(segment("a/b%c d"), "a%2Fb%25c%20d");
        assert_eq!(segment("57afe96172"), "57afe96172");
    }
}
