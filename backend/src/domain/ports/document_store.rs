//! Driven port for equality queries against the external document store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

/// Document returned from a store query.
///
/// Field values are decoded into plain JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredDocument {
    /// Document identifier within its collection.
    pub id: String,
    /// Decoded fields keyed by name.
    pub fields: BTreeMap<String, Value>,
}

impl StoredDocument {
    /// String value of `name`, if present and textual.
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

define_port_error! {
    /// Errors raised while querying the document store.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// The store rejected or failed the query.
        Query { message: String } => "document store query failed: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "document store response decode failed: {message}",
    }
}

/// Port for field-equality lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return documents in `collection` whose `field` equals `value`.
    async fn query_equal(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError>;
}
