//! One-shot lookup of reference documents by country.
//!
//! Operators run this against production data to list which organisations
//! are registered for a country. There is no retry or pagination: whatever
//! the store returns for a single query is printed.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{DocumentStore, DocumentStoreError, StoredDocument};

/// Collection queried by the maintenance script.
pub const COUNTRY_COLLECTION: &str = "referenceData_organizations";
/// Field compared for equality.
pub const COUNTRY_FIELD: &str = "country";
/// Value the field must equal.
pub const COUNTRY_VALUE: &str = "Lesotho";

/// Printable summary of a matching document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: String,
    pub name: Option<String>,
    pub code: Option<String>,
}

impl From<&StoredDocument> for DocumentSummary {
    fn from(document: &StoredDocument) -> Self {
        Self {
            id: document.id.clone(),
            name: document.string_field("name").map(str::to_owned),
            code: document.string_field("code").map(str::to_owned),
        }
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.id,
            self.name.as_deref().unwrap_or("-"),
            self.code.as_deref().unwrap_or("-")
        )
    }
}

/// Runs the fixed country query against a document store.
pub struct CountryDocumentsQuery<D> {
    store: Arc<D>,
}

impl<D> CountryDocumentsQuery<D>
where
    D: DocumentStore,
{
    /// Create a query over `store`.
    pub fn new(store: Arc<D>) -> Self {
        Self { store }
    }

    /// Summaries of every document whose country matches.
    ///
    /// # Errors
    ///
    /// Propagates any [`DocumentStoreError`]; callers are expected to abort.
    pub async fn run(&self) -> Result<Vec<DocumentSummary>, DocumentStoreError> {
        let documents = self
            .store
            .query_equal(COUNTRY_COLLECTION, COUNTRY_FIELD, COUNTRY_VALUE)
            .await?;
        debug!(
            collection = COUNTRY_COLLECTION,
            matches = documents.len(),
            "country query complete"
        );
        Ok(documents.iter().map(DocumentSummary::from).collect())
    }
}
