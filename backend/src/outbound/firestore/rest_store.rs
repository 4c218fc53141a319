//! Reqwest-backed Firestore `runQuery` adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{RunQueryRequestDto, RunQueryRowDto};
use crate::domain::ports::{DocumentStore, DocumentStoreError, StoredDocument};

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1/";
const DEFAULT_DATABASE: &str = "(default)";

/// Document store backed by the Firestore REST API.
pub struct FirestoreRestStore {
    client: Client,
    api_base: Url,
    project_id: String,
    access_token: Zeroizing<String>,
}

impl FirestoreRestStore {
    /// Build a store for `project_id`, authenticating with an OAuth access
    /// token.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        project_id: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DocumentStoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
        let api_base = Url::parse(FIRESTORE_API_BASE)
            .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
        Ok(Self {
            client,
            api_base,
            project_id: project_id.into(),
            access_token: Zeroizing::new(access_token.into()),
        })
    }

    fn run_query_url(&self) -> Result<Url, DocumentStoreError> {
        self.api_base
            .join(&format!(
                "projects/{}/databases/{DEFAULT_DATABASE}/documents:runQuery",
                self.project_id
            ))
            .map_err(|err| DocumentStoreError::query(format!("build runQuery URL: {err}")))
    }
}

#[async_trait]
impl DocumentStore for FirestoreRestStore {
    async fn query_equal(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let url = self.run_query_url()?;
        debug!(collection, field, "running Firestore equality query");

        let response = self
            .client
            .post(url)
            .bearer_auth(self.access_token.as_str())
            .json(&RunQueryRequestDto::field_equals(collection, field, value))
            .send()
            .await
            .map_err(|err| DocumentStoreError::connection(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
        if !status.is_success() {
            return Err(DocumentStoreError::query(format!(
                "status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body).trim()
            )));
        }

        parse_rows(&body)
    }
}

fn parse_rows(body: &[u8]) -> Result<Vec<StoredDocument>, DocumentStoreError> {
    let rows: Vec<RunQueryRowDto> = serde_json::from_slice(body)
        .map_err(|err| DocumentStoreError::decode(format!("invalid runQuery payload: {err}")))?;
    Ok(rows
        .into_iter()
        .filter_map(|row| row.document)
        .map(|document| document.into_domain())
        .collect())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Firestore helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn run_query_url_targets_default_database() {
        let store =
            FirestoreRestStore::new("pr-system", "token", Duration::from_secs(5)).expect("store");
        assert_eq!(
            store.run_query_url().expect("url").as_str(),
            "https://firestore.googleapis.com/v1/projects/pr-system/databases/(default)/documents:runQuery"
        );
    }

    #[rstest]
    fn rows_without_documents_are_skipped() {
        let body = br#"[
            {"readTime": "2024-01-05T00:00:00Z"},
            {"document": {"name": "projects/p/databases/(default)/documents/c/a",
                          "fields": {"code": {"stringValue": "A1"}}},
             "readTime": "2024-01-05T00:00:00Z"}
        ]"#;
        let documents = parse_rows(body).expect("rows decode");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "a");
        assert_eq!(documents[0].string_field("code"), Some("A1"));
    }

    #[rstest]
    fn malformed_payloads_are_decode_errors() {
        let err = parse_rows(b"{}").expect_err("object is not a row list");
        assert!(matches!(err, DocumentStoreError::Decode { .. }));
    }
}
