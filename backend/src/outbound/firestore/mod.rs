//! Firestore REST adapter for the document-store port.

mod credentials;
mod dto;
mod rest_store;

pub use credentials::{ServiceAccountKey, ServiceAccountKeyError};
pub use rest_store::FirestoreRestStore;
