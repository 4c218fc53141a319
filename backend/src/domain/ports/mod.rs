//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod callable_function;
mod document_store;
mod identity_store;
mod navigator;
mod session;

#[cfg(test)]
pub use callable_function::MockCallableFunction;
pub use callable_function::{CallableFunction, CallableFunctionError};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError, StoredDocument};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, InMemoryIdentityStore};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{Navigator, RecordingNavigator};
#[cfg(test)]
pub use session::{MockAuthService, MockPageReloader, MockSessionStateStore};
pub use session::{AuthService, AuthServiceError, PageReloader, SessionStateStore};
