//! Infrastructure layer: the document-store boundary and external service
//! adapters.
//!
//! The engine core never talks to a concrete database; it goes through the
//! [`document_store::DocumentStore`] trait, which models the external
//! document database as typed full-document reads, simple equality queries,
//! and an atomic multi-document `commit`.

pub mod auth_provider;
pub mod document_store;
pub mod join_code;

pub use auth_provider::{AuthProvider, Principal, StaticAuthProvider};
pub use document_store::{DocumentStore, DocumentWrite, InMemoryDocumentStore, StoreError};
pub use join_code::generate_join_code;
