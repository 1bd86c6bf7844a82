mod in_memory;
mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{DocumentStore, DocumentWrite, StoreError};
