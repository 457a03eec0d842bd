//! Persistence boundary.
//!
//! The engine never touches storage directly: it fetches a snapshot
//! immediately before applying a batch and commits immediately after,
//! via this trait. Detecting conflicting concurrent writers is the
//! store's concern (e.g. optimistic versioning over
//! [`crate::hashing::document_fingerprint`]); the engine's contract is
//! only: one snapshot in, one deterministic result out.

use std::collections::BTreeMap;

use cvdoc_schema::Document;

/// Opaque, synchronous document storage as the engine sees it.
pub trait DocumentStore {
    fn get(&self, id: &str) -> Option<Document>;
    fn set(&mut self, id: &str, document: Document);
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, document: Document) {
        self.documents.insert(id.into(), document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &str) -> Option<Document> {
        self.documents.get(id).cloned()
    }

    fn set(&mut self, id: &str, document: Document) {
        self.documents.insert(id.to_string(), document);
    }
}
