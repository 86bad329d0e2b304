use crate::error::StoreError;
use crate::{DocId, Document};
use std::sync::Arc;

/// Append-only mapping from id to document. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Arc<Document>>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> Result<DocId, StoreError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(StoreError::NoContent);
        }
        let id = self.docs.len() as DocId + 1;
        self.docs.push(Arc::new(Document { id, name: name.into(), content }));
        Ok(id)
    }

    pub fn get(&self, id: DocId) -> Result<Arc<Document>, StoreError> {
        (id as usize)
            .checked_sub(1)
            .and_then(|i| self.docs.get(i))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Documents in insertion order.
    pub fn all(&self) -> &[Arc<Document>] { &self.docs }

    /// Cheap clone of the current document handles, safe to use after the lock is released.
    pub fn snapshot(&self) -> Vec<Arc<Document>> { self.docs.clone() }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}
