//! The Graph facade (§4.4): a single handle over the Index Layer,
//! parameterized by `store_id`, so callers never choose an index
//! permutation themselves.

#[cfg(not(target_arch = "wasm32"))]
use crate::config::Options;
use crate::error::Result;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::storage::Hexastore;
use crate::triple::{StoreId, Triple};

/// Aggregates a [`Hexastore`] under one `store_id`.
pub struct Graph {
    store: Box<dyn Hexastore>,
    store_id: StoreId,
    default_page_size: usize,
}

impl Graph {
    pub fn new(store: Box<dyn Hexastore>, store_id: StoreId) -> Self {
        Graph {
            store,
            store_id,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Opens a persistent graph at the path `options` names, under
    /// [`StoreId::DEFAULT`], defaulting unpaginated queries to
    /// `options.default_page_size()`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(options: &Options) -> Result<Self> {
        let store = crate::storage::open_store(options)?;
        Ok(Graph {
            store,
            store_id: StoreId::DEFAULT,
            default_page_size: options.default_page_size(),
        })
    }

    pub fn with_default_page_size(mut self, default_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    pub fn insert(&mut self, triple: &Triple) -> Result<bool> {
        self.store.insert(self.store_id, triple)
    }

    pub fn remove(&mut self, triple: &Triple) -> Result<bool> {
        self.store.remove(self.store_id, triple)
    }

    pub fn s(&self, subject: &str) -> impl Iterator<Item = Result<Triple>> {
        self.store.s(self.store_id, subject)
    }

    pub fn p(
        &self,
        predicate: &str,
        continuation: Option<&Triple>,
    ) -> impl Iterator<Item = Result<Triple>> {
        self.store.p(self.store_id, predicate, continuation)
    }

    pub fn o(&self, object: &str) -> impl Iterator<Item = Result<Triple>> {
        self.store.o(self.store_id, object)
    }

    pub fn sp(&self, subject: &str, predicate: &str) -> impl Iterator<Item = Result<Triple>> {
        self.store.sp(self.store_id, subject, predicate)
    }

    pub fn po(
        &self,
        predicate: &str,
        object: &str,
        continuation: Option<&Triple>,
    ) -> impl Iterator<Item = Result<Triple>> {
        self.store.po(self.store_id, predicate, object, continuation)
    }

    pub fn exists(&self, subject: &str, predicate: &str, object: &str) -> Result<bool> {
        self.store.exists(self.store_id, subject, predicate, object)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Triple>> {
        self.store.iter(self.store_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::open_memory_store;

    #[test]
    fn facade_forwards_to_store() {
        let mut graph = Graph::new(open_memory_store(), StoreId::DEFAULT);
        graph.insert(&Triple::literal("a1", "name", "Alice")).unwrap();
        let found: Vec<_> = graph.s("a1").collect::<Result<_>>().unwrap();
        assert_eq!(found.len(), 1);
    }
}
