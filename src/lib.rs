//! A persistent SPO triple store with six-way indexing and an object-query
//! executor.
//!
//! [`Graph`] is the entry point: it wraps a [`storage::Hexastore`] backend
//! (either `redb`-backed persistence, opened via [`Options`] and
//! [`Graph::open`], or the in-memory backend via
//! [`storage::open_memory_store`]) under a single [`StoreId`], and
//! [`query::execute`] runs an [`ObjectQueryModel`] against it.

mod codec;
mod config;
mod error;
mod graph;
mod query;
mod storage;
mod triple;
mod value;

pub use config::Options;
pub use error::{Error, Result};
pub use graph::Graph;
pub use query::{execute, LinkQuery, ObjectQueryModel, ObjectQueryResponse, QueryUnit, DEFAULT_PAGE_SIZE};
pub use storage::Hexastore;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::open_store;
pub use storage::open_memory_store;
pub use triple::{StoreId, Triple};
pub use value::{Comparison, TypeTag, TypedValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_insert_and_query() {
        let mut graph = Graph::new(open_memory_store(), StoreId::DEFAULT);
        graph.insert(&Triple::literal("a1", "name", "Alice")).unwrap();
        graph.insert(&Triple::literal("a1", "age", "30")).unwrap();

        let query = ObjectQueryModel::new().with_filter(
            "name",
            QueryUnit::new("eq", TypedValue::from_raw("Alice")),
        );
        let response = execute(&graph, &query).unwrap();
        assert_eq!(response.values.len(), 1);
        assert_eq!(response.values[0].subject, "a1");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn disk_store_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let options = Options::new(tmp.path().join("hexastore.redb"));
        {
            let mut graph = Graph::open(&options).unwrap();
            graph.insert(&Triple::literal("a1", "name", "Alice")).unwrap();
        }
        let graph = Graph::open(&options).unwrap();
        assert!(graph.exists("a1", "name", "Alice").unwrap());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn options_default_page_size_flows_into_graph() {
        let tmp = tempfile::tempdir().unwrap();
        let options = Options::new(tmp.path().join("hexastore.redb")).with_default_page_size(7);
        let graph = Graph::open(&options).unwrap();
        assert_eq!(graph.default_page_size(), 7);
    }
}
