#[cfg(not(target_arch = "wasm32"))]
use crate::config::Options;
use crate::error::Result;
use crate::triple::{StoreId, Triple};

#[cfg(not(target_arch = "wasm32"))]
pub mod disk;
pub mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub mod schema;

/// A lazy sequence of stored triples. Decode failures are not swallowed:
/// a corrupt record surfaces as `Err(Error::CorruptTriple)` from `next()`
/// rather than being skipped (§7).
pub type HexastoreIter = Box<dyn Iterator<Item = Result<Triple>>>;

/// Unified interface implemented by every concrete storage backend.
///
/// Each read primitive corresponds to one row of the table in spec §4.3;
/// the implementation picks whichever of the six index permutations most
/// tightly bounds the requested scan.
pub trait Hexastore: Send {
    /// Writes `triple` to all six indices in a single atomic batch.
    /// Returns `false` if the triple already existed (a no-op, matching
    /// the idempotence required of `insert` in §6).
    fn insert(&mut self, store: StoreId, triple: &Triple) -> Result<bool>;

    /// Removes `triple` from all six indices in a single atomic batch.
    /// Returns `false` if the triple was not present.
    fn remove(&mut self, store: StoreId, triple: &Triple) -> Result<bool>;

    /// Triples with `subject = subject`, ordered by `(predicate, object)`.
    fn s(&self, store: StoreId, subject: &str) -> HexastoreIter;

    /// Triples with `predicate = predicate`, ordered by `(object, subject)`.
    /// `continuation`, if set, restricts the scan to triples strictly
    /// greater than it in this index's order.
    fn p(&self, store: StoreId, predicate: &str, continuation: Option<&Triple>) -> HexastoreIter;

    /// Triples with `object.raw_string = object`, ordered by
    /// `(subject, predicate)`.
    fn o(&self, store: StoreId, object: &str) -> HexastoreIter;

    /// Triples with `subject = subject ∧ predicate = predicate`, ordered
    /// by `object`.
    fn sp(&self, store: StoreId, subject: &str, predicate: &str) -> HexastoreIter;

    /// Triples with `predicate = predicate ∧ object.raw_string = object`,
    /// ordered by `subject`. `continuation` restricts the scan to triples
    /// strictly greater than it in the `POS` order.
    fn po(
        &self,
        store: StoreId,
        predicate: &str,
        object: &str,
        continuation: Option<&Triple>,
    ) -> HexastoreIter;

    /// Membership test for an exact triple.
    fn exists(&self, store: StoreId, subject: &str, predicate: &str, object: &str)
    -> Result<bool>;

    /// All triples in `store`, in `SPO` order.
    fn iter(&self, store: StoreId) -> HexastoreIter;
}

/// Instantiates the default storage backend for the current target, at
/// the path named by `options`.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_store(options: &Options) -> Result<Box<dyn Hexastore>> {
    Ok(Box::new(disk::DiskHexastore::open(options.path())?))
}

/// Instantiates the in-memory storage backend (used on `wasm32` and by
/// tests and callers that do not need persistence).
pub fn open_memory_store() -> Box<dyn Hexastore> {
    Box::new(memory::MemoryHexastore::new())
}
