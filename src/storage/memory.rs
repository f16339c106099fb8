use std::collections::BTreeMap;
use std::ops::Range as StdRange;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use ouroboros::self_referencing;

use crate::codec::{self, IndexOrder, decode_triple, encode_key, encode_key_raw, encode_triple, successor};
use crate::error::Result;
use crate::storage::{Hexastore, HexastoreIter};
use crate::triple::{StoreId, Triple};

type Table = BTreeMap<Vec<u8>, Vec<u8>>;

/// The six index permutations, guarded by a single lock so a write
/// touches all of them under one critical section (§5).
#[derive(Debug, Default)]
struct Tables {
    spo: Table,
    sop: Table,
    pso: Table,
    pos: Table,
    osp: Table,
    ops: Table,
}

impl Tables {
    fn get(&self, order: IndexOrder) -> &Table {
        match order {
            IndexOrder::Spo => &self.spo,
            IndexOrder::Sop => &self.sop,
            IndexOrder::Pso => &self.pso,
            IndexOrder::Pos => &self.pos,
            IndexOrder::Osp => &self.osp,
            IndexOrder::Ops => &self.ops,
        }
    }

    fn get_mut(&mut self, order: IndexOrder) -> &mut Table {
        match order {
            IndexOrder::Spo => &mut self.spo,
            IndexOrder::Sop => &mut self.sop,
            IndexOrder::Pso => &mut self.pso,
            IndexOrder::Pos => &mut self.pos,
            IndexOrder::Osp => &mut self.osp,
            IndexOrder::Ops => &mut self.ops,
        }
    }
}

type Shared = Arc<RwLock<Tables>>;

/// In-memory [`Hexastore`]: six ordered maps behind a single `RwLock`, used
/// on `wasm32` (where `redb`'s memory-mapped files are unavailable) and by
/// callers/tests that do not need persistence.
///
/// All six maps share one lock rather than one lock each, so a writer
/// holds a single critical section across the whole six-index update and
/// a reader can never observe a partial write (§5).
#[derive(Debug, Default)]
pub struct MemoryHexastore {
    tables: Shared,
}

impl MemoryHexastore {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(&self, order: IndexOrder, start: Vec<u8>, end: Vec<u8>) -> HexastoreIter {
        Box::new(MemoryCursor::create(Arc::clone(&self.tables), order, start..end))
    }
}

impl Hexastore for MemoryHexastore {
    fn insert(&mut self, store: StoreId, triple: &Triple) -> Result<bool> {
        let payload = encode_triple(triple);
        let mut tables = self.tables.write().unwrap();

        let spo_key = encode_key(IndexOrder::Spo, store, triple);
        if tables.spo.contains_key(&spo_key) {
            return Ok(false);
        }
        tables.spo.insert(spo_key, payload.clone());
        for order in [
            IndexOrder::Sop,
            IndexOrder::Pso,
            IndexOrder::Pos,
            IndexOrder::Osp,
            IndexOrder::Ops,
        ] {
            let key = encode_key(order, store, triple);
            tables.get_mut(order).insert(key, payload.clone());
        }
        Ok(true)
    }

    fn remove(&mut self, store: StoreId, triple: &Triple) -> Result<bool> {
        let mut removed = false;
        let mut tables = self.tables.write().unwrap();
        for order in IndexOrder::ALL {
            let key = encode_key(order, store, triple);
            if tables.get_mut(order).remove(&key).is_some() {
                removed = true;
            }
        }
        Ok(removed)
    }

    fn s(&self, store: StoreId, subject: &str) -> HexastoreIter {
        let start = codec::encode_prefix_start(IndexOrder::Spo, store, subject, None);
        let end = codec::encode_prefix_end(IndexOrder::Spo, store, subject, None);
        self.scan(IndexOrder::Spo, start, end)
    }

    fn p(&self, store: StoreId, predicate: &str, continuation: Option<&Triple>) -> HexastoreIter {
        let end = codec::encode_prefix_end(IndexOrder::Pos, store, predicate, None);
        let start = match continuation {
            Some(t) => successor(&encode_key(IndexOrder::Pos, store, t)),
            None => codec::encode_prefix_start(IndexOrder::Pos, store, predicate, None),
        };
        self.scan(IndexOrder::Pos, start, end)
    }

    fn o(&self, store: StoreId, object: &str) -> HexastoreIter {
        let start = codec::encode_prefix_start(IndexOrder::Osp, store, object, None);
        let end = codec::encode_prefix_end(IndexOrder::Osp, store, object, None);
        self.scan(IndexOrder::Osp, start, end)
    }

    fn sp(&self, store: StoreId, subject: &str, predicate: &str) -> HexastoreIter {
        let start = codec::encode_prefix_start(IndexOrder::Spo, store, subject, Some(predicate));
        let end = codec::encode_prefix_end(IndexOrder::Spo, store, subject, Some(predicate));
        self.scan(IndexOrder::Spo, start, end)
    }

    fn po(
        &self,
        store: StoreId,
        predicate: &str,
        object: &str,
        continuation: Option<&Triple>,
    ) -> HexastoreIter {
        let end = codec::encode_prefix_end(IndexOrder::Pos, store, predicate, Some(object));
        let start = match continuation {
            Some(t) => successor(&encode_key(IndexOrder::Pos, store, t)),
            None => codec::encode_prefix_start(IndexOrder::Pos, store, predicate, Some(object)),
        };
        self.scan(IndexOrder::Pos, start, end)
    }

    fn exists(
        &self,
        store: StoreId,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<bool> {
        let key = encode_key_raw(IndexOrder::Spo, store, subject, predicate, object);
        Ok(self.tables.read().unwrap().spo.contains_key(&key))
    }

    fn iter(&self, store: StoreId) -> HexastoreIter {
        let start = codec::encode_store_prefix(IndexOrder::Spo, store);
        let end = codec::encode_store_prefix_end(IndexOrder::Spo, store);
        self.scan(IndexOrder::Spo, start, end)
    }
}

#[self_referencing]
struct MemoryCursor {
    tables: Shared,
    #[borrows(tables)]
    #[covariant]
    guard: RwLockReadGuard<'this, Tables>,
    #[borrows(guard)]
    #[covariant]
    iter: std::collections::btree_map::Range<'this, Vec<u8>, Vec<u8>>,
}

impl MemoryCursor {
    fn create(tables: Shared, order: IndexOrder, bounds: StdRange<Vec<u8>>) -> Self {
        MemoryCursorBuilder {
            tables,
            guard_builder: |t| t.read().unwrap(),
            iter_builder: move |guard| guard.get(order).range(bounds.clone()),
        }
        .build()
    }
}

impl Iterator for MemoryCursor {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        self.with_iter_mut(|iter| iter.next().map(|(_, value)| decode_triple(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::literal(s, p, o)
    }

    #[test]
    fn inserts_and_exact_match() {
        let mut store = MemoryHexastore::new();
        let t = triple("a1", "name", "Alice");
        assert!(store.insert(StoreId::DEFAULT, &t).unwrap());
        assert!(!store.insert(StoreId::DEFAULT, &t).unwrap());
        assert!(
            store
                .exists(StoreId::DEFAULT, "a1", "name", "Alice")
                .unwrap()
        );
    }

    #[test]
    fn remove_clears_all_six_indices() {
        let mut store = MemoryHexastore::new();
        let t = triple("a1", "name", "Alice");
        store.insert(StoreId::DEFAULT, &t).unwrap();
        assert!(store.remove(StoreId::DEFAULT, &t).unwrap());
        assert!(
            !store
                .exists(StoreId::DEFAULT, "a1", "name", "Alice")
                .unwrap()
        );
        let tables = store.tables.read().unwrap();
        for order in IndexOrder::ALL {
            let key = encode_key(order, StoreId::DEFAULT, &t);
            assert!(!tables.get(order).contains_key(&key));
        }
    }

    #[test]
    fn subject_and_object_scans_cover_respective_indices() {
        let mut store = MemoryHexastore::new();
        store
            .insert(StoreId::DEFAULT, &triple("a1", "name", "Alice"))
            .unwrap();
        store
            .insert(StoreId::DEFAULT, &triple("a1", "age", "30"))
            .unwrap();
        store
            .insert(StoreId::DEFAULT, &triple("a2", "name", "Alice"))
            .unwrap();

        let by_subject: Vec<_> = store
            .s(StoreId::DEFAULT, "a1")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(by_subject.len(), 2);

        let by_object: Vec<_> = store
            .o(StoreId::DEFAULT, "Alice")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(by_object.len(), 2);
    }

    #[test]
    fn full_iteration_yields_all_triples() {
        let mut store = MemoryHexastore::new();
        for i in 0..5 {
            store
                .insert(StoreId::DEFAULT, &triple(&format!("s{i}"), "p", "o"))
                .unwrap();
        }
        let collected: Vec<_> = store
            .iter(StoreId::DEFAULT)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(collected.len(), 5);
    }
}
