use std::path::Path;

use ouroboros::self_referencing;
use redb::{Database, Range, ReadTransaction, ReadableDatabase, ReadableTable};

use crate::codec::{
    self, IndexOrder, decode_triple, encode_key, encode_key_raw, encode_store_prefix,
    encode_store_prefix_end, encode_triple, successor,
};
use crate::error::Result;
use crate::storage::schema::{TABLE_OPS, TABLE_OSP, TABLE_POS, TABLE_PSO, TABLE_SOP, TABLE_SPO};
use crate::storage::{Hexastore, HexastoreIter};
use crate::triple::{StoreId, Triple};

/// Persistent [`Hexastore`] backed by `redb`, the ordered key-value store
/// this crate treats as an external dependency (§1).
#[derive(Debug)]
pub struct DiskHexastore {
    db: Database,
}

impl DiskHexastore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Database::create(path)?;
        Self::init_tables(&db)?;
        Ok(Self { db })
    }

    fn init_tables(db: &Database) -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TABLE_SPO)?;
            let _ = write_txn.open_table(TABLE_SOP)?;
            let _ = write_txn.open_table(TABLE_PSO)?;
            let _ = write_txn.open_table(TABLE_POS)?;
            let _ = write_txn.open_table(TABLE_OSP)?;
            let _ = write_txn.open_table(TABLE_OPS)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn scan(&self, order: IndexOrder, start: Vec<u8>, end: Vec<u8>) -> Result<DiskCursor> {
        DiskCursor::create(&self.db, order, start, end)
    }
}

impl Hexastore for DiskHexastore {
    fn insert(&mut self, store: StoreId, triple: &Triple) -> Result<bool> {
        let payload = encode_triple(triple);
        let write_txn = self.db.begin_write()?;
        {
            let mut spo = write_txn.open_table(TABLE_SPO)?;
            let key = encode_key(IndexOrder::Spo, store, triple);
            if spo.get(key.as_slice())?.is_some() {
                return Ok(false);
            }
            spo.insert(key.as_slice(), payload.as_slice())?;

            for (order, table) in [
                (IndexOrder::Sop, TABLE_SOP),
                (IndexOrder::Pso, TABLE_PSO),
                (IndexOrder::Pos, TABLE_POS),
                (IndexOrder::Osp, TABLE_OSP),
                (IndexOrder::Ops, TABLE_OPS),
            ] {
                let mut t = write_txn.open_table(table)?;
                let key = encode_key(order, store, triple);
                t.insert(key.as_slice(), payload.as_slice())?;
            }
        }
        write_txn.commit()?;
        log::debug!("inserted triple into store {:?}", store.0);
        Ok(true)
    }

    fn remove(&mut self, store: StoreId, triple: &Triple) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let mut removed = false;
        {
            for (order, table) in [
                (IndexOrder::Spo, TABLE_SPO),
                (IndexOrder::Sop, TABLE_SOP),
                (IndexOrder::Pso, TABLE_PSO),
                (IndexOrder::Pos, TABLE_POS),
                (IndexOrder::Osp, TABLE_OSP),
                (IndexOrder::Ops, TABLE_OPS),
            ] {
                let mut t = write_txn.open_table(table)?;
                let key = encode_key(order, store, triple);
                if t.remove(key.as_slice())?.is_some() {
                    removed = true;
                }
            }
        }
        write_txn.commit()?;
        log::debug!("removed triple from store {:?} (existed: {removed})", store.0);
        Ok(removed)
    }

    fn s(&self, store: StoreId, subject: &str) -> HexastoreIter {
        let start = codec::encode_prefix_start(IndexOrder::Spo, store, subject, None);
        let end = codec::encode_prefix_end(IndexOrder::Spo, store, subject, None);
        boxed(self.scan(IndexOrder::Spo, start, end))
    }

    fn p(&self, store: StoreId, predicate: &str, continuation: Option<&Triple>) -> HexastoreIter {
        let end = codec::encode_prefix_end(IndexOrder::Pos, store, predicate, None);
        let start = match continuation {
            Some(t) => successor(&encode_key(IndexOrder::Pos, store, t)),
            None => codec::encode_prefix_start(IndexOrder::Pos, store, predicate, None),
        };
        boxed(self.scan(IndexOrder::Pos, start, end))
    }

    fn o(&self, store: StoreId, object: &str) -> HexastoreIter {
        let start = codec::encode_prefix_start(IndexOrder::Osp, store, object, None);
        let end = codec::encode_prefix_end(IndexOrder::Osp, store, object, None);
        boxed(self.scan(IndexOrder::Osp, start, end))
    }

    fn sp(&self, store: StoreId, subject: &str, predicate: &str) -> HexastoreIter {
        let start = codec::encode_prefix_start(IndexOrder::Spo, store, subject, Some(predicate));
        let end = codec::encode_prefix_end(IndexOrder::Spo, store, subject, Some(predicate));
        boxed(self.scan(IndexOrder::Spo, start, end))
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
        boxed(self.scan(IndexOrder::Pos, start, end))
    }

    fn exists(
        &self,
        store: StoreId,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<bool> {
        let key = encode_key_raw(IndexOrder::Spo, store, subject, predicate, object);
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TABLE_SPO)?;
        Ok(table.get(key.as_slice())?.is_some())
    }

    fn iter(&self, store: StoreId) -> HexastoreIter {
        let start = encode_store_prefix(IndexOrder::Spo, store);
        let end = encode_store_prefix_end(IndexOrder::Spo, store);
        boxed(self.scan(IndexOrder::Spo, start, end))
    }
}

fn boxed(cursor: Result<DiskCursor>) -> HexastoreIter {
    match cursor {
        Ok(cursor) => Box::new(cursor),
        Err(e) => Box::new(std::iter::once(Err(e))),
    }
}

#[self_referencing]
struct DiskCursor {
    txn: ReadTransaction,
    table: redb::ReadOnlyTable<&'static [u8], &'static [u8]>,
    #[borrows(table)]
    #[covariant]
    iter: Range<'this, &'static [u8], &'static [u8]>,
}

impl DiskCursor {
    fn create(db: &Database, order: IndexOrder, start: Vec<u8>, end: Vec<u8>) -> Result<Self> {
        let table_def = match order {
            IndexOrder::Spo => TABLE_SPO,
            IndexOrder::Sop => TABLE_SOP,
            IndexOrder::Pso => TABLE_PSO,
            IndexOrder::Pos => TABLE_POS,
            IndexOrder::Osp => TABLE_OSP,
            IndexOrder::Ops => TABLE_OPS,
        };
        let txn = db.begin_read()?;
        let table = txn.open_table(table_def)?;
        DiskCursorTryBuilder {
            txn,
            table,
            iter_builder: move |table| {
                table
                    .range(start.as_slice()..end.as_slice())
                    .map_err(crate::error::Error::from)
            },
        }
        .try_build()
    }
}

impl Iterator for DiskCursor {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        self.with_iter_mut(|iter| {
            iter.next().map(|entry| {
                let (_, value) = entry.map_err(crate::error::Error::from)?;
                decode_triple(value.value())
            })
        })
    }
}
