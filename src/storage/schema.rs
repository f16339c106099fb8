#![cfg(not(target_arch = "wasm32"))]

use redb::TableDefinition;

pub const TABLE_SPO: TableDefinition<&[u8], &[u8]> = TableDefinition::new("spo");
pub const TABLE_SOP: TableDefinition<&[u8], &[u8]> = TableDefinition::new("sop");
pub const TABLE_PSO: TableDefinition<&[u8], &[u8]> = TableDefinition::new("pso");
pub const TABLE_POS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("pos");
pub const TABLE_OSP: TableDefinition<&[u8], &[u8]> = TableDefinition::new("osp");
pub const TABLE_OPS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("ops");
