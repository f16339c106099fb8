//! Binary triple encoding: the value payload (§4.2) and the six index key
//! permutations built on top of it (§3, §4.3).

use crate::error::{Error, Result};
use crate::triple::{StoreId, Triple};
use crate::value::{TypeTag, TypedValue};

const DELIM: u8 = 0x00;

/// One of the six orderings a triple's components can be projected into
/// for use as an index-key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrder {
    Spo,
    Sop,
    Pso,
    Pos,
    Osp,
    Ops,
}

impl IndexOrder {
    pub const ALL: [IndexOrder; 6] = [
        IndexOrder::Spo,
        IndexOrder::Sop,
        IndexOrder::Pso,
        IndexOrder::Pos,
        IndexOrder::Osp,
        IndexOrder::Ops,
    ];

    fn order_byte(self) -> u8 {
        match self {
            IndexOrder::Spo => 0,
            IndexOrder::Sop => 1,
            IndexOrder::Pso => 2,
            IndexOrder::Pos => 3,
            IndexOrder::Osp => 4,
            IndexOrder::Ops => 5,
        }
    }

    /// Projects a triple's three components into this order's (part1,
    /// part2, part3) layout.
    fn parts<'a>(self, triple: &'a Triple) -> (&'a str, &'a str, &'a str) {
        self.parts_raw(
            triple.subject.as_str(),
            triple.predicate.as_str(),
            triple.object.raw_string.as_str(),
        )
    }

    /// Same projection as [`IndexOrder::parts`], taking the raw
    /// subject/predicate/object strings directly (no [`TypedValue`]
    /// needed, since only `raw_string` ever feeds a key).
    fn parts_raw<'a>(self, s: &'a str, p: &'a str, o: &'a str) -> (&'a str, &'a str, &'a str) {
        match self {
            IndexOrder::Spo => (s, p, o),
            IndexOrder::Sop => (s, o, p),
            IndexOrder::Pso => (p, s, o),
            IndexOrder::Pos => (p, o, s),
            IndexOrder::Osp => (o, s, p),
            IndexOrder::Ops => (o, p, s),
        }
    }
}

fn canonical_ok(s: &str) -> bool {
    !s.as_bytes().contains(&DELIM)
}

/// Encodes a full index key: `order_byte ‖ store_id ‖ delim ‖ part1 ‖
/// delim ‖ part2 ‖ delim ‖ part3`.
pub fn encode_key(order: IndexOrder, store: StoreId, triple: &Triple) -> Vec<u8> {
    let (p1, p2, p3) = order.parts(triple);
    debug_assert!(canonical_ok(p1) && canonical_ok(p2) && canonical_ok(p3));
    encode_key_parts(order, store, p1, p2, p3)
}

/// Encodes a full index key directly from raw subject/predicate/object
/// text, without needing a [`Triple`] (used for exact-match lookups where
/// the object's type tag and `is_id` flag are irrelevant to the key).
pub fn encode_key_raw(order: IndexOrder, store: StoreId, s: &str, p: &str, o: &str) -> Vec<u8> {
    let (p1, p2, p3) = order.parts_raw(s, p, o);
    encode_key_parts(order, store, p1, p2, p3)
}

fn encode_key_parts(order: IndexOrder, store: StoreId, p1: &str, p2: &str, p3: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 4 + 3 + p1.len() + p2.len() + p3.len());
    buf.push(order.order_byte());
    buf.extend_from_slice(&store.0.to_le_bytes());
    buf.push(DELIM);
    buf.extend_from_slice(p1.as_bytes());
    buf.push(DELIM);
    buf.extend_from_slice(p2.as_bytes());
    buf.push(DELIM);
    buf.extend_from_slice(p3.as_bytes());
    buf
}

/// The common byte prefix shared by every key fixing `part1` (and
/// optionally `part2`) in `order`, over `store`. Every matching key starts
/// with this prefix and nothing else does, since parts never contain the
/// delimiter byte.
fn encode_prefix(order: IndexOrder, store: StoreId, part1: &str, part2: Option<&str>) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(1 + 4 + 2 + part1.len() + part2.map_or(0, str::len));
    prefix.push(order.order_byte());
    prefix.extend_from_slice(&store.0.to_le_bytes());
    prefix.push(DELIM);
    prefix.extend_from_slice(part1.as_bytes());
    prefix.push(DELIM);
    if let Some(p2) = part2 {
        prefix.extend_from_slice(p2.as_bytes());
        prefix.push(DELIM);
    }
    prefix
}

/// Encodes the inclusive lower bound of a prefix scan fixing `part1` (and
/// optionally `part2`) in `order`, over `store`.
pub fn encode_prefix_start(
    order: IndexOrder,
    store: StoreId,
    part1: &str,
    part2: Option<&str>,
) -> Vec<u8> {
    encode_prefix(order, store, part1, part2)
}

/// Encodes the exclusive upper bound for a prefix scan fixing `part1` (and
/// optionally `part2`): the start bound with its final byte bumped, so
/// every key sharing that prefix sorts strictly below it.
pub fn encode_prefix_end(
    order: IndexOrder,
    store: StoreId,
    part1: &str,
    part2: Option<&str>,
) -> Vec<u8> {
    let mut prefix = encode_prefix(order, store, part1, part2);
    bump_last_byte(&mut prefix);
    prefix
}

fn bump_last_byte(buf: &mut Vec<u8>) {
    for i in (0..buf.len()).rev() {
        if buf[i] != 0xFF {
            buf[i] += 1;
            buf.truncate(i + 1);
            return;
        }
    }
    buf.push(0xFF);
}

/// The inclusive lower bound covering every key for `store` in `order`,
/// regardless of any triple component. Used for unconstrained full scans.
pub fn encode_store_prefix(order: IndexOrder, store: StoreId) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5);
    buf.push(order.order_byte());
    buf.extend_from_slice(&store.0.to_le_bytes());
    buf
}

/// The exclusive upper bound matching [`encode_store_prefix`].
pub fn encode_store_prefix_end(order: IndexOrder, store: StoreId) -> Vec<u8> {
    let mut buf = encode_store_prefix(order, store);
    bump_last_byte(&mut buf);
    buf
}

/// The exclusive-lower-bound key used to honor a continuation: the
/// smallest key strictly greater than `key`.
pub fn successor(key: &[u8]) -> Vec<u8> {
    let mut v = key.to_vec();
    v.push(0);
    v
}

fn write_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

fn read_field<'a>(buf: &'a [u8], cursor: &mut usize) -> Result<&'a [u8]> {
    if buf.len() < *cursor + 4 {
        return Err(Error::CorruptTriple("truncated length prefix"));
    }
    let len = u32::from_le_bytes(buf[*cursor..*cursor + 4].try_into().unwrap()) as usize;
    *cursor += 4;
    if buf.len() < *cursor + len {
        return Err(Error::CorruptTriple("field length overruns buffer"));
    }
    let field = &buf[*cursor..*cursor + len];
    *cursor += len;
    Ok(field)
}

/// Encodes a triple into its self-describing value payload: five
/// length-prefixed fields (subject, predicate, is_id, type_tag, object
/// raw_string).
pub fn encode_triple(triple: &Triple) -> Vec<u8> {
    let mut buf = Vec::new();
    write_field(&mut buf, triple.subject.as_bytes());
    write_field(&mut buf, triple.predicate.as_bytes());
    write_field(&mut buf, &[triple.object.is_id as u8]);
    write_field(&mut buf, &(triple.object.type_tag as u16).to_le_bytes());
    write_field(&mut buf, triple.object.raw_string.as_bytes());
    buf
}

/// Decodes a value payload produced by [`encode_triple`]. Fails with
/// [`Error::CorruptTriple`] if any length overruns the buffer, a field is
/// not valid UTF-8, `is_id` is not 0/1, or the type tag is unknown.
pub fn decode_triple(bytes: &[u8]) -> Result<Triple> {
    let mut cursor = 0usize;
    let subject = read_field(bytes, &mut cursor)?;
    let predicate = read_field(bytes, &mut cursor)?;
    let is_id = read_field(bytes, &mut cursor)?;
    let type_tag = read_field(bytes, &mut cursor)?;
    let raw_string = read_field(bytes, &mut cursor)?;

    let subject =
        std::str::from_utf8(subject).map_err(|_| Error::CorruptTriple("subject not utf-8"))?;
    let predicate =
        std::str::from_utf8(predicate).map_err(|_| Error::CorruptTriple("predicate not utf-8"))?;
    let raw_string = std::str::from_utf8(raw_string)
        .map_err(|_| Error::CorruptTriple("object raw_string not utf-8"))?;

    let is_id = match is_id {
        [0] => false,
        [1] => true,
        _ => return Err(Error::CorruptTriple("is_id byte not 0 or 1")),
    };
    let type_tag = match type_tag {
        [lo, hi] => TypeTag::from_u16(u16::from_le_bytes([*lo, *hi]))
            .ok_or(Error::CorruptTriple("unknown type tag"))?,
        _ => return Err(Error::CorruptTriple("type tag not 2 bytes")),
    };

    Ok(Triple {
        subject: subject.to_owned(),
        predicate: predicate.to_owned(),
        object: TypedValue {
            raw_string: raw_string.to_owned(),
            type_tag,
            is_id,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let t = Triple::edge("a1", "knows", "a2");
        let bytes = encode_triple(&t);
        let back = decode_triple(&bytes).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn roundtrip_literal_with_type() {
        let t = Triple::literal("a1", "age", "30");
        let bytes = encode_triple(&t);
        let back = decode_triple(&bytes).unwrap();
        assert_eq!(t, back);
        assert_eq!(back.object.type_tag, TypeTag::Integer);
    }

    #[test]
    fn decode_rejects_truncated_buffer() {
        let t = Triple::literal("a1", "age", "30");
        let mut bytes = encode_triple(&t);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(decode_triple(&bytes), Err(Error::CorruptTriple(_))));
    }

    #[test]
    fn decode_rejects_unknown_type_tag() {
        let t = Triple::literal("a1", "age", "30");
        let bytes = encode_triple(&t);
        // raw_string field (4-byte len + "30") trails the 2-byte type tag field.
        let raw_field_len = 4 + t.object.raw_string.len();
        let tag_pos = bytes.len() - raw_field_len - 2;
        let mut bytes = bytes;
        bytes[tag_pos] = 0xFF;
        bytes[tag_pos + 1] = 0xFF;
        assert!(matches!(decode_triple(&bytes), Err(Error::CorruptTriple(_))));
    }

    #[test]
    fn keys_sort_by_fixed_prefix_then_final_part() {
        let store = StoreId::DEFAULT;
        let t1 = Triple::literal("a1", "type", "T");
        let t2 = Triple::literal("a2", "type", "T");
        let k1 = encode_key(IndexOrder::Pos, store, &t1);
        let k2 = encode_key(IndexOrder::Pos, store, &t2);
        assert!(k1 < k2);
    }

    #[test]
    fn prefix_bounds_contain_only_matching_keys() {
        let store = StoreId::DEFAULT;
        let matching = Triple::literal("a1", "type", "T");
        let other_pred = Triple::literal("a1", "name", "T");
        let start = encode_prefix_start(IndexOrder::Pos, store, "type", None);
        let end = encode_prefix_end(IndexOrder::Pos, store, "type", None);
        let k_match = encode_key(IndexOrder::Pos, store, &matching);
        let k_other = encode_key(IndexOrder::Pos, store, &other_pred);
        assert!(k_match >= start && k_match < end);
        assert!(!(k_other >= start && k_other < end));
    }
}
