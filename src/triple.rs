//! The triple record: the atomic unit of storage and query.

use serde::{Deserialize, Serialize};

use crate::value::TypedValue;

/// Identifies the logically isolated graph a triple belongs to.
///
/// Stores are multiplexed by key prefix (§3); a single process may hold
/// many stores over the same underlying `Hexastore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoreId(pub u32);

impl StoreId {
    pub const DEFAULT: StoreId = StoreId(0);
}

impl Default for StoreId {
    fn default() -> Self {
        StoreId::DEFAULT
    }
}

/// An immutable subject-predicate-object record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: TypedValue,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: TypedValue) -> Self {
        Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// Convenience constructor for a literal-valued triple; the object's
    /// type is inferred from `object` via [`TypedValue::from_raw`].
    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Triple::new(subject, predicate, TypedValue::from_raw(object.into()))
    }

    /// Convenience constructor for a graph edge: an object that names
    /// another subject.
    pub fn edge(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Triple::new(subject, predicate, TypedValue::id(object.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_infers_object_type() {
        let t = Triple::literal("a1", "age", "30");
        assert_eq!(t.object.raw_string, "30");
        assert!(!t.object.is_id);
    }

    #[test]
    fn edge_marks_is_id() {
        let t = Triple::edge("a1", "knows", "a2");
        assert!(t.object.is_id);
    }
}
