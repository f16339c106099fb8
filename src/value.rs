//! Typed object values and the comparison semantics the query executor's
//! comparator operators are built on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Discriminates how a [`TypedValue`]'s `raw_string` should be compared.
///
/// Numeric values are frozen: changing these breaks on-disk compatibility
/// since the tag is part of the triple codec's value payload (§4.2/§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum TypeTag {
    Null = 0,
    Boolean = 1,
    Integer = 2,
    Float = 3,
    String = 4,
    Date = 5,
}

impl TypeTag {
    pub(crate) fn from_u16(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(TypeTag::Null),
            1 => Some(TypeTag::Boolean),
            2 => Some(TypeTag::Integer),
            3 => Some(TypeTag::Float),
            4 => Some(TypeTag::String),
            5 => Some(TypeTag::Date),
            _ => None,
        }
    }
}

/// The object side of a triple: canonical text, its inferred type, and
/// whether it names another subject (a graph edge) rather than a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub raw_string: String,
    pub type_tag: TypeTag,
    pub is_id: bool,
}

/// Result of comparing two [`TypedValue`]s. Distinct from `Option<Ordering>`
/// so callers cannot mistake "incomparable" for "equal".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl TypedValue {
    /// Builds a literal value, inferring its type by trying parsers in the
    /// order Null, Boolean, Integer, Float, Date, falling back to String.
    pub fn from_raw(text: impl Into<String>) -> Self {
        let raw_string = text.into();
        let type_tag = infer_type_tag(&raw_string);
        TypedValue {
            raw_string,
            type_tag,
            is_id: false,
        }
    }

    /// Builds a value that names another subject (a graph edge).
    pub fn id(text: impl Into<String>) -> Self {
        TypedValue {
            raw_string: text.into(),
            type_tag: TypeTag::String,
            is_id: true,
        }
    }

    /// Compares `self` to `other` per §4.1: numeric if both numeric
    /// (integer widens to float), lexicographic for strings, chronological
    /// for dates, boolean false < true, otherwise incomparable.
    pub fn compare(&self, other: &TypedValue) -> Comparison {
        use TypeTag::*;
        match (self.type_tag, other.type_tag) {
            (Integer | Float, Integer | Float) => {
                match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => from_partial_cmp(a.partial_cmp(&b)),
                    _ => Comparison::Incomparable,
                }
            }
            (String, String) => from_ordering(self.raw_string.cmp(&other.raw_string)),
            (Boolean, Boolean) => match (self.as_bool(), other.as_bool()) {
                (Some(a), Some(b)) => from_ordering(a.cmp(&b)),
                _ => Comparison::Incomparable,
            },
            (Date, Date) => match (self.as_date(), other.as_date()) {
                (Some(a), Some(b)) => from_ordering(a.cmp(&b)),
                _ => Comparison::Incomparable,
            },
            _ => {
                if self.type_tag == other.type_tag && self.raw_string == other.raw_string {
                    Comparison::Equal
                } else {
                    Comparison::Incomparable
                }
            }
        }
    }

    /// Equality that is well-defined across all type pairs: same type and
    /// same canonical text, or (for numerics) the same numeric value.
    pub fn eq_value(&self, other: &TypedValue) -> bool {
        matches!(self.compare(other), Comparison::Equal)
            || (self.type_tag == other.type_tag && self.raw_string == other.raw_string)
    }

    /// Substring test; defined only when `self` is a `String`.
    pub fn contains(&self, needle: &str) -> bool {
        matches!(self.type_tag, TypeTag::String) && self.raw_string.contains(needle)
    }

    fn as_f64(&self) -> Option<f64> {
        match self.type_tag {
            TypeTag::Integer => self.raw_string.parse::<i64>().ok().map(|v| v as f64),
            TypeTag::Float => self.raw_string.parse::<f64>().ok(),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self.type_tag {
            TypeTag::Boolean => self.raw_string.parse::<bool>().ok(),
            _ => None,
        }
    }

    fn as_date(&self) -> Option<NaiveDate> {
        match self.type_tag {
            TypeTag::Date => NaiveDate::parse_from_str(&self.raw_string, "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

fn from_ordering(ord: std::cmp::Ordering) -> Comparison {
    match ord {
        std::cmp::Ordering::Less => Comparison::Less,
        std::cmp::Ordering::Equal => Comparison::Equal,
        std::cmp::Ordering::Greater => Comparison::Greater,
    }
}

fn from_partial_cmp(ord: Option<std::cmp::Ordering>) -> Comparison {
    match ord {
        Some(ord) => from_ordering(ord),
        None => Comparison::Incomparable,
    }
}

fn infer_type_tag(raw: &str) -> TypeTag {
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return TypeTag::Null;
    }
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
        return TypeTag::Boolean;
    }
    if raw.parse::<i64>().is_ok() {
        return TypeTag::Integer;
    }
    if raw.parse::<f64>().is_ok() {
        return TypeTag::Float;
    }
    if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok() {
        return TypeTag::Date;
    }
    TypeTag::String
}
