//! The Query Model (§4.5): the shape of an object query request and its
//! paginated response.

use crate::triple::Triple;
use crate::value::TypedValue;

/// `page_size = 0` resolves to this default (§4.5 **[ADDED]**).
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A single predicate → `{operator, value}` constraint. `operator` is kept
/// as the raw request string (`"eq"`, `"gt"`, ...) so an unrecognized
/// operator surfaces as `Error::UnknownComparator` at the query boundary
/// rather than at model-construction time.
#[derive(Debug, Clone)]
pub struct QueryUnit {
    pub operator: String,
    pub value: TypedValue,
}

impl QueryUnit {
    pub fn new(operator: impl Into<String>, value: TypedValue) -> Self {
        QueryUnit {
            operator: operator.into(),
            value,
        }
    }
}

/// A graph-traversal constraint: follow `path` (level 0) or the transitive
/// closure of id-edges up to `level` hops, then require the reached
/// frontier to contain a subject matching `target`.
#[derive(Debug, Clone)]
pub struct LinkQuery {
    /// Dot-delimited predicate sequence, used when `level == 0`.
    pub path: String,
    pub level: u32,
    pub target: Box<ObjectQueryModel>,
}

impl LinkQuery {
    pub fn path(path: impl Into<String>, target: ObjectQueryModel) -> Self {
        LinkQuery {
            path: path.into(),
            level: 0,
            target: Box::new(target),
        }
    }

    pub fn level(level: u32, target: ObjectQueryModel) -> Self {
        LinkQuery {
            path: String::new(),
            level,
            target: Box::new(target),
        }
    }
}

/// The top-level query request (§4.5). `filter` preserves insertion order
/// so the executor's seed-selection pass can consider it, but selects by
/// estimated selectivity rather than strict first-entry order (see
/// DESIGN.md's resolution of the corresponding Open Question).
#[derive(Debug, Clone, Default)]
pub struct ObjectQueryModel {
    pub id: Option<String>,
    pub filter: Vec<(String, QueryUnit)>,
    pub has_object: Vec<LinkQuery>,
    pub has_subject: Vec<LinkQuery>,
    pub page_size: usize,
    pub continuation: Option<Triple>,
}

impl ObjectQueryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_filter(mut self, predicate: impl Into<String>, unit: QueryUnit) -> Self {
        self.filter.push((predicate.into(), unit));
        self
    }

    pub fn with_has_object(mut self, link: LinkQuery) -> Self {
        self.has_object.push(link);
        self
    }

    pub fn with_has_subject(mut self, link: LinkQuery) -> Self {
        self.has_subject.push(link);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_continuation(mut self, continuation: Triple) -> Self {
        self.continuation = Some(continuation);
        self
    }
}

/// The result of executing an [`ObjectQueryModel`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectQueryResponse {
    pub values: Vec<Triple>,
    pub continuation: Option<Triple>,
}
