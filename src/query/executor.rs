//! The Query Executor (§4.6): composes the seed filter, remaining filters,
//! and link traversals into a single paginated scan over the Graph facade.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::query::model::{LinkQuery, ObjectQueryModel, ObjectQueryResponse};
use crate::triple::Triple;
use crate::value::{Comparison, TypedValue};

/// Comparator operators a `QueryUnit` can carry (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
}

impl Operator {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "eq" => Ok(Operator::Eq),
            "gt" => Ok(Operator::Gt),
            "ge" => Ok(Operator::Ge),
            "lt" => Ok(Operator::Lt),
            "le" => Ok(Operator::Le),
            "contains" => Ok(Operator::Contains),
            other => Err(Error::UnknownComparator(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Outgoing,
    Incoming,
}

/// Runs `query` against `graph`, returning up to `page_size` triples and a
/// continuation for the next page.
pub fn execute(graph: &Graph, query: &ObjectQueryModel) -> Result<ObjectQueryResponse> {
    validate(query)?;

    if let Some(id) = &query.id {
        log::debug!("query took id shortcut for {id:?}");
        let first = graph.s(id).next().transpose()?;
        return Ok(ObjectQueryResponse {
            values: first.into_iter().collect(),
            continuation: None,
        });
    }

    let page_size = if query.page_size == 0 {
        graph.default_page_size()
    } else {
        query.page_size
    };

    let seed_index = select_seed(&query.filter);
    let (predicate, unit) = &query.filter[seed_index];
    log::debug!(
        "selected seed filter {seed_index} (predicate {predicate:?}, operator {:?}) out of {} candidates",
        unit.operator,
        query.filter.len()
    );
    let op = Operator::parse(&unit.operator)?;

    let mut values = Vec::with_capacity(page_size.min(1024));
    let mut last: Option<Triple> = None;

    match op {
        Operator::Eq => {
            let seed = graph.po(predicate, &unit.value.raw_string, query.continuation.as_ref());
            for res in seed {
                let triple = res?;
                if !accept(graph, &triple, query, seed_index)? {
                    continue;
                }
                last = Some(triple.clone());
                values.push(triple);
                if values.len() == page_size {
                    break;
                }
            }
        }
        _ => {
            let seed = graph.p(predicate, query.continuation.as_ref());
            for res in seed {
                let triple = res?;
                if !comparator_matches(op, &unit.value, &triple.object) {
                    continue;
                }
                if !accept(graph, &triple, query, seed_index)? {
                    continue;
                }
                last = Some(triple.clone());
                values.push(triple);
                if values.len() == page_size {
                    break;
                }
            }
        }
    }

    let continuation = if values.len() == page_size { last } else { None };
    Ok(ObjectQueryResponse { values, continuation })
}

/// Picks the filter entry most likely to narrow the scan the most: an
/// `eq` entry (resolved via the `POS`-backed `PO` primitive) beats a
/// comparator entry (which must scan the whole `P(k)` partition), per the
/// Open Question resolution in DESIGN.md.
fn select_seed(filter: &[(String, crate::query::model::QueryUnit)]) -> usize {
    filter
        .iter()
        .position(|(_, unit)| unit.operator == "eq")
        .unwrap_or(0)
}

/// Applies the remaining filters and both link directions to a seed
/// candidate (§4.6 steps 3-5).
fn accept(
    graph: &Graph,
    triple: &Triple,
    query: &ObjectQueryModel,
    seed_index: usize,
) -> Result<bool> {
    for (i, (predicate, unit)) in query.filter.iter().enumerate() {
        if i == seed_index {
            continue;
        }
        if !filter_holds(graph, &triple.subject, predicate, unit)? {
            return Ok(false);
        }
    }
    if !links_hold(graph, &triple.subject, &query.has_object, Direction::Outgoing)? {
        return Ok(false);
    }
    if !links_hold(graph, &triple.subject, &query.has_subject, Direction::Incoming)? {
        return Ok(false);
    }
    Ok(true)
}

/// Does `subject` satisfy a single predicate/operator/value constraint?
fn filter_holds(
    graph: &Graph,
    subject: &str,
    predicate: &str,
    unit: &crate::query::model::QueryUnit,
) -> Result<bool> {
    let op = Operator::parse(&unit.operator)?;
    match op {
        Operator::Eq => graph.exists(subject, predicate, &unit.value.raw_string),
        _ => {
            for res in graph.sp(subject, predicate) {
                let t = res?;
                if comparator_matches(op, &unit.value, &t.object) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn comparator_matches(op: Operator, target: &TypedValue, candidate: &TypedValue) -> bool {
    match op {
        Operator::Eq => candidate.eq_value(target),
        Operator::Gt => candidate.compare(target) == Comparison::Greater,
        Operator::Ge => matches!(candidate.compare(target), Comparison::Greater | Comparison::Equal),
        Operator::Lt => candidate.compare(target) == Comparison::Less,
        Operator::Le => matches!(candidate.compare(target), Comparison::Less | Comparison::Equal),
        Operator::Contains => candidate.contains(&target.raw_string),
    }
}

/// Does `subject` satisfy every [`LinkQuery`] in `links`, traversing in
/// `direction`? (§4.6 steps 4-5.)
fn links_hold(
    graph: &Graph,
    subject: &str,
    links: &[LinkQuery],
    direction: Direction,
) -> Result<bool> {
    for link in links {
        let frontier = match direction {
            Direction::Outgoing => expand_outgoing(graph, subject, link)?,
            Direction::Incoming => expand_incoming(graph, subject, link)?,
        };
        let mut matched = false;
        for candidate in &frontier {
            if model_matches(graph, candidate, &link.target)? {
                matched = true;
                break;
            }
        }
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Does `subject` satisfy `model` as a standalone sub-query: `id`
/// shortcut, every filter entry, and (recursively) every link query?
fn model_matches(graph: &Graph, subject: &str, model: &ObjectQueryModel) -> Result<bool> {
    if let Some(id) = &model.id {
        return Ok(subject == id);
    }
    for (predicate, unit) in &model.filter {
        if !filter_holds(graph, subject, predicate, unit)? {
            return Ok(false);
        }
    }
    if !links_hold(graph, subject, &model.has_object, Direction::Outgoing)? {
        return Ok(false);
    }
    if !links_hold(graph, subject, &model.has_subject, Direction::Incoming)? {
        return Ok(false);
    }
    Ok(true)
}

/// Expands the outgoing frontier reachable from `subject` for `link`:
/// either an explicit path walk or an id-edge closure up to `link.level`
/// hops (inclusive of `subject` at depth 0).
fn expand_outgoing(graph: &Graph, subject: &str, link: &LinkQuery) -> Result<Vec<String>> {
    if link.level == 0 {
        let mut frontier = vec![subject.to_owned()];
        for segment in link.path.split('.') {
            let mut seen = HashSet::new();
            let mut next = Vec::new();
            for s in &frontier {
                for res in graph.sp(s, segment) {
                    let t = res?;
                    if t.object.is_id && seen.insert(t.object.raw_string.clone()) {
                        next.push(t.object.raw_string.clone());
                    }
                }
            }
            frontier = next;
            if frontier.is_empty() {
                break;
            }
        }
        Ok(frontier)
    } else {
        closure(graph, subject, link.level, Direction::Outgoing)
    }
}

/// Expands the incoming frontier: the reversed path walk (`PO(seg,
/// source) → subjects`), or an id-edge closure over edges whose object is
/// the current frontier node.
fn expand_incoming(graph: &Graph, subject: &str, link: &LinkQuery) -> Result<Vec<String>> {
    if link.level == 0 {
        let mut frontier = vec![subject.to_owned()];
        for segment in link.path.split('.').collect::<Vec<_>>().into_iter().rev() {
            let mut seen = HashSet::new();
            let mut next = Vec::new();
            for s in &frontier {
                for res in graph.po(segment, s, None) {
                    let t = res?;
                    if seen.insert(t.subject.clone()) {
                        next.push(t.subject.clone());
                    }
                }
            }
            frontier = next;
            if frontier.is_empty() {
                break;
            }
        }
        Ok(frontier)
    } else {
        closure(graph, subject, link.level, Direction::Incoming)
    }
}

fn closure(graph: &Graph, subject: &str, level: u32, direction: Direction) -> Result<Vec<String>> {
    let mut reached = HashSet::new();
    reached.insert(subject.to_owned());
    let mut frontier = vec![subject.to_owned()];
    for _ in 0..level {
        let mut next = Vec::new();
        for s in &frontier {
            let edges: Box<dyn Iterator<Item = Result<Triple>>> = match direction {
                Direction::Outgoing => Box::new(graph.s(s)),
                Direction::Incoming => Box::new(graph.o(s)),
            };
            for res in edges {
                let t = res?;
                if !t.object.is_id {
                    continue;
                }
                let neighbor = match direction {
                    Direction::Outgoing => t.object.raw_string,
                    Direction::Incoming => t.subject,
                };
                if reached.insert(neighbor.clone()) {
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    Ok(reached.into_iter().collect())
}

/// Validates input-level invariants before any store access: `id` or a
/// non-empty `filter`, every operator recognized, no empty-path level-0
/// link query — recursively, since a `LinkQuery.target` is itself an
/// `ObjectQueryModel`.
fn validate(model: &ObjectQueryModel) -> Result<()> {
    if model.id.is_none() && model.filter.is_empty() {
        return Err(Error::AtLeastOneFilter);
    }
    for (_, unit) in &model.filter {
        Operator::parse(&unit.operator)?;
    }
    for link in model.has_object.iter().chain(model.has_subject.iter()) {
        if link.level == 0 && link.path.is_empty() {
            return Err(Error::PathEmpty);
        }
        validate(&link.target)?;
    }
    Ok(())
}
