//! Property-based tests for the Index Layer and Query Executor, covering
//! the testable properties enumerated in the specification's §8.

use std::collections::HashSet;

use hexastore::{execute, Graph, ObjectQueryModel, QueryUnit, StoreId, Triple, TypedValue};
use proptest::prelude::*;

fn subject() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn object() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,8}"
}

proptest! {
    /// Property 2: after `insert(t)`, `t` is returned by every applicable
    /// primitive; after `remove(t)`, none do.
    #[test]
    fn index_consistency(s in subject(), p in subject(), o in object()) {
        let mut graph = Graph::new(hexastore::open_memory_store(), StoreId::DEFAULT);
        let triple = Triple::literal(&s, &p, &o);

        graph.insert(&triple).unwrap();
        prop_assert!(graph.s(&s).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(graph.p(&p, None).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(graph.o(&o).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(graph.sp(&s, &p).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(graph.po(&p, &o, None).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(graph.exists(&s, &p, &o).unwrap());

        graph.remove(&triple).unwrap();
        prop_assert!(!graph.s(&s).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(!graph.p(&p, None).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(!graph.o(&o).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(!graph.sp(&s, &p).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(!graph.po(&p, &o, None).collect::<Result<Vec<_>, _>>().unwrap().contains(&triple));
        prop_assert!(!graph.exists(&s, &p, &o).unwrap());
    }

    /// Property 3: for a fixed `(p, o)`, `PO` yields strictly ascending
    /// subjects, and feeding the last element back as continuation yields
    /// the next page with no overlap and no gap.
    #[test]
    fn order_stability(subjects in prop::collection::hash_set(subject(), 1..12)) {
        let mut graph = Graph::new(hexastore::open_memory_store(), StoreId::DEFAULT);
        for s in &subjects {
            graph.insert(&Triple::literal(s, "type", "T")).unwrap();
        }

        let full: Vec<_> = graph.po("type", "T", None).collect::<Result<Vec<_>, _>>().unwrap();
        let mut sorted_subjects: Vec<_> = subjects.iter().cloned().collect();
        sorted_subjects.sort();
        let full_subjects: Vec<_> = full.iter().map(|t| t.subject.clone()).collect();
        prop_assert_eq!(full_subjects.clone(), sorted_subjects);

        if let Some(mid) = full.get(full.len() / 2) {
            let first_half: Vec<_> = graph.po("type", "T", None).collect::<Result<Vec<_>, _>>().unwrap();
            let boundary = first_half.iter().position(|t| t.subject == mid.subject).unwrap();
            let first_page = &first_half[..=boundary];
            let second_page: Vec<_> = graph
                .po("type", "T", Some(mid))
                .collect::<Result<Vec<_>, _>>()
                .unwrap();
            let mut rejoined: Vec<_> = first_page.iter().cloned().collect();
            rejoined.extend(second_page);
            prop_assert_eq!(rejoined, full);
        }
    }

    /// Property 4: concatenating all pages of a paginated query equals the
    /// un-paginated result as a multiset.
    #[test]
    fn pagination_completeness(count in 1usize..15, page_size in 1usize..6) {
        let mut graph = Graph::new(hexastore::open_memory_store(), StoreId::DEFAULT);
        for i in 0..count {
            graph.insert(&Triple::literal(format!("s{i}"), "type", "T")).unwrap();
        }

        let unpaginated = execute(
            &graph,
            &ObjectQueryModel::new()
                .with_filter("type", QueryUnit::new("eq", TypedValue::from_raw("T")))
                .with_page_size(count + 1),
        ).unwrap();

        let mut paginated = Vec::new();
        let mut continuation = None;
        loop {
            let mut query = ObjectQueryModel::new()
                .with_filter("type", QueryUnit::new("eq", TypedValue::from_raw("T")))
                .with_page_size(page_size);
            if let Some(c) = continuation.take() {
                query = query.with_continuation(c);
            }
            let resp = execute(&graph, &query).unwrap();
            let got = resp.values.len();
            paginated.extend(resp.values);
            continuation = resp.continuation;
            if got < page_size || continuation.is_none() {
                break;
            }
        }

        let unpaginated_set: HashSet<_> = unpaginated.values.iter().map(|t| t.subject.clone()).collect();
        let paginated_set: HashSet<_> = paginated.iter().map(|t| t.subject.clone()).collect();
        prop_assert_eq!(unpaginated_set, paginated_set);
        prop_assert_eq!(unpaginated.values.len(), paginated.len());
    }

    /// Property 6: numeric comparators match real-number ordering.
    #[test]
    fn comparator_correctness_numeric(a in -1000i64..1000, b in -1000i64..1000) {
        let va = TypedValue::from_raw(a.to_string());
        let vb = TypedValue::from_raw(b.to_string());
        let cmp = va.compare(&vb);
        prop_assert_eq!(cmp == hexastore::Comparison::Greater, a > b);
        prop_assert_eq!(cmp == hexastore::Comparison::Less, a < b);
        prop_assert_eq!(cmp == hexastore::Comparison::Equal, a == b);
    }

    /// Property 6: `contains` is substring-true iff `target` is a
    /// contiguous substring.
    #[test]
    fn comparator_correctness_contains(haystack in "[a-z]{1,12}", needle in "[a-z]{1,4}") {
        let value = TypedValue::from_raw(haystack.clone());
        prop_assert_eq!(value.contains(&needle), haystack.contains(&needle));
    }
}
