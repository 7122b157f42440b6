//! Property-based tests for the Quill frontend
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;
use quill::frontend::graph::DependencyGraph;

fn name(i: usize) -> String {
    format!("M{i}")
}

/// Edges `(dependency, dependent)` over `n` modules that only ever point from a lower to a higher index, so the graph
/// is acyclic by construction.
fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..12).prop_flat_map(|n| {
        let edge = (0..n, 0..n).prop_filter_map("no self edges", |(a, b)| match a.cmp(&b) {
            std::cmp::Ordering::Less => Some((a, b)),
            std::cmp::Ordering::Greater => Some((b, a)),
            std::cmp::Ordering::Equal => None,
        });
        (Just(n), prop::collection::vec(edge, 0..30))
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> DependencyGraph {
    let mut graph = DependencyGraph::new(&name(n - 1));
    for i in 0..n {
        graph.add_module(&name(i));
    }
    for &(from, to) in edges {
        graph.add_edge(&name(from), &name(to));
    }
    graph
}

/// Every module `to` reaches from `from` by following edges forwards.
fn reaches(edges: &[(usize, usize)], from: usize, to: usize) -> bool {
    let mut stack = vec![from];
    let mut seen = std::collections::HashSet::new();
    while let Some(node) = stack.pop() {
        for &(a, b) in edges {
            if a == node {
                if b == to {
                    return true;
                }
                if seen.insert(b) {
                    stack.push(b);
                }
            }
        }
    }
    false
}

fn index(module: &str) -> usize {
    module[1..].parse().unwrap()
}

proptest! {
    /// Property: an acyclic graph resolves, and every edge points forwards in the order
    #[test]
    fn acyclic_graphs_respect_every_edge((n, edges) in dag_strategy()) {
        let graph = build(n, &edges);
        let order = graph.resolve().unwrap();
        prop_assert_eq!(order.len(), n);

        let position: std::collections::HashMap<&str, usize> =
            order.iter().enumerate().map(|(i, m)| (m.as_str(), i)).collect();
        for &(from, to) in &edges {
            prop_assert!(position[name(from).as_str()] < position[name(to).as_str()]);
        }
    }

    /// Property: a back edge closing a path makes resolution fail with two mutually reachable modules
    #[test]
    fn cycles_are_reported_with_a_witness(
        (n, edges) in dag_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!edges.is_empty());
        let &(from, to) = pick.get(&edges);
        let mut cyclic = edges.clone();
        cyclic.push((to, from));

        let err = build(n, &cyclic).resolve().unwrap_err();
        let [a, b] = &err.modules;
        let (a, b) = (index(a), index(b));
        prop_assert!(a == b || (reaches(&cyclic, a, b) && reaches(&cyclic, b, a)));
    }

    /// Property: adding an edge twice changes nothing
    #[test]
    fn edges_are_idempotent((n, edges) in dag_strategy()) {
        let once = build(n, &edges);
        let mut doubled = edges.clone();
        doubled.extend(edges.iter().copied());
        let twice = build(n, &doubled);
        prop_assert_eq!(once.edge_count(), twice.edge_count());
        prop_assert_eq!(once.resolve().unwrap(), twice.resolve().unwrap());
    }

    /// Property: a self-import is always named twice
    #[test]
    fn self_edges_name_the_module_twice((n, edges) in dag_strategy(), looped in 0usize..12) {
        let looped = looped % n;
        let mut cyclic = edges.clone();
        cyclic.push((looped, looped));
        let err = build(n, &cyclic).resolve().unwrap_err();
        // Another cycle cannot exist, so the witness must be the loop.
        prop_assert_eq!(&err.modules[0], &name(looped));
        prop_assert_eq!(&err.modules[1], &name(looped));
    }
}

mod lexing {
    use super::*;
    use quill::frontend::lexer;

    proptest! {
        /// Property: any run of operator characters lexes without panicking
        #[test]
        fn operator_runs_never_panic(op in "[+*/<>=|&^%!?$#@~]{1,4}") {
            let source = format!("module A exposing (..)\n\nx = a {op} b\n");
            let _ = lexer::lex(&source);
        }
    }
}
