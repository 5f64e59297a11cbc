//! # Elementary Cycle Enumeration
//!
//! A single, node-type-agnostic primitive for finding all elementary
//! (simple, no repeated node) directed cycles in a graph, used both on the
//! scored match graph and on arbitrary caller-supplied adjacency maps.
//!
//! ## How it works
//!
//! Nodes take a total order from their `BTreeMap` key order. For each
//! candidate start node, an explicit-stack depth-first search extends the
//! current path through on-path-unvisited neighbors, recording a cycle
//! whenever a neighbor equals the start with path length ≥ 2. Only
//! neighbors ordered at or after the start are traversed, so every cycle
//! is discovered exactly once, from its minimum node. Discovered cycles
//! are canonicalized by rotating the minimum node to the front and
//! deduplicated on the canonical sequence.
//!
//! The traversal is bounded: paths never grow past `max_len` nodes, which
//! guarantees termination on dense or adversarial graphs where unbounded
//! enumeration is exponential. Neighbor lists are sorted and deduplicated
//! before the search, so the output is identical regardless of the order
//! the caller listed neighbors in.
//!
//! ```
//! use std::collections::BTreeMap;
//! use sym_cycles::find_cycles;
//!
//! let mut graph = BTreeMap::new();
//! graph.insert("A", vec!["B"]);
//! graph.insert("B", vec!["C"]);
//! graph.insert("C", vec!["A"]);
//!
//! assert_eq!(find_cycles(&graph, 10), vec![vec!["A", "B", "C"]]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

/// Rotates a cycle so its minimum node leads.
///
/// Idempotent; an empty slice stays empty. The result identifies a cycle
/// independently of which node the search happened to start from.
pub fn canonical_rotation<N: Ord + Clone>(cycle: &[N]) -> Vec<N> {
    let Some(min_idx) = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    cycle[min_idx..]
        .iter()
        .chain(cycle[..min_idx].iter())
        .cloned()
        .collect()
}

/// Enumerates all elementary directed cycles of at most `max_len` nodes.
///
/// `graph` maps each node to its out-neighbors. Neighbors that are not
/// themselves keys of the map have no outgoing edges and can never close a
/// cycle, so they are ignored. Each cycle is returned once, in canonical
/// rotation, and the result is sorted by canonical sequence: the output
/// is a pure function of the edge set, not of neighbor order.
pub fn find_cycles<N: Ord + Clone>(graph: &BTreeMap<N, Vec<N>>, max_len: usize) -> Vec<Vec<N>> {
    let nodes: Vec<&N> = graph.keys().collect();
    let index: BTreeMap<&N, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    // Dense, order-normalized adjacency. Sorting plus dedup makes the
    // traversal order deterministic for any input neighbor order.
    let adjacency: Vec<Vec<usize>> = graph
        .values()
        .map(|neighbors| {
            let mut out: Vec<usize> = neighbors
                .iter()
                .filter_map(|n| index.get(n).copied())
                .collect();
            out.sort_unstable();
            out.dedup();
            out
        })
        .collect();

    let mut canonical: BTreeSet<Vec<usize>> = BTreeSet::new();
    let mut pruned_paths = 0usize;

    for start in 0..nodes.len() {
        // Explicit stack of (node, next-neighbor cursor); `on_path` plays
        // the role of the recursive version's blocked set.
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        let mut on_path = vec![false; nodes.len()];
        on_path[start] = true;
        let mut path = vec![start];

        while let Some(frame) = stack.last_mut() {
            let current = frame.0;
            let cursor = frame.1;
            if cursor < adjacency[current].len() {
                frame.1 += 1;
                let next = adjacency[current][cursor];
                // Cycles through lower-ordered nodes were already found
                // from those nodes' own starts.
                if next < start {
                    continue;
                }
                if next == start {
                    if path.len() >= 2 {
                        canonical.insert(canonical_rotation(&path));
                    }
                } else if !on_path[next] {
                    if path.len() < max_len {
                        on_path[next] = true;
                        path.push(next);
                        stack.push((next, 0));
                    } else {
                        pruned_paths += 1;
                    }
                }
            } else {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path[done] = false;
                }
            }
        }
    }

    if pruned_paths > 0 {
        debug!(max_len, pruned_paths, "cycle search hit the depth bound");
    }

    canonical
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|i| nodes[i].clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(edges: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        edges
            .iter()
            .map(|(node, neighbors)| {
                (
                    node.to_string(),
                    neighbors.iter().map(|n| n.to_string()).collect(),
                )
            })
            .collect()
    }

    fn cycles_of(graph: &BTreeMap<String, Vec<String>>, max_len: usize) -> Vec<Vec<String>> {
        find_cycles(graph, max_len)
    }

    #[test]
    fn finds_a_triangle_once() {
        let graph = graph_of(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);
        assert_eq!(cycles_of(&graph, 10), vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn two_node_cycle_is_elementary() {
        let graph = graph_of(&[("A", &["B"]), ("B", &["A"])]);
        assert_eq!(cycles_of(&graph, 10), vec![vec!["A", "B"]]);
    }

    #[test]
    fn self_loop_is_not_a_cycle() {
        let graph = graph_of(&[("A", &["A", "B"]), ("B", &[])]);
        assert!(cycles_of(&graph, 10).is_empty());
    }

    #[test]
    fn neighbor_order_does_not_change_the_result() {
        let forward = graph_of(&[("A", &["B", "C"]), ("B", &["C", "A"]), ("C", &["A", "B"])]);
        let reversed = graph_of(&[("A", &["C", "B"]), ("B", &["A", "C"]), ("C", &["B", "A"])]);
        assert_eq!(cycles_of(&forward, 10), cycles_of(&reversed, 10));
    }

    #[test]
    fn duplicate_neighbors_do_not_duplicate_cycles() {
        let graph = graph_of(&[("A", &["B", "B"]), ("B", &["A", "A"])]);
        assert_eq!(cycles_of(&graph, 10), vec![vec!["A", "B"]]);
    }

    #[test]
    fn reversed_directed_cycles_are_distinct() {
        // A→B→C→A and A→C→B→A traverse different edges.
        let graph = graph_of(&[("A", &["B", "C"]), ("B", &["C", "A"]), ("C", &["A", "B"])]);
        let cycles = cycles_of(&graph, 10);
        assert!(cycles.contains(&vec!["A".to_string(), "B".to_string(), "C".to_string()]));
        assert!(cycles.contains(&vec!["A".to_string(), "C".to_string(), "B".to_string()]));
    }

    #[test]
    fn depth_bound_drops_longer_cycles_only() {
        let graph = graph_of(&[
            ("A", &["B"]),
            ("B", &["A", "C"]),
            ("C", &["D"]),
            ("D", &["A"]),
        ]);
        let bounded = cycles_of(&graph, 2);
        assert_eq!(bounded, vec![vec!["A", "B"]]);
        let unbounded = cycles_of(&graph, 10);
        assert_eq!(unbounded.len(), 2);
    }

    #[test]
    fn edges_to_unknown_nodes_are_ignored() {
        let graph = graph_of(&[("A", &["B", "ghost"]), ("B", &["A"])]);
        assert_eq!(cycles_of(&graph, 10), vec![vec!["A", "B"]]);
    }

    #[test]
    fn enumeration_is_idempotent() {
        let graph = graph_of(&[
            ("W", &["X"]),
            ("X", &["Y", "W"]),
            ("Y", &["Z", "X"]),
            ("Z", &["W"]),
        ]);
        let first = cycles_of(&graph, 10);
        let second = cycles_of(&graph, 10);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn canonical_rotation_puts_minimum_first() {
        let rotated = canonical_rotation(&["C", "A", "B"]);
        assert_eq!(rotated, vec!["A", "B", "C"]);
        assert_eq!(canonical_rotation(&rotated), rotated);
        assert!(canonical_rotation::<&str>(&[]).is_empty());
    }

    #[test]
    fn works_over_integer_nodes() {
        let mut graph: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        graph.insert(1, vec![2]);
        graph.insert(2, vec![3]);
        graph.insert(3, vec![1]);
        assert_eq!(find_cycles(&graph, 5), vec![vec![1, 2, 3]]);
    }
}
