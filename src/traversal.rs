// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Read-only traversals over a built [`Mdd`]: plain BFS/DFS with a single
//! per-node callback ([`bfs`]/[`dfs`]), event-based BFS/DFS with open/close
//! hooks for both nodes and arcs ([`Visitor`], [`bfs_visit`]/[`dfs_visit`]),
//! extremal (longest/shortest) root-to-terminal path under a caller-supplied
//! weight function, and arbitrary-precision counting of the represented
//! tuples.
//!
//! None of these mutate the diagram, so none of them touch the scratch
//! fields [`crate::implementation::core::Node`] reserves for reduce/apply/
//! relax — every visited-set here lives entirely in a local `FxHashSet`
//! instead.

use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::implementation::core::{ArcId, Mdd, NodeId};
use crate::{Tuple, Value, Variable};

/// Visits every live node exactly once, layer by layer from the root to the
/// terminal.
pub fn bfs(mdd: &Mdd, mut on_node: impl FnMut(NodeId)) {
    for layer in 0..=mdd.nb_vars() {
        for node in mdd.layer_ids(layer) {
            on_node(node);
        }
    }
}

/// Visits every node reachable from the root exactly once, in pre-order
/// (a node before any of its children), following arcs in ascending label
/// order.
pub fn dfs(mdd: &Mdd, mut on_node: impl FnMut(NodeId)) {
    let mut seen: FxHashSet<NodeId> = FxHashSet::default();
    let mut stack = vec![mdd.root()];
    seen.insert(mdd.root());
    while let Some(node) = stack.pop() {
        on_node(node);
        // push in reverse so arcs are still explored in ascending label order
        let children: Vec<NodeId> = mdd.arcs_of(node).map(|a| mdd.get_arc_data(a).end()).collect();
        for &child in children.iter().rev() {
            if seen.insert(child) {
                stack.push(child);
            }
        }
    }
}

/// Event hooks for [`bfs_visit`]/[`dfs_visit`]. Every method defaults to a
/// no-op, so a visitor only overrides the events it cares about.
///
/// [`dfs_visit`] fires [`Self::on_open_arc`] before descending into the
/// arc's endpoint and [`Self::on_close_arc`] after returning from it, so a
/// visitor can distinguish pre-order from post-order arc work; [`bfs_visit`]
/// has no such notion of "returning" and fires [`Self::on_arc`] once per
/// arc instead.
pub trait Visitor {
    fn on_start(&mut self) {}
    fn on_stop(&mut self) {}
    fn on_open_node(&mut self, node: NodeId) {
        let _ = node;
    }
    fn on_close_node(&mut self, node: NodeId) {
        let _ = node;
    }
    fn on_arc(&mut self, arc: ArcId) {
        let _ = arc;
    }
    fn on_open_arc(&mut self, arc: ArcId) {
        let _ = arc;
    }
    fn on_close_arc(&mut self, arc: ArcId) {
        let _ = arc;
    }
}

/// Breadth-first traversal driving a [`Visitor`]: every live node is opened
/// and closed exactly once, in layer order; every arc out of an open node
/// fires [`Visitor::on_arc`] once.
pub fn bfs_visit(mdd: &Mdd, visitor: &mut impl Visitor) {
    visitor.on_start();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(mdd.root());
    visited.insert(mdd.root());
    while let Some(node) = queue.pop_front() {
        visitor.on_open_node(node);
        for arc in mdd.arcs_of(node) {
            visitor.on_arc(arc);
            let end = mdd.get_arc_data(arc).end();
            if visited.insert(end) {
                queue.push_back(end);
            }
        }
        visitor.on_close_node(node);
    }
    visitor.on_stop();
}

/// Depth-first traversal driving a [`Visitor`]: pre-order node open, arcs
/// explored in ascending label order with matching open/close events around
/// each one's recursive descent, then the node is closed.
pub fn dfs_visit(mdd: &Mdd, visitor: &mut impl Visitor) {
    visitor.on_start();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    explore(mdd, mdd.root(), &mut visited, visitor);
    visitor.on_stop();
}

fn explore(mdd: &Mdd, node: NodeId, visited: &mut FxHashSet<NodeId>, visitor: &mut impl Visitor) {
    visited.insert(node);
    visitor.on_open_node(node);
    for arc in mdd.arcs_of(node) {
        visitor.on_open_arc(arc);
        let end = mdd.get_arc_data(arc).end();
        if !visited.contains(&end) {
            explore(mdd, end, visited, visitor);
        }
        visitor.on_close_arc(arc);
    }
    visitor.on_close_node(node);
}

/// Finds a root-to-terminal path maximizing the sum of `weight(variable,
/// label)` over the arcs it takes, along with that sum. Returns `None` if
/// the terminal is unreachable (the MDD is empty).
pub fn longest_path(mdd: &Mdd, weight: impl Fn(Variable, Value) -> i64) -> Option<(i64, Tuple)> {
    extremal_path(mdd, weight, true)
}

/// Finds a root-to-terminal path minimizing the sum of `weight(variable,
/// label)` over the arcs it takes, along with that sum. Returns `None` if
/// the terminal is unreachable (the MDD is empty).
pub fn shortest_path(mdd: &Mdd, weight: impl Fn(Variable, Value) -> i64) -> Option<(i64, Tuple)> {
    extremal_path(mdd, weight, false)
}

fn extremal_path(mdd: &Mdd, weight: impl Fn(Variable, Value) -> i64, maximize: bool) -> Option<(i64, Tuple)> {
    let n = mdd.nb_vars();
    // best[node] = (best distance from root, arc taken to reach it: (predecessor, label))
    let mut best: FxHashMap<NodeId, (i64, Option<(NodeId, Value)>)> = FxHashMap::default();
    best.insert(mdd.root(), (0, None));

    for layer in 0..n {
        for node in mdd.layer_ids(layer) {
            let Some(&(dist, _)) = best.get(&node) else { continue };
            for arc_id in mdd.arcs_of(node) {
                let arc = mdd.get_arc_data(arc_id);
                let candidate = dist + weight(Variable(layer), arc.label());
                let improves = match best.get(&arc.end()) {
                    None => true,
                    Some(&(cur, _)) => if maximize { candidate > cur } else { candidate < cur },
                };
                if improves {
                    best.insert(arc.end(), (candidate, Some((node, arc.label()))));
                }
            }
        }
    }

    let &(total, _) = best.get(&mdd.terminal())?;
    let mut tuple = vec![0 as Value; n];
    let mut cur = mdd.terminal();
    while let Some(&(_, Some((prev, label)))) = best.get(&cur) {
        tuple[mdd.get_node(prev).layer()] = label;
        cur = prev;
    }
    Some((total, tuple))
}

/// Counts the number of distinct tuples `mdd` represents, i.e. the number
/// of distinct root-to-terminal paths, using arbitrary precision since this
/// count grows exponentially with the number of variables.
pub fn count_tuples(mdd: &Mdd) -> BigUint {
    let mut count: FxHashMap<NodeId, BigUint> = FxHashMap::default();
    count.insert(mdd.terminal(), BigUint::one());
    for layer in (0..mdd.nb_vars()).rev() {
        for node in mdd.layer_ids(layer) {
            let mut total = BigUint::zero();
            for arc_id in mdd.arcs_of(node) {
                let end = mdd.get_arc_data(arc_id).end();
                if let Some(c) = count.get(&end) {
                    total += c;
                }
            }
            count.insert(node, total);
        }
    }
    count.get(&mdd.root()).cloned().unwrap_or_else(BigUint::zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2-variable, domain-{0,1} MDD containing {(0,0), (0,1), (1,1)}.
    fn sample() -> Mdd {
        let mut mdd = Mdd::new(2);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        let a = mdd.create_node(1);
        let b = mdd.create_node(1);
        mdd.add_arc(mdd.root(), 0, a);
        mdd.add_arc(mdd.root(), 1, b);
        mdd.add_arc(a, 0, mdd.terminal());
        mdd.add_arc(a, 1, mdd.terminal());
        mdd.add_arc(b, 1, mdd.terminal());
        mdd
    }

    #[test]
    fn bfs_visits_every_node_once_layer_by_layer() {
        let mdd = sample();
        let mut layers = Vec::new();
        bfs(&mdd, |n| layers.push(mdd.get_node(n).layer()));
        assert_eq!(vec![0, 1, 1, 2], layers);
    }

    #[test]
    fn dfs_visits_every_reachable_node_exactly_once() {
        let mdd = sample();
        let mut seen = Vec::new();
        dfs(&mdd, |n| seen.push(n));
        assert_eq!(4, seen.len());
        let unique: std::collections::HashSet<_> = seen.iter().collect();
        assert_eq!(4, unique.len());
    }

    #[derive(Default)]
    struct EventLog {
        opens: Vec<NodeId>,
        closes: Vec<NodeId>,
        arcs: usize,
    }
    impl Visitor for EventLog {
        fn on_open_node(&mut self, node: NodeId) {
            self.opens.push(node);
        }
        fn on_close_node(&mut self, node: NodeId) {
            self.closes.push(node);
        }
        fn on_arc(&mut self, _arc: crate::implementation::core::ArcId) {
            self.arcs += 1;
        }
    }

    #[test]
    fn bfs_visit_opens_and_closes_every_node_once() {
        let mdd = sample();
        let mut log = EventLog::default();
        bfs_visit(&mdd, &mut log);
        assert_eq!(4, log.opens.len());
        assert_eq!(4, log.closes.len());
        assert_eq!(5, log.arcs);
    }

    #[derive(Default)]
    struct ArcNestingLog {
        opened: Vec<crate::implementation::core::ArcId>,
        closed: Vec<crate::implementation::core::ArcId>,
    }
    impl Visitor for ArcNestingLog {
        fn on_open_arc(&mut self, arc: crate::implementation::core::ArcId) {
            self.opened.push(arc);
        }
        fn on_close_arc(&mut self, arc: crate::implementation::core::ArcId) {
            self.closed.push(arc);
        }
    }

    #[test]
    fn dfs_visit_closes_each_arc_after_fully_exploring_its_endpoint() {
        let mdd = sample();
        let mut log = ArcNestingLog::default();
        dfs_visit(&mdd, &mut log);
        assert_eq!(5, log.opened.len());
        assert_eq!(log.opened, log.closed);
    }

    #[test]
    fn count_tuples_matches_the_three_encoded_tuples() {
        let mdd = sample();
        assert_eq!(BigUint::from(3u32), count_tuples(&mdd));
    }

    #[test]
    fn longest_path_prefers_the_heaviest_labels() {
        let mdd = sample();
        let (total, tuple) = longest_path(&mdd, |_, label| label as i64).unwrap();
        assert_eq!(2, total);
        assert_eq!(vec![1, 1], tuple);
    }

    #[test]
    fn shortest_path_prefers_the_lightest_labels() {
        let mdd = sample();
        let (total, tuple) = shortest_path(&mdd, |_, label| label as i64).unwrap();
        assert_eq!(0, total);
        assert_eq!(vec![0, 0], tuple);
    }
}
