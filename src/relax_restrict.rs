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

//! Width-bounded construction of an MDD from a [`DynamicProgram`]: as each
//! layer is generated, states sharing a signature are always merged
//! (ordinary DP-level deduplication, never an approximation), and once a
//! layer would exceed `width` nodes, a [`Partitioner`] decides how to bring
//! it back down.
//!
//! The layer-by-layer loop works in blocks of `depth + 1` layers: the width
//! bound is only enforced at the end of a block, so that within a block the
//! diagram is allowed to grow past `width` before the partitioner gets a say.
//! With the default `depth = 0`, this degenerates to the usual one-layer-at-a-time
//! construction; a larger `depth` lets the partitioner judge states using a
//! few extra transitions' worth of information before committing to a cut.
//!
//! [`relax`] over-approximates: a bucket of merged states is replaced by
//! [`DynamicProgram::merge`]'s result, and every arc that would have led to
//! any bucket member is redirected to the merged node instead, so the
//! relaxed MDD's tuple set is a superset of the exact one.
//!
//! [`restrict`] under-approximates: everything but one representative state
//! per bucket, chosen by the partitioner's bucket 0, is dropped outright
//! along with the arcs that would have led to it, so the restricted MDD's
//! tuple set is a subset of the exact one.

use fxhash::FxHashMap;

use crate::abstraction::dp::{DynamicProgram, State};
use crate::abstraction::partitioner::Partitioner;
use crate::common::DomainSpec;
use crate::error::MddResult;
use crate::implementation::core::{Mdd, NodeId};
use crate::Variable;

/// Whether a too-wide layer is shrunk by merging excess nodes together
/// ([`Mode::Relax`]) or by dropping all but one representative
/// ([`Mode::Restrict`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Relax,
    Restrict,
}

struct Frontier {
    /// One (node, state) pair per currently-open node of the layer being
    /// extended.
    nodes: Vec<(NodeId, State)>,
}

/// Compiles an MDD from `dp` over `n` variables with the given domain sizes,
/// enforcing that no layer grows past `width` nodes (a `width` of `usize::MAX`
/// yields an exact compilation, equivalent to
/// [`crate::implementation::builders::dynprog::build`]).
///
/// # Errors
/// Propagates [`crate::error::MddError::StateNotTransitionable`] from `dp`.
pub fn build<D: DynamicProgram>(
    dp: &D,
    n: usize,
    doms: impl Into<DomainSpec>,
    width: usize,
    depth: usize,
    mode: Mode,
    partitioner: &mut dyn Partitioner,
) -> MddResult<Mdd> {
    let sizes = doms.into().resolve(n);
    let mut mdd = Mdd::new(n);
    mdd.set_dom_size(sizes.clone());
    mdd.build_root_and_terminal();

    let mut frontier = Frontier { nodes: vec![(mdd.root(), dp.initial_state())] };
    let mut since_last_cut = 0usize;

    for layer in 0..n {
        let is_last = layer + 1 == n;
        let mut next_by_sig: FxHashMap<String, (NodeId, State)> = FxHashMap::default();

        for (parent, state) in &frontier.nodes {
            for t in dp.transitions(Variable(layer), state)? {
                if is_last {
                    mdd.add_arc(*parent, t.label, mdd.terminal());
                    continue;
                }
                let sig = t.state.signature();
                let child = match next_by_sig.get(&sig) {
                    Some((id, _)) => *id,
                    None => {
                        let id = mdd.create_node(layer + 1);
                        next_by_sig.insert(sig, (id, t.state.clone()));
                        id
                    }
                };
                mdd.add_arc(*parent, t.label, child);
            }
        }

        if is_last {
            break;
        }

        let mut next: Vec<(NodeId, State)> = next_by_sig.into_values().collect();
        since_last_cut += 1;
        let at_block_boundary = since_last_cut > depth;
        if at_block_boundary && next.len() > width {
            shrink_layer(&mut mdd, dp, &mut next, width, mode, partitioner);
            since_last_cut = 0;
        }
        frontier = Frontier { nodes: next };
    }

    mdd.clean();
    Ok(mdd)
}

/// Builds a width-bounded relaxation (over-approximation) of `dp`'s exact
/// state space.
pub fn relax<D: DynamicProgram>(
    dp: &D,
    n: usize,
    doms: impl Into<DomainSpec>,
    width: usize,
    depth: usize,
    partitioner: &mut dyn Partitioner,
) -> MddResult<Mdd> {
    build(dp, n, doms, width, depth, Mode::Relax, partitioner)
}

/// Builds a width-bounded restriction (under-approximation) of `dp`'s exact
/// state space.
pub fn restrict<D: DynamicProgram>(
    dp: &D,
    n: usize,
    doms: impl Into<DomainSpec>,
    width: usize,
    depth: usize,
    partitioner: &mut dyn Partitioner,
) -> MddResult<Mdd> {
    build(dp, n, doms, width, depth, Mode::Restrict, partitioner)
}

/// Shrinks `next` (already known to have more than `width` entries) down to
/// at most `width`, updating `mdd` in place: redirecting incoming arcs for
/// merged/dropped nodes and deleting whatever is no longer reachable.
fn shrink_layer<D: DynamicProgram>(
    mdd: &mut Mdd,
    dp: &D,
    next: &mut Vec<(NodeId, State)>,
    width: usize,
    mode: Mode,
    partitioner: &mut dyn Partitioner,
) {
    let states: Vec<&State> = next.iter().map(|(_, s)| s).collect();
    let buckets = partitioner.assign_buckets(&states, width);
    let max_bucket = buckets.iter().copied().max().unwrap_or(0);

    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); max_bucket + 1];
    for (i, &b) in buckets.iter().enumerate() {
        groups[b].push(i);
    }

    let mut survivors: Vec<(NodeId, State)> = Vec::with_capacity(groups.len());
    for members in &groups {
        if members.is_empty() {
            continue;
        }
        if members.len() == 1 {
            survivors.push(next[members[0]].clone());
            continue;
        }
        match mode {
            Mode::Relax => {
                let member_states: Vec<&State> = members.iter().map(|&i| &next[i].1).collect();
                let merged_state = dp.merge(&member_states);
                // Keep the first member's node as the merged representative
                // and retarget every other member's incoming arcs onto it.
                let (rep, _) = next[members[0]];
                for &i in &members[1..] {
                    let (dead, _) = next[i];
                    redirect_incoming(mdd, dead, rep);
                    mdd.delete_node(dead);
                }
                survivors.push((rep, merged_state));
            }
            Mode::Restrict => {
                // Keep the single representative the partitioner favoured
                // (lowest original index within the bucket) and drop the rest
                // outright, along with whatever led only to them.
                let keep = *members.iter().min().unwrap();
                let (rep, state) = next[keep].clone();
                for &i in members {
                    if i == keep {
                        continue;
                    }
                    let (dropped, _) = next[i];
                    drop_incoming(mdd, dropped);
                    mdd.delete_node(dropped);
                }
                survivors.push((rep, state));
            }
        }
    }
    *next = survivors;
}

/// Retargets every arc that currently points at `from` so it points at `to`
/// instead (used by [`Mode::Relax`] to fold a merged bucket member into its
/// representative).
fn redirect_incoming(mdd: &mut Mdd, from: NodeId, to: NodeId) {
    let layer = mdd.get_node(from).layer();
    if layer == 0 {
        return;
    }
    let parents: Vec<NodeId> = mdd.layer_ids(layer - 1).collect();
    for p in parents {
        let arcs: Vec<_> = mdd.arcs_of(p).collect();
        for a in arcs {
            if mdd.get_arc_data(a).end() == from {
                mdd.update_arc(a, Some(to));
            }
        }
    }
}

/// Deletes every arc that currently points at `dropped` (used by
/// [`Mode::Restrict`] to erase the tuples that only reached this node).
fn drop_incoming(mdd: &mut Mdd, dropped: NodeId) {
    let layer = mdd.get_node(dropped).layer();
    if layer == 0 {
        return;
    }
    let parents: Vec<NodeId> = mdd.layer_ids(layer - 1).collect();
    for p in parents {
        let arcs: Vec<_> = mdd.arcs_of(p).collect();
        for a in arcs {
            if mdd.get_arc_data(a).end() == dropped {
                mdd.delete_arc(a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::dp::Transition;
    use crate::error::MddError;
    use crate::implementation::partitioners::LastBucket;
    use crate::Value;

    /// Counts how many of the first `k` binary variables were set to 1; a
    /// classic DP whose exact state space is the running count `0..=k`.
    struct CountOnes;
    impl DynamicProgram for CountOnes {
        fn initial_state(&self) -> State {
            State::Int(0)
        }
        fn transitions(&self, _variable: Variable, state: &State) -> Result<Vec<Transition>, MddError> {
            let count = match state {
                State::Int(v) => *v,
                _ => unreachable!(),
            };
            Ok(vec![
                Transition { label: 0, state: State::Int(count) },
                Transition { label: 1, state: State::Int(count + 1) },
            ])
        }
        fn merge(&self, states: &[&State]) -> State {
            let min = states
                .iter()
                .map(|s| match s {
                    State::Int(v) => *v,
                    _ => unreachable!(),
                })
                .min()
                .unwrap();
            State::Int(min)
        }
    }

    #[test]
    fn exact_build_contains_every_tuple_with_the_right_count() {
        let dp = CountOnes;
        let mut part = LastBucket;
        let mdd = build(&dp, 3, 2usize, usize::MAX, 0, Mode::Relax, &mut part).unwrap();
        for bits in 0u32..8 {
            let tuple: Vec<Value> = (0..3).map(|i| (bits >> i) & 1).collect();
            assert!(mdd.contains(&tuple).unwrap());
        }
    }

    #[test]
    fn restrict_with_width_one_keeps_only_one_tuple() {
        let dp = CountOnes;
        let mut part = LastBucket;
        let mdd = restrict(&dp, 3, 2usize, 1, 0, &mut part).unwrap();
        let mut found = 0;
        for bits in 0u32..8 {
            let tuple: Vec<Value> = (0..3).map(|i| (bits >> i) & 1).collect();
            if mdd.contains(&tuple).unwrap() {
                found += 1;
            }
        }
        assert_eq!(1, found);
    }

    #[test]
    fn relax_with_bounded_width_is_a_superset_of_the_exact_tuple_set() {
        let dp = CountOnes;
        let mut part_exact = LastBucket;
        let exact = build(&dp, 3, 2usize, usize::MAX, 0, Mode::Relax, &mut part_exact).unwrap();
        let mut part_relaxed = LastBucket;
        let relaxed = relax(&dp, 3, 2usize, 2, 0, &mut part_relaxed).unwrap();
        for bits in 0u32..8 {
            let tuple: Vec<Value> = (0..3).map(|i| (bits >> i) & 1).collect();
            if exact.contains(&tuple).unwrap() {
                assert!(relaxed.contains(&tuple).unwrap());
            }
        }
    }
}
