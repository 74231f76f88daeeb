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

//! Canonicalization: merges nodes of the same layer that are equivalent
//! (same outgoing label/target multiset) until the MDD is "reduced" (I4: no
//! two distinct nodes of the same layer share a signature, and only the
//! terminal is a leaf).
//!
//! Two strategies are offered:
//!   * [`reduce`] — bottom-up, layer-by-layer radix sort on `(label, target)`
//!     pairs, breaking each layer into same-signature buckets with a
//!     union-find, without ever materializing a full string signature.
//!   * [`reduce_dfs_map`] — a simpler, asymptotically worse alternative that
//!     hashes each node's [`crate::implementation::core::Mdd::node_signature`]
//!     string in a `HashMap`; kept around to cross-check `reduce`'s bucket
//!     assignment on small instances (see the integration test that compares
//!     the two node counts).

use fxhash::FxHashMap;

use crate::implementation::core::{Mdd, NodeId};
use crate::union_find::UnionFind;

/// An escape sentinel greater than every real label, used so that a node's
/// "missing" arcs (it has fewer children than `max_dom_size`) still produce
/// a well-defined radix key: nodes are bucketed first by whether they *have*
/// an arc for the label currently being processed, and nodes with no such
/// arc all route to the same "no arc" bucket.
fn escape(mdd: &Mdd) -> u32 {
    mdd.max_dom_size() as u32
}

/// Reduces `mdd` in place: bottom-up from the layer just above the terminal
/// up to the root, partitions each layer into classes of mutually
/// equivalent nodes (same signature), retargets every incoming arc of a
/// non-representative node to its layer's representative, and finally drops
/// the now-unreachable non-representative nodes.
///
/// Layer `n` (the terminal) and layer 0 (the root) are never merged with
/// anything else: I5 guarantees they are already singletons.
pub fn reduce(mdd: &mut Mdd) {
    let n = mdd.nb_vars();
    for layer in (0..n).rev() {
        reduce_layer(mdd, layer);
    }
    mdd.clean();
}

/// Partitions the nodes of `layer` into equivalence classes and records, for
/// every non-representative node, a `merged_into` forwarding pointer to its
/// class's representative. Arcs pointing at a merged node are retargeted to
/// its representative as soon as the class is known, so parents never see a
/// stale target.
fn reduce_layer(mdd: &mut Mdd, layer: usize) {
    let ids: Vec<NodeId> = mdd.layer_ids(layer).collect();
    if ids.len() <= 1 {
        return;
    }
    let mut uf = UnionFind::new(ids.len());

    // Radix pass: one round per possible arc "rank" (0, 1, 2, ...), widest
    // out-degree in the layer bounds how many rounds are needed. Within a
    // round, bucket the still-undistinguished nodes by the pair (label,
    // representative-of-target) of their k-th outgoing arc, using the escape
    // sentinel for nodes that have no k-th arc at all.
    let max_out_degree = ids.iter().map(|&id| mdd.get_node(id).out_degree()).max().unwrap_or(0);
    let esc = escape(mdd);

    // classes[i] = current group id of ids[i]; refined every round.
    let mut classes = vec![0u32; ids.len()];

    for k in 0..=max_out_degree {
        let mut keys: Vec<(u32, u32, u32)> = Vec::with_capacity(ids.len());
        for (i, &id) in ids.iter().enumerate() {
            let kth = mdd.arcs_of(id).nth(k);
            let key = match kth {
                Some(a) => {
                    let arc = mdd.get_arc_data(a);
                    // The target lives one layer ahead, which was already
                    // reduced by an earlier (higher-layer) iteration of the
                    // caller's bottom-up loop, so its leader is stable for
                    // the remainder of this function.
                    let target = mdd.leader(arc.end()).index() as u32;
                    (arc.label(), target, classes[i])
                }
                None => (esc, esc, classes[i]),
            };
            keys.push(key);
        }
        // Stable-sort the layer's nodes by (prior class, key) so that a
        // node's new class only ever gets finer, never coarser.
        let mut order: Vec<usize> = (0..ids.len()).collect();
        order.sort_by_key(|&i| (classes[i], keys[i]));
        let mut next_class = 0u32;
        let mut prev: Option<(u32, (u32, u32, u32))> = None;
        let mut refined = vec![0u32; ids.len()];
        for &i in &order {
            let cur = (classes[i], keys[i]);
            if prev != Some(cur) {
                if prev.is_some() {
                    next_class += 1;
                }
                prev = Some(cur);
            }
            refined[i] = next_class;
        }
        classes = refined;
    }

    // Union every pair of nodes that ended up in the same final class, then
    // forward every non-representative to its class's chosen representative.
    let mut class_rep: FxHashMap<u32, usize> = FxHashMap::default();
    for (i, &cls) in classes.iter().enumerate() {
        match class_rep.get(&cls) {
            Some(&rep) => {
                uf.union(rep, i);
            }
            None => {
                class_rep.insert(cls, i);
            }
        }
    }

    let mut set_rep: FxHashMap<usize, NodeId> = FxHashMap::default();
    for i in 0..ids.len() {
        let root = uf.find(i);
        set_rep.entry(root).or_insert(ids[i]);
    }
    for i in 0..ids.len() {
        let root = uf.find(i);
        let rep = set_rep[&root];
        if rep != ids[i] {
            mdd.set_merged_into(ids[i], Some(rep));
            retarget_incoming(mdd, ids[i], rep);
        } else {
            mdd.set_merged_into(ids[i], Some(ids[i]));
        }
    }
}

/// Every incoming arc of `from` is redirected to `to`. Since I3 does not
/// track a node's *incoming* arc list (only the degree), this walks the
/// parent layer's nodes; acceptable since it only runs once per merged node
/// and the parent layer was already visited by an earlier (higher `layer`)
/// call to `reduce_layer`.
fn retarget_incoming(mdd: &mut Mdd, from: NodeId, to: NodeId) {
    let parent_layer = mdd.get_node(from).layer().wrapping_sub(1);
    if mdd.get_node(from).layer() == 0 {
        return;
    }
    let parents: Vec<NodeId> = mdd.layer_ids(parent_layer).collect();
    for p in parents {
        let arcs: Vec<_> = mdd.arcs_of(p).collect();
        for a in arcs {
            if mdd.get_arc_data(a).end() == from {
                mdd.update_arc(a, Some(to));
            }
        }
    }
}

/// A reference implementation of reduction that computes each node's
/// [`crate::implementation::core::Mdd::node_signature`] directly and
/// deduplicates with a hash map. Quadratic in the worst case (signature
/// strings can be as long as the node's out-degree), but simple enough to
/// trust as an oracle for testing [`reduce`] against.
pub fn reduce_dfs_map(mdd: &mut Mdd) {
    let n = mdd.nb_vars();
    for layer in (0..n).rev() {
        let ids: Vec<NodeId> = mdd.layer_ids(layer).collect();
        if ids.len() <= 1 {
            if let Some(&only) = ids.first() {
                mdd.set_merged_into(only, Some(only));
            }
            continue;
        }
        let mut by_sig: FxHashMap<String, NodeId> = FxHashMap::default();
        for &id in &ids {
            let sig = mdd.node_signature(id);
            match by_sig.get(&sig) {
                Some(&rep) => {
                    mdd.set_merged_into(id, Some(rep));
                    retarget_incoming(mdd, id, rep);
                }
                None => {
                    by_sig.insert(sig, id);
                    mdd.set_merged_into(id, Some(id));
                }
            }
        }
    }
    mdd.clean();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an unreduced 2-variable, domain-{0,1} MDD encoding {(0,0),
    /// (1,0)}: two distinct layer-1 nodes that both have a single arc
    /// labelled 0 to the terminal, so they should merge into one.
    fn redundant_mdd() -> Mdd {
        let mut mdd = Mdd::new(2);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        let a = mdd.create_node(1);
        let b = mdd.create_node(1);
        mdd.add_arc(mdd.root(), 0, a);
        mdd.add_arc(mdd.root(), 1, b);
        mdd.add_arc(a, 0, mdd.terminal());
        mdd.add_arc(b, 0, mdd.terminal());
        mdd
    }

    #[test]
    fn reduce_merges_equivalent_layer_one_nodes() {
        let mut mdd = redundant_mdd();
        reduce(&mut mdd);
        assert_eq!(1, mdd.layer_size(1));
        assert!(mdd.contains(&[0, 0]).unwrap());
        assert!(mdd.contains(&[1, 0]).unwrap());
        assert!(!mdd.contains(&[0, 1]).unwrap());
        assert!(mdd.check_invariants().is_ok());
    }

    #[test]
    fn reduce_and_reduce_dfs_map_agree_on_node_count() {
        let mut by_radix = redundant_mdd();
        reduce(&mut by_radix);
        let mut by_map = redundant_mdd();
        reduce_dfs_map(&mut by_map);
        assert_eq!(by_radix.size(), by_map.size());
    }

    #[test]
    fn reduce_is_a_no_op_on_an_already_reduced_mdd() {
        let mut mdd = Mdd::new(1);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        mdd.add_arc(mdd.root(), 0, mdd.terminal());
        reduce(&mut mdd);
        assert_eq!(2, mdd.size());
        assert!(mdd.contains(&[0]).unwrap());
    }

    #[test]
    fn reduce_preserves_distinct_nodes_with_different_signatures() {
        // layer-1 node a -> terminal via 0, node b -> terminal via 1: not
        // equivalent, must both survive.
        let mut mdd = Mdd::new(2);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        let a = mdd.create_node(1);
        let b = mdd.create_node(1);
        mdd.add_arc(mdd.root(), 0, a);
        mdd.add_arc(mdd.root(), 1, b);
        mdd.add_arc(a, 0, mdd.terminal());
        mdd.add_arc(b, 1, mdd.terminal());
        reduce(&mut mdd);
        assert_eq!(2, mdd.layer_size(1));
        assert!(mdd.contains(&[0, 0]).unwrap());
        assert!(mdd.contains(&[1, 1]).unwrap());
        assert!(!mdd.contains(&[0, 1]).unwrap());
        assert!(!mdd.contains(&[1, 0]).unwrap());
    }
}
