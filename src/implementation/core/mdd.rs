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

//! The `Mdd` data structure: a layered DAG over `n+1` layers, backed by two
//! bump arenas (`nodes`, `arcs`) indexed by [`NodeId`]/[`ArcId`]. Layer
//! membership and a node's outgoing arc list are both intrusive doubly-linked
//! lists threaded through the arena entries, so creating a node, appending an
//! arc, or splicing a node out of its layer are all O(1).
//!
//! All the operations a node or arc "owns" in the language-neutral design
//! (`addArc`, `updateArc`, `toString`, ...) are implemented here as methods
//! on `Mdd` parameterized by a [`NodeId`]/[`ArcId`], since mutating an arc
//! list requires access to the arena it was allocated from.

use std::collections::HashMap;

use super::arc::{Arc, ArcId};
use super::node::{Node, NodeId};
use crate::error::{MddError, MddResult, ShapeMismatch};
use crate::{DomainSpec, Value, Variable};

/// Head/tail pointers and a running count for one layer's intrusive node list.
#[derive(Debug, Clone, Copy, Default)]
struct LayerList {
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

/// A layered DAG representing a set of `n`-tuples. See the module
/// documentation for the arena/intrusive-list design.
#[derive(Debug, Clone)]
pub struct Mdd {
    n: usize,
    dom_size: Vec<usize>,
    max_dom_size: usize,
    nodes: Vec<Node>,
    arcs: Vec<Arc>,
    layers: Vec<LayerList>,
    /// Nodes forwarded by a reduction or relaxation pass, awaiting [`Mdd::clean`].
    pending_deletion: Vec<NodeId>,
    node_count: usize,
    arc_count: usize,
    root: Option<NodeId>,
    terminal: Option<NodeId>,
}

impl Mdd {
    /// Creates an empty `n`-variable MDD: `n+1` empty layers, no domain
    /// sizes set yet, and no root/terminal node. Call
    /// [`Mdd::build_root_and_terminal`] and [`Mdd::set_dom_size`] before
    /// using the other operations.
    pub fn new(n: usize) -> Self {
        Mdd {
            n,
            dom_size: vec![0; n],
            max_dom_size: 0,
            nodes: Vec::new(),
            arcs: Vec::new(),
            layers: vec![LayerList::default(); n + 1],
            pending_deletion: Vec::new(),
            node_count: 0,
            arc_count: 0,
            root: None,
            terminal: None,
        }
    }

    /// Number of variables (layers 0 through n-1 take decisions; layer n is
    /// the terminal).
    pub fn nb_vars(&self) -> usize {
        self.n
    }

    /// Accepts a single domain size for every layer, one size per layer, or
    /// anything else convertible to a [`DomainSpec`].
    pub fn set_dom_size<D: Into<DomainSpec>>(&mut self, spec: D) {
        let sizes = spec.into().resolve(self.n);
        self.max_dom_size = self.max_dom_size.max(sizes.iter().copied().max().unwrap_or(0));
        self.dom_size = sizes;
    }

    /// The domain size of layer `i` (`0 <= i < n`).
    pub fn dom_size(&self, i: usize) -> usize {
        self.dom_size[i]
    }

    /// The largest domain size across all layers; doubles as the escape
    /// sentinel used by [`crate::reduce`].
    pub fn max_dom_size(&self) -> usize {
        self.max_dom_size
    }

    /// Creates the two distinguished nodes: the root (layer 0) and the
    /// terminal (layer n).
    ///
    /// # Panics
    /// Panics if called more than once on the same `Mdd`.
    pub fn build_root_and_terminal(&mut self) {
        assert!(self.root.is_none() && self.terminal.is_none(), "root/terminal already built");
        self.root = Some(self.create_node(0));
        self.terminal = Some(self.create_node(self.n));
    }

    /// The root node (I5: the only node of layer 0).
    ///
    /// # Panics
    /// Panics if [`Mdd::build_root_and_terminal`] has not been called.
    pub fn root(&self) -> NodeId {
        self.root.expect("build_root_and_terminal must be called first")
    }

    /// The terminal node (I5: the only node of layer n).
    ///
    /// # Panics
    /// Panics if [`Mdd::build_root_and_terminal`] has not been called.
    pub fn terminal(&self) -> NodeId {
        self.terminal.expect("build_root_and_terminal must be called first")
    }

    /// Allocates a fresh node at `layer` and prepends it to that layer's list.
    pub fn create_node(&mut self, layer: usize) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, layer));
        self.add_list(id);
        self.node_count += 1;
        id
    }

    /// Prepends `id` to its layer's intrusive membership list. Only ever
    /// needed if a node was previously removed with [`Mdd::remove_list`] and
    /// is being reinstated (e.g. relax-reduce re-homing a representative
    /// node within the same layer it was built in).
    pub fn add_list(&mut self, id: NodeId) {
        let layer = self.node(id).layer;
        let old_head = self.layers[layer].head;
        {
            let n = self.node_mut(id);
            n.layer_prev = None;
            n.layer_next = old_head;
        }
        if let Some(h) = old_head {
            self.node_mut(h).layer_prev = Some(id);
        }
        self.layers[layer].head = Some(id);
        if self.layers[layer].tail.is_none() {
            self.layers[layer].tail = Some(id);
        }
        self.layers[layer].len += 1;
    }

    /// Splices `id` out of its layer's membership list in O(1). Does not
    /// touch the node's arcs; callers that are deleting a node outright
    /// should go through [`Mdd::delete_node`] instead.
    pub fn remove_list(&mut self, id: NodeId) {
        let layer = self.node(id).layer;
        let (prev, next) = {
            let n = self.node(id);
            (n.layer_prev, n.layer_next)
        };
        match prev {
            Some(p) => self.node_mut(p).layer_next = next,
            None => self.layers[layer].head = next,
        }
        match next {
            Some(nx) => self.node_mut(nx).layer_prev = prev,
            None => self.layers[layer].tail = prev,
        }
        self.layers[layer].len -= 1;
        let n = self.node_mut(id);
        n.layer_prev = None;
        n.layer_next = None;
    }

    /// Moves the nodes of `other`'s layer `layer` into `self`'s layer
    /// `layer`, each getting a freshly allocated id in `self`'s arena, and
    /// empties `other`'s layer list.
    ///
    /// # Contract
    /// This only re-homes the nodes themselves (an O(1)-per-node splice of
    /// identity, matching the source library's O(1) list splice). It does
    /// **not** copy `other`'s outgoing arcs, since those would dangle until
    /// their target layer has *also* been migrated: `other` is expected to
    /// be a scratch MDD under active construction, and callers rebuild each
    /// moved node's outgoing arcs using the returned `old -> new` id map
    /// once the next layer has been migrated too.
    pub fn add_layer(&mut self, other: &mut Mdd, layer: usize) -> HashMap<NodeId, NodeId> {
        let mut remap = HashMap::new();
        let ids: Vec<NodeId> = other.layer_ids(layer).collect();
        for old_id in ids {
            let new_id = self.create_node(layer);
            remap.insert(old_id, new_id);
        }
        other.layers[layer] = LayerList::default();
        remap
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
    /// Read-only access to a node, for callers (reduce, apply, traversal)
    /// that need its scratch fields or degree counters.
    pub fn get_node(&self, id: NodeId) -> &Node {
        self.node(id)
    }
    /// Read-only access to an arc.
    pub fn get_arc_data(&self, id: ArcId) -> &Arc {
        &self.arcs[id.index()]
    }

    /// Sets the scratch `bucket` field used by [`crate::reduce`].
    pub fn set_bucket(&mut self, id: NodeId, bucket: u32) {
        self.node_mut(id).bucket = bucket;
    }
    /// Reads the scratch `bucket` field.
    pub fn bucket(&self, id: NodeId) -> u32 {
        self.node(id).bucket
    }
    /// Sets the scratch `merged_into` forwarding pointer.
    pub fn set_merged_into(&mut self, id: NodeId, target: Option<NodeId>) {
        self.node_mut(id).merged_into = target;
        if target.is_some() {
            self.pending_deletion.push(id);
        }
    }
    /// Reads the scratch `merged_into` forwarding pointer, resolved through
    /// as many hops as necessary (path-compression-free: reduce always
    /// forwards directly to a layer leader, never through a chain).
    pub fn leader(&self, id: NodeId) -> NodeId {
        match self.node(id).merged_into {
            Some(t) if t != id => self.leader(t),
            _ => id,
        }
    }
    /// Sets the scratch `visited` mark used by the traversal helpers.
    pub fn set_visited(&mut self, id: NodeId, v: bool) {
        self.node_mut(id).visited = v;
    }
    /// Reads the scratch `visited` mark.
    pub fn visited(&self, id: NodeId) -> bool {
        self.node(id).visited
    }
    /// Clears the `visited` mark on every live node; call before a traversal
    /// that relies on it as a once-per-pass guard.
    pub fn clear_visited_marks(&mut self) {
        for n in self.nodes.iter_mut() {
            n.visited = false;
        }
    }

    // ------------------------------------------------------------------
    // --- Arc operations ------------------------------------------------
    // ------------------------------------------------------------------

    fn alloc_arc(&mut self, start: NodeId, label: Value, end: NodeId) -> ArcId {
        let id = ArcId(self.arcs.len() as u32);
        self.arcs.push(Arc::new(id, start, end, label));
        self.arc_count += 1;
        id
    }
    fn finish_insert(&mut self, start: NodeId, end: NodeId) {
        self.node_mut(start).out_degree += 1;
        self.node_mut(end).in_degree += 1;
    }
    fn splice_arc(&mut self, start: NodeId, id: ArcId, prev: Option<ArcId>, next: Option<ArcId>) {
        self.arcs[id.index()].prev = prev;
        self.arcs[id.index()].next = next;
        match prev {
            Some(p) => self.arcs[p.index()].next = Some(id),
            None => self.node_mut(start).first_arc = Some(id),
        }
        match next {
            Some(nx) => self.arcs[nx.index()].prev = Some(id),
            None => self.node_mut(start).last_arc = Some(id),
        }
    }

    /// Inserts arc `(label -> target)` into `node`'s sorted outgoing list,
    /// preserving I1. If `node` already has an arc labelled `label`, its
    /// endpoint is retargeted to `target` instead (used by rewrite passes).
    pub fn add_arc(&mut self, node: NodeId, label: Value, target: NodeId) -> ArcId {
        if let Some(existing) = self.get_arc(node, label) {
            self.update_arc(existing, Some(target));
            return existing;
        }
        let mut cur = self.node(node).first_arc;
        while let Some(a) = cur {
            if self.arcs[a.index()].label > label {
                break;
            }
            cur = self.arcs[a.index()].next;
        }
        match cur {
            Some(before) => self.add_arc_before(node, label, target, before),
            None => self.add_arc_last(node, label, target),
        }
    }

    /// Unchecked insert at the tail of `node`'s arc list. The caller must
    /// have proof that `label` is greater than every existing label on
    /// `node` (e.g. because values are enumerated in ascending order).
    pub fn add_arc_last(&mut self, node: NodeId, label: Value, target: NodeId) -> ArcId {
        let id = self.alloc_arc(node, label, target);
        let tail = self.node(node).last_arc;
        self.splice_arc(node, id, tail, None);
        self.finish_insert(node, target);
        id
    }

    /// Unchecked insert at the head of `node`'s arc list.
    pub fn add_arc_first(&mut self, node: NodeId, label: Value, target: NodeId) -> ArcId {
        let id = self.alloc_arc(node, label, target);
        let head = self.node(node).first_arc;
        self.splice_arc(node, id, None, head);
        self.finish_insert(node, target);
        id
    }

    /// Unchecked insert immediately after `after` in `node`'s arc list.
    pub fn add_arc_after(&mut self, node: NodeId, label: Value, target: NodeId, after: ArcId) -> ArcId {
        let id = self.alloc_arc(node, label, target);
        let next = self.arcs[after.index()].next;
        self.splice_arc(node, id, Some(after), next);
        self.finish_insert(node, target);
        id
    }

    /// Unchecked insert immediately before `before` in `node`'s arc list.
    pub fn add_arc_before(&mut self, node: NodeId, label: Value, target: NodeId, before: ArcId) -> ArcId {
        let id = self.alloc_arc(node, label, target);
        let prev = self.arcs[before.index()].prev;
        self.splice_arc(node, id, prev, Some(before));
        self.finish_insert(node, target);
        id
    }

    /// Looks up the arc leaving `node` labelled `label`. Linear in the
    /// number of `node`'s outgoing arcs, with an early exit once the sorted
    /// list passes `label`.
    pub fn get_arc(&self, node: NodeId, label: Value) -> Option<ArcId> {
        let mut cur = self.node(node).first_arc;
        while let Some(a) = cur {
            let arc = &self.arcs[a.index()];
            if arc.label == label {
                return Some(a);
            }
            if arc.label > label {
                return None;
            }
            cur = arc.next;
        }
        None
    }

    /// Retargets `arc` to `new_target`, fixing up in-degree counters. A
    /// `new_target` of `None` deletes the arc instead.
    pub fn update_arc(&mut self, arc: ArcId, new_target: Option<NodeId>) {
        match new_target {
            None => self.delete_arc(arc),
            Some(t) => {
                let old_end = self.arcs[arc.index()].end;
                if old_end == t {
                    return;
                }
                self.node_mut(old_end).in_degree -= 1;
                self.arcs[arc.index()].end = t;
                self.node_mut(t).in_degree += 1;
            }
        }
    }

    /// Removes `arc` from its start node's outgoing list and frees it.
    pub fn delete_arc(&mut self, arc: ArcId) {
        let a = self.arcs[arc.index()];
        if a.dead {
            return;
        }
        match a.prev {
            Some(p) => self.arcs[p.index()].next = a.next,
            None => self.node_mut(a.start).first_arc = a.next,
        }
        match a.next {
            Some(nx) => self.arcs[nx.index()].prev = a.prev,
            None => self.node_mut(a.start).last_arc = a.prev,
        }
        self.node_mut(a.start).out_degree -= 1;
        self.node_mut(a.end).in_degree -= 1;
        self.arcs[arc.index()].dead = true;
        self.arc_count -= 1;
    }

    /// Iterates over `node`'s outgoing arcs in ascending label order.
    pub fn arcs_of(&self, node: NodeId) -> ArcIter<'_> {
        ArcIter { mdd: self, cur: self.node(node).first_arc }
    }

    /// The deterministic signature `"(v1,e1)(v2,e2)..."` of `node`'s sorted
    /// outgoing arcs, used by reduction and by the DFS-map alternative.
    pub fn node_signature(&self, node: NodeId) -> String {
        let mut s = String::new();
        for a in self.arcs_of(node) {
            let arc = &self.arcs[a.index()];
            s.push('(');
            s.push_str(&arc.label.to_string());
            s.push(',');
            s.push_str(&arc.end.0.to_string());
            s.push(')');
        }
        s
    }

    // ------------------------------------------------------------------
    // --- Layer access ----------------------------------------------------
    // ------------------------------------------------------------------

    /// Iterates over the live node ids of layer `i`, in list order.
    pub fn layer_ids(&self, i: usize) -> LayerIter<'_> {
        LayerIter { mdd: self, cur: self.layers[i].head }
    }
    /// Number of (live) nodes in layer `i`.
    pub fn layer_size(&self, i: usize) -> usize {
        self.layers[i].len
    }
    /// The largest layer size across the whole MDD.
    pub fn largest_layer_size(&self) -> usize {
        self.layers.iter().map(|l| l.len).max().unwrap_or(0)
    }
    /// Total number of live nodes.
    pub fn size(&self) -> usize {
        self.node_count
    }
    /// Total number of live arcs.
    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    /// Follows `tuple` from the root, one arc per layer, and reports whether
    /// the terminal is reached.
    ///
    /// # Errors
    /// Returns [`MddError::OutOfDomain`] if `tuple[i]` is not smaller than
    /// the domain size of layer `i`.
    pub fn contains(&self, tuple: &[Value]) -> MddResult<bool> {
        assert_eq!(tuple.len(), self.n, "tuple must assign exactly nb_vars() variables");
        let mut cur = self.root();
        for (i, &v) in tuple.iter().enumerate() {
            let dom = self.dom_size[i];
            if v as usize >= dom {
                return Err(MddError::OutOfDomain { variable: Variable(i), label: v as i64, domain_size: dom });
            }
            match self.get_arc(cur, v) {
                Some(a) => cur = self.arcs[a.index()].end,
                None => return Ok(false),
            }
        }
        Ok(cur == self.terminal())
    }

    /// Frees every node queued by a forwarding pass (reduce, relax-reduce):
    /// a node whose `merged_into` points to a different node is detached
    /// from its layer, has all of its outgoing arcs removed, and is marked
    /// dead. Nodes whose `merged_into` is `None` or points to themselves are
    /// left untouched (they are the layer's surviving leaders).
    pub fn clean(&mut self) {
        let pending = std::mem::take(&mut self.pending_deletion);
        for id in pending {
            let target = self.node(id).merged_into;
            if matches!(target, Some(t) if t != id) {
                self.delete_node(id);
            }
        }
    }

    /// Unconditionally removes `id`: detaches it from its layer, deletes
    /// every outgoing arc, and marks it dead. The id is never reused.
    pub fn delete_node(&mut self, id: NodeId) {
        if self.node(id).dead {
            return;
        }
        self.remove_list(id);
        let arcs: Vec<ArcId> = self.arcs_of(id).collect();
        for a in arcs {
            self.delete_arc(a);
        }
        self.node_mut(id).dead = true;
        self.node_count -= 1;
    }

    /// Checks two MDDs share the number of variables and, layer by layer,
    /// the same domain size. Used by [`crate::apply::run`] before combining
    /// two operands.
    pub fn check_same_shape(&self, other: &Mdd) -> MddResult<()> {
        if self.n != other.n {
            return Err(MddError::ShapeMismatch(ShapeMismatch::VariableCount { left: self.n, right: other.n }));
        }
        for i in 0..self.n {
            if self.dom_size[i] != other.dom_size[i] {
                return Err(MddError::ShapeMismatch(ShapeMismatch::DomainSize {
                    variable: Variable(i),
                    left: self.dom_size[i],
                    right: other.dom_size[i],
                }));
            }
        }
        Ok(())
    }

    /// Debug consistency checker for I1-I3 and I5: strictly ascending,
    /// pairwise-distinct outgoing labels, arcs only between consecutive
    /// layers, correct in-degree counters, and singleton root/terminal
    /// layers. Does not check I4 (that is precisely what reduce
    /// establishes).
    pub fn check_invariants(&self) -> MddResult<()> {
        if self.layer_size(0) != 1 {
            return Err(MddError::InvariantViolation("layer 0 must contain exactly the root (I5)"));
        }
        if self.layer_size(self.n) != 1 {
            return Err(MddError::InvariantViolation("layer n must contain exactly the terminal (I5)"));
        }
        let mut expected_in_degree = vec![0u32; self.nodes.len()];
        for layer in 0..=self.n {
            let mut last_label: Option<Value> = None;
            for id in self.layer_ids(layer) {
                for a in self.arcs_of(id) {
                    let arc = &self.arcs[a.index()];
                    if let Some(prev) = last_label {
                        if arc.label <= prev {
                            return Err(MddError::InvariantViolation("outgoing labels must be strictly ascending (I1)"));
                        }
                    }
                    last_label = Some(arc.label);
                    if self.node(arc.end).layer != layer + 1 {
                        return Err(MddError::InvariantViolation("arc must span consecutive layers (I2)"));
                    }
                    expected_in_degree[arc.end.index()] += 1;
                }
                last_label = None;
            }
        }
        for n in &self.nodes {
            if n.dead {
                continue;
            }
            if n.in_degree != expected_in_degree[n.id.index()] {
                return Err(MddError::InvariantViolation("in_degree must equal the number of incoming arcs (I3)"));
            }
        }
        Ok(())
    }
}

/// Iterator over the live node ids of one layer, in intrusive-list order.
pub struct LayerIter<'a> {
    mdd: &'a Mdd,
    cur: Option<NodeId>,
}
impl Iterator for LayerIter<'_> {
    type Item = NodeId;
    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.mdd.node(id).layer_next;
        Some(id)
    }
}

/// Iterator over one node's outgoing arcs, in ascending label order.
pub struct ArcIter<'a> {
    mdd: &'a Mdd,
    cur: Option<ArcId>,
}
impl Iterator for ArcIter<'_> {
    type Item = ArcId;
    fn next(&mut self) -> Option<ArcId> {
        let id = self.cur?;
        self.cur = self.mdd.arcs[id.index()].next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_mdd() -> Mdd {
        // 2 variables, domain {0,1} each: encodes the single tuple (0, 1).
        let mut mdd = Mdd::new(2);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        let mid = mdd.create_node(1);
        mdd.add_arc(mdd.root(), 0, mid);
        mdd.add_arc(mid, 1, mdd.terminal());
        mdd
    }

    #[test]
    fn contains_follows_matching_tuple_to_terminal() {
        let mdd = small_mdd();
        assert_eq!(Ok(true), mdd.contains(&[0, 1]));
    }

    #[test]
    fn contains_returns_false_for_missing_arc() {
        let mdd = small_mdd();
        assert_eq!(Ok(false), mdd.contains(&[1, 1]));
        assert_eq!(Ok(false), mdd.contains(&[0, 0]));
    }

    #[test]
    fn contains_reports_out_of_domain() {
        let mdd = small_mdd();
        assert!(matches!(mdd.contains(&[2, 0]), Err(MddError::OutOfDomain { .. })));
    }

    #[test]
    fn add_arc_keeps_labels_sorted() {
        let mut mdd = Mdd::new(1);
        mdd.set_dom_size(5usize);
        mdd.build_root_and_terminal();
        let r = mdd.root();
        let t = mdd.terminal();
        mdd.add_arc(r, 3, t);
        mdd.add_arc(r, 1, t);
        mdd.add_arc(r, 2, t);
        let labels: Vec<Value> = mdd.arcs_of(r).map(|a| mdd.get_arc_data(a).label()).collect();
        assert_eq!(vec![1, 2, 3], labels);
    }

    #[test]
    fn add_arc_on_existing_label_retargets() {
        let mut mdd = Mdd::new(1);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        let r = mdd.root();
        let t = mdd.terminal();
        let other = mdd.create_node(1);
        mdd.add_arc(r, 0, other);
        mdd.add_arc(r, 0, t);
        assert_eq!(1, mdd.get_node(r).out_degree());
        assert_eq!(0, mdd.get_node(other).in_degree());
        assert_eq!(1, mdd.get_node(t).in_degree());
    }

    #[test]
    fn delete_arc_fixes_degrees() {
        let mut mdd = Mdd::new(1);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        let r = mdd.root();
        let t = mdd.terminal();
        let a = mdd.add_arc(r, 0, t);
        mdd.delete_arc(a);
        assert_eq!(0, mdd.get_node(r).out_degree());
        assert_eq!(0, mdd.get_node(t).in_degree());
        assert_eq!(0, mdd.arc_count());
    }

    #[test]
    fn check_invariants_passes_on_well_formed_mdd() {
        let mdd = small_mdd();
        assert!(mdd.check_invariants().is_ok());
    }

    #[test]
    fn check_invariants_detects_unsorted_labels() {
        let mut mdd = Mdd::new(1);
        mdd.set_dom_size(3usize);
        mdd.build_root_and_terminal();
        let r = mdd.root();
        let t = mdd.terminal();
        // bypass add_arc's sort-on-insert by forcing an out-of-order splice
        mdd.add_arc_last(r, 2, t);
        mdd.add_arc_last(r, 1, t);
        assert!(mdd.check_invariants().is_err());
    }

    #[test]
    fn clean_drops_forwarded_nodes_but_keeps_leaders() {
        let mut mdd = Mdd::new(1);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        let t = mdd.terminal();
        let a = mdd.create_node(0);
        let b = mdd.create_node(0);
        mdd.add_arc(a, 0, t);
        mdd.set_merged_into(b, Some(a));
        mdd.clean();
        assert!(!mdd.get_node(a).dead);
        assert!(mdd.get_node(b).dead);
    }

    #[test]
    fn node_signature_matches_sorted_arc_list() {
        let mut mdd = Mdd::new(1);
        mdd.set_dom_size(3usize);
        mdd.build_root_and_terminal();
        let r = mdd.root();
        let t = mdd.terminal();
        mdd.add_arc(r, 1, t);
        mdd.add_arc(r, 0, t);
        let sig = mdd.node_signature(r);
        assert_eq!(format!("(0,{})(1,{})", t.index(), t.index()), sig);
    }

    #[test]
    fn add_layer_remaps_nodes_into_the_destination_arena() {
        let mut scratch = Mdd::new(2);
        scratch.set_dom_size(2usize);
        let s0 = scratch.create_node(1);
        let s1 = scratch.create_node(1);
        assert_eq!(2, scratch.layer_size(1));

        let mut main = Mdd::new(2);
        main.set_dom_size(2usize);
        main.build_root_and_terminal();
        let remap = main.add_layer(&mut scratch, 1);

        assert_eq!(0, scratch.layer_size(1));
        assert_eq!(2, main.layer_size(1));
        assert!(remap.contains_key(&s0));
        assert!(remap.contains_key(&s1));
        assert_ne!(remap[&s0], remap[&s1]);
    }
}
