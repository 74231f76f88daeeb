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

//! Plain data definitions for the nodes of an [`crate::Mdd`]. All of the
//! actual graph algorithms (arc insertion, reduction, apply, ...) live on
//! `Mdd` itself rather than on `Node`: a node's arcs are allocated out of the
//! `Mdd`'s own arc arena, so any operation that touches them needs access to
//! that arena anyway. This mirrors the "typed arena + node indices" adaptation
//! recommended for a Rust MDD: no raw pointers, no reference cycles.

/// The identifier of a node: its position in the `nodes` arena of the owning
/// [`crate::Mdd`]. Ids are handed out by a bump allocator and are never
/// reused, even after the node they named has been logically deleted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);
impl NodeId {
    /// The raw numeric value of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node from a layer of an [`crate::Mdd`].
///
/// # Scratch fields
/// `bucket`, `merged_into` and `visited` are write-once-per-pass fields used
/// by [`crate::reduce`], [`crate::apply`] and the traversal helpers. They are
/// only meaningful for the duration of the algorithm that wrote them; no
/// algorithm may assume a scratch field set by a previous pass still holds
/// useful data.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) layer: usize,
    /// Head of this node's sorted-by-label outgoing arc list.
    pub(crate) first_arc: Option<super::arc::ArcId>,
    /// Tail of the outgoing arc list, so that `add_arc_last` is O(1).
    pub(crate) last_arc: Option<super::arc::ArcId>,
    pub(crate) out_degree: u32,
    pub(crate) in_degree: u32,
    /// True once this node has been logically deleted (forwarded by reduce,
    /// dropped by restrict, or cleaned up after relax). Dead nodes are
    /// skipped by every traversal but their id is never recycled.
    pub(crate) dead: bool,
    /// Intrusive doubly-linked layer membership list, maintained by
    /// [`crate::Mdd::add_list`] / [`crate::Mdd::remove_list`].
    pub(crate) layer_prev: Option<NodeId>,
    pub(crate) layer_next: Option<NodeId>,

    // --- scratch fields, valid only within one algorithmic pass ----------
    pub(crate) bucket: u32,
    pub(crate) merged_into: Option<NodeId>,
    pub(crate) visited: bool,
}
impl Node {
    pub(crate) fn new(id: NodeId, layer: usize) -> Self {
        Node {
            id,
            layer,
            first_arc: None,
            last_arc: None,
            out_degree: 0,
            in_degree: 0,
            dead: false,
            layer_prev: None,
            layer_next: None,
            bucket: 0,
            merged_into: None,
            visited: false,
        }
    }
    /// The id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }
    /// The layer (variable index) this node belongs to.
    pub fn layer(&self) -> usize {
        self.layer
    }
    /// Number of arcs leaving this node.
    pub fn out_degree(&self) -> usize {
        self.out_degree as usize
    }
    /// Number of arcs entering this node (I3: equals the number of arcs
    /// whose `end` is this node).
    pub fn in_degree(&self) -> usize {
        self.in_degree as usize
    }
    /// True iff this node has no outgoing arcs. By invariant I4, only the
    /// terminal node is allowed to be a non-dead leaf in a reduced MDD.
    pub fn is_leaf(&self) -> bool {
        self.out_degree == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_has_no_arcs() {
        let n = Node::new(NodeId(0), 2);
        assert_eq!(0, n.out_degree());
        assert_eq!(0, n.in_degree());
        assert!(n.is_leaf());
        assert_eq!(2, n.layer());
    }
}
