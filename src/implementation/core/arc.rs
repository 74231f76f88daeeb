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

//! Plain data definition for the arcs of an [`crate::Mdd`].

use super::node::NodeId;
use crate::Value;

/// The identifier of an arc: its position in the `arcs` arena of the owning
/// [`crate::Mdd`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ArcId(pub(crate) u32);
impl ArcId {
    /// The raw numeric value of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An arc `start --label--> end`. I2 requires `end.layer == start.layer + 1`.
///
/// Arcs participate in a single intrusive list: the sorted-by-label
/// outgoing list of `start` (`prev`/`next`).
#[derive(Debug, Clone, Copy)]
pub struct Arc {
    pub(crate) id: ArcId,
    pub(crate) start: NodeId,
    pub(crate) end: NodeId,
    pub(crate) label: Value,
    pub(crate) prev: Option<ArcId>,
    pub(crate) next: Option<ArcId>,
    pub(crate) dead: bool,
}
impl Arc {
    pub(crate) fn new(id: ArcId, start: NodeId, end: NodeId, label: Value) -> Self {
        Arc { id, start, end, label, prev: None, next: None, dead: false }
    }
    /// The id of this arc.
    pub fn id(&self) -> ArcId {
        self.id
    }
    /// The node this arc leaves from.
    pub fn start(&self) -> NodeId {
        self.start
    }
    /// The node this arc points to.
    pub fn end(&self) -> NodeId {
        self.end
    }
    /// The value this arc assigns to `start`'s variable.
    pub fn label(&self) -> Value {
        self.label
    }
}
