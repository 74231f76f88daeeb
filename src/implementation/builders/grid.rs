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

//! Builds an MDD as an explicit layered state machine: every `(depth,
//! state)` pair is materialised as its own node up front, and the caller
//! wires transitions between them by state id rather than by [`NodeId`].
//! Meant for machines unrolled the same way at every depth (automata,
//! regular constraints); [`super::automaton`] is built on top of this.

use crate::common::DomainSpec;
use crate::implementation::core::{Mdd, NodeId};
use crate::reduce;
use crate::Value;

/// Incrementally wires a grid-shaped MDD, then prunes and reduces it.
///
/// `grid[depth]` holds one node per state for the unrolled layer at depth
/// `depth`, i.e. MDD layer `depth + 1`; there are `n - 1` such depths
/// (layers `1..n-1`), with layer `0` (the root) and layer `n` (the
/// terminal) handled separately by the `_starting_`/`_ending_` methods.
pub struct GridBuilder {
    mdd: Mdd,
    grid: Vec<Vec<NodeId>>,
}

impl GridBuilder {
    /// Allocates the grid: `n` variables, `num_states` states per depth.
    ///
    /// # Panics
    /// Panics if `n < 2`; a grid needs at least one unrolled depth between
    /// the root and the terminal.
    pub fn new(n: usize, doms: impl Into<DomainSpec>, num_states: usize) -> Self {
        assert!(n >= 2, "a grid needs at least two variables");
        let mut mdd = Mdd::new(n);
        mdd.set_dom_size(doms);
        mdd.build_root_and_terminal();
        let grid = (0..n - 1).map(|depth| (0..num_states).map(|_| mdd.create_node(depth + 1)).collect()).collect();
        GridBuilder { mdd, grid }
    }

    /// Applies the same `(start, value, end)` transition at every depth
    /// except the last, using the checked, order-preserving insert.
    pub fn add_transition(&mut self, start: usize, value: Value, end: usize) {
        for depth in 0..self.grid.len().saturating_sub(1) {
            let s = self.grid[depth][start];
            let e = self.grid[depth + 1][end];
            self.mdd.add_arc(s, value, e);
        }
    }

    /// Like [`Self::add_transition`], but uses the unchecked tail insert:
    /// the caller must add transitions for each `start` in ascending
    /// `value` order.
    pub fn add_transition_last(&mut self, start: usize, value: Value, end: usize) {
        for depth in 0..self.grid.len().saturating_sub(1) {
            let s = self.grid[depth][start];
            let e = self.grid[depth + 1][end];
            self.mdd.add_arc_last(s, value, e);
        }
    }

    /// Wires the root to the first depth's `end` state on `value`.
    pub fn add_starting_transition(&mut self, value: Value, end: usize) {
        let root = self.mdd.root();
        let target = self.grid[0][end];
        self.mdd.add_arc(root, value, target);
    }

    /// Unchecked tail-insert variant of [`Self::add_starting_transition`].
    pub fn add_starting_transition_last(&mut self, value: Value, end: usize) {
        let root = self.mdd.root();
        let target = self.grid[0][end];
        self.mdd.add_arc_last(root, value, target);
    }

    /// Wires the last depth's `start` state to the terminal on `value`.
    pub fn add_ending_transition(&mut self, start: usize, value: Value) {
        let last = self.grid.len() - 1;
        let s = self.grid[last][start];
        let terminal = self.mdd.terminal();
        self.mdd.add_arc(s, value, terminal);
    }

    /// Unchecked tail-insert variant of [`Self::add_ending_transition`].
    pub fn add_ending_transition_last(&mut self, start: usize, value: Value) {
        let last = self.grid.len() - 1;
        let s = self.grid[last][start];
        let terminal = self.mdd.terminal();
        self.mdd.add_arc_last(s, value, terminal);
    }

    /// Deletes every grid state with zero in-degree (states the caller
    /// never wired a transition into) and canonicalises the result.
    pub fn build(mut self) -> Mdd {
        let dead: Vec<NodeId> =
            self.grid.iter().flatten().copied().filter(|&id| self.mdd.get_node(id).in_degree() == 0).collect();
        for id in dead {
            self.mdd.delete_node(id);
        }
        reduce::reduce(&mut self.mdd);
        self.mdd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 variables, 2 states, domain {0,1}. Encodes exactly the tuples
    /// {(0,0,0), (0,1,1), (1,0,0), (1,1,0)}.
    fn toggle_grid() -> GridBuilder {
        let mut b = GridBuilder::new(3, 2usize, 2);
        b.add_starting_transition(0, 0);
        b.add_starting_transition(1, 1);
        b.add_transition(0, 0, 0);
        b.add_transition(0, 1, 1);
        b.add_transition(1, 0, 0);
        b.add_transition(1, 1, 0);
        b.add_ending_transition(0, 0);
        b.add_ending_transition(1, 1);
        b
    }

    #[test]
    fn build_follows_the_wired_transitions() {
        let mdd = toggle_grid().build();
        assert!(mdd.contains(&[0, 0, 0]).unwrap());
        assert!(mdd.contains(&[0, 1, 1]).unwrap());
        assert!(mdd.contains(&[1, 0, 0]).unwrap());
        assert!(mdd.contains(&[1, 1, 0]).unwrap());
        assert!(!mdd.contains(&[1, 1, 1]).unwrap());
        assert!(!mdd.contains(&[0, 0, 1]).unwrap());
    }

    #[test]
    fn build_prunes_states_with_no_incoming_arc() {
        let mut b = GridBuilder::new(3, 2usize, 3);
        b.add_starting_transition(0, 0);
        b.add_transition(0, 0, 0);
        b.add_ending_transition(0, 0);
        // state 1 and 2 of the single inner depth are never targeted.
        let mdd = b.build();
        assert_eq!(1, mdd.layer_size(1));
    }
}
