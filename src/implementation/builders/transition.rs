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

//! Builds an MDD straight from a flat, DFS-ordered list of `(start_id,
//! value, end_id)` transitions, with `start_id`/`end_id` dense integers
//! assigned by whatever produced the list (e.g. a prior MDD's own node ids,
//! or a compiler pass over some other representation). No deduplication and
//! no reduce pass: the caller vouches for the shape already being sound.

use fxhash::FxHashMap;

use crate::common::DomainSpec;
use crate::error::{MddError, MddResult};
use crate::implementation::core::{Mdd, NodeId};
use crate::Value;

/// One edge of the flat transition listing: `start` and `end` are the
/// caller's own dense node ids, not [`NodeId`]s.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub start: usize,
    pub value: Value,
    pub end: usize,
}

/// Builds the MDD described by `transitions`.
///
/// The listing must be in DFS order: transition `i`'s `start` must already
/// have been reached (either it is `0`, the implicit root, or it appeared
/// as some earlier transition's `end`). A transition whose layer is the
/// last one is wired to the terminal instead of to `end`, regardless of
/// what caller id `end` names.
///
/// # Errors
/// Returns [`MddError::InvariantViolation`] if a transition's `start` has
/// not yet been reached in DFS order.
pub fn build(n: usize, doms: impl Into<DomainSpec>, transitions: &[Transition]) -> MddResult<Mdd> {
    let mut mdd = Mdd::new(n);
    mdd.set_dom_size(doms);
    mdd.build_root_and_terminal();

    let mut nodes: FxHashMap<usize, NodeId> = FxHashMap::default();
    nodes.insert(0, mdd.root());
    let mut layer_of: FxHashMap<usize, usize> = FxHashMap::default();
    layer_of.insert(0, 0);

    for t in transitions {
        let start_id = nodes.get(&t.start).copied().ok_or(MddError::InvariantViolation(
            "transition's start id must already have been reached in DFS order",
        ))?;
        let layer = layer_of[&t.start];
        let end_id = if layer + 1 == n {
            mdd.terminal()
        } else if let Some(&id) = nodes.get(&t.end) {
            id
        } else {
            let id = mdd.create_node(layer + 1);
            nodes.insert(t.end, id);
            layer_of.insert(t.end, layer + 1);
            id
        };
        mdd.add_arc_last(start_id, t.value, end_id);
    }
    Ok(mdd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_follows_the_listed_transitions() {
        // root(0) -0-> 1 -0-> terminal ; root(0) -1-> 2 -1-> terminal
        let transitions =
            vec![Transition { start: 0, value: 0, end: 1 }, Transition { start: 0, value: 1, end: 2 }, Transition {
                start: 1,
                value: 0,
                end: 99,
            }, Transition { start: 2, value: 1, end: 99 }];
        let mdd = build(2, 2usize, &transitions).unwrap();
        assert!(mdd.contains(&[0, 0]).unwrap());
        assert!(mdd.contains(&[1, 1]).unwrap());
        assert!(!mdd.contains(&[0, 1]).unwrap());
        assert!(!mdd.contains(&[1, 0]).unwrap());
    }

    #[test]
    fn build_rejects_a_transition_whose_start_was_never_reached() {
        let transitions = vec![Transition { start: 7, value: 0, end: 1 }];
        assert!(matches!(build(2, 2usize, &transitions), Err(MddError::InvariantViolation(_))));
    }
}
