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

//! Boolean combination of two shape-compatible MDDs ("Apply"): builds a new
//! MDD whose tuple set is some combination (intersection, union,
//! difference, ...) of the two operands' tuple sets.
//!
//! The combination is driven by an 8-bit [`OpMask`]: four bits describe what
//! to do at an *inner* layer (does the result keep branching, for each of
//! the four ways the two operands can or cannot offer a given label) and
//! four bits describe what to do at the *last* layer (does that same
//! four-way split mean the tuple is accepted into the result, i.e. gets an
//! arc into the terminal).
//!
//! Construction walks a worklist of `(new_node, a_state, b_state)` triplets,
//! where `a_state`/`b_state` are `Option<NodeId>`: `None` means that operand
//! has already fallen off its own MDD for this path (every label from here
//! down counts as "not present" on that side). A node is only ever built once
//! per distinct `(a_state, b_state)` pair, tracked with a `FxHashMap` memo —
//! the idiomatic Rust stand-in for the proxy/back-pointer bookkeeping a
//! pointer-chasing implementation would use to avoid a hash table.

use std::collections::VecDeque;

use fxhash::FxHashMap;

use crate::implementation::core::{Mdd, NodeId};
use crate::Value;

/// Which of the four ways two operands can offer (or not offer) an arc for
/// the label currently being considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    NotNot,
    NotYes,
    YesNot,
    YesYes,
}
impl Case {
    fn of(a: bool, b: bool) -> Case {
        match (a, b) {
            (false, false) => Case::NotNot,
            (false, true) => Case::NotYes,
            (true, false) => Case::YesNot,
            (true, true) => Case::YesYes,
        }
    }
    fn inner_bit(self) -> u8 {
        match self {
            Case::NotNot => 1 << 0,
            Case::NotYes => 1 << 1,
            Case::YesNot => 1 << 2,
            Case::YesYes => 1 << 3,
        }
    }
    fn last_bit(self) -> u8 {
        self.inner_bit() << 4
    }
}

/// An 8-bit mask describing a Boolean combination of two MDDs: bits 0-3 gate
/// whether Apply keeps branching at an inner layer for, respectively, the
/// not/not, not/yes, yes/not and yes/yes cases; bits 4-7 gate whether that
/// same four-way split accepts a tuple at the last layer.
///
/// The not/not bits matter: every label in `0..dom_size(layer)` is visited
/// regardless of whether either operand has an arc for it, so a mask that
/// sets a not/not bit does branch (or accept, at the last layer) on labels
/// neither operand offers. This is what lets [`COMPLEMENT_OF_UNION`] be
/// expressed as a single `OpMask` instead of a separate negation pass; the
/// complement of intersection has no such single-mask encoding (see
/// `SPEC_FULL.md` §4.3) because it is a disjunction over positions rather
/// than a per-position predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpMask(pub u8);

impl OpMask {
    fn continues_inner(self, case: Case) -> bool {
        self.0 & case.inner_bit() != 0
    }
    fn accepts_last(self, case: Case) -> bool {
        self.0 & case.last_bit() != 0
    }
}

const NOT_NOT: u8 = Case::NotNot.inner_bit();
const NOT_YES: u8 = Case::NotYes.inner_bit();
const YES_NOT: u8 = Case::YesNot.inner_bit();
const YES_YES: u8 = Case::YesYes.inner_bit();

/// Tuples present in both operands.
pub const INTERSECTION: OpMask = OpMask((YES_YES << 4) | YES_YES);
/// Tuples present in either operand.
pub const UNION: OpMask = OpMask(((NOT_YES | YES_NOT | YES_YES) << 4) | (NOT_YES | YES_NOT | YES_YES));
/// Tuples present in `a` but not in `b`.
pub const DIFFERENCE: OpMask = OpMask((YES_NOT << 4) | (YES_NOT | YES_YES));
/// Tuples present in exactly one operand.
pub const SYMMETRIC_DIFFERENCE: OpMask = OpMask(((NOT_YES | YES_NOT) << 4) | (NOT_YES | YES_NOT | YES_YES));
/// Tuples present in neither operand (the complement of [`UNION`] within the
/// full domain cross-product). The walk must continue on all four inner
/// cases to reach every position of the domain (a label missing from both
/// operands is just one of the ways a path can still be live), but a tuple
/// is only accepted at the last layer where neither operand has an arc.
pub const COMPLEMENT_OF_UNION: OpMask = OpMask(NOT_NOT | NOT_YES | YES_NOT | YES_YES | (NOT_NOT << 4));

/// Combines `a` and `b` according to `op`, returning a fresh reduced-shape
/// MDD. `a` and `b` are left untouched.
///
/// # Errors
/// Returns [`crate::error::MddError::ShapeMismatch`] if `a` and `b` do not
/// have the same number of variables and per-layer domain sizes.
pub fn run(a: &Mdd, b: &Mdd, op: OpMask) -> crate::error::MddResult<Mdd> {
    a.check_same_shape(b)?;
    let n = a.nb_vars();
    let mut out = Mdd::new(n);
    out.set_dom_size((0..n).map(|i| a.dom_size(i)).collect::<Vec<_>>());
    out.build_root_and_terminal();

    let mut memo: FxHashMap<(Option<NodeId>, Option<NodeId>), NodeId> = FxHashMap::default();
    let mut worklist: VecDeque<(NodeId, Option<NodeId>, Option<NodeId>, usize)> = VecDeque::new();

    let a_root = Some(a.root());
    let b_root = Some(b.root());
    memo.insert((a_root, b_root), out.root());
    worklist.push_back((out.root(), a_root, b_root, 0));

    while let Some((new_node, a_state, b_state, layer)) = worklist.pop_front() {
        let is_last = layer + 1 == n;
        let dom = a.dom_size(layer);
        for label in 0..dom as Value {
            let a_arc = a_state.and_then(|an| a.get_arc(an, label));
            let b_arc = b_state.and_then(|bn| b.get_arc(bn, label));
            let case = Case::of(a_arc.is_some(), b_arc.is_some());
            if is_last {
                if op.accepts_last(case) {
                    out.add_arc(new_node, label, out.terminal());
                }
            } else if op.continues_inner(case) {
                let a_next = a_arc.map(|ar| a.get_arc_data(ar).end());
                let b_next = b_arc.map(|ar| b.get_arc_data(ar).end());
                let child = *memo.entry((a_next, b_next)).or_insert_with(|| {
                    let id = out.create_node(layer + 1);
                    worklist.push_back((id, a_next, b_next, layer + 1));
                    id
                });
                out.add_arc(new_node, label, child);
            }
        }
    }

    crate::reduce::reduce(&mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 2-variable, domain-{0,1} MDD containing exactly `tuples`.
    fn from_tuples(tuples: &[[Value; 2]]) -> Mdd {
        let mut mdd = Mdd::new(2);
        mdd.set_dom_size(2usize);
        mdd.build_root_and_terminal();
        for t in tuples {
            let mid = match mdd.get_arc(mdd.root(), t[0]) {
                Some(a) => mdd.get_arc_data(a).end(),
                None => {
                    let n = mdd.create_node(1);
                    mdd.add_arc(mdd.root(), t[0], n);
                    n
                }
            };
            mdd.add_arc(mid, t[1], mdd.terminal());
        }
        mdd
    }

    #[test]
    fn intersection_keeps_only_shared_tuples() {
        let a = from_tuples(&[[0, 0], [0, 1], [1, 1]]);
        let b = from_tuples(&[[0, 1], [1, 0], [1, 1]]);
        let c = apply_test_helper(&a, &b, INTERSECTION);
        assert!(c.contains(&[0, 1]).unwrap());
        assert!(c.contains(&[1, 1]).unwrap());
        assert!(!c.contains(&[0, 0]).unwrap());
        assert!(!c.contains(&[1, 0]).unwrap());
    }

    #[test]
    fn union_keeps_tuples_from_either_operand() {
        let a = from_tuples(&[[0, 0]]);
        let b = from_tuples(&[[1, 1]]);
        let c = apply_test_helper(&a, &b, UNION);
        assert!(c.contains(&[0, 0]).unwrap());
        assert!(c.contains(&[1, 1]).unwrap());
        assert!(!c.contains(&[0, 1]).unwrap());
    }

    #[test]
    fn difference_keeps_only_tuples_unique_to_a() {
        let a = from_tuples(&[[0, 0], [1, 1]]);
        let b = from_tuples(&[[1, 1]]);
        let c = apply_test_helper(&a, &b, DIFFERENCE);
        assert!(c.contains(&[0, 0]).unwrap());
        assert!(!c.contains(&[1, 1]).unwrap());
    }

    #[test]
    fn symmetric_difference_drops_the_shared_tuple() {
        let a = from_tuples(&[[0, 0], [1, 1]]);
        let b = from_tuples(&[[1, 1], [0, 1]]);
        let c = apply_test_helper(&a, &b, SYMMETRIC_DIFFERENCE);
        assert!(c.contains(&[0, 0]).unwrap());
        assert!(c.contains(&[0, 1]).unwrap());
        assert!(!c.contains(&[1, 1]).unwrap());
    }

    #[test]
    fn complement_of_union_keeps_tuples_absent_from_both() {
        let a = from_tuples(&[[0, 0]]);
        let b = from_tuples(&[[1, 1]]);
        let c = apply_test_helper(&a, &b, COMPLEMENT_OF_UNION);
        assert!(c.contains(&[0, 1]).unwrap());
        assert!(c.contains(&[1, 0]).unwrap());
        assert!(!c.contains(&[0, 0]).unwrap());
        assert!(!c.contains(&[1, 1]).unwrap());
    }

    #[test]
    fn apply_rejects_mismatched_shapes() {
        let a = from_tuples(&[[0, 0]]);
        let mut b = Mdd::new(3);
        b.set_dom_size(2usize);
        b.build_root_and_terminal();
        assert!(run(&a, &b, INTERSECTION).is_err());
    }

    fn apply_test_helper(a: &Mdd, b: &Mdd, op: OpMask) -> Mdd {
        run(a, b, op).expect("shapes match in these tests")
    }
}
