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

//! Builds the *exact* MDD a [`DynamicProgram`] describes: no width bound, no
//! partitioner, just BFS layer by layer with state deduplication. Compare
//! [`crate::relax_restrict`], which adds the width limit and merge/drop
//! policy on top of the same per-layer construction.
//!
//! State deduplication already makes every node in a layer distinct, so no
//! reduce pass is required afterwards (though running one is harmless, since
//! a diagram with distinct per-layer signatures is already a fixed point of
//! reduce).

use fxhash::FxHashMap;

use crate::abstraction::dp::{DynamicProgram, State};
use crate::common::DomainSpec;
use crate::error::MddResult;
use crate::implementation::core::{Mdd, NodeId};
use crate::Variable;

/// Compiles the exact MDD for `dp` over `n` variables with the given domain
/// sizes.
///
/// # Errors
/// Propagates [`crate::error::MddError::StateNotTransitionable`] from `dp`.
pub fn build<D: DynamicProgram>(dp: &D, n: usize, doms: impl Into<DomainSpec>) -> MddResult<Mdd> {
    let mut mdd = Mdd::new(n);
    mdd.set_dom_size(doms);
    mdd.build_root_and_terminal();

    let mut state_of: FxHashMap<NodeId, State> = FxHashMap::default();
    state_of.insert(mdd.root(), dp.initial_state());

    for layer in 0..n {
        let is_last = layer + 1 == n;
        let mut node_for_signature: FxHashMap<String, NodeId> = FxHashMap::default();
        let open: Vec<NodeId> = mdd.layer_ids(layer).collect();

        for node in open {
            let state = state_of[&node].clone();
            for t in dp.transitions(Variable(layer), &state)? {
                let child = if is_last {
                    mdd.terminal()
                } else {
                    let sig = t.state.signature();
                    match node_for_signature.get(&sig) {
                        Some(&id) => id,
                        None => {
                            let id = mdd.create_node(layer + 1);
                            node_for_signature.insert(sig, id);
                            state_of.insert(id, t.state.clone());
                            id
                        }
                    }
                };
                mdd.add_arc(node, t.label, child);
            }
        }
    }
    Ok(mdd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::dp::Transition;
    use crate::error::MddError;
    use crate::Value;

    /// Exact running sum of the variables chosen so far, capped for the
    /// test's own sanity (not by the DP itself).
    struct RunningSum;
    impl DynamicProgram for RunningSum {
        fn initial_state(&self) -> State {
            State::Int(0)
        }
        fn transitions(&self, _variable: Variable, state: &State) -> Result<Vec<Transition>, MddError> {
            let sum = match state {
                State::Int(v) => *v,
                _ => unreachable!(),
            };
            Ok(vec![
                Transition { label: 0, state: State::Int(sum) },
                Transition { label: 1, state: State::Int(sum + 1) },
            ])
        }
        fn merge(&self, _states: &[&State]) -> State {
            unreachable!("exact build never merges")
        }
    }

    #[test]
    fn build_contains_every_tuple_the_dp_can_reach() {
        let mdd = build(&RunningSum, 3, 2usize).unwrap();
        for bits in 0u32..8 {
            let tuple: Vec<Value> = (0..3).map(|i| (bits >> i) & 1).collect();
            assert!(mdd.contains(&tuple).unwrap());
        }
    }

    #[test]
    fn build_shares_states_with_identical_signatures() {
        // after 2 variables, sums 0,1,1,2 collapse to 3 distinct states (0,1,2)
        let mdd = build(&RunningSum, 3, 2usize).unwrap();
        assert_eq!(3, mdd.layer_size(2));
    }
}
