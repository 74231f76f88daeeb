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

//! The contract a caller implements to have
//! [`crate::implementation::builders::dynprog`] exact-compile an MDD for
//! them, or to have [`crate::relax_restrict`] build a width-bounded
//! relaxation/restriction of the same state space.

use bitset_fixed::BitSet;

use crate::common::{Value, Variable};

/// The four shapes a DP state can take. Every `DynamicProgram` implementation
/// picks one kind and sticks to it: [`State::signature`]/[`State::rank`] are
/// only meaningful when compared against another state of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum State {
    /// A single bounded integer, e.g. a running sum or count.
    Int(i64),
    /// A small set of elements (universe size <= 64), packed into one word.
    SmallSet(u64),
    /// An arbitrarily large set of elements.
    Set(BitSetState),
    /// A tuple of the above, for DPs that track more than one dimension.
    Composite(Vec<State>),
}

/// A fixed-width bitset wrapped so it can derive `Eq`/`Hash` (bitset_fixed's
/// `BitSet` only implements `PartialEq`).
#[derive(Debug, Clone)]
pub struct BitSetState(pub BitSet);
impl PartialEq for BitSetState {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for BitSetState {}
impl std::hash::Hash for BitSetState {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for w in self.0.buffer() {
            w.hash(state);
        }
    }
}

impl State {
    /// A string uniquely identifying this state among states of the same
    /// kind and the same DP, used to decide whether two layer-mates should
    /// be merged by [`crate::reduce`]-style deduplication during DP-driven
    /// construction.
    pub fn signature(&self) -> String {
        match self {
            State::Int(v) => format!("i{v}"),
            State::SmallSet(bits) => format!("s{bits:064b}"),
            State::Set(bs) => {
                let mut s = String::from("b");
                for w in bs.0.buffer() {
                    s.push_str(&format!("{w:016x}"));
                }
                s
            }
            State::Composite(parts) => {
                let mut s = String::from("c(");
                for p in parts {
                    s.push_str(&p.signature());
                    s.push(';');
                }
                s.push(')');
                s
            }
        }
    }

    /// A scalar used by rank-based partitioners
    /// ([`crate::implementation::partitioners::MaxRank`],
    /// [`crate::implementation::partitioners::MinRank`]) to order states of
    /// the same kind.
    /// For [`State::Set`]/[`State::SmallSet`] this is the population count
    /// (a common proxy for "how much of the problem is still open"); for
    /// [`State::Composite`] it is the sum of the parts' ranks.
    pub fn rank(&self) -> i64 {
        match self {
            State::Int(v) => *v,
            State::SmallSet(bits) => bits.count_ones() as i64,
            State::Set(bs) => crate::bitset::BitSetIter::new(&bs.0).count() as i64,
            State::Composite(parts) => parts.iter().map(State::rank).sum(),
        }
    }
}

/// One outgoing decision: assigning `label` to the variable being decided,
/// and the resulting state if the transition is admissible.
#[derive(Debug, Clone)]
pub struct Transition {
    pub label: Value,
    pub state: State,
}

/// Implemented by callers who want an MDD compiled from a dynamic program
/// rather than assembled by hand. Mirrors a classical state-graph DP: an
/// initial state, a transition function producing the reachable next
/// states for a given state and variable, and a merge operator used only
/// when relaxing (never during an exact compilation, where equal states
/// are simply deduplicated).
pub trait DynamicProgram {
    /// The state the root node represents, before any variable has been
    /// decided.
    fn initial_state(&self) -> State;

    /// The transitions admissible from `state` when deciding `variable`.
    /// Returns `Err` only for states the DP considers already contradictory
    /// ([`crate::error::MddError::StateNotTransitionable`]); returning an
    /// empty `Vec` is the normal way to represent "no admissible value
    /// here", which simply prunes this path.
    fn transitions(&self, variable: Variable, state: &State) -> Result<Vec<Transition>, crate::error::MddError>;

    /// Combines several states of the same layer into one over-approximating
    /// state, used by [`crate::relax_restrict::relax`] when a layer must be
    /// shrunk below its natural width. The result must represent a superset
    /// of every tuple reachable from any of `states`.
    fn merge(&self, states: &[&State]) -> State;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_signature_distinguishes_values() {
        assert_ne!(State::Int(1).signature(), State::Int(2).signature());
        assert_eq!(State::Int(1).signature(), State::Int(1).signature());
    }

    #[test]
    fn small_set_rank_is_population_count() {
        let s = State::SmallSet(0b1011);
        assert_eq!(3, s.rank());
    }

    #[test]
    fn composite_rank_sums_parts() {
        let s = State::Composite(vec![State::Int(2), State::SmallSet(0b11)]);
        assert_eq!(4, s.rank());
    }

    #[test]
    fn bitset_state_set_rank_counts_bits() {
        let mut bs = BitSet::new(10);
        bs.set(1, true);
        bs.set(5, true);
        let s = State::Set(BitSetState(bs));
        assert_eq!(2, s.rank());
    }
}
