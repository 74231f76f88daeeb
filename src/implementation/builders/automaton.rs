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

//! Builds an MDD accepting exactly the length-`n` words a deterministic
//! automaton accepts, by unrolling it `n` times over a [`GridBuilder`].

use std::collections::HashSet;

use crate::common::DomainSpec;
use crate::implementation::builders::grid::GridBuilder;
use crate::implementation::core::Mdd;
use crate::Value;

/// One `(start, value, end)` edge of the automaton being unrolled.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub start: usize,
    pub value: Value,
    pub end: usize,
}

/// Builds the length-`n` unrolling of a deterministic automaton.
pub struct AutomatonBuilder {
    n: usize,
    doms: DomainSpec,
    transitions: Vec<Transition>,
    start_state: usize,
    accepting: HashSet<usize>,
}

impl AutomatonBuilder {
    pub fn new(n: usize, doms: impl Into<DomainSpec>, start_state: usize, accepting: impl IntoIterator<Item = usize>) -> Self {
        AutomatonBuilder {
            n,
            doms: doms.into(),
            transitions: Vec::new(),
            start_state,
            accepting: accepting.into_iter().collect(),
        }
    }

    pub fn add_transition(&mut self, start: usize, value: Value, end: usize) {
        self.transitions.push(Transition { start, value, end });
    }

    /// Number of distinct states referenced by the transitions or by the
    /// start/accepting sets, which is also the number of states the
    /// underlying grid reserves per depth.
    fn num_states(&self) -> usize {
        let mut max_id = self.start_state;
        for t in &self.transitions {
            max_id = max_id.max(t.start).max(t.end);
        }
        for &a in &self.accepting {
            max_id = max_id.max(a);
        }
        max_id + 1
    }

    /// Builds the grid-unrolled MDD: every transition is wired at every
    /// inner depth; additionally, a transition out of the start state
    /// becomes a starting transition, and a transition into an accepting
    /// state becomes an ending transition.
    pub fn build(self) -> Mdd {
        let num_states = self.num_states();
        let mut grid = GridBuilder::new(self.n, self.doms, num_states);
        for t in &self.transitions {
            if t.start == self.start_state {
                grid.add_starting_transition(t.value, t.end);
            }
            grid.add_transition(t.start, t.value, t.end);
            if self.accepting.contains(&t.end) {
                grid.add_ending_transition(t.start, t.value);
            }
        }
        grid.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_the_words_the_automaton_accepts() {
        // States {0,1,2}, edges (0,0,0)(0,1,1)(0,2,2)(1,0,1)(1,1,2)(2,0,2),
        // start=0, accept={0,1,2}, n=4.
        let mut b = AutomatonBuilder::new(4, 3usize, 0, vec![0, 1, 2]);
        b.add_transition(0, 0, 0);
        b.add_transition(0, 1, 1);
        b.add_transition(0, 2, 2);
        b.add_transition(1, 0, 1);
        b.add_transition(1, 1, 2);
        b.add_transition(2, 0, 2);
        let mdd = b.build();
        assert!(mdd.contains(&[0, 0, 0, 0]).unwrap());
        assert!(!mdd.contains(&[2, 2, 2, 2]).unwrap());
    }
}
