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

//! The pluggable policy [`crate::relax_restrict`] uses to shrink an
//! over-width layer down to (at most) `width` groups.

use crate::abstraction::dp::State;

/// Splits `states.len()` states into at most `width` groups. Returns one
/// bucket index per input state, in `0..width`
/// ([`crate::relax_restrict::relax`] merges every state sharing a bucket;
/// [`crate::relax_restrict::restrict`] keeps one state per bucket and drops
/// the rest).
///
/// Implementations may assume `states.len() > width`, since a layer that
/// already fits is never partitioned.
pub trait Partitioner {
    fn assign_buckets(&mut self, states: &[&State], width: usize) -> Vec<usize>;
}
