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

//! This module defines the fatal error conditions that the rest of the crate
//! may report. Local recovery (a DP transition that refuses a value, a layer
//! that prunes a successor-less node) never surfaces here: these variants are
//! reserved for inconsistencies a caller cannot locally repair.

use crate::Variable;

/// A fatal error raised by one of the MDD algorithms (build, reduce, apply).
///
/// `EmptyMDD` is deliberately absent from this enum: per the library's
/// error design, an operation that yields no root-to-terminal path is not a
/// failure. It is represented as an ordinary [`crate::Mdd`] whose root has no
/// outgoing arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MddError {
    /// Raised by [`crate::apply::run`] when the two operand MDDs do not share
    /// the same number of variables, or disagree on the domain size of some
    /// layer.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(ShapeMismatch),
    /// An arc, or a DP transition, requested a label that is not (yet) part
    /// of the layer's domain. During construction the domain is simply
    /// widened; [`crate::Mdd::contains`] and [`crate::apply::run`] instead
    /// fail with this variant since widening would silently change the
    /// represented tuple set.
    #[error("label {label} is out of the domain of variable {variable:?} (domain size {domain_size})")]
    OutOfDomain {
        variable: Variable,
        label: i64,
        domain_size: usize,
    },
    /// A debug-only consistency checker (see [`crate::Mdd::check_invariants`])
    /// found the graph in a state that violates I1-I5. This can only be
    /// triggered by a bug in the library itself or in a hand-rolled builder
    /// that bypassed the checked `Node`/`Mdd` API.
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),
    /// Raised by a [`crate::abstraction::dp::DynamicProgram`] when asked to
    /// transition a state it considers already contradictory (as opposed to
    /// simply having no admissible value, which is represented by an empty
    /// transition list and is not an error). Builders treat this as a local
    /// prune: the offending node is dropped and construction continues.
    #[error("state for variable {variable:?} is not transitionable")]
    StateNotTransitionable { variable: Variable },
}

/// The two ways in which a pair of MDDs can fail to line up for [`crate::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMismatch {
    /// `a.nb_vars() != b.nb_vars()`
    VariableCount { left: usize, right: usize },
    /// The two operands disagree on the domain size of `variable`.
    DomainSize {
        variable: Variable,
        left: usize,
        right: usize,
    },
}
impl std::fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeMismatch::VariableCount { left, right } => {
                write!(f, "{left} variables vs {right} variables")
            }
            ShapeMismatch::DomainSize { variable, left, right } => {
                write!(f, "variable {variable:?}: domain size {left} vs {right}")
            }
        }
    }
}

/// Convenience alias used throughout the crate.
pub type MddResult<T> = Result<T, MddError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_display_is_readable() {
        let e = MddError::ShapeMismatch(ShapeMismatch::VariableCount { left: 3, right: 4 });
        assert_eq!("shape mismatch: 3 variables vs 4 variables", e.to_string());
    }

    #[test]
    fn out_of_domain_display_is_readable() {
        let e = MddError::OutOfDomain { variable: Variable(2), label: 5, domain_size: 3 };
        assert!(e.to_string().contains("label 5"));
    }
}
