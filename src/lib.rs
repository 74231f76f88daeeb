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

//! A generic library to build, reduce, and combine multi-valued decision
//! diagrams (MDDs): layered DAGs representing sets of fixed-length integer
//! tuples.
//!
//! An MDD over `n` variables stores a subset of `D_0 x ... x D_{n-1}`; each
//! root-to-terminal path denotes one member tuple. This crate provides:
//!
//! * the MDD data model ([`implementation::core`]) with its intra-layer
//!   invariants;
//! * [`reduce`], the radix-based canonicalisation pass;
//! * [`apply`], the Boolean combination of two MDDs (intersection, union,
//!   difference, ...);
//! * [`implementation::builders`], ways to construct an MDD from an explicit
//!   tuple table, a transition grid or automaton, a raw transition list, or
//!   a dynamic program;
//! * [`abstraction::dp`] and [`abstraction::partitioner`], the traits a
//!   caller implements to drive exact or width-bounded ([`relax_restrict`])
//!   construction;
//! * [`traversal`], read-only BFS/DFS, extremal path and tuple-count queries.

pub mod abstraction;
pub mod apply;
pub mod bitset;
pub mod common;
pub mod error;
pub mod implementation;
pub mod reduce;
pub mod relax_restrict;
pub mod traversal;
pub mod union_find;

pub use common::{DomainSpec, Tuple, Value, Variable};
pub use error::{MddError, MddResult};
pub use implementation::core::Mdd;
