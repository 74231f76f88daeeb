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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.

// ----------------------------------------------------------------------------
// --- VARIABLE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a variable (equivalently: a layer) of the MDD at hand.
/// Variables are numbered `0..n` where `n = mdd.nb_vars()`. Layer `i` is the
/// set of nodes reached after `variable[i]` has been assigned a value; layer
/// `0` is the singleton root and layer `n` is the singleton terminal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Variable(pub usize);
impl Variable {
    #[inline]
    /// Returns the id (numeric value) of the variable.
    ///
    /// # Examples
    /// ```
    /// # use mdd::Variable;
    /// assert_eq!(0, Variable(0).id());
    /// assert_eq!(3, Variable(3).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

/// A value assigned to one variable along a root-to-terminal path. Values are
/// always non-negative and strictly smaller than the domain size of the
/// layer they leave from; this is the type used for arc labels.
pub type Value = u32;

/// A complete assignment of all `n` variables: one member of the tuple set an
/// [`crate::Mdd`] represents. `tuple[i]` is the value taken by `Variable(i)`.
pub type Tuple = Vec<Value>;

// ----------------------------------------------------------------------------
// --- DOMAINS ------------------------------------------------------------
// ----------------------------------------------------------------------------
/// How the domain size of each layer is specified to [`crate::Mdd::set_dom_size`].
///
/// # Examples
/// ```
/// # use mdd::DomainSpec;
/// // every layer of a 4-variable MDD has 3 possible values
/// let uniform = DomainSpec::Uniform(3);
/// assert_eq!(vec![3, 3, 3, 3], uniform.resolve(4));
///
/// // variable 0 has domain {0,1}, variable 1 has domain {0,1,2}
/// let per_layer = DomainSpec::PerLayer(vec![2, 3]);
/// assert_eq!(vec![2, 3], per_layer.resolve(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainSpec {
    /// Every layer shares the same domain size.
    Uniform(usize),
    /// Layer `i` has domain size `sizes[i]`.
    PerLayer(Vec<usize>),
}
impl DomainSpec {
    /// Expands this specification into one domain size per variable of an
    /// `n`-variable MDD.
    ///
    /// # Panics
    /// Panics if this is a [`DomainSpec::PerLayer`] whose length differs
    /// from `n`.
    pub fn resolve(&self, n: usize) -> Vec<usize> {
        match self {
            DomainSpec::Uniform(d) => vec![*d; n],
            DomainSpec::PerLayer(v) => {
                assert_eq!(v.len(), n, "per-layer domain spec must have exactly n entries");
                v.clone()
            }
        }
    }
}
impl From<usize> for DomainSpec {
    fn from(d: usize) -> Self {
        DomainSpec::Uniform(d)
    }
}
impl From<Vec<usize>> for DomainSpec {
    fn from(v: Vec<usize>) -> Self {
        DomainSpec::PerLayer(v)
    }
}
impl From<&[usize]> for DomainSpec {
    fn from(v: &[usize]) -> Self {
        DomainSpec::PerLayer(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_id() {
        assert_eq!(0, Variable(0).id());
        assert_eq!(7, Variable(7).id());
    }

    #[test]
    fn uniform_domain_resolves_to_repeated_value() {
        let d = DomainSpec::Uniform(5);
        assert_eq!(vec![5, 5, 5], d.resolve(3));
    }

    #[test]
    fn per_layer_domain_resolves_as_is() {
        let d = DomainSpec::PerLayer(vec![2, 4, 6]);
        assert_eq!(vec![2, 4, 6], d.resolve(3));
    }

    #[test]
    #[should_panic]
    fn per_layer_domain_length_mismatch_panics() {
        DomainSpec::PerLayer(vec![2, 4]).resolve(3);
    }

    #[test]
    fn from_impls() {
        assert_eq!(DomainSpec::Uniform(3), 3usize.into());
        assert_eq!(DomainSpec::PerLayer(vec![1, 2]), vec![1usize, 2].into());
    }
}
