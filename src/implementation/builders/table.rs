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

//! Builds an MDD directly from an explicit list of tuples, as a trie that
//! shares common prefixes: the simplest possible builder, useful for small
//! tables or as ground truth in tests.

use derive_builder::Builder;

use crate::common::{DomainSpec, Tuple};
use crate::error::{MddError, MddResult};
use crate::implementation::core::Mdd;
use crate::reduce;

/// Parameters for [`build`]. Construct with [`TableParamsBuilder`].
#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct TableParams {
    pub n: usize,
    #[builder(setter(into))]
    pub doms: DomainSpec,
    pub tuples: Vec<Tuple>,
    /// Whether to canonicalize ([`crate::reduce::reduce`]) the trie before
    /// returning it. Defaults to `true`; callers who want to inspect the raw
    /// unreduced trie (e.g. to compare against a reduced one) can turn this
    /// off.
    #[builder(default = "true")]
    pub reduced: bool,
}

/// Builds the MDD whose tuple set is exactly `params.tuples`.
///
/// # Errors
/// Returns [`MddError::OutOfDomain`] if any tuple assigns a value outside
/// the domain of its variable, or an [`MddError::InvariantViolation`] if a
/// tuple's length does not match `params.n`.
pub fn build(params: TableParams) -> MddResult<Mdd> {
    let sizes = params.doms.resolve(params.n);
    let mut mdd = Mdd::new(params.n);
    mdd.set_dom_size(sizes.clone());
    mdd.build_root_and_terminal();

    for tuple in &params.tuples {
        if tuple.len() != params.n {
            return Err(MddError::InvariantViolation("tuple length must equal the number of variables"));
        }
        let mut cur = mdd.root();
        for (layer, &label) in tuple.iter().enumerate() {
            if label as usize >= sizes[layer] {
                return Err(MddError::OutOfDomain {
                    variable: crate::Variable(layer),
                    label: label as i64,
                    domain_size: sizes[layer],
                });
            }
            let target = if layer + 1 == params.n {
                mdd.terminal()
            } else {
                match mdd.get_arc(cur, label) {
                    Some(a) => mdd.get_arc_data(a).end(),
                    None => mdd.create_node(layer + 1),
                }
            };
            mdd.add_arc(cur, label, target);
            cur = target;
        }
    }

    if params.reduced {
        reduce::reduce(&mut mdd);
    }
    Ok(mdd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_contains_exactly_the_given_tuples() {
        let params = TableParamsBuilder::default()
            .n(3)
            .doms(2usize)
            .tuples(vec![vec![0, 0, 0], vec![0, 1, 0], vec![1, 1, 1]])
            .build()
            .unwrap();
        let mdd = build(params).unwrap();
        assert!(mdd.contains(&[0, 0, 0]).unwrap());
        assert!(mdd.contains(&[0, 1, 0]).unwrap());
        assert!(mdd.contains(&[1, 1, 1]).unwrap());
        assert!(!mdd.contains(&[1, 0, 0]).unwrap());
        assert!(!mdd.contains(&[0, 0, 1]).unwrap());
    }

    #[test]
    fn build_shares_common_prefixes() {
        let params = TableParamsBuilder::default()
            .n(2)
            .doms(2usize)
            .tuples(vec![vec![0, 0], vec![0, 1]])
            .build()
            .unwrap();
        let mdd = build(params).unwrap();
        assert_eq!(1, mdd.layer_size(1));
    }

    #[test]
    fn build_rejects_out_of_domain_labels() {
        let params = TableParamsBuilder::default().n(1).doms(2usize).tuples(vec![vec![5]]).build().unwrap();
        assert!(matches!(build(params), Err(MddError::OutOfDomain { .. })));
    }

    #[test]
    fn unreduced_trie_keeps_duplicate_suffixes_apart() {
        let params = TableParamsBuilder::default()
            .n(2)
            .doms(2usize)
            .tuples(vec![vec![0, 0], vec![1, 0]])
            .reduced(false)
            .build()
            .unwrap();
        let mdd = build(params).unwrap();
        assert_eq!(2, mdd.layer_size(1));
    }
}
