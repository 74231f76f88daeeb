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

//! Concrete [`Partitioner`] implementations shipped with the crate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::abstraction::dp::State;
use crate::abstraction::partitioner::Partitioner;
use crate::bitset::LexBitSet;

/// Keeps the first `width - 1` states in their own singleton bucket, in
/// whatever order they were given, and merges every remaining state into
/// the last bucket. The cheapest possible partitioner: no sorting, no
/// state inspection.
#[derive(Debug, Default)]
pub struct LastBucket;
impl Partitioner for LastBucket {
    fn assign_buckets(&mut self, states: &[&State], width: usize) -> Vec<usize> {
        (0..states.len()).map(|i| i.min(width - 1)).collect()
    }
}

/// Assigns each state to a uniformly random bucket, using a seeded RNG so
/// that a run is reproducible given the same seed.
#[derive(Debug)]
pub struct Random {
    rng: StdRng,
}
impl Random {
    pub fn new(seed: u64) -> Self {
        Random { rng: StdRng::seed_from_u64(seed) }
    }
}
impl Partitioner for Random {
    fn assign_buckets(&mut self, states: &[&State], width: usize) -> Vec<usize> {
        (0..states.len()).map(|_| self.rng.gen_range(0..width)).collect()
    }
}

fn rank_order(states: &[&State], descending: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..states.len()).collect();
    if descending {
        order.sort_by_key(|&i| std::cmp::Reverse(states[i].rank()));
    } else {
        order.sort_by_key(|&i| states[i].rank());
    }
    order
}

/// Keeps the `width - 1` highest-rank states distinct and merges the rest
/// into the last bucket. Used to relax away the "least promising" states
/// of a layer first, on the assumption that high rank correlates with
/// proximity to an optimal solution.
#[derive(Debug, Default)]
pub struct MaxRank;
impl Partitioner for MaxRank {
    fn assign_buckets(&mut self, states: &[&State], width: usize) -> Vec<usize> {
        let order = rank_order(states, true);
        let mut buckets = vec![0usize; states.len()];
        for (rank_pos, &i) in order.iter().enumerate() {
            buckets[i] = rank_pos.min(width - 1);
        }
        buckets
    }
}

/// Mirror image of [`MaxRank`]: keeps the `width - 1` lowest-rank states
/// distinct and merges the highest-rank tail.
#[derive(Debug, Default)]
pub struct MinRank;
impl Partitioner for MinRank {
    fn assign_buckets(&mut self, states: &[&State], width: usize) -> Vec<usize> {
        let order = rank_order(states, false);
        let mut buckets = vec![0usize; states.len()];
        for (rank_pos, &i) in order.iter().enumerate() {
            buckets[i] = rank_pos.min(width - 1);
        }
        buckets
    }
}

/// Like [`MinRank`], but instead of lumping the whole tail into one bucket,
/// it packs the rank-sorted states round-robin across all `width` buckets.
/// This spreads the merge cost evenly instead of concentrating it in a
/// single, potentially very approximate, bucket.
#[derive(Debug, Default)]
pub struct MinRankPack;
impl Partitioner for MinRankPack {
    fn assign_buckets(&mut self, states: &[&State], width: usize) -> Vec<usize> {
        let order = rank_order(states, false);
        let mut buckets = vec![0usize; states.len()];
        for (rank_pos, &i) in order.iter().enumerate() {
            buckets[i] = rank_pos % width;
        }
        buckets
    }
}

/// Clusters [`State::Set`] states into `width` groups with a few rounds of
/// Lloyd's k-means, using Hamming distance between bitsets and
/// [`LexBitSet`] to break ties when choosing initial centroids
/// deterministically. Falls back to [`LastBucket`]'s scheme for any other
/// `State` kind, since there is no bitset to cluster on.
#[derive(Debug)]
pub struct KMeansBitset {
    pub iterations: usize,
}
impl Default for KMeansBitset {
    fn default() -> Self {
        KMeansBitset { iterations: 5 }
    }
}
impl KMeansBitset {
    fn hamming(a: &bitset_fixed::BitSet, b: &bitset_fixed::BitSet) -> u32 {
        a.buffer().iter().zip(b.buffer().iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
    }

    fn bitsets<'a>(states: &'a [&'a State]) -> Option<Vec<&'a bitset_fixed::BitSet>> {
        states
            .iter()
            .map(|s| match s {
                State::Set(bs) => Some(&bs.0),
                _ => None,
            })
            .collect()
    }
}
impl Partitioner for KMeansBitset {
    fn assign_buckets(&mut self, states: &[&State], width: usize) -> Vec<usize> {
        let bitsets = match Self::bitsets(states) {
            Some(bs) if !bs.is_empty() => bs,
            _ => return LastBucket.assign_buckets(states, width),
        };

        // Deterministic seed: the `width` lexicographically smallest
        // distinct bitsets (falling back to repeats if there are fewer
        // than `width` distinct values).
        let mut sorted_idx: Vec<usize> = (0..bitsets.len()).collect();
        sorted_idx.sort_by(|&a, &b| LexBitSet(bitsets[a]).cmp(&LexBitSet(bitsets[b])));
        let mut centroids: Vec<bitset_fixed::BitSet> = Vec::with_capacity(width);
        for k in 0..width {
            centroids.push(bitsets[sorted_idx[k % sorted_idx.len()]].clone());
        }

        let mut assignment = vec![0usize; bitsets.len()];
        for _ in 0..self.iterations.max(1) {
            for (i, bs) in bitsets.iter().enumerate() {
                let mut best = 0usize;
                let mut best_dist = u32::MAX;
                for (k, c) in centroids.iter().enumerate() {
                    let d = Self::hamming(bs, c);
                    if d < best_dist {
                        best_dist = d;
                        best = k;
                    }
                }
                assignment[i] = best;
            }
            // recompute centroids as the majority bit of each cluster
            for k in 0..width {
                let members: Vec<&bitset_fixed::BitSet> =
                    bitsets.iter().enumerate().filter(|(i, _)| assignment[*i] == k).map(|(_, bs)| *bs).collect();
                if members.is_empty() {
                    continue;
                }
                let nbits = members[0].buffer().len() * 64;
                let mut counts = std::collections::HashMap::new();
                for m in &members {
                    for bit in crate::bitset::BitSetIter::new(m) {
                        *counts.entry(bit).or_insert(0usize) += 1;
                    }
                }
                let mut next = bitset_fixed::BitSet::new(nbits);
                for (bit, count) in counts {
                    next.set(bit, count * 2 >= members.len());
                }
                centroids[k] = next;
            }
        }
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::dp::BitSetState;
    use bitset_fixed::BitSet;

    fn ints(vs: &[i64]) -> Vec<State> {
        vs.iter().map(|&v| State::Int(v)).collect()
    }

    #[test]
    fn last_bucket_keeps_first_states_distinct() {
        let states = ints(&[1, 2, 3, 4, 5]);
        let refs: Vec<&State> = states.iter().collect();
        let buckets = LastBucket.assign_buckets(&refs, 3);
        assert_eq!(vec![0, 1, 2, 2, 2], buckets);
    }

    #[test]
    fn random_partitioner_is_deterministic_for_a_fixed_seed() {
        let states = ints(&[1, 2, 3, 4, 5, 6, 7]);
        let refs: Vec<&State> = states.iter().collect();
        let mut p1 = Random::new(42);
        let mut p2 = Random::new(42);
        assert_eq!(p1.assign_buckets(&refs, 3), p2.assign_buckets(&refs, 3));
    }

    #[test]
    fn random_partitioner_never_exceeds_width() {
        let states = ints(&[1, 2, 3, 4, 5, 6, 7]);
        let refs: Vec<&State> = states.iter().collect();
        let mut p = Random::new(7);
        let buckets = p.assign_buckets(&refs, 3);
        assert!(buckets.iter().all(|&b| b < 3));
    }

    #[test]
    fn max_rank_keeps_the_highest_ranked_states_distinct() {
        let states = ints(&[10, 1, 5, 2, 8]);
        let refs: Vec<&State> = states.iter().collect();
        let buckets = MaxRank.assign_buckets(&refs, 3);
        // ranks sorted desc: 10(idx0)=bucket0, 8(idx4)=bucket1, 5(idx2)=bucket2,
        // then idx3(rank2)=bucket2, idx1(rank1)=bucket2.
        assert_eq!(0, buckets[0]);
        assert_eq!(1, buckets[4]);
        assert_eq!(2, buckets[2]);
        assert_eq!(2, buckets[1]);
        assert_eq!(2, buckets[3]);
    }

    #[test]
    fn min_rank_keeps_the_lowest_ranked_states_distinct() {
        let states = ints(&[10, 1, 5, 2, 8]);
        let refs: Vec<&State> = states.iter().collect();
        let buckets = MinRank.assign_buckets(&refs, 3);
        assert_eq!(0, buckets[1]); // rank 1, smallest
        assert_eq!(1, buckets[3]); // rank 2
        assert_eq!(2, buckets[2]); // rank 5, tail bucket
    }

    #[test]
    fn min_rank_pack_spreads_the_tail_across_all_buckets() {
        let states = ints(&[1, 2, 3, 4, 5, 6]);
        let refs: Vec<&State> = states.iter().collect();
        let buckets = MinRankPack.assign_buckets(&refs, 3);
        let mut counts = [0usize; 3];
        for &b in &buckets {
            counts[b] += 1;
        }
        assert_eq!([2, 2, 2], counts);
    }

    #[test]
    fn kmeans_bitset_groups_closer_sets_together() {
        let mut near_empty_a = BitSet::new(8);
        near_empty_a.set(0, true);
        let mut near_empty_b = BitSet::new(8);
        near_empty_b.set(0, true);
        near_empty_b.set(1, true);
        let mut far = BitSet::new(8);
        for i in 0..8 {
            far.set(i, true);
        }
        let states = vec![
            State::Set(BitSetState(near_empty_a)),
            State::Set(BitSetState(near_empty_b)),
            State::Set(BitSetState(far)),
        ];
        let refs: Vec<&State> = states.iter().collect();
        let mut km = KMeansBitset { iterations: 4 };
        let buckets = km.assign_buckets(&refs, 2);
        assert_eq!(buckets[0], buckets[1]);
        assert_ne!(buckets[0], buckets[2]);
    }

    #[test]
    fn kmeans_bitset_falls_back_for_non_set_states() {
        let states = ints(&[1, 2, 3, 4]);
        let refs: Vec<&State> = states.iter().collect();
        let mut km = KMeansBitset::default();
        let buckets = km.assign_buckets(&refs, 2);
        assert_eq!(vec![0, 1, 1, 1], buckets);
    }
}
