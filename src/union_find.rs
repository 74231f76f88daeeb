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

//! A plain union-find (disjoint-set) over the dense index range `0..n`, used
//! by [`crate::reduce`] to track, within one layer, which nodes have already
//! been proven to share a signature.
//!
//! This mirrors the index-into-a-`Vec` idiom the rest of the crate uses for
//! node and arc identifiers (see `implementation::core::{NodeId, ArcId}`):
//! rather than a pointer-chasing forest, the structure is a flat `Vec<usize>`
//! of parent indices, addressed by plain `usize` rather than a newtype since
//! its indices are always local permutation positions, never node ids.

/// A union-find over `0..len`. Every element starts in its own singleton set.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}
impl UnionFind {
    /// Creates `len` singleton sets.
    pub fn new(len: usize) -> Self {
        UnionFind { parent: (0..len).collect(), rank: vec![0; len] }
    }
    /// Number of elements tracked (not the number of distinct sets).
    pub fn len(&self) -> usize {
        self.parent.len()
    }
    /// True iff this union-find tracks no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
    /// Returns the representative of the set containing `x`, compressing the
    /// path from `x` to that representative as a side effect.
    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }
    /// Returns the representative of the set containing `x` without
    /// mutating the structure (no path compression). Useful when only a
    /// read-only "leader" lookup is needed, e.g. once no more unions will
    /// ever be performed on this instance.
    pub fn find_const(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }
    /// Returns true iff `x` and `y` are currently known to be in the same set.
    pub fn equiv(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
    /// Merges the sets containing `x` and `y` (union by rank). Returns the
    /// representative of the merged set.
    pub fn union(&mut self, x: usize, y: usize) -> usize {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return rx;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => {
                self.parent[rx] = ry;
                ry
            }
            std::cmp::Ordering::Greater => {
                self.parent[ry] = rx;
                rx
            }
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
                rx
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_elements_are_their_own_leader() {
        let mut uf = UnionFind::new(5);
        for i in 0..5 {
            assert_eq!(i, uf.find(i));
        }
    }

    #[test]
    fn union_merges_two_sets() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        assert!(uf.equiv(0, 1));
        assert!(!uf.equiv(0, 2));
    }

    #[test]
    fn union_is_transitive_through_chains() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.union(4, 5);
        assert!(uf.equiv(0, 2));
        assert!(uf.equiv(4, 5));
        assert!(!uf.equiv(0, 4));
    }

    #[test]
    fn find_const_agrees_with_find() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        uf.union(2, 3);
        let a = uf.find(0);
        let b = uf.find(2);
        assert_eq!(a, uf.find_const(1));
        assert_eq!(b, uf.find_const(3));
    }
}
