//! An order-statistics tree: a value-keyed AVL tree in which every node also
//! carries the multiplicity of its value and the total number of occurrences
//! held in its subtree. With those two counts `select(k)` descends from the
//! root comparing `k` against the size of the left subtree, and `insert` /
//! `remove` stay O(log d) where d is the number of distinct values held.
//!
//! Equal values never get their own nodes. They are merged into one node's
//! multiplicity, so each occurrence occupies exactly one rank whether or not
//! its value is unique. This is what lets a window of `[3, 3, 3, 3, 3]` answer
//! every rank with `3`.
//!
//! Nodes live in an arena (`Vec`) and are addressed by index. Freed slots are
//! recycled, so a sliding window that keeps roughly the same number of
//! distinct values stops allocating once it has warmed up.
//!
//! Heights and subtree sizes are recomputed in exactly one place, `update`,
//! which the two rotations and `rebalance` call on the nodes they touch.
//! Every structural change funnels through `rebalance`.
//!
//! # Examples
//!
//! ```
//! use medianwindow::ostree::OsTree;
//! use medianwindow::OrderStatistics;
//!
//! let mut tree = OsTree::new();
//! for v in &[5, 1, 4, 1, 3] {
//!     tree.insert(*v);
//! }
//! assert_eq!(tree.len(), 5);
//! assert_eq!(tree.distinct(), 4);
//! assert_eq!(tree.select(2), Ok(1));
//! assert_eq!(tree.select(3), Ok(3));
//!
//! tree.remove(1).unwrap();
//! assert_eq!(tree.select(2), Ok(3));
//! ```
use std::cmp;
use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::order::OrderStatistics;

mod node;

use self::node::{Link, Node};

/// A balanced multiset answering rank queries in O(log d).
#[derive(Debug, Clone)]
pub struct OsTree<T> {
    nodes: Vec<Node<T>>,
    // arena slots released by `remove`, reused by `insert`
    free: Vec<usize>,
    root: Link,
}

impl<T> Default for OsTree<T>
where
    T: Ord + Copy,
{
    fn default() -> OsTree<T> {
        OsTree::new()
    }
}

impl<T> OsTree<T>
where
    T: Ord + Copy,
{
    /// Create an empty tree.
    pub fn new() -> OsTree<T> {
        OsTree::with_capacity(0)
    }

    /// Create an empty tree with room for `distinct` values before the arena
    /// has to grow.
    pub fn with_capacity(distinct: usize) -> OsTree<T> {
        OsTree {
            nodes: Vec::with_capacity(distinct),
            free: Vec::new(),
            root: None,
        }
    }

    /// Number of distinct values held.
    pub fn distinct(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Multiplicity of `value`, zero when absent.
    pub fn count(&self, value: T) -> usize {
        let mut link = self.root;
        while let Some(i) = link {
            let node = &self.nodes[i];
            link = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return node.count,
            };
        }
        0
    }

    /// Height of the tree, zero when empty.
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// `(value, multiplicity)` pairs in ascending value order.
    pub fn entries(&self) -> Vec<(T, usize)> {
        let mut res = Vec::with_capacity(self.distinct());
        let mut stack = Vec::new();
        let mut link = self.root;
        loop {
            while let Some(i) = link {
                stack.push(i);
                link = self.nodes[i].left;
            }
            match stack.pop() {
                Some(i) => {
                    res.push((self.nodes[i].value, self.nodes[i].count));
                    link = self.nodes[i].right;
                }
                None => break,
            }
        }
        res
    }

    fn height_of(&self, link: Link) -> u32 {
        link.map_or(0, |i| self.nodes[i].height)
    }

    fn size_of(&self, link: Link) -> usize {
        link.map_or(0, |i| self.nodes[i].size)
    }

    fn update(&mut self, i: usize) {
        let (left, right) = (self.nodes[i].left, self.nodes[i].right);
        let height = 1 + cmp::max(self.height_of(left), self.height_of(right));
        let size = self.nodes[i].count + self.size_of(left) + self.size_of(right);
        self.nodes[i].height = height;
        self.nodes[i].size = size;
    }

    //     i             p
    //    / \           / \
    //   a   p   =>    i   c
    //      / \       / \
    //     b   c     a   b
    fn rotate_left(&mut self, i: usize) -> usize {
        let pivot = match self.nodes[i].right {
            Some(p) => p,
            None => return i,
        };
        self.nodes[i].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(i);
        self.update(i);
        self.update(pivot);
        pivot
    }

    fn rotate_right(&mut self, i: usize) -> usize {
        let pivot = match self.nodes[i].left {
            Some(p) => p,
            None => return i,
        };
        self.nodes[i].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(i);
        self.update(i);
        self.update(pivot);
        pivot
    }

    // Restore the AVL property at `i`, whose children are already balanced,
    // and return the root of the resulting subtree.
    fn rebalance(&mut self, i: usize) -> usize {
        self.update(i);
        let (left, right) = (self.nodes[i].left, self.nodes[i].right);
        let balance = i64::from(self.height_of(left)) - i64::from(self.height_of(right));

        if balance > 1 {
            if let Some(l) = left {
                if self.height_of(self.nodes[l].left) < self.height_of(self.nodes[l].right) {
                    let l = self.rotate_left(l);
                    self.nodes[i].left = Some(l);
                }
            }
            self.rotate_right(i)
        } else if balance < -1 {
            if let Some(r) = right {
                if self.height_of(self.nodes[r].right) < self.height_of(self.nodes[r].left) {
                    let r = self.rotate_right(r);
                    self.nodes[i].right = Some(r);
                }
            }
            self.rotate_left(i)
        } else {
            i
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(i) => {
                self.nodes[i] = Node::leaf(value);
                i
            }
            None => {
                self.nodes.push(Node::leaf(value));
                self.nodes.len() - 1
            }
        }
    }

    fn insert_at(&mut self, link: Link, value: T) -> usize {
        let i = match link {
            Some(i) => i,
            None => return self.alloc(value),
        };
        match value.cmp(&self.nodes[i].value) {
            Ordering::Less => {
                let left = self.nodes[i].left;
                let left = self.insert_at(left, value);
                self.nodes[i].left = Some(left);
            }
            Ordering::Greater => {
                let right = self.nodes[i].right;
                let right = self.insert_at(right, value);
                self.nodes[i].right = Some(right);
            }
            Ordering::Equal => self.nodes[i].count += 1,
        }
        self.rebalance(i)
    }

    // Nothing is modified on the way down, so an `Absent` error leaves the
    // tree exactly as it was.
    fn remove_at(&mut self, link: Link, value: T) -> Result<Link> {
        let i = match link {
            Some(i) => i,
            None => return Err(Error::Absent),
        };
        match value.cmp(&self.nodes[i].value) {
            Ordering::Less => {
                let left = self.nodes[i].left;
                let left = self.remove_at(left, value)?;
                self.nodes[i].left = left;
            }
            Ordering::Greater => {
                let right = self.nodes[i].right;
                let right = self.remove_at(right, value)?;
                self.nodes[i].right = right;
            }
            Ordering::Equal if self.nodes[i].count > 1 => self.nodes[i].count -= 1,
            Ordering::Equal => {
                let (left, right) = (self.nodes[i].left, self.nodes[i].right);
                self.free.push(i);
                return Ok(match (left, right) {
                    (None, only) | (only, None) => only,
                    (Some(l), Some(r)) => {
                        let (rest, successor) = self.detach_min(r);
                        self.nodes[successor].left = Some(l);
                        self.nodes[successor].right = rest;
                        Some(self.rebalance(successor))
                    }
                });
            }
        }
        Ok(Some(self.rebalance(i)))
    }

    // Unhook the smallest node of the subtree at `i`, returning the new
    // subtree root and the detached node.
    fn detach_min(&mut self, i: usize) -> (Link, usize) {
        match self.nodes[i].left {
            None => (self.nodes[i].right, i),
            Some(l) => {
                let (rest, min) = self.detach_min(l);
                self.nodes[i].left = rest;
                (Some(self.rebalance(i)), min)
            }
        }
    }

    #[cfg(test)]
    fn check(&self) {
        fn walk<T: Ord + Copy>(
            tree: &OsTree<T>,
            link: Link,
            lo: Option<T>,
            hi: Option<T>,
        ) -> (u32, usize) {
            let i = match link {
                Some(i) => i,
                None => return (0, 0),
            };
            let node = &tree.nodes[i];
            assert!(node.count >= 1, "empty node left in tree");
            if let Some(lo) = lo {
                assert!(node.value > lo, "ordering violated");
            }
            if let Some(hi) = hi {
                assert!(node.value < hi, "ordering violated");
            }
            let (lh, ls) = walk(tree, node.left, lo, Some(node.value));
            let (rh, rs) = walk(tree, node.right, Some(node.value), hi);
            assert!((i64::from(lh) - i64::from(rh)).abs() <= 1, "unbalanced");
            assert_eq!(node.height, 1 + cmp::max(lh, rh), "stale height");
            assert_eq!(node.size, node.count + ls + rs, "stale size");
            (node.height, node.size)
        }
        walk(self, self.root, None, None);
    }
}

impl<T> OrderStatistics<T> for OsTree<T>
where
    T: Ord + Copy,
{
    fn insert(&mut self, value: T) {
        let root = self.root;
        self.root = Some(self.insert_at(root, value));
    }

    fn remove(&mut self, value: T) -> Result<()> {
        let root = self.root;
        self.root = self.remove_at(root, value)?;
        Ok(())
    }

    fn select(&self, rank: usize) -> Result<T> {
        let len = self.len();
        if rank == 0 || rank > len {
            return Err(Error::RankOutOfRange { rank: rank, len: len });
        }

        let mut k = rank;
        let mut link = self.root;
        while let Some(i) = link {
            let node = &self.nodes[i];
            let left = self.size_of(node.left);
            if k <= left {
                link = node.left;
            } else if k <= left + node.count {
                return Ok(node.value);
            } else {
                k -= left + node.count;
                link = node.right;
            }
        }
        Err(Error::RankOutOfRange { rank: rank, len: len })
    }

    fn len(&self) -> usize {
        self.size_of(self.root)
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ordered_float::OrderedFloat;
    use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
    use std::collections::BTreeMap;

    #[derive(Clone, Debug)]
    enum Actions {
        Insert { value: u8 },
        Remove { value: u8 },
    }

    impl Arbitrary for Actions {
        fn arbitrary<G>(g: &mut G) -> Self
        where
            G: Gen,
        {
            // a narrow value range keeps plenty of duplicates in play
            let value = u8::arbitrary(g) % 32;
            if bool::arbitrary(g) {
                Actions::Insert { value: value }
            } else {
                Actions::Remove { value: value }
            }
        }
    }

    fn expand(standard: &BTreeMap<u8, usize>) -> Vec<u8> {
        let mut res = Vec::new();
        for (v, c) in standard {
            for _ in 0..*c {
                res.push(*v);
            }
        }
        res
    }

    #[test]
    fn genuine_article() {
        fn inner(actions: Vec<Actions>) -> TestResult {
            let mut standard: BTreeMap<u8, usize> = BTreeMap::new();
            let mut test_article = OsTree::new();

            for action in actions {
                match action {
                    Actions::Insert { value } => {
                        *standard.entry(value).or_insert(0) += 1;
                        test_article.insert(value);
                    }
                    Actions::Remove { value } => {
                        let present = standard.get(&value).cloned().unwrap_or(0);
                        let res = test_article.remove(value);
                        if present == 0 {
                            assert_eq!(res, Err(Error::Absent));
                        } else {
                            assert_eq!(res, Ok(()));
                            if present == 1 {
                                standard.remove(&value);
                            } else {
                                standard.insert(value, present - 1);
                            }
                        }
                    }
                }
                test_article.check();
                assert_eq!(standard.len(), test_article.distinct());
            }

            let sorted = expand(&standard);
            assert_eq!(sorted.len(), test_article.len());
            for (idx, v) in sorted.iter().enumerate() {
                assert_eq!(test_article.select(idx + 1), Ok(*v));
            }
            let entries: Vec<(u8, usize)> = standard.into_iter().collect();
            assert_eq!(entries, test_article.entries());
            TestResult::passed()
        }
        QuickCheck::new().quickcheck(inner as fn(Vec<Actions>) -> TestResult);
    }

    quickcheck! {
        fn select_matches_sort(xs: Vec<i32>) -> bool {
            let mut tree = OsTree::new();
            for x in &xs {
                tree.insert(*x);
            }
            let mut sorted = xs.clone();
            sorted.sort();
            sorted.iter().enumerate().all(|(idx, v)| tree.select(idx + 1) == Ok(*v))
        }

        fn height_is_logarithmic(xs: Vec<u32>) -> bool {
            let mut tree = OsTree::new();
            for x in &xs {
                tree.insert(*x);
            }
            // AVL height bound: h < 1.4405 log2(d + 2)
            let bound = 1.4405 * ((tree.distinct() + 2) as f64).log2();
            f64::from(tree.height()) < bound + 1.0
        }
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = OsTree::new();
        for i in 0..1024 {
            tree.insert(i);
        }
        tree.check();
        assert_eq!(tree.height(), 11);
        for i in 0..1024 {
            assert_eq!(tree.select(i as usize + 1), Ok(i));
        }
    }

    #[test]
    fn removal_with_two_children() {
        let mut tree = OsTree::new();
        for v in &[50, 30, 70, 20, 40, 60, 80] {
            tree.insert(*v);
        }
        tree.remove(50).unwrap();
        tree.check();
        assert_eq!(tree.count(50), 0);
        let values: Vec<i32> = tree.entries().iter().map(|e| e.0).collect();
        assert_eq!(values, vec![20, 30, 40, 60, 70, 80]);
        tree.remove(30).unwrap();
        tree.remove(70).unwrap();
        tree.check();
        assert_eq!(tree.select(3), Ok(60));
    }

    #[test]
    fn duplicates_share_a_node() {
        let mut tree = OsTree::new();
        for _ in 0..5 {
            tree.insert(3);
        }
        assert_eq!(tree.distinct(), 1);
        assert_eq!(tree.count(3), 5);
        for rank in 1..6 {
            assert_eq!(tree.select(rank), Ok(3));
        }
        tree.remove(3).unwrap();
        assert_eq!(tree.count(3), 4);
        assert_eq!(tree.distinct(), 1);
    }

    #[test]
    fn absent_removal_leaves_tree_intact() {
        let mut tree = OsTree::new();
        for v in &[1, 2, 2, 3] {
            tree.insert(*v);
        }
        assert_eq!(tree.remove(7), Err(Error::Absent));
        assert_eq!(tree.len(), 4);
        tree.check();
        tree.remove(2).unwrap();
        tree.remove(2).unwrap();
        assert_eq!(tree.remove(2), Err(Error::Absent));
        assert_eq!(tree.entries(), vec![(1, 1), (3, 1)]);
    }

    #[test]
    fn select_out_of_range() {
        let mut tree = OsTree::new();
        assert_eq!(tree.select(1), Err(Error::RankOutOfRange { rank: 1, len: 0 }));
        tree.insert(10);
        assert_eq!(tree.select(0), Err(Error::RankOutOfRange { rank: 0, len: 1 }));
        assert_eq!(tree.select(2), Err(Error::RankOutOfRange { rank: 2, len: 1 }));
    }

    #[test]
    fn arena_slots_are_reused() {
        let mut tree = OsTree::new();
        for i in 0..100 {
            tree.insert(i);
        }
        for i in 0..100 {
            tree.remove(i).unwrap();
            tree.insert(i + 100);
        }
        assert_eq!(tree.nodes.len(), 100);
        assert_eq!(tree.distinct(), 100);
        tree.check();
    }

    #[test]
    fn nan_sorts_last_and_merges() {
        let mut tree = OsTree::new();
        for v in &[2.0, std::f64::NAN, 1.0, std::f64::NAN, std::f64::INFINITY] {
            tree.insert(OrderedFloat(*v));
        }
        assert_eq!(tree.distinct(), 4);
        assert_eq!(tree.count(OrderedFloat(std::f64::NAN)), 2);
        assert_eq!(tree.select(3), Ok(OrderedFloat(std::f64::INFINITY)));
        assert!(tree.select(4).unwrap().is_nan());
        assert!(tree.select(5).unwrap().is_nan());
        tree.remove(OrderedFloat(std::f64::NAN)).unwrap();
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn clear_resets() {
        let mut tree = OsTree::new();
        for i in 0..10 {
            tree.insert(i);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.distinct(), 0);
        tree.insert(4);
        assert_eq!(tree.select(1), Ok(4));
    }
}
