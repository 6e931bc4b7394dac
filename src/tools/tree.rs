//! Huffman tree construction.
//!
//! Uses the two-queue method.  Leaves wait in `source` in ascending order, and
//! every merged node goes to the back of `merged`.  Since merged probabilities can
//! only grow, `merged` stays sorted, so the two smallest nodes are always found
//! at the queue fronts and no priority queue is needed.

use std::collections::VecDeque;
use crate::Error;
use super::freq_table::SymbolFrequency;

/// Node of the Huffman tree.
/// Children are stored as a pair, so a node has either two children or none.
#[derive(Clone,Debug,PartialEq)]
pub struct TreeNode {
    payload: SymbolFrequency,
    children: Option<Box<(TreeNode,TreeNode)>>
}

impl TreeNode {
    pub fn leaf(symbol: u8,probability: f64) -> Self {
        Self {
            payload: SymbolFrequency::leaf(symbol,probability),
            children: None
        }
    }
    /// join two nodes under a new parent, `left` goes on the 0 branch
    pub fn merge(left: TreeNode,right: TreeNode) -> Self {
        Self {
            payload: SymbolFrequency::internal(left.probability() + right.probability()),
            children: Some(Box::new((left,right)))
        }
    }
    pub fn probability(&self) -> f64 {
        self.payload.probability()
    }
    pub fn symbol(&self) -> Option<u8> {
        self.payload.symbol()
    }
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
    pub fn left(&self) -> Option<&TreeNode> {
        self.children.as_ref().map(|pair| &pair.0)
    }
    pub fn right(&self) -> Option<&TreeNode> {
        self.children.as_ref().map(|pair| &pair.1)
    }
    /// child on the branch labeled by `bit`, false is left
    pub fn child(&self,bit: bool) -> Option<&TreeNode> {
        match bit {
            false => self.left(),
            true => self.right()
        }
    }
}

/// A finished Huffman tree, immutable once built.
#[derive(Clone,Debug,PartialEq)]
pub struct HuffmanTree {
    root: TreeNode
}

impl HuffmanTree {
    /// Build the tree from an ascending list of leaf frequencies.
    pub fn build(sorted_list: &[SymbolFrequency]) -> Result<Self,Error> {
        TreeBuilder::new(sorted_list)?.finish()
    }
    pub fn root(&self) -> &TreeNode {
        &self.root
    }
    pub fn leaf_count(&self) -> usize {
        let mut ans = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match (node.left(),node.right()) {
                (Some(l),Some(r)) => {
                    stack.push(r);
                    stack.push(l);
                },
                _ => ans += 1
            }
        }
        ans
    }
}

/// Two-queue Huffman tree builder.
/// Nodes are moved between the queues, each merge consumes two and produces one.
pub struct TreeBuilder {
    /// leaves not yet merged, ascending probability
    source: VecDeque<TreeNode>,
    /// merged nodes, non-decreasing probability by construction
    merged: VecDeque<TreeNode>
}

impl TreeBuilder {
    /// Seed the builder with one leaf per entry.  The list must be sorted in
    /// ascending order, have at least 2 entries, and every entry needs a symbol.
    pub fn new(sorted_list: &[SymbolFrequency]) -> Result<Self,Error> {
        if sorted_list.len() < 2 {
            return Err(Error::MalformedFrequencyList);
        }
        let mut source = VecDeque::with_capacity(sorted_list.len());
        let mut prev = f64::NEG_INFINITY;
        for entry in sorted_list {
            let symbol = entry.symbol().ok_or(Error::MalformedFrequencyList)?;
            if entry.probability() < prev {
                return Err(Error::MalformedFrequencyList);
            }
            prev = entry.probability();
            source.push_back(TreeNode::leaf(symbol,entry.probability()));
        }
        Ok(Self {
            source,
            merged: VecDeque::with_capacity(sorted_list.len()-1)
        })
    }
    /// number of nodes still waiting in either queue
    pub fn remaining(&self) -> usize {
        self.source.len() + self.merged.len()
    }
    /// total probability of everything still queued, this should always be 1
    pub fn queued_probability(&self) -> f64 {
        self.source.iter().chain(self.merged.iter()).map(|n| n.probability()).sum()
    }
    /// Take the smaller front, ties go to `source`.
    fn take_smallest(&mut self) -> Option<TreeNode> {
        match (self.source.front(),self.merged.front()) {
            (Some(s),Some(m)) => match s.probability() <= m.probability() {
                true => self.source.pop_front(),
                false => self.merged.pop_front()
            },
            (Some(_),None) => self.source.pop_front(),
            (None,_) => self.merged.pop_front()
        }
    }
    /// Perform one merge.  Returns false if there was nothing left to merge.
    pub fn step(&mut self) -> Result<bool,Error> {
        if self.remaining() < 2 {
            return Ok(false);
        }
        let left = self.take_smallest().ok_or(Error::MalformedFrequencyList)?;
        let right = self.take_smallest().ok_or(Error::MalformedFrequencyList)?;
        log::trace!("merge {:?} ({}) + {:?} ({})",left.symbol(),left.probability(),right.symbol(),right.probability());
        self.merged.push_back(TreeNode::merge(left,right));
        Ok(true)
    }
    /// Merge until one node is left, that node is the root.
    pub fn finish(mut self) -> Result<HuffmanTree,Error> {
        while self.step()? {}
        match self.take_smallest() {
            Some(root) if self.remaining() == 0 => {
                log::debug!("built Huffman tree with root probability {}",root.probability());
                Ok(HuffmanTree { root })
            },
            _ => Err(Error::MalformedFrequencyList)
        }
    }
}

#[cfg(test)]
fn list_for(txt: &str) -> Vec<SymbolFrequency> {
    let mut table = super::freq_table::FrequencyTable::new();
    for c in txt.bytes() {
        table.add(c).expect("bad symbol");
    }
    table.sorted_list().expect("empty")
}

#[test]
fn frequent_symbol_near_root() {
    let tree = HuffmanTree::build(&list_for("aabbbcc")).expect("build failed");
    let root = tree.root();
    assert_eq!(root.symbol(),None);
    assert_eq!(root.left().and_then(|n| n.symbol()),Some(b'b'));
    let right = root.right().expect("missing right");
    assert_eq!(right.left().and_then(|n| n.symbol()),Some(b'a'));
    assert_eq!(right.right().and_then(|n| n.symbol()),Some(b'c'));
    assert_eq!(right.probability(),2.0/7.0 + 2.0/7.0);
    assert_eq!(tree.leaf_count(),3);
}

#[test]
fn ties_prefer_leaves() {
    // all equal: a+b merge first, then c and d are taken from source ahead of (ab)
    let tree = HuffmanTree::build(&list_for("abcd")).expect("build failed");
    let left = tree.root().left().expect("missing left");
    let right = tree.root().right().expect("missing right");
    assert_eq!(left.left().and_then(|n| n.symbol()),Some(b'a'));
    assert_eq!(left.right().and_then(|n| n.symbol()),Some(b'b'));
    assert_eq!(right.left().and_then(|n| n.symbol()),Some(b'c'));
    assert_eq!(right.right().and_then(|n| n.symbol()),Some(b'd'));
}

#[test]
fn probability_is_conserved() {
    let mut builder = TreeBuilder::new(&list_for("it was the best of times, it was the worst of times")).expect("bad list");
    assert!((builder.queued_probability() - 1.0).abs() < 1e-9);
    while builder.step().expect("merge failed") {
        assert!((builder.queued_probability() - 1.0).abs() < 1e-9);
        let probs: Vec<f64> = builder.merged.iter().map(|n| n.probability()).collect();
        assert!(probs.windows(2).all(|w| w[0] <= w[1]));
    }
    assert_eq!(builder.remaining(),1);
    let tree = builder.finish().expect("finish failed");
    assert!((tree.root().probability() - 1.0).abs() < 1e-9);
}

#[test]
fn no_single_children() {
    let tree = HuffmanTree::build(&list_for("the quick brown fox jumps over the lazy dog")).expect("build failed");
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        match (node.left(),node.right()) {
            (Some(l),Some(r)) => {
                assert_eq!(node.symbol(),None);
                stack.push(l);
                stack.push(r);
            },
            (None,None) => assert!(node.symbol().is_some()),
            _ => panic!("node with one child")
        }
    }
}

#[test]
fn deterministic_shape() {
    let list = list_for("abracadabra");
    assert_eq!(HuffmanTree::build(&list).expect("build failed"),HuffmanTree::build(&list).expect("build failed"));
}

#[test]
fn malformed_lists() {
    assert!(matches!(HuffmanTree::build(&[SymbolFrequency::leaf(b'a',1.0)]),Err(Error::MalformedFrequencyList)));
    assert!(matches!(HuffmanTree::build(&[]),Err(Error::MalformedFrequencyList)));
    let unsorted = [SymbolFrequency::leaf(b'a',0.75),SymbolFrequency::leaf(b'b',0.25)];
    assert!(matches!(HuffmanTree::build(&unsorted),Err(Error::MalformedFrequencyList)));
    let internal = [SymbolFrequency::internal(0.5),SymbolFrequency::leaf(b'b',0.5)];
    assert!(matches!(HuffmanTree::build(&internal),Err(Error::MalformedFrequencyList)));
}
