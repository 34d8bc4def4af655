//! Clue index
//!
//! An unbalanced binary search tree holding every clue the player has found,
//! ordered by plain string comparison. Inserting a clue that is already
//! present changes nothing, so the tree never holds duplicates and nodes are
//! never removed.

use crate::data::ClueText;
use crate::{GameError, Result};
use std::cmp::Ordering;

type Link = Option<Box<ClueNode>>;

#[derive(Debug, Clone)]
struct ClueNode {
    clue: ClueText,
    left: Link,
    right: Link,
}

impl ClueNode {
    fn new(clue: ClueText) -> Self {
        Self {
            clue,
            left: None,
            right: None,
        }
    }
}

/// Discovered clues, sorted alphabetically
#[derive(Debug, Clone, Default)]
pub struct ClueIndex {
    root: Link,
    len: usize,
    capacity: Option<usize>,
}

impl ClueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index that refuses to grow beyond `capacity` nodes.
    pub fn with_capacity_limit(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// File a clue. Returns `Ok(true)` if it was new and `Ok(false)` if it was
    /// already there. A full index leaves the tree untouched and reports
    /// [`GameError::CapacityExhausted`].
    pub fn insert(&mut self, clue: ClueText) -> Result<bool> {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match clue.as_str().cmp(node.clue.as_str()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return Ok(false),
            };
        }

        if let Some(capacity) = self.capacity {
            if self.len >= capacity {
                return Err(GameError::CapacityExhausted {
                    structure: "clue index",
                    capacity,
                });
            }
        }

        *slot = Some(Box::new(ClueNode::new(clue)));
        self.len += 1;
        Ok(true)
    }

    /// Look a clue up by exact text.
    pub fn find(&self, text: &str) -> Option<&ClueText> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match text.cmp(node.clue.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.clue),
            };
        }
        None
    }

    pub fn contains(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Levels in the tree; an empty index has height 0.
    pub fn height(&self) -> usize {
        fn height(link: &Link) -> usize {
            match link {
                None => 0,
                Some(node) => 1 + height(&node.left).max(height(&node.right)),
            }
        }
        height(&self.root)
    }

    /// Clues in alphabetical order. Each call starts a fresh walk.
    pub fn in_order(&self) -> InOrder<'_> {
        InOrder::new(self.root.as_deref())
    }

    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    pub fn post_order(&self) -> PostOrder<'_> {
        PostOrder {
            stack: self.root.as_deref().map(|n| (n, false)).into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ClueIndex {
    type Item = &'a ClueText;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

/// Left subtree, node, right subtree.
#[derive(Debug, Clone)]
pub struct InOrder<'a> {
    stack: Vec<&'a ClueNode>,
}

impl<'a> InOrder<'a> {
    fn new(root: Option<&'a ClueNode>) -> Self {
        let mut walk = Self { stack: Vec::new() };
        walk.push_left_spine(root);
        walk
    }

    fn push_left_spine(&mut self, mut node: Option<&'a ClueNode>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a ClueText;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.clue)
    }
}

/// Node, left subtree, right subtree.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<&'a ClueNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ClueText;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.clue)
    }
}

/// Left subtree, right subtree, node.
#[derive(Debug, Clone)]
pub struct PostOrder<'a> {
    // (node, children already queued)
    stack: Vec<(&'a ClueNode, bool)>,
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = &'a ClueText;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(&node.clue);
            }
            self.stack.push((node, true));
            self.stack.extend(node.right.as_deref().map(|n| (n, false)));
            self.stack.extend(node.left.as_deref().map(|n| (n, false)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clue(text: &str) -> ClueText {
        ClueText::new(text).unwrap()
    }

    fn index_of(texts: &[&str]) -> ClueIndex {
        let mut index = ClueIndex::new();
        for t in texts {
            index.insert(clue(t)).unwrap();
        }
        index
    }

    fn collect<'a>(it: impl Iterator<Item = &'a ClueText>) -> Vec<&'a str> {
        it.map(|c| c.as_str()).collect()
    }

    #[test]
    fn empty_index() {
        let index = ClueIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.height(), 0);
        assert_eq!(index.in_order().next(), None);
        assert!(index.find("anything").is_none());
    }

    #[test]
    fn in_order_is_alphabetical() {
        let index = index_of(&["mud", "ash", "zinc", "bone", "oak"]);
        assert_eq!(collect(index.in_order()), ["ash", "bone", "mud", "oak", "zinc"]);
    }

    #[test]
    fn pre_and_post_order() {
        //     m
        //   c   t
        //  a
        let index = index_of(&["m", "c", "t", "a"]);
        assert_eq!(collect(index.pre_order()), ["m", "c", "a", "t"]);
        assert_eq!(collect(index.post_order()), ["a", "c", "t", "m"]);
        assert_eq!(index.height(), 3);
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut index = index_of(&["glove", "ash"]);
        assert_eq!(index.insert(clue("glove")), Ok(false));
        assert_eq!(index.len(), 2);
        assert_eq!(collect(index.in_order()), ["ash", "glove"]);
    }

    #[test]
    fn find_is_exact_and_case_sensitive() {
        let index = index_of(&["Glove"]);
        assert_eq!(index.find("Glove").map(|c| c.as_str()), Some("Glove"));
        assert!(index.find("glove").is_none());
        assert!(index.find("Glove ").is_none());
    }

    #[test]
    fn traversal_restarts() {
        let index = index_of(&["b", "a"]);
        let first = collect(index.in_order());
        let second = collect((&index).into_iter());
        assert_eq!(first, second);
    }

    #[test]
    fn full_index_rejects_new_clues_but_accepts_repeats() {
        let mut index = ClueIndex::with_capacity_limit(Some(1));
        index.insert(clue("only")).unwrap();
        assert_eq!(index.insert(clue("only")), Ok(false));
        assert_eq!(
            index.insert(clue("another")),
            Err(GameError::CapacityExhausted {
                structure: "clue index",
                capacity: 1
            })
        );
        assert_eq!(collect(index.in_order()), ["only"]);
        assert_eq!(index.len(), 1);
    }
}
