//! Suspect ledger
//!
//! A hash table with chained buckets linking each clue to the suspect it
//! implicates. The bucket of a clue is the sum of its characters' code
//! points modulo the bucket count. Collisions are expected; each bucket is a
//! singly linked chain with the most recent insert at the head.

use super::clue_index::ClueIndex;
use crate::data::{ClueText, SuspectName};
use crate::{GameError, Result};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Buckets in the reference configuration.
pub const DEFAULT_BUCKETS: usize = 10;

type Chain = Option<Box<Association>>;

/// A clue and the suspect it points at
#[derive(Debug, Clone)]
pub struct Association {
    clue: ClueText,
    suspect: SuspectName,
    next: Chain,
}

impl Association {
    pub fn clue(&self) -> &ClueText {
        &self.clue
    }

    pub fn suspect(&self) -> &SuspectName {
        &self.suspect
    }
}

/// Additive checksum of `key`, reduced to a bucket index.
pub fn checksum(key: &str, bucket_count: usize) -> usize {
    let sum: u64 = key.chars().map(|c| u64::from(u32::from(c))).sum();
    (sum % bucket_count as u64) as usize
}

/// How many discovered clues point at one suspect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally<'a> {
    pub suspect: &'a SuspectName,
    pub clues: usize,
}

/// Clue → suspect associations
#[derive(Debug, Clone)]
pub struct SuspectLedger {
    buckets: Vec<Chain>,
    len: usize,
    capacity: Option<usize>,
}

impl Default for SuspectLedger {
    fn default() -> Self {
        Self {
            buckets: vec![None; DEFAULT_BUCKETS],
            len: 0,
            capacity: None,
        }
    }
}

impl SuspectLedger {
    pub fn new(bucket_count: usize) -> Result<Self> {
        Self::with_capacity_limit(bucket_count, None)
    }

    /// A ledger that refuses to hold more than `capacity` associations.
    pub fn with_capacity_limit(bucket_count: usize, capacity: Option<usize>) -> Result<Self> {
        if bucket_count == 0 {
            return Err(GameError::InvalidConfig(
                "the ledger needs at least one bucket".to_string(),
            ));
        }
        Ok(Self {
            buckets: vec![None; bucket_count],
            len: 0,
            capacity,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bucket index for `key`. Insert, find and remove all go through here.
    pub fn hash(&self, key: &str) -> usize {
        checksum(key, self.buckets.len())
    }

    /// Link `clue` to `suspect`. The new node goes to the head of its chain;
    /// an existing association for the same clue is shadowed, not replaced.
    pub fn insert(&mut self, clue: ClueText, suspect: SuspectName) -> Result<()> {
        if let Some(capacity) = self.capacity {
            if self.len >= capacity {
                return Err(GameError::CapacityExhausted {
                    structure: "suspect ledger",
                    capacity,
                });
            }
        }

        let index = self.hash(clue.as_str());
        self.link(index, clue, suspect)
    }

    /// Push a node onto the head of bucket `index`. An index past the table
    /// is refused and leaves it untouched.
    fn link(&mut self, index: usize, clue: ClueText, suspect: SuspectName) -> Result<()> {
        let Some(bucket) = self.buckets.get_mut(index) else {
            warn!(index, clue = %clue, "bucket index out of range, insert dropped");
            return Err(GameError::InvalidState(format!(
                "bucket {} is outside a table of {}",
                index,
                self.buckets.len()
            )));
        };

        debug!(index, clue = %clue, suspect = %suspect, "ledger insert");
        let next = bucket.take();
        *bucket = Some(Box::new(Association {
            clue,
            suspect,
            next,
        }));
        self.len += 1;
        Ok(())
    }

    /// The most recent association for exactly `clue`.
    pub fn find(&self, clue: &str) -> Option<&Association> {
        self.chain(self.hash(clue)).find(|a| a.clue.as_str() == clue)
    }

    /// Unlink the first association for `clue`. The rest of the chain keeps
    /// its order. Returns `None` if the clue is not in the ledger.
    pub fn remove(&mut self, clue: &str) -> Option<Association> {
        let index = self.hash(clue);
        let mut slot = self.buckets.get_mut(index)?;
        while slot.as_ref().is_some_and(|node| node.clue.as_str() != clue) {
            slot = &mut slot.as_mut()?.next;
        }

        let mut removed = slot.take()?;
        *slot = removed.next.take();
        self.len -= 1;
        debug!(index, clue, suspect = %removed.suspect, "ledger remove");
        Some(*removed)
    }

    /// Associations in one bucket, head first. Empty for an out-of-range index.
    pub fn chain(&self, index: usize) -> Chained<'_> {
        Chained {
            current: self.buckets.get(index).and_then(|b| b.as_deref()),
        }
    }

    /// Every association, bucket by bucket, head first within a bucket.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
        }
    }

    /// Clues linked to `suspect`, in enumeration order.
    pub fn clues_for<'a>(&'a self, suspect: &'a str) -> impl Iterator<Item = &'a ClueText> + 'a {
        self.iter()
            .filter(move |a| a.suspect.as_str() == suspect)
            .map(|a| &a.clue)
    }

    /// Distinct suspects in enumeration order.
    pub fn suspects(&self) -> Vec<&SuspectName> {
        let mut seen: Vec<&SuspectName> = Vec::new();
        for a in self.iter() {
            if !seen.contains(&&a.suspect) {
                seen.push(&a.suspect);
            }
        }
        seen
    }

    /// Count discovered clues per suspect. A clue counts once, for the
    /// suspect that `find` would report.
    pub fn tally(&self, discovered: &ClueIndex) -> Vec<Tally<'_>> {
        let mut tallies: Vec<Tally<'_>> = self
            .suspects()
            .into_iter()
            .map(|suspect| Tally { suspect, clues: 0 })
            .collect();

        for a in self.iter() {
            if !discovered.contains(a.clue.as_str()) {
                continue;
            }
            let current = self.find(a.clue.as_str()).is_some_and(|f| std::ptr::eq(f, a));
            if !current {
                continue;
            }
            if let Some(t) = tallies.iter_mut().find(|t| *t.suspect == a.suspect) {
                t.clues += 1;
            }
        }
        tallies
    }

    /// The suspect with the most discovered clues. Ties go to whoever comes
    /// first in enumeration order. `None` until some clue implicates someone.
    pub fn most_likely_suspect(&self, discovered: &ClueIndex) -> Option<Tally<'_>> {
        let mut best: Option<Tally<'_>> = None;
        for t in self.tally(discovered) {
            if t.clues > 0 && best.as_ref().map_or(true, |b| t.clues > b.clues) {
                best = Some(t);
            }
        }
        best
    }
}

impl<'a> IntoIterator for &'a SuspectLedger {
    type Item = &'a Association;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// End-of-game listing, one association per line.
impl fmt::Display for SuspectLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for a in self.iter() {
            writeln!(f, " • [{}] ➜ {}", a.suspect, a.clue)?;
        }
        Ok(())
    }
}

/// Walks one bucket chain
#[derive(Debug, Clone)]
pub struct Chained<'a> {
    current: Option<&'a Association>,
}

impl<'a> Iterator for Chained<'a> {
    type Item = &'a Association;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(node)
    }
}

/// Walks the whole ledger
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    buckets: std::slice::Iter<'a, Chain>,
    current: Option<&'a Association>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Association;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.current {
                self.current = node.next.as_deref();
                return Some(node);
            }
            self.current = self.buckets.next()?.as_deref();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clue(text: &str) -> ClueText {
        ClueText::new(text).unwrap()
    }

    fn suspect(name: &str) -> SuspectName {
        SuspectName::new(name).unwrap()
    }

    fn ledger_of(pairs: &[(&str, &str)]) -> SuspectLedger {
        let mut ledger = SuspectLedger::default();
        for (c, s) in pairs {
            ledger.insert(clue(c), suspect(s)).unwrap();
        }
        ledger
    }

    fn pairs(ledger: &SuspectLedger) -> Vec<(&str, &str)> {
        ledger.iter().map(|a| (a.clue().as_str(), a.suspect().as_str())).collect()
    }

    #[test]
    fn checksum_sums_code_points() {
        // 'a' + 'b' = 97 + 98 = 195
        assert_eq!(checksum("ab", 10), 5);
        assert_eq!(checksum("ab", 1000), 195);
        assert_eq!(checksum("", 10), 0);
        // 'é' is U+00E9 = 233, not its two UTF-8 bytes
        assert_eq!(checksum("é", 1000), 233);
    }

    #[test]
    fn out_of_range_bucket_is_an_error() {
        let mut ledger = ledger_of(&[("glove", "Ann")]);
        let err = ledger.link(10, clue("rope"), suspect("Bob")).unwrap_err();
        assert!(matches!(err, GameError::InvalidState(_)));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.find("rope").is_none());
        assert_eq!(pairs(&ledger), [("glove", "Ann")]);
    }

    #[test]
    fn zero_buckets_is_rejected() {
        assert!(matches!(SuspectLedger::new(0), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn find_hits_and_misses() {
        let ledger = ledger_of(&[("glove", "Ann"), ("rope", "Bob")]);
        assert_eq!(ledger.find("rope").map(|a| a.suspect().as_str()), Some("Bob"));
        assert!(ledger.find("Rope").is_none());
        assert!(ledger.find("knife").is_none());
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn chains_are_newest_first() {
        // "ab" (195) and "ba" (195) always collide
        let ledger = ledger_of(&[("ab", "Ann"), ("ba", "Bob")]);
        let bucket = ledger.hash("ab");
        let chain: Vec<&str> = ledger.chain(bucket).map(|a| a.clue().as_str()).collect();
        assert_eq!(chain, ["ba", "ab"]);
    }

    #[test]
    fn repeated_clue_shadows_older_association() {
        let mut ledger = ledger_of(&[("glove", "Ann"), ("glove", "Bob")]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.find("glove").unwrap().suspect(), "Bob");

        let removed = ledger.remove("glove").unwrap();
        assert_eq!(removed.suspect(), "Bob");
        assert_eq!(ledger.find("glove").unwrap().suspect(), "Ann");
    }

    #[test]
    fn remove_middle_of_chain_keeps_order() {
        let mut ledger = SuspectLedger::new(1).unwrap();
        for (c, s) in [("a", "1"), ("b", "2"), ("c", "3")] {
            ledger.insert(clue(c), suspect(s)).unwrap();
        }
        assert!(ledger.remove("b").is_some());
        assert_eq!(pairs(&ledger), [("c", "3"), ("a", "1")]);
        assert!(ledger.remove("b").is_none());
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn remove_head_and_tail() {
        let mut ledger = SuspectLedger::new(1).unwrap();
        for (c, s) in [("a", "1"), ("b", "2"), ("c", "3")] {
            ledger.insert(clue(c), suspect(s)).unwrap();
        }
        assert_eq!(ledger.remove("c").unwrap().clue(), "c");
        assert_eq!(ledger.remove("a").unwrap().clue(), "a");
        assert_eq!(pairs(&ledger), [("b", "2")]);
    }

    #[test]
    fn iteration_is_bucket_order_then_chain_order() {
        let mut ledger = SuspectLedger::new(3).unwrap();
        // 'a' = 97 → 1, 'b' = 98 → 2, 'c' = 99 → 0, 'd' = 100 → 1
        for (c, s) in [("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")] {
            ledger.insert(clue(c), suspect(s)).unwrap();
        }
        let order: Vec<&str> = ledger.iter().map(|a| a.clue().as_str()).collect();
        assert_eq!(order, ["c", "d", "a", "b"]);
    }

    #[test]
    fn capacity_limit_reports_and_keeps_table_usable() {
        let mut ledger = SuspectLedger::with_capacity_limit(10, Some(1)).unwrap();
        ledger.insert(clue("glove"), suspect("Ann")).unwrap();
        let err = ledger.insert(clue("rope"), suspect("Bob")).unwrap_err();
        assert!(matches!(err, GameError::CapacityExhausted { capacity: 1, .. }));
        assert_eq!(ledger.find("glove").unwrap().suspect(), "Ann");
        assert!(ledger.find("rope").is_none());
    }

    #[test]
    fn tally_counts_discovered_clues_only() {
        let ledger = ledger_of(&[("a", "Bob"), ("b", "Bob"), ("c", "Ann")]);
        let mut found = ClueIndex::new();
        found.insert(clue("a")).unwrap();
        found.insert(clue("c")).unwrap();
        found.insert(clue("unlinked")).unwrap();

        let tally = ledger.tally(&found);
        let bob = tally.iter().find(|t| *t.suspect == "Bob").unwrap();
        let ann = tally.iter().find(|t| *t.suspect == "Ann").unwrap();
        assert_eq!(bob.clues, 1);
        assert_eq!(ann.clues, 1);

        found.insert(clue("b")).unwrap();
        let best = ledger.most_likely_suspect(&found).unwrap();
        assert_eq!(best.suspect, "Bob");
        assert_eq!(best.clues, 2);
    }

    #[test]
    fn nobody_is_likely_before_any_linked_clue() {
        let ledger = ledger_of(&[("a", "Bob")]);
        assert!(ledger.most_likely_suspect(&ClueIndex::new()).is_none());
    }

    #[test]
    fn clues_for_and_suspects() {
        let ledger = ledger_of(&[("a", "Bob"), ("b", "Bob"), ("c", "Ann")]);
        let mut bobs: Vec<&str> = ledger.clues_for("Bob").map(|c| c.as_str()).collect();
        bobs.sort();
        assert_eq!(bobs, ["a", "b"]);
        assert_eq!(ledger.suspects().len(), 2);
    }

    #[test]
    fn summary_lists_every_association() {
        let ledger = ledger_of(&[("glove", "Ann")]);
        assert_eq!(ledger.to_string(), " • [Ann] ➜ glove\n");
    }
}
