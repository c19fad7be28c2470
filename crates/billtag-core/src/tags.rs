//! # Tags
//!
//! A tag is a single character naming who (or which budget) pays.
//!
//! ## Tags Are a Multiset of Characters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tags field: "AAB"                                                      │
//! │                                                                         │
//! │      'A' 'A' 'B'      ← every character is one token                   │
//! │       │   │   │         (no delimiter, no splitting on commas)         │
//! │       ▼   ▼   ▼                                                         │
//! │     A × 2     B × 1   ← repeated token = more weight                   │
//! │                                                                         │
//! │     A: 2/3            B: 1/3      ← shares always sum to exactly 1     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Whitespace is not a tag, so `"A B"` and `"AB"` are the same multiset.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};

// =============================================================================
// Tag
// =============================================================================

/// A single-character expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag(char);

impl Tag {
    /// Creates a tag from its character.
    #[inline]
    pub const fn new(c: char) -> Self {
        Tag(c)
    }

    /// Returns the tag character.
    #[inline]
    pub const fn as_char(&self) -> char {
        self.0
    }
}

impl From<char> for Tag {
    fn from(c: char) -> Self {
        Tag(c)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tag Multiset
// =============================================================================

/// The tags of one line, with occurrence counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMultiset {
    counts: BTreeMap<Tag, u32>,
}

impl TagMultiset {
    /// Builds the multiset from a raw `tags` field, one token per character.
    ///
    /// ## Example
    /// ```rust
    /// use billtag_core::tags::{Tag, TagMultiset};
    ///
    /// let tags = TagMultiset::parse("AAB");
    /// assert_eq!(tags.count(Tag::new('A')), 2);
    /// assert_eq!(tags.count(Tag::new('B')), 1);
    /// assert_eq!(tags.total_weight(), 3);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut counts = BTreeMap::new();
        for c in raw.chars().filter(|c| !c.is_whitespace()) {
            *counts.entry(Tag(c)).or_insert(0) += 1;
        }
        TagMultiset { counts }
    }

    /// Occurrences of `tag` (0 if absent).
    pub fn count(&self, tag: Tag) -> u32 {
        self.counts.get(&tag).copied().unwrap_or(0)
    }

    /// Sum of all occurrence counts.
    pub fn total_weight(&self) -> u32 {
        self.counts.values().sum()
    }

    /// True when the line carries no tag at all.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Distinct tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.counts.keys().copied()
    }

    /// Each distinct tag with its exact share `count / total_weight`.
    ///
    /// Empty for an empty multiset. Otherwise the shares sum to exactly 1.
    pub fn shares(&self) -> Vec<(Tag, BigRational)> {
        let total = BigInt::from(self.total_weight());
        self.counts
            .iter()
            .map(|(tag, count)| (*tag, BigRational::new(BigInt::from(*count), total.clone())))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::sum_rationals;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn test_repeated_characters_add_weight() {
        let tags = TagMultiset::parse("AAB");
        assert_eq!(tags.len(), 2);
        assert_eq!(
            tags.shares(),
            vec![(Tag::new('A'), ratio(2, 3)), (Tag::new('B'), ratio(1, 3))]
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        assert_eq!(TagMultiset::parse("ABA"), TagMultiset::parse("AAB"));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let tags = TagMultiset::parse(" A B\t");
        assert_eq!(tags.total_weight(), 2);
        assert_eq!(tags.count(Tag::new(' ')), 0);
    }

    #[test]
    fn test_commas_are_tags_not_delimiters() {
        let tags = TagMultiset::parse("A,B");
        assert_eq!(tags.len(), 3);
        assert_eq!(tags.count(Tag::new(',')), 1);
    }

    #[test]
    fn test_shares_sum_to_one() {
        for raw in ["A", "AB", "AAB", "ABCDEFG", "XXXXXXXY", "ZZZ"] {
            let shares = TagMultiset::parse(raw).shares();
            let total = sum_rationals(shares.iter().map(|(_, share)| share));
            assert_eq!(total, ratio(1, 1), "shares of {raw:?}");
        }
    }

    #[test]
    fn test_empty_multiset() {
        let tags = TagMultiset::parse("   ");
        assert!(tags.is_empty());
        assert!(tags.shares().is_empty());
        assert_eq!(tags.total_weight(), 0);
    }

    #[test]
    fn test_shares_are_reduced() {
        let shares = TagMultiset::parse("AABB").shares();
        assert_eq!(shares[0].1, ratio(1, 2));
    }
}
