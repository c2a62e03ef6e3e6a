//! Candidate solution bitsets
//!
//! A `CandidateSet` records which solution words are still consistent with all
//! feedback observed so far, one bit per solution index. Sets are immutable once
//! built and combine by bitwise AND: intersecting a node's candidates with the
//! feedback constraint of a new guess yields the child node's candidates.
//!
//! The empty set is the unique terminal (the solution has been guessed); a
//! singleton denotes certainty about the answer without having guessed it yet.

use serde::{Deserialize, Serialize};
use std::fmt;

const BITS: usize = u64::BITS as usize;

/// Bitset over solution-word indices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateSet {
    bits: Box<[u64]>,
}

impl CandidateSet {
    /// The empty set over a universe of `len` solutions
    #[must_use]
    pub fn empty(len: usize) -> Self {
        Self {
            bits: vec![0u64; len.div_ceil(BITS)].into_boxed_slice(),
        }
    }

    /// The full set over a universe of `len` solutions
    #[must_use]
    pub fn full(len: usize) -> Self {
        let mut set = Self::empty(len);
        for i in 0..len {
            set.insert(i as u32);
        }
        set
    }

    /// A set containing only `index`
    #[must_use]
    pub fn singleton(len: usize, index: u32) -> Self {
        let mut set = Self::empty(len);
        set.insert(index);
        set
    }

    /// Rebuild a set from its raw words, validating the expected width
    ///
    /// Returns `None` when the word count does not match the universe size;
    /// callers treat that as a corrupt persisted form.
    #[must_use]
    pub fn from_raw(len: usize, bits: Vec<u64>) -> Option<Self> {
        if bits.len() == len.div_ceil(BITS) {
            Some(Self {
                bits: bits.into_boxed_slice(),
            })
        } else {
            None
        }
    }

    /// Raw 64-bit words, least significant indices first
    #[must_use]
    pub fn raw(&self) -> &[u64] {
        &self.bits
    }

    pub(crate) fn insert(&mut self, index: u32) {
        self.bits[index as usize / BITS] |= 1u64 << (index as usize % BITS);
    }

    /// Whether `index` is a member
    #[inline]
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.bits[index as usize / BITS] & (1u64 << (index as usize % BITS)) != 0
    }

    /// Number of members
    #[must_use]
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Whether no candidates remain (the terminal win set)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Intersection with another set of the same width
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        debug_assert_eq!(self.bits.len(), other.bits.len());
        Self {
            bits: self
                .bits
                .iter()
                .zip(other.bits.iter())
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    /// Iterate member indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.bits.iter().enumerate().flat_map(|(w, &word)| {
            let base = (w * BITS) as u32;
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    None
                } else {
                    let bit = rest.trailing_zeros();
                    rest &= rest - 1;
                    Some(base + bit)
                }
            })
        })
    }

    /// The nth member in ascending index order, if there are that many
    #[must_use]
    pub fn nth(&self, n: usize) -> Option<u32> {
        self.iter().nth(n)
    }
}

impl fmt::Display for CandidateSet {
    /// Hex rendering of the raw bits, most significant word first.
    /// Used in diagnostics to identify a node's key compactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for word in self.bits.iter().rev() {
            write!(f, "{word:016x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_full() {
        let empty = CandidateSet::empty(100);
        assert!(empty.is_empty());
        assert_eq!(empty.count(), 0);

        let full = CandidateSet::full(100);
        assert_eq!(full.count(), 100);
        assert!(full.contains(0));
        assert!(full.contains(99));
        assert!(!full.is_empty());
    }

    #[test]
    fn singleton_membership() {
        let set = CandidateSet::singleton(70, 65);
        assert_eq!(set.count(), 1);
        assert!(set.contains(65));
        assert!(!set.contains(64));
        assert!(!set.contains(66));
    }

    #[test]
    fn intersection() {
        let mut a = CandidateSet::empty(10);
        a.insert(1);
        a.insert(3);
        a.insert(7);
        let mut b = CandidateSet::empty(10);
        b.insert(3);
        b.insert(7);
        b.insert(9);

        let both = a.and(&b);
        assert_eq!(both.iter().collect::<Vec<_>>(), vec![3, 7]);
    }

    #[test]
    fn iteration_order_is_ascending() {
        let mut set = CandidateSet::empty(130);
        set.insert(128);
        set.insert(5);
        set.insert(64);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![5, 64, 128]);
    }

    #[test]
    fn nth_member() {
        let mut set = CandidateSet::empty(10);
        set.insert(2);
        set.insert(4);
        set.insert(8);
        assert_eq!(set.nth(0), Some(2));
        assert_eq!(set.nth(1), Some(4));
        assert_eq!(set.nth(2), Some(8));
        assert_eq!(set.nth(3), None);
    }

    #[test]
    fn equality_and_hashing_by_bits() {
        use std::collections::HashSet;

        let a = CandidateSet::singleton(10, 3);
        let b = CandidateSet::singleton(10, 3);
        let c = CandidateSet::singleton(10, 4);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut seen = HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
        assert!(!seen.contains(&c));
    }

    #[test]
    fn from_raw_validates_width() {
        let set = CandidateSet::full(70);
        let rebuilt = CandidateSet::from_raw(70, set.raw().to_vec()).unwrap();
        assert_eq!(rebuilt, set);

        assert!(CandidateSet::from_raw(70, vec![0u64; 1]).is_none());
        assert!(CandidateSet::from_raw(70, vec![0u64; 3]).is_none());
    }

    #[test]
    fn display_is_hex() {
        let set = CandidateSet::singleton(8, 4);
        assert_eq!(format!("{set}"), "0x0000000000000010");
    }
}
