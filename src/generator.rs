//! Candidate enumeration over a fixed alphabet and fixed length.
//!
//! Candidates are ordered like an odometer: the rightmost position advances
//! fastest and carries leftward on overflow, which is exactly lexicographic
//! order under the alphabet's own ordering. Every candidate is addressable by
//! its numeric index, so any subrange of the space can be regenerated or
//! handed to a worker without changing the order the candidates appear in.

use crate::error::{Error, Result};

/// Immutable description of the space being searched: an ordered alphabet and
/// an exact password length.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    alphabet: Vec<char>,
    length: usize,
    total: u64,
}

impl SearchSpace {
    /// Validates the alphabet and length and precomputes the space size.
    ///
    /// Duplicate symbols are rejected; they would make some candidates appear
    /// more than once and leave the total count meaningless.
    pub fn new(alphabet: &str, length: usize) -> Result<Self> {
        let symbols: Vec<char> = alphabet.chars().collect();
        if symbols.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        if length == 0 {
            return Err(Error::ZeroLength);
        }
        for (i, &c) in symbols.iter().enumerate() {
            if symbols[..i].contains(&c) {
                return Err(Error::DuplicateSymbol(c));
            }
        }
        let total = (symbols.len() as u64)
            .checked_pow(u32::try_from(length).map_err(|_| Error::SpaceTooLarge {
                alphabet_len: symbols.len(),
                length,
            })?)
            .ok_or(Error::SpaceTooLarge {
                alphabet_len: symbols.len(),
                length,
            })?;

        Ok(Self {
            alphabet: symbols,
            length,
            total,
        })
    }

    /// Number of candidates in the space: `alphabet.len() ^ length`.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet_len(&self) -> usize {
        self.alphabet.len()
    }

    /// Writes the candidate at `index` into `buffer`, treating the index as a
    /// base-`alphabet.len()` number with the least significant digit in the
    /// last position.
    pub fn candidate_at(&self, mut index: u64, buffer: &mut String) {
        buffer.clear();
        buffer.reserve(self.length);

        let base = self.alphabet.len() as u64;
        let mut reversed = Vec::with_capacity(self.length);
        for _ in 0..self.length {
            reversed.push(self.alphabet[(index % base) as usize]);
            index /= base;
        }
        for &ch in reversed.iter().rev() {
            buffer.push(ch);
        }
    }

    /// Lazy iterator over the whole space in enumeration order.
    pub fn candidates(&self) -> Candidates<'_> {
        self.shard(0, self.total)
    }

    /// Lazy iterator over the index subrange `start..end`, clamped to the
    /// space. Shards produced this way tile the space without overlap.
    pub fn shard(&self, start: u64, end: u64) -> Candidates<'_> {
        Candidates {
            space: self,
            next: start.min(self.total),
            end: end.min(self.total),
        }
    }
}

/// Iterator over a contiguous index range of a [`SearchSpace`].
pub struct Candidates<'a> {
    space: &'a SearchSpace,
    next: u64,
    end: u64,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.end {
            return None;
        }
        let mut buffer = String::new();
        self.space.candidate_at(self.next, &mut buffer);
        self.next += 1;
        Some(buffer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Remaining count can exceed usize on 32-bit targets; the hint is
        // exact only when it fits.
        match usize::try_from(self.end - self.next) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn two_symbol_space_enumerates_in_odometer_order() {
        let space = SearchSpace::new("ab", 2).unwrap();
        let all: Vec<String> = space.candidates().collect();
        assert_eq!(all, ["aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn covers_every_combination_exactly_once_in_increasing_order() {
        let space = SearchSpace::new("xyz", 3).unwrap();
        assert_eq!(space.total(), 27);

        let all: Vec<String> = space.candidates().collect();
        assert_eq!(all.len(), 27);
        assert!(all.iter().all(|c| c.chars().count() == 3));

        let distinct: HashSet<&String> = all.iter().collect();
        assert_eq!(distinct.len(), 27);

        // "xyz" is alphabetical, so odometer order is plain string order here.
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn candidate_at_matches_iteration_order() {
        let space = SearchSpace::new("01", 4).unwrap();
        let mut buffer = String::new();
        for (index, candidate) in space.candidates().enumerate() {
            space.candidate_at(index as u64, &mut buffer);
            assert_eq!(buffer, candidate);
        }
    }

    #[test]
    fn shards_tile_the_space_without_gaps_or_overlap() {
        let space = SearchSpace::new("ab", 3).unwrap();
        let mut tiled: Vec<String> = space.shard(0, 3).collect();
        tiled.extend(space.shard(3, 6));
        tiled.extend(space.shard(6, u64::MAX));

        let whole: Vec<String> = space.candidates().collect();
        assert_eq!(tiled, whole);
    }

    #[test]
    fn size_hint_tracks_the_remaining_shard_exactly() {
        let space = SearchSpace::new("ab", 3).unwrap();
        let mut shard = space.shard(2, 7);
        assert_eq!(shard.size_hint(), (5, Some(5)));
        shard.next();
        assert_eq!(shard.size_hint(), (4, Some(4)));
    }

    #[test]
    fn rejects_bad_configurations() {
        assert!(matches!(SearchSpace::new("", 4), Err(Error::EmptyAlphabet)));
        assert!(matches!(SearchSpace::new("abc", 0), Err(Error::ZeroLength)));
        assert!(matches!(
            SearchSpace::new("aba", 2),
            Err(Error::DuplicateSymbol('a'))
        ));
        assert!(matches!(
            SearchSpace::new("ab", 64),
            Err(Error::SpaceTooLarge { .. })
        ));
    }
}
