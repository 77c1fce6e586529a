//! Fixed-domain bit set for variable and edge indices.
//!
//! Hyper-edges, worksets and edge dependency sets are all sets of small
//! non-negative indices over a domain that is known up front (the number of
//! variables or the number of edges). This bit set records that domain size,
//! which gives every set a canonical textual form: one character per index,
//! `1` for a member and `.` for a non-member.

use std::fmt;

/// A set of indices in `0..size`, backed by a vector of u64 words.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of representable indices
    size: usize,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl BitSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates a new empty bit set over the domain `0..size`.
    pub fn new(size: usize) -> Self {
        let num_words = size.div_ceil(Self::BITS_PER_WORD);
        Self {
            words: vec![0; num_words],
            size,
            count: 0,
        }
    }

    /// Creates a bit set over the domain `0..size` containing every index.
    pub fn ones(size: usize) -> Self {
        let mut bs = Self::new(size);
        for word in bs.words.iter_mut() {
            *word = u64::MAX;
        }
        bs.mask_tail();
        bs.count = size;
        bs
    }

    /// Creates a bit set over the domain `0..size` from the given indices.
    pub fn from_indices(size: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bs = Self::new(size);
        bs.extend(indices);
        bs
    }

    /// Returns the domain size, i.e. the number of representable indices.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Gets the word index and bit position for a given bit index.
    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        let word = index / Self::BITS_PER_WORD;
        let bit = index % Self::BITS_PER_WORD;
        (word, bit)
    }

    /// Clears the unused bits of the last word.
    fn mask_tail(&mut self) {
        let rem = self.size % Self::BITS_PER_WORD;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }

    fn recount(&mut self) {
        self.count = self.words.iter().map(|w| w.count_ones() as usize).sum();
    }

    /// Returns true if the bit at the given index is set.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.size {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        (self.words[word_idx] & (1u64 << bit_idx)) != 0
    }

    /// Sets the bit at the given index. Returns true if the bit was not previously set.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the domain of the set.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(
            index < self.size,
            "Index {} is out of the bit set domain 0..{}",
            index,
            self.size
        );
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Clears the bit at the given index. Returns true if the bit was previously set.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.size {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        let mask = 1u64 << bit_idx;
        let was_set = (self.words[word_idx] & mask) != 0;
        if was_set {
            self.words[word_idx] &= !mask;
            self.count -= 1;
        }
        was_set
    }

    /// Clears all bits with an index below `end`.
    pub fn clear_below(&mut self, end: usize) {
        let end = end.min(self.size);
        let (full_words, rem) = Self::word_and_bit(end);
        for word in &mut self.words[..full_words] {
            *word = 0;
        }
        if rem != 0 {
            self.words[full_words] &= !((1u64 << rem) - 1);
        }
        self.recount();
    }

    /// Clears all bits.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
        self.count = 0;
    }

    /// Returns the lowest set index, if any.
    pub fn first(&self) -> Option<usize> {
        self.iter().next()
    }

    /// Returns the `n`-th (0-based) set index in ascending order, if any.
    pub fn nth(&self, n: usize) -> Option<usize> {
        self.iter().nth(n)
    }

    /// Adds all members of `other` to this set.
    pub fn union_with(&mut self, other: &BitSet) {
        assert_eq!(self.size, other.size, "Bit set domains differ");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
        self.recount();
    }

    /// Keeps only the members that are also in `other`.
    pub fn intersect_with(&mut self, other: &BitSet) {
        assert_eq!(self.size, other.size, "Bit set domains differ");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= *b;
        }
        self.recount();
    }

    /// Removes all members of `other` from this set.
    pub fn difference_with(&mut self, other: &BitSet) {
        assert_eq!(self.size, other.size, "Bit set domains differ");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !*b;
        }
        self.recount();
    }

    /// Returns true if every member of this set is also a member of `other`.
    pub fn is_subset(&self, other: &BitSet) -> bool {
        self.words
            .iter()
            .zip(other.words.iter().chain(std::iter::repeat(&0)))
            .all(|(a, b)| a & !b == 0)
    }

    /// Extends the bit set by setting all bits from an iterator.
    pub fn extend(&mut self, iter: impl IntoIterator<Item = usize>) {
        for index in iter {
            self.insert(index);
        }
    }

    /// Returns an iterator over all set bit indices, in ascending order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            bitset: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            f.write_str(if self.contains(i) { "1" } else { "." })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = BitSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over set bits in a BitSet.
pub struct BitSetIter<'a> {
    bitset: &'a BitSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(self.word_idx * BitSet::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.bitset.words.len() {
                return None;
            }
            self.current_word = self.bitset.words[self.word_idx];
        }
    }
}

/// Formats a list of sets, one text line per set, lines joined by newlines.
pub fn fmt_bitsets(sets: &[BitSet]) -> String {
    sets.iter().map(|s| s.to_string()).collect::<Vec<_>>().join("\n")
}
