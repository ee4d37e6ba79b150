//! Dense bit sets, the state sets of the explicit backend.

/// A bit set backed by a vector of u64 words.
///
/// Bits beyond the allocated words read as clear, so sets of different
/// capacities can be combined freely.
#[derive(Debug, Clone, Default)]
pub struct BitSet {
    words: Vec<u64>,
    /// Number of set bits, cached for O(1) `len()`.
    count: usize,
}

impl BitSet {
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty bit set with room for `capacity` bits.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(Self::BITS_PER_WORD)],
            count: 0,
        }
    }

    /// The set `{0, 1, ..., n - 1}`.
    pub fn full(n: usize) -> Self {
        let mut words = vec![u64::MAX; n / Self::BITS_PER_WORD];
        let rest = n % Self::BITS_PER_WORD;
        if rest != 0 {
            words.push((1u64 << rest) - 1);
        }
        Self { words, count: n }
    }

    fn from_words(mut words: Vec<u64>) -> Self {
        while words.last() == Some(&0) {
            words.pop();
        }
        let count = words.iter().map(|w| w.count_ones() as usize).sum();
        Self { words, count }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    fn word(&self, i: usize) -> u64 {
        self.words.get(i).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        self.word(word_idx) & (1u64 << bit_idx) != 0
    }

    /// Sets the bit at the given index. Returns true if the bit was not previously set.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }

        let mask = 1u64 << bit_idx;
        let was_clear = self.words[word_idx] & mask == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Clears the bit at the given index. Returns true if the bit was previously set.
    pub fn remove(&mut self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        if word_idx >= self.words.len() {
            return false;
        }

        let mask = 1u64 << bit_idx;
        let was_set = self.words[word_idx] & mask != 0;
        if was_set {
            self.words[word_idx] &= !mask;
            self.count -= 1;
        }
        was_set
    }

    fn zip_with(&self, other: &BitSet, op: impl Fn(u64, u64) -> u64) -> BitSet {
        let n = self.words.len().max(other.words.len());
        BitSet::from_words((0..n).map(|i| op(self.word(i), other.word(i))).collect())
    }

    pub fn union(&self, other: &BitSet) -> BitSet {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn intersection(&self, other: &BitSet) -> BitSet {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn difference(&self, other: &BitSet) -> BitSet {
        self.zip_with(other, |a, b| a & !b)
    }

    pub fn is_subset(&self, other: &BitSet) -> bool {
        self.words.iter().enumerate().all(|(i, &w)| w & !other.word(i) == 0)
    }

    pub fn is_disjoint(&self, other: &BitSet) -> bool {
        self.words.iter().enumerate().all(|(i, &w)| w & other.word(i) == 0)
    }

    /// Returns an iterator over all set bit indices, in increasing order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            bitset: self,
            word_idx: 0,
            current_word: self.word(0),
        }
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.is_subset(other)
    }
}

impl Eq for BitSet {}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut bs = BitSet::default();
        for index in iter {
            bs.insert(index);
        }
        bs
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
                self.current_word &= self.current_word - 1; // clear lowest set bit
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut bs = BitSet::new(100);
        assert!(bs.is_empty());
        assert!(bs.insert(42));
        assert!(!bs.insert(42));
        assert!(bs.contains(42));
        assert_eq!(bs.len(), 1);
        assert!(bs.remove(42));
        assert!(!bs.remove(42));
        assert!(!bs.contains(1000));
        assert!(bs.is_empty());
    }

    #[test]
    fn test_full() {
        let bs = BitSet::full(70);
        assert_eq!(bs.len(), 70);
        assert!(bs.contains(0));
        assert!(bs.contains(69));
        assert!(!bs.contains(70));
        assert!(BitSet::full(0).is_empty());
        assert_eq!(BitSet::full(64).len(), 64);
    }

    #[test]
    fn test_set_algebra() {
        let a: BitSet = [1, 3, 5, 64, 100].into_iter().collect();
        let b: BitSet = [3, 64, 7].into_iter().collect();

        assert_eq!(a.union(&b).iter().collect::<Vec<_>>(), vec![1, 3, 5, 7, 64, 100]);
        assert_eq!(a.intersection(&b).iter().collect::<Vec<_>>(), vec![3, 64]);
        assert_eq!(a.difference(&b).iter().collect::<Vec<_>>(), vec![1, 5, 100]);
        assert!(a.intersection(&b).is_subset(&a));
        assert!(!b.is_subset(&a));
        assert!(a.difference(&b).is_disjoint(&b));
    }

    #[test]
    fn test_equality_ignores_capacity() {
        let mut a = BitSet::new(1000);
        a.insert(3);
        let b: BitSet = [3].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.difference(&b), BitSet::default());
    }
}
