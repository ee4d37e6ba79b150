use std::cell::Cell;

use crate::reference::Ref;
use crate::utils::{mix64, pairing2, pairing3, MyHash};

/// Direct-mapped memo table of `2^bits` slots.
///
/// A colliding insert simply evicts the previous entry. Lookups compare the
/// whole key, so an eviction can only cost a recomputation.
pub struct Cache<K, V> {
    data: Vec<Option<(K, V)>>,
    bitmask: u64,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Cache<K, V> {
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");

        let size = 1 << bits;
        Self {
            data: std::iter::repeat_with(|| None).take(size).collect(),
            bitmask: (size - 1) as u64,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    pub fn clear(&mut self) {
        self.data.fill_with(|| None);
    }
}

impl<K, V> Cache<K, V>
where
    K: MyHash + Eq,
{
    fn index(&self, key: &K) -> usize {
        (mix64(key.hash()) & self.bitmask) as usize
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match &self.data[self.index(key)] {
            Some((k, v)) if k == key => {
                self.hits.set(self.hits.get() + 1);
                Some(v)
            }
            _ => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        let index = self.index(&key);
        self.data[index] = Some((key, value));
    }
}

impl MyHash for Ref {
    fn hash(&self) -> u64 {
        self.unsigned() as u64
    }
}

impl MyHash for (Ref, Ref) {
    fn hash(&self) -> u64 {
        pairing2(self.0.unsigned() as u64, self.1.unsigned() as u64)
    }
}

impl MyHash for (Ref, Ref, Ref) {
    fn hash(&self) -> u64 {
        pairing3(
            self.0.unsigned() as u64,
            self.1.unsigned() as u64,
            self.2.unsigned() as u64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache() {
        let mut cache = Cache::<(u64, u64), i32>::new(3);

        cache.insert((1, 2), 3);
        assert_eq!(cache.get(&(1, 2)), Some(&3));
        assert_eq!(cache.get(&(2, 1)), None);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_collision_never_returns_foreign_value() {
        // A single slot: every insert evicts the previous one.
        let mut cache = Cache::<(u64, u64), i32>::new(0);
        cache.insert((1, 2), 3);
        cache.insert((5, 7), 4);
        assert_eq!(cache.get(&(1, 2)), None);
        assert_eq!(cache.get(&(5, 7)), Some(&4));
    }

    #[test]
    fn test_clear() {
        let mut cache = Cache::<(Ref, Ref), Ref>::new(4);
        let a = Ref::positive(2);
        cache.insert((a, -a), a);
        cache.clear();
        assert_eq!(cache.get(&(a, -a)), None);
    }
}
