use std::ops::Index;

use crate::utils::{mix64, MyHash};

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

/// Hash-consing table: each distinct value is stored exactly once.
///
/// Values live in a dense vector and are chained into buckets through the
/// `next` index. Indices are 1-based so that `0` can terminate a chain. The
/// bucket array doubles once the average chain length exceeds two.
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T> {
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bucket bits should be in the range 0..=31");

        let size = 1 << bits;
        Self {
            data: Vec::new(),
            buckets: vec![0; size],
            bitmask: (size - 1) as u64,
        }
    }

    /// Number of stored values.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.entry(index).value
    }

    fn entry(&self, index: usize) -> &Entry<T> {
        &self.data[index - 1]
    }

    /// Store a value that must never be found by [`Table::put`], returning its index.
    pub fn alloc(&mut self, value: T) -> usize {
        self.data.push(Entry { value, next: 0 });
        self.data.len()
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (mix64(value.hash()) & self.bitmask) as usize
    }

    /// Return the index of `value`, inserting it first if it is not present.
    pub fn put(&mut self, value: T) -> usize {
        let bucket = self.bucket_index(&value);

        let mut index = self.buckets[bucket];
        while index != 0 {
            let entry = self.entry(index);
            if entry.value == value {
                return index;
            }
            index = entry.next;
        }

        self.data.push(Entry {
            value,
            next: self.buckets[bucket],
        });
        let index = self.data.len();
        self.buckets[bucket] = index;

        if self.size() > 2 * self.buckets.len() {
            self.grow();
        }

        index
    }

    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        self.buckets = vec![0; size];
        self.bitmask = (size - 1) as u64;

        for index in 1..=self.data.len() {
            let bucket = self.bucket_index(&self.entry(index).value);
            self.data[index - 1].next = self.buckets[bucket];
            self.buckets[bucket] = index;
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}
