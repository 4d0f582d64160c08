//! The raw window: the last `capacity` samples in arrival order.
//!
//! This only answers "which sample leaves next". Value order lives in the
//! order statistics store.

/// A fixed-capacity ring buffer that evicts its oldest element on push once
/// full.
#[derive(Debug, Clone)]
pub struct Fifo<T> {
    buffer: Vec<T>,
    capacity: usize,
    // index of the oldest element
    tail: usize,
}

impl<T> Fifo<T>
where
    T: Copy,
{
    /// Create an empty buffer holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. `RunningMedian` checks the window size
    /// and returns `Error::InvalidWindow` before getting here.
    pub fn new(capacity: usize) -> Fifo<T> {
        assert!(capacity > 0);
        Fifo {
            buffer: Vec::with_capacity(capacity),
            capacity: capacity,
            tail: 0,
        }
    }

    /// Append `value`. Once the buffer is full the oldest element makes room
    /// and is returned.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.buffer.len() < self.capacity {
            self.buffer.push(value);
            return None;
        }

        let oldest = self.buffer[self.tail];
        self.buffer[self.tail] = value;
        self.tail = (self.tail + 1) % self.capacity;
        Some(oldest)
    }

    /// The element the next push will evict, if the buffer is full, or the
    /// oldest element otherwise.
    pub fn oldest(&self) -> Option<T> {
        self.buffer.get(self.tail).cloned()
    }

    /// Elements currently held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing has been pushed since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True once `capacity` elements are held.
    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Maximum number of elements held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget every element.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.tail = 0;
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.buffer.split_at(self.tail);
        older.iter().chain(newer.iter())
    }
}
