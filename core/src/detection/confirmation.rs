use crate::symbology::CanonicalBarcode;
use std::collections::VecDeque;

/// Rolling window of recent reads; the oldest read is evicted first.
#[derive(Debug, Clone)]
pub struct ConfirmationBuffer {
    entries: VecDeque<CanonicalBarcode>,
    capacity: usize,
}

impl ConfirmationBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a read, returning the evicted one when the window was full.
    pub fn push(&mut self, code: CanonicalBarcode) -> Option<CanonicalBarcode> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(code);
        evicted
    }

    pub fn count(&self, code: &CanonicalBarcode) -> usize {
        self.entries.iter().filter(|entry| *entry == code).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalBarcode> {
        self.entries.iter()
    }
}
