use std::collections::VecDeque;

use crate::error::ContainerError;

/// A first-in-first-out buffer with a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends to the back unless the queue is full, in which case the item is dropped.
    /// Returns whether the item was accepted.
    pub fn enqueue(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push_back(item);
        true
    }

    pub fn dequeue(&mut self) -> Result<T, ContainerError> {
        self.items
            .pop_front()
            .ok_or(ContainerError::EmptyContainer)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedQueue;
    use crate::error::ContainerError;

    #[test]
    fn test_fifo_order() {
        let mut q = BoundedQueue::new(4);
        assert!(q.is_empty());
        assert!(q.enqueue("a"));
        assert!(q.enqueue("b"));
        assert!(q.enqueue("c"));
        assert_eq!(q.size(), 3);
        assert_eq!(q.dequeue(), Ok("a"));
        assert_eq!(q.dequeue(), Ok("b"));
        assert_eq!(q.dequeue(), Ok("c"));
        assert_eq!(q.dequeue(), Err(ContainerError::EmptyContainer));
    }

    #[test]
    fn test_overflow_is_dropped() {
        let mut q = BoundedQueue::new(2);
        assert!(q.enqueue(1));
        assert!(q.enqueue(2));
        assert!(q.is_full());
        assert!(!q.enqueue(3));
        assert_eq!(q.size(), 2);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(q.dequeue(), Ok(1));
        assert!(q.enqueue(4));
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
    }
}
