use crate::error::ContainerError;

/// A last-in-first-out container that never holds more than `capacity` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedStack<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) -> Result<(), ContainerError> {
        if self.is_full() {
            return Err(ContainerError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T, ContainerError> {
        self.items.pop().ok_or(ContainerError::EmptyContainer)
    }

    pub fn peek(&self) -> Result<&T, ContainerError> {
        self.items.last().ok_or(ContainerError::EmptyContainer)
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

    /// Contents from bottom to top.
    pub fn elements(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedStack;
    use crate::error::ContainerError;

    #[test]
    fn test_fill_to_capacity() {
        for capacity in 1..=6 {
            let mut s = BoundedStack::new(capacity);
            assert!(s.is_empty());
            assert_eq!(s.size(), 0);
            for i in 0..capacity {
                assert!(!s.is_full());
                s.push(i).unwrap();
            }
            assert!(s.is_full());
            assert_eq!(s.size(), capacity);
            assert_eq!(
                s.push(capacity),
                Err(ContainerError::CapacityExceeded { capacity })
            );
            assert_eq!(s.size(), capacity);
        }
    }

    #[test]
    fn test_empty_failures() {
        let mut s = BoundedStack::<u8>::new(2);
        assert_eq!(s.pop(), Err(ContainerError::EmptyContainer));
        assert_eq!(s.peek(), Err(ContainerError::EmptyContainer));
    }

    #[test]
    fn test_lifo_order() {
        let mut s = BoundedStack::new(4);
        s.push('a').unwrap();
        s.push('b').unwrap();
        s.push('c').unwrap();
        assert_eq!(s.peek(), Ok(&'c'));
        assert_eq!(s.pop(), Ok('c'));
        assert_eq!(s.pop(), Ok('b'));
        assert_eq!(s.size(), 1);
        assert_eq!(s.capacity(), 4);
    }

    #[test]
    fn test_elements_is_non_destructive() {
        let mut s = BoundedStack::new(3);
        s.push(1).unwrap();
        s.push(2).unwrap();
        s.push(3).unwrap();
        let first = s.elements().to_vec();
        let second = s.elements().to_vec();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(first, second);
        assert_eq!(s.size(), 3);
        assert!(s.is_full());
        assert!(!s.is_empty());
    }
}
