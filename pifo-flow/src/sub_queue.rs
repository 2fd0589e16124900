//! Bounded single-flow sub-queues.
//!
//! A PIFO composes two sub-queues, one per flow. It only talks to them through
//! the [`SubQueue`] trait, so any bounded FIFO with explicit overflow and
//! underflow signalling can be plugged in. [`BoundedFifo`] is the stock
//! implementation.

use std::collections::VecDeque;

use crate::error::{QueueError, QueueResult};

/// A bounded FIFO that reports overflow and underflow explicitly.
///
/// Implementations must keep strict FIFO order: `pop` and `peek` always see
/// the oldest element that has not been popped yet.
pub trait SubQueue<V> {
    /// Appends `value`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Overflow` if the queue already holds
    /// `capacity()` elements.
    fn push(&mut self, value: V) -> QueueResult<()>;

    /// Removes and returns the oldest element.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Underflow` if the queue is empty.
    fn pop(&mut self) -> QueueResult<V>;

    /// Returns the oldest element without removing it.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Underflow` if the queue is empty.
    fn peek(&self) -> QueueResult<V>;

    /// Number of elements currently held.
    fn len(&self) -> usize;

    /// Maximum number of elements the queue can hold.
    fn capacity(&self) -> usize;

    /// Returns true if the queue holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fixed-capacity FIFO backed by a ring buffer.
#[derive(Debug, Clone)]
pub struct BoundedFifo<V> {
    items: VecDeque<V>,
    capacity: usize,
}

impl<V> BoundedFifo<V> {
    /// Creates an empty FIFO holding at most `capacity` elements.
    ///
    /// Storage grows with the contents; `capacity` is only enforced on push.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// Iterates over held elements, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.items.iter()
    }
}

impl<V: Copy> SubQueue<V> for BoundedFifo<V> {
    fn push(&mut self, value: V) -> QueueResult<()> {
        if self.items.len() >= self.capacity {
            return Err(QueueError::Overflow {
                len: self.items.len(),
                capacity: self.capacity,
            });
        }
        self.items.push_back(value);
        Ok(())
    }

    fn pop(&mut self) -> QueueResult<V> {
        self.items.pop_front().ok_or(QueueError::Underflow)
    }

    fn peek(&self) -> QueueResult<V> {
        self.items.front().copied().ok_or(QueueError::Underflow)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_fifo_order() {
        let mut fifo = BoundedFifo::new(4);
        for v in [3_u32, 1, 4] {
            fifo.push(v).unwrap();
        }

        assert_eq!(fifo.len(), 3);
        assert_eq!(fifo.pop(), Ok(3));
        assert_eq!(fifo.pop(), Ok(1));
        assert_eq!(fifo.pop(), Ok(4));
        assert!(fifo.is_empty());
    }

    #[test]
    fn test_overflow_at_capacity() {
        let mut fifo = BoundedFifo::new(2);
        fifo.push(1_u32).unwrap();
        fifo.push(2).unwrap();

        let result = fifo.push(3);
        assert_eq!(
            result,
            Err(QueueError::Overflow {
                len: 2,
                capacity: 2
            })
        );
        // Rejected push leaves contents alone.
        assert_eq!(fifo.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_underflow_when_empty() {
        let mut fifo: BoundedFifo<u32> = BoundedFifo::new(3);
        assert_eq!(fifo.pop(), Err(QueueError::Underflow));
        assert_eq!(fifo.peek(), Err(QueueError::Underflow));
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut fifo = BoundedFifo::new(3);
        fifo.push(7_u32).unwrap();
        fifo.push(8).unwrap();

        assert_eq!(fifo.peek(), Ok(7));
        assert_eq!(fifo.peek(), Ok(7));
        assert_eq!(fifo.len(), 2);
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut fifo = BoundedFifo::new(0);
        assert!(fifo.push(1_u32).unwrap_err().is_overflow());
        assert_eq!(fifo.capacity(), 0);
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut fifo = BoundedFifo::new(usize::MAX / 4);
        fifo.push(1_u32).unwrap();
        assert_eq!(fifo.capacity(), usize::MAX / 4);
        assert_eq!(fifo.pop(), Ok(1));
    }

    #[test]
    fn test_refill_after_drain() {
        let mut fifo = BoundedFifo::new(2);
        fifo.push(1_u32).unwrap();
        fifo.push(2).unwrap();
        fifo.pop().unwrap();
        fifo.push(3).unwrap();

        assert_eq!(fifo.pop(), Ok(2));
        assert_eq!(fifo.pop(), Ok(3));
    }
}
