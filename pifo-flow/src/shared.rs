//! Thread-safe PIFO handle.
//!
//! The PIFO itself services one request at a time. `SharedPifo` serializes
//! callers from several threads behind a mutex held for the whole request, so
//! no caller ever observes `hot` or the length mid-update.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::classifier::Flow;
use crate::error::QueueResult;
use crate::pifo::{Pifo, PifoStats};
use crate::request::Request;
use crate::sub_queue::{BoundedFifo, SubQueue};

/// A cloneable, mutex-serialized PIFO handle.
pub struct SharedPifo<V = u32, Q0 = BoundedFifo<V>, Q1 = BoundedFifo<V>> {
    inner: Arc<Mutex<Pifo<V, Q0, Q1>>>,
}

impl<V, Q0, Q1> Clone for SharedPifo<V, Q0, Q1> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, Q0, Q1> SharedPifo<V, Q0, Q1>
where
    V: Copy + Ord,
    Q0: SubQueue<V>,
    Q1: SubQueue<V>,
{
    /// Wraps a PIFO for shared use.
    #[must_use]
    pub fn new(pifo: Pifo<V, Q0, Q1>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pifo)),
        }
    }

    /// Pushes a value. See [`Pifo::push`].
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Overflow` if the PIFO or the value's flow is full.
    pub fn push(&self, value: V) -> QueueResult<()> {
        self.lock().push(value)
    }

    /// Pops the next value. See [`Pifo::pop`].
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Underflow` if the PIFO is empty.
    pub fn pop(&self) -> QueueResult<V> {
        self.lock().pop()
    }

    /// Peeks at the next value. See [`Pifo::peek`].
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Underflow` if the PIFO is empty.
    pub fn peek(&self) -> QueueResult<V> {
        self.lock().peek()
    }

    /// Services one request. See [`Pifo::handle`].
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying request returns.
    pub fn handle(&self, request: Request<V>) -> QueueResult<Option<V>> {
        self.lock().handle(request)
    }

    /// Returns the total number of queued values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether the PIFO is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the flow preferred for the next pop.
    #[must_use]
    pub fn hot(&self) -> Flow {
        self.lock().hot()
    }

    /// Returns statistics about the PIFO.
    #[must_use]
    pub fn stats(&self) -> PifoStats {
        self.lock().stats()
    }

    /// Runs `f` with exclusive access to the PIFO.
    ///
    /// No other request is serviced while `f` runs, so several reads taken
    /// inside `f` are mutually consistent.
    pub fn with<R>(&self, f: impl FnOnce(&mut Pifo<V, Q0, Q1>) -> R) -> R {
        f(&mut self.lock())
    }

    // The PIFO never panics mid-request, so a poisoned lock still guards a
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, Pifo<V, Q0, Q1>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::pifo::PifoConfig;

    fn shared(capacity: usize) -> SharedPifo {
        let config = PifoConfig::for_testing().with_flow_capacity(capacity);
        SharedPifo::new(Pifo::with_fifos(&config).unwrap())
    }

    #[test]
    fn test_clones_share_state() {
        let a = shared(10);
        let b = a.clone();

        a.push(5).unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b.pop(), Ok(5));
        assert!(a.is_empty());
    }

    #[test]
    fn test_concurrent_producers_and_consumer() {
        const PER_THREAD: u32 = 250;
        let pifo = shared(1_000);

        let producers: Vec<_> = [0_u32, 1_000]
            .into_iter()
            .map(|base| {
                let pifo = pifo.clone();
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        pifo.push(base + i).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        assert_eq!(pifo.len(), 2 * PER_THREAD as usize);

        let mut low = Vec::new();
        let mut high = Vec::new();
        while let Ok(v) = pifo.pop() {
            if v <= 200 {
                low.push(v);
            } else {
                high.push(v);
            }
        }

        // Flow 0 holds 0..=200, flow 1 holds 201..250 plus 1000..1250.
        assert_eq!(low, (0..=200).collect::<Vec<_>>());
        // Each producer's flow 1 values keep their push order.
        let from_first: Vec<_> = high.iter().copied().filter(|v| *v < 1_000).collect();
        let from_second: Vec<_> = high.iter().copied().filter(|v| *v >= 1_000).collect();
        assert_eq!(from_first, (201..PER_THREAD).collect::<Vec<_>>());
        assert_eq!(from_second, (1_000..1_000 + PER_THREAD).collect::<Vec<_>>());
        assert_eq!(low.len() + high.len(), 2 * PER_THREAD as usize);

        let stats = pifo.stats();
        assert_eq!(stats.total_popped(), u64::from(2 * PER_THREAD));
    }

    #[test]
    fn test_with_gives_consistent_view() {
        let pifo = shared(10);
        pifo.push(1).unwrap();
        pifo.push(500).unwrap();

        let (len, sum) = pifo.with(|inner| {
            (
                inner.len(),
                inner.flow_len(Flow::Zero) + inner.flow_len(Flow::One),
            )
        });
        assert_eq!(len, sum);
    }
}
