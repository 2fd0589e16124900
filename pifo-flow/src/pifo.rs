//! Two-flow PIFO controller.
//!
//! A PIFO multiplexes two flows into one logical queue and tries to serve them
//! 50/50. A `hot` pointer names the flow preferred for the next pop:
//!
//! - A pop served by the hot flow flips `hot`, handing the next turn to the
//!   other flow.
//! - If the hot flow is empty, the pop reads through to the other flow once and
//!   leaves `hot` where it was, so the silent flow is served first as soon as it
//!   becomes active again.
//!
//! A PIFO-level length counter bounds the total at twice the per-flow capacity
//! and lets empty/full requests short-circuit without touching either
//! sub-queue. Each sub-queue still enforces its own bound, and its overflow is
//! reported verbatim even when the PIFO as a whole has room.

use tracing::{debug, trace, warn};

use crate::classifier::{Flow, FlowClassifier};
use crate::error::{ConfigError, ConfigResult, QueueError, QueueResult};
use crate::sub_queue::{BoundedFifo, SubQueue};

/// Configuration for a PIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PifoConfig<V = u32> {
    /// Capacity of each flow's sub-queue.
    pub flow_capacity: usize,

    /// Values `<= boundary` go to flow 0, the rest to flow 1.
    pub boundary: V,
}

impl<V> PifoConfig<V> {
    /// Creates a new PIFO configuration.
    ///
    /// # Arguments
    ///
    /// * `flow_capacity` - Capacity of each flow's sub-queue.
    /// * `boundary` - Classification threshold.
    #[must_use]
    pub const fn new(flow_capacity: usize, boundary: V) -> Self {
        Self {
            flow_capacity,
            boundary,
        }
    }

    /// Sets the per-flow capacity.
    #[must_use]
    pub const fn with_flow_capacity(mut self, flow_capacity: usize) -> Self {
        self.flow_capacity = flow_capacity;
        self
    }

    /// Returns the PIFO-level capacity (both flows together).
    #[must_use]
    pub const fn total_capacity(&self) -> usize {
        self.flow_capacity.saturating_mul(2)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` if the per-flow capacity is zero or
    /// the total capacity does not fit in a `usize`.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.flow_capacity == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "flow_capacity must be positive".to_string(),
            });
        }
        if self.flow_capacity.checked_mul(2).is_none() {
            return Err(ConfigError::InvalidConfig {
                message: format!("flow_capacity {} overflows total capacity", self.flow_capacity),
            });
        }
        Ok(())
    }
}

impl PifoConfig<u32> {
    /// Creates a configuration for testing.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            flow_capacity: 10,
            boundary: 200,
        }
    }
}

impl Default for PifoConfig<u32> {
    fn default() -> Self {
        Self {
            flow_capacity: 10,
            boundary: 200,
        }
    }
}

/// Which sub-queue serves the next pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HotPointer(Flow);

impl HotPointer {
    const fn new() -> Self {
        Self(Flow::Zero)
    }

    const fn get(self) -> Flow {
        self.0
    }

    fn flip(&mut self) {
        self.0 = self.0.other();
    }
}

/// Total element count across both sub-queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LengthCounter {
    len: usize,
    max: usize,
}

impl LengthCounter {
    const fn new(max: usize) -> Self {
        Self { len: 0, max }
    }

    const fn is_empty(self) -> bool {
        self.len == 0
    }

    const fn is_full(self) -> bool {
        self.len >= self.max
    }

    fn increment(&mut self) {
        debug_assert!(self.len < self.max, "length counter above capacity");
        self.len += 1;
    }

    fn decrement(&mut self) {
        debug_assert!(self.len > 0, "length counter below zero");
        self.len -= 1;
    }
}

/// Statistics about a PIFO.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PifoStats {
    /// Pushes accepted.
    pub pushes_accepted: u64,
    /// Pushes rejected because the PIFO as a whole was full.
    pub pushes_rejected_full: u64,
    /// Pushes rejected by a flow's own sub-queue.
    pub pushes_rejected_flow: u64,
    /// Pops served by the hot flow.
    pub pops_primary: u64,
    /// Pops served by the sibling flow after the hot flow came up empty.
    pub pops_fallback: u64,
    /// Pops rejected with underflow.
    pub pop_underflows: u64,
    /// Pops served per flow, indexed by `Flow::index`.
    pub served: [u64; 2],
}

impl PifoStats {
    /// Returns the number of pops served by `flow`.
    #[must_use]
    pub const fn served(&self, flow: Flow) -> u64 {
        self.served[flow.index()]
    }

    /// Returns the total number of successful pops.
    #[must_use]
    pub const fn total_popped(&self) -> u64 {
        self.pops_primary + self.pops_fallback
    }
}

/// A two-flow PIFO over two sub-queues.
///
/// The sub-queue types may differ; both only need to implement [`SubQueue`].
pub struct Pifo<V = u32, Q0 = BoundedFifo<V>, Q1 = BoundedFifo<V>> {
    /// Sub-queue for flow 0.
    queue0: Q0,

    /// Sub-queue for flow 1.
    queue1: Q1,

    classifier: FlowClassifier<V>,
    hot: HotPointer,
    length: LengthCounter,
    stats: PifoStats,
}

impl<V: Copy + Ord> Pifo<V> {
    /// Creates a PIFO backed by two [`BoundedFifo`]s sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` if the configuration is invalid.
    pub fn with_fifos(config: &PifoConfig<V>) -> ConfigResult<Self> {
        Self::new(
            config,
            BoundedFifo::new(config.flow_capacity),
            BoundedFifo::new(config.flow_capacity),
        )
    }
}

impl<V, Q0, Q1> Pifo<V, Q0, Q1>
where
    V: Copy + Ord,
    Q0: SubQueue<V>,
    Q1: SubQueue<V>,
{
    /// Creates a PIFO over the given sub-queues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` if the configuration is invalid, if
    /// either sub-queue's capacity differs from `config.flow_capacity`, or if
    /// either sub-queue is not empty.
    pub fn new(config: &PifoConfig<V>, queue0: Q0, queue1: Q1) -> ConfigResult<Self> {
        config.validate()?;

        for (flow, capacity, len) in [
            (Flow::Zero, queue0.capacity(), queue0.len()),
            (Flow::One, queue1.capacity(), queue1.len()),
        ] {
            if capacity != config.flow_capacity {
                return Err(ConfigError::InvalidConfig {
                    message: format!(
                        "{flow} sub-queue capacity {capacity} does not match flow_capacity {}",
                        config.flow_capacity
                    ),
                });
            }
            if len != 0 {
                return Err(ConfigError::InvalidConfig {
                    message: format!("{flow} sub-queue is not empty ({len} items)"),
                });
            }
        }

        Ok(Self {
            queue0,
            queue1,
            classifier: FlowClassifier::new(config.boundary),
            hot: HotPointer::new(),
            length: LengthCounter::new(config.total_capacity()),
            stats: PifoStats::default(),
        })
    }

    /// Pushes `value` onto the sub-queue of its flow.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Overflow` if the PIFO holds `2 * flow_capacity`
    /// elements, or if the value's own flow is full.
    pub fn push(&mut self, value: V) -> QueueResult<()> {
        if self.length.is_full() {
            self.stats.pushes_rejected_full += 1;
            trace!(len = self.length.len, "push rejected, pifo full");
            return Err(QueueError::Overflow {
                len: self.length.len,
                capacity: self.length.max,
            });
        }

        let flow = self.classifier.classify(value);
        if let Err(err) = self.sub_push(flow, value) {
            self.stats.pushes_rejected_flow += 1;
            debug!(%flow, %err, "push rejected by sub-queue");
            return Err(err);
        }

        self.length.increment();
        self.stats.pushes_accepted += 1;
        trace!(%flow, len = self.length.len, "pushed");
        Ok(())
    }

    /// Pops the next value, preferring the hot flow.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Underflow` if the PIFO is empty, or if both
    /// sub-queues turn out to be empty.
    pub fn pop(&mut self) -> QueueResult<V> {
        if self.length.is_empty() {
            self.stats.pop_underflows += 1;
            trace!("pop rejected, pifo empty");
            return Err(QueueError::Underflow);
        }

        let hot = self.hot.get();
        let (value, served_by) = match self.sub_pop(hot) {
            Ok(value) => {
                self.hot.flip();
                self.stats.pops_primary += 1;
                (value, hot)
            }
            Err(_) => {
                let fallback = hot.other();
                debug!(%hot, %fallback, "hot flow empty, falling back");
                match self.sub_pop(fallback) {
                    Ok(value) => {
                        self.stats.pops_fallback += 1;
                        (value, fallback)
                    }
                    Err(err) => {
                        self.stats.pop_underflows += 1;
                        warn!(len = self.length.len, %err, "both flows empty with non-zero length");
                        return Err(err);
                    }
                }
            }
        };

        self.length.decrement();
        self.stats.served[served_by.index()] += 1;
        trace!(flow = %served_by, hot = %self.hot.get(), len = self.length.len, "popped");
        Ok(value)
    }

    /// Returns the value the next pop would return, without removing it.
    ///
    /// Never changes `hot` or the length.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Underflow` if the PIFO is empty, or if both
    /// sub-queues turn out to be empty.
    pub fn peek(&self) -> QueueResult<V> {
        if self.length.is_empty() {
            return Err(QueueError::Underflow);
        }

        let hot = self.hot.get();
        self.sub_peek(hot).or_else(|_| self.sub_peek(hot.other()))
    }

    /// Returns the total number of queued values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length.len
    }

    /// Returns whether the PIFO is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length.is_empty()
    }

    /// Returns the PIFO-level capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.length.max
    }

    /// Returns the flow preferred for the next pop.
    #[must_use]
    pub const fn hot(&self) -> Flow {
        self.hot.get()
    }

    /// Returns the number of values queued in `flow`'s sub-queue.
    #[must_use]
    pub fn flow_len(&self, flow: Flow) -> usize {
        match flow {
            Flow::Zero => self.queue0.len(),
            Flow::One => self.queue1.len(),
        }
    }

    /// Returns the classifier used to route pushes.
    #[must_use]
    pub const fn classifier(&self) -> &FlowClassifier<V> {
        &self.classifier
    }

    /// Returns statistics about the PIFO.
    #[must_use]
    pub const fn stats(&self) -> PifoStats {
        self.stats
    }

    fn sub_push(&mut self, flow: Flow, value: V) -> QueueResult<()> {
        match flow {
            Flow::Zero => self.queue0.push(value),
            Flow::One => self.queue1.push(value),
        }
    }

    fn sub_pop(&mut self, flow: Flow) -> QueueResult<V> {
        match flow {
            Flow::Zero => self.queue0.pop(),
            Flow::One => self.queue1.pop(),
        }
    }

    fn sub_peek(&self, flow: Flow) -> QueueResult<V> {
        match flow {
            Flow::Zero => self.queue0.peek(),
            Flow::One => self.queue1.peek(),
        }
    }
}

impl<V, Q0, Q1> std::fmt::Debug for Pifo<V, Q0, Q1>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pifo")
            .field("boundary", &self.classifier)
            .field("hot", &self.hot.0)
            .field("len", &self.length.len)
            .field("capacity", &self.length.max)
            .finish_non_exhaustive()
    }
}
