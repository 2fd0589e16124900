//! History recording for workload verification.
//!
//! Tracks every request issued during a workload execution together with its
//! result and the queue state observed right after it.

use pifo_flow::{Command, Request};

use crate::operation::{Observation, Operation, OperationResult, Value};

/// Complete history of a workload execution.
#[derive(Debug, Default)]
pub struct History {
    /// All operations in issue order.
    operations: Vec<Operation>,

    /// Next operation ID to assign.
    next_op_id: u64,
}

impl History {
    /// Creates a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request and returns the assigned operation ID.
    pub fn record_invoke(&mut self, request: Request<Value>) -> u64 {
        let id = self.next_op_id;
        self.next_op_id += 1;
        self.operations.push(Operation::new(id, request));
        id
    }

    /// Records the completion of an operation.
    ///
    /// # Panics
    ///
    /// Panics if the operation ID is invalid.
    #[allow(clippy::cast_possible_truncation)] // op_id is always within Vec bounds.
    pub fn record_complete(&mut self, op_id: u64, result: OperationResult, observed: Observation) {
        let op = self
            .operations
            .get_mut(op_id as usize)
            .expect("invalid operation ID");
        op.complete(result, observed);
    }

    /// Returns all operations.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns an operation by ID.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_operation(&self, op_id: u64) -> Option<&Operation> {
        self.operations.get(op_id as usize)
    }

    /// Returns the answers of successful pops and peeks in issue order.
    ///
    /// Failed requests are skipped, matching how queue harnesses fill their
    /// answer memory.
    #[must_use]
    pub fn answers(&self) -> Vec<Value> {
        self.operations
            .iter()
            .filter_map(|op| op.result.and_then(|r| r.value()))
            .collect()
    }

    /// Returns the answer slot of every operation, zero for anything that did
    /// not produce a value.
    #[must_use]
    pub fn answer_trace(&self) -> Vec<Value> {
        self.operations
            .iter()
            .map(|op| op.result.map_or(0, |r| r.answer()))
            .collect()
    }

    /// Returns statistics about the history.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        let mut stats = HistoryStats::default();
        for op in &self.operations {
            stats.total_ops += 1;
            match op.command() {
                Command::Push => stats.push_count += 1,
                Command::Pop => stats.pop_count += 1,
                Command::Peek => stats.peek_count += 1,
            }
            match op.result {
                Some(OperationResult::Pushed | OperationResult::Value(_)) => {
                    stats.successful_ops += 1;
                }
                Some(OperationResult::Overflow) => stats.overflows += 1,
                Some(OperationResult::Underflow) => stats.underflows += 1,
                None => stats.pending_ops += 1,
            }
        }
        stats
    }

    /// Returns the number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns whether no operations have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Statistics about a workload history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Total operations recorded.
    pub total_ops: u64,
    /// Operations that succeeded.
    pub successful_ops: u64,
    /// Pushes rejected with overflow.
    pub overflows: u64,
    /// Pops and peeks rejected with underflow.
    pub underflows: u64,
    /// Operations with no recorded result.
    pub pending_ops: u64,
    /// Push requests.
    pub push_count: u64,
    /// Pop requests.
    pub pop_count: u64,
    /// Peek requests.
    pub peek_count: u64,
}
