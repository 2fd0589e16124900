//! Verification logic for detecting correctness violations.
//!
//! Checks a recorded history two ways:
//! - Against the [`ReferenceModel`], request by request (results and state).
//! - Against properties derived from the history alone: length bookkeeping,
//!   capacity bounds, FIFO order within each flow, and `hot` only moving on
//!   successful pops.

use std::collections::VecDeque;

use pifo_flow::{Command, Flow, FlowClassifier, PifoConfig, Request};

use crate::history::History;
use crate::model::ReferenceModel;
use crate::operation::{Observation, OperationResult, Value};

/// A violation of an expected property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An operation never completed.
    Incomplete {
        /// Operation ID.
        op_id: u64,
    },

    /// The queue answered differently from the reference model.
    ResultMismatch {
        /// Operation ID.
        op_id: u64,
        /// Request command.
        command: Command,
        /// Result the model expected.
        expected: OperationResult,
        /// Result the queue returned.
        observed: OperationResult,
    },

    /// The queue state after an operation differs from the reference model.
    StateMismatch {
        /// Operation ID.
        op_id: u64,
        /// State the model expected.
        expected: Observation,
        /// State the queue reported.
        observed: Observation,
    },

    /// The reported length is not the sum of the flow lengths.
    LengthMismatch {
        /// Operation ID.
        op_id: u64,
        /// Reported total length.
        len: usize,
        /// Sum of the per-flow lengths.
        flow_sum: usize,
    },

    /// The queue held more values than its capacity allows.
    CapacityExceeded {
        /// Operation ID.
        op_id: u64,
        /// Reported length.
        len: usize,
        /// PIFO-level capacity.
        capacity: usize,
    },

    /// A pop or peek returned a value out of push order within its flow.
    FifoViolation {
        /// Operation ID.
        op_id: u64,
        /// The flow the value belongs to.
        flow: Flow,
        /// Oldest value pushed to the flow and not yet popped.
        expected: Option<Value>,
        /// Value returned.
        observed: Value,
    },

    /// `hot` moved on something other than a pop served by the hot flow.
    UnexpectedHotChange {
        /// Operation ID.
        op_id: u64,
        /// Request command.
        command: Command,
        /// `hot` before the operation.
        before: Flow,
        /// `hot` after the operation.
        after: Flow,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incomplete { op_id } => write!(f, "Incomplete: op={op_id} has no result"),
            Self::ResultMismatch {
                op_id,
                command,
                expected,
                observed,
            } => {
                write!(
                    f,
                    "Result mismatch: op={op_id} {command:?} expected {expected}, got {observed}"
                )
            }
            Self::StateMismatch {
                op_id,
                expected,
                observed,
            } => {
                write!(
                    f,
                    "State mismatch: op={op_id} expected {expected:?}, got {observed:?}"
                )
            }
            Self::LengthMismatch {
                op_id,
                len,
                flow_sum,
            } => {
                write!(
                    f,
                    "Length mismatch: op={op_id} len={len} but flows hold {flow_sum}"
                )
            }
            Self::CapacityExceeded {
                op_id,
                len,
                capacity,
            } => {
                write!(f, "Capacity exceeded: op={op_id} len={len} (max {capacity})")
            }
            Self::FifoViolation {
                op_id,
                flow,
                expected,
                observed,
            } => {
                write!(
                    f,
                    "FIFO violation: op={op_id} {flow} returned {observed}, expected {expected:?}"
                )
            }
            Self::UnexpectedHotChange {
                op_id,
                command,
                before,
                after,
            } => {
                write!(
                    f,
                    "Unexpected hot change: op={op_id} {command:?} moved hot {before} -> {after}"
                )
            }
        }
    }
}

/// History verifier.
#[derive(Debug, Clone, Copy)]
pub struct Verification {
    config: PifoConfig<Value>,
}

impl Verification {
    /// Creates a verifier for a PIFO built from `config`.
    #[must_use]
    pub const fn new(config: PifoConfig<Value>) -> Self {
        Self { config }
    }

    /// Runs every check and returns all violations found.
    #[must_use]
    pub fn verify(&self, history: &History) -> Vec<Violation> {
        let mut violations = Vec::new();
        violations.extend(self.verify_against_model(history));
        violations.extend(self.verify_bookkeeping(history));
        violations.extend(self.verify_fifo_per_flow(history));
        violations.extend(Self::verify_hot_moves(history));
        violations
    }

    /// Replays the history's requests through the reference model and compares
    /// results and observed state.
    #[must_use]
    pub fn verify_against_model(&self, history: &History) -> Vec<Violation> {
        let mut model = ReferenceModel::new(&self.config);
        let mut violations = Vec::new();

        for op in history.operations() {
            let expected = model.apply(op.request);
            let (Some(observed), Some(state)) = (op.result, op.observed) else {
                violations.push(Violation::Incomplete { op_id: op.id });
                continue;
            };

            if expected != observed {
                violations.push(Violation::ResultMismatch {
                    op_id: op.id,
                    command: op.command(),
                    expected,
                    observed,
                });
            }
            if model.state() != state {
                violations.push(Violation::StateMismatch {
                    op_id: op.id,
                    expected: model.state(),
                    observed: state,
                });
            }
        }

        violations
    }

    /// Checks that lengths add up and stay within capacity.
    #[must_use]
    pub fn verify_bookkeeping(&self, history: &History) -> Vec<Violation> {
        let capacity = self.config.total_capacity();
        let mut violations = Vec::new();

        for op in history.operations() {
            let Some(state) = op.observed else {
                continue;
            };
            let flow_sum = state.flow0_len + state.flow1_len;
            if state.len != flow_sum {
                violations.push(Violation::LengthMismatch {
                    op_id: op.id,
                    len: state.len,
                    flow_sum,
                });
            }
            if state.len > capacity {
                violations.push(Violation::CapacityExceeded {
                    op_id: op.id,
                    len: state.len,
                    capacity,
                });
            }
        }

        violations
    }

    /// Checks that every flow hands values out in the order they were pushed.
    #[must_use]
    pub fn verify_fifo_per_flow(&self, history: &History) -> Vec<Violation> {
        let classifier = FlowClassifier::new(self.config.boundary);
        let mut pending: [VecDeque<Value>; 2] = [VecDeque::new(), VecDeque::new()];
        let mut violations = Vec::new();

        for op in history.operations() {
            match (op.command(), op.result) {
                (Command::Push, Some(OperationResult::Pushed)) => {
                    if let Request::Push(value) = op.request {
                        pending[classifier.classify(value).index()].push_back(value);
                    }
                }
                (command @ (Command::Pop | Command::Peek), Some(OperationResult::Value(value))) => {
                    let flow = classifier.classify(value);
                    let queue = &mut pending[flow.index()];
                    let expected = queue.front().copied();
                    if expected != Some(value) {
                        violations.push(Violation::FifoViolation {
                            op_id: op.id,
                            flow,
                            expected,
                            observed: value,
                        });
                    } else if command == Command::Pop {
                        queue.pop_front();
                    }
                }
                _ => {}
            }
        }

        violations
    }

    /// Checks that `hot` moves only by flipping on a successful pop.
    #[must_use]
    pub fn verify_hot_moves(history: &History) -> Vec<Violation> {
        let mut before = Flow::Zero;
        let mut violations = Vec::new();

        for op in history.operations() {
            let Some(state) = op.observed else {
                continue;
            };
            let after = state.hot;
            let may_flip = op.command() == Command::Pop && op.is_ok();
            let flipped_correctly = after == before || (may_flip && after == before.other());
            if !flipped_correctly {
                violations.push(Violation::UnexpectedHotChange {
                    op_id: op.id,
                    command: op.command(),
                    before,
                    after,
                });
            }
            before = after;
        }

        violations
    }
}
