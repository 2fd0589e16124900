//! Operation model for workload execution.
//!
//! Defines the requests a workload issues against a PIFO and what came back.

use pifo_flow::{Command, Flow, QueueError, QueueResult, Request};

/// Queue value used by workloads.
pub type Value = u32;

/// PIFO state observed right after an operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Flow preferred for the next pop.
    pub hot: Flow,
    /// Total queued values.
    pub len: usize,
    /// Values queued in flow 0.
    pub flow0_len: usize,
    /// Values queued in flow 1.
    pub flow1_len: usize,
}

impl Observation {
    /// Returns the queued count for `flow`.
    #[must_use]
    pub const fn flow_len(&self, flow: Flow) -> usize {
        match flow {
            Flow::Zero => self.flow0_len,
            Flow::One => self.flow1_len,
        }
    }
}

/// A single operation in the workload.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Unique operation ID, in issue order.
    pub id: u64,
    /// The request issued.
    pub request: Request<Value>,
    /// Result of the operation (filled after execution).
    pub result: Option<OperationResult>,
    /// State observed after execution (filled after execution).
    pub observed: Option<Observation>,
}

impl Operation {
    /// Creates a new pending operation.
    #[must_use]
    pub const fn new(id: u64, request: Request<Value>) -> Self {
        Self {
            id,
            request,
            result: None,
            observed: None,
        }
    }

    /// Records the completion of this operation.
    pub fn complete(&mut self, result: OperationResult, observed: Observation) {
        self.result = Some(result);
        self.observed = Some(observed);
    }

    /// Returns true if this operation completed successfully.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.as_ref().is_some_and(OperationResult::is_ok)
    }

    /// Returns the command of the request.
    #[must_use]
    pub const fn command(&self) -> Command {
        self.request.command()
    }
}

/// Result of an operation execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    /// Push accepted.
    Pushed,
    /// Pop or peek returned a value.
    Value(Value),
    /// Push rejected.
    Overflow,
    /// Pop or peek rejected.
    Underflow,
}

impl OperationResult {
    /// Converts a PIFO response into an operation result.
    #[must_use]
    pub const fn from_response(response: QueueResult<Option<Value>>) -> Self {
        match response {
            Ok(None) => Self::Pushed,
            Ok(Some(value)) => Self::Value(value),
            Err(QueueError::Overflow { .. }) => Self::Overflow,
            Err(QueueError::Underflow) => Self::Underflow,
        }
    }

    /// Returns true if the request succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Pushed | Self::Value(_))
    }

    /// Returns the answer slot as a queue harness reports it: the value for a
    /// successful pop or peek, zero otherwise.
    #[must_use]
    pub const fn answer(&self) -> Value {
        match self {
            Self::Value(value) => *value,
            Self::Pushed | Self::Overflow | Self::Underflow => 0,
        }
    }

    /// Returns the value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Pushed | Self::Overflow | Self::Underflow => None,
        }
    }
}

impl std::fmt::Display for OperationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pushed => write!(f, "pushed"),
            Self::Value(value) => write!(f, "value({value})"),
            Self::Overflow => write!(f, "overflow"),
            Self::Underflow => write!(f, "underflow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response() {
        assert_eq!(OperationResult::from_response(Ok(None)), OperationResult::Pushed);
        assert_eq!(
            OperationResult::from_response(Ok(Some(7))),
            OperationResult::Value(7)
        );
        assert_eq!(
            OperationResult::from_response(Err(QueueError::Overflow {
                len: 1,
                capacity: 1
            })),
            OperationResult::Overflow
        );
        assert_eq!(
            OperationResult::from_response(Err(QueueError::Underflow)),
            OperationResult::Underflow
        );
    }

    #[test]
    fn test_answer_zeroed_on_failure() {
        assert_eq!(OperationResult::Value(42).answer(), 42);
        assert_eq!(OperationResult::Underflow.answer(), 0);
        assert_eq!(OperationResult::Overflow.answer(), 0);
        assert_eq!(OperationResult::Pushed.answer(), 0);
    }

    #[test]
    fn test_operation_completion() {
        let mut op = Operation::new(0, Request::Pop);
        assert!(!op.is_ok());
        assert_eq!(op.command(), Command::Pop);

        op.complete(
            OperationResult::Value(3),
            Observation {
                hot: Flow::One,
                len: 0,
                flow0_len: 0,
                flow1_len: 0,
            },
        );
        assert!(op.is_ok());
        assert_eq!(op.observed.map(|o| o.hot), Some(Flow::One));
    }
}
