//! Property definitions and checkers for PIFO tests.
//!
//! Properties are invariants that must hold after every request. The checker
//! drives a live PIFO one request at a time, keeps its own per-flow record of
//! what was accepted, and compares every answer and state change against what
//! the discipline allows.

use std::collections::VecDeque;

use pifo_flow::{Command, Flow, FlowClassifier, Pifo, PifoConfig, QueueResult, Request, SubQueue};
use pifo_workload::{Observation, QueueExecutor, Value};

// ============================================================================
// Property Violation Types
// ============================================================================

/// A violation of a PIFO property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyViolation {
    /// The reported length is not the sum of the flow lengths.
    LengthMismatch {
        /// Step index.
        step: u64,
        /// Reported total length.
        len: usize,
        /// Sum of the flow lengths.
        flow_sum: usize,
    },
    /// The PIFO or one of its flows holds more than its capacity.
    CapacityExceeded {
        /// Step index.
        step: u64,
        /// Offending flow, or `None` for the PIFO as a whole.
        flow: Option<Flow>,
        /// Observed length.
        len: usize,
        /// Capacity that was exceeded.
        capacity: usize,
    },
    /// The length moved by something other than the request's effect.
    LengthNotUpdated {
        /// Step index.
        step: u64,
        /// Request command.
        command: Command,
        /// Length before the request.
        before: usize,
        /// Length after the request.
        after: usize,
    },
    /// A flow handed out a value that is not its oldest.
    FifoOrder {
        /// Step index.
        step: u64,
        /// Flow the value belongs to.
        flow: Flow,
        /// Oldest value accepted into the flow and not yet popped.
        expected: Option<Value>,
        /// Value handed out.
        observed: Value,
    },
    /// A pop was served by the cold flow while the hot flow had values.
    WrongFlowServed {
        /// Step index.
        step: u64,
        /// Hot flow at the time of the pop.
        hot: Flow,
        /// Flow that served the pop.
        served: Flow,
    },
    /// `hot` did not flip after a pop served by the hot flow.
    HotNotFlipped {
        /// Step index.
        step: u64,
        /// Hot flow before and after the pop.
        hot: Flow,
    },
    /// `hot` moved on a request that must leave it alone.
    UnexpectedHotChange {
        /// Step index.
        step: u64,
        /// Request command.
        command: Command,
        /// Hot flow before the request.
        before: Flow,
        /// Hot flow after the request.
        after: Flow,
    },
    /// A push was rejected although both the PIFO and its flow had room.
    SpuriousOverflow {
        /// Step index.
        step: u64,
        /// PIFO length before the push.
        len: usize,
        /// Length of the value's flow before the push.
        flow_len: usize,
    },
    /// A pop or peek was rejected although values were queued.
    SpuriousUnderflow {
        /// Step index.
        step: u64,
        /// Request command.
        command: Command,
        /// PIFO length before the request.
        len: usize,
    },
    /// A rejected request changed the PIFO state.
    StateChangedOnError {
        /// Step index.
        step: u64,
        /// Request command.
        command: Command,
    },
    /// The response shape does not fit the request.
    MalformedResponse {
        /// Step index.
        step: u64,
        /// Request command.
        command: Command,
    },
    /// Peek before a pop named a different value than the pop returned.
    PeekMismatch {
        /// Step index.
        step: u64,
        /// What peek returned before the pop.
        peeked: QueueResult<Value>,
        /// What the pop returned.
        popped: Value,
    },
    /// Two back-to-back peeks disagreed or changed the state.
    PeekNotIdempotent {
        /// Step index.
        step: u64,
        /// First peek.
        first: QueueResult<Value>,
        /// Second peek.
        second: QueueResult<Value>,
    },
}

impl std::fmt::Display for PropertyViolation {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch {
                step,
                len,
                flow_sum,
            } => {
                write!(f, "Length mismatch at step {step}: len={len}, flows hold {flow_sum}")
            }
            Self::CapacityExceeded {
                step,
                flow,
                len,
                capacity,
            } => match flow {
                Some(flow) => write!(
                    f,
                    "Capacity exceeded at step {step}: {flow} holds {len} (max {capacity})"
                ),
                None => write!(
                    f,
                    "Capacity exceeded at step {step}: pifo holds {len} (max {capacity})"
                ),
            },
            Self::LengthNotUpdated {
                step,
                command,
                before,
                after,
            } => {
                write!(
                    f,
                    "Length not updated at step {step}: {command:?} moved len {before} -> {after}"
                )
            }
            Self::FifoOrder {
                step,
                flow,
                expected,
                observed,
            } => {
                write!(
                    f,
                    "FIFO order broken at step {step}: {flow} handed out {observed}, \
                     expected {expected:?}"
                )
            }
            Self::WrongFlowServed { step, hot, served } => {
                write!(
                    f,
                    "Wrong flow served at step {step}: hot={hot} had values but {served} served"
                )
            }
            Self::HotNotFlipped { step, hot } => {
                write!(f, "Hot not flipped at step {step}: stayed {hot} after primary pop")
            }
            Self::UnexpectedHotChange {
                step,
                command,
                before,
                after,
            } => {
                write!(
                    f,
                    "Unexpected hot change at step {step}: {command:?} moved hot {before} -> {after}"
                )
            }
            Self::SpuriousOverflow {
                step,
                len,
                flow_len,
            } => {
                write!(
                    f,
                    "Spurious overflow at step {step}: len={len}, flow_len={flow_len}"
                )
            }
            Self::SpuriousUnderflow { step, command, len } => {
                write!(f, "Spurious underflow at step {step}: {command:?} with len={len}")
            }
            Self::StateChangedOnError { step, command } => {
                write!(f, "State changed at step {step}: rejected {command:?} mutated the pifo")
            }
            Self::MalformedResponse { step, command } => {
                write!(f, "Malformed response at step {step} for {command:?}")
            }
            Self::PeekMismatch {
                step,
                peeked,
                popped,
            } => {
                write!(
                    f,
                    "Peek mismatch at step {step}: peek said {peeked:?}, pop returned {popped}"
                )
            }
            Self::PeekNotIdempotent {
                step,
                first,
                second,
            } => {
                write!(
                    f,
                    "Peek not idempotent at step {step}: {first:?} then {second:?}"
                )
            }
        }
    }
}

// ============================================================================
// Property Checker
// ============================================================================

/// Drives a PIFO and checks every property after each request.
#[derive(Debug, Clone)]
pub struct PropertyChecker {
    classifier: FlowClassifier<Value>,
    flow_capacity: usize,
    /// Accepted values per flow that have not been popped yet.
    accepted: [VecDeque<Value>; 2],
    /// Index of the next step.
    step: u64,
    /// Violations found.
    violations: Vec<PropertyViolation>,
}

impl PropertyChecker {
    /// Creates a checker for a PIFO built from `config`.
    #[must_use]
    pub fn new(config: &PifoConfig<Value>) -> Self {
        Self {
            classifier: FlowClassifier::new(config.boundary),
            flow_capacity: config.flow_capacity,
            accepted: [VecDeque::new(), VecDeque::new()],
            step: 0,
            violations: Vec::new(),
        }
    }

    /// Services `request` on `pifo` and checks every property around it.
    ///
    /// Returns the PIFO's own response so callers can assert on it too.
    ///
    /// # Errors
    ///
    /// Returns whatever error the PIFO returned for the request.
    pub fn step<Q0, Q1>(
        &mut self,
        pifo: &mut Pifo<Value, Q0, Q1>,
        request: Request<Value>,
    ) -> QueueResult<Option<Value>>
    where
        Q0: SubQueue<Value>,
        Q1: SubQueue<Value>,
    {
        let step = self.step;
        self.step += 1;

        let before = pifo.observe();
        let predicted = pifo.peek();
        let response = pifo.handle(request);
        let after = pifo.observe();

        let mut found = check_state(step, &after, self.flow_capacity);
        match (request, response) {
            (Request::Push(value), Ok(None)) => {
                self.check_push(step, value, &before, &after, &mut found);
            }
            (Request::Push(value), Err(err)) => {
                let flow_len = before.flow_len(self.classifier.classify(value));
                let full = before.len >= self.flow_capacity * 2 || flow_len >= self.flow_capacity;
                if !full || !err.is_overflow() {
                    found.push(PropertyViolation::SpuriousOverflow {
                        step,
                        len: before.len,
                        flow_len,
                    });
                }
                if after != before {
                    found.push(PropertyViolation::StateChangedOnError {
                        step,
                        command: Command::Push,
                    });
                }
            }
            (Request::Pop, Ok(Some(value))) => {
                if predicted != Ok(value) {
                    found.push(PropertyViolation::PeekMismatch {
                        step,
                        peeked: predicted,
                        popped: value,
                    });
                }
                self.check_pop(step, value, &before, &after, &mut found);
            }
            (Request::Peek, Ok(Some(value))) => {
                self.check_fifo(step, value, false, &mut found);
                if after != before {
                    found.push(PropertyViolation::StateChangedOnError {
                        step,
                        command: Command::Peek,
                    });
                }
            }
            (request @ (Request::Pop | Request::Peek), Err(err)) => {
                let command = request.command();
                if before.len != 0 || !err.is_underflow() {
                    found.push(PropertyViolation::SpuriousUnderflow {
                        step,
                        command,
                        len: before.len,
                    });
                }
                if after != before {
                    found.push(PropertyViolation::StateChangedOnError { step, command });
                }
            }
            (request, Ok(_)) => found.push(PropertyViolation::MalformedResponse {
                step,
                command: request.command(),
            }),
        }

        let first = pifo.peek();
        let second = pifo.peek();
        if first != second || pifo.observe() != after {
            found.push(PropertyViolation::PeekNotIdempotent {
                step,
                first,
                second,
            });
        }

        self.violations.extend(found);
        response
    }

    /// Runs every request in order, ignoring the responses.
    pub fn run<Q0, Q1>(&mut self, pifo: &mut Pifo<Value, Q0, Q1>, requests: &[Request<Value>])
    where
        Q0: SubQueue<Value>,
        Q1: SubQueue<Value>,
    {
        for &request in requests {
            // Rejections are checked by `step`; the replay carries on.
            let _ = self.step(pifo, request);
        }
    }

    fn check_push(
        &mut self,
        step: u64,
        value: Value,
        before: &Observation,
        after: &Observation,
        found: &mut Vec<PropertyViolation>,
    ) {
        let flow = self.classifier.classify(value);
        self.accepted[flow.index()].push_back(value);

        if after.len != before.len + 1 || after.flow_len(flow) != before.flow_len(flow) + 1 {
            found.push(PropertyViolation::LengthNotUpdated {
                step,
                command: Command::Push,
                before: before.len,
                after: after.len,
            });
        }
        if after.hot != before.hot {
            found.push(PropertyViolation::UnexpectedHotChange {
                step,
                command: Command::Push,
                before: before.hot,
                after: after.hot,
            });
        }
    }

    fn check_pop(
        &mut self,
        step: u64,
        value: Value,
        before: &Observation,
        after: &Observation,
        found: &mut Vec<PropertyViolation>,
    ) {
        let served = self.classifier.classify(value);
        self.check_fifo(step, value, true, found);

        if Some(after.len) != before.len.checked_sub(1) {
            found.push(PropertyViolation::LengthNotUpdated {
                step,
                command: Command::Pop,
                before: before.len,
                after: after.len,
            });
        }

        if served == before.hot {
            if after.hot != before.hot.other() {
                found.push(PropertyViolation::HotNotFlipped {
                    step,
                    hot: before.hot,
                });
            }
        } else {
            if before.flow_len(before.hot) != 0 {
                found.push(PropertyViolation::WrongFlowServed {
                    step,
                    hot: before.hot,
                    served,
                });
            }
            if after.hot != before.hot {
                found.push(PropertyViolation::UnexpectedHotChange {
                    step,
                    command: Command::Pop,
                    before: before.hot,
                    after: after.hot,
                });
            }
        }
    }

    fn check_fifo(
        &mut self,
        step: u64,
        value: Value,
        remove: bool,
        found: &mut Vec<PropertyViolation>,
    ) {
        let flow = self.classifier.classify(value);
        let accepted = &mut self.accepted[flow.index()];
        let expected = accepted.front().copied();

        if expected != Some(value) {
            found.push(PropertyViolation::FifoOrder {
                step,
                flow,
                expected,
                observed: value,
            });
        }
        if remove {
            // Resync on the value actually handed out so one fault is reported once.
            if let Some(pos) = accepted.iter().position(|v| *v == value) {
                accepted.remove(pos);
            }
        }
    }

    /// Returns the number of steps checked so far.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.step
    }

    /// Returns the number of accepted values not yet popped.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.accepted.iter().map(VecDeque::len).sum()
    }

    /// Returns all violations found so far.
    #[must_use]
    pub fn violations(&self) -> &[PropertyViolation] {
        &self.violations
    }

    /// Returns true if no violations have been found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Clears recorded state (for starting over on a fresh PIFO).
    pub fn reset(&mut self) {
        for accepted in &mut self.accepted {
            accepted.clear();
        }
        self.step = 0;
        self.violations.clear();
    }
}

// ============================================================================
// Standalone Check Functions
// ============================================================================

/// Checks length bookkeeping and capacity bounds on one observed state.
#[must_use]
pub fn check_state(step: u64, state: &Observation, flow_capacity: usize) -> Vec<PropertyViolation> {
    let mut violations = Vec::new();

    let flow_sum = state.flow0_len + state.flow1_len;
    if state.len != flow_sum {
        violations.push(PropertyViolation::LengthMismatch {
            step,
            len: state.len,
            flow_sum,
        });
    }

    let capacity = flow_capacity * 2;
    if state.len > capacity {
        violations.push(PropertyViolation::CapacityExceeded {
            step,
            flow: None,
            len: state.len,
            capacity,
        });
    }
    for flow in Flow::all() {
        let len = state.flow_len(flow);
        if len > flow_capacity {
            violations.push(PropertyViolation::CapacityExceeded {
                step,
                flow: Some(flow),
                len,
                capacity: flow_capacity,
            });
        }
    }

    violations
}

/// Pops until the PIFO reports underflow and returns the values in order.
pub fn drain<Q0, Q1>(pifo: &mut Pifo<Value, Q0, Q1>) -> Vec<Value>
where
    Q0: SubQueue<Value>,
    Q1: SubQueue<Value>,
{
    std::iter::from_fn(|| pifo.pop().ok()).collect()
}
