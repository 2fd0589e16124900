//! Executors drive workload requests into a queue.
//!
//! The same workload runs against a PIFO owned directly by the caller or
//! against a [`SharedPifo`] handle that other threads may also be using.

use pifo_flow::{Flow, Pifo, QueueResult, Request, SharedPifo, SubQueue};

use crate::operation::{Observation, Value};

/// Target a workload executes against.
pub trait QueueExecutor {
    /// Services one request.
    ///
    /// # Errors
    ///
    /// Returns the queue's overflow or underflow error.
    fn execute(&mut self, request: Request<Value>) -> QueueResult<Option<Value>>;

    /// Returns the current queue state.
    fn observe(&self) -> Observation;

    /// Services one request and observes the resulting state as one step.
    ///
    /// # Errors
    ///
    /// Returns the queue's overflow or underflow error alongside the state.
    fn execute_observed(
        &mut self,
        request: Request<Value>,
    ) -> (QueueResult<Option<Value>>, Observation) {
        let response = self.execute(request);
        (response, self.observe())
    }
}

fn observe_pifo<Q0, Q1>(pifo: &Pifo<Value, Q0, Q1>) -> Observation
where
    Q0: SubQueue<Value>,
    Q1: SubQueue<Value>,
{
    Observation {
        hot: pifo.hot(),
        len: pifo.len(),
        flow0_len: pifo.flow_len(Flow::Zero),
        flow1_len: pifo.flow_len(Flow::One),
    }
}

impl<Q0, Q1> QueueExecutor for Pifo<Value, Q0, Q1>
where
    Q0: SubQueue<Value>,
    Q1: SubQueue<Value>,
{
    fn execute(&mut self, request: Request<Value>) -> QueueResult<Option<Value>> {
        self.handle(request)
    }

    fn observe(&self) -> Observation {
        observe_pifo(self)
    }
}

impl<Q0, Q1> QueueExecutor for SharedPifo<Value, Q0, Q1>
where
    Q0: SubQueue<Value>,
    Q1: SubQueue<Value>,
{
    fn execute(&mut self, request: Request<Value>) -> QueueResult<Option<Value>> {
        self.handle(request)
    }

    fn observe(&self) -> Observation {
        self.with(|pifo| observe_pifo(pifo))
    }

    // Holds the lock across the request and the observation so the recorded
    // state belongs to this request.
    fn execute_observed(
        &mut self,
        request: Request<Value>,
    ) -> (QueueResult<Option<Value>>, Observation) {
        self.with(|pifo| {
            let response = pifo.handle(request);
            (response, observe_pifo(pifo))
        })
    }
}
