//! Reference model of the two-flow PIFO.
//!
//! An independent, deliberately plain rendition of the discipline used as the
//! oracle during verification: two deques, a hot flow, and no PIFO-level
//! counter (the length is always derived from the deques).

use std::collections::VecDeque;

use pifo_flow::{Flow, PifoConfig, Request};

use crate::operation::{Observation, OperationResult, Value};

/// Oracle for PIFO behaviour.
#[derive(Debug, Clone)]
pub struct ReferenceModel {
    flows: [VecDeque<Value>; 2],
    hot: Flow,
    flow_capacity: usize,
    boundary: Value,
}

impl ReferenceModel {
    /// Creates an empty model for `config`.
    #[must_use]
    pub fn new(config: &PifoConfig<Value>) -> Self {
        Self {
            flows: [VecDeque::new(), VecDeque::new()],
            hot: Flow::Zero,
            flow_capacity: config.flow_capacity,
            boundary: config.boundary,
        }
    }

    /// Applies one request and returns the expected result.
    pub fn apply(&mut self, request: Request<Value>) -> OperationResult {
        match request {
            Request::Push(value) => {
                if self.len() == self.flow_capacity * 2 {
                    return OperationResult::Overflow;
                }
                let flow = if value <= self.boundary {
                    Flow::Zero
                } else {
                    Flow::One
                };
                let queue = &mut self.flows[flow.index()];
                if queue.len() == self.flow_capacity {
                    return OperationResult::Overflow;
                }
                queue.push_back(value);
                OperationResult::Pushed
            }
            Request::Pop => {
                let hot = self.hot;
                if let Some(value) = self.flows[hot.index()].pop_front() {
                    self.hot = hot.other();
                    OperationResult::Value(value)
                } else if let Some(value) = self.flows[hot.other().index()].pop_front() {
                    OperationResult::Value(value)
                } else {
                    OperationResult::Underflow
                }
            }
            Request::Peek => self.flows[self.hot.index()]
                .front()
                .or_else(|| self.flows[self.hot.other().index()].front())
                .map_or(OperationResult::Underflow, |v| OperationResult::Value(*v)),
        }
    }

    /// Returns the total number of queued values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.iter().map(VecDeque::len).sum()
    }

    /// Returns whether the model holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.iter().all(VecDeque::is_empty)
    }

    /// Returns the model state in the same shape an executor reports.
    #[must_use]
    pub fn state(&self) -> Observation {
        Observation {
            hot: self.hot,
            len: self.len(),
            flow0_len: self.flows[0].len(),
            flow1_len: self.flows[1].len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_alternation() {
        let mut model = ReferenceModel::new(&PifoConfig::for_testing());
        assert_eq!(model.apply(Request::Push(5)), OperationResult::Pushed);
        assert_eq!(model.apply(Request::Push(300)), OperationResult::Pushed);
        assert_eq!(model.apply(Request::Pop), OperationResult::Value(5));
        assert_eq!(model.state().hot, Flow::One);
        assert_eq!(model.apply(Request::Pop), OperationResult::Value(300));
        assert_eq!(model.apply(Request::Pop), OperationResult::Underflow);
        assert!(model.is_empty());
    }

    #[test]
    fn test_model_fallback() {
        let mut model = ReferenceModel::new(&PifoConfig::for_testing());
        model.apply(Request::Push(9_000));
        assert_eq!(model.apply(Request::Peek), OperationResult::Value(9_000));
        assert_eq!(model.apply(Request::Pop), OperationResult::Value(9_000));
        assert_eq!(model.state().hot, Flow::Zero);
    }

    #[test]
    fn test_model_capacities() {
        let config = PifoConfig::for_testing().with_flow_capacity(2);
        let mut model = ReferenceModel::new(&config);
        model.apply(Request::Push(1));
        model.apply(Request::Push(2));
        assert_eq!(model.apply(Request::Push(3)), OperationResult::Overflow);

        model.apply(Request::Push(301));
        model.apply(Request::Push(302));
        assert_eq!(model.apply(Request::Push(303)), OperationResult::Overflow);
        assert_eq!(model.len(), 4);
    }
}
