//! Workload generation and execution.
//!
//! Provides deterministic request-stream generation with several traffic
//! patterns, replay against any [`QueueExecutor`], and verification of the
//! recorded history.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use pifo_flow::{Command, Flow, PifoConfig, Request};

use crate::executor::QueueExecutor;
use crate::history::History;
use crate::operation::{OperationResult, Value};
use crate::verification::{Verification, Violation};

/// Traffic pattern to generate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WorkloadPattern {
    /// Both flows equally likely, mixed pushes, pops and peeks.
    #[default]
    Balanced,

    /// Every push goes to one flow; the other stays silent.
    SingleFlow {
        /// The active flow.
        flow: Flow,
    },

    /// Flows take turns being active in bursts.
    Bursty {
        /// Pushes per burst before switching flows.
        burst_len: u32,
    },

    /// Push-heavy traffic that keeps the queue near capacity.
    Saturating,

    /// Pop-heavy traffic that keeps the queue near empty.
    Draining,
}

impl WorkloadPattern {
    /// Returns the probability that a generated request is a push.
    #[must_use]
    pub const fn push_ratio(&self) -> f64 {
        match self {
            Self::Balanced | Self::SingleFlow { .. } | Self::Bursty { .. } => 0.5,
            Self::Saturating => 0.8,
            Self::Draining => 0.25,
        }
    }
}

/// Workload configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadConfig {
    /// Random seed for deterministic generation.
    pub seed: u64,
    /// Number of requests to generate.
    pub operations: u64,
    /// Traffic pattern.
    pub pattern: WorkloadPattern,
    /// Fraction of non-push requests that are peeks.
    pub peek_ratio: f64,
    /// Configuration of the PIFO under test.
    pub pifo: PifoConfig<Value>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            operations: 1000,
            pattern: WorkloadPattern::default(),
            peek_ratio: 0.2,
            pifo: PifoConfig::default(),
        }
    }
}

/// Builder for creating workloads.
#[derive(Debug, Default)]
pub struct WorkloadBuilder {
    config: WorkloadConfig,
}

impl WorkloadBuilder {
    /// Creates a new workload builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Sets the number of requests.
    #[must_use]
    pub const fn operations(mut self, operations: u64) -> Self {
        self.config.operations = operations;
        self
    }

    /// Sets the traffic pattern.
    #[must_use]
    pub const fn pattern(mut self, pattern: WorkloadPattern) -> Self {
        self.config.pattern = pattern;
        self
    }

    /// Sets the fraction of non-push requests that are peeks.
    #[must_use]
    pub const fn peek_ratio(mut self, peek_ratio: f64) -> Self {
        self.config.peek_ratio = peek_ratio;
        self
    }

    /// Sets the configuration of the PIFO under test.
    #[must_use]
    pub const fn pifo(mut self, pifo: PifoConfig<Value>) -> Self {
        self.config.pifo = pifo;
        self
    }

    /// Builds the workload.
    #[must_use]
    pub fn build(self) -> Workload {
        Workload::new(self.config)
    }
}

/// A verifiable workload.
pub struct Workload {
    config: WorkloadConfig,
    rng: ChaCha8Rng,
    history: History,
    pushes_generated: u64,
}

impl Workload {
    /// Creates a new workload from configuration.
    #[must_use]
    pub fn new(config: WorkloadConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            history: History::new(),
            pushes_generated: 0,
        }
    }

    /// Creates a workload builder.
    #[must_use]
    pub fn builder() -> WorkloadBuilder {
        WorkloadBuilder::new()
    }

    /// Returns the workload configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// Returns the history of executed operations.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Generates the full request stream.
    ///
    /// The same seed and configuration always produce the same stream.
    #[must_use]
    pub fn generate(&mut self) -> Vec<Request<Value>> {
        (0..self.config.operations)
            .map(|_| self.next_request())
            .collect()
    }

    /// Runs the workload against an executor and verifies the result.
    pub fn run<E: QueueExecutor>(&mut self, executor: &mut E) -> WorkloadStats {
        let requests = self.generate();
        self.replay(executor, &requests)
    }

    /// Replays a fixed request stream against an executor and verifies it.
    ///
    /// Failed requests are recorded and skipped; they never stop the replay.
    pub fn replay<E: QueueExecutor>(
        &mut self,
        executor: &mut E,
        requests: &[Request<Value>],
    ) -> WorkloadStats {
        let mut stats = WorkloadStats::default();

        for &request in requests {
            let op_id = self.history.record_invoke(request);
            let (response, observed) = executor.execute_observed(request);
            let result = OperationResult::from_response(response);
            self.history.record_complete(op_id, result, observed);

            stats.operations_total += 1;
            match (request.command(), result) {
                (Command::Push, OperationResult::Pushed) => stats.pushes_ok += 1,
                (Command::Pop, OperationResult::Value(_)) => stats.pops_ok += 1,
                (Command::Peek, OperationResult::Value(_)) => stats.peeks_ok += 1,
                (_, OperationResult::Overflow) => stats.overflows += 1,
                (_, OperationResult::Underflow) => stats.underflows += 1,
                (command, result) => {
                    debug!(op_id, ?command, %result, "unexpected result for command");
                }
            }
        }
        stats.operations_ok = stats.pushes_ok + stats.pops_ok + stats.peeks_ok;

        stats.violations = Verification::new(self.config.pifo).verify(&self.history);
        stats.answers = self.history.answers();

        info!(
            seed = self.config.seed,
            operations = stats.operations_total,
            ok = stats.operations_ok,
            overflows = stats.overflows,
            underflows = stats.underflows,
            violations = stats.violations.len(),
            "workload complete"
        );

        stats
    }

    fn next_request(&mut self) -> Request<Value> {
        if self.rng.gen_bool(self.config.pattern.push_ratio()) {
            let flow = self.next_flow();
            let value = self.value_for(flow);
            self.pushes_generated += 1;
            Request::Push(value)
        } else if self.rng.gen_bool(self.config.peek_ratio) {
            Request::Peek
        } else {
            Request::Pop
        }
    }

    fn next_flow(&mut self) -> Flow {
        match self.config.pattern {
            WorkloadPattern::SingleFlow { flow } => flow,
            WorkloadPattern::Bursty { burst_len } => {
                let burst = self.pushes_generated / u64::from(burst_len.max(1));
                if burst % 2 == 0 {
                    Flow::Zero
                } else {
                    Flow::One
                }
            }
            WorkloadPattern::Balanced | WorkloadPattern::Saturating | WorkloadPattern::Draining => {
                if self.rng.gen_bool(0.5) {
                    Flow::Zero
                } else {
                    Flow::One
                }
            }
        }
    }

    fn value_for(&mut self, flow: Flow) -> Value {
        let boundary = self.config.pifo.boundary;
        match flow {
            Flow::Zero => self.rng.gen_range(0..=boundary),
            // A boundary of Value::MAX leaves no room for flow 1.
            Flow::One => match boundary.checked_add(1) {
                Some(low) => self.rng.gen_range(low..=Value::MAX),
                None => boundary,
            },
        }
    }
}

/// Statistics from a workload run.
#[derive(Debug, Clone, Default)]
pub struct WorkloadStats {
    /// Total requests issued.
    pub operations_total: u64,
    /// Requests that succeeded.
    pub operations_ok: u64,
    /// Successful pushes.
    pub pushes_ok: u64,
    /// Successful pops.
    pub pops_ok: u64,
    /// Successful peeks.
    pub peeks_ok: u64,
    /// Pushes rejected with overflow.
    pub overflows: u64,
    /// Pops and peeks rejected with underflow.
    pub underflows: u64,
    /// Answers of successful pops and peeks, in issue order.
    pub answers: Vec<Value>,
    /// Verification violations found.
    pub violations: Vec<Violation>,
}
