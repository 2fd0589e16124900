//! PIFO Workload: verifiable request streams for the two-flow PIFO.
//!
//! Generates deterministic request streams, replays them against a queue,
//! records the full history and verifies it in two ways:
//!
//! 1. **Model checking** - every result and every observed state must match an
//!    independent reference model of the discipline.
//! 2. **Property checking** - length bookkeeping, capacity bounds, FIFO order
//!    within each flow, and `hot` only moving on successful pops, derived from
//!    the history alone.
//!
//! # Example
//!
//! ```rust
//! use pifo_flow::{Pifo, PifoConfig};
//! use pifo_workload::{Workload, WorkloadPattern};
//!
//! let config = PifoConfig::for_testing();
//! let mut pifo = Pifo::with_fifos(&config).unwrap();
//!
//! let mut workload = Workload::builder()
//!     .seed(42)
//!     .operations(500)
//!     .pattern(WorkloadPattern::Bursty { burst_len: 5 })
//!     .pifo(config)
//!     .build();
//!
//! let stats = workload.run(&mut pifo);
//! assert!(stats.violations.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod history;
mod model;
mod operation;
mod verification;
mod workload;

pub mod executor;

pub use executor::QueueExecutor;
pub use history::{History, HistoryStats};
pub use model::ReferenceModel;
pub use operation::{Observation, Operation, OperationResult, Value};
pub use verification::{Verification, Violation};
pub use workload::{Workload, WorkloadBuilder, WorkloadConfig, WorkloadPattern, WorkloadStats};
