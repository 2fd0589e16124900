//! Two-flow PIFO fair queueing.
//!
//! This crate provides a bounded queue that multiplexes two flows of values
//! into one logical queue while seeking a 50/50 service split between them.
//! It includes:
//!
//! - **Sub-queues**: the bounded FIFO contract each flow is stored in, plus a
//!   stock `VecDeque`-backed implementation.
//! - **Flow classification**: a fixed threshold that routes each pushed value to
//!   flow 0 or flow 1.
//! - **PIFO controller**: push/pop/peek with alternation, one-shot fallback to
//!   the sibling flow, and PIFO-level capacity bookkeeping.
//! - **Request dispatch** and a **shared handle** for multi-threaded hosts.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Pifo                             │
//! │                                                          │
//! │  push(v) ──▶ FlowClassifier ──┬──▶ queue0 (flow 0) ──┐   │
//! │                               └──▶ queue1 (flow 1) ──┤   │
//! │                                                      ▼   │
//! │  pop()  ◀── hot pointer picks primary, sibling on empty  │
//! │                                                          │
//! │  length counter: 0 ..= 2 * flow_capacity                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use pifo_flow::{Flow, Pifo, PifoConfig, QueueError};
//!
//! let mut pifo = Pifo::with_fifos(&PifoConfig::for_testing()).unwrap();
//!
//! pifo.push(5).unwrap();   // flow 0 (<= 200)
//! pifo.push(300).unwrap(); // flow 1
//!
//! assert_eq!(pifo.pop(), Ok(5));
//! assert_eq!(pifo.hot(), Flow::One);
//! assert_eq!(pifo.pop(), Ok(300));
//! assert_eq!(pifo.pop(), Err(QueueError::Underflow));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod error;
pub mod pifo;
pub mod request;
pub mod shared;
pub mod sub_queue;

// Re-export main types for convenience.
pub use classifier::{Flow, FlowClassifier};
pub use error::{ConfigError, ConfigResult, QueueError, QueueResult};
pub use pifo::{Pifo, PifoConfig, PifoStats};
pub use request::{Command, Request};
pub use shared::SharedPifo;
pub use sub_queue::{BoundedFifo, SubQueue};
