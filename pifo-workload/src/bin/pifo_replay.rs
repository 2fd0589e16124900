//! Replays a seeded request stream against a two-flow PIFO and verifies it.
//!
//! ```bash
//! pifo-replay --seed 42 --operations 10000 --pattern bursty --burst-len 8
//! ```
//!
//! Exits non-zero if verification finds any violation.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use pifo_flow::{Flow, Pifo, PifoConfig, SharedPifo};
use pifo_workload::{Workload, WorkloadPattern, WorkloadStats};

/// Traffic pattern to replay.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Pattern {
    /// Both flows active, mixed requests.
    #[default]
    Balanced,
    /// Only flow 0 pushes.
    Flow0,
    /// Only flow 1 pushes.
    Flow1,
    /// Flows alternate in bursts.
    Bursty,
    /// Push-heavy, near capacity.
    Saturating,
    /// Pop-heavy, near empty.
    Draining,
}

/// Two-flow PIFO replay and verification.
#[derive(Parser, Debug)]
#[command(name = "pifo-replay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Random seed for request generation.
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of requests to replay.
    #[arg(long, default_value = "1000")]
    operations: u64,

    /// Traffic pattern.
    #[arg(long, value_enum, default_value = "balanced")]
    pattern: Pattern,

    /// Pushes per burst for the bursty pattern.
    #[arg(long, default_value = "8")]
    burst_len: u32,

    /// Fraction of non-push requests that are peeks.
    #[arg(long, default_value = "0.2")]
    peek_ratio: f64,

    /// Capacity of each flow's sub-queue.
    #[arg(long, default_value = "10")]
    flow_capacity: usize,

    /// Values at or below this go to flow 0.
    #[arg(long, default_value = "200")]
    boundary: u32,

    /// Drive the PIFO through the mutex-serialized shared handle.
    #[arg(long)]
    shared: bool,

    /// Print the answer of every successful pop and peek to stdout.
    #[arg(long)]
    print_answers: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: Level,
}

impl Args {
    const fn workload_pattern(&self) -> WorkloadPattern {
        match self.pattern {
            Pattern::Balanced => WorkloadPattern::Balanced,
            Pattern::Flow0 => WorkloadPattern::SingleFlow { flow: Flow::Zero },
            Pattern::Flow1 => WorkloadPattern::SingleFlow { flow: Flow::One },
            Pattern::Bursty => WorkloadPattern::Bursty {
                burst_len: self.burst_len,
            },
            Pattern::Saturating => WorkloadPattern::Saturating,
            Pattern::Draining => WorkloadPattern::Draining,
        }
    }
}

fn report(stats: &WorkloadStats, print_answers: bool) {
    eprintln!("Results:");
    eprintln!(
        "  Operations: {} total, {} ok ({} push, {} pop, {} peek)",
        stats.operations_total, stats.operations_ok, stats.pushes_ok, stats.pops_ok, stats.peeks_ok
    );
    eprintln!(
        "  Rejected: {} overflow, {} underflow",
        stats.overflows, stats.underflows
    );
    eprintln!("  Violations: {}", stats.violations.len());
    for violation in &stats.violations {
        eprintln!("    - {violation}");
    }

    if print_answers {
        for answer in &stats.answers {
            println!("{answer}");
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries answers.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !(0.0..=1.0).contains(&args.peek_ratio) {
        return Err(format!("peek ratio {} is outside 0.0..=1.0", args.peek_ratio).into());
    }

    let config = PifoConfig::new(args.flow_capacity, args.boundary);
    let pifo = Pifo::with_fifos(&config)?;

    info!(
        seed = args.seed,
        operations = args.operations,
        pattern = ?args.pattern,
        flow_capacity = config.flow_capacity,
        boundary = config.boundary,
        shared = args.shared,
        "Starting replay"
    );

    let mut workload = Workload::builder()
        .seed(args.seed)
        .operations(args.operations)
        .pattern(args.workload_pattern())
        .peek_ratio(args.peek_ratio)
        .pifo(config)
        .build();

    let stats = if args.shared {
        let mut shared = SharedPifo::new(pifo);
        let stats = workload.run(&mut shared);
        info!(pifo_stats = ?shared.stats(), "PIFO statistics");
        stats
    } else {
        let mut pifo = pifo;
        let stats = workload.run(&mut pifo);
        info!(pifo_stats = ?pifo.stats(), "PIFO statistics");
        stats
    };

    report(&stats, args.print_answers);

    if stats.violations.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        error!(violations = stats.violations.len(), "Verification failed");
        Ok(ExitCode::FAILURE)
    }
}
