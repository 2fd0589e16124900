//! Seeded simulation tests.
//!
//! Random request streams are driven through the property checker one request
//! at a time, and generated workloads are verified against the reference model.
//! Every run is reproducible from its seed.

use pifo_flow::{Flow, Pifo, PifoConfig, Request, SharedPifo};
use pifo_workload::{Workload, WorkloadPattern};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::properties::PropertyChecker;
use crate::scenarios::{configs, seeds, streams};

/// Patterns every seed is run under.
const PATTERNS: &[WorkloadPattern] = &[
    WorkloadPattern::Balanced,
    WorkloadPattern::SingleFlow { flow: Flow::Zero },
    WorkloadPattern::SingleFlow { flow: Flow::One },
    WorkloadPattern::Bursty { burst_len: 3 },
    WorkloadPattern::Saturating,
    WorkloadPattern::Draining,
];

/// Generates requests with a push probability drawn per seed, so some seeds
/// sit near empty and others near full.
fn seeded_stream<R: Rng>(rng: &mut R, count: usize, boundary: u32) -> Vec<Request<u32>> {
    let push_ratio = rng.gen_range(0.2..0.8);
    (0..count)
        .map(|_| {
            if rng.gen_bool(push_ratio) {
                Request::Push(rng.gen_range(0..=boundary.saturating_mul(2)))
            } else if rng.gen_bool(0.25) {
                Request::Peek
            } else {
                Request::Pop
            }
        })
        .collect()
}

fn check_seed(seed: u64, config: &PifoConfig<u32>, count: usize) -> PropertyChecker {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pifo = Pifo::with_fifos(config).unwrap();
    let mut checker = PropertyChecker::new(config);
    checker.run(&mut pifo, &seeded_stream(&mut rng, count, config.boundary));
    assert_eq!(pifo.len(), checker.expected_len(), "seed {seed}");
    checker
}

#[test]
fn test_sim_regression_seeds_all_configs() {
    for &seed in seeds::REGRESSION_SEEDS {
        for config in configs::ALL {
            let checker = check_seed(seed, config, 2_000);
            assert!(
                checker.is_valid(),
                "seed {seed}, config {config:?}: {:?}",
                checker.violations()
            );
        }
    }
}

#[test]
fn test_sim_random_seeds_tiny_config() {
    for seed in 0..seeds::CI_SEED_COUNT {
        let checker = check_seed(seed, &configs::TINY, 500);
        assert!(checker.is_valid(), "seed {seed}: {:?}", checker.violations());
    }
}

#[test]
fn test_sim_workload_patterns_verify_clean() {
    for seed in 0..seeds::CI_SEED_COUNT {
        for &pattern in PATTERNS {
            let config = configs::TINY;
            let mut pifo = Pifo::with_fifos(&config).unwrap();
            let mut workload = Workload::builder()
                .seed(seed)
                .operations(300)
                .pattern(pattern)
                .pifo(config)
                .build();

            let stats = workload.run(&mut pifo);
            assert!(
                stats.violations.is_empty(),
                "seed {seed}, pattern {pattern:?}: {:?}",
                stats.violations
            );
            assert_eq!(
                stats.operations_ok + stats.overflows + stats.underflows,
                stats.operations_total
            );
        }
    }
}

#[test]
fn test_sim_workload_stream_through_checker() {
    for &seed in seeds::REGRESSION_SEEDS {
        let config = configs::STANDARD;
        let requests = Workload::builder()
            .seed(seed)
            .operations(1_000)
            .pattern(WorkloadPattern::Bursty { burst_len: 7 })
            .pifo(config)
            .build()
            .generate();

        let mut pifo = Pifo::with_fifos(&config).unwrap();
        let mut checker = PropertyChecker::new(&config);
        checker.run(&mut pifo, &requests);
        assert!(checker.is_valid(), "seed {seed}: {:?}", checker.violations());
    }
}

#[test]
fn test_sim_shared_and_direct_agree() {
    for &seed in seeds::REGRESSION_SEEDS {
        let config = configs::STANDARD;
        let build = || {
            Workload::builder()
                .seed(seed)
                .operations(1_000)
                .pattern(WorkloadPattern::Saturating)
                .pifo(config)
                .build()
        };

        let mut direct = Pifo::with_fifos(&config).unwrap();
        let mut shared = SharedPifo::new(Pifo::with_fifos(&config).unwrap());
        let direct_stats = build().run(&mut direct);
        let shared_stats = build().run(&mut shared);

        assert!(shared_stats.violations.is_empty(), "seed {seed}");
        assert_eq!(direct_stats.answers, shared_stats.answers);
        assert_eq!(direct.stats(), shared.stats());
    }
}

#[test]
fn test_sim_replay_fixed_streams() {
    let config = configs::STANDARD;

    let mut pifo = Pifo::with_fifos(&config).unwrap();
    let stats = Workload::builder()
        .pifo(config)
        .build()
        .replay(&mut pifo, &streams::alternation());
    assert_eq!(stats.answers, vec![5, 300]);
    assert_eq!(stats.underflows, 1);
    assert!(stats.violations.is_empty());

    let mut pifo = Pifo::with_fifos(&config).unwrap();
    let stats = Workload::builder()
        .pifo(config)
        .build()
        .replay(&mut pifo, &streams::fallback());
    assert_eq!(stats.answers, vec![9_000, 9_000]);
    assert!(stats.violations.is_empty());
}

#[test]
fn test_sim_long_run_counters_balance() {
    let config = configs::ROOMY;
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let mut pifo = Pifo::with_fifos(&config).unwrap();

    for request in seeded_stream(&mut rng, 100_000, config.boundary) {
        let _ = pifo.handle(request);
    }

    let stats = pifo.stats();
    let popped = stats.served(Flow::Zero) + stats.served(Flow::One);
    assert_eq!(popped, stats.total_popped());
    assert_eq!(
        stats.pushes_accepted - popped,
        pifo.len() as u64,
        "{stats:?}"
    );
    assert!(pifo.len() <= pifo.capacity());
}
