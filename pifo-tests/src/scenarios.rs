//! Reusable test scenarios for PIFO testing.
//!
//! Scenarios define common configurations and request streams that can be
//! composed to create comprehensive tests.

/// Standard PIFO configurations.
pub mod configs {
    use pifo_flow::PifoConfig;

    /// Ten values per flow split at 200.
    pub const STANDARD: PifoConfig<u32> = PifoConfig::for_testing();

    /// Two values per flow, so both capacity levels are hit constantly.
    pub const TINY: PifoConfig<u32> = PifoConfig::new(2, 200);

    /// One value per flow.
    pub const SINGLE_SLOT: PifoConfig<u32> = PifoConfig::new(1, 200);

    /// Large enough that random traffic rarely reaches capacity.
    pub const ROOMY: PifoConfig<u32> = PifoConfig::new(256, 200);

    /// Every configuration above, smallest first.
    pub const ALL: &[PifoConfig<u32>] = &[SINGLE_SLOT, TINY, STANDARD, ROOMY];
}

/// Fixed request streams with known answers.
pub mod streams {
    use pifo_flow::Request;

    /// One value per flow, then three pops.
    ///
    /// Answers `[5, 300]`; the third pop underflows.
    #[must_use]
    pub fn alternation() -> Vec<Request<u32>> {
        vec![
            Request::Push(5),
            Request::Push(300),
            Request::Pop,
            Request::Pop,
            Request::Pop,
        ]
    }

    /// Only flow 1 holds a value while flow 0 is hot.
    ///
    /// The pop falls back to flow 1 and leaves `hot` on flow 0.
    #[must_use]
    pub fn fallback() -> Vec<Request<u32>> {
        vec![Request::Push(9_000), Request::Peek, Request::Pop]
    }

    /// `count` values into each flow, interleaved, then a pop for every one.
    #[must_use]
    pub fn fill_both(count: u32) -> Vec<Request<u32>> {
        let pushes = (0..count).flat_map(|i| [Request::Push(i), Request::Push(1_000 + i)]);
        pushes
            .chain((0..count * 2).map(|_| Request::Pop))
            .collect()
    }

    /// Fills flow 0 past `flow_capacity` while flow 1 stays empty.
    #[must_use]
    pub fn flood_flow0(flow_capacity: u32) -> Vec<Request<u32>> {
        (0..=flow_capacity).map(Request::Push).collect()
    }
}

/// Seeds for reproducible testing.
pub mod seeds {
    /// Standard seeds that have historically found bugs.
    pub const REGRESSION_SEEDS: &[u64] = &[
        42,
        12345,
        0xDEAD_BEEF,
        999,
        7777,
        0x1337,
        0xCAFE_BABE,
        1,
        u64::MAX,
        0,
    ];

    /// Number of random seeds to test in CI.
    pub const CI_SEED_COUNT: u64 = 100;
}
