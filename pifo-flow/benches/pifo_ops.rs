//! PIFO request benchmarks.
//!
//! Measures push/pop throughput for balanced traffic, single-flow traffic
//! (every pop takes the fallback path) and the mutex-serialized handle.

#![allow(missing_docs)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pifo_flow::{Pifo, PifoConfig, SharedPifo};

const BOUNDARY: u32 = 200;

/// Traffic mix pushed before draining.
#[derive(Clone, Copy, Debug)]
enum Mix {
    /// Alternating flow 0 and flow 1 values.
    Balanced,
    /// Flow 1 only.
    SingleFlow,
}

impl Mix {
    const fn value(self, i: u32) -> u32 {
        match self {
            Self::Balanced if i % 2 == 0 => i % BOUNDARY,
            Self::Balanced | Self::SingleFlow => (BOUNDARY + 1).saturating_add(i),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::SingleFlow => "single_flow",
        }
    }
}

fn bench_fill_drain(c: &mut Criterion) {
    let capacities = [16_usize, 256, 4096];

    let mut group = c.benchmark_group("pifo_fill_drain");
    group.measurement_time(Duration::from_secs(5));

    for &capacity in &capacities {
        for mix in [Mix::Balanced, Mix::SingleFlow] {
            let config = PifoConfig::new(capacity, BOUNDARY);
            #[allow(clippy::cast_possible_truncation)] // Capacities above are small.
            let count = capacity as u32;
            group.throughput(Throughput::Elements(u64::from(count) * 2));

            group.bench_with_input(
                BenchmarkId::new(mix.name(), capacity),
                &config,
                |b, cfg| {
                    b.iter(|| {
                        let mut pifo = Pifo::with_fifos(cfg).expect("valid config");
                        for i in 0..count {
                            pifo.push(mix.value(i)).expect("push failed");
                        }
                        while let Ok(v) = pifo.pop() {
                            black_box(v);
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_shared_handle(c: &mut Criterion) {
    let config = PifoConfig::new(1024, BOUNDARY);
    let pifo = SharedPifo::new(Pifo::with_fifos(&config).expect("valid config"));

    let mut group = c.benchmark_group("pifo_shared");
    group.throughput(Throughput::Elements(2));
    group.bench_function("push_pop", |b| {
        let mut i = 0_u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            pifo.push(Mix::Balanced.value(i)).expect("push failed");
            black_box(pifo.pop().expect("pop failed"));
        });
    });
    group.finish();
}

criterion_group!(benches, bench_fill_drain, bench_shared_handle);
criterion_main!(benches);
