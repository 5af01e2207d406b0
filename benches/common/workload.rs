//! Event-stream generators for distribution benchmarks.
//!
//! Streams are seeded so every run counts the same events.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, Zipf};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random events in `[0, universe)`.
    Uniform,
    /// Sequential scan in `[0, universe)`; every event gets the same count.
    Scan,
    /// Zipf-distributed events, the shape of term frequencies in text.
    /// `exponent` controls skew: 1.0 is classic Zipf.
    Zipfian { exponent: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u32,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    /// Materializes `len` integer events.
    pub fn int_events(self, len: usize) -> Vec<i32> {
        let universe = self.universe.max(1);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        match self.workload {
            Workload::Uniform => (0..len)
                .map(|_| (rng.random::<u32>() % universe) as i32)
                .collect(),
            Workload::Scan => (0..len).map(|i| (i as u32 % universe) as i32).collect(),
            Workload::Zipfian { exponent } => {
                let zipf = Zipf::new(f64::from(universe), exponent).unwrap();
                (0..len)
                    .map(|_| zipf.sample(&mut rng) as i32 - 1)
                    .collect()
            },
        }
    }

    /// Materializes `len` string events ("term-<id>").
    pub fn term_events(self, len: usize) -> Vec<String> {
        self.int_events(len)
            .into_iter()
            .map(|id| format!("term-{id}"))
            .collect()
    }
}

/// The standard set of workloads every benchmark runs.
pub fn standard_workloads(universe: u32) -> Vec<(&'static str, WorkloadSpec)> {
    [
        ("uniform", Workload::Uniform),
        ("scan", Workload::Scan),
        ("zipfian_1.0", Workload::Zipfian { exponent: 1.0 }),
    ]
    .into_iter()
    .map(|(name, workload)| {
        (
            name,
            WorkloadSpec {
                universe,
                workload,
                seed: 42,
            },
        )
    })
    .collect()
}
