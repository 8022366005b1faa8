use rand::prelude::*;

use crate::core::{JobId, Priority, Ticks};

/// A job as the workload describes it, before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadJob {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub priority: Priority,
}

impl WorkloadJob {
    pub fn new(id: JobId, arrival_time: Ticks, service_time: Ticks, priority: Priority) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
            priority,
        }
    }
}

/// At most one arrival per tick, each with probability `p_arrival`. A job is
/// short with probability `p_short`; priorities are uniform in `0..5`.
pub fn bernoulli_jobs(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> Vec<WorkloadJob> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let service_time = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            jobs.push(WorkloadJob {
                id: jobs.len() as JobId,
                arrival_time: t,
                service_time,
                priority: rng.random_range(0..5),
            });
        }
    }

    jobs
}
