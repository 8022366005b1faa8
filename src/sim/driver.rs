use super::job::WorkloadJob;
use crate::{
    core::{Engine, SchedEvent, Ticks},
    error::Result,
    scheduler::SchedulerConfig,
    stats::Summary,
};

/// Replays a workload against an [`Engine`], issuing completions, quantum
/// expiries and arrivals in time order.
#[derive(Debug)]
pub struct Sim {
    pub engine: Engine,
    pub jobs: Vec<WorkloadJob>,
    job_cursor: usize,
}

impl Sim {
    pub fn new(mut jobs: Vec<WorkloadJob>, config: &SchedulerConfig) -> Result<Self> {
        jobs.sort_by(|a, b| {
            a.arrival_time
                .cmp(&b.arrival_time)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Self {
            engine: Engine::from_config(config)?,
            jobs,
            job_cursor: 0,
        })
    }

    /// Earliest instant at which the engine must be told something.
    pub fn next_event_time(&self) -> Option<Ticks> {
        let arrival = self.jobs.get(self.job_cursor).map(|job| job.arrival_time);
        let running = self.engine.running();
        let completion = running.and_then(|job| job.projected_completion());
        let quantum = self
            .engine
            .quantum()
            .zip(running.and_then(|job| job.dispatched_at))
            .map(|(q, since)| since + q);

        [arrival, completion, quantum].into_iter().flatten().min()
    }

    // At one instant: completion, then quantum expiry, then arrivals.
    pub fn step(&mut self) -> Result<Vec<SchedEvent>> {
        let Some(now) = self.next_event_time() else {
            return Ok(Vec::new());
        };

        let finishing = self
            .engine
            .running()
            .filter(|job| job.projected_completion() == Some(now))
            .map(|job| job.id);
        if let Some(id) = finishing {
            self.engine.job_finished(id, now)?;
        }

        if let Some(q) = self.engine.quantum() {
            let expired = self
                .engine
                .running()
                .and_then(|job| job.dispatched_at)
                .is_some_and(|since| since + q == now);
            if expired {
                self.engine.quantum_expired(now)?;
            }
        }

        while let Some(job) = self.jobs.get(self.job_cursor) {
            if job.arrival_time != now {
                break;
            }
            self.engine
                .new_job(job.id, job.arrival_time, job.service_time, job.priority)?;
            self.job_cursor += 1;
        }

        Ok(self.engine.drain_events())
    }

    pub fn run_to_completion(&mut self) -> Result<Summary> {
        while self.next_event_time().is_some() {
            self.step()?;
        }
        self.engine.summary()
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.job_cursor == self.jobs.len()
            && self.engine.ledger().iter().all(|job| job.is_finished())
    }
}
