use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedError};

// Caller-supplied identifier
pub type JobId = u64;
pub type Ticks = u64;
// Lower value is the better priority
pub type Priority = i32;
new_key_type! {
    pub struct JobKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Waiting,
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub priority: Priority,
    pub state: JobState,
    pub remaining: Ticks,
    // Last time the job was put on (or charged while on) the CPU
    pub dispatched_at: Option<Ticks>,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

impl Job {
    pub fn is_finished(&self) -> bool {
        self.completion_time.is_some()
    }

    /// Time at which the job would complete if left on the CPU.
    pub fn projected_completion(&self) -> Option<Ticks> {
        self.dispatched_at.map(|t| t.saturating_add(self.remaining))
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.completion_time.map(|c| c - self.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<Ticks> {
        self.turnaround_time()
            .map(|t| t.saturating_sub(self.service_time))
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.start_time.map(|s| s - self.arrival_time)
    }
}

/// Every job submitted during a run, finished or not.
#[derive(Debug, Default)]
pub struct Ledger {
    jobs: SlotMap<JobKey, Job>,
    index: FxHashMap<JobId, JobKey>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        id: JobId,
        arrival_time: Ticks,
        service_time: Ticks,
        priority: Priority,
    ) -> Result<JobKey> {
        if self.index.contains_key(&id) {
            return Err(SchedError::DuplicateId(id));
        }
        if service_time == 0 {
            return Err(SchedError::InvalidServiceTime(id));
        }

        let key = self.jobs.insert(Job {
            id,
            arrival_time,
            service_time,
            priority,
            state: JobState::Waiting,
            remaining: service_time,
            dispatched_at: None,
            start_time: None,
            completion_time: None,
        });
        self.index.insert(id, key);
        Ok(key)
    }

    pub fn key_of(&self, id: JobId) -> Option<JobKey> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.key_of(id).map(|key| &self.jobs[key])
    }

    pub fn job(&self, key: JobKey) -> &Job {
        &self.jobs[key]
    }

    pub fn job_mut(&mut self, key: JobKey) -> &mut Job {
        &mut self.jobs[key]
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn finished_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values().filter(|job| job.is_finished())
    }

    // Only the first call has an effect; later dispatches keep the original start.
    pub fn record_start(&mut self, key: JobKey, time: Ticks) -> bool {
        let job = self.job_mut(key);
        if job.start_time.is_some() {
            return false;
        }
        job.start_time = Some(time);
        true
    }

    pub fn record_finish(&mut self, key: JobKey, time: Ticks) -> Result<()> {
        let job = self.job_mut(key);
        if job.is_finished() {
            return Err(SchedError::AlreadyFinished(job.id));
        }
        debug_assert!(
            time >= job.arrival_time + job.service_time,
            "Job {} cannot complete at t={time} before serving {} ticks from t={}",
            job.id,
            job.service_time,
            job.arrival_time
        );

        job.state = JobState::Finished;
        job.remaining = 0;
        job.dispatched_at = None;
        job.completion_time = Some(time);
        Ok(())
    }

    pub fn mark_running(&mut self, key: JobKey, now: Ticks) {
        let job = self.job_mut(key);
        debug_assert_eq!(
            job.state,
            JobState::Waiting,
            "Job {} must be waiting before it is dispatched",
            job.id
        );
        job.state = JobState::Running;
        job.dispatched_at = Some(now);
    }

    pub fn mark_waiting(&mut self, key: JobKey) {
        let job = self.job_mut(key);
        debug_assert!(
            job.state != JobState::Finished,
            "Finished job {} cannot wait again",
            job.id
        );
        job.state = JobState::Waiting;
        job.dispatched_at = None;
    }

    // Bill the running job for time spent on the CPU since its last dispatch.
    // Returns the elapsed ticks.
    pub fn charge(&mut self, key: JobKey, now: Ticks) -> Ticks {
        let job = self.job_mut(key);
        let Some(since) = job.dispatched_at else {
            return 0;
        };
        let elapsed = now.saturating_sub(since);
        job.remaining = job.remaining.saturating_sub(elapsed);
        job.dispatched_at = Some(now);
        elapsed
    }
}
