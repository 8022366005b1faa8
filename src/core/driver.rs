use std::fmt;

use tracing::{debug, trace, warn};

use super::{
    event::SchedEvent,
    observer::Observer,
    queue::ReadyQueue,
    state::{Job, JobId, JobKey, JobState, Ledger, Priority, Ticks},
};
use crate::{
    error::{Result, SchedError},
    scheduler::{Requeue, SchedulerConfig, Scheme},
    stats::{self, Summary},
};

/// Single-CPU scheduling engine. The caller drives the clock forward and
/// reports arrivals, completions and quantum expiries; every event returns the
/// job that should occupy the CPU afterwards.
#[derive(Debug)]
pub struct Engine {
    scheme: Scheme,
    quantum: Option<Ticks>,
    clock: Ticks,
    ledger: Ledger,
    queue: ReadyQueue,
    running: Option<JobKey>,
    events: Vec<SchedEvent>,
    observer: Observer,
}

impl Engine {
    pub fn start_up(scheme: Scheme, quantum: Option<Ticks>) -> Result<Self> {
        if scheme.uses_quantum() && !quantum.is_some_and(|q| q > 0) {
            return Err(SchedError::InvalidQuantum(quantum));
        }
        let quantum = quantum.filter(|_| scheme.uses_quantum());

        debug!(event = "sched.start_up", %scheme, ?quantum, "Engine started");
        Ok(Self {
            scheme,
            quantum,
            clock: 0,
            ledger: Ledger::new(),
            queue: ReadyQueue::for_scheme(scheme),
            running: None,
            events: Vec::new(),
            observer: Observer::new(),
        })
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        Self::start_up(config.scheme, config.quantum)
    }

    pub fn new_job(
        &mut self,
        id: JobId,
        arrival_time: Ticks,
        service_time: Ticks,
        priority: Priority,
    ) -> Result<Option<JobId>> {
        self.check_clock(arrival_time)?;
        if self.scheme.preempts_on_arrival() {
            self.check_not_overdue(arrival_time)?;
        }
        let key = self
            .ledger
            .create(id, arrival_time, service_time, priority)?;
        let before = self.running_id();
        self.clock = arrival_time;
        self.events.push(SchedEvent::JobArrived { job: id });
        trace!(
            event = "sched.job.arrive",
            job = id,
            arrival_time,
            service_time,
            priority,
            "Job arrived"
        );

        match self.running {
            Some(current) if self.scheme.preempts_on_arrival() => {
                self.ledger.charge(current, self.clock);
                if self
                    .scheme
                    .should_preempt(self.ledger.job(key), self.ledger.job(current))
                {
                    debug!(
                        event = "sched.job.preempt",
                        job = self.ledger.job(current).id,
                        by = id,
                        now = self.clock,
                        "Arrival preempts running job"
                    );
                    self.demote(current);
                    self.dispatch(key);
                } else {
                    self.enqueue(key);
                }
            }
            Some(_) => self.enqueue(key),
            None => {
                self.enqueue(key);
                self.dispatch_next();
            }
        }

        Ok(self.settle(before))
    }

    pub fn job_finished(&mut self, id: JobId, current_time: Ticks) -> Result<Option<JobId>> {
        self.check_clock(current_time)?;
        let current = match self.running {
            Some(key) if self.ledger.job(key).id == id => key,
            _ if self.ledger.get(id).is_some_and(Job::is_finished) => {
                return Err(SchedError::AlreadyFinished(id));
            }
            _ => {
                return Err(SchedError::NotRunning {
                    job: id,
                    running: self.running_id(),
                });
            }
        };

        let job = self.ledger.job(current);
        let elapsed = job
            .dispatched_at
            .map_or(0, |since| current_time.saturating_sub(since));
        if elapsed < job.remaining {
            return Err(SchedError::PrematureFinish {
                job: id,
                now: current_time,
                remaining: job.remaining - elapsed,
            });
        }
        if elapsed > job.remaining {
            warn!(
                event = "sched.job.overrun",
                job = id,
                now = current_time,
                overrun = elapsed - job.remaining,
                "Job reported finished after its demand was met"
            );
        }

        let before = self.running_id();
        self.clock = current_time;
        self.finish(current)?;
        self.dispatch_next();
        Ok(self.settle(before))
    }

    pub fn quantum_expired(&mut self, current_time: Ticks) -> Result<Option<JobId>> {
        self.check_clock(current_time)?;
        let before = self.running_id();
        self.clock = current_time;

        if !self.scheme.uses_quantum() {
            trace!(event = "sched.quantum.ignored", now = self.clock, scheme = %self.scheme);
            return Ok(self.settle(before));
        }

        if let Some(current) = self.running {
            let elapsed = self.ledger.charge(current, self.clock);
            trace!(
                event = "sched.quantum.expire",
                job = self.ledger.job(current).id,
                elapsed,
                remaining = self.ledger.job(current).remaining,
                "Quantum expired"
            );
            if self.ledger.job(current).remaining == 0 {
                self.finish(current)?;
            } else {
                self.demote(current);
            }
            self.dispatch_next();
        }

        Ok(self.settle(before))
    }

    pub fn average_waiting_time(&self) -> Result<f64> {
        stats::mean_of(self.ledger.finished_jobs(), Job::waiting_time)
    }

    pub fn average_turnaround_time(&self) -> Result<f64> {
        stats::mean_of(self.ledger.finished_jobs(), Job::turnaround_time)
    }

    pub fn average_response_time(&self) -> Result<f64> {
        stats::mean_of(self.ledger.finished_jobs(), Job::response_time)
    }

    pub fn summary(&self) -> Result<Summary> {
        Summary::from_ledger(&self.ledger)
    }

    /// Ready-queue job ids in dispatch order. The running job is not listed.
    pub fn show_queue(&self) -> Vec<JobId> {
        self.queue
            .ordered()
            .into_iter()
            .map(|key| self.ledger.job(key).id)
            .collect()
    }

    pub fn queue_snapshot(&self) -> QueueSnapshot {
        let mut entries: Vec<(JobId, bool)> =
            self.show_queue().into_iter().map(|id| (id, false)).collect();

        if let Some(current) = self.running {
            let job = self.ledger.job(current);
            let at = match self.scheme.requeue() {
                Requeue::Back => 0,
                Requeue::Ordered => {
                    let key = self.scheme.order_key(job);
                    entries
                        .iter()
                        .position(|&(id, _)| {
                            self.ledger
                                .get(id)
                                .is_some_and(|other| key < self.scheme.order_key(other))
                        })
                        .unwrap_or(entries.len())
                }
            };
            entries.insert(at, (job.id, true));
        }

        QueueSnapshot { entries }
    }

    pub fn clean_up(self) -> Option<Summary> {
        let summary = self.summary().ok();
        debug!(
            event = "sched.clean_up",
            jobs = self.ledger.len(),
            steps = self.observer.steps(),
            "Engine released"
        );
        summary
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn quantum(&self) -> Option<Ticks> {
        self.quantum
    }

    pub fn clock(&self) -> Ticks {
        self.clock
    }

    pub fn running(&self) -> Option<&Job> {
        self.running.map(|key| self.ledger.job(key))
    }

    pub fn running_id(&self) -> Option<JobId> {
        self.running().map(|job| job.id)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.ledger.get(id)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn drain_events(&mut self) -> Vec<SchedEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_clock(&self, now: Ticks) -> Result<()> {
        if now < self.clock {
            return Err(SchedError::ClockRegression {
                now,
                clock: self.clock,
            });
        }
        Ok(())
    }

    // Charging a running job past its demand would leave it with no work
    // left while still competing for the CPU.
    fn check_not_overdue(&self, now: Ticks) -> Result<()> {
        let Some(job) = self.running() else {
            return Ok(());
        };
        match job.projected_completion() {
            Some(due) if due <= now => {
                warn!(
                    event = "sched.job.overdue",
                    job = job.id,
                    due,
                    now,
                    "Arrival reported before the running job's completion"
                );
                Err(SchedError::OverdueJob {
                    job: job.id,
                    due,
                    now,
                })
            }
            _ => Ok(()),
        }
    }

    fn enqueue(&mut self, key: JobKey) {
        let order = self.scheme.order_key(self.ledger.job(key));
        self.queue.push(key, order);
    }

    fn dispatch(&mut self, key: JobKey) {
        debug_assert!(self.running.is_none(), "CPU already running a job");
        self.ledger.mark_running(key, self.clock);
        let first = self.ledger.record_start(key, self.clock);
        self.running = Some(key);

        let id = self.ledger.job(key).id;
        self.events.push(SchedEvent::JobStateChange {
            job: id,
            from: JobState::Waiting,
            to: JobState::Running,
        });
        trace!(event = "sched.job.dispatch", job = id, now = self.clock, first);
    }

    fn dispatch_next(&mut self) {
        if self.running.is_some() {
            return;
        }
        if self.queue.is_empty() {
            trace!(event = "sched.cpu.idle", now = self.clock);
            return;
        }
        if let Some(key) = self.queue.pop() {
            self.dispatch(key);
        }
    }

    // Running job goes back to the ready queue; caller has already charged it.
    fn demote(&mut self, key: JobKey) {
        self.running = None;
        self.ledger.mark_waiting(key);
        self.enqueue(key);
        self.events.push(SchedEvent::JobStateChange {
            job: self.ledger.job(key).id,
            from: JobState::Running,
            to: JobState::Waiting,
        });
    }

    fn finish(&mut self, key: JobKey) -> Result<()> {
        self.ledger.charge(key, self.clock);
        self.ledger.record_finish(key, self.clock)?;
        self.running = None;

        let id = self.ledger.job(key).id;
        self.events.push(SchedEvent::JobStateChange {
            job: id,
            from: JobState::Running,
            to: JobState::Finished,
        });
        debug!(event = "sched.job.finish", job = id, now = self.clock, "Job finished");
        Ok(())
    }

    // Record the CPU transition for this event and check invariants.
    fn settle(&mut self, before: Option<JobId>) -> Option<JobId> {
        let after = self.running_id();
        if before != after {
            self.events.push(SchedEvent::CpuCurrentChange {
                from: before,
                to: after,
            });
            if after.is_none() {
                self.events.push(SchedEvent::CpuIdle);
            }
        }
        self.observer
            .observe(&self.ledger, &self.queue, self.running);
        after
    }
}

/// Diagnostic view of the queue with the running job placed where the
/// ordering puts it. Renders as `4(0) 2(-1) 1(-1)`: core `0` for the running
/// job, `-1` for waiting ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub entries: Vec<(JobId, bool)>,
}

impl fmt::Display for QueueSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &(id, running)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{id}({})", if running { 0 } else { -1 })?;
        }
        Ok(())
    }
}
