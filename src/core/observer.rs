use super::{
    queue::ReadyQueue,
    state::{JobKey, JobState, Ledger},
};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ledger: &Ledger, queue: &ReadyQueue, running: Option<JobKey>) {
        self.step += 1;
        if !cfg!(debug_assertions) {
            return;
        }

        if let Some(key) = running {
            let job = ledger.job(key);
            debug_assert_eq!(
                job.state,
                JobState::Running,
                "running slot job {} must be Running",
                job.id
            );
            debug_assert!(
                !queue.contains(key),
                "Running job {} must not appear in the ready queue",
                job.id
            );
            debug_assert!(
                job.dispatched_at.is_some(),
                "Running job {} has no dispatch time",
                job.id
            );
        }

        for key in queue.ordered() {
            let job = ledger.job(key);
            debug_assert_eq!(
                job.state,
                JobState::Waiting,
                "Queued job {} must be Waiting",
                job.id
            );
        }

        let mut waiting = 0;
        for job in ledger.iter() {
            debug_assert!(
                job.remaining <= job.service_time,
                "Job {} remaining {} exceeds demand {}",
                job.id,
                job.remaining,
                job.service_time
            );
            match job.state {
                JobState::Waiting => waiting += 1,
                JobState::Running => debug_assert!(
                    running.is_some_and(|key| ledger.job(key).id == job.id),
                    "Job {} is Running but not in the running slot",
                    job.id
                ),
                JobState::Finished => debug_assert!(
                    job.completion_time
                        .is_some_and(|c| c >= job.arrival_time + job.service_time),
                    "Finished job {} violates causality",
                    job.id
                ),
            }
        }
        debug_assert_eq!(
            waiting,
            queue.len(),
            "Every waiting job must be in the ready queue exactly once"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_observation() {
        let mut ledger = Ledger::new();
        let mut queue = ReadyQueue::new_fifo();
        let mut observer = Observer::new();
        observer.observe(&ledger, &queue, None);

        let key = ledger.create(1, 0, 2, 0).unwrap();
        queue.push(key, crate::scheduler::Scheme::Rr.order_key(ledger.job(key)));
        observer.observe(&ledger, &queue, None);
        assert_eq!(observer.steps(), 2);
    }
}
