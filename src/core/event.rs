use crate::core::{JobId, JobState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    JobArrived {
        job: JobId,
    },
    JobStateChange {
        job: JobId,
        from: JobState,
        to: JobState,
    },
    CpuCurrentChange {
        from: Option<JobId>,
        to: Option<JobId>,
    },
    // CPU left idle with an empty ready queue
    CpuIdle,
}
