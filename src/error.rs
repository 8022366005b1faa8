use thiserror::Error;

use crate::core::{JobId, Ticks};

pub type Result<T> = std::result::Result<T, SchedError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedError {
    #[error("job {0} is already known to the ledger")]
    DuplicateId(JobId),
    #[error("job {0} has already finished")]
    AlreadyFinished(JobId),
    #[error("job {job} is not running (running: {running:?})")]
    NotRunning { job: JobId, running: Option<JobId> },
    #[error("event at t={now} precedes the current clock t={clock}")]
    ClockRegression { now: Ticks, clock: Ticks },
    #[error("unrecognized scheduling scheme `{0}`")]
    InvalidScheme(String),
    #[error("round-robin needs a positive quantum, got {0:?}")]
    InvalidQuantum(Option<Ticks>),
    #[error("no jobs have finished")]
    NoFinishedJobs,
    #[error("job {0} requested zero service time")]
    InvalidServiceTime(JobId),
    #[error("running job {job} was due at t={due}, before the event at t={now}")]
    OverdueJob { job: JobId, due: Ticks, now: Ticks },
    #[error("job {job} reported finished at t={now} with {remaining} ticks still to run")]
    PrematureFinish {
        job: JobId,
        now: Ticks,
        remaining: Ticks,
    },
}
