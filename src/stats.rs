//! Classical per-run metrics, averaged over finished jobs only.

use std::fmt;

use average::{Estimate, Mean};

use crate::{
    core::{Job, Ledger, Ticks},
    error::{Result, SchedError},
};

/// Mean of `metric` over `jobs`, skipping jobs for which it is undefined.
pub fn mean_of<'a>(
    jobs: impl Iterator<Item = &'a Job>,
    metric: impl Fn(&Job) -> Option<Ticks>,
) -> Result<f64> {
    let mean: Mean = jobs.filter_map(|job| metric(job)).map(|t| t as f64).collect();
    if mean.is_empty() {
        return Err(SchedError::NoFinishedJobs);
    }
    Ok(mean.estimate())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub jobs: usize,
    pub average_waiting: f64,
    pub average_turnaround: f64,
    pub average_response: f64,
}

impl Summary {
    pub fn from_ledger(ledger: &Ledger) -> Result<Self> {
        Ok(Self {
            jobs: ledger.finished_jobs().count(),
            average_waiting: mean_of(ledger.finished_jobs(), Job::waiting_time)?,
            average_turnaround: mean_of(ledger.finished_jobs(), Job::turnaround_time)?,
            average_response: mean_of(ledger.finished_jobs(), Job::response_time)?,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} jobs, waiting {:.2}, turnaround {:.2}, response {:.2}",
            self.jobs, self.average_waiting, self.average_turnaround, self.average_response
        )
    }
}
