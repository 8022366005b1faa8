pub mod config;

use std::{fmt, str::FromStr};

use crate::{
    core::{Job, JobId, Priority, Ticks},
    error::SchedError,
};
pub use config::{DEFAULT_QUANTUM, SchedulerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Fcfs,
    Sjf,
    Psjf,
    Pri,
    Ppri,
    Rr,
}

/// Where a job demoted from the CPU goes back into the ready queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requeue {
    // Placed by its ordering key
    Ordered,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    Time(Ticks),
    Priority(Priority),
}

// Smaller is better; derived Ord compares rank first, then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey {
    pub rank: Rank,
    pub id: JobId,
}

impl Scheme {
    pub const ALL: [Scheme; 6] = [
        Scheme::Fcfs,
        Scheme::Sjf,
        Scheme::Psjf,
        Scheme::Pri,
        Scheme::Ppri,
        Scheme::Rr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Psjf => "PSJF",
            Self::Pri => "PRI",
            Self::Ppri => "PPRI",
            Self::Rr => "RR",
        }
    }

    /// Ordering key of `job` under this scheme. Only meaningful for the
    /// ordered schemes; RR keeps arrival order in a FIFO instead.
    pub fn order_key(self, job: &Job) -> OrderKey {
        let rank = match self {
            Self::Fcfs | Self::Rr => Rank::Time(job.arrival_time),
            Self::Sjf => Rank::Time(job.service_time),
            Self::Psjf => Rank::Time(job.remaining),
            Self::Pri | Self::Ppri => Rank::Priority(job.priority),
        };
        OrderKey { rank, id: job.id }
    }

    pub fn preempts_on_arrival(self) -> bool {
        matches!(self, Self::Psjf | Self::Ppri)
    }

    pub fn uses_quantum(self) -> bool {
        self == Self::Rr
    }

    pub fn requeue(self) -> Requeue {
        match self {
            Self::Rr => Requeue::Back,
            _ => Requeue::Ordered,
        }
    }

    // An arriving job takes the CPU only if its rank strictly beats the
    // running job's current rank; equal ranks never preempt.
    pub fn should_preempt(self, arriving: &Job, running: &Job) -> bool {
        self.preempts_on_arrival()
            && self.order_key(arriving).rank < self.order_key(running).rank
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Scheme {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchedError::InvalidScheme(s.to_string()))
    }
}

// Numeric codes 0..=5 in declaration order
impl TryFrom<i32> for Scheme {
    type Error = SchedError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| SchedError::InvalidScheme(code.to_string()))
    }
}
