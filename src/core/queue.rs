use keyed_priority_queue::KeyedPriorityQueue;
use std::{cmp::Ordering, collections::VecDeque};

use super::state::JobKey;
use crate::scheduler::{OrderKey, Requeue, Scheme};

// KeyedPriorityQueue is a max-heap, so we need to flip-flop OrderKey's Ord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueKey(pub OrderKey);

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}

/// Jobs waiting for the CPU. The front is always the next job to dispatch.
#[derive(Debug)]
pub enum ReadyQueue {
    Fifo {
        jobs: VecDeque<JobKey>,
    },
    Priq {
        jobs: KeyedPriorityQueue<JobKey, QueueKey>,
    },
}

impl ReadyQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            jobs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            jobs: KeyedPriorityQueue::new(),
        }
    }

    pub fn for_scheme(scheme: Scheme) -> Self {
        match scheme.requeue() {
            Requeue::Back => Self::new_fifo(),
            Requeue::Ordered => Self::new_priq(),
        }
    }

    // `key` is ignored by FIFO queues, which always append.
    pub fn push(&mut self, job: JobKey, key: OrderKey) {
        debug_assert!(!self.contains(job), "Job {key:?} already enqueued");
        match self {
            Self::Fifo { jobs } => jobs.push_back(job),
            Self::Priq { jobs } => {
                jobs.push(job, QueueKey(key));
            }
        }
    }

    pub fn pop(&mut self) -> Option<JobKey> {
        match self {
            Self::Fifo { jobs } => jobs.pop_front(),
            Self::Priq { jobs } => jobs.pop().map(|(job, _)| job),
        }
    }

    pub fn contains(&self, job: JobKey) -> bool {
        match self {
            Self::Fifo { jobs } => jobs.contains(&job),
            Self::Priq { jobs } => jobs.get_priority(&job).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { jobs } => jobs.len(),
            Self::Priq { jobs } => jobs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue contents front to back, without disturbing the queue.
    pub fn ordered(&self) -> Vec<JobKey> {
        match self {
            Self::Fifo { jobs } => jobs.iter().copied().collect(),
            Self::Priq { jobs } => {
                let mut entries: Vec<_> = jobs.iter().map(|(job, key)| (*key, *job)).collect();
                // QueueKey is reversed, so descending order puts the best first
                entries.sort_by(|a, b| b.0.cmp(&a.0));
                entries.into_iter().map(|(_, job)| job).collect()
            }
        }
    }
}
