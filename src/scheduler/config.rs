use super::Scheme;
use crate::core::Ticks;

/// Quantum used when none is configured.
pub const DEFAULT_QUANTUM: Ticks = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub scheme: Scheme,
    // Only consulted under RR
    pub quantum: Option<Ticks>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Fcfs,
            quantum: Some(DEFAULT_QUANTUM),
        }
    }
}

impl SchedulerConfig {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }

    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.quantum = Some(quantum);
        self
    }

    pub fn without_quantum(mut self) -> Self {
        self.quantum = None;
        self
    }
}
