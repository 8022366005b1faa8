pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;
pub mod stats;

pub use crate::core::{Engine, SchedEvent};
pub use error::{Result, SchedError};
pub use scheduler::{SchedulerConfig, Scheme};
pub use sim::{Sim, WorkloadJob};
pub use stats::Summary;
