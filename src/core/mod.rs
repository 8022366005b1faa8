pub mod driver;
pub mod event;
pub mod observer;
pub mod queue;
pub mod state;

pub use driver::{Engine, QueueSnapshot};
pub use event::SchedEvent;
pub use queue::{QueueKey, ReadyQueue};
pub use state::{Job, JobId, JobKey, JobState, Ledger, Priority, Ticks};
