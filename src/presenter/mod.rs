//! "Recent purchase" notification presenter

pub mod notifier;
pub mod samples;
pub mod scheduler;

pub use notifier::{Presenter, PresenterStats, PresenterTiming};
pub use samples::{RandomSamples, SAMPLE_RECORDS, SampleRecord, SampleSource};
pub use scheduler::{ManualScheduler, Scheduler, TimerId, TokioScheduler};
