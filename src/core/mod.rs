pub mod banner;
pub mod discovery;
pub mod launcher;
pub mod runner;

pub use crate::domain::model::{
    EntryOrder, ExperimentEntry, ExperimentReport, FailurePolicy, InvocationOutcome, RunSummary,
};
pub use crate::domain::ports::{ConfigProvider, Launcher};
pub use crate::utils::error::Result;
