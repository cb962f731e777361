use crate::domain::model::{EntryOrder, ExperimentEntry, FailurePolicy, InvocationOutcome};
use async_trait::async_trait;
use std::path::Path;

/// Where experiments live and how each one is laid out on disk.
pub trait ConfigProvider: Send + Sync {
    fn executable(&self) -> &Path;
    fn experiments_dir(&self) -> &Path;
    fn config_file_name(&self) -> &str;
    fn results_file_name(&self) -> &str;
    fn entry_order(&self) -> EntryOrder;
    fn failure_policy(&self) -> FailurePolicy;
}

/// Runs the external program for one entry and waits for it to exit.
///
/// Implementations must not return before the child has exited; the runner
/// relies on this to keep invocations strictly sequential.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, program: &Path, entry: &ExperimentEntry) -> InvocationOutcome;
}
