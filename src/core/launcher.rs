//! Child process launcher.
//!
//! Runs the external program directly (no shell) as
//! `<program> <config_path> <results_path>`. The child's stdout is inherited
//! and its stderr is pointed at the runner's stdout, so both streams show up
//! interleaved on one console stream.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::model::{ExperimentEntry, InvocationOutcome};
use crate::domain::ports::Launcher;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    fn command(program: &Path, entry: &ExperimentEntry) -> Command {
        let merged_stderr = Stdio::from(std::io::stdout());

        let mut cmd = Command::new(program);
        cmd.arg(&entry.config_path)
            .arg(&entry.results_path)
            .stdout(Stdio::inherit())
            .stderr(merged_stderr)
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, program: &Path, entry: &ExperimentEntry) -> InvocationOutcome {
        let status = match Self::command(program, entry).spawn() {
            Ok(mut child) => child.wait().await,
            Err(e) => {
                tracing::debug!("spawn of {} failed: {}", program.display(), e);
                return InvocationOutcome::SpawnFailed {
                    message: e.to_string(),
                };
            }
        };

        match status {
            Ok(status) if status.success() => InvocationOutcome::Succeeded,
            Ok(status) => InvocationOutcome::Failed {
                code: status.code(),
            },
            Err(e) => InvocationOutcome::SpawnFailed {
                message: format!("waiting for child failed: {}", e),
            },
        }
    }
}
