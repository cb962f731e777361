use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

// serde_json rejects non-UTF-8 paths; the summary is for people, so go lossy
fn lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Order in which experiment entries are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum EntryOrder {
    /// Lexicographic by entry name.
    #[default]
    Sorted,
    /// Whatever order the directory listing returns.
    Listing,
}

/// What to do when one experiment fails to start or exits non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next entry.
    #[default]
    Continue,
    /// Stop the run at the first failure.
    Halt,
}

/// One unit of work: a direct child of the experiments root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentEntry {
    pub name: String,
    #[serde(serialize_with = "lossy_path")]
    pub dir: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub config_path: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub results_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Succeeded,
    /// Exited non-zero. `code` is `None` when the child was killed by a signal.
    Failed { code: Option<i32> },
    /// The executable could not be started at all.
    SpawnFailed { message: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub entry: ExperimentEntry,
    pub outcome: InvocationOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub executable: PathBuf,
    pub experiments_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when the halt policy stopped the run at its last report.
    #[serde(default)]
    pub halted: bool,
    pub experiments: Vec<ExperimentReport>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.experiments.len()
    }

    pub fn succeeded(&self) -> usize {
        self.experiments
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.experiments
            .iter()
            .filter(|r| !r.outcome.is_success())
            .map(|r| r.entry.name.as_str())
            .collect()
    }
}
