use crate::core::banner::{finish_banner, start_banner};
use crate::core::discovery::discover_experiments;
use crate::core::{
    ConfigProvider, ExperimentEntry, ExperimentReport, FailurePolicy, InvocationOutcome, Launcher,
    RunSummary,
};
use crate::utils::error::{Result, RunnerError};
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

pub type BannerSink = Box<dyn Write + Send>;

pub struct ExperimentRunner<C: ConfigProvider, L: Launcher> {
    config: C,
    launcher: L,
    out: Mutex<BannerSink>,
}

impl<C: ConfigProvider, L: Launcher> ExperimentRunner<C, L> {
    pub fn new(config: C, launcher: L) -> Self {
        Self::with_output(config, launcher, Box::new(std::io::stdout()))
    }

    /// Banners go to `out` instead of stdout.
    pub fn with_output(config: C, launcher: L, out: BannerSink) -> Self {
        Self {
            config,
            launcher,
            out: Mutex::new(out),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// The entries a run would visit, in visiting order. Nothing is spawned.
    pub async fn plan(&self) -> Result<Vec<ExperimentEntry>> {
        discover_experiments(
            self.config.experiments_dir(),
            self.config.config_file_name(),
            self.config.results_file_name(),
            self.config.entry_order(),
        )
        .await
    }

    /// Run the executable once per entry, one at a time.
    ///
    /// Under the halt policy a failing entry ends the run early; the summary
    /// is still returned with `halted` set. See [`halt_error`].
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        let entries = self.plan().await?;
        let executable = self.config.executable();

        tracing::info!(
            "Running {} experiments from {} with {}",
            entries.len(),
            self.config.experiments_dir().display(),
            executable.display()
        );

        let mut reports = Vec::with_capacity(entries.len());
        let mut halted = false;
        for entry in entries {
            let report = self.run_one(executable, entry).await?;
            let failed = !report.outcome.is_success();

            if failed {
                tracing::warn!(
                    "Experiment {} did not succeed: {:?}",
                    report.entry.name,
                    report.outcome
                );
            }

            reports.push(report);

            if failed && self.config.failure_policy() == FailurePolicy::Halt {
                halted = true;
                break;
            }
        }

        let summary = RunSummary {
            executable: executable.to_path_buf(),
            experiments_dir: self.config.experiments_dir().to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            halted,
            experiments: reports,
        };

        tracing::info!(
            "Run complete: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );

        Ok(summary)
    }

    async fn run_one(&self, executable: &Path, entry: ExperimentEntry) -> Result<ExperimentReport> {
        self.emit(&start_banner(&entry.name))?;
        tracing::debug!(
            "{} {} {}",
            executable.display(),
            entry.config_path.display(),
            entry.results_path.display()
        );

        let started_at = Utc::now();
        let clock = Instant::now();
        let outcome = self.launcher.launch(executable, &entry).await;
        let duration_ms = clock.elapsed().as_millis() as u64;
        let finished_at = Utc::now();

        self.emit(&finish_banner(&entry.name))?;

        Ok(ExperimentReport {
            entry,
            outcome,
            started_at,
            finished_at,
            duration_ms,
        })
    }

    // 子程序共用 stdout，寫完橫幅必須先 flush
    fn emit(&self, text: &str) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// The error that stopped a halted run, or `None` if it ran to the end.
pub fn halt_error(summary: &RunSummary) -> Option<RunnerError> {
    if !summary.halted {
        return None;
    }

    let report = summary.experiments.last()?;
    match &report.outcome {
        InvocationOutcome::SpawnFailed { message } => Some(RunnerError::SpawnError {
            experiment: report.entry.name.clone(),
            program: summary.executable.display().to_string(),
            message: message.clone(),
        }),
        InvocationOutcome::Failed { code } => Some(RunnerError::ExperimentFailed {
            experiment: report.entry.name.clone(),
            code: *code,
        }),
        InvocationOutcome::Succeeded => None,
    }
}

/// Write the run summary as pretty JSON, creating parent directories.
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}
