use crate::config::settings::{RunnerSettings, SettingsOverrides};
use crate::config::toml_config::TomlConfig;
use crate::domain::model::{EntryOrder, FailurePolicy};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "exp-runner")]
#[command(about = "Run an external program once per experiment directory")]
pub struct CliConfig {
    /// Program invoked as `<executable> <config.json> <results.json>`
    #[arg(long, env = "EXP_RUNNER_EXECUTABLE")]
    pub executable: Option<PathBuf>,

    /// Directory whose direct children are the experiments
    #[arg(long, env = "EXP_RUNNER_EXPERIMENTS_DIR")]
    pub experiments_dir: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub order: Option<EntryOrder>,

    #[arg(long, value_enum)]
    pub on_failure: Option<FailurePolicy>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print the invocations without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Merge command line, environment and the optional TOML file.
    pub fn resolve(&self) -> Result<RunnerSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Some(TomlConfig::from_file(path)?)
            }
            None => None,
        };

        let overrides = SettingsOverrides {
            executable: self.executable.clone(),
            experiments_dir: self.experiments_dir.clone(),
            order: self.order,
            on_failure: self.on_failure,
            summary_path: self.summary.clone(),
        };

        RunnerSettings::resolve(overrides, file)
    }
}
