use crate::config::toml_config::TomlConfig;
use crate::core::discovery::{DEFAULT_CONFIG_FILE, DEFAULT_RESULTS_FILE};
use crate::core::ConfigProvider;
use crate::domain::model::{EntryOrder, FailurePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_name, validate_path, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fully resolved runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerSettings {
    pub executable: PathBuf,
    pub experiments_dir: PathBuf,
    pub config_file: String,
    pub results_file: String,
    pub order: EntryOrder,
    pub on_failure: FailurePolicy,
    pub summary_path: Option<PathBuf>,
}

/// Settings that may come from any layer; `None` falls through to the next one.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub executable: Option<PathBuf>,
    pub experiments_dir: Option<PathBuf>,
    pub order: Option<EntryOrder>,
    pub on_failure: Option<FailurePolicy>,
    pub summary_path: Option<PathBuf>,
}

impl RunnerSettings {
    pub fn new(executable: impl Into<PathBuf>, experiments_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            experiments_dir: experiments_dir.into(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            results_file: DEFAULT_RESULTS_FILE.to_string(),
            order: EntryOrder::default(),
            on_failure: FailurePolicy::default(),
            summary_path: None,
        }
    }

    /// Overrides win over the TOML file, which wins over built-in defaults.
    pub fn resolve(overrides: SettingsOverrides, file: Option<TomlConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let executable = overrides.executable.or(file.runner.executable);
        let experiments_dir = overrides.experiments_dir.or(file.runner.experiments_dir);

        let settings = Self {
            executable: validate_required_field("runner.executable", &executable)?.clone(),
            experiments_dir: validate_required_field("runner.experiments_dir", &experiments_dir)?
                .clone(),
            config_file: file
                .layout
                .config_file
                .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
            results_file: file
                .layout
                .results_file
                .unwrap_or_else(|| DEFAULT_RESULTS_FILE.to_string()),
            order: overrides.order.or(file.execution.order).unwrap_or_default(),
            on_failure: overrides
                .on_failure
                .or(file.execution.on_failure)
                .unwrap_or_default(),
            summary_path: overrides.summary_path.or(file.report.summary_path),
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl ConfigProvider for RunnerSettings {
    fn executable(&self) -> &Path {
        &self.executable
    }

    fn experiments_dir(&self) -> &Path {
        &self.experiments_dir
    }

    fn config_file_name(&self) -> &str {
        &self.config_file
    }

    fn results_file_name(&self) -> &str {
        &self.results_file
    }

    fn entry_order(&self) -> EntryOrder {
        self.order
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.on_failure
    }
}

impl Validate for RunnerSettings {
    fn validate(&self) -> Result<()> {
        // 執行檔是否存在不在此檢查，交由啟動時回報
        validate_path("runner.executable", &self.executable)?;
        validate_path("runner.experiments_dir", &self.experiments_dir)?;
        validate_file_name("layout.config_file", &self.config_file)?;
        validate_file_name("layout.results_file", &self.results_file)?;
        if let Some(summary) = &self.summary_path {
            validate_path("report.summary_path", summary)?;
        }
        Ok(())
    }
}
