use std::path::PathBuf;
use thiserror::Error;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cannot list experiments directory {}: {source}", .path.display())]
    ExperimentsDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch {program} for experiment {experiment}: {message}")]
    SpawnError {
        experiment: String,
        program: String,
        message: String,
    },

    #[error("Experiment {experiment} failed: {}", describe_exit(.code))]
    ExperimentFailed {
        experiment: String,
        code: Option<i32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Environment,
    Invocation,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RunnerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RunnerError::ConfigParseError { .. }
            | RunnerError::MissingConfigError { .. }
            | RunnerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RunnerError::ExperimentsDirError { .. } => ErrorCategory::Environment,
            RunnerError::SpawnError { .. } | RunnerError::ExperimentFailed { .. } => {
                ErrorCategory::Invocation
            }
            RunnerError::IoError(_) | RunnerError::SerializationError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Invocation => ErrorSeverity::Medium,
            ErrorCategory::Environment | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the binary.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RunnerError::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
            RunnerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            RunnerError::ConfigParseError { .. } => "The configuration file could not be parsed".to_string(),
            RunnerError::ExperimentsDirError { path, .. } => {
                format!("Experiments directory {} is missing or unreadable", path.display())
            }
            RunnerError::SpawnError {
                experiment,
                program,
                ..
            } => format!("Could not start {} for experiment {}", program, experiment),
            RunnerError::ExperimentFailed { experiment, code } => format!(
                "Experiment {} exited unsuccessfully ({})",
                experiment,
                describe_exit(code)
            ),
            RunnerError::IoError(e) => format!("File system error: {}", e),
            RunnerError::SerializationError(e) => format!("Could not write run summary: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RunnerError::MissingConfigError { .. } => {
                "Pass the setting on the command line, via its environment variable, or in the TOML config"
            }
            RunnerError::InvalidConfigValueError { .. } | RunnerError::ConfigParseError { .. } => {
                "Check the configuration values and TOML syntax"
            }
            RunnerError::ExperimentsDirError { .. } => {
                "Check that --experiments-dir points to an existing, readable directory"
            }
            RunnerError::SpawnError { .. } => {
                "Check that --executable exists and has execute permission"
            }
            RunnerError::ExperimentFailed { .. } => {
                "Inspect the experiment output above, or use --on-failure continue to run the remaining experiments"
            }
            RunnerError::IoError(_) | RunnerError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
