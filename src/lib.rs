pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::RunnerSettings;

pub use self::core::{launcher::ProcessLauncher, runner::ExperimentRunner};
pub use utils::error::{Result, RunnerError};
