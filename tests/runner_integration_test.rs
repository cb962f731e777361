use async_trait::async_trait;
use exp_runner::core::runner::halt_error;
use exp_runner::core::{EntryOrder, ExperimentEntry, FailurePolicy, InvocationOutcome, Launcher};
use exp_runner::{ExperimentRunner, RunnerError, RunnerSettings};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

/// Records every invocation instead of spawning anything.
#[derive(Clone, Default)]
struct RecordingLauncher {
    calls: Arc<Mutex<Vec<(PathBuf, PathBuf, PathBuf)>>>,
}

impl RecordingLauncher {
    fn calls(&self) -> Vec<(PathBuf, PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch(&self, program: &Path, entry: &ExperimentEntry) -> InvocationOutcome {
        self.calls.lock().unwrap().push((
            program.to_path_buf(),
            entry.config_path.clone(),
            entry.results_path.clone(),
        ));
        InvocationOutcome::Succeeded
    }
}

fn experiments_root(names: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for name in names {
        std::fs::create_dir(temp_dir.path().join(name)).unwrap();
    }
    temp_dir
}

fn quiet_runner<L: Launcher>(settings: RunnerSettings, launcher: L) -> ExperimentRunner<RunnerSettings, L> {
    ExperimentRunner::with_output(settings, launcher, Box::new(std::io::sink()))
}

#[tokio::test]
async fn test_invokes_once_per_entry_with_config_and_results_paths() {
    let root = experiments_root(&["run_b", "run_a"]);
    let launcher = RecordingLauncher::default();
    let settings = RunnerSettings::new("/bin/fake_exp", root.path());

    let runner = quiet_runner(settings, launcher.clone());
    let summary = assert_ok!(runner.run().await);

    let exe = PathBuf::from("/bin/fake_exp");
    let expected = vec![
        (
            exe.clone(),
            root.path().join("run_a").join("config.json"),
            root.path().join("run_a").join("results.json"),
        ),
        (
            exe,
            root.path().join("run_b").join("config.json"),
            root.path().join("run_b").join("results.json"),
        ),
    ];
    assert_eq!(launcher.calls(), expected);
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.failed(), 0);
}

#[tokio::test]
async fn test_plain_files_are_experiments_too() {
    let root = experiments_root(&["run_a"]);
    std::fs::write(root.path().join("README"), b"notes").unwrap();
    let launcher = RecordingLauncher::default();

    let runner = quiet_runner(RunnerSettings::new("/bin/fake_exp", root.path()), launcher.clone());
    assert_ok!(runner.run().await);

    let configs: Vec<PathBuf> = launcher.calls().into_iter().map(|(_, c, _)| c).collect();
    assert_eq!(
        configs,
        vec![
            root.path().join("README").join("config.json"),
            root.path().join("run_a").join("config.json"),
        ]
    );
}

#[tokio::test]
async fn test_listing_order_visits_each_entry_exactly_once() {
    let root = experiments_root(&["e1", "e2", "e3", "e4", "e5"]);
    let launcher = RecordingLauncher::default();
    let mut settings = RunnerSettings::new("/bin/fake_exp", root.path());
    settings.order = EntryOrder::Listing;

    let runner = quiet_runner(settings, launcher.clone());
    assert_ok!(runner.run().await);

    let mut results: Vec<PathBuf> = launcher.calls().into_iter().map(|(_, _, r)| r).collect();
    results.sort();
    let expected: Vec<PathBuf> = ["e1", "e2", "e3", "e4", "e5"]
        .iter()
        .map(|n| root.path().join(n).join("results.json"))
        .collect();
    assert_eq!(results, expected);
}

#[tokio::test]
async fn test_custom_layout_file_names() {
    let root = experiments_root(&["run_a"]);
    let launcher = RecordingLauncher::default();
    let mut settings = RunnerSettings::new("/bin/fake_exp", root.path());
    settings.config_file = "params.json".to_string();
    settings.results_file = "metrics.json".to_string();

    let runner = quiet_runner(settings, launcher.clone());
    assert_ok!(runner.run().await);

    let (_, config, results) = launcher.calls().remove(0);
    assert_eq!(config, root.path().join("run_a").join("params.json"));
    assert_eq!(results, root.path().join("run_a").join("metrics.json"));
}

#[tokio::test]
async fn test_empty_root_runs_nothing() {
    let root = experiments_root(&[]);
    let launcher = RecordingLauncher::default();

    let runner = quiet_runner(RunnerSettings::new("/bin/fake_exp", root.path()), launcher.clone());
    let summary = assert_ok!(runner.run().await);

    assert!(launcher.calls().is_empty());
    assert_eq!(summary.total(), 0);
}

#[tokio::test]
async fn test_missing_root_fails_before_any_invocation() {
    let root = TempDir::new().unwrap();
    let launcher = RecordingLauncher::default();
    let settings = RunnerSettings::new("/bin/fake_exp", root.path().join("missing"));

    let runner = quiet_runner(settings, launcher.clone());
    let err = assert_err!(runner.run().await);

    assert!(matches!(err, RunnerError::ExperimentsDirError { .. }));
    assert!(launcher.calls().is_empty());
}

#[cfg(unix)]
mod process {
    use super::*;
    use exp_runner::ProcessLauncher;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake_exp.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_children_run_strictly_one_after_another() {
        let root = experiments_root(&["a", "b", "c"]);
        let tools = TempDir::new().unwrap();
        let log = tools.path().join("calls.log");
        let script = write_script(
            tools.path(),
            &format!(
                r#"name=$(basename "$(dirname "$1")")
echo "start $name" >> "{log}"
sleep 0.1
echo "end $name" >> "{log}"
echo done > "$2""#,
                log = log.display()
            ),
        );

        let runner = quiet_runner(RunnerSettings::new(&script, root.path()), ProcessLauncher::new());
        let summary = assert_ok!(runner.run().await);

        let lines: Vec<String> = std::fs::read_to_string(&log)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(
            lines,
            vec!["start a", "end a", "start b", "end b", "start c", "end c"]
        );
        assert_eq!(summary.succeeded(), 3);
        for name in ["a", "b", "c"] {
            assert!(root.path().join(name).join("results.json").exists());
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_recorded_and_run_continues() {
        let root = experiments_root(&["bad", "good"]);
        let tools = TempDir::new().unwrap();
        let script = write_script(
            tools.path(),
            r#"case "$1" in */bad/*) echo failing >&2; exit 3;; esac
echo ok > "$2""#,
        );

        let runner = quiet_runner(RunnerSettings::new(&script, root.path()), ProcessLauncher::new());
        let summary = assert_ok!(runner.run().await);

        assert_eq!(summary.failed_names(), vec!["bad"]);
        assert_eq!(
            summary.experiments[0].outcome,
            InvocationOutcome::Failed { code: Some(3) }
        );
        assert!(root.path().join("good").join("results.json").exists());
    }

    #[tokio::test]
    async fn test_missing_executable_halts_when_asked() {
        let root = experiments_root(&["a", "b"]);
        let tools = TempDir::new().unwrap();
        let mut settings = RunnerSettings::new(tools.path().join("no-such-binary"), root.path());
        settings.on_failure = FailurePolicy::Halt;

        let runner = quiet_runner(settings, ProcessLauncher::new());
        let summary = assert_ok!(runner.run().await);

        assert!(summary.halted);
        assert_eq!(summary.total(), 1);
        let err = halt_error(&summary).unwrap();
        assert!(matches!(err, RunnerError::SpawnError { ref experiment, .. } if experiment == "a"));
    }

    #[tokio::test]
    async fn test_missing_executable_continues_by_default() {
        let root = experiments_root(&["a", "b"]);
        let tools = TempDir::new().unwrap();
        let settings = RunnerSettings::new(tools.path().join("no-such-binary"), root.path());

        let runner = quiet_runner(settings, ProcessLauncher::new());
        let summary = assert_ok!(runner.run().await);

        assert_eq!(summary.failed(), 2);
        assert!(summary
            .experiments
            .iter()
            .all(|r| matches!(r.outcome, InvocationOutcome::SpawnFailed { .. })));
    }
}
