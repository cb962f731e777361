use anyhow::Context;
use clap::Parser;
use exp_runner::core::runner::{halt_error, write_summary};
use exp_runner::utils::logger;
use exp_runner::{CliConfig, ExperimentRunner, ProcessLauncher, RunnerError, RunnerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting exp-runner");
    tracing::debug!("CLI config: {:?}", cli);

    // 合併並驗證配置
    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => exit_with(e),
    };

    tracing::info!(
        "🔧 executable={} experiments_dir={} order={:?} on_failure={:?}",
        settings.executable.display(),
        settings.experiments_dir.display(),
        settings.order,
        settings.on_failure
    );

    let summary_path = settings.summary_path.clone();
    let runner = ExperimentRunner::new(settings, ProcessLauncher::new());

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No experiments will be started");
        perform_dry_run(&runner).await;
        return Ok(());
    }

    let summary = match runner.run().await {
        Ok(summary) => summary,
        Err(e) => exit_with(e),
    };

    if summary.failed() > 0 {
        tracing::warn!(
            "⚠️ {} of {} experiments failed: {}",
            summary.failed(),
            summary.total(),
            summary.failed_names().join(", ")
        );
    } else {
        tracing::info!("✅ All {} experiments finished", summary.total());
    }

    // 中止的執行也先寫出部分摘要
    if let Some(path) = summary_path {
        write_summary(&summary, &path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        tracing::info!("📁 Summary saved to: {}", path.display());
    }

    if let Some(e) = halt_error(&summary) {
        exit_with(e);
    }

    Ok(())
}

async fn perform_dry_run(runner: &ExperimentRunner<RunnerSettings, ProcessLauncher>) {
    let entries = match runner.plan().await {
        Ok(entries) => entries,
        Err(e) => exit_with(e),
    };

    let executable = runner.config().executable.display().to_string();
    for entry in &entries {
        println!(
            "{} {} {}",
            executable,
            entry.config_path.display(),
            entry.results_path.display()
        );
    }
    tracing::info!("{} experiments would run", entries.len());
}

fn exit_with(e: RunnerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
