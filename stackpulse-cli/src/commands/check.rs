//! `stackpulse check` command handler

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use stackpulse_core::config::StackpulseConfig;
use stackpulse_core::error::StackpulseError;
use stackpulse_core::{
    Engine, EngineConfig, ExecutionMode, Report, ReportSummary, RunContext, Severity,
};
use stackpulse_probes::{HttpProber, ReqwestProber, SnapshotCloud, default_registry};

use crate::cli::{CheckArgs, OutputFormat};
use crate::commands::cancel_on_ctrl_c;
use crate::error::CliError;
use crate::output::OutputWriter;
use crate::sink::{ConsoleSink, FileSink, ReportSink};

/// Execute the `check` command.
///
/// Runs every probe once, renders the report, optionally saves it, and
/// returns `CliError::Unhealthy` when the verdict is ERROR.
pub async fn execute(
    args: CheckArgs,
    config: &StackpulseConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mode = execution_mode(args.sequential, config);
    let http = Arc::new(ReqwestProber::new()?);

    let cancel = CancellationToken::new();
    let signal = cancel_on_ctrl_c(cancel.clone());
    let outcome = run_once(config, mode, http, &cancel).await;
    signal.abort();
    let report = outcome?;

    let summary = ReportSummary::from_report(&report, config.report.top_issues);
    let console = ConsoleSink::new(*writer);
    let file = (args.save_report || args.output_file.is_some() || config.report.save)
        .then(|| FileSink::from_config(&config.report, args.output_file));
    let mut sinks: Vec<&dyn ReportSink> = vec![&console];
    if let Some(file) = &file {
        sinks.push(file);
    }

    let outcome = publish(&report, &summary, &sinks);
    if let Some(file) = &file {
        let path = file.path_for(&report);
        if writer.format() == OutputFormat::Text && path.exists() {
            println!("\nReport saved to {}", path.display());
        }
    }
    outcome
}

/// Emits the report to every sink and returns the command outcome.
///
/// An ERROR verdict takes precedence over sink failures; otherwise the first
/// sink failure is returned.
pub fn publish(
    report: &Report,
    summary: &ReportSummary,
    sinks: &[&dyn ReportSink],
) -> Result<(), CliError> {
    let mut delivered = Ok(());
    for sink in sinks {
        if let Err(e) = sink.emit(report, summary) {
            warn!(error = %e, run_id = %report.run_id(), "report sink failed");
            if delivered.is_ok() {
                delivered = Err(e);
            }
        }
    }
    verdict_outcome(summary).and(delivered)
}

/// Loads the inventory snapshot, builds the default registry and runs it once.
pub async fn run_once<H: HttpProber>(
    config: &StackpulseConfig,
    mode: ExecutionMode,
    http: Arc<H>,
    cancel: &CancellationToken,
) -> Result<Report, CliError> {
    let ctx = RunContext::from_target(&config.target);
    let cloud = Arc::new(SnapshotCloud::load(&config.target.inventory_path).await?);
    let registry =
        default_registry(&ctx, &config.naming, cloud, http).map_err(StackpulseError::from)?;

    let engine = Engine::new(EngineConfig {
        mode,
        ..EngineConfig::from(&config.engine)
    });
    info!(
        environment = %ctx.environment,
        inventory = %config.target.inventory_path,
        mode = %mode,
        "running health check"
    );

    let report = engine
        .run(&registry, &ctx, cancel)
        .await
        .map_err(StackpulseError::from)?;
    Ok(report)
}

/// `--sequential` forces sequential mode; otherwise the configured mode applies.
pub fn execution_mode(sequential: bool, config: &StackpulseConfig) -> ExecutionMode {
    if sequential {
        ExecutionMode::Sequential
    } else {
        config.engine.mode
    }
}

/// Maps the verdict to the command outcome (ERROR means exit code 4).
pub fn verdict_outcome(summary: &ReportSummary) -> Result<(), CliError> {
    if summary.verdict == Severity::Error {
        return Err(CliError::Unhealthy(format!(
            "{} of {} checks failed",
            summary.counts.error,
            summary.counts.total()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackpulse_core::{CheckResult, ComponentKind, ReportBuilder};

    fn report_of(results: Vec<CheckResult>) -> Report {
        let ctx = RunContext::new("dev", "us-east-1", "app.example.com", "amplify");
        let mut builder = ReportBuilder::new(&ctx);
        for r in results {
            builder.push(r);
        }
        builder.close()
    }

    fn summary_of(results: Vec<CheckResult>) -> ReportSummary {
        ReportSummary::from_report(&report_of(results), 5)
    }

    /// Fails with a broken-pipe write error.
    struct BrokenStdout;

    impl ReportSink for BrokenStdout {
        fn emit(&self, _: &Report, _: &ReportSummary) -> Result<(), CliError> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        emitted: std::sync::atomic::AtomicUsize,
    }

    impl ReportSink for CountingSink {
        fn emit(&self, _: &Report, _: &ReportSummary) -> Result<(), CliError> {
            self.emitted
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_error_verdict_wins_over_sink_failure() {
        let report = report_of(vec![CheckResult::error(
            "alarms",
            ComponentKind::Alarms,
            "1 active alarms: x",
        )]);
        let summary = ReportSummary::from_report(&report, 5);
        let counting = CountingSink::default();

        let err = publish(&report, &summary, &[&BrokenStdout, &counting]).unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert_eq!(
            counting.emitted.load(std::sync::atomic::Ordering::SeqCst),
            1,
            "later sinks still receive the report"
        );
    }

    #[test]
    fn test_sink_failure_on_healthy_run_is_io_error() {
        let report = report_of(vec![CheckResult::ok("network", ComponentKind::Network, "fine")]);
        let summary = ReportSummary::from_report(&report, 5);

        let err = publish(&report, &summary, &[&BrokenStdout]).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_publish_succeeds_when_all_sinks_deliver() {
        let report = report_of(vec![CheckResult::warning(
            "secrets",
            ComponentKind::Secrets,
            "rotation disabled: dev/db",
        )]);
        let summary = ReportSummary::from_report(&report, 5);
        let counting = CountingSink::default();

        assert!(publish(&report, &summary, &[&counting, &counting]).is_ok());
        assert_eq!(counting.emitted.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_sequential_flag_wins() {
        let config = StackpulseConfig::default();
        assert_eq!(execution_mode(true, &config), ExecutionMode::Sequential);
        assert_eq!(execution_mode(false, &config), ExecutionMode::Concurrent);
    }

    #[test]
    fn test_warning_verdict_is_success() {
        let summary = summary_of(vec![CheckResult::warning(
            "secrets",
            ComponentKind::Secrets,
            "rotation disabled: dev/db",
        )]);
        assert!(verdict_outcome(&summary).is_ok());
    }

    #[test]
    fn test_error_verdict_is_unhealthy() {
        let summary = summary_of(vec![
            CheckResult::ok("network", ComponentKind::Network, "fine"),
            CheckResult::error("alarms", ComponentKind::Alarms, "1 active alarms: x"),
        ]);
        let err = verdict_outcome(&summary).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "platform unhealthy: 1 of 2 checks failed");
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(verdict_outcome(&summary_of(Vec::new())).is_ok());
    }
}
