//! `stackpulse watch` command handler
//!
//! Re-runs the health check every interval and redraws the report. Ctrl-C
//! cancels the in-flight run, its partial report is dropped, and the command
//! exits successfully.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use stackpulse_core::config::StackpulseConfig;
use stackpulse_core::error::{EngineError, StackpulseError};
use stackpulse_core::{ExecutionMode, ReportSummary};
use stackpulse_probes::{HttpProber, ReqwestProber};

use crate::cli::{OutputFormat, WatchArgs};
use crate::commands::cancel_on_ctrl_c;
use crate::commands::check::{execution_mode, run_once};
use crate::error::CliError;
use crate::metrics_server::install_metrics_recorder;
use crate::output::OutputWriter;
use crate::sink::{ConsoleSink, FileSink, ReportSink};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Execute the `watch` command.
pub async fn execute(
    args: WatchArgs,
    config: &StackpulseConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let interval = Duration::from_secs(args.interval.unwrap_or(config.watch.refresh_secs));
    if interval.is_zero() {
        return Err(CliError::Config(
            "watch interval must be greater than 0".to_owned(),
        ));
    }

    if args.metrics || config.metrics.enabled {
        install_metrics_recorder(&config.metrics).map_err(|e| CliError::Command(e.to_string()))?;
    }

    let http = Arc::new(ReqwestProber::new()?);
    let console = ConsoleSink::new(*writer);
    let file = config
        .report
        .save
        .then(|| FileSink::from_config(&config.report, None));
    let mut sinks: Vec<&dyn ReportSink> = vec![&console];
    if let Some(file) = &file {
        sinks.push(file);
    }

    let cancel = CancellationToken::new();
    let signal = cancel_on_ctrl_c(cancel.clone());
    let loop_config = WatchLoop {
        mode: execution_mode(args.sequential, config),
        interval,
        clear_screen: writer.format() == OutputFormat::Text,
    };
    let outcome = loop_config.run(config, http, &sinks, &cancel).await;
    signal.abort();

    outcome.map(|refreshes| info!(refreshes, "watch stopped"))
}

/// Refresh loop parameters.
#[derive(Debug, Clone, Copy)]
pub struct WatchLoop {
    pub mode: ExecutionMode,
    pub interval: Duration,
    pub clear_screen: bool,
}

impl WatchLoop {
    /// Runs until `cancel` fires and returns the number of completed refreshes.
    ///
    /// A sink failure is logged and the loop keeps going; any other error ends it.
    pub async fn run<H: HttpProber>(
        &self,
        config: &StackpulseConfig,
        http: Arc<H>,
        sinks: &[&dyn ReportSink],
        cancel: &CancellationToken,
    ) -> Result<u64, CliError> {
        let mut refreshes = 0;

        loop {
            let report = match run_once(config, self.mode, Arc::clone(&http), cancel).await {
                Ok(report) => report,
                Err(CliError::Core(StackpulseError::Engine(EngineError::Cancelled))) => break,
                Err(e) => return Err(e),
            };
            let summary = ReportSummary::from_report(&report, config.report.top_issues);

            if self.clear_screen {
                print!("{CLEAR_SCREEN}");
            }
            for sink in sinks {
                if let Err(e) = sink.emit(&report, &summary) {
                    warn!(error = %e, run_id = %report.run_id(), "report sink failed");
                }
            }
            refreshes += 1;
            if self.clear_screen {
                println!(
                    "\nRefreshing every {}s (run #{refreshes}). Press Ctrl-C to stop.",
                    self.interval.as_secs()
                );
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        Ok(refreshes)
    }
}
