//! Report sinks
//!
//! A sink receives a closed [`Report`] together with its [`ReportSummary`] and
//! either displays it ([`ConsoleSink`]) or persists it ([`FileSink`]).
//! Sinks never recompute severities or scores; a failing sink leaves the
//! report untouched and surfaces the error to the caller.

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use serde::Serialize;
use tracing::{info, warn};

use stackpulse_core::config::ReportConfig;
use stackpulse_core::{Report, ReportSummary, Severity};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Destination for a finished report.
pub trait ReportSink {
    fn emit(&self, report: &Report, summary: &ReportSummary) -> Result<(), CliError>;
}

/// Report plus summary, as rendered to the terminal and written to disk.
#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub report: &'a Report,
    pub summary: &'a ReportSummary,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a Report, summary: &'a ReportSummary) -> Self {
        Self { report, summary }
    }
}

fn paint(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Ok => text.green(),
        Severity::Warning => text.yellow(),
        Severity::Error => text.red(),
    }
}

impl Render for ReportView<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let report = self.report;
        let summary = self.summary;

        writeln!(w, "{}", "Stackpulse Health Report".bold())?;
        writeln!(
            w,
            "  Environment: {}  Region: {}  Domain: {}",
            report.environment(),
            report.region(),
            report.domain()
        )?;
        writeln!(
            w,
            "  Run: {}  Time: {}",
            report.run_id(),
            report.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(w)?;

        let width = report
            .results()
            .iter()
            .map(|r| r.component.len())
            .max()
            .unwrap_or(0)
            .max("COMPONENT".len());
        writeln!(
            w,
            "{}",
            format!("{:<width$}  {:<8}  MESSAGE", "COMPONENT", "STATUS").bold()
        )?;
        writeln!(w, "{}", "-".repeat(width + 2 + 8 + 2 + 40))?;
        for result in report.results() {
            // pad before colouring so escape codes do not skew the columns
            let status = format!("{:<8}", result.severity.to_string());
            writeln!(
                w,
                "{:<width$}  {}  {}",
                result.component,
                paint(result.severity, &status),
                result.message
            )?;
        }
        writeln!(w)?;

        writeln!(
            w,
            "Overall: {}",
            paint(summary.verdict, &summary.headline).bold()
        )?;
        writeln!(
            w,
            "Score: {:.1}% ({}/{} checks OK)",
            summary.score,
            summary.counts.ok,
            summary.counts.total()
        )?;
        writeln!(
            w,
            "Checks: {} OK, {} WARNING, {} ERROR",
            summary.counts.ok, summary.counts.warning, summary.counts.error
        )?;

        if !summary.top_issues.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Top issues:".bold())?;
            for issue in &summary.top_issues {
                writeln!(w, "  - {}: {}", issue.component.red(), issue.message)?;
            }
        }

        if !summary.recommendations.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Recommendations:".bold())?;
            for rec in &summary.recommendations {
                writeln!(w, "  - {rec}")?;
            }
        }

        Ok(())
    }
}

/// Renders reports to stdout as a colored table or pretty JSON.
pub struct ConsoleSink {
    writer: OutputWriter,
}

impl ConsoleSink {
    pub fn new(writer: OutputWriter) -> Self {
        Self { writer }
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&self, report: &Report, summary: &ReportSummary) -> Result<(), CliError> {
        self.writer.render(&ReportView::new(report, summary))
    }
}

/// Persists reports as pretty JSON files.
///
/// The default file name is `<prefix>_<environment>_<YYYYmmdd_HHMMSS>.json`
/// inside `output_dir`; an explicit path overrides it.
#[derive(Debug, Clone)]
pub struct FileSink {
    output_dir: PathBuf,
    file_prefix: String,
    explicit: Option<PathBuf>,
}

impl FileSink {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
            explicit: None,
        }
    }

    /// Builds a sink from the `[report]` section; `explicit` wins when set.
    pub fn from_config(config: &ReportConfig, explicit: Option<PathBuf>) -> Self {
        Self::new(&config.output_dir, &config.file_prefix).with_path(explicit)
    }

    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// File the given report will be written to.
    pub fn path_for(&self, report: &Report) -> PathBuf {
        match &self.explicit {
            Some(path) => path.clone(),
            None => self.output_dir.join(format!(
                "{}_{}_{}.json",
                self.file_prefix,
                report.environment(),
                report.timestamp().format("%Y%m%d_%H%M%S")
            )),
        }
    }

    fn write(&self, path: &Path, report: &Report, summary: &ReportSummary) -> Result<(), CliError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(&ReportView::new(report, summary))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl ReportSink for FileSink {
    fn emit(&self, report: &Report, summary: &ReportSummary) -> Result<(), CliError> {
        let path = self.path_for(report);
        match self.write(&path, report, summary) {
            Ok(()) => {
                info!(path = %path.display(), run_id = %report.run_id(), "report saved");
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save report");
                Err(e)
            }
        }
    }
}
