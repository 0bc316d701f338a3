//! Run outcome rendering

use console::{style, Term};
use newsorder::RunReport;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Output format for the run outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

/// Machine-readable run outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunSummary {
    /// The listing is sorted
    Passed {
        /// Run details
        report: RunReport,
    },
    /// The run aborted
    Failed {
        /// Contract that was violated
        kind: String,
        /// Diagnostic
        error: String,
    },
}

impl RunSummary {
    /// Summarize a finished run
    #[must_use]
    pub fn from_outcome(outcome: &CliResult<RunReport>) -> Self {
        match outcome {
            Ok(report) => Self::Passed {
                report: report.clone(),
            },
            Err(err) => Self::Failed {
                kind: err.kind().to_string(),
                error: err.to_string(),
            },
        }
    }
}

/// Prints the run outcome
#[derive(Debug)]
pub struct Reporter {
    stdout: Term,
    format: OutputFormat,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            stdout: Term::stdout(),
            format,
            use_color,
            quiet,
        }
    }

    /// Print the outcome; failures are left to the caller's stderr diagnostic
    /// in text mode
    pub fn finish(&self, outcome: &CliResult<RunReport>) -> CliResult<()> {
        match self.format {
            OutputFormat::Json => {
                let json = render_json(&RunSummary::from_outcome(outcome))?;
                self.stdout.write_line(&json)?;
            }
            OutputFormat::Text => {
                if let Ok(report) = outcome {
                    if !self.quiet {
                        self.stdout.write_line(&self.render_text(report))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// One-line human summary of a passed run
    #[must_use]
    pub fn render_text(&self, report: &RunReport) -> String {
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };
        let span = match (report.ordering.newest, report.ordering.oldest) {
            (Some(newest), Some(oldest)) => format!(", {newest} down to {oldest}"),
            _ => String::new(),
        };
        format!(
            "{prefix} /{} sorted newest-first: checked {} of {} timestamps over {} pages{span}",
            report.sort, report.ordering.checked, report.collected, report.pages
        )
    }
}

/// Pretty-printed JSON for a summary
pub fn render_json(summary: &RunSummary) -> CliResult<String> {
    serde_json::to_string_pretty(summary).map_err(CliError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use newsorder::{CheckError, OrderingReport, SortBy, Timestamp};

    fn report() -> RunReport {
        RunReport {
            sort: SortBy::New,
            pages: 4,
            collected: 120,
            ordering: OrderingReport {
                checked: 100,
                newest: Some(Timestamp::from_secs(1_760_723_583)),
                oldest: Some(Timestamp::from_secs(1_760_700_000)),
            },
        }
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_plain_summary() {
            let reporter = Reporter::new(OutputFormat::Text, false, false);
            let line = reporter.render_text(&report());
            assert!(line.starts_with("PASS /newest"));
            assert!(line.contains("checked 100 of 120 timestamps over 4 pages"));
            assert!(line.contains("1760723583 down to 1760700000"));
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn test_passed_summary() {
            let json = render_json(&RunSummary::from_outcome(&Ok(report()))).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["status"], "passed");
            assert_eq!(value["report"]["sort"], "new");
            assert_eq!(value["report"]["collected"], 120);
            assert_eq!(value["report"]["ordering"]["newest"], 1_760_723_583_u64);
        }

        #[test]
        fn test_failed_summary() {
            let outcome: CliResult<RunReport> = Err(CheckError::OrderingViolation {
                index: 57,
                previous: 10,
                current: 20,
            }
            .into());
            let json = render_json(&RunSummary::from_outcome(&outcome)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["status"], "failed");
            assert_eq!(value["kind"], "ordering");
            assert!(value["error"].as_str().unwrap().contains("index 57"));
        }
    }
}
