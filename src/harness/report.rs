//! Run reports and their renderers.
//!
//! A [`RunReport`] is the aggregate outcome of one harness run: what was
//! driven, how long it took, the maximum id observed, and every invariant
//! violation the validator found. The feature-gated renderers mirror the
//! crate's output features:
//!
//! - `table` - render a batch of reports as an ASCII table (`tabled`)
//! - `serde` - a serializable [`ReportSnapshot`] mirror of the report
//! - `json`  - serialize a batch of reports to JSON (`serde_json`)

use std::fmt::Display;
use std::time::Duration;

use crate::harness::validate::Violation;

/// The outcome of one harness run against one service.
///
/// # Examples
///
/// ```rust
/// use sequenza::harness;
/// use sequenza::services::locked::Locked;
///
/// let service = Locked::new().with_name("locked");
/// let report = harness::run(&service, 2, 500).unwrap();
///
/// assert!(report.passed());
/// assert_eq!(report.max_observed, 1000);
/// println!("{report}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Name of the service that was driven.
    pub name: &'static str,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Sequential calls issued by each worker.
    pub calls_per_worker: usize,
    /// `workers × calls_per_worker`.
    pub expected_total: u64,
    /// The largest id any worker observed.
    pub max_observed: u64,
    /// Wall-clock duration of the concurrent phase.
    pub elapsed: Duration,
    /// Every invariant violation found; empty means the run passed.
    pub violations: Vec<Violation>,
}

impl RunReport {
    /// Returns `true` if the run finished with zero violations.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// The elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e3
    }

    /// Issued ids per second over the concurrent phase.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.expected_total as f64 / secs
        } else {
            0.0
        }
    }
}

impl Display for RunReport {
    /// One-line summary: name, verdict, max id, timing.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = if self.name.is_empty() {
            "<sequence>"
        } else {
            self.name
        };
        if self.passed() {
            write!(
                f,
                "{}: PASS  max {} of {} in {:.2?} ({:.0} ids/s)",
                name,
                self.max_observed,
                self.expected_total,
                self.elapsed,
                self.throughput()
            )
        } else {
            write!(
                f,
                "{}: FAIL  {} violation(s), max {} of {} in {:.2?}",
                name,
                self.violations.len(),
                self.max_observed,
                self.expected_total,
                self.elapsed
            )
        }
    }
}

/// A serializable snapshot of a [`RunReport`].
///
/// Violations are flattened to their display strings so the snapshot stays
/// stable across taxonomy changes.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportSnapshot {
    /// Name of the service that was driven.
    pub strategy: String,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Sequential calls issued by each worker.
    pub calls_per_worker: usize,
    /// `workers × calls_per_worker`.
    pub expected_total: u64,
    /// The largest id any worker observed.
    pub max_observed: u64,
    /// Wall-clock duration of the concurrent phase, in milliseconds.
    pub elapsed_ms: f64,
    /// Whether the run finished with zero violations.
    pub passed: bool,
    /// Rendered violation messages.
    pub violations: Vec<String>,
}

#[cfg(feature = "serde")]
impl From<&RunReport> for ReportSnapshot {
    fn from(report: &RunReport) -> Self {
        ReportSnapshot {
            strategy: report.name.to_string(),
            workers: report.workers,
            calls_per_worker: report.calls_per_worker,
            expected_total: report.expected_total,
            max_observed: report.max_observed,
            elapsed_ms: report.elapsed_ms(),
            passed: report.passed(),
            violations: report.violations.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Serializes a batch of reports to a JSON array.
#[cfg(feature = "json")]
pub fn to_json<'a>(
    reports: impl IntoIterator<Item = &'a RunReport>,
) -> serde_json::Result<String> {
    let snapshots: Vec<ReportSnapshot> = reports.into_iter().map(ReportSnapshot::from).collect();
    serde_json::to_string(&snapshots)
}

/// Serializes a batch of reports to pretty-printed JSON.
#[cfg(feature = "json")]
pub fn to_json_pretty<'a>(
    reports: impl IntoIterator<Item = &'a RunReport>,
) -> serde_json::Result<String> {
    let snapshots: Vec<ReportSnapshot> = reports.into_iter().map(ReportSnapshot::from).collect();
    serde_json::to_string_pretty(&snapshots)
}

/// Available table styles for rendering.
#[cfg(feature = "table")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// GitHub-flavored Markdown table
    Markdown,
    /// No borders, just spacing
    Blank,
}

#[cfg(feature = "table")]
#[derive(tabled::Tabled)]
struct ReportRow {
    #[tabled(rename = "Strategy")]
    strategy: &'static str,
    #[tabled(rename = "Workers")]
    workers: usize,
    #[tabled(rename = "Calls/Worker")]
    calls_per_worker: usize,
    #[tabled(rename = "Max Id")]
    max_observed: u64,
    #[tabled(rename = "Expected")]
    expected_total: u64,
    #[tabled(rename = "Elapsed")]
    elapsed: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[cfg(feature = "table")]
impl From<&RunReport> for ReportRow {
    fn from(report: &RunReport) -> Self {
        ReportRow {
            strategy: if report.name.is_empty() {
                "<sequence>"
            } else {
                report.name
            },
            workers: report.workers,
            calls_per_worker: report.calls_per_worker,
            max_observed: report.max_observed,
            expected_total: report.expected_total,
            elapsed: format!("{:.2?}", report.elapsed),
            status: if report.passed() {
                "PASS".to_string()
            } else {
                format!("FAIL ({})", report.violations.len())
            },
        }
    }
}

/// Renders a batch of reports as a table in the default (rounded) style.
#[cfg(feature = "table")]
pub fn render_table<'a>(reports: impl IntoIterator<Item = &'a RunReport>) -> String {
    render_table_styled(reports, TableStyle::default())
}

/// Renders a batch of reports as a table in the given style.
#[cfg(feature = "table")]
pub fn render_table_styled<'a>(
    reports: impl IntoIterator<Item = &'a RunReport>,
    style: TableStyle,
) -> String {
    use tabled::settings::Style;

    let rows: Vec<ReportRow> = reports.into_iter().map(ReportRow::from).collect();
    let mut table = tabled::Table::new(rows);
    match style {
        TableStyle::Ascii => table.with(Style::ascii()),
        TableStyle::Rounded => table.with(Style::rounded()),
        TableStyle::Sharp => table.with(Style::sharp()),
        TableStyle::Modern => table.with(Style::modern()),
        TableStyle::Markdown => table.with(Style::markdown()),
        TableStyle::Blank => table.with(Style::blank()),
    };
    table.to_string()
}
