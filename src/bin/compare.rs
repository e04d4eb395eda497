//! Comparison driver for the four sequence strategies.
//!
//! Runs the harness against each selected strategy and reports pass/fail
//! plus timing. The unsynchronized strategy is a negative control: it is
//! expected to fail under contention and does not affect the exit code.
//!
//! Run with:
//! ```bash
//! cargo run --bin compare --features cli -- --workers 10 --calls 10000
//! ```

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use sequenza::harness::report::{self, TableStyle};
use sequenza::harness::{self, RunReport};
use sequenza::services::atomic::Atomic;
use sequenza::services::locked::Locked;
use sequenza::services::owned::Owned;
use sequenza::services::unsync::Unsync;
use sequenza::services::SequenceError;

/// Strategy selection from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum StrategyChoice {
    /// Run every strategy
    #[default]
    All,
    /// Unsynchronized negative control
    Unsync,
    /// Atomic fetch-and-add
    Atomic,
    /// Mutex-guarded critical section
    Locked,
    /// Owner thread with channel pair
    Owned,
}

/// One concrete strategy to drive.
#[derive(Debug, Clone, Copy)]
enum Strategy {
    Unsync,
    Atomic,
    Locked,
    Owned,
}

impl Strategy {
    /// Whether this strategy promises correctness under contention.
    fn expects_correct(self) -> bool {
        !matches!(self, Strategy::Unsync)
    }
}

impl StrategyChoice {
    fn expand(self) -> Vec<Strategy> {
        match self {
            StrategyChoice::All => vec![
                Strategy::Unsync,
                Strategy::Atomic,
                Strategy::Locked,
                Strategy::Owned,
            ],
            StrategyChoice::Unsync => vec![Strategy::Unsync],
            StrategyChoice::Atomic => vec![Strategy::Atomic],
            StrategyChoice::Locked => vec![Strategy::Locked],
            StrategyChoice::Owned => vec![Strategy::Owned],
        }
    }
}

/// Output format for run reports.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Pretty ASCII table
    #[default]
    Table,
    /// JSON array of report snapshots
    Json,
    /// One summary line per strategy
    Plain,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Modern,
    Markdown,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Modern => TableStyle::Modern,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Compare synchronization strategies for a shared id sequence.
///
/// Drives N concurrent workers, each issuing M sequential calls, against
/// each selected strategy and validates the issued ids.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 10)]
    workers: usize,

    /// Sequential calls issued by each worker
    #[arg(short, long, default_value_t = 10_000)]
    calls: usize,

    /// Strategy to drive
    #[arg(short, long, value_enum, default_value = "all")]
    strategy: StrategyChoice,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Table style (for the table format)
    #[arg(long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,
}

fn drive(strategy: Strategy, workers: usize, calls: usize) -> Result<RunReport, SequenceError> {
    match strategy {
        Strategy::Unsync => harness::run(&Unsync::new().with_name("unsync"), workers, calls),
        Strategy::Atomic => harness::run(&Atomic::new().with_name("atomic"), workers, calls),
        Strategy::Locked => harness::run(&Locked::new().with_name("locked"), workers, calls),
        Strategy::Owned => {
            let service = Owned::start().with_name("owned");
            let report = harness::run(&service, workers, calls);
            service.stop();
            report
        }
    }
}

/// How many violations to spell out per failing strategy.
const MAX_PRINTED_VIOLATIONS: usize = 5;

fn print_violations(report: &RunReport) {
    for violation in report.violations.iter().take(MAX_PRINTED_VIOLATIONS) {
        println!("  - {violation}");
    }
    if report.violations.len() > MAX_PRINTED_VIOLATIONS {
        println!(
            "  - ... and {} more",
            report.violations.len() - MAX_PRINTED_VIOLATIONS
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut reports = Vec::new();
    let mut failed = false;
    for strategy in args.strategy.expand() {
        match drive(strategy, args.workers, args.calls) {
            Ok(report) => {
                if strategy.expects_correct() && !report.passed() {
                    failed = true;
                }
                reports.push(report);
            }
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    match args.format {
        OutputFormat::Table => {
            println!("{}", report::render_table_styled(&reports, args.style.into()));
            for report in reports.iter().filter(|r| !r.passed()) {
                println!("{}:", report.name);
                print_violations(report);
            }
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                report::to_json_pretty(&reports)
            } else {
                report::to_json(&reports)
            };
            match json {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
        OutputFormat::Plain => {
            for report in &reports {
                println!("{report}");
                if !report.passed() {
                    print_violations(report);
                }
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
