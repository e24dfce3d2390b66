//! dpeval CLI - document parser scoring tool

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use dpeval::evaluate::{to_json, EvaluationReport};
use dpeval::{Category, EvalMode, EvalOptions, Evaluator, JsonFormat, ReadingOrder, TablePairing};

#[derive(Parser, Debug)]
#[command(name = "dpeval")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Score document parser output with NID and TEDS / TEDS-S", long_about = None)]
struct Cli {
    /// Reference (ground truth) JSON file
    #[arg(long, value_name = "FILE", env = "DPEVAL_LABEL_PATH")]
    label_path: PathBuf,

    /// Prediction JSON file
    #[arg(long, value_name = "FILE", env = "DPEVAL_PRED_PATH")]
    pred_path: PathBuf,

    /// Metrics to compute
    #[arg(long, value_enum, default_value = "all")]
    mode: Mode,

    /// Category left out of the reading-order text (repeatable; replaces the default table, figure, chart)
    #[arg(long = "ignore-class", value_name = "CATEGORY")]
    ignore_class: Vec<String>,

    /// Element ordering before serialization
    #[arg(long, value_enum, default_value = "geometric")]
    reading_order: Order,

    /// Table pairing strategy
    #[arg(long, value_enum, default_value = "iou")]
    pairing: Pairing,

    /// Report NID per category
    #[arg(long)]
    per_category: bool,

    /// Vendor whose category names the prediction uses
    #[arg(long, value_name = "NAME")]
    vendor: Option<String>,

    /// Fail on the first schema error instead of skipping the document
    #[arg(long)]
    strict: bool,

    /// Score documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Give up on a table pair after this many milliseconds
    #[arg(long, value_name = "MS")]
    table_timeout_ms: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Output compact JSON
    #[arg(long, requires = "json")]
    compact: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Reading-order text only (NID)
    Layout,
    /// Tables only (TEDS / TEDS-S)
    Table,
    /// Both
    All,
}

impl From<Mode> for EvalMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Layout => EvalMode::Layout,
            Mode::Table => EvalMode::Table,
            Mode::All => EvalMode::All,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Order {
    /// Page, then top to bottom, then left to right
    Geometric,
    /// Element order of the input file
    AsGiven,
}

impl From<Order> for ReadingOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Geometric => ReadingOrder::Geometric,
            Order::AsGiven => ReadingOrder::AsGiven,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Pairing {
    /// Greedy highest-IoU-first on the same page
    Iou,
    /// k-th reference table with k-th predicted table
    DocumentOrder,
}

impl From<Pairing> for TablePairing {
    fn from(pairing: Pairing) -> Self {
        match pairing {
            Pairing::Iou => TablePairing::Iou,
            Pairing::DocumentOrder => TablePairing::DocumentOrder,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = eval_options(cli)?;

    let mut evaluator = Evaluator::new().with_eval_options(options);
    if cli.strict {
        evaluator = evaluator.strict();
    }
    if let Some(vendor) = &cli.vendor {
        evaluator = evaluator.with_vendor(vendor)?;
    }

    if !cli.json {
        print_arguments(cli);
    }

    log::debug!(
        "Scoring {} against {}",
        cli.pred_path.display(),
        cli.label_path.display()
    );
    let report = evaluator.evaluate_files(&cli.label_path, &cli.pred_path)?;

    let rendered = if cli.json {
        let format = if cli.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        to_json(&report, format)?
    } else {
        dpeval::evaluate::to_text(&report)
    };

    if let Some(path) = &cli.output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else if cli.json {
        println!("{}", rendered);
    } else {
        print_scores(&report);
    }

    Ok(())
}

fn eval_options(cli: &Cli) -> Result<EvalOptions, Box<dyn std::error::Error>> {
    let mut options = EvalOptions::new()
        .with_mode(cli.mode.into())
        .with_reading_order(cli.reading_order.into())
        .with_pairing(cli.pairing.into())
        .with_per_category(cli.per_category);

    if !cli.ignore_class.is_empty() {
        let categories = cli
            .ignore_class
            .iter()
            .map(|name| name.parse::<Category>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid --ignore-class: {}", e))?;
        options = options.with_ignored(categories);
    }
    if cli.sequential {
        options = options.sequential();
    }
    if let Some(ms) = cli.table_timeout_ms {
        options = options.with_table_timeout(Duration::from_millis(ms));
    }

    Ok(options)
}

fn print_arguments(cli: &Cli) {
    println!("{}", "Arguments".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Label path".bold(), cli.label_path.display());
    println!("{}: {}", "Prediction path".bold(), cli.pred_path.display());
    println!("{}: {:?}", "Mode".bold(), cli.mode);
    if !cli.ignore_class.is_empty() {
        println!("{}: {}", "Ignored classes".bold(), cli.ignore_class.join(", "));
    }
    if let Some(vendor) = &cli.vendor {
        println!("{}: {}", "Vendor".bold(), vendor);
    }
    println!();
}

fn print_scores(report: &EvaluationReport) {
    println!("{}", "Scores".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), report.document_count);
    if report.missing_predictions > 0 {
        println!(
            "{}: {}",
            "Missing predictions".yellow(),
            report.missing_predictions
        );
    }
    for rejected in &report.rejected {
        println!("{} {}: {}", "Rejected".yellow(), rejected.id, rejected.reason);
    }

    if let Some(nid) = report.scores.nid {
        println!("{}: {:.4}", "NID Score".green().bold(), nid);
    }
    for (category, score) in &report.scores.category_nid {
        println!("  {} {}: {:.4}", "├─".dimmed(), category, score);
    }
    if let Some(teds) = report.scores.teds {
        println!("{}: {:.4}", "TEDS Score".green().bold(), teds);
    }
    if let Some(teds_s) = report.scores.teds_s {
        println!("{}: {:.4}", "TEDS-S Score".green().bold(), teds_s);
    }
    if report.failed_tables > 0 {
        println!(
            "{}: {} of {}",
            "Tables scored as mismatch".yellow(),
            report.failed_tables,
            report.table_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DATASET: &str = r#"{
        "a.pdf": {"elements": [
            {"coordinates": [{"x":0,"y":0},{"x":10,"y":0},{"x":10,"y":10},{"x":0,"y":10}],
             "category": "paragraph", "id": 0, "page": 1,
             "content": {"text": "hello", "html": "", "markdown": ""}}
        ]}
    }"#;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "dpeval",
            "--label-path",
            "ref.json",
            "--pred-path",
            "pred.json",
            "--mode",
            "table",
            "--ignore-class",
            "header",
            "--ignore-class",
            "footer",
            "--pairing",
            "document-order",
            "--reading-order",
            "as-given",
            "--table-timeout-ms",
            "250",
        ])
        .unwrap();

        assert_eq!(cli.mode, Mode::Table);
        assert_eq!(cli.ignore_class, vec!["header", "footer"]);
        assert_eq!(cli.pairing, Pairing::DocumentOrder);

        let options = eval_options(&cli).unwrap();
        assert_eq!(options.mode, EvalMode::Table);
        assert_eq!(options.reading_order, ReadingOrder::AsGiven);
        assert!(options.ignore_categories.contains(&Category::Footer));
        assert!(!options.ignore_categories.contains(&Category::Table));
        assert_eq!(options.table_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_compact_requires_json() {
        let result = Cli::try_parse_from([
            "dpeval",
            "--label-path",
            "a.json",
            "--pred-path",
            "b.json",
            "--compact",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_ignore_class() {
        let cli = Cli::try_parse_from([
            "dpeval",
            "--label-path",
            "a.json",
            "--pred-path",
            "b.json",
            "--ignore-class",
            "sidebar",
        ])
        .unwrap();
        assert!(eval_options(&cli).is_err());
    }

    #[test]
    fn test_run_writes_json_report() {
        let reference = json_file(DATASET);
        let prediction = json_file(DATASET);
        let output = tempfile::Builder::new().suffix(".json").tempfile().unwrap();

        let args: Vec<OsString> = vec![
            "dpeval".into(),
            "--label-path".into(),
            reference.path().into(),
            "--pred-path".into(),
            prediction.path().into(),
            "--mode".into(),
            "layout".into(),
            "--json".into(),
            "--output".into(),
            output.path().into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli).unwrap();

        let written = fs::read_to_string(output.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["scores"]["nid"], 1.0);
        assert_eq!(value["document_count"], 1);
    }

    #[test]
    fn test_run_unknown_vendor_fails() {
        let reference = json_file(DATASET);
        let args: Vec<OsString> = vec![
            "dpeval".into(),
            "--label-path".into(),
            reference.path().into(),
            "--pred-path".into(),
            reference.path().into(),
            "--vendor".into(),
            "acme".into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(run(&cli).is_err());
    }
}
