use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use map_eval::config::EvaluationConfig;
use map_eval::evaluator::evaluate;
use map_eval::loader::load_from_dir;
use map_eval::plot::{AsciiPlot, JsonCurveWriter, MultiSink};
use map_eval::types::BoxFormat;

/// Mean Average Precision for detection label directories.
#[derive(Parser)]
#[command(name = "map-eval")]
struct Cli {
    /// Directory of ground-truth label files.
    ground_truth: PathBuf,

    /// Directory of prediction label files.
    predictions: PathBuf,

    /// IoU a prediction must exceed to match a ground truth (0.0-1.0).
    #[arg(long)]
    iou_threshold: Option<f64>,

    /// Box coordinate convention: corners or midpoint.
    #[arg(long)]
    box_format: Option<BoxFormat>,

    /// Drop predictions below this confidence before matching.
    #[arg(long)]
    min_confidence: Option<f64>,

    /// JSON file with evaluation settings; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the precision-recall curve to this JSON file.
    #[arg(long)]
    curve_json: Option<PathBuf>,

    /// Draw the precision-recall curve in the terminal.
    #[arg(long)]
    plot: bool,

    /// Print the full evaluation result as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let ground_truths = load_from_dir(&cli.ground_truth)?;
    let predictions = load_from_dir(&cli.predictions)?;
    // JSON output must be the only thing on stdout
    if cli.json {
        eprintln!("amount of ground truth: {}", ground_truths.len());
    } else {
        println!("amount of ground truth: {}", ground_truths.len());
    }

    let mut sinks = MultiSink::new();
    if let Some(path) = &cli.curve_json {
        sinks.push(Box::new(JsonCurveWriter::new(path)));
    }
    if cli.plot {
        match chart_channel(&cli) {
            Channel::Stdout => sinks.push(Box::new(AsciiPlot::new(io::stdout()))),
            Channel::Stderr => sinks.push(Box::new(AsciiPlot::new(io::stderr()))),
        }
    }

    let result = evaluate(&ground_truths, &predictions, &config, &mut sinks)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.summary_line());
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Channel {
    Stdout,
    Stderr,
}

/// The terminal chart moves to stderr when stdout carries the JSON result.
fn chart_channel(cli: &Cli) -> Channel {
    if cli.json {
        Channel::Stderr
    } else {
        Channel::Stdout
    }
}

fn build_config(cli: &Cli) -> map_eval::Result<EvaluationConfig> {
    let config = match &cli.config {
        Some(path) => EvaluationConfig::from_file(path)?,
        None => EvaluationConfig::default(),
    };

    config.with_overrides(cli.iou_threshold, cli.box_format, cli.min_confidence)
}
