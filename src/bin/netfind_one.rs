//! `netfind-one`: heuristically search for a single net common to a source
//! box and one or more target boxes.

#![deny(rust_2018_idioms, clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::process::ExitCode;

use box_nets::{dims::Dimensions, BoxNetError, Config};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Search for a single common net, trading completeness for speed.
#[derive(Parser, Debug)]
#[command(
    name = "netfind-one",
    about = "Heuristically search for one common unfolding (net) of a source box and one or more target boxes",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Box dimensions `LENGTH HEIGHT DEPTH`; repeat for each box. The first
    /// occurrence is the source box whose face labels get re-randomised on
    /// every restart, the rest are targets the found net must fold onto.
    #[arg(short = 'b', long = "box", num_args = 3, required = true)]
    boxes: Vec<Vec<u32>>,

    /// Worker thread count (default: available parallelism).
    #[arg(long)]
    processes: Option<usize>,

    /// Abandon a randomisation once a candidate's summed score exceeds
    /// this value (default: 8, matching the reference tuning).
    #[arg(long)]
    score_threshold: Option<i64>,

    /// Where to append progress and the final match.
    #[arg(long, default_value = "results.txt")]
    results: PathBuf,
}

fn init_tracing() {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}

fn parse_dimensions(boxes: &[Vec<u32>]) -> Result<Vec<Dimensions>, BoxNetError> {
    boxes
        .iter()
        .map(|triple| match triple.as_slice() {
            [l, h, d] => Dimensions::new(*l, *h, *d),
            other => Err(BoxNetError::InvalidDimensions(format!(
                "expected 3 values per --box, got {}",
                other.len()
            ))),
        })
        .collect()
}

fn run() -> Result<bool, BoxNetError> {
    let cli = Cli::parse();
    let dims = parse_dimensions(&cli.boxes)?;
    box_nets::dims::check_matching_areas(&dims)?;

    let source = dims[0];
    let targets = &dims[1..];

    info!(?source, target_count = targets.len(), "starting heuristic search");

    let mut config = Config::default();
    if let Some(processes) = cli.processes {
        config.processes = processes;
    }
    if let Some(threshold) = cli.score_threshold {
        config.score_threshold = threshold;
    }
    config.results_path = cli.results;

    let found = box_nets::worker::run_heuristic(source, targets, &config)?;
    Ok(found.is_some())
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(true) => {
            info!("found a common net");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            info!("search ended without a match");
            ExitCode::SUCCESS
        }
        Err(e @ BoxNetError::InvalidDimensions(_)) => {
            error!(error = %e, "invalid input");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "fatal error");
            ExitCode::FAILURE
        }
    }
}
