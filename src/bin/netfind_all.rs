//! `netfind-all`: enumerate every common net shared by a source box and one
//! or more target boxes.

#![deny(rust_2018_idioms, clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::process::ExitCode;

use box_nets::{dims::Dimensions, BoxNetError, Config};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Enumerate every common net of two or more boxes.
#[derive(Parser, Debug)]
#[command(
    name = "netfind-all",
    about = "Enumerate every common unfolding (net) of a source box and one or more target boxes",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Box dimensions `LENGTH HEIGHT DEPTH`; repeat for each box. The first
    /// occurrence is the source box whose spanning trees are enumerated,
    /// the rest are targets every emitted net must also fold onto.
    #[arg(short = 'b', long = "box", num_args = 3, required = true)]
    boxes: Vec<Vec<u32>>,

    /// Worker thread count (default: available parallelism).
    #[arg(long)]
    processes: Option<usize>,

    /// Disable the dedup set; keeps every spanning tree's net even if an
    /// earlier tree already produced the same canonical bitmap.
    #[arg(long)]
    no_dedup: bool,

    /// Where to append matches.
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

fn run() -> Result<usize, BoxNetError> {
    let cli = Cli::parse();
    let dims = parse_dimensions(&cli.boxes)?;
    box_nets::dims::check_matching_areas(&dims)?;

    let source = dims[0];
    let targets = &dims[1..];

    info!(?source, target_count = targets.len(), "starting exhaustive search");

    let mut config = Config::default();
    if let Some(processes) = cli.processes {
        config.processes = processes;
    }
    config.dedup = !cli.no_dedup;
    config.results_path = cli.results;

    box_nets::worker::run_exhaustive(source, targets, &config)
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(matches) => {
            info!(matches, "search complete");
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
