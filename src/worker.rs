//! The worker pool and driver loops for both search modes.
//!
//! Exhaustive mode (`netfind-all`) drives every spanning tree of the source
//! box through the pool, keeping every distinct net that validates against
//! every target. Heuristic mode (`netfind-one`) runs `Config::processes`
//! independent search loops, each re-randomising the source box's face
//! labels whenever its current randomisation looks unpromising, until one
//! loop finds a net that matches every target exactly.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use hashbrown::HashSet;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::info;

use crate::box_graph::{self, BoxGraph};
use crate::config::Config;
use crate::dims::Dimensions;
use crate::error::{BoxNetError, Result};
use crate::net::{self, Bitmap};
use crate::spanning_tree;
use crate::validator;

/// Box graphs never come close to needing 8 MiB of recursion; this is
/// cheap insurance against the default thread stack.
const ENUMERATOR_STACK_SIZE: usize = 8 * 1024 * 1024;

fn build_pool(config: &Config) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.processes.max(1))
        .stack_size(ENUMERATOR_STACK_SIZE)
        .build()
        .map_err(|e| BoxNetError::GraphInvariant(format!("failed to start worker pool: {e}")))
}

fn edges_as_labelled_triples(graph: &BoxGraph) -> Vec<((usize, usize), usize, usize)> {
    graph
        .edges
        .iter()
        .map(|&(a, b)| ((a, b), a, b))
        .collect()
}

/// Run the exhaustive search: enumerate every spanning tree of `source`,
/// materialise its net, and keep every distinct one that validates against
/// every box in `targets`. Returns the number of matches written.
pub fn run_exhaustive(source: Dimensions, targets: &[Dimensions], config: &Config) -> Result<usize> {
    let source_graph = box_graph::build(source, false)?;
    let target_graphs: Vec<BoxGraph> = targets
        .iter()
        .map(|&d| box_graph::build(d, false))
        .collect::<Result<_>>()?;

    let vertices: Vec<usize> = (0..source_graph.face_count()).collect();
    let edges = edges_as_labelled_triples(&source_graph);
    let trees = spanning_tree::enumerate(&vertices, &edges)?;
    info!(trees = trees.len(), "enumerated spanning trees of the source box");

    let seen: Mutex<HashSet<Bitmap>> = Mutex::new(HashSet::new());
    let match_count = AtomicUsize::new(0);
    let writer = Mutex::new(
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.results_path)
            .map_err(|e| {
                BoxNetError::GraphInvariant(format!(
                    "failed to open results file {}: {e}",
                    config.results_path.display()
                ))
            })?,
    );

    let pool = build_pool(config)?;
    pool.install(|| -> Result<()> {
        trees
            .into_iter()
            .par_bridge()
            .try_for_each(|tree| -> Result<()> {
                let net = net::create_net(&tree, &source_graph)?;

                if config.dedup {
                    let mut guard = seen.lock().unwrap_or_else(|p| p.into_inner());
                    if !guard.insert(net.clone()) {
                        return Ok(());
                    }
                }

                let mut matches_all = true;
                for target in &target_graphs {
                    if validator::score(&net, target)? != 0 {
                        matches_all = false;
                        break;
                    }
                }

                if matches_all {
                    let n = match_count.fetch_add(1, Ordering::SeqCst) + 1;
                    let rendered = net::render(&net);
                    info!(match_number = n, "found a common net");

                    let mut f = writer.lock().unwrap_or_else(|p| p.into_inner());
                    write!(f, "\n--------------------\n{n}\n{rendered}\n").map_err(|e| {
                        BoxNetError::GraphInvariant(format!("failed to write results: {e}"))
                    })?;
                }

                Ok(())
            })
    })?;

    Ok(match_count.load(Ordering::SeqCst))
}

/// One loop's outcome on returning from [`search_attempt`].
enum AttemptOutcome {
    /// A net scoring 0 against every target was found.
    Done,
    /// The current randomisation ran out of candidates without a hit;
    /// caller should re-randomise and try again.
    Exhausted,
}

/// Walk every spanning tree of one randomised source box, scoring each
/// candidate net against every target and writing improvements to
/// `results.txt`. Mirrors the reference tool's `try_net`
/// (`examples/original_source/find_one.py`): a candidate that ties or beats
/// the current best is always recorded; only a candidate that does
/// *neither* — it didn't improve on the best *and* its score ran past
/// `config.score_threshold` — abandons this randomisation early. A
/// just-recorded new best never triggers the threshold bail-out, even if
/// its own score exceeds the threshold.
#[allow(clippy::too_many_arguments)]
fn search_attempt(
    source: Dimensions,
    target_graphs: &[BoxGraph],
    config: &Config,
    best_score: &AtomicI64,
    is_done: &AtomicBool,
    writer: &Mutex<std::fs::File>,
    winner: &Mutex<Option<Bitmap>>,
) -> Result<AttemptOutcome> {
    let source_graph = box_graph::build(source, true)?;
    let vertices: Vec<usize> = (0..source_graph.face_count()).collect();
    let edges = edges_as_labelled_triples(&source_graph);
    let trees = spanning_tree::enumerate(&vertices, &edges)?;

    let mut seen = HashSet::new();

    for tree in trees {
        if is_done.load(Ordering::SeqCst) {
            return Ok(AttemptOutcome::Done);
        }

        let net = net::create_net(&tree, &source_graph)?;
        if !seen.insert(net.clone()) {
            continue;
        }

        let scores: Vec<i64> = target_graphs
            .iter()
            .map(|target| validator::score(&net, target))
            .collect::<Result<_>>()?;
        let total: i64 = scores.iter().sum();

        if try_update_best(best_score, total) {
            record(total, &scores, &net, writer)?;

            if total == 0 {
                let mut guard = winner.lock().unwrap_or_else(|p| p.into_inner());
                *guard = Some(net.clone());
                drop(guard);
                is_done.store(true, Ordering::SeqCst);
                return Ok(AttemptOutcome::Done);
            }
        } else if total > config.score_threshold {
            return Ok(AttemptOutcome::Exhausted);
        }
    }

    Ok(AttemptOutcome::Exhausted)
}

/// Log and append `total`'s net to `results.txt` as the new best score.
fn record(total: i64, scores: &[i64], net: &Bitmap, writer: &Mutex<std::fs::File>) -> Result<()> {
    let rendered = net::render(net);
    let indiv = if scores.len() > 1 {
        format!(" {scores:?}")
    } else {
        String::new()
    };
    info!(score = total, "new best net found");

    let mut f = writer.lock().unwrap_or_else(|p| p.into_inner());
    write!(f, "\nBest score: {total}{indiv}\n{rendered}\n")
        .map_err(|e| BoxNetError::GraphInvariant(format!("failed to write results: {e}")))
}

/// Atomically record `candidate` as the new best iff it's `<=` the current
/// best (`i64::MAX` sentinel for "no match yet"). Returns whether it won.
fn try_update_best(best_score: &AtomicI64, candidate: i64) -> bool {
    let mut current = best_score.load(Ordering::SeqCst);
    loop {
        if candidate > current {
            return false;
        }
        match best_score.compare_exchange(current, candidate, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return true,
            Err(actual) => current = actual,
        }
    }
}

/// Run the heuristic search: `config.processes` independent loops, each
/// re-randomising the source box whenever its current randomisation is
/// exhausted without a hit, until one of them finds a net matching every
/// target exactly (score 0 against all). Returns that net, or `None` if
/// every loop exhausted every randomisation without ever finding one (only
/// possible for boxes that share no common net at all).
pub fn run_heuristic(
    source: Dimensions,
    targets: &[Dimensions],
    config: &Config,
) -> Result<Option<Bitmap>> {
    let target_graphs: Vec<BoxGraph> = targets
        .iter()
        .map(|&d| box_graph::build(d, false))
        .collect::<Result<_>>()?;

    let best_score = AtomicI64::new(i64::MAX);
    let is_done = AtomicBool::new(false);
    let writer = Mutex::new(
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.results_path)
            .map_err(|e| {
                BoxNetError::GraphInvariant(format!(
                    "failed to open results file {}: {e}",
                    config.results_path.display()
                ))
            })?,
    );
    let winner: Mutex<Option<Bitmap>> = Mutex::new(None);

    let pool = build_pool(config)?;
    pool.scope(|s| {
        for worker_id in 0..config.processes.max(1) {
            let target_graphs = &target_graphs;
            let config = &config;
            let best_score = &best_score;
            let is_done = &is_done;
            let writer = &writer;
            let winner = &winner;

            s.spawn(move |_| {
                while !is_done.load(Ordering::SeqCst) {
                    match search_attempt(
                        source,
                        target_graphs,
                        config,
                        best_score,
                        is_done,
                        writer,
                        winner,
                    ) {
                        Ok(AttemptOutcome::Done) => {
                            info!(worker_id, "found a net matching every target");
                            break;
                        }
                        Ok(AttemptOutcome::Exhausted) => {
                            info!(worker_id, "randomisation exhausted, restarting");
                            continue;
                        }
                        Err(e) => {
                            tracing::error!(worker_id, error = %e, "search attempt failed");
                            break;
                        }
                    }
                }
            });
        }
    });

    Ok(winner.into_inner().unwrap_or_else(|p| p.into_inner()))
}
