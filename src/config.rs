//! Run-time tuning knobs shared by both binaries.

use std::path::PathBuf;

/// The tuning value the reference tools used for the heuristic search's
/// restart threshold.
pub const DEFAULT_SCORE_THRESHOLD: i64 = 8;

/// Knobs that aren't part of the data model proper: how many workers to
/// run, when the heuristic search should give up and re-randomise, whether
/// to deduplicate candidates, and where to write matches.
#[derive(Debug, Clone)]
pub struct Config {
    pub processes: usize,
    pub score_threshold: i64,
    pub dedup: bool,
    pub results_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            processes: std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            dedup: true,
            results_path: PathBuf::from("results.txt"),
        }
    }
}
