//! Error kinds for the box-nets CORE.
//!
//! Mirrors the two fatal error kinds from the design doc: an invalid-input
//! kind that aborts a run at start-up, and an internal-invariant kind that
//! is fatal for whichever worker hits it. The design doc's third kind,
//! `ThresholdExceeded`, is recoverable and never crosses a `Result`
//! boundary — it's handled entirely within `worker::search_attempt` as a
//! plain `AttemptOutcome::Exhausted` return value, not a variant here.

use thiserror::Error;

/// Errors produced anywhere in the box-nets CORE.
#[derive(Debug, Error)]
pub enum BoxNetError {
    /// A box dimension was non-positive, or the supplied boxes don't share a
    /// surface area.
    #[error("invalid box dimensions: {0}")]
    InvalidDimensions(String),

    /// An internal consistency check failed: a re-orient target that isn't
    /// actually adjacent, or a face graph that isn't 4-regular.
    #[error("box graph invariant violated: {0}")]
    GraphInvariant(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BoxNetError>;
