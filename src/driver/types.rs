//! Run report types.

use crate::model::Schedule;
use crate::stats::Stats;

/// How an iteration produces its candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerationMode {
    /// Perturb a copy of the current best.
    MutateBest,
    /// Perturb a copy of the base schedule.
    MutateBase,
    /// Build a fresh schedule with the configured heuristic.
    Rebuild,
}

impl GenerationMode {
    /// The mode for iteration `i` of the fixed four-step rotation. Two of
    /// the four steps rebuild.
    pub fn for_iteration(i: usize) -> Self {
        match i % 4 {
            0 => GenerationMode::MutateBest,
            1 => GenerationMode::MutateBase,
            _ => GenerationMode::Rebuild,
        }
    }
}

/// Why the improvement loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_streak` consecutive worse candidates.
    StreakExhausted,
    /// `max_wins` consecutive ties.
    WinsExhausted,
    /// `max_iterations` reached.
    IterationLimit,
    /// The cancellation flag was set.
    Cancelled,
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The best schedule found.
    pub best: Schedule,

    /// Statistics of `best`, including its swap counters.
    pub stats: Stats,

    /// Candidates generated.
    pub iterations: usize,

    /// Candidates that replaced the best.
    pub accepted: usize,

    /// Consecutive worse candidates at stop.
    pub streak: usize,

    /// Consecutive ties at stop.
    pub wins: usize,

    /// Which bound ended the run.
    pub stop_reason: StopReason,

    /// Whether cancelled externally.
    pub cancelled: bool,
}
