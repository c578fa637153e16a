//! Fairness statistics of a schedule.
//!
//! [`Stats::compute`] is a pure function of a [`Problem`] and a
//! [`Schedule`]: calling it twice on the same state yields equal snapshots.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Together histogram | `[k]` = number of player pairs that shared exactly `k` games |
//! | Pair minimums | running minimum of together-counts over pairs in index order |
//! | Min/max games | fewest credited games (played + allowed absences) / most games played |
//! | Scores | min, `sorted[len / 2]` and max of per-game average score |
//! | Min leaders | fewest leaders in any game |
//! | Goalkeeper games | games with at least one goalkeeper |
//!
//! Complexity: O(P²) for the pair scan, O(G log G) for the score sort.

use crate::model::{Problem, Schedule};

/// Read-only snapshot of a schedule's fairness metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Running minimum together-count, one entry per pair `(i < j)` in
    /// index order. Non-increasing; the last entry is the global minimum.
    pub pair_minimums: Vec<u32>,
    /// `together_histogram[k]` = pairs that shared exactly `k` games.
    /// Length is `game_count + 1`.
    pub together_histogram: Vec<u32>,
    /// Fewest credited games (played + allowed absences) over all players.
    pub min_games: u32,
    /// Most games played by any player.
    pub max_games: u32,
    /// Lowest per-game average score.
    pub min_score: i64,
    /// `sorted_averages[len / 2]`.
    pub median_score: i64,
    /// Highest per-game average score.
    pub max_score: i64,
    /// Fewest leaders in any game.
    pub min_leaders: u32,
    /// Games with at least one goalkeeper.
    pub goalkeeper_games: u32,
    /// Swaps executed on this schedule's lineage.
    pub swaps: u32,
    /// Rejected swap attempts by reason bucket.
    pub failed_swaps: [u32; 5],
}

impl Stats {
    /// Computes the snapshot for `schedule`.
    pub fn compute(problem: &Problem, schedule: &Schedule) -> Self {
        let n = problem.player_count();
        let matrix = schedule.together_matrix();

        let mut together_histogram = vec![0u32; problem.game_count() + 1];
        let mut pair_minimums = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        let mut running = u32::MAX;
        for (_, _, shared) in matrix.pairs() {
            together_histogram[shared as usize] += 1;
            running = running.min(shared);
            pair_minimums.push(running);
        }

        let min_games = (0..n)
            .map(|p| schedule.credited_games(problem, p))
            .min()
            .unwrap_or(0);
        let max_games = (0..n).map(|p| schedule.games_played(p)).max().unwrap_or(0);

        let mut averages: Vec<i64> = schedule.games().iter().map(|g| g.average_score()).collect();
        averages.sort_unstable();
        let min_score = averages.first().copied().unwrap_or(0);
        let max_score = averages.last().copied().unwrap_or(0);
        let median_score = averages.get(averages.len() / 2).copied().unwrap_or(0);

        let min_leaders = schedule
            .games()
            .iter()
            .map(|g| g.leaders())
            .min()
            .unwrap_or(0);
        let goalkeeper_games = schedule
            .games()
            .iter()
            .filter(|g| g.goalkeepers() > 0)
            .count() as u32;

        let log = schedule.swap_log();
        Self {
            pair_minimums,
            together_histogram,
            min_games,
            max_games,
            min_score,
            median_score,
            max_score,
            min_leaders,
            goalkeeper_games,
            swaps: log.swaps,
            failed_swaps: log.rejections,
        }
    }

    /// Pairs that never shared a game.
    pub fn zero_pairs(&self) -> u32 {
        self.together_histogram.first().copied().unwrap_or(0)
    }

    /// Smallest together-count over all pairs; 0 when there are no pairs.
    pub fn min_together(&self) -> u32 {
        self.pair_minimums.last().copied().unwrap_or(0)
    }

    /// Whether some pair never shared a game.
    pub fn has_uncovered_pairs(&self) -> bool {
        self.zero_pairs() > 0
    }
}
