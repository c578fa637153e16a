//! Multi-criterion ranking of schedules.
//!
//! [`Comparator::compare`] is a short-circuiting lexicographic ranking over
//! two [`Stats`] snapshots. `Ordering::Less` means the first schedule is
//! preferred, `Ordering::Greater` the second, `Ordering::Equal` a tie at
//! this resolution.
//!
//! # Rules (in order)
//!
//! 1. [`Rule::MinGames`]: reaching the games-per-player target wins outright.
//! 2. [`Rule::Overload`]: nobody playing more than `target + overload_margin`.
//! 3. [`Rule::Leaders`]: every game has at least `min_leaders` leaders.
//! 4. [`Rule::Coverage`]: no pair of players that never shared a game.
//! 5. [`Rule::Goalkeepers`]: more games with a goalkeeper.
//! 6. [`Rule::ZeroPairs`]: fewer uncovered pairs, if they differ by more
//!    than `zero_pair_margin`.
//! 7. [`Rule::MinScore`]: larger minimum game average, if the relative gap
//!    exceeds `score_pct` percent.
//! 8. [`Rule::MedianScore`]: same test on the median.
//! 9. [`Rule::ZeroBucket`]: fewer pairs in histogram bucket 0, if they differ
//!    by more than `zero_bucket_margin`.
//! 10. [`Rule::MaxScore`]: same relative test on the maximum.
//!
//! Every rule is antisymmetric, so `compare(a, b) == compare(b, a).reverse()`.

use std::cmp::Ordering;

use crate::stats::Stats;

/// Tunable margins for the ranking rules.
///
/// # Examples
///
/// ```
/// use u_roster::compare::CompareThresholds;
///
/// let t = CompareThresholds::default().with_score_pct(5);
/// assert_eq!(t.score_pct, 5);
/// assert_eq!(t.min_leaders, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompareThresholds {
    /// Leaders every game should have.
    pub min_leaders: u32,
    /// Games above the target that count as overload.
    pub overload_margin: u32,
    /// Uncovered-pair difference that decides rule 6.
    pub zero_pair_margin: u32,
    /// Relative score gap (percent) that decides rules 7, 8 and 10.
    pub score_pct: i64,
    /// Bucket-0 difference that decides rule 9.
    ///
    /// Rule 9 reads the same uncovered-pair count as rule 6, so it can only
    /// decide when `zero_pair_margin > zero_bucket_margin`. With the
    /// defaults (5 and 10) it never does.
    pub zero_bucket_margin: u32,
}

impl Default for CompareThresholds {
    fn default() -> Self {
        Self {
            min_leaders: 2,
            overload_margin: 2,
            zero_pair_margin: 5,
            score_pct: 10,
            zero_bucket_margin: 10,
        }
    }
}

impl CompareThresholds {
    /// Sets the leaders every game should have.
    pub fn with_min_leaders(mut self, n: u32) -> Self {
        self.min_leaders = n;
        self
    }

    /// Sets the games above the target that count as overload.
    pub fn with_overload_margin(mut self, n: u32) -> Self {
        self.overload_margin = n;
        self
    }

    /// Sets the uncovered-pair difference that decides rule 6.
    pub fn with_zero_pair_margin(mut self, n: u32) -> Self {
        self.zero_pair_margin = n;
        self
    }

    /// Sets the relative score gap, in percent.
    pub fn with_score_pct(mut self, pct: i64) -> Self {
        self.score_pct = pct;
        self
    }

    /// Sets the bucket-0 difference that decides rule 9.
    pub fn with_zero_bucket_margin(mut self, n: u32) -> Self {
        self.zero_bucket_margin = n;
        self
    }

    /// Validates the thresholds.
    pub fn validate(&self) -> Result<(), String> {
        if self.score_pct < 0 {
            return Err(format!("score_pct must be non-negative, got {}", self.score_pct));
        }
        Ok(())
    }
}

/// The ranking rule that decided a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rule {
    /// Minimum credited games reaches the target.
    MinGames,
    /// Nobody plays more than `target + overload_margin`.
    Overload,
    /// Every game has `min_leaders` leaders.
    Leaders,
    /// Every pair of players shares a game.
    Coverage,
    /// More games with a goalkeeper.
    Goalkeepers,
    /// Fewer uncovered pairs, beyond `zero_pair_margin`.
    ZeroPairs,
    /// Higher lowest game average.
    MinScore,
    /// Higher median game average.
    MedianScore,
    /// Fewer pairs in histogram bucket 0, beyond `zero_bucket_margin`.
    ZeroBucket,
    /// Higher highest game average.
    MaxScore,
}

/// Ranks schedules against a fixed games-per-player target.
#[derive(Debug, Clone)]
pub struct Comparator {
    target_games: u32,
    thresholds: CompareThresholds,
}

impl Comparator {
    /// Creates a comparator for `target_games` games per player.
    pub fn new(target_games: u32, thresholds: CompareThresholds) -> Self {
        Self {
            target_games,
            thresholds,
        }
    }

    /// Games-per-player target of rule 1.
    pub fn target_games(&self) -> u32 {
        self.target_games
    }

    /// Margins used by the ranking rules.
    pub fn thresholds(&self) -> &CompareThresholds {
        &self.thresholds
    }

    /// Ranks `a` against `b`. `Less` prefers `a`.
    pub fn compare(&self, a: &Stats, b: &Stats) -> Ordering {
        self.decide(a, b).map_or(Ordering::Equal, |(_, ord)| ord)
    }

    /// Like [`compare`](Self::compare) but also names the deciding rule.
    /// Returns `None` on a tie.
    pub fn decide(&self, a: &Stats, b: &Stats) -> Option<(Rule, Ordering)> {
        let t = &self.thresholds;
        let target = self.target_games;

        // Rules 1-5: pass/fail gates where passing wins.
        let gates: [(Rule, bool, bool); 4] = [
            (Rule::MinGames, a.min_games >= target, b.min_games >= target),
            (
                Rule::Overload,
                a.max_games <= target + t.overload_margin,
                b.max_games <= target + t.overload_margin,
            ),
            (
                Rule::Leaders,
                a.min_leaders >= t.min_leaders,
                b.min_leaders >= t.min_leaders,
            ),
            (Rule::Coverage, a.zero_pairs() == 0, b.zero_pairs() == 0),
        ];
        for (rule, a_ok, b_ok) in gates {
            if a_ok != b_ok {
                return Some((rule, prefer_true(a_ok)));
            }
        }

        if a.goalkeeper_games != b.goalkeeper_games {
            return Some((Rule::Goalkeepers, b.goalkeeper_games.cmp(&a.goalkeeper_games)));
        }

        if a.zero_pairs().abs_diff(b.zero_pairs()) > t.zero_pair_margin {
            return Some((Rule::ZeroPairs, a.zero_pairs().cmp(&b.zero_pairs())));
        }

        if relative_gap_exceeds(a.min_score, b.min_score, t.score_pct) {
            return Some((Rule::MinScore, b.min_score.cmp(&a.min_score)));
        }

        if relative_gap_exceeds(a.median_score, b.median_score, t.score_pct) {
            return Some((Rule::MedianScore, b.median_score.cmp(&a.median_score)));
        }

        let (a0, b0) = (a.zero_pairs(), b.zero_pairs());
        if a0.abs_diff(b0) > t.zero_bucket_margin {
            return Some((Rule::ZeroBucket, a0.cmp(&b0)));
        }

        if relative_gap_exceeds(a.max_score, b.max_score, t.score_pct) {
            return Some((Rule::MaxScore, b.max_score.cmp(&a.max_score)));
        }

        None
    }
}

fn prefer_true(a_ok: bool) -> Ordering {
    if a_ok {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Whether `a` and `b` differ by more than `pct` percent of the smaller.
///
/// Integer arithmetic: `100·|a−b| > pct·min(a, b)`. Measuring against the
/// smaller value makes the test symmetric in its arguments. When the
/// smaller value is zero or negative, any difference is decisive.
pub fn relative_gap_exceeds(a: i64, b: i64, pct: i64) -> bool {
    if a == b {
        return false;
    }
    let base = a.min(b);
    if base <= 0 {
        return true;
    }
    100 * (a - b).abs() > pct * base
}
