//! Randomized local move that covers player pairs who never met.
//!
//! [`PairCoverageMove::apply`] picks two players that share no game and
//! swaps one of them into the other's game, sending one or more
//! teammates of similar score the other way. Most calls are expected to be
//! rejected; rejections are counted per reason in the schedule's
//! [`SwapLog`](crate::model::SwapLog), never raised as errors.
//!
//! # Algorithm
//!
//! 1. Collect every player in at least one zero-together pair. None left:
//!    [`PerturbOutcome::Exhausted`].
//! 2. Pick `p0` uniformly from that set, then `p1` uniformly from the
//!    players `p0` has never met.
//! 3. Find a game `g0` holding `p0` and a game `g1` holding `p1`, each by a
//!    wrap-around scan from a random start.
//! 4. Candidates: members of `g0` other than `p0`, free in `g1`'s round,
//!    available for `g1`, no heavier than `p1`.
//! 5. Choose partners whose weights sum to exactly `p1`'s: a candidate is
//!    accepted when it still fits and its score is within a half-normal
//!    deviate of `p1`'s. Game occupancies are unchanged by a swap.
//! 6. Validate, then move the partners to `g1` and `p1` to `g0`.

use rand::Rng;

use crate::error::ScheduleError;
use crate::model::{PlayerMask, Problem, Schedule};
use crate::random::half_normal;

/// Why a swap attempt made no change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapRejection {
    /// A chosen player has no game, or `g0` has nobody who could move.
    NoCandidates,
    /// No subset of the movable candidates matches `p1`'s weight.
    InsufficientWeight,
    /// A chosen partner already plays in `g1`'s round.
    ///
    /// Candidates are drawn only from players free in that round, so this
    /// re-checks a guarantee and is not recorded by [`PairCoverageMove`].
    PartnerBusy,
    /// `p1` already plays in `g0`'s round.
    MoverBusy,
    /// `p1` is unavailable for `g0`.
    MoverUnavailable,
}

impl SwapRejection {
    /// Index into [`SwapLog::rejections`](crate::model::SwapLog::rejections).
    pub fn bucket(self) -> usize {
        match self {
            SwapRejection::NoCandidates => 0,
            SwapRejection::InsufficientWeight => 1,
            SwapRejection::PartnerBusy => 2,
            SwapRejection::MoverBusy => 3,
            SwapRejection::MoverUnavailable => 4,
        }
    }
}

/// Result of one [`PairCoverageMove::apply`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerturbOutcome {
    /// `mover` left game `from` for game `to`; `partners` went the other way.
    Swapped {
        mover: usize,
        partners: Vec<usize>,
        from: usize,
        to: usize,
    },
    /// Nothing changed except the rejection counter.
    Rejected(SwapRejection),
    /// Every pair of players already shares a game.
    Exhausted,
}

impl PerturbOutcome {
    /// Whether the schedule changed.
    pub fn is_swap(&self) -> bool {
        matches!(self, PerturbOutcome::Swapped { .. })
    }
}

/// The pair-coverage swap move.
///
/// # Examples
///
/// ```
/// use u_roster::perturb::PairCoverageMove;
///
/// let mv = PairCoverageMove::default().with_score_sigma(25.0);
/// assert_eq!(mv.sample_attempts, 1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PairCoverageMove {
    /// σ of the half-normal score tolerance when choosing partners.
    pub score_sigma: f64,
    /// Tolerance draws before falling back to the closest score.
    pub sample_attempts: u32,
}

impl Default for PairCoverageMove {
    fn default() -> Self {
        Self {
            score_sigma: 50.0,
            sample_attempts: 1000,
        }
    }
}

impl PairCoverageMove {
    /// Sets σ of the partner score tolerance.
    pub fn with_score_sigma(mut self, sigma: f64) -> Self {
        self.score_sigma = sigma;
        self
    }

    /// Sets the tolerance draws before the closest-score fallback.
    pub fn with_sample_attempts(mut self, attempts: u32) -> Self {
        self.sample_attempts = attempts;
        self
    }

    /// Attempts one swap on `schedule`.
    ///
    /// # Errors
    ///
    /// Only a broken `assign`/`unassign` contract, which would indicate a
    /// bug in this move. Rejections are `Ok(PerturbOutcome::Rejected(_))`.
    pub fn apply<R: Rng>(
        &self,
        problem: &Problem,
        schedule: &mut Schedule,
        rng: &mut R,
    ) -> Result<PerturbOutcome, ScheduleError> {
        let n = problem.player_count();
        let mut involved = PlayerMask::EMPTY;
        for (i, j, shared) in schedule.together_matrix().pairs() {
            if shared == 0 {
                involved.insert(i);
                involved.insert(j);
            }
        }
        let Some(p0) = involved.random_member(rng) else {
            return Ok(PerturbOutcome::Exhausted);
        };
        let strangers: PlayerMask = (0..n)
            .filter(|&m| m != p0 && schedule.together(p0, m) == 0)
            .collect();
        let Some(p1) = strangers.random_member(rng) else {
            return Ok(PerturbOutcome::Exhausted);
        };

        let g0 = game_of(schedule, p0, rng);
        let g1 = game_of(schedule, p1, rng);
        let (Some(g0), Some(g1)) = (g0, g1) else {
            return Ok(reject(schedule, SwapRejection::NoCandidates, p1));
        };

        let (round0, round1) = (schedule.games()[g0].round(), schedule.games()[g1].round());
        let mut movable = schedule.games()[g0].assigned();
        movable.remove(p0);
        let movable = movable.difference(schedule.round_mask(round1));
        if movable.is_empty() {
            return Ok(reject(schedule, SwapRejection::NoCandidates, p1));
        }

        let mover = &problem.players()[p1];
        let unavailable = schedule.games()[g1].unavailable();
        let mut pool: Vec<usize> = movable
            .iter()
            .filter(|&p| problem.players()[p].weight <= mover.weight && !unavailable.contains(p))
            .collect();
        let pool_weight: u32 = pool.iter().map(|&p| problem.players()[p].weight).sum();
        if pool_weight < mover.weight {
            return Ok(reject(schedule, SwapRejection::InsufficientWeight, p1));
        }

        let Some(partners) = self.pick_partners(problem, &mut pool, p1, rng) else {
            return Ok(reject(schedule, SwapRejection::InsufficientWeight, p1));
        };

        if partners
            .iter()
            .any(|&p| schedule.round_mask(round1).contains(p))
        {
            return Ok(reject(schedule, SwapRejection::PartnerBusy, p1));
        }
        if schedule.round_mask(round0).contains(p1) {
            return Ok(reject(schedule, SwapRejection::MoverBusy, p1));
        }
        if schedule.games()[g0].unavailable().contains(p1) {
            return Ok(reject(schedule, SwapRejection::MoverUnavailable, p1));
        }

        for &p in &partners {
            schedule.unassign(problem, g0, p)?;
            schedule.assign(problem, g1, p)?;
        }
        schedule.unassign(problem, g1, p1)?;
        schedule.assign(problem, g0, p1)?;
        schedule.swap_log_mut().swaps += 1;

        Ok(PerturbOutcome::Swapped {
            mover: p1,
            partners,
            from: g1,
            to: g0,
        })
    }

    /// Draws partners from `pool` until their weight equals `mover`'s.
    ///
    /// Each draw scans the pool from a random start and takes the first
    /// player whose score is within a fresh half-normal tolerance of the
    /// mover's. After `sample_attempts` draws, the closest score is taken.
    /// Players heavier than the weight still missing are dropped from the
    /// pool first; `None` when it runs dry before the weight is matched.
    fn pick_partners<R: Rng>(
        &self,
        problem: &Problem,
        pool: &mut Vec<usize>,
        mover: usize,
        rng: &mut R,
    ) -> Option<Vec<usize>> {
        let need = problem.players()[mover].weight;
        let target = i64::from(problem.players()[mover].score);
        let distance = |p: usize| (i64::from(problem.players()[p].score) - target).abs();

        let mut partners = Vec::new();
        let mut weight = 0;
        let mut attempts = 0;
        while weight < need {
            let missing = need - weight;
            pool.retain(|&p| problem.players()[p].weight <= missing);
            if pool.is_empty() {
                return None;
            }
            let pos = if attempts < self.sample_attempts {
                attempts += 1;
                let tolerance = half_normal(rng, self.score_sigma);
                let start = rng.random_range(0..pool.len());
                (0..pool.len())
                    .map(|k| (start + k) % pool.len())
                    .find(|&i| distance(pool[i]) as f64 <= tolerance)
            } else {
                (0..pool.len()).min_by_key(|&i| distance(pool[i]))
            };
            if let Some(i) = pos {
                let p = pool.remove(i);
                weight += problem.players()[p].weight;
                partners.push(p);
            }
        }
        Some(partners)
    }
}

/// A game holding `player`, scanning from a random start.
fn game_of<R: Rng>(schedule: &Schedule, player: usize, rng: &mut R) -> Option<usize> {
    let len = schedule.games().len();
    let start = rng.random_range(0..len);
    (0..len)
        .map(|i| (start + i) % len)
        .find(|&g| schedule.games()[g].contains(player))
}

fn reject(schedule: &mut Schedule, reason: SwapRejection, mover: usize) -> PerturbOutcome {
    schedule.swap_log_mut().rejections[reason.bucket()] += 1;
    log::trace!("swap of player {mover} rejected: {reason:?}");
    PerturbOutcome::Rejected(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{construct, Strategy};
    use crate::model::fixtures::{league, league_with_block};
    use crate::model::{GameSpec, PlayerSpec};
    use u_numflow::random::create_rng;

    fn nonzero(schedule: &Schedule) -> usize {
        schedule.together_matrix().nonzero_entries()
    }

    /// Round 0: {0,1}; round 1: {2,3}; round 2: {0,1}.
    fn three_rounds() -> (Problem, Schedule) {
        let problem = league(4, 3, 1, 2);
        let mut s = problem.empty_schedule();
        for (g, p) in [(0, 0), (0, 1), (1, 2), (1, 3), (2, 0), (2, 1)] {
            s.assign(&problem, g, p).unwrap();
        }
        (problem, s)
    }

    #[test]
    fn test_single_round_always_rejects() {
        let players = vec![
            PlayerSpec::new("a", 10),
            PlayerSpec::new("b", 20),
            PlayerSpec::new("c", 30),
            PlayerSpec::new("d", 40),
        ];
        let games = vec![GameSpec::new(0, "", ""), GameSpec::new(0, "", "")];
        let problem = Problem::new(players, games, 2).unwrap();
        let base = construct(&problem, Strategy::RoundRobin, 2, &mut create_rng(0))
            .unwrap()
            .schedule;

        for seed in 0..50 {
            let mut s = base.clone();
            let outcome = PairCoverageMove::default()
                .apply(&problem, &mut s, &mut create_rng(seed))
                .unwrap();
            assert_eq!(outcome, PerturbOutcome::Rejected(SwapRejection::NoCandidates));
            assert_eq!(s.together_matrix(), base.together_matrix());
            assert_eq!(s.swap_log().rejections, [1, 0, 0, 0, 0]);
            assert_eq!(s.swap_log().swaps, 0);
        }
    }

    #[test]
    fn test_swap_adds_pair_coverage() {
        let (problem, base) = three_rounds();
        for seed in 0..50 {
            let mut s = base.clone();
            let before = nonzero(&s);
            let outcome = PairCoverageMove::default()
                .apply(&problem, &mut s, &mut create_rng(seed))
                .unwrap();
            assert!(outcome.is_swap(), "seed {seed}: {outcome:?}");
            assert!(nonzero(&s) >= before + 2, "seed {seed}");
            assert_eq!(s.swap_log().swaps, 1);
            assert!(s.check_consistency(&problem).is_ok());
        }
    }

    #[test]
    fn test_swap_moves_mover_and_partner() {
        let (problem, mut s) = three_rounds();
        let outcome = PairCoverageMove::default()
            .apply(&problem, &mut s, &mut create_rng(3))
            .unwrap();
        let PerturbOutcome::Swapped {
            mover,
            partners,
            from,
            to,
        } = outcome
        else {
            panic!("expected a swap, got {outcome:?}");
        };
        assert_eq!(partners.len(), 1);
        assert!(s.games()[to].contains(mover));
        assert!(!s.games()[from].contains(mover));
        assert!(s.games()[from].contains(partners[0]));
        assert!(s.games().iter().all(|g| g.occupancy() == 2));
    }

    #[test]
    fn test_same_seed_same_decision() {
        let problem = league(10, 4, 2, 4);
        let base = construct(&problem, Strategy::WeightedRandom, 2, &mut create_rng(8))
            .unwrap()
            .schedule;
        for seed in 0..30 {
            let mut a = base.clone();
            let mut b = base.clone();
            let mv = PairCoverageMove::default();
            let oa = mv.apply(&problem, &mut a, &mut create_rng(seed)).unwrap();
            let ob = mv.apply(&problem, &mut b, &mut create_rng(seed)).unwrap();
            assert_eq!(oa, ob);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_exhausted_when_all_pairs_met() {
        let problem = league(3, 1, 1, 3);
        let mut s = problem.empty_schedule();
        for p in 0..3 {
            s.assign(&problem, 0, p).unwrap();
        }
        let outcome = PairCoverageMove::default()
            .apply(&problem, &mut s, &mut create_rng(1))
            .unwrap();
        assert_eq!(outcome, PerturbOutcome::Exhausted);
        assert_eq!(*s.swap_log(), Default::default());
    }

    #[test]
    fn test_unscheduled_player_is_no_candidate() {
        let problem = league(3, 1, 1, 3);
        let mut s = problem.empty_schedule();
        s.assign(&problem, 0, 0).unwrap();
        s.assign(&problem, 0, 1).unwrap();
        let outcome = PairCoverageMove::default()
            .apply(&problem, &mut s, &mut create_rng(1))
            .unwrap();
        assert_eq!(outcome, PerturbOutcome::Rejected(SwapRejection::NoCandidates));
    }

    #[test]
    fn test_heavy_mover_needs_enough_weight() {
        // Round 0: {a, b}, round 1: {c(weight 2)}. Only b can leave for c's round.
        let players = vec![
            PlayerSpec::new("a", 30),
            PlayerSpec::new("b", 20),
            PlayerSpec::new("c", 10).with_weight(2),
        ];
        let games = vec![GameSpec::new(0, "", ""), GameSpec::new(1, "", "")];
        let problem = Problem::new(players, games, 2).unwrap();
        let mut s = problem.empty_schedule();
        s.assign(&problem, 0, 0).unwrap();
        s.assign(&problem, 0, 1).unwrap();
        s.assign(&problem, 1, 2).unwrap();

        let mut seen = [0u32; 5];
        for seed in 0..40 {
            let mut t = s.clone();
            match PairCoverageMove::default()
                .apply(&problem, &mut t, &mut create_rng(seed))
                .unwrap()
            {
                PerturbOutcome::Rejected(r) => seen[r.bucket()] += 1,
                other => panic!("unexpected {other:?}"),
            }
            assert_eq!(t.together_matrix(), s.together_matrix());
        }
        // p0 = c gives no candidates in round 0's game; p0 in {a, b} leaves
        // one movable player of weight 1 against a mover of weight 2.
        assert!(seen[1] > 0);
        assert_eq!(seen[2] + seen[3] + seen[4], 0);
    }

    #[test]
    fn test_mixed_weights_keep_occupancy() {
        // Round 0: {x, a, b(weight 2)}, round 1: {c(weight 2)}.
        let players = vec![
            PlayerSpec::new("x", 40),
            PlayerSpec::new("a", 30),
            PlayerSpec::new("b", 20).with_weight(2),
            PlayerSpec::new("c", 10).with_weight(2),
        ];
        let games = vec![GameSpec::new(0, "", ""), GameSpec::new(1, "", "")];
        let problem = Problem::new(players, games, 4).unwrap();
        let mut base = problem.empty_schedule();
        for (g, p) in [(0, 0), (0, 1), (0, 2), (1, 3)] {
            base.assign(&problem, g, p).unwrap();
        }

        let mut swaps = 0;
        for seed in 0..200 {
            let mut s = base.clone();
            let outcome = PairCoverageMove::default()
                .apply(&problem, &mut s, &mut create_rng(seed))
                .unwrap();
            if let PerturbOutcome::Swapped { mover, partners, .. } = outcome {
                swaps += 1;
                let moved: u32 = partners.iter().map(|&p| problem.players()[p].weight).sum();
                assert_eq!(moved, problem.players()[mover].weight, "seed {seed}");
                let occupancy: Vec<u32> = s.games().iter().map(|g| g.occupancy()).collect();
                assert_eq!(occupancy, vec![4, 2], "seed {seed}");
            }
            assert!(s.check_consistency(&problem).is_ok());
        }
        assert!(swaps > 0);
    }

    #[test]
    fn test_partner_busy_is_never_recorded() {
        let problem = league(10, 4, 2, 4);
        for seed in 0..200 {
            let mut rng = create_rng(seed);
            let mut s = construct(&problem, Strategy::WeightedRandom, 2, &mut rng)
                .unwrap()
                .schedule;
            for _ in 0..10 {
                PairCoverageMove::default()
                    .apply(&problem, &mut s, &mut rng)
                    .unwrap();
            }
            assert_eq!(s.swap_log().rejections[SwapRejection::PartnerBusy.bucket()], 0);
        }
    }

    #[test]
    fn test_unavailability_survives_many_moves() {
        let problem = league_with_block(9, 4, 2, 4, 3, 5);
        for seed in 0..1000 {
            let mut rng = create_rng(seed);
            let mut s = construct(&problem, Strategy::WeightedRandom, 2, &mut rng)
                .unwrap()
                .schedule;
            for _ in 0..5 {
                PairCoverageMove::default()
                    .apply(&problem, &mut s, &mut rng)
                    .unwrap();
            }
            assert!(!s.games()[5].contains(3), "seed {seed}");
        }
    }

    #[test]
    fn test_pick_partners_falls_back_to_closest() {
        let (problem, _) = three_rounds();
        let mv = PairCoverageMove::default()
            .with_score_sigma(0.0)
            .with_sample_attempts(0);
        let mut pool = vec![1, 2, 3];
        // Player 0 has the highest score; player 1 is closest.
        let partners = mv.pick_partners(&problem, &mut pool, 0, &mut create_rng(1));
        assert_eq!(partners, Some(vec![1]));
        assert_eq!(pool, vec![2, 3]);
    }
}
