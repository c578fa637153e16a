//! Seed-and-propagate construction that maximizes first-ever pairings.

use rand::Rng;

use crate::error::ScheduleError;
use crate::model::{Problem, Schedule};

use super::ping_pong;
use super::types::ConstructionHeuristic;

/// Builds one round per team grouping and copies it to the team's other
/// rounds.
///
/// For the first round of each grouping of `rounds_per_team` consecutive
/// rounds:
///
/// 1. One player, chosen by the round number, seeds the first game.
/// 2. The rest of the roster, ordered by score with random tie-breaks, is
///    dealt over the round's games in [`ping_pong`] order. Each game takes
///    the player that adds the most first-ever pairings with its current
///    members; ties go to the earlier player.
///
/// The grouping's other rounds copy that pattern game by game, then deal
/// whoever is still free the same way. A final trimming pass removes
/// players from over-full games: players are visited in `ping_pong` order
/// over the roster, and a player at or above the games target leaves the
/// over-full game with the highest average score among those they play in
/// (uniformly among ties).
#[derive(Debug, Clone, Copy)]
pub struct PairSeedPropagate {
    /// Consecutive rounds sharing one pattern. At least 1.
    pub rounds_per_team: usize,
}

impl Default for PairSeedPropagate {
    fn default() -> Self {
        Self { rounds_per_team: 2 }
    }
}

impl ConstructionHeuristic for PairSeedPropagate {
    fn name(&self) -> &'static str {
        "pair-seed"
    }

    fn fill<R: Rng>(
        &self,
        problem: &Problem,
        schedule: &mut Schedule,
        rng: &mut R,
    ) -> Result<(), ScheduleError> {
        let step = self.rounds_per_team.max(1);
        let n = problem.player_count();

        for round in (0..problem.round_count()).step_by(step) {
            let games = round_games(schedule, round);
            let Some(&first) = games.first() else {
                continue;
            };

            let mut pool: Vec<usize> = (0..n).collect();
            if let Some(seed) = (0..n)
                .map(|k| (round + k) % n)
                .find(|&p| schedule.can_assign(first, p))
            {
                schedule.assign(problem, first, seed)?;
                pool.retain(|&p| p != seed);
            }
            order_by_score(problem, &mut pool, rng);
            spread(problem, schedule, &games, &mut pool, 1)?;

            for copy in 1..step {
                let target_round = round + copy;
                if target_round >= problem.round_count() {
                    break;
                }
                let copies = round_games(schedule, target_round);
                for (&src, &dst) in games.iter().zip(&copies) {
                    let members = schedule.games()[src].players().to_vec();
                    for p in members {
                        if schedule.can_assign(dst, p) {
                            schedule.assign(problem, dst, p)?;
                        }
                    }
                }

                let busy = schedule.round_mask(target_round);
                let mut rest: Vec<usize> = (0..n).filter(|&p| !busy.contains(p)).collect();
                order_by_score(problem, &mut rest, rng);
                spread(problem, schedule, &copies, &mut rest, 0)?;
            }
        }

        trim(problem, schedule, rng)
    }
}

fn round_games(schedule: &Schedule, round: usize) -> Vec<usize> {
    schedule.games_in_round(round).map(|g| g.index()).collect()
}

/// Sorts by descending score, breaking ties with a random key.
fn order_by_score<R: Rng>(problem: &Problem, pool: &mut [usize], rng: &mut R) {
    let mut keyed: Vec<(i32, u32, usize)> = pool
        .iter()
        .map(|&p| (problem.players()[p].score, rng.random::<u32>(), p))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    for (slot, (_, _, p)) in pool.iter_mut().zip(keyed) {
        *slot = p;
    }
}

/// Deals `pool` over `games` in ping-pong order starting at index `start`.
///
/// A game nobody in the pool can join is skipped; dealing stops once the
/// pool is empty or a full back-and-forth cycle places nobody.
fn spread(
    problem: &Problem,
    schedule: &mut Schedule,
    games: &[usize],
    pool: &mut Vec<usize>,
    start: usize,
) -> Result<(), ScheduleError> {
    let cycle = 2 * games.len();
    let mut i = start;
    let mut idle = 0;
    while !pool.is_empty() && idle < cycle {
        let game = games[ping_pong(i, games.len())];
        i += 1;
        match best_newcomer(schedule, game, pool) {
            Some(pos) => {
                let player = pool.remove(pos);
                schedule.assign(problem, game, player)?;
                idle = 0;
            }
            None => idle += 1,
        }
    }
    Ok(())
}

/// Position in `pool` of the eligible player with the most members of
/// `game` they have never played with. First in pool order wins ties.
fn best_newcomer(schedule: &Schedule, game: usize, pool: &[usize]) -> Option<usize> {
    let members = schedule.games()[game].players();
    let mut best: Option<(usize, usize)> = None;
    for (pos, &p) in pool.iter().enumerate() {
        if !schedule.can_assign(game, p) {
            continue;
        }
        let fresh = members
            .iter()
            .filter(|&&q| schedule.together(p, q) == 0)
            .count();
        match best {
            Some((_, most)) if fresh <= most => {}
            _ => best = Some((pos, fresh)),
        }
    }
    best.map(|(pos, _)| pos)
}

fn over_capacity(schedule: &Schedule, capacity: u32) -> bool {
    schedule.games().iter().any(|g| g.occupancy() > capacity)
}

/// Removes players from over-full games until none is left.
///
/// The games threshold relaxes by one after a full roster cycle without a
/// removal, so the pass always terminates.
fn trim<R: Rng>(
    problem: &Problem,
    schedule: &mut Schedule,
    rng: &mut R,
) -> Result<(), ScheduleError> {
    let capacity = problem.players_per_game();
    let n = problem.player_count();
    let mut threshold = problem.target_games();
    let mut idle = 0;
    let mut pi = 0;

    while over_capacity(schedule, capacity) {
        if idle >= 2 * n {
            if threshold == 0 {
                break;
            }
            threshold -= 1;
            idle = 0;
        }
        let player = ping_pong(pi, n);
        pi += 1;
        if schedule.games_played(player) < threshold {
            idle += 1;
            continue;
        }

        let mut best_score = i64::MIN;
        let mut candidates = Vec::new();
        for g in schedule.games() {
            if g.occupancy() <= capacity || !g.contains(player) {
                continue;
            }
            let score = g.average_score();
            if score > best_score {
                best_score = score;
                candidates.clear();
            }
            if score == best_score {
                candidates.push(g.index());
            }
        }
        if candidates.is_empty() {
            idle += 1;
            continue;
        }
        let game = candidates[rng.random_range(0..candidates.len())];
        schedule.unassign(problem, game, player)?;
        idle = 0;
    }
    Ok(())
}
