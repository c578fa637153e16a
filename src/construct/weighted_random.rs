//! Most-constrained-first greedy fill with a front-biased random pick.

use rand::Rng;

use crate::error::ScheduleError;
use crate::model::{Problem, Schedule};
use crate::random::front_biased_index;

use super::types::ConstructionHeuristic;

/// Fills the game with the fewest eligible players first.
///
/// Each step picks the open game with the fewest eligible players (ties:
/// lowest occupancy, then calendar order), ranks its eligible players by
/// credited games ascending then score descending, and assigns the player
/// at a half-normal index over that ranking (`σ = len / 2`). A game closes
/// when it reaches capacity or runs out of eligible players.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRandomGreedy;

impl ConstructionHeuristic for WeightedRandomGreedy {
    fn name(&self) -> &'static str {
        "weighted-random"
    }

    fn fill<R: Rng>(
        &self,
        problem: &Problem,
        schedule: &mut Schedule,
        rng: &mut R,
    ) -> Result<(), ScheduleError> {
        let capacity = problem.players_per_game();
        let mut open: Vec<usize> = (0..problem.game_count()).collect();

        while let Some((slot, game)) = most_constrained(schedule, &open) {
            let mut pool: Vec<usize> = schedule.eligible_for(game).iter().collect();
            if pool.is_empty() {
                open.remove(slot);
                continue;
            }
            pool.sort_by(|&a, &b| {
                schedule
                    .credited_games(problem, a)
                    .cmp(&schedule.credited_games(problem, b))
                    .then(problem.players()[b].score.cmp(&problem.players()[a].score))
            });

            let player = pool[front_biased_index(rng, pool.len())];
            schedule.assign(problem, game, player)?;
            if schedule.games()[game].occupancy() >= capacity {
                open.remove(slot);
            }
        }
        Ok(())
    }
}

/// Position in `open` and index of the game with the fewest eligible
/// players, ties broken by occupancy and then by position.
fn most_constrained(schedule: &Schedule, open: &[usize]) -> Option<(usize, usize)> {
    open.iter()
        .copied()
        .enumerate()
        .min_by_key(|&(_, g)| {
            (
                schedule.eligible_for(g).len(),
                schedule.games()[g].occupancy(),
            )
        })
}
