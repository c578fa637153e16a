//! Two-pass fill that evens out games per player.

use rand::Rng;

use crate::error::ScheduleError;
use crate::model::{Problem, Schedule};

use super::types::ConstructionHeuristic;

/// First gives every player, in roster order, games until their credited
/// count reaches the target, each time picking the least occupied game they
/// can join. Then tops up every game, in calendar order, with the least
/// credited eligible player.
///
/// Deterministic: the generator is not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedFill;

impl ConstructionHeuristic for BalancedFill {
    fn name(&self) -> &'static str {
        "balanced"
    }

    fn fill<R: Rng>(
        &self,
        problem: &Problem,
        schedule: &mut Schedule,
        _rng: &mut R,
    ) -> Result<(), ScheduleError> {
        let target = problem.target_games();
        for player in 0..problem.player_count() {
            while schedule.credited_games(problem, player) < target {
                let Some(game) = least_occupied_game(schedule, player) else {
                    break;
                };
                schedule.assign(problem, game, player)?;
            }
        }

        let capacity = problem.players_per_game();
        for game in 0..problem.game_count() {
            while schedule.games()[game].occupancy() < capacity {
                let Some(player) = least_credited_player(problem, schedule, game) else {
                    break;
                };
                schedule.assign(problem, game, player)?;
            }
        }
        Ok(())
    }
}

fn least_occupied_game(schedule: &Schedule, player: usize) -> Option<usize> {
    schedule
        .games()
        .iter()
        .filter(|g| schedule.can_assign(g.index(), player))
        .min_by_key(|g| g.occupancy())
        .map(|g| g.index())
}

fn least_credited_player(problem: &Problem, schedule: &Schedule, game: usize) -> Option<usize> {
    schedule
        .eligible_for(game)
        .iter()
        .min_by_key(|&p| schedule.credited_games(problem, p))
}
