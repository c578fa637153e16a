//! Rotating-queue fill.

use std::collections::VecDeque;

use rand::Rng;

use crate::error::ScheduleError;
use crate::model::{Problem, Schedule};

use super::types::ConstructionHeuristic;

/// Deals players from a rotating queue into the games, sweeping the
/// calendar front-to-back and then back-to-front until
/// `players_per_game × game_count` slots are dealt.
///
/// Each deal takes the first queued player eligible for the game and moves
/// them to the back of the queue. Full games and games with no eligible
/// player are passed over. When the slot total does not divide evenly by
/// the roster size, a final pass deals the remainder from the front of the
/// calendar so every player ends up with the same number of games.
///
/// Deterministic: the generator is not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinFill;

impl ConstructionHeuristic for RoundRobinFill {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn fill<R: Rng>(
        &self,
        problem: &Problem,
        schedule: &mut Schedule,
        _rng: &mut R,
    ) -> Result<(), ScheduleError> {
        let capacity = problem.players_per_game();
        let game_count = problem.game_count();
        let total = capacity as usize * game_count;
        let mut queue: VecDeque<usize> = (0..problem.player_count()).collect();

        let mut dealt = 0usize;
        while dealt < total {
            let before = dealt;
            let sweep = (0..game_count).chain((0..game_count).rev());
            for game in sweep {
                if dealt >= total {
                    break;
                }
                if schedule.games()[game].occupancy() >= capacity {
                    continue;
                }
                if let Some(p) = deal(problem, schedule, &mut queue, game)? {
                    dealt += problem.players()[p].weight as usize;
                }
            }
            if dealt == before {
                break;
            }
        }

        let n = problem.player_count();
        if total % n != 0 {
            let extra = n - total % n;
            let mut placed = 0usize;
            for game in 0..game_count {
                if placed >= extra {
                    break;
                }
                if let Some(p) = deal(problem, schedule, &mut queue, game)? {
                    placed += problem.players()[p].weight as usize;
                }
            }
        }
        Ok(())
    }
}

/// Assigns the first queued player eligible for `game` and rotates them
/// to the back. Returns the player, or `None` when nobody in the queue fits.
fn deal(
    problem: &Problem,
    schedule: &mut Schedule,
    queue: &mut VecDeque<usize>,
    game: usize,
) -> Result<Option<usize>, ScheduleError> {
    let Some(pos) = queue.iter().position(|&p| schedule.can_assign(game, p)) else {
        return Ok(None);
    };
    let Some(player) = queue.remove(pos) else {
        return Ok(None);
    };
    schedule.assign(problem, game, player)?;
    queue.push_back(player);
    Ok(Some(player))
}
