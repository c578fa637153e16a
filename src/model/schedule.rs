//! Mutable schedule state.
//!
//! A [`Schedule`] owns its games by value and refers to players by index.
//! All derived bookkeeping (round masks, together-counts, per-player counts,
//! game aggregates) is updated incrementally by [`Schedule::assign`] and
//! [`Schedule::unassign`]; nothing else mutates it.
//!
//! Search never mutates a shared schedule: every candidate is a clone of
//! the template or of an earlier schedule, and losers are dropped.

use crate::error::ScheduleError;

use super::entity::{GameInfo, Player, Problem};
use super::mask::PlayerMask;
use super::matrix::TogetherMatrix;

/// Assignment state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    index: usize,
    round: usize,
    score: i64,
    leaders: u32,
    goalkeepers: u32,
    occupancy: u32,
    players: Vec<usize>,
    assigned: PlayerMask,
    unavailable: PlayerMask,
}

impl Game {
    fn empty(info: &GameInfo) -> Self {
        Self {
            index: info.index,
            round: info.round,
            score: 0,
            leaders: 0,
            goalkeepers: 0,
            occupancy: 0,
            players: Vec::new(),
            assigned: PlayerMask::EMPTY,
            unavailable: info.unavailable,
        }
    }

    /// Calendar index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Sum of assigned players' scores.
    pub fn total_score(&self) -> i64 {
        self.score
    }

    /// Assigned players flagged as leaders.
    pub fn leaders(&self) -> u32 {
        self.leaders
    }

    /// Assigned players flagged as goalkeepers.
    pub fn goalkeepers(&self) -> u32 {
        self.goalkeepers
    }

    /// Sum of assigned players' weights.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Assigned player indices, in assignment order.
    pub fn players(&self) -> &[usize] {
        &self.players
    }

    pub fn assigned(&self) -> PlayerMask {
        self.assigned
    }

    pub fn unavailable(&self) -> PlayerMask {
        self.unavailable
    }

    pub fn contains(&self, player: usize) -> bool {
        self.assigned.contains(player)
    }

    /// `total_score / occupancy` with integer division; 0 for an empty game.
    pub fn average_score(&self) -> i64 {
        if self.occupancy == 0 {
            0
        } else {
            self.score / i64::from(self.occupancy)
        }
    }
}

/// Running counters for the perturbation operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapLog {
    /// Swaps executed.
    pub swaps: u32,
    /// Rejected swap attempts by [`SwapRejection::bucket`](crate::perturb::SwapRejection::bucket).
    pub rejections: [u32; 5],
}

/// A full assignment of players to games plus derived bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    games: Vec<Game>,
    round_masks: Vec<PlayerMask>,
    together: TogetherMatrix,
    played: Vec<u32>,
    swap_log: SwapLog,
}

impl Schedule {
    pub(crate) fn empty(players: &[Player], games: &[GameInfo], round_count: usize) -> Self {
        Self {
            games: games.iter().map(Game::empty).collect(),
            round_masks: vec![PlayerMask::EMPTY; round_count],
            together: TogetherMatrix::new(players.len()),
            played: vec![0; players.len()],
            swap_log: SwapLog::default(),
        }
    }

    /// Games in calendar order.
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game(&self, index: usize) -> Option<&Game> {
        self.games.get(index)
    }

    /// Games belonging to `round`, in calendar order.
    pub fn games_in_round(&self, round: usize) -> impl Iterator<Item = &Game> + '_ {
        self.games.iter().filter(move |g| g.round == round)
    }

    pub fn round_count(&self) -> usize {
        self.round_masks.len()
    }

    /// Players already playing somewhere in `round`.
    pub fn round_mask(&self, round: usize) -> PlayerMask {
        self.round_masks[round]
    }

    /// Games shared by players `i` and `j`.
    pub fn together(&self, i: usize, j: usize) -> u32 {
        self.together.get(i, j)
    }

    pub fn together_matrix(&self) -> &TogetherMatrix {
        &self.together
    }

    /// Games `player` is assigned to.
    pub fn games_played(&self, player: usize) -> u32 {
        self.played[player]
    }

    /// Games played plus the player's allowed absences.
    pub fn credited_games(&self, problem: &Problem, player: usize) -> u32 {
        self.played[player] + problem.players()[player].allowed_absences
    }

    /// Calendar indices of the games `player` is assigned to.
    pub fn player_games(&self, player: usize) -> Vec<usize> {
        self.games
            .iter()
            .filter(|g| g.contains(player))
            .map(|g| g.index)
            .collect()
    }

    pub fn swap_log(&self) -> &SwapLog {
        &self.swap_log
    }

    pub(crate) fn swap_log_mut(&mut self) -> &mut SwapLog {
        &mut self.swap_log
    }

    /// Whether `player` may be placed in `game` right now.
    pub fn can_assign(&self, game: usize, player: usize) -> bool {
        let Some(g) = self.games.get(game) else {
            return false;
        };
        player < self.played.len()
            && !g.assigned.contains(player)
            && !g.unavailable.contains(player)
            && !self.round_masks[g.round].contains(player)
    }

    /// Players eligible for `game`: not in its round and not unavailable.
    pub fn eligible_for(&self, game: usize) -> PlayerMask {
        let g = &self.games[game];
        let all: PlayerMask = (0..self.played.len()).collect();
        all.difference(g.unavailable.union(self.round_masks[g.round]))
    }

    /// Places `player` in `game`.
    ///
    /// # Errors
    ///
    /// Fails without mutating anything if either index is out of range, the
    /// player already plays in the game's round, is already in the game, or
    /// is unavailable for it.
    pub fn assign(
        &mut self,
        problem: &Problem,
        game: usize,
        player: usize,
    ) -> Result<(), ScheduleError> {
        let facts = problem
            .player(player)
            .ok_or(ScheduleError::PlayerOutOfRange(player))?;
        let g = self
            .games
            .get_mut(game)
            .ok_or(ScheduleError::GameOutOfRange(game))?;
        if g.assigned.contains(player) {
            return Err(ScheduleError::AlreadyInGame { player, game });
        }
        if g.unavailable.contains(player) {
            return Err(ScheduleError::Unavailable { player, game });
        }
        let round = g.round;
        if self.round_masks[round].contains(player) {
            return Err(ScheduleError::AlreadyInRound { player, round });
        }

        g.score += i64::from(facts.score);
        g.leaders += u32::from(facts.leader);
        g.goalkeepers += u32::from(facts.goalkeeper);
        g.occupancy += facts.weight;
        for &other in &g.players {
            self.together.increment_pair(other, player);
        }
        g.players.push(player);
        g.assigned.insert(player);
        self.round_masks[round].insert(player);
        self.played[player] += 1;
        Ok(())
    }

    /// Removes `player` from `game`; the exact inverse of [`assign`](Self::assign).
    ///
    /// # Errors
    ///
    /// Fails without mutating anything if either index is out of range or
    /// the player is not in the game.
    pub fn unassign(
        &mut self,
        problem: &Problem,
        game: usize,
        player: usize,
    ) -> Result<(), ScheduleError> {
        let facts = problem
            .player(player)
            .ok_or(ScheduleError::PlayerOutOfRange(player))?;
        let g = self
            .games
            .get_mut(game)
            .ok_or(ScheduleError::GameOutOfRange(game))?;
        let Some(pos) = g.players.iter().position(|&p| p == player) else {
            return Err(ScheduleError::NotInGame { player, game });
        };

        g.players.remove(pos);
        g.score -= i64::from(facts.score);
        g.leaders -= u32::from(facts.leader);
        g.goalkeepers -= u32::from(facts.goalkeeper);
        g.occupancy -= facts.weight;
        for &other in &g.players {
            self.together.decrement_pair(other, player);
        }
        g.assigned.remove(player);
        self.round_masks[g.round].remove(player);
        self.played[player] -= 1;
        Ok(())
    }

    /// Recomputes every derived structure from the game rosters and checks
    /// it against the incremental bookkeeping.
    ///
    /// Returns a description of the first mismatch found.
    pub fn check_consistency(&self, problem: &Problem) -> Result<(), String> {
        let n = self.played.len();
        let mut together = TogetherMatrix::new(n);
        let mut played = vec![0u32; n];
        let mut round_masks = vec![PlayerMask::EMPTY; self.round_masks.len()];

        for g in &self.games {
            let mut score = 0i64;
            let mut occupancy = 0u32;
            for (k, &p) in g.players.iter().enumerate() {
                if g.unavailable.contains(p) {
                    return Err(format!("player {p} is unavailable for game {}", g.index));
                }
                if round_masks[g.round].contains(p) {
                    return Err(format!("player {p} plays twice in round {}", g.round));
                }
                round_masks[g.round].insert(p);
                played[p] += 1;
                score += i64::from(problem.players()[p].score);
                occupancy += problem.players()[p].weight;
                for &q in &g.players[..k] {
                    together.increment_pair(p, q);
                }
            }
            if g.players.iter().copied().collect::<PlayerMask>() != g.assigned {
                return Err(format!("game {} mask disagrees with its roster", g.index));
            }
            if score != g.score || occupancy != g.occupancy {
                return Err(format!("game {} aggregates are stale", g.index));
            }
        }

        if round_masks != self.round_masks {
            return Err("round masks are stale".into());
        }
        if played != self.played {
            return Err("per-player counts are stale".into());
        }
        if together != self.together {
            return Err("together matrix is stale".into());
        }
        Ok(())
    }
}
