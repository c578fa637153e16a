//! Immutable roster and calendar facts.
//!
//! Callers describe players and games with [`PlayerSpec`] and [`GameSpec`].
//! [`Problem::new`] validates them once, assigns stable indices and builds
//! the empty template schedule every run starts from.

use crate::error::ScheduleError;

use super::mask::{PlayerMask, MAX_PLAYERS};
use super::schedule::Schedule;

/// Caller-supplied description of one player.
///
/// # Examples
///
/// ```
/// use u_roster::model::PlayerSpec;
///
/// let keeper = PlayerSpec::new("Alva", 42)
///     .with_goalkeeper()
///     .with_unavailable(vec![3, 4]);
/// assert!(keeper.goalkeeper);
/// assert_eq!(keeper.weight, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSpec {
    /// Display name. Opaque to the engine.
    pub name: String,
    /// Skill score used for team balancing.
    pub score: i32,
    /// Counts toward a game's leader quota.
    pub leader: bool,
    /// Counts toward goalkeeper coverage.
    pub goalkeeper: bool,
    /// Game slots this player occupies. Must be at least 1.
    pub weight: u32,
    /// Games the player is allowed to miss; credited toward the
    /// games-per-player target.
    pub allowed_absences: u32,
    /// Calendar indices of games the player can never be placed in.
    pub unavailable: Vec<usize>,
    /// Calendar indices of games the player is excused from.
    ///
    /// Excused games are unavailable. Every round in which the player is
    /// excused from all games also adds one allowed absence.
    pub excused: Vec<usize>,
}

impl PlayerSpec {
    /// A player with weight 1 and no flags or restrictions.
    pub fn new(name: impl Into<String>, score: i32) -> Self {
        Self {
            name: name.into(),
            score,
            leader: false,
            goalkeeper: false,
            weight: 1,
            allowed_absences: 0,
            unavailable: Vec::new(),
            excused: Vec::new(),
        }
    }

    /// Marks the player as a leader.
    pub fn with_leader(mut self) -> Self {
        self.leader = true;
        self
    }

    /// Marks the player as a goalkeeper.
    pub fn with_goalkeeper(mut self) -> Self {
        self.goalkeeper = true;
        self
    }

    /// Sets the game slots the player occupies.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the games the player may miss.
    pub fn with_allowed_absences(mut self, n: u32) -> Self {
        self.allowed_absences = n;
        self
    }

    /// Sets the games the player can never join.
    pub fn with_unavailable(mut self, games: Vec<usize>) -> Self {
        self.unavailable = games;
        self
    }

    /// Sets the games the player is excused from.
    pub fn with_excused(mut self, games: Vec<usize>) -> Self {
        self.excused = games;
        self
    }
}

/// Caller-supplied description of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSpec {
    /// Round number. Any integer; the smallest round becomes round 0.
    pub round: i32,
    /// Display time. Opaque to the engine.
    pub time: String,
    /// Display description. Opaque to the engine.
    pub description: String,
}

impl GameSpec {
    /// A game in `round` with opaque display fields.
    pub fn new(round: i32, time: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            round,
            time: time.into(),
            description: description.into(),
        }
    }
}

/// A validated, indexed player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable index in `0..player_count`, by descending score.
    pub index: usize,
    pub name: String,
    pub score: i32,
    pub leader: bool,
    pub goalkeeper: bool,
    pub weight: u32,
    /// Declared absences plus rounds fully excused.
    pub allowed_absences: u32,
}

/// A validated, indexed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    /// Position in the calendar as supplied.
    pub index: usize,
    /// 0-based contiguous round.
    pub round: usize,
    pub time: String,
    pub description: String,
    /// Players that may never be placed in this game.
    pub unavailable: PlayerMask,
}

/// The immutable per-run context: roster, calendar, capacity and the
/// empty template schedule.
#[derive(Debug, Clone)]
pub struct Problem {
    players: Vec<Player>,
    games: Vec<GameInfo>,
    round_count: usize,
    players_per_game: u32,
    target_games: u32,
    template: Schedule,
}

impl Problem {
    /// Validates the roster and calendar and indexes them.
    ///
    /// - Rounds are re-based so the smallest is 0, and must be contiguous.
    /// - Players are indexed by descending score; ties keep input order.
    /// - Unavailable and excused game indices refer to `games` positions.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] for an empty roster or calendar, more than
    /// [`MAX_PLAYERS`] players, a zero weight, an unknown game index or a
    /// gap in the rounds. `players_per_game == 0`, a total weight beyond
    /// `u32` or a games-per-player target beyond `u32` is an
    /// [`InvalidConfig`](ScheduleError::InvalidConfig).
    pub fn new(
        players: Vec<PlayerSpec>,
        games: Vec<GameSpec>,
        players_per_game: u32,
    ) -> Result<Self, ScheduleError> {
        if players.is_empty() {
            return Err(ScheduleError::EmptyRoster);
        }
        if games.is_empty() {
            return Err(ScheduleError::EmptyCalendar);
        }
        if players.len() > MAX_PLAYERS {
            return Err(ScheduleError::TooManyPlayers {
                count: players.len(),
                max: MAX_PLAYERS,
            });
        }
        if players_per_game == 0 {
            return Err(ScheduleError::InvalidConfig(
                "players_per_game must be positive".into(),
            ));
        }

        let min_round = games.iter().map(|g| g.round).min().unwrap_or(0);
        let rounds: Vec<usize> = games
            .iter()
            .map(|g| (i64::from(g.round) - i64::from(min_round)) as usize)
            .collect();
        let round_count = rounds.iter().max().map_or(0, |&r| r + 1);
        if let Some(missing) = (0..round_count).find(|r| !rounds.contains(r)) {
            return Err(ScheduleError::RoundGap { missing });
        }

        for spec in &players {
            if spec.weight == 0 {
                return Err(ScheduleError::ZeroWeight {
                    player: spec.name.clone(),
                });
            }
            if let Some(&game) = spec
                .unavailable
                .iter()
                .chain(spec.excused.iter())
                .find(|&&g| g >= games.len())
            {
                return Err(ScheduleError::UnknownGame {
                    player: spec.name.clone(),
                    game,
                });
            }
        }

        let mut order: Vec<usize> = (0..players.len()).collect();
        order.sort_by(|&a, &b| players[b].score.cmp(&players[a].score));

        let mut game_infos: Vec<GameInfo> = games
            .into_iter()
            .zip(&rounds)
            .enumerate()
            .map(|(index, (spec, &round))| GameInfo {
                index,
                round,
                time: spec.time,
                description: spec.description,
                unavailable: PlayerMask::EMPTY,
            })
            .collect();

        let mut indexed = Vec::with_capacity(players.len());
        for (index, &original) in order.iter().enumerate() {
            let spec = &players[original];
            for &g in spec.unavailable.iter().chain(spec.excused.iter()) {
                game_infos[g].unavailable.insert(index);
            }
            let excused_rounds = (0..round_count)
                .filter(|&r| {
                    let mut in_round = rounds
                        .iter()
                        .enumerate()
                        .filter(|&(_, &gr)| gr == r)
                        .map(|(g, _)| g);
                    in_round.all(|g| spec.excused.contains(&g))
                })
                .count() as u32;

            indexed.push(Player {
                index,
                name: spec.name.clone(),
                score: spec.score,
                leader: spec.leader,
                goalkeeper: spec.goalkeeper,
                weight: spec.weight,
                allowed_absences: spec.allowed_absences.saturating_add(excused_rounds),
            });
        }

        let total_weight = indexed
            .iter()
            .try_fold(0u32, |acc, p| acc.checked_add(p.weight))
            .ok_or_else(|| {
                ScheduleError::InvalidConfig("total player weight overflows".into())
            })?;
        let slots = u64::from(players_per_game) * game_infos.len() as u64;
        let target_games = u32::try_from(slots / u64::from(total_weight)).map_err(|_| {
            ScheduleError::InvalidConfig(format!(
                "players_per_game {players_per_game} gives a games-per-player target out of range"
            ))
        })?;
        let template = Schedule::empty(&indexed, &game_infos, round_count);

        Ok(Self {
            players: indexed,
            games: game_infos,
            round_count,
            players_per_game,
            target_games,
            template,
        })
    }

    /// Players in index order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Games in calendar order.
    pub fn games(&self) -> &[GameInfo] {
        &self.games
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn round_count(&self) -> usize {
        self.round_count
    }

    /// Capacity of every game, in weight units.
    pub fn players_per_game(&self) -> u32 {
        self.players_per_game
    }

    /// Games each player should reach: `players_per_game × games / Σ weight`.
    pub fn target_games(&self) -> u32 {
        self.target_games
    }

    /// The canonical empty schedule. Never mutated.
    pub fn template(&self) -> &Schedule {
        &self.template
    }

    /// A fresh, mutable copy of the template.
    pub fn empty_schedule(&self) -> Schedule {
        self.template.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> Vec<GameSpec> {
        vec![
            GameSpec::new(3, "10:00", "A"),
            GameSpec::new(3, "10:00", "B"),
            GameSpec::new(4, "11:00", "A"),
            GameSpec::new(4, "11:00", "B"),
        ]
    }

    #[test]
    fn test_rounds_are_rebased() {
        let players = vec![PlayerSpec::new("a", 1), PlayerSpec::new("b", 2)];
        let problem = Problem::new(players, calendar(), 2).unwrap();
        let rounds: Vec<usize> = problem.games().iter().map(|g| g.round).collect();
        assert_eq!(rounds, vec![0, 0, 1, 1]);
        assert_eq!(problem.round_count(), 2);
    }

    #[test]
    fn test_players_indexed_by_descending_score() {
        let players = vec![
            PlayerSpec::new("low", 10),
            PlayerSpec::new("high", 40),
            PlayerSpec::new("mid", 20),
            PlayerSpec::new("mid2", 20),
        ];
        let problem = Problem::new(players, calendar(), 2).unwrap();
        let names: Vec<&str> = problem.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "mid2", "low"]);
        for (i, p) in problem.players().iter().enumerate() {
            assert_eq!(p.index, i);
        }
    }

    #[test]
    fn test_unavailability_follows_reindexing() {
        let players = vec![
            PlayerSpec::new("low", 10).with_unavailable(vec![2]),
            PlayerSpec::new("high", 40),
        ];
        let problem = Problem::new(players, calendar(), 2).unwrap();
        // "low" is index 1 after sorting.
        assert!(problem.games()[2].unavailable.contains(1));
        assert!(!problem.games()[2].unavailable.contains(0));
    }

    #[test]
    fn test_target_games() {
        let players = (0..4).map(|i| PlayerSpec::new(format!("p{i}"), i)).collect();
        let problem = Problem::new(players, calendar(), 3).unwrap();
        // 3 slots * 4 games / 4 weight
        assert_eq!(problem.target_games(), 3);
    }

    #[test]
    fn test_target_games_counts_weight() {
        let players = vec![
            PlayerSpec::new("a", 1).with_weight(2),
            PlayerSpec::new("b", 1),
            PlayerSpec::new("c", 1),
        ];
        let problem = Problem::new(players, calendar(), 2).unwrap();
        assert_eq!(problem.target_games(), 2);
    }

    #[test]
    fn test_excused_full_round_adds_absence() {
        let players = vec![
            PlayerSpec::new("a", 1).with_excused(vec![0, 1, 2]),
            PlayerSpec::new("b", 0).with_allowed_absences(1),
        ];
        let problem = Problem::new(players, calendar(), 2).unwrap();
        // Round 0 fully excused, round 1 only partially.
        assert_eq!(problem.players()[0].allowed_absences, 1);
        assert_eq!(problem.players()[1].allowed_absences, 1);
        assert!(problem.games()[2].unavailable.contains(0));
        assert!(!problem.games()[3].unavailable.contains(0));
    }

    #[test]
    fn test_rejects_too_many_players() {
        let players = (0..33).map(|i| PlayerSpec::new(format!("p{i}"), i)).collect();
        let err = Problem::new(players, calendar(), 2).unwrap_err();
        assert_eq!(err, ScheduleError::TooManyPlayers { count: 33, max: 32 });
    }

    #[test]
    fn test_rejects_unknown_game() {
        let players = vec![PlayerSpec::new("a", 1).with_unavailable(vec![9])];
        let err = Problem::new(players, calendar(), 2).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnknownGame {
                player: "a".into(),
                game: 9
            }
        );
    }

    #[test]
    fn test_rejects_zero_weight() {
        let players = vec![PlayerSpec::new("a", 1).with_weight(0)];
        assert!(matches!(
            Problem::new(players, calendar(), 2),
            Err(ScheduleError::ZeroWeight { .. })
        ));
    }

    #[test]
    fn test_rejects_round_gap() {
        let games = vec![GameSpec::new(0, "", ""), GameSpec::new(2, "", "")];
        let err = Problem::new(vec![PlayerSpec::new("a", 1)], games, 1).unwrap_err();
        assert_eq!(err, ScheduleError::RoundGap { missing: 1 });
    }

    #[test]
    fn test_rejects_oversized_target_without_panicking() {
        let err = Problem::new(vec![PlayerSpec::new("a", 1)], calendar(), 2_000_000_000)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));

        let players = vec![
            PlayerSpec::new("a", 1).with_weight(u32::MAX),
            PlayerSpec::new("b", 2).with_weight(2),
        ];
        assert!(matches!(
            Problem::new(players, calendar(), 2),
            Err(ScheduleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        assert_eq!(
            Problem::new(Vec::new(), calendar(), 2).unwrap_err(),
            ScheduleError::EmptyRoster
        );
        assert_eq!(
            Problem::new(vec![PlayerSpec::new("a", 1)], Vec::new(), 2).unwrap_err(),
            ScheduleError::EmptyCalendar
        );
    }

    #[test]
    fn test_template_is_empty() {
        let players = vec![PlayerSpec::new("a", 1), PlayerSpec::new("b", 2)];
        let problem = Problem::new(players, calendar(), 2).unwrap();
        let template = problem.template();
        assert_eq!(template.games().len(), 4);
        assert!(template.games().iter().all(|g| g.players().is_empty()));
        assert_eq!(template.games_played(0), 0);
    }
}
