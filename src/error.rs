//! Error type shared by roster validation, schedule mutation and construction.
//!
//! Two kinds of failure pass through [`ScheduleError`]:
//!
//! - **Input/config errors**: raised once, when a [`Problem`](crate::model::Problem)
//!   or a configuration is built.
//! - **Contract violations**: raised by [`Schedule::assign`](crate::model::Schedule::assign)
//!   and [`Schedule::unassign`](crate::model::Schedule::unassign) when a caller
//!   breaks a precondition. These indicate a bug in the caller and are
//!   propagated, never swallowed.
//!
//! Expected search outcomes (a rejected swap, a fixed point) are not errors;
//! see [`PerturbOutcome`](crate::perturb::PerturbOutcome).

use thiserror::Error;

use crate::construct::Shortfall;

/// Errors produced by the roster engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The roster has no players.
    #[error("roster is empty")]
    EmptyRoster,

    /// The calendar has no games.
    #[error("calendar is empty")]
    EmptyCalendar,

    /// More players than the bitmask representation can hold.
    #[error("roster has {count} players, at most {max} are supported")]
    TooManyPlayers {
        /// Players supplied.
        count: usize,
        /// Hard ceiling.
        max: usize,
    },

    /// A player occupies no capacity.
    #[error("player '{player}' has weight 0")]
    ZeroWeight {
        /// Player name.
        player: String,
    },

    /// A player references a game that is not in the calendar.
    #[error("player '{player}' references unknown game {game}")]
    UnknownGame {
        /// Player name.
        player: String,
        /// Game index as given.
        game: usize,
    },

    /// After re-basing, a round between the first and the last has no games.
    #[error("round {missing} has no games; rounds must be contiguous")]
    RoundGap {
        /// The empty round (0-based).
        missing: usize,
    },

    /// Player index outside the roster.
    #[error("player index {0} is out of range")]
    PlayerOutOfRange(usize),

    /// Game index outside the calendar.
    #[error("game index {0} is out of range")]
    GameOutOfRange(usize),

    /// The player already occupies a game in this round.
    #[error("player {player} already plays in round {round}")]
    AlreadyInRound {
        /// Player index.
        player: usize,
        /// Round of the target game.
        round: usize,
    },

    /// The player is already assigned to this game.
    #[error("player {player} is already assigned to game {game}")]
    AlreadyInGame {
        /// Player index.
        player: usize,
        /// Game index.
        game: usize,
    },

    /// The player may never be placed in this game.
    #[error("player {player} is unavailable for game {game}")]
    Unavailable {
        /// Player index.
        player: usize,
        /// Game index.
        game: usize,
    },

    /// The player is not assigned to this game.
    #[error("player {player} is not assigned to game {game}")]
    NotInGame {
        /// Player index.
        player: usize,
        /// Game index.
        game: usize,
    },

    /// A construction heuristic could not fill every game to capacity.
    #[error("construction left {} game(s) below capacity", .shortfall.len())]
    Incomplete {
        /// Games that stayed below capacity.
        shortfall: Vec<Shortfall>,
    },

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
