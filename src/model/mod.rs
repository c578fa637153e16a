//! Roster, calendar and schedule state.
//!
//! # Key Types
//!
//! - [`Problem`]: validated, immutable roster and calendar plus the empty
//!   template schedule
//! - [`Schedule`]: a mutable assignment of players to games with its
//!   incremental bookkeeping
//! - [`PlayerMask`]: 32-bit player set used for every membership test
//! - [`TogetherMatrix`]: symmetric shared-games counter
//!
//! Entities reference each other by index only. A schedule never holds a
//! reference into the problem; operations take `&Problem` explicitly.

mod entity;
mod mask;
mod matrix;
mod schedule;

pub use entity::{GameInfo, GameSpec, Player, PlayerSpec, Problem};
pub use mask::{PlayerMask, MAX_PLAYERS};
pub use matrix::TogetherMatrix;
pub use schedule::{Game, Schedule, SwapLog};

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small rosters shared by the unit tests.

    use super::{GameSpec, PlayerSpec, Problem};

    /// `players` players with scores `10, 20, ...`, `rounds` rounds of
    /// `games_per_round` games each, `capacity` slots per game.
    pub fn league(players: usize, rounds: usize, games_per_round: usize, capacity: u32) -> Problem {
        let roster = (0..players)
            .map(|i| {
                let mut spec = PlayerSpec::new(format!("p{i}"), 10 * (i as i32 + 1));
                if i % 4 == 0 {
                    spec = spec.with_leader();
                }
                if i % 5 == 1 {
                    spec = spec.with_goalkeeper();
                }
                spec
            })
            .collect();
        let calendar = (0..rounds)
            .flat_map(|r| {
                (0..games_per_round)
                    .map(move |g| GameSpec::new(r as i32, format!("{r}:00"), format!("court {g}")))
            })
            .collect();
        Problem::new(roster, calendar, capacity).expect("fixture is valid")
    }

    /// Like [`league`] but player `blocked` is unavailable for game `game`.
    pub fn league_with_block(
        players: usize,
        rounds: usize,
        games_per_round: usize,
        capacity: u32,
        blocked: usize,
        game: usize,
    ) -> Problem {
        let roster = (0..players)
            .map(|i| {
                let spec = PlayerSpec::new(format!("p{i}"), 10 * (players - i) as i32);
                if i == blocked {
                    spec.with_unavailable(vec![game])
                } else {
                    spec
                }
            })
            .collect();
        let calendar = (0..rounds)
            .flat_map(|r| (0..games_per_round).map(move |_| GameSpec::new(r as i32, "", "")))
            .collect();
        Problem::new(roster, calendar, capacity).expect("fixture is valid")
    }
}
