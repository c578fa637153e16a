//! Strategy selector and construction report.

use rand::Rng;

use crate::error::ScheduleError;
use crate::model::{Problem, Schedule};

/// Builds a first schedule from the empty template.
///
/// Implementations fill `schedule` in place through
/// [`Schedule::assign`], so every structural invariant holds whatever
/// they manage to place. Reaching full capacity is best-effort; the caller
/// inspects the result with [`Construction::from_schedule`].
pub trait ConstructionHeuristic {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    /// Fills `schedule`, which starts as a copy of the template.
    fn fill<R: Rng>(
        &self,
        problem: &Problem,
        schedule: &mut Schedule,
        rng: &mut R,
    ) -> Result<(), ScheduleError>;
}

/// Which construction heuristic to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Rotating queue, alternating front-to-back and back-to-front.
    RoundRobin,
    /// Seed one round per team, grow it by first-ever pairings, copy it.
    PairSeed,
    /// Most constrained game first, half-normal pick over a ranked pool.
    #[default]
    WeightedRandom,
    /// Each player into the least occupied game, then top up every game.
    Balanced,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::RoundRobin => "round-robin",
            Strategy::PairSeed => "pair-seed",
            Strategy::WeightedRandom => "weighted-random",
            Strategy::Balanced => "balanced",
        }
    }
}

/// A game left below capacity by a construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shortfall {
    /// Calendar index.
    pub game: usize,
    /// Occupied weight units.
    pub filled: u32,
    /// Required weight units.
    pub capacity: u32,
}

/// Output of a construction heuristic.
///
/// Always structurally valid. `shortfall` lists every game below capacity;
/// an empty list means the schedule is complete.
#[derive(Debug, Clone)]
pub struct Construction {
    pub schedule: Schedule,
    pub shortfall: Vec<Shortfall>,
}

impl Construction {
    /// Wraps `schedule` and records the games it leaves below capacity.
    pub fn from_schedule(problem: &Problem, schedule: Schedule) -> Self {
        let capacity = problem.players_per_game();
        let shortfall = schedule
            .games()
            .iter()
            .filter(|g| g.occupancy() < capacity)
            .map(|g| Shortfall {
                game: g.index(),
                filled: g.occupancy(),
                capacity,
            })
            .collect();
        Self {
            schedule,
            shortfall,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall.is_empty()
    }

    /// The schedule if every game reached capacity.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::Incomplete`] carrying the shortfall otherwise.
    pub fn into_complete(self) -> Result<Schedule, ScheduleError> {
        if self.shortfall.is_empty() {
            Ok(self.schedule)
        } else {
            Err(ScheduleError::Incomplete {
                shortfall: self.shortfall,
            })
        }
    }
}
