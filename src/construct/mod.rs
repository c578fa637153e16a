//! Construction heuristics.
//!
//! Each heuristic fills a copy of the empty template schedule. All of them
//! go through [`Schedule::assign`], so the result is structurally valid even
//! when some game stays below capacity; [`Construction`] reports those
//! games instead of hiding them.
//!
//! # Strategies
//!
//! | [`Strategy`] | Heuristic | Uses the generator |
//! |--------------|-----------|--------------------|
//! | `RoundRobin` | [`RoundRobinFill`] | no |
//! | `PairSeed` | [`PairSeedPropagate`] | tie-breaks, trimming |
//! | `WeightedRandom` | [`WeightedRandomGreedy`] | every pick |
//! | `Balanced` | [`BalancedFill`] | no |

mod balanced;
mod pair_seed;
mod round_robin;
mod types;
mod weighted_random;

pub use balanced::BalancedFill;
pub use pair_seed::PairSeedPropagate;
pub use round_robin::RoundRobinFill;
pub use types::{Construction, ConstructionHeuristic, Shortfall, Strategy};
pub use weighted_random::WeightedRandomGreedy;

use rand::Rng;

use crate::error::ScheduleError;
use crate::model::{Problem, Schedule};

/// Runs `heuristic` on a fresh copy of the template.
///
/// # Errors
///
/// Only a broken `assign` contract inside the heuristic. An under-filled
/// result is reported through [`Construction::shortfall`].
pub fn build_with<H, R>(
    heuristic: &H,
    problem: &Problem,
    rng: &mut R,
) -> Result<Construction, ScheduleError>
where
    H: ConstructionHeuristic,
    R: Rng,
{
    let mut schedule: Schedule = problem.empty_schedule();
    heuristic.fill(problem, &mut schedule, rng)?;
    Ok(Construction::from_schedule(problem, schedule))
}

/// Runs the heuristic selected by `strategy`.
///
/// `rounds_per_team` only affects [`Strategy::PairSeed`].
///
/// # Examples
///
/// ```
/// use u_roster::construct::{construct, Strategy};
/// use u_roster::model::{GameSpec, PlayerSpec, Problem};
/// use u_numflow::random::create_rng;
///
/// let players = (0..4).map(|i| PlayerSpec::new(format!("p{i}"), 10 * i)).collect();
/// let games = vec![GameSpec::new(0, "18:00", "A"), GameSpec::new(0, "18:00", "B")];
/// let problem = Problem::new(players, games, 2).unwrap();
///
/// let built = construct(&problem, Strategy::RoundRobin, 2, &mut create_rng(1)).unwrap();
/// assert!(built.is_complete());
/// ```
pub fn construct<R: Rng>(
    problem: &Problem,
    strategy: Strategy,
    rounds_per_team: usize,
    rng: &mut R,
) -> Result<Construction, ScheduleError> {
    match strategy {
        Strategy::RoundRobin => build_with(&RoundRobinFill, problem, rng),
        Strategy::PairSeed => build_with(&PairSeedPropagate { rounds_per_team }, problem, rng),
        Strategy::WeightedRandom => build_with(&WeightedRandomGreedy, problem, rng),
        Strategy::Balanced => build_with(&BalancedFill, problem, rng),
    }
}

/// Folds `no` into `0..range` going up and then back down:
/// `0, 1, .., range-1, range-1, .., 0, 0, 1, ..`.
///
/// `range` must be positive.
pub fn ping_pong(no: usize, range: usize) -> usize {
    debug_assert!(range > 0);
    let no = no % (2 * range);
    if no < range {
        no
    } else {
        (range - 1) - (no % range)
    }
}
