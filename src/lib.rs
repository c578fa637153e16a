//! Fair-roster scheduling engine.
//!
//! Assigns a roster of players to a calendar of games, grouped into
//! rounds, so that play is as even as possible: equal game counts, equal
//! exposure to teammates, balanced team scores, leader and goalkeeper
//! coverage. It is a stochastic local search, not an exact solver.
//!
//! - **Model**: validated roster and calendar ([`model::Problem`]) and the
//!   mutable assignment ([`model::Schedule`]) with bitmask-indexed
//!   constraint checks and a shared-games matrix.
//! - **Stats**: pure fairness snapshot of a schedule.
//! - **Compare**: lexicographic multi-criterion ranking of two snapshots.
//! - **Construct**: interchangeable heuristics that build a first schedule.
//! - **Perturb**: a randomized swap that covers pairs who never met.
//! - **Driver**: the hill-climbing loop with bounded patience and
//!   cooperative cancellation.
//!
//! # Architecture
//!
//! Entities refer to each other by index. A [`model::Problem`] is built
//! once and passed by reference; every working schedule is a clone of its
//! template or of an earlier schedule and is exclusively owned. Randomness
//! comes from a single seeded generator (`u_numflow::random::create_rng`).
//! Reading rosters from files and rendering schedules are left to callers.

pub mod compare;
pub mod construct;
pub mod driver;
pub mod error;
pub mod model;
pub mod perturb;
pub mod random;
pub mod stats;

pub use error::ScheduleError;
