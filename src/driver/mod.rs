//! Hill-climbing driver.
//!
//! Starting from a base schedule built by the configured heuristic, each
//! iteration produces one candidate by a fixed four-step rotation:
//!
//! | step | candidate |
//! |------|-----------|
//! | 0 | perturbed copy of the current best |
//! | 1 | perturbed copy of the base schedule |
//! | 2, 3 | fresh construction |
//!
//! A candidate the [`Comparator`](crate::compare::Comparator) prefers
//! replaces the best and resets both counters. A tie increments the win
//! counter; a worse candidate increments the streak counter and resets the
//! win counter. The loop stops when either counter or the iteration count
//! reaches its bound, or when the cancellation flag is observed.
//!
//! # Examples
//!
//! ```
//! use u_roster::driver::{DriverConfig, EngineConfig, Optimizer};
//! use u_roster::model::{GameSpec, PlayerSpec, Problem};
//!
//! let players = (0..8).map(|i| PlayerSpec::new(format!("p{i}"), 10 + i)).collect();
//! let games = (0..4)
//!     .flat_map(|r| [GameSpec::new(r, "19:00", "north"), GameSpec::new(r, "19:00", "south")])
//!     .collect();
//! let problem = Problem::new(players, games, 3).unwrap();
//!
//! let config = DriverConfig::default().with_max_iterations(200).with_seed(1);
//! let result = Optimizer::run(&problem, &EngineConfig::default(), &config).unwrap();
//! assert!(result.iterations <= 200);
//! ```

mod config;
mod runner;
mod types;

pub use config::{DriverConfig, EngineConfig};
pub use runner::Optimizer;
pub use types::{GenerationMode, RunResult, StopReason};
