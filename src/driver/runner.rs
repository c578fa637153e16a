//! Hill-climbing loop.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use rand::Rng;
use u_numflow::random::create_rng;

use super::config::{DriverConfig, EngineConfig};
use super::types::{GenerationMode, RunResult, StopReason};
use crate::compare::Comparator;
use crate::construct::construct;
use crate::error::ScheduleError;
use crate::model::{Problem, Schedule};
use crate::perturb::{PairCoverageMove, PerturbOutcome};
use crate::random::seed_value;
use crate::stats::Stats;

/// Streak and tie counters of a running search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Progress {
    iterations: usize,
    accepted: usize,
    streak: usize,
    wins: usize,
}

impl Progress {
    /// Applies one comparison verdict of candidate against best.
    /// Returns whether the candidate is accepted.
    fn record(&mut self, verdict: Ordering) -> bool {
        match verdict {
            Ordering::Less => {
                self.accepted += 1;
                self.streak = 0;
                self.wins = 0;
                true
            }
            Ordering::Equal => {
                self.wins += 1;
                false
            }
            Ordering::Greater => {
                self.streak += 1;
                self.wins = 0;
                false
            }
        }
    }

    /// The bound that is exhausted, if any. `max_iterations == 0` means no
    /// iteration limit.
    fn exhausted(&self, config: &DriverConfig) -> Option<StopReason> {
        if self.streak >= config.max_streak {
            Some(StopReason::StreakExhausted)
        } else if self.wins >= config.max_wins {
            Some(StopReason::WinsExhausted)
        } else if config.max_iterations > 0 && self.iterations >= config.max_iterations {
            Some(StopReason::IterationLimit)
        } else {
            None
        }
    }
}

/// Runs the improvement loop.
pub struct Optimizer;

impl Optimizer {
    /// Runs the optimization to completion.
    pub fn run(
        problem: &Problem,
        engine: &EngineConfig,
        config: &DriverConfig,
    ) -> Result<RunResult, ScheduleError> {
        Self::run_with_cancel(problem, engine, config, None)
    }

    /// Runs the optimization with an optional cancellation token, polled
    /// once before every iteration.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::InvalidConfig`] if either config fails validation.
    /// - [`ScheduleError::Incomplete`] if the base construction cannot fill
    ///   every game.
    /// - Any `assign`/`unassign` contract violation raised by a heuristic or
    ///   the perturbation move.
    pub fn run_with_cancel(
        problem: &Problem,
        engine: &EngineConfig,
        config: &DriverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult, ScheduleError> {
        engine.validate().map_err(ScheduleError::InvalidConfig)?;
        config.validate().map_err(ScheduleError::InvalidConfig)?;

        let mut rng = create_rng(seed_value(config.seed));
        let comparator = Comparator::new(problem.target_games(), engine.thresholds.clone());
        let swap = engine.swap_move();

        log::info!(
            "optimizing {} players over {} games ({} rounds), strategy {}, target {} games",
            problem.player_count(),
            problem.game_count(),
            problem.round_count(),
            engine.strategy.name(),
            problem.target_games()
        );

        let built = construct(problem, engine.strategy, engine.rounds_per_team, &mut rng)?;
        if !built.is_complete() {
            log::warn!(
                "base schedule leaves {} game(s) below capacity",
                built.shortfall.len()
            );
        }
        let base = built.into_complete()?;

        let mut best = base.clone();
        let mut best_stats = Stats::compute(problem, &best);
        let mut progress = Progress::default();

        let stop_reason = loop {
            if let Some(ref flag) = cancel {
                if flag.load(AtomicOrdering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }
            if let Some(reason) = progress.exhausted(config) {
                break reason;
            }

            let mode = GenerationMode::for_iteration(progress.iterations);
            progress.iterations += 1;

            let candidate = match mode {
                GenerationMode::MutateBest => {
                    mutate(problem, &best, &swap, config.moves_per_candidate, &mut rng)?
                }
                GenerationMode::MutateBase => {
                    mutate(problem, &base, &swap, config.moves_per_candidate, &mut rng)?
                }
                GenerationMode::Rebuild => {
                    let rebuilt =
                        construct(problem, engine.strategy, engine.rounds_per_team, &mut rng)?;
                    if !rebuilt.is_complete() {
                        log::debug!(
                            "iteration {}: rebuild left {} game(s) short, discarded",
                            progress.iterations,
                            rebuilt.shortfall.len()
                        );
                        progress.record(Ordering::Greater);
                        continue;
                    }
                    rebuilt.schedule
                }
            };

            let stats = Stats::compute(problem, &candidate);
            let decision = comparator.decide(&stats, &best_stats);
            let verdict = decision.map_or(Ordering::Equal, |(_, ord)| ord);
            if progress.record(verdict) {
                log::debug!(
                    "iteration {}: accepted {:?} candidate ({:?}), {} uncovered pairs",
                    progress.iterations,
                    mode,
                    decision.map(|(rule, _)| rule),
                    stats.zero_pairs()
                );
                best = candidate;
                best_stats = stats;
            }
        };

        log::info!(
            "stopped after {} iterations ({:?}): {} accepted, streak {}, wins {}",
            progress.iterations,
            stop_reason,
            progress.accepted,
            progress.streak,
            progress.wins
        );

        Ok(RunResult {
            best,
            stats: best_stats,
            iterations: progress.iterations,
            accepted: progress.accepted,
            streak: progress.streak,
            wins: progress.wins,
            stop_reason,
            cancelled: stop_reason == StopReason::Cancelled,
        })
    }
}

/// A copy of `source` after up to `moves` perturbation moves. Stops early
/// at a fixed point.
fn mutate<R: Rng>(
    problem: &Problem,
    source: &Schedule,
    swap: &PairCoverageMove,
    moves: usize,
    rng: &mut R,
) -> Result<Schedule, ScheduleError> {
    let mut schedule = source.clone();
    for _ in 0..moves {
        if swap.apply(problem, &mut schedule, rng)? == PerturbOutcome::Exhausted {
            break;
        }
    }
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Rule;
    use crate::construct::Strategy;
    use crate::model::fixtures::league;
    use crate::model::{GameSpec, PlayerSpec};

    fn quick() -> DriverConfig {
        DriverConfig::default()
            .with_max_streak(200)
            .with_max_wins(200)
            .with_max_iterations(300)
            .with_seed(42)
    }

    #[test]
    fn test_progress_counters() {
        let mut p = Progress::default();
        assert!(!p.record(Ordering::Greater));
        assert!(!p.record(Ordering::Greater));
        assert_eq!((p.streak, p.wins), (2, 0));
        assert!(!p.record(Ordering::Equal));
        assert_eq!((p.streak, p.wins), (2, 1));
        assert!(!p.record(Ordering::Greater));
        assert_eq!(p.wins, 0);
        assert!(p.record(Ordering::Less));
        assert_eq!((p.streak, p.wins, p.accepted), (0, 0, 1));
    }

    #[test]
    fn test_progress_bounds() {
        let config = DriverConfig::default()
            .with_max_streak(3)
            .with_max_wins(2)
            .with_max_iterations(10);
        let mut p = Progress::default();
        assert_eq!(p.exhausted(&config), None);
        p.streak = 3;
        assert_eq!(p.exhausted(&config), Some(StopReason::StreakExhausted));
        p.streak = 0;
        p.wins = 2;
        assert_eq!(p.exhausted(&config), Some(StopReason::WinsExhausted));
        p.wins = 0;
        p.iterations = 10;
        assert_eq!(p.exhausted(&config), Some(StopReason::IterationLimit));

        let unlimited = config.with_max_iterations(0);
        assert_eq!(p.exhausted(&unlimited), None);
    }

    #[test]
    fn test_run_improves_on_base() {
        let problem = league(12, 6, 2, 5);
        let engine = EngineConfig::default();
        let config = quick();

        let base = construct(
            &problem,
            engine.strategy,
            engine.rounds_per_team,
            &mut create_rng(42),
        )
        .unwrap()
        .into_complete()
        .unwrap();
        let base_stats = Stats::compute(&problem, &base);

        let result = Optimizer::run(&problem, &engine, &config).unwrap();
        let comparator = Comparator::new(problem.target_games(), engine.thresholds.clone());
        // Accepted candidates never lose a pass/fail gate the best had passed.
        let lost_gate = matches!(
            comparator.decide(&result.stats, &base_stats),
            Some((
                Rule::MinGames | Rule::Overload | Rule::Leaders | Rule::Coverage,
                Ordering::Greater
            ))
        );
        assert!(!lost_gate);
        assert_eq!(result.stats, Stats::compute(&problem, &result.best));
        assert!(result.best.check_consistency(&problem).is_ok());
        assert!(result.iterations <= 300);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let problem = league(10, 4, 2, 4);
        let engine = EngineConfig::default().with_strategy(Strategy::PairSeed);
        let a = Optimizer::run(&problem, &engine, &quick()).unwrap();
        let b = Optimizer::run(&problem, &engine, &quick()).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.stop_reason, b.stop_reason);
    }

    #[test]
    fn test_cancellation() {
        let problem = league(10, 4, 2, 4);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = Optimizer::run_with_cancel(
            &problem,
            &EngineConfig::default(),
            &quick(),
            Some(cancel),
        )
        .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_iteration_limit() {
        let problem = league(10, 4, 2, 4);
        let config = DriverConfig::default()
            .with_max_iterations(25)
            .with_seed(7);
        let result = Optimizer::run(&problem, &EngineConfig::default(), &config).unwrap();
        assert_eq!(result.iterations, 25);
        assert_eq!(result.stop_reason, StopReason::IterationLimit);
    }

    #[test]
    fn test_fixed_point_ends_on_ties() {
        // Two players sharing the only game: every candidate is identical.
        let players = vec![PlayerSpec::new("a", 1), PlayerSpec::new("b", 2)];
        let problem = Problem::new(players, vec![GameSpec::new(0, "", "")], 2).unwrap();
        let config = DriverConfig::default().with_max_wins(10).with_seed(1);
        for strategy in [Strategy::RoundRobin, Strategy::WeightedRandom] {
            let engine = EngineConfig::default().with_strategy(strategy);
            let result = Optimizer::run(&problem, &engine, &config).unwrap();
            assert_eq!(result.stop_reason, StopReason::WinsExhausted);
            assert_eq!(result.iterations, 10);
            assert_eq!(result.accepted, 0);
        }
    }

    #[test]
    fn test_incomplete_base_is_an_error() {
        let players = vec![PlayerSpec::new("a", 1), PlayerSpec::new("b", 2)];
        let problem = Problem::new(players, vec![GameSpec::new(0, "", "")], 3).unwrap();
        let err = Optimizer::run(&problem, &EngineConfig::default(), &quick()).unwrap_err();
        assert!(matches!(err, ScheduleError::Incomplete { .. }));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let problem = league(4, 1, 2, 2);
        let err = Optimizer::run(
            &problem,
            &EngineConfig::default(),
            &quick().with_max_wins(0),
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));
    }

    #[test]
    fn test_mutate_leaves_source_untouched() {
        let problem = league(6, 3, 2, 3);
        let source = construct(&problem, Strategy::RoundRobin, 2, &mut create_rng(0))
            .unwrap()
            .schedule;
        let before = source.clone();
        let _ = mutate(
            &problem,
            &source,
            &PairCoverageMove::default(),
            10,
            &mut create_rng(5),
        )
        .unwrap();
        assert_eq!(source, before);
    }
}
