//! Engine and driver configuration.

use crate::compare::CompareThresholds;
use crate::construct::Strategy;
use crate::perturb::PairCoverageMove;

/// What the engine builds and how it ranks schedules.
///
/// # Examples
///
/// ```
/// use u_roster::construct::Strategy;
/// use u_roster::driver::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_strategy(Strategy::PairSeed)
///     .with_rounds_per_team(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Construction heuristic for the base schedule and for rebuilds.
    pub strategy: Strategy,

    /// Consecutive rounds sharing one team pattern (`PairSeed` only).
    pub rounds_per_team: usize,

    /// Ranking margins.
    pub thresholds: CompareThresholds,

    /// σ of the score tolerance when choosing swap partners.
    pub swap_score_sigma: f64,

    /// Tolerance draws per partner before taking the closest score.
    pub swap_sample_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            rounds_per_team: 2,
            thresholds: CompareThresholds::default(),
            swap_score_sigma: 50.0,
            swap_sample_attempts: 1000,
        }
    }
}

impl EngineConfig {
    /// Sets the construction heuristic.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the rounds sharing one team pattern.
    pub fn with_rounds_per_team(mut self, n: usize) -> Self {
        self.rounds_per_team = n;
        self
    }

    /// Sets the ranking margins.
    pub fn with_thresholds(mut self, thresholds: CompareThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets σ of the swap score tolerance.
    pub fn with_swap_score_sigma(mut self, sigma: f64) -> Self {
        self.swap_score_sigma = sigma;
        self
    }

    /// Sets the tolerance draws per partner.
    pub fn with_swap_sample_attempts(mut self, n: u32) -> Self {
        self.swap_sample_attempts = n;
        self
    }

    /// The perturbation move these settings describe.
    pub fn swap_move(&self) -> PairCoverageMove {
        PairCoverageMove::default()
            .with_score_sigma(self.swap_score_sigma)
            .with_sample_attempts(self.swap_sample_attempts)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.rounds_per_team == 0 {
            return Err("rounds_per_team must be at least 1".into());
        }
        if !self.swap_score_sigma.is_finite() || self.swap_score_sigma < 0.0 {
            return Err(format!(
                "swap_score_sigma must be finite and non-negative, got {}",
                self.swap_score_sigma
            ));
        }
        self.thresholds.validate()
    }
}

/// Termination bounds and seeding for the improvement loop.
///
/// # Examples
///
/// ```
/// use u_roster::driver::DriverConfig;
///
/// let config = DriverConfig::default()
///     .with_max_iterations(5_000)
///     .with_seed(42);
/// assert_eq!(config.max_streak, 500_000);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverConfig {
    /// Stop after this many consecutive worse candidates.
    pub max_streak: usize,

    /// Stop after this many consecutive ties.
    pub max_wins: usize,

    /// Hard iteration budget.
    pub max_iterations: usize,

    /// Perturbation moves applied to each mutated candidate. Stops early
    /// at a fixed point.
    pub moves_per_candidate: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_streak: 500_000,
            max_wins: 100_000,
            max_iterations: 1_000_000,
            moves_per_candidate: 1,
            seed: None,
        }
    }
}

impl DriverConfig {
    /// Sets the worse-candidate streak bound.
    pub fn with_max_streak(mut self, n: usize) -> Self {
        self.max_streak = n;
        self
    }

    /// Sets the consecutive-tie bound.
    pub fn with_max_wins(mut self, n: usize) -> Self {
        self.max_wins = n;
        self
    }

    /// Sets the iteration budget; 0 means unlimited.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the moves applied per mutated candidate.
    pub fn with_moves_per_candidate(mut self, n: usize) -> Self {
        self.moves_per_candidate = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_streak == 0 {
            return Err("max_streak must be positive".into());
        }
        if self.max_wins == 0 {
            return Err("max_wins must be positive".into());
        }
        if self.moves_per_candidate == 0 {
            return Err("moves_per_candidate must be at least 1".into());
        }
        Ok(())
    }
}
