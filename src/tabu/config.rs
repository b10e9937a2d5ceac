//! Solver configuration.

use crate::error::SgpError;

/// Configuration parameters for the tabu solver.
///
/// Defaults match the standard tool invocation: a 10,000-iteration budget,
/// restart after 300 iterations without improvement, and tabu tenure drawn
/// from `[4, 100]`.
///
/// # Examples
///
/// ```
/// use sgp_tabu::tabu::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_max_tries(50_000)
///     .with_max_stable_tries(500)
///     .with_seed(42);
/// assert_eq!(config.max_tries, 50_000);
/// assert_eq!(config.max_stable_tries, 500);
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Outer iteration budget.
    pub max_tries: usize,
    /// Iterations without improvement tolerated before a restart.
    pub max_stable_tries: usize,
    /// Lower tabu tenure bound (iterations).
    pub min_tabu: u64,
    /// Upper tabu tenure bound (iterations).
    pub max_tabu: u64,
    /// Random seed (`None` for system entropy).
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_tries: 10_000,
            max_stable_tries: 300,
            min_tabu: 4,
            max_tabu: 100,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the outer iteration budget.
    pub fn with_max_tries(mut self, n: usize) -> Self {
        self.max_tries = n;
        self
    }

    /// Sets the stagnation threshold before a restart.
    pub fn with_max_stable_tries(mut self, n: usize) -> Self {
        self.max_stable_tries = n;
        self
    }

    /// Sets the tabu tenure bounds.
    pub fn with_tabu_tenure(mut self, min: u64, max: u64) -> Self {
        self.min_tabu = min;
        self.max_tabu = max;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects configurations with inverted tenure bounds.
    pub fn validate(&self) -> Result<(), SgpError> {
        if self.min_tabu > self.max_tabu {
            return Err(SgpError::InvalidTenureBounds {
                min: self.min_tabu,
                max: self.max_tabu,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.max_tries, 10_000);
        assert_eq!(config.max_stable_tries, 300);
        assert_eq!(config.min_tabu, 4);
        assert_eq!(config.max_tabu, 100);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = SolverConfig::default()
            .with_max_tries(1000)
            .with_max_stable_tries(50)
            .with_tabu_tenure(2, 6)
            .with_seed(123);

        assert_eq!(config.max_tries, 1000);
        assert_eq!(config.max_stable_tries, 50);
        assert_eq!(config.min_tabu, 2);
        assert_eq!(config.max_tabu, 6);
        assert_eq!(config.seed, Some(123));
    }

    #[test]
    fn test_validate_rejects_inverted_tenure() {
        let config = SolverConfig::default().with_tabu_tenure(10, 3);
        assert_eq!(
            config.validate(),
            Err(SgpError::InvalidTenureBounds { min: 10, max: 3 })
        );
        assert!(SolverConfig::default().validate().is_ok());
    }
}
