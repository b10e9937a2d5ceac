//! The outer tabu search loop.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::SgpError;
use crate::model::Schedule;

use super::config::SolverConfig;
use super::memory::PairTabuList;
use super::search::local_search_step;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A zero-conflict schedule was reached.
    Converged,
    /// The iteration budget ran out first.
    BudgetExhausted,
}

/// Outcome of a [`TabuSolver::run`].
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Objective of the best schedule found (0 means feasible).
    pub best_eval: u32,
    /// Outer iterations executed.
    pub iterations: usize,
    /// Iteration at which the best schedule was found.
    pub best_iteration: usize,
    /// Stagnation restarts performed.
    pub restarts: usize,
    /// Wall time of the run.
    pub elapsed: Duration,
    /// Why the run stopped.
    pub termination: Termination,
}

/// Tabu solver: repeated local-search steps with best-solution tracking
/// and restart-on-stagnation.
///
/// Owns the tabu memory and the random source. The source is seeded from
/// the configuration when a seed is given (reproducible runs) and from
/// system entropy otherwise.
pub struct TabuSolver {
    config: SolverConfig,
    tabu: PairTabuList,
    rng: StdRng,
}

impl TabuSolver {
    /// Builds a solver sized for `schedule`. Rejects invalid
    /// configurations (inverted tabu tenure bounds).
    pub fn new(schedule: &Schedule, config: SolverConfig) -> Result<Self, SgpError> {
        config.validate()?;
        let tabu = PairTabuList::new(schedule.weeks(), config.min_tabu, config.max_tabu)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self { config, tabu, rng })
    }

    /// Runs the search on `schedule`.
    ///
    /// Clears the tabu memory, draws a fresh random solution, and
    /// iterates up to `max_tries` times: stop on a zero objective, run
    /// one local-search step, track the best schedule seen, and after
    /// `max_stable_tries` iterations without improvement clear the tabu
    /// memory and re-randomize the working solution (the best snapshot is
    /// untouched). The tabu iteration counter advances once per outer
    /// iteration.
    ///
    /// On exit, converged or budget exhausted, `schedule` holds the
    /// best solution found.
    pub fn run(&mut self, schedule: &mut Schedule) -> Result<SolverResult, SgpError> {
        let start = Instant::now();

        self.tabu.clear_all();
        schedule.init_random_solution(&mut self.rng);
        let mut best = schedule.clone();
        let mut best_iteration = 0;
        let mut stable = 0usize;
        let mut restarts = 0usize;
        let mut tries = 0usize;

        let termination = loop {
            if tries >= self.config.max_tries {
                break Termination::BudgetExhausted;
            }
            if schedule.eval() == 0 {
                break Termination::Converged;
            }

            local_search_step(schedule, &mut self.tabu, &mut self.rng, best.eval())?;

            if schedule.eval() < best.eval() {
                log::debug!(
                    "new best objective {} at iteration {tries}",
                    schedule.eval()
                );
                best = schedule.clone();
                best_iteration = tries;
                stable = 0;
            } else if stable > self.config.max_stable_tries {
                log::debug!(
                    "no improvement for {stable} iterations, restarting (best {})",
                    best.eval()
                );
                self.tabu.clear_all();
                schedule.init_random_solution(&mut self.rng);
                stable = 0;
                restarts += 1;
            } else {
                stable += 1;
            }

            tries += 1;
            self.tabu.advance_iteration();
        };

        // A restart can leave the working solution ahead of the snapshot
        // right at the exit boundary; converging does so always.
        if schedule.eval() < best.eval() {
            best = schedule.clone();
            best_iteration = tries;
        }
        *schedule = best;

        let result = SolverResult {
            best_eval: schedule.eval(),
            iterations: tries,
            best_iteration,
            restarts,
            elapsed: start.elapsed(),
            termination,
        };
        log::info!(
            "tabu search stopped after {} iteration(s): objective {}, {} restart(s), {:?}",
            result.iterations,
            result.best_eval,
            result.restarts,
            result.elapsed
        );
        Ok(result)
    }
}
