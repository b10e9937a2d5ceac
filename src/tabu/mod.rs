//! Tabu search engine for the Social Golfer Problem.
//!
//! A single-solution trajectory search: each step picks a conflicted
//! assignment and swaps it with a same-week player from another group,
//! guided by short-term pair memory ([`PairTabuList`]) to prevent cycling
//! and an aspiration override for moves that beat the best schedule seen.
//! The outer [`TabuSolver`] loop re-randomizes on stagnation and keeps the
//! best solution found.
//!
//! # References
//!
//! - Dotú, I. & Van Hentenryck, P. (2005). "Scheduling Social Golfers
//!   Locally", *CPAIOR 2005*, LNCS 3524, 155-167.
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on
//!   Computing* 1(3), 190-206.

mod config;
mod memory;
mod search;
mod solver;

pub use config::SolverConfig;
pub use memory::PairTabuList;
pub use search::{local_search_step, StepOutcome};
pub use solver::{SolverResult, TabuSolver, Termination};
