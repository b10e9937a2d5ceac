//! Incremental conflict-tracking model for the Social Golfer Problem.
//!
//! [`Schedule`] owns the assignment grid, the pairwise conflict matrix,
//! the running objective, and the [`ActiveConflictSet`] working set. Every
//! mutation goes through [`Schedule::assign`], which updates all four in
//! one pass so the objective never has to be recomputed from scratch.

mod conflict_set;
mod decision;
mod schedule;

pub use conflict_set::ActiveConflictSet;
pub use decision::{Decision, Player};
pub use schedule::Schedule;
