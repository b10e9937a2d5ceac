//! Tabu-search solver for the Social Golfer Problem (SGP).
//!
//! The SGP asks for a partition of `P = G * K` players into `G` groups of
//! `K` for each of `W` weeks such that any two players share a group at
//! most once. This crate models the problem as an incremental
//! constraint-satisfaction state and searches for zero-conflict schedules
//! with tabu-guided local search:
//!
//! - **[`model`]**: the conflict-tracking state: assignment grid,
//!   pairwise conflict matrix, incrementally maintained objective, and the
//!   active-conflict working set that focuses the search on players still
//!   involved in a repeated pairing.
//! - **[`tabu`]**: the search engine: per-week pair tabu memory with
//!   randomized tenure, the single-swap local search step, and the outer
//!   solver loop with restart-on-stagnation.
//! - **[`render`]**: textual schedule and conflict-matrix tables for
//!   reporting.
//!
//! # Architecture
//!
//! All mutation funnels through one primitive,
//! [`model::Schedule::assign`], which keeps the objective, the conflict
//! matrix, and the active-conflict set exactly consistent under every
//! single-cell change. The search layers never recompute global state;
//! they read incremental projections and commit swaps through that one
//! entry point.

pub mod error;
pub mod model;
pub mod render;
pub mod tabu;

pub use error::SgpError;
