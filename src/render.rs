//! Textual rendering of schedules and conflict matrices.
//!
//! Everything here is derived from the model's read-only accessors; the
//! search never goes through this module.

use std::fmt::{self, Write as _};

use itertools::Itertools;

use crate::model::Schedule;

/// Weeks rendered side by side in this many columns.
const WEEKS_PER_ROW: usize = 4;

/// Renders the weeks × groups grid, weeks chunked side by side, one line
/// per group, players right-aligned in 3-wide cells.
pub fn schedule_table(schedule: &Schedule) -> String {
    let title_width = schedule.group_size() * 3;
    let mut out = String::new();

    for chunk in &(0..schedule.weeks()).chunks(WEEKS_PER_ROW) {
        let chunk: Vec<usize> = chunk.collect();

        for &week in &chunk {
            let _ = write!(
                out,
                "{:>title_width$}{:8}",
                format!("WEEK {}", week + 1),
                ""
            );
        }
        out.push('\n');

        for group in 0..schedule.groups() {
            for &week in &chunk {
                for player in schedule.group_members(week, group) {
                    let _ = write!(out, "{player:>3}");
                }
                let _ = write!(out, "{:8}", "");
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Renders the full pairwise conflict matrix with an index header.
pub fn conflict_matrix_table(schedule: &Schedule) -> String {
    let players = schedule.players();
    let mut out = String::from("   ");

    for j in 0..players {
        let _ = write!(out, "{j:>3}");
    }
    out.push('\n');
    out.push_str("   ");
    out.push_str(&"-".repeat(players * 3));
    out.push('\n');

    for i in 0..players {
        let _ = write!(out, "{i:>2}|");
        for j in 0..players {
            let _ = write!(out, "{:>3}", schedule.conflict_count(i, j));
        }
        out.push('\n');
    }
    out
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", schedule_table(self))?;
        writeln!(f, "CURRENT EVAL = {}", self.eval())?;
        writeln!(f, "CONFLICT MATRIX :")?;
        write!(f, "{}", conflict_matrix_table(self))
    }
}
