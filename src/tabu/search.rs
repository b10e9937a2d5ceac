//! One invocation of the conflict-directed local search.

use rand::Rng;

use crate::error::SgpError;
use crate::model::{Decision, Player, Schedule};

use super::memory::PairTabuList;

/// What a single [`local_search_step`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The objective was already zero; nothing to do.
    AlreadyOptimal,
    /// Exactly one swap was committed, changing the objective by `delta`.
    Swapped { delta: i32 },
    /// The whole traversal produced no admissible move (stagnation).
    Exhausted,
}

/// Runs one local-search step against `schedule`.
///
/// Traverses the active-conflict set in order, purging stale entries
/// lazily. For each live conflicted assignment `(week, group, player)`
/// every same-week swap candidate is scored: each other group in index
/// order, each of its members in ascending player order, with the score
/// being the net objective change of exchanging the two players. Per
/// entry, the best non-tabu candidate is tracked (first encountered at
/// the minimal delta wins ties); a tabu candidate is admissible only via
/// aspiration, i.e. when it lands strictly below the best improvement
/// target derived from `best_eval` (the best objective seen by the
/// caller). When both exist, the non-tabu candidate is preferred unless
/// the aspirant is strictly better.
///
/// The first entry that yields an admissible candidate has its swap
/// committed (two [`Schedule::assign`] calls), the swapped pair is
/// recorded in `tabu` for that week, and the step returns. The realized
/// objective change must equal the projected delta; divergence aborts, as
/// it means the incremental bookkeeping is broken.
pub fn local_search_step<R: Rng + ?Sized>(
    schedule: &mut Schedule,
    tabu: &mut PairTabuList,
    rng: &mut R,
    best_eval: u32,
) -> Result<StepOutcome, SgpError> {
    if schedule.eval() == 0 {
        return Ok(StepOutcome::AlreadyOptimal);
    }

    // Deltas strictly below this bound would improve on the best schedule
    // the caller has seen; such moves bypass the tabu check.
    let mut aspiration_bound = i64::from(best_eval) - i64::from(schedule.eval());

    let mut cursor: Option<Decision> = None;
    while let Some(entry) = schedule.next_conflict_after(cursor) {
        cursor = Some(entry);
        let Decision {
            week,
            group,
            player,
        } = entry;

        let mut best_nontabu: Option<(i32, usize, Player)> = None;
        let mut aspirant: Option<(i32, usize, Player)> = None;

        for other_group in 0..schedule.groups() {
            if other_group == group {
                continue;
            }
            for candidate in schedule.group_members(week, other_group) {
                let delta = schedule.conflict_delta_in_group(week, group, player, candidate)
                    + schedule.conflict_delta_in_group(week, other_group, candidate, player);

                if !tabu.is_tabu(week, player, candidate)? {
                    if best_nontabu.is_none_or(|(best, _, _)| delta < best) {
                        best_nontabu = Some((delta, other_group, candidate));
                        if i64::from(delta) < aspiration_bound {
                            aspiration_bound = i64::from(delta);
                        }
                    }
                } else if i64::from(delta) < aspiration_bound {
                    aspiration_bound = i64::from(delta);
                    aspirant = Some((delta, other_group, candidate));
                }
            }
        }

        let chosen = match (best_nontabu, aspirant) {
            (Some(n), Some(a)) => Some(if n.0 <= a.0 { n } else { a }),
            (Some(n), None) => Some(n),
            (None, Some(a)) => Some(a),
            (None, None) => None,
        };
        let Some((delta, other_group, candidate)) = chosen else {
            continue;
        };

        tabu.add(week, player, candidate, rng)?;

        let before = i64::from(schedule.eval());
        schedule.assign(week, group, Some(player), candidate)?;
        schedule.assign(week, other_group, Some(candidate), player)?;
        let realized = i64::from(schedule.eval()) - before;
        assert_eq!(
            realized,
            i64::from(delta),
            "objective moved by {realized} but the swap projection said {delta}"
        );

        log::trace!(
            "week {week}: swapped player {player} (group {group}) with {candidate} \
             (group {other_group}), delta {delta}"
        );
        return Ok(StepOutcome::Swapped { delta });
    }

    Ok(StepOutcome::Exhausted)
}
