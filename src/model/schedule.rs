//! The conflict-tracking schedule state.
//!
//! # Invariants
//!
//! After every public mutation:
//!
//! - the forward view (week, group) → members and the inverse view
//!   (week, player) → group agree, each assigned player sits in exactly
//!   one group per week, and no group exceeds its size;
//! - the conflict matrix is symmetric and counts, per unordered player
//!   pair, the weeks both spend in the same group;
//! - the objective equals the sum over pairs of `max(count - 1, 0)`,
//!   maintained incrementally and never recomputed;
//! - a player's assignments are live in the active-conflict set exactly
//!   when the player carries at least one excess pairing.
//!
//! All of this hangs off [`Schedule::assign`] being the only mutation
//! path; the random initializer and the search swaps are composed from it.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SgpError;

use super::conflict_set::ActiveConflictSet;
use super::decision::{Decision, Player};

/// Assignment grid, conflict matrix, and incremental objective for one
/// Social Golfer instance.
#[derive(Debug, Clone)]
pub struct Schedule {
    groups: usize,
    group_size: usize,
    weeks: usize,
    players: usize,

    /// Forward view: `tables[week][group]` → members, in ascending
    /// player order.
    tables: Vec<Vec<BTreeSet<Player>>>,
    /// Inverse view: `assignments[week][player]` → group index.
    assignments: Vec<Vec<Option<usize>>>,
    /// Symmetric pair counts; diagonal unused.
    conflicts: Vec<Vec<u32>>,
    /// Per-player total excess pairings, kept in step with `conflicts`.
    excess: Vec<u32>,
    /// Sum over pairs of `max(count - 1, 0)`.
    eval: u32,
    active: ActiveConflictSet,
}

impl Schedule {
    /// Creates an empty schedule for `groups` groups of `group_size`
    /// players over `weeks` weeks.
    ///
    /// Rejects dimensions that cannot form a schedule (any of them zero,
    /// or fewer than two players overall).
    pub fn new(groups: usize, group_size: usize, weeks: usize) -> Result<Self, SgpError> {
        if groups == 0 || group_size == 0 || weeks == 0 || groups * group_size < 2 {
            return Err(SgpError::InvalidDimensions {
                groups,
                group_size,
                weeks,
            });
        }
        let players = groups * group_size;
        Ok(Self {
            groups,
            group_size,
            weeks,
            players,
            tables: vec![vec![BTreeSet::new(); groups]; weeks],
            assignments: vec![vec![None; players]; weeks],
            conflicts: vec![vec![0; players]; players],
            excess: vec![0; players],
            eval: 0,
            active: ActiveConflictSet::new(),
        })
    }

    pub fn groups(&self) -> usize {
        self.groups
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn players(&self) -> usize {
        self.players
    }

    /// The maintained objective: total excess co-occurrences. Zero means
    /// a feasible schedule. O(1).
    pub fn eval(&self) -> u32 {
        self.eval
    }

    /// Number of weeks players `a` and `b` share a group.
    pub fn conflict_count(&self, a: Player, b: Player) -> u32 {
        self.conflicts[a][b]
    }

    /// Total excess pairings of `player` across all partners. O(1) read
    /// of the incrementally maintained count.
    pub fn conflicts_of_player(&self, player: Player) -> u32 {
        self.excess[player]
    }

    /// Members of `(week, group)` in ascending player order.
    pub fn group_members(&self, week: usize, group: usize) -> impl Iterator<Item = Player> + '_ {
        self.tables[week][group].iter().copied()
    }

    /// Group holding `player` in `week`, if assigned.
    pub fn group_of(&self, week: usize, player: Player) -> Option<usize> {
        self.assignments[week][player]
    }

    /// The active-conflict working set (read-only).
    pub fn active_conflicts(&self) -> &ActiveConflictSet {
        &self.active
    }

    /// Next live conflicted assignment after `cursor`, purging stale
    /// entries on the way.
    pub(crate) fn next_conflict_after(&mut self, cursor: Option<Decision>) -> Option<Decision> {
        self.active.next_live_after(cursor)
    }

    /// Discards the current assignment and draws a fresh one: for each
    /// week an independent uniform permutation of all players, chunked
    /// into groups of `group_size` and placed through [`Self::assign`].
    ///
    /// The result is a valid partition per week, usually with conflicts.
    pub fn init_random_solution<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.eval = 0;
        self.active.clear();
        self.excess.fill(0);
        for row in &mut self.conflicts {
            row.fill(0);
        }
        for week in &mut self.tables {
            for group in week {
                group.clear();
            }
        }
        for week in &mut self.assignments {
            week.fill(None);
        }

        let mut order: Vec<Player> = (0..self.players).collect();
        for week in 0..self.weeks {
            order.shuffle(rng);
            for group in 0..self.groups {
                for &player in &order[group * self.group_size..(group + 1) * self.group_size] {
                    self.assign(week, group, None, player)
                        .expect("week and group indices are in range by construction");
                }
            }
        }
    }

    /// The single mutation primitive: place `new` into `(week, group)`,
    /// replacing `old` if given.
    ///
    /// `old == None` is a fresh insertion and requires the group to have
    /// room; `old == Some(p)` requires the group to be full and contain
    /// `p`. Violating the occupancy preconditions is a programming error
    /// and aborts. A call with `old == Some(new)` is a no-op.
    ///
    /// Updates the conflict matrix and objective for every pairing gained
    /// by `new` and lost by `old`, keeps both grid views in step, and
    /// adjusts active-conflict membership for every player touched.
    pub fn assign(
        &mut self,
        week: usize,
        group: usize,
        old: Option<Player>,
        new: Player,
    ) -> Result<(), SgpError> {
        if week >= self.weeks {
            return Err(SgpError::WeekOutOfRange {
                week,
                weeks: self.weeks,
            });
        }
        if group >= self.groups {
            return Err(SgpError::GroupOutOfRange {
                group,
                groups: self.groups,
            });
        }
        if old == Some(new) {
            return Ok(());
        }

        match old {
            None => assert!(
                self.tables[week][group].len() < self.group_size,
                "insertion into a full group ({week}, {group})"
            ),
            Some(o) => {
                assert_eq!(
                    self.tables[week][group].len(),
                    self.group_size,
                    "replacement in a group that is not full ({week}, {group})"
                );
                assert!(
                    self.tables[week][group].contains(&o),
                    "player {o} is not a member of ({week}, {group})"
                );
            }
        }

        let members: Vec<Player> = self.tables[week][group].iter().copied().collect();
        for p2 in members {
            if old == Some(p2) {
                continue;
            }
            if let Some(o) = old {
                self.drop_conflict(o, p2);
            }
            self.bump_conflict(new, p2);
        }

        self.tables[week][group].insert(new);
        self.assignments[week][new] = Some(group);
        if self.excess[new] > 0 {
            self.active.insert(Decision::new(week, group, new));
        }

        if let Some(o) = old {
            let removed = self.tables[week][group].remove(&o);
            assert!(removed, "player {o} vanished from ({week}, {group}) mid-update");
            self.assignments[week][o] = None;
            self.active.mark_stale(&Decision::new(week, group, o));
        }

        Ok(())
    }

    /// Net objective change of replacing `old` with `new` in
    /// `(week, group)`, without mutating anything.
    ///
    /// For each other member `p2`: one excess pairing is removed when
    /// `old` and `p2` currently share more than one week, and one is
    /// added when `new` and `p2` already share at least one. `old` must
    /// occupy the cell and `new` must not; this is not checked here.
    pub fn conflict_delta_in_group(
        &self,
        week: usize,
        group: usize,
        old: Player,
        new: Player,
    ) -> i32 {
        if old == new {
            return 0;
        }
        debug_assert!(self.tables[week][group].contains(&old));
        debug_assert!(!self.tables[week][group].contains(&new));

        let mut delta = 0;
        for &p2 in &self.tables[week][group] {
            if p2 == old {
                continue;
            }
            if self.conflicts[old][p2] > 1 {
                delta -= 1;
            }
            if self.conflicts[new][p2] >= 1 {
                delta += 1;
            }
        }
        delta
    }

    fn bump_conflict(&mut self, a: Player, b: Player) {
        self.conflicts[a][b] += 1;
        self.conflicts[b][a] = self.conflicts[a][b];
        if self.conflicts[a][b] > 1 {
            self.eval += 1;
            self.raise_excess(a);
            self.raise_excess(b);
        }
    }

    fn drop_conflict(&mut self, a: Player, b: Player) {
        debug_assert!(self.conflicts[a][b] > 0, "dropping a pairing that does not exist");
        if self.conflicts[a][b] > 1 {
            debug_assert!(self.eval > 0);
            self.eval -= 1;
            self.lower_excess(a);
            self.lower_excess(b);
        }
        self.conflicts[a][b] -= 1;
        self.conflicts[b][a] = self.conflicts[a][b];
    }

    // Excess counters move only on pair-count transitions across the 1↔2
    // boundary; active-set membership moves only when a counter crosses
    // zero. Entering adds every current assignment of the player, leaving
    // marks them stale for the next traversal to purge.

    fn raise_excess(&mut self, player: Player) {
        self.excess[player] += 1;
        if self.excess[player] == 1 {
            self.enter_active(player);
        }
    }

    fn lower_excess(&mut self, player: Player) {
        debug_assert!(self.excess[player] > 0);
        self.excess[player] -= 1;
        if self.excess[player] == 0 {
            self.leave_active(player);
        }
    }

    fn enter_active(&mut self, player: Player) {
        for week in 0..self.weeks {
            if let Some(group) = self.assignments[week][player] {
                self.active.insert(Decision::new(week, group, player));
            }
        }
    }

    fn leave_active(&mut self, player: Player) {
        for week in 0..self.weeks {
            if let Some(group) = self.assignments[week][player] {
                self.active.mark_stale(&Decision::new(week, group, player));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Walks the whole active-conflict traversal so every stale entry is
    /// physically purged.
    fn purge_stale(schedule: &mut Schedule) {
        let mut cursor = None;
        while let Some(entry) = schedule.next_conflict_after(cursor) {
            cursor = Some(entry);
        }
    }

    fn recomputed_eval(schedule: &Schedule) -> u32 {
        let mut total = 0;
        for a in 0..schedule.players() {
            for b in (a + 1)..schedule.players() {
                total += schedule.conflict_count(a, b).saturating_sub(1);
            }
        }
        total
    }

    /// 8 groups of 4, with week 0 group 0 and week 1 group 0 both holding
    /// players 0..4: six excess pairings, the worked base scenario.
    fn two_week_overlap() -> Schedule {
        let mut s = Schedule::new(8, 4, 9).unwrap();
        for p in 0..4 {
            s.assign(0, 0, None, p).unwrap();
        }
        for p in 0..4 {
            s.assign(1, 0, None, p).unwrap();
        }
        s
    }

    #[test]
    fn test_new_rejects_degenerate_dimensions() {
        assert!(matches!(
            Schedule::new(0, 4, 9),
            Err(SgpError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Schedule::new(8, 0, 9),
            Err(SgpError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Schedule::new(8, 4, 0),
            Err(SgpError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Schedule::new(1, 1, 3),
            Err(SgpError::InvalidDimensions { .. })
        ));
        assert!(Schedule::new(1, 2, 3).is_ok());
    }

    #[test]
    fn test_fresh_schedule_has_zero_objective() {
        let s = Schedule::new(8, 4, 9).unwrap();
        assert_eq!(s.eval(), 0);
        assert!(s.active_conflicts().is_empty());
    }

    #[test]
    fn test_assign_rejects_out_of_range_indices() {
        let mut s = Schedule::new(8, 4, 9).unwrap();
        assert_eq!(
            s.assign(9, 0, None, 0),
            Err(SgpError::WeekOutOfRange { week: 9, weeks: 9 })
        );
        assert_eq!(
            s.assign(0, 8, None, 0),
            Err(SgpError::GroupOutOfRange {
                group: 8,
                groups: 8
            })
        );
    }

    #[test]
    fn test_repeat_insertions_raise_objective_stepwise() {
        let mut s = Schedule::new(8, 4, 9).unwrap();
        for p in 0..4 {
            s.assign(0, 0, None, p).unwrap();
            assert_eq!(s.eval(), 0);
            assert_eq!(s.active_conflicts().len(), 0);
        }

        // Re-seating the same four players together: each newcomer now
        // pairs a second time with everyone already present.
        let expected = [(0, 0), (1, 4), (3, 6), (6, 8)];
        for (p, (eval, active)) in (0..4).zip(expected) {
            s.assign(1, 0, None, p).unwrap();
            assert_eq!(s.eval(), eval);
            assert_eq!(s.active_conflicts().len(), active);
        }
    }

    #[test]
    fn test_disjoint_group_leaves_objective_unchanged() {
        let mut s = two_week_overlap();
        for p in 4..8 {
            s.assign(1, 1, None, p).unwrap();
            assert_eq!(s.eval(), 6);
            assert_eq!(s.active_conflicts().len(), 8);
        }
    }

    #[test]
    fn test_replacements_unwind_conflicts() {
        let mut s = two_week_overlap();
        for p in 4..8 {
            s.assign(1, 1, None, p).unwrap();
        }

        s.assign(1, 0, Some(0), 8).unwrap();
        assert_eq!(s.eval(), 3);
        assert_eq!(s.active_conflicts().len(), 8);
        assert!(s.active_conflicts().is_stale(&Decision::new(1, 0, 0)));
        purge_stale(&mut s);
        assert_eq!(s.active_conflicts().len(), 6);

        s.assign(1, 0, Some(1), 9).unwrap();
        assert_eq!(s.eval(), 1);
        assert_eq!(s.active_conflicts().len(), 6);
        assert!(s.active_conflicts().is_stale(&Decision::new(1, 0, 1)));
        purge_stale(&mut s);
        assert_eq!(s.active_conflicts().len(), 4);

        s.assign(1, 0, Some(2), 10).unwrap();
        assert_eq!(s.eval(), 0);
        assert_eq!(s.active_conflicts().len(), 4);
        assert!(s.active_conflicts().is_stale(&Decision::new(1, 0, 2)));
        purge_stale(&mut s);
        assert_eq!(s.active_conflicts().len(), 0);

        s.assign(1, 0, Some(3), 11).unwrap();
        assert_eq!(s.eval(), 0);
        assert_eq!(s.active_conflicts().len(), 0);
    }

    #[test]
    fn test_predicted_deltas_match_committed_replacements() {
        let mut s = two_week_overlap();
        for p in 4..8 {
            s.assign(1, 1, None, p).unwrap();
        }
        for (old, new) in [(0, 8), (1, 9), (2, 10), (3, 11)] {
            s.assign(1, 0, Some(old), new).unwrap();
        }
        assert_eq!(s.eval(), 0);

        // Walking the original four back in, one at a time.
        assert_eq!(s.conflict_delta_in_group(1, 0, 8, 0), 0);
        s.assign(1, 0, Some(8), 0).unwrap();
        assert_eq!(s.eval(), 0);

        assert_eq!(s.conflict_delta_in_group(1, 0, 9, 1), 1);
        s.assign(1, 0, Some(9), 1).unwrap();
        assert_eq!(s.eval(), 1);
        assert_eq!(s.active_conflicts().len(), 4);

        assert_eq!(s.conflict_delta_in_group(1, 0, 10, 2), 2);
        s.assign(1, 0, Some(10), 2).unwrap();
        assert_eq!(s.eval(), 3);
        assert_eq!(s.active_conflicts().len(), 6);

        // And the projection of undoing the last step.
        assert_eq!(s.conflict_delta_in_group(1, 0, 2, 10), -2);

        assert_eq!(s.conflicts_of_player(0), 2);
        assert_eq!(s.conflicts_of_player(1), 2);
        assert_eq!(s.conflicts_of_player(2), 2);
        assert_eq!(s.conflicts_of_player(10), 0);
        assert_eq!(s.conflicts_of_player(11), 0);
        assert_eq!(s.conflicts_of_player(4), 0);
        assert_eq!(s.conflicts_of_player(5), 0);
    }

    #[test]
    fn test_assign_same_player_is_noop() {
        let mut s = two_week_overlap();
        let eval = s.eval();
        let active = s.active_conflicts().len();
        let count = s.conflict_count(0, 1);

        s.assign(1, 0, Some(2), 2).unwrap();

        assert_eq!(s.eval(), eval);
        assert_eq!(s.active_conflicts().len(), active);
        assert_eq!(s.conflict_count(0, 1), count);
    }

    #[test]
    fn test_random_solution_is_valid_weekly_partition() {
        let mut s = Schedule::new(8, 4, 9).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        s.init_random_solution(&mut rng);

        for week in 0..s.weeks() {
            let mut seen = vec![false; s.players()];
            for group in 0..s.groups() {
                assert_eq!(s.group_members(week, group).count(), s.group_size());
                for p in s.group_members(week, group) {
                    assert!(!seen[p], "player {p} appears twice in week {week}");
                    seen[p] = true;
                    assert_eq!(s.group_of(week, p), Some(group));
                }
            }
            assert!(seen.into_iter().all(|placed| placed));
        }
        assert_eq!(s.eval(), recomputed_eval(&s));
    }

    #[test]
    fn test_reinitialization_resets_previous_state() {
        let mut s = Schedule::new(4, 3, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        s.init_random_solution(&mut rng);
        s.init_random_solution(&mut rng);

        assert_eq!(s.eval(), recomputed_eval(&s));
        for week in 0..s.weeks() {
            let total: usize = (0..s.groups())
                .map(|g| s.group_members(week, g).count())
                .sum();
            assert_eq!(total, s.players());
        }
    }

    proptest! {
        /// Random valid mutation sequences keep the objective, the
        /// per-player counts, both grid views, and active-conflict
        /// membership mutually consistent.
        #[test]
        fn prop_mutation_sequences_stay_consistent(
            ops in proptest::collection::vec(
                (any::<u8>(), any::<u8>(), any::<u8>(), any::<bool>()),
                0..80,
            )
        ) {
            let mut s = Schedule::new(3, 2, 2).unwrap();
            for (wr, gr, pr, replace) in ops {
                let week = wr as usize % s.weeks();
                let group = gr as usize % s.groups();
                let free: Vec<Player> = (0..s.players())
                    .filter(|&p| s.group_of(week, p).is_none())
                    .collect();
                let size = s.group_members(week, group).count();
                if size < s.group_size() {
                    let new = free[pr as usize % free.len()];
                    s.assign(week, group, None, new).unwrap();
                } else if replace && !free.is_empty() {
                    let members: Vec<Player> = s.group_members(week, group).collect();
                    let old = members[pr as usize % members.len()];
                    let new = free[pr as usize % free.len()];
                    s.assign(week, group, Some(old), new).unwrap();
                }
            }

            let mut recomputed = 0u32;
            for a in 0..s.players() {
                for b in (a + 1)..s.players() {
                    prop_assert_eq!(s.conflict_count(a, b), s.conflict_count(b, a));
                    recomputed += s.conflict_count(a, b).saturating_sub(1);
                }
            }
            prop_assert_eq!(s.eval(), recomputed);

            for p in 0..s.players() {
                let by_hand: u32 = (0..s.players())
                    .filter(|&q| q != p)
                    .map(|q| s.conflict_count(p, q).saturating_sub(1))
                    .sum();
                prop_assert_eq!(s.conflicts_of_player(p), by_hand);
            }

            for week in 0..s.weeks() {
                for group in 0..s.groups() {
                    prop_assert!(s.group_members(week, group).count() <= s.group_size());
                    for p in s.group_members(week, group) {
                        prop_assert_eq!(s.group_of(week, p), Some(group));
                    }
                }
                for p in 0..s.players() {
                    if let Some(g) = s.group_of(week, p) {
                        prop_assert!(s.group_members(week, g).any(|m| m == p));
                        let entry = Decision::new(week, g, p);
                        if s.conflicts_of_player(p) > 0 {
                            prop_assert!(s.active_conflicts().is_live(&entry));
                        } else {
                            prop_assert!(!s.active_conflicts().is_live(&entry));
                        }
                    }
                }
            }
        }

        /// The read-only swap projection always matches the objective
        /// change realized by committing the swap.
        #[test]
        fn prop_projected_swap_delta_matches_commit(
            seed in any::<u64>(),
            wr in any::<u8>(),
            ar in any::<u8>(),
            br in any::<u8>(),
            i1 in any::<u8>(),
            i2 in any::<u8>(),
        ) {
            let mut s = Schedule::new(4, 3, 3).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            s.init_random_solution(&mut rng);

            let week = wr as usize % s.weeks();
            let g1 = ar as usize % s.groups();
            let mut g2 = br as usize % s.groups();
            if g2 == g1 {
                g2 = (g2 + 1) % s.groups();
            }
            let v1 = s
                .group_members(week, g1)
                .nth(i1 as usize % s.group_size())
                .unwrap();
            let v2 = s
                .group_members(week, g2)
                .nth(i2 as usize % s.group_size())
                .unwrap();

            let predicted = s.conflict_delta_in_group(week, g1, v1, v2)
                + s.conflict_delta_in_group(week, g2, v2, v1);
            let before = s.eval() as i64;
            s.assign(week, g1, Some(v1), v2).unwrap();
            s.assign(week, g2, Some(v2), v1).unwrap();
            prop_assert_eq!(s.eval() as i64 - before, i64::from(predicted));
        }
    }
}
