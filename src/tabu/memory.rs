//! Per-week short-term memory of recently swapped player pairs.
//!
//! A pair that was just swapped within a week is forbidden from being
//! swapped again there until its expiry iteration passes. Tenure is drawn
//! uniformly per insertion from a configured range; the randomization
//! avoids the fixed-period cycling a constant tenure invites. Pair
//! identity is order-independent, a swap being symmetric.

use std::collections::HashMap;

use rand::Rng;

use crate::error::SgpError;
use crate::model::Player;

/// Normalized unordered pair key.
fn pair_key(a: Player, b: Player) -> (Player, Player) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Week-indexed tabu pairs with randomized expiry.
#[derive(Debug, Clone)]
pub struct PairTabuList {
    /// `weeks[w]` maps a normalized pair to the first iteration at which
    /// it may be swapped again.
    weeks: Vec<HashMap<(Player, Player), u64>>,
    iteration: u64,
    min_tenure: u64,
    max_tenure: u64,
}

impl PairTabuList {
    /// Creates an empty list covering `weeks` weeks, with tenure drawn
    /// from `[min_tenure, max_tenure]` per insertion.
    ///
    /// Rejects inverted bounds.
    pub fn new(weeks: usize, min_tenure: u64, max_tenure: u64) -> Result<Self, SgpError> {
        if min_tenure > max_tenure {
            return Err(SgpError::InvalidTenureBounds {
                min: min_tenure,
                max: max_tenure,
            });
        }
        Ok(Self {
            weeks: vec![HashMap::new(); weeks],
            iteration: 0,
            min_tenure,
            max_tenure,
        })
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Current value of the global iteration counter.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Records (or refreshes) the pair as forbidden in `week` until
    /// `iteration + tenure`, tenure drawn from the configured range.
    pub fn add<R: Rng + ?Sized>(
        &mut self,
        week: usize,
        a: Player,
        b: Player,
        rng: &mut R,
    ) -> Result<(), SgpError> {
        let weeks = self.weeks.len();
        let slot = self
            .weeks
            .get_mut(week)
            .ok_or(SgpError::WeekOutOfRange { week, weeks })?;
        let tenure = rng.random_range(self.min_tenure..=self.max_tenure);
        slot.insert(pair_key(a, b), self.iteration + tenure);
        Ok(())
    }

    /// True while the pair is recorded for `week` and its expiry has not
    /// been reached.
    pub fn is_tabu(&self, week: usize, a: Player, b: Player) -> Result<bool, SgpError> {
        let slot = self.weeks.get(week).ok_or(SgpError::WeekOutOfRange {
            week,
            weeks: self.weeks.len(),
        })?;
        Ok(slot
            .get(&pair_key(a, b))
            .is_some_and(|&expiry| self.iteration < expiry))
    }

    /// Purges every pair recorded for `week`.
    pub fn clear(&mut self, week: usize) -> Result<(), SgpError> {
        let weeks = self.weeks.len();
        let slot = self
            .weeks
            .get_mut(week)
            .ok_or(SgpError::WeekOutOfRange { week, weeks })?;
        slot.clear();
        Ok(())
    }

    /// Purges every recorded pair in every week. The iteration counter is
    /// left untouched.
    pub fn clear_all(&mut self) {
        for slot in &mut self.weeks {
            slot.clear();
        }
    }

    /// Advances the global iteration counter used for expiry checks.
    /// Called once per outer solver iteration, not per swap.
    pub fn advance_iteration(&mut self) {
        self.iteration += 1;
    }
}
