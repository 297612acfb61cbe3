//! Slashing policies

use crate::domain::{Block, ValidatorId};
use crate::ports::outbound::SlashingPolicy;
use parking_lot::RwLock;
use tracing::warn;

/// Never flags a conflict; `slash` is a no-op
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverSlash;

impl SlashingPolicy for NeverSlash {
    fn is_slashable_conflict(&self, _new_target: &Block, _last_target: &Block) -> bool {
        false
    }

    fn slash(&self, _validator: ValidatorId) {}
}

/// Two distinct blocks at the same height form a double vote.
///
/// `slash` only records the offender. Confiscation is left to the host,
/// which reads the record through `slashed()`.
#[derive(Debug, Default)]
pub struct SameHeightDoubleVote {
    offenders: RwLock<Vec<ValidatorId>>,
}

impl SameHeightDoubleVote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offenders in slashing order; repeat offences appear repeatedly
    pub fn slashed(&self) -> Vec<ValidatorId> {
        self.offenders.read().clone()
    }

    pub fn is_slashed(&self, validator: ValidatorId) -> bool {
        self.offenders.read().contains(&validator)
    }
}

impl SlashingPolicy for SameHeightDoubleVote {
    fn is_slashable_conflict(&self, new_target: &Block, last_target: &Block) -> bool {
        new_target.id != last_target.id && new_target.height == last_target.height
    }

    fn slash(&self, validator: ValidatorId) {
        warn!("[support-gadget] Recording double vote by {}", validator);
        self.offenders.write().push(validator);
    }
}
