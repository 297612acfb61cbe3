//! Support accumulator
//!
//! Per-block running support (numerator) and maximum possible support
//! (denominator). Deciding finality from the ratio is left to the host.

use super::block::{Block, BlockId};
use super::journal::Journal;
use super::ledger::RewardSchedule;
use super::validator::{add_amount, Amount};
use crate::error::{GadgetError, GadgetResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current and maximum support of one block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportScore {
    pub current: Amount,
    pub max: Amount,
}

impl SupportScore {
    /// Whether `max >= current` holds. Not enforced by the engine.
    pub fn within_max(&self) -> bool {
        self.current <= self.max
    }
}

#[derive(Clone, Debug, Default)]
pub struct SupportAccumulator {
    scores: HashMap<BlockId, SupportScore>,
    journal: Journal<BlockId, SupportScore>,
}

impl SupportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed genesis with `seed` for both current and max support
    pub fn seed_genesis(&mut self, genesis: BlockId, seed: Amount) {
        self.scores.insert(
            genesis,
            SupportScore {
                current: seed,
                max: seed,
            },
        );
    }

    /// Open a score for a newly accepted block: zero support, parent's max
    /// plus this block's capacity.
    ///
    /// Only needs the block's id and parent, so it runs before the block
    /// enters the tree. Nothing is stored when the max overflows.
    pub fn on_block_accepted(
        &mut self,
        block: &Block,
        rewards: &RewardSchedule,
    ) -> GadgetResult<SupportScore> {
        let parent = block
            .parent
            .ok_or(GadgetError::WalkedPastGenesis { block: block.id })?;
        let parent_max = self.score(parent)?.max;

        let score = SupportScore {
            current: 0,
            max: add_amount(parent_max, rewards.capacity_of(block)?, "max support")?,
        };
        let previous = self.scores.insert(block.id, score);
        self.journal.record(block.id, previous);
        Ok(score)
    }

    pub fn credit(&mut self, block: BlockId, amount: Amount) -> GadgetResult<()> {
        let score = self
            .scores
            .get_mut(&block)
            .ok_or(GadgetError::UnknownBlock { block })?;
        let previous = *score;
        score.current = add_amount(previous.current, amount, "support")?;
        self.journal.record(block, Some(previous));
        Ok(())
    }

    /// Add `amount` to the support of every block in `blocks`
    pub fn credit_chain(&mut self, blocks: &[BlockId], amount: Amount) -> GadgetResult<()> {
        blocks.iter().try_for_each(|&b| self.credit(b, amount))
    }

    pub fn support_of(&self, block: BlockId) -> Option<SupportScore> {
        self.scores.get(&block).copied()
    }

    /// Start journaling score changes
    pub(crate) fn checkpoint(&mut self) {
        self.journal.open();
    }

    pub(crate) fn commit(&mut self) {
        self.journal.commit();
    }

    /// Drop scores opened and undo credits made since `checkpoint`
    pub(crate) fn rollback(&mut self) {
        self.journal.rollback(&mut self.scores);
    }

    fn score(&self, block: BlockId) -> GadgetResult<SupportScore> {
        self.support_of(block)
            .ok_or(GadgetError::UnknownBlock { block })
    }
}
