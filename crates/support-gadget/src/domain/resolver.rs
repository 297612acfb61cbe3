//! # Vote-Conflict Resolver
//!
//! Applies one validator's vote to the deposit ledger and support scores.
//!
//! ## Forward extension
//!
//! The target continues the chain through the validator's last target. The
//! new segment is walked oldest-first; at each block the validator's rewards
//! for that block are applied, then its post-reward balance is added to the
//! block's support (reward-then-credit).
//!
//! ## Fork switch
//!
//! ```text
//!            c ── a1 ── a2 ── last          abandoned = [last, a2, a1]
//!             \
//!              n1 ── n2 ── n3 ── target     adopted   = [target, n3, n2, n1]
//!                    ^pivot
//! ```
//!
//! `pivot` is the validator's most recent prior contact with the adopted
//! segment (proposer or attester), defaulting to its oldest block. Blocks
//! below the pivot (`retroactive`, here `[n1]`) were already earned and are
//! only re-granted; the pivot and everything above it (`extension`) is
//! walked as a forward extension.

use super::block::BlockId;
use super::block_tree::BlockTree;
use super::ledger::{DepositLedger, RewardSchedule};
use super::support::SupportAccumulator;
use super::validator::{Amount, ValidatorId};
use crate::error::{GadgetError, GadgetResult};
use crate::ports::outbound::SlashingPolicy;
use crate::types::ConflictAccounting;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Segments touched when a validator switches forks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPlan {
    pub common_ancestor: BlockId,
    /// `last` down to (excluding) the common ancestor, nearest-to-`last` first
    pub abandoned: Vec<BlockId>,
    /// `target` down to (excluding) the common ancestor, nearest-to-`target` first
    pub adopted: Vec<BlockId>,
    /// `None` only when `adopted` is empty
    pub pivot: Option<BlockId>,
    /// Part of `adopted` below the pivot
    pub retroactive: Vec<BlockId>,
    /// Pivot up to `target`, nearest-to-`target` first
    pub extension: Vec<BlockId>,
}

impl ConflictPlan {
    pub fn compute(
        tree: &BlockTree,
        validator: ValidatorId,
        last: BlockId,
        target: BlockId,
    ) -> GadgetResult<Self> {
        let common_ancestor = tree.common_ancestor(target, last)?;
        let abandoned = tree.ancestors_between(last, common_ancestor)?;
        let adopted = tree.ancestors_between(target, common_ancestor)?;
        let pivot = last_involvement(tree, &adopted, validator)?;

        // Empty `adopted` means the target is the common ancestor itself:
        // nothing to re-grant and nothing to extend.
        let (retroactive, extension) = match pivot {
            Some(pivot) => {
                let below = tree
                    .parent_of(pivot)?
                    .ok_or(GadgetError::WalkedPastGenesis { block: pivot })?;
                (
                    tree.ancestors_between(below, common_ancestor)?,
                    tree.ancestors_between(target, below)?,
                )
            }
            None => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            common_ancestor,
            abandoned,
            adopted,
            pivot,
            retroactive,
            extension,
        })
    }
}

/// First block of `adopted` (nearest-to-target first) the validator proposed
/// or attested in, else the oldest block of `adopted`.
fn last_involvement(
    tree: &BlockTree,
    adopted: &[BlockId],
    validator: ValidatorId,
) -> GadgetResult<Option<BlockId>> {
    for &id in adopted {
        if tree.block(id)?.involves(validator) {
            return Ok(Some(id));
        }
    }
    Ok(adopted.last().copied())
}

/// How a vote was resolved
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Target continues the recorded chain; `path` is nearest-to-target first
    ForwardExtension { path: Vec<BlockId> },
    /// Target diverges from the recorded chain
    ForkSwitch(ConflictPlan),
    /// Slashing policy flagged the conflict; no accounting was done
    Slashed { last_target: BlockId },
}

impl VoteOutcome {
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Self::ForwardExtension { .. })
    }

    /// Whether the validator's last target moves to the voted block
    pub fn updates_last_target(&self) -> bool {
        !matches!(self, Self::Slashed { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ForwardExtension { .. } => "forward_extension",
            Self::ForkSwitch(_) => "fork_switch",
            Self::Slashed { .. } => "slashed",
        }
    }

    /// Blocks whose support or the validator's deposit this vote touched
    pub fn blocks_traversed(&self) -> usize {
        match self {
            Self::ForwardExtension { path } => path.len(),
            Self::ForkSwitch(plan) => {
                plan.abandoned.len() + plan.retroactive.len() + plan.extension.len()
            }
            Self::Slashed { .. } => 0,
        }
    }
}

/// Borrows the mutable accounting state for the duration of one vote
pub struct VoteResolver<'a> {
    tree: &'a BlockTree,
    ledger: &'a mut DepositLedger,
    support: &'a mut SupportAccumulator,
    rewards: RewardSchedule,
    accounting: ConflictAccounting,
}

impl<'a> VoteResolver<'a> {
    pub fn new(
        tree: &'a BlockTree,
        ledger: &'a mut DepositLedger,
        support: &'a mut SupportAccumulator,
        rewards: RewardSchedule,
        accounting: ConflictAccounting,
    ) -> Self {
        Self {
            tree,
            ledger,
            support,
            rewards,
            accounting,
        }
    }

    /// Resolve `validator`'s vote for `target` given its recorded `last` target.
    ///
    /// Does not update the last-target record; callers do that unless the
    /// outcome is `Slashed`.
    pub fn cast_vote<S: SlashingPolicy + ?Sized>(
        &mut self,
        validator: ValidatorId,
        last: BlockId,
        target: BlockId,
        slashing: &S,
    ) -> GadgetResult<VoteOutcome> {
        if let Some(path) = self.tree.forward_path(last, target)? {
            self.process_forward(validator, &path)?;
            debug!(
                "[support-gadget] {} extends {} -> {} ({} blocks)",
                validator,
                last,
                target,
                path.len()
            );
            return Ok(VoteOutcome::ForwardExtension { path });
        }

        let new_target = self.tree.block(target)?;
        let last_target = self.tree.block(last)?;
        if slashing.is_slashable_conflict(new_target, last_target) {
            warn!(
                "[support-gadget] SLASHABLE CONFLICT: {} voted {} after {}",
                validator, target, last
            );
            slashing.slash(validator);
            return Ok(VoteOutcome::Slashed { last_target: last });
        }

        let plan = ConflictPlan::compute(self.tree, validator, last, target)?;
        self.resolve_conflict(validator, &plan)?;
        info!(
            "[support-gadget] Fork switch: {} {} -> {} via {} (abandoned {}, retroactive {}, extension {})",
            validator,
            last,
            target,
            plan.common_ancestor,
            plan.abandoned.len(),
            plan.retroactive.len(),
            plan.extension.len()
        );
        Ok(VoteOutcome::ForkSwitch(plan))
    }

    fn resolve_conflict(&mut self, validator: ValidatorId, plan: &ConflictPlan) -> GadgetResult<()> {
        let balance = self.balance(validator)?;

        self.apply_rewards(&plan.abandoned, validator, -1)?;
        self.apply_rewards(&plan.retroactive, validator, 1)?;

        if self.accounting == ConflictAccounting::SupportWeighted {
            let withdrawn = balance.checked_neg().ok_or(GadgetError::AmountOverflow {
                operation: "support withdrawal",
            })?;
            self.support.credit_chain(&plan.abandoned, withdrawn)?;
            self.support.credit_chain(&plan.retroactive, balance)?;
        }

        self.process_forward(validator, &plan.extension)
    }

    /// Walk `blocks` oldest-first: apply rewards, then credit the
    /// post-reward balance.
    fn process_forward(&mut self, validator: ValidatorId, blocks: &[BlockId]) -> GadgetResult<()> {
        let tree = self.tree;
        for &id in blocks.iter().rev() {
            let block = tree.block(id)?;
            let balance = self
                .ledger
                .apply_block_rewards(block, validator, 1, &self.rewards)?;
            self.support.credit(id, balance)?;
        }
        Ok(())
    }

    fn apply_rewards(
        &mut self,
        blocks: &[BlockId],
        validator: ValidatorId,
        sign: Amount,
    ) -> GadgetResult<()> {
        let tree = self.tree;
        for &id in blocks {
            self.ledger
                .apply_block_rewards(tree.block(id)?, validator, sign, &self.rewards)?;
        }
        Ok(())
    }

    fn balance(&self, validator: ValidatorId) -> GadgetResult<Amount> {
        self.ledger
            .balance_of(validator)
            .ok_or(GadgetError::UnknownValidator { validator })
    }
}
