//! Deposit ledger and reward schedule
//!
//! Balances are signed and unclamped: a validator whose penalties exceed its
//! deposit simply carries a negative balance.

use super::block::Block;
use super::journal::Journal;
use super::validator::{add_amount, scale_amount, Amount, ValidatorId};
use crate::error::{GadgetError, GadgetResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Protocol reward parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Credited to a proposer for its own block
    pub block_reward: Amount,
    /// Credited per included attestation naming the validator
    pub attestation_reward: Amount,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            block_reward: 10,
            attestation_reward: 1,
        }
    }
}

impl RewardSchedule {
    /// What `validator` earns from `block`'s payload.
    ///
    /// Each attestation and each delta naming the validator counts once per
    /// occurrence; proposing the block earns the block reward.
    pub fn earned_in(&self, block: &Block, validator: ValidatorId) -> GadgetResult<Amount> {
        let attested = scale_amount(
            self.attestation_reward,
            block.attestations_by(validator),
            "attestation rewards",
        )?;
        let mut earned = add_amount(attested, block.delta_total_for(validator)?, "earned rewards")?;
        if block.proposed_by(validator) {
            earned = add_amount(earned, self.block_reward, "earned rewards")?;
        }
        Ok(earned)
    }

    /// Max-support contribution of a block: what the network could have
    /// earned for it regardless of how its votes resolve.
    pub fn capacity_of(&self, block: &Block) -> GadgetResult<Amount> {
        let attested = scale_amount(
            self.attestation_reward,
            block.attestations.len(),
            "block capacity",
        )?;
        let capacity = add_amount(self.block_reward, attested, "block capacity")?;
        add_amount(capacity, block.delta_total()?, "block capacity")
    }
}

/// Validator deposit balances
#[derive(Clone, Debug, Default)]
pub struct DepositLedger {
    balances: HashMap<ValidatorId, Amount>,
    /// Genesis allocation order, for stable enumeration
    order: Vec<ValidatorId>,
    journal: Journal<ValidatorId, Amount>,
}

impl DepositLedger {
    /// Build from a genesis allocation
    pub fn from_genesis(
        allocation: impl IntoIterator<Item = (ValidatorId, Amount)>,
    ) -> GadgetResult<Self> {
        let mut ledger = Self::default();
        for (validator, deposit) in allocation {
            if ledger.balances.insert(validator, deposit).is_some() {
                return Err(GadgetError::DuplicateValidator { validator });
            }
            ledger.order.push(validator);
        }
        Ok(ledger)
    }

    /// Apply a signed adjustment, returning the new balance
    pub fn adjust(&mut self, validator: ValidatorId, amount: Amount) -> GadgetResult<Amount> {
        let balance = self
            .balances
            .get_mut(&validator)
            .ok_or(GadgetError::UnknownValidator { validator })?;
        let previous = *balance;
        *balance = add_amount(previous, amount, "deposit balance")?;
        self.journal.record(validator, Some(previous));
        Ok(*balance)
    }

    pub fn balance_of(&self, validator: ValidatorId) -> Option<Amount> {
        self.balances.get(&validator).copied()
    }

    pub fn contains(&self, validator: ValidatorId) -> bool {
        self.balances.contains_key(&validator)
    }

    /// Validators in genesis allocation order
    pub fn validators(&self) -> &[ValidatorId] {
        &self.order
    }

    /// Sum of all balances
    pub fn total(&self) -> GadgetResult<Amount> {
        self.balances
            .values()
            .try_fold(0, |total, &balance| add_amount(total, balance, "deposit total"))
    }

    /// Start journaling balance changes
    pub(crate) fn checkpoint(&mut self) {
        self.journal.open();
    }

    pub(crate) fn commit(&mut self) {
        self.journal.commit();
    }

    /// Undo every adjustment since `checkpoint`
    pub(crate) fn rollback(&mut self) {
        self.journal.rollback(&mut self.balances);
    }

    /// Reward-application step: credit (`sign = 1`) or withdraw
    /// (`sign = -1`) what `validator` earned in `block`.
    pub fn apply_block_rewards(
        &mut self,
        block: &Block,
        validator: ValidatorId,
        sign: Amount,
        rewards: &RewardSchedule,
    ) -> GadgetResult<Amount> {
        let earned = rewards.earned_in(block, validator)?;
        let amount = sign.checked_mul(earned).ok_or(GadgetError::AmountOverflow {
            operation: "reward application",
        })?;
        self.adjust(validator, amount)
    }
}
