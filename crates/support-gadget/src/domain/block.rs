//! Block, attestation and delta records
//!
//! A `BlockProposal` is what a caller submits. Once accepted it becomes an
//! immutable `Block` owned by the block tree, addressed by its `BlockId`.

use super::validator::{add_amount, Amount, ValidatorId};
use crate::error::GadgetResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena handle of an accepted block. Genesis is always index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub usize);

impl BlockId {
    pub const GENESIS: Self = Self(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A validator's vote for `target` as its preferred head, made at `slot`.
///
/// Inclusion is decoupled from casting: the including block's slot can be
/// anything later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub validator: ValidatorId,
    pub slot: u64,
    pub target: BlockId,
}

impl Attestation {
    pub fn new(validator: ValidatorId, slot: u64, target: BlockId) -> Self {
        Self {
            validator,
            slot,
            target,
        }
    }
}

/// Signed deposit adjustment unrelated to attestation or proposal rewards
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub validator: ValidatorId,
    pub size: Amount,
}

impl Delta {
    pub fn new(validator: ValidatorId, size: Amount) -> Self {
        Self { validator, size }
    }
}

/// A block as submitted for acceptance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockProposal {
    /// Human-readable name, used only in reports and logs
    pub label: String,
    pub parent: BlockId,
    pub proposer: ValidatorId,
    pub slot: u64,
    /// Validators eligible to attest at this slot (informational)
    pub committee: Vec<ValidatorId>,
    pub attestations: Vec<Attestation>,
    pub deltas: Vec<Delta>,
}

impl BlockProposal {
    pub fn new(
        label: impl Into<String>,
        parent: BlockId,
        proposer: ValidatorId,
        slot: u64,
    ) -> Self {
        Self {
            label: label.into(),
            parent,
            proposer,
            slot,
            committee: Vec::new(),
            attestations: Vec::new(),
            deltas: Vec::new(),
        }
    }

    pub fn with_committee(mut self, committee: impl IntoIterator<Item = ValidatorId>) -> Self {
        self.committee.extend(committee);
        self
    }

    pub fn with_attestation(mut self, validator: ValidatorId, slot: u64, target: BlockId) -> Self {
        self.attestations.push(Attestation::new(validator, slot, target));
        self
    }

    pub fn with_delta(mut self, validator: ValidatorId, size: Amount) -> Self {
        self.deltas.push(Delta::new(validator, size));
        self
    }

    /// Every validator the proposal names: proposer, attesters, delta targets
    pub fn referenced_validators(&self) -> impl Iterator<Item = ValidatorId> + '_ {
        std::iter::once(self.proposer)
            .chain(self.attestations.iter().map(|a| a.validator))
            .chain(self.deltas.iter().map(|d| d.validator))
    }
}

/// An accepted, immutable block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub label: String,
    /// `None` only for genesis
    pub parent: Option<BlockId>,
    /// `None` only for genesis
    pub proposer: Option<ValidatorId>,
    pub slot: u64,
    /// 0 for genesis, parent height + 1 otherwise
    pub height: u64,
    pub committee: Vec<ValidatorId>,
    pub attestations: Vec<Attestation>,
    pub deltas: Vec<Delta>,
}

impl Block {
    pub(crate) fn genesis() -> Self {
        Self {
            id: BlockId::GENESIS,
            label: "genesis".to_string(),
            parent: None,
            proposer: None,
            slot: 0,
            height: 0,
            committee: Vec::new(),
            attestations: Vec::new(),
            deltas: Vec::new(),
        }
    }

    pub(crate) fn from_proposal(id: BlockId, height: u64, proposal: BlockProposal) -> Self {
        Self {
            id,
            label: proposal.label,
            parent: Some(proposal.parent),
            proposer: Some(proposal.proposer),
            slot: proposal.slot,
            height,
            committee: proposal.committee,
            attestations: proposal.attestations,
            deltas: proposal.deltas,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.parent.is_none()
    }

    pub fn proposed_by(&self, validator: ValidatorId) -> bool {
        self.proposer == Some(validator)
    }

    /// Number of attestations in this block's payload naming `validator`
    pub fn attestations_by(&self, validator: ValidatorId) -> usize {
        self.attestations
            .iter()
            .filter(|a| a.validator == validator)
            .count()
    }

    /// Sum of this block's deltas naming `validator`
    pub fn delta_total_for(&self, validator: ValidatorId) -> GadgetResult<Amount> {
        self.deltas
            .iter()
            .filter(|d| d.validator == validator)
            .try_fold(0, |total, d| add_amount(total, d.size, "delta total"))
    }

    /// Sum of every delta in this block's payload
    pub fn delta_total(&self) -> GadgetResult<Amount> {
        self.deltas
            .iter()
            .try_fold(0, |total, d| add_amount(total, d.size, "delta total"))
    }

    /// Whether `validator` proposed this block or is attested in its payload
    pub fn involves(&self, validator: ValidatorId) -> bool {
        self.proposed_by(validator) || self.attestations_by(validator) > 0
    }
}
