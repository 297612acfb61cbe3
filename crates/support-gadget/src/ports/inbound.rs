//! Driving Ports (API - Inbound)

use crate::domain::{
    Amount, Block, BlockId, BlockProposal, SupportReport, SupportScore, ValidatorId, VoteOutcome,
};
use crate::error::GadgetResult;
use serde::{Deserialize, Serialize};

/// Why a vote was cast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteSource {
    /// Explicit attestation in the block's payload
    Attestation,
    /// Proposer's implicit vote for its own block
    Proposer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub validator: ValidatorId,
    pub target: BlockId,
    pub source: VoteSource,
    pub outcome: VoteOutcome,
}

/// Result of accepting a block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReceipt {
    pub block: BlockId,
    pub height: u64,
    /// Max support opened for the block
    pub max_support: Amount,
    /// Attestation votes in payload order, then the proposer's vote
    pub votes: Vec<VoteReceipt>,
}

impl BlockReceipt {
    pub fn conflicts(&self) -> impl Iterator<Item = &VoteReceipt> {
        self.votes.iter().filter(|v| v.outcome.is_conflict())
    }

    pub fn proposer_vote(&self) -> Option<&VoteReceipt> {
        self.votes.iter().find(|v| v.source == VoteSource::Proposer)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockOutcome {
    Accepted(BlockReceipt),
    /// Validity predicate said no; nothing was mutated
    Rejected,
}

impl BlockOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn receipt(&self) -> Option<&BlockReceipt> {
        match self {
            Self::Accepted(receipt) => Some(receipt),
            Self::Rejected => None,
        }
    }

    pub fn block_id(&self) -> Option<BlockId> {
        self.receipt().map(|r| r.block)
    }
}

/// Primary Support Gadget API
///
/// One writer at a time: `accept_block` holds exclusive access to the engine
/// state for the whole block. Queries never mutate.
pub trait SupportGadgetApi: Send + Sync {
    /// Validate, register and account one block.
    ///
    /// # Errors
    /// Unknown parent, attestation target or validator. The proposal is
    /// refused before any state changes.
    fn accept_block(&self, proposal: BlockProposal) -> GadgetResult<BlockOutcome>;

    fn balance_of(&self, validator: ValidatorId) -> Option<Amount>;

    fn support_of(&self, block: BlockId) -> Option<SupportScore>;

    /// Block the validator is currently on record as supporting
    fn last_target_of(&self, validator: ValidatorId) -> Option<BlockId>;

    /// Known validators in genesis allocation order
    fn validators(&self) -> Vec<ValidatorId>;

    /// Accepted blocks in acceptance order, genesis first
    fn blocks(&self) -> Vec<Block>;

    fn block(&self, id: BlockId) -> Option<Block>;

    fn report(&self) -> SupportReport;
}
