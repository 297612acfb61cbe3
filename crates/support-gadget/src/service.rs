//! Support Gadget Service - block processor
//!
//! Orchestrates per-block acceptance over the engine state: reference
//! checks, the validity predicate, max-support bookkeeping, then every vote
//! in the block through the vote-conflict resolver.

use crate::adapters::{AcceptAllBlocks, NeverSlash};
use crate::domain::{
    Amount, Block, BlockId, BlockProposal, SupportReport, SupportScore, ValidatorId,
};
use crate::error::GadgetResult;
use crate::metrics;
use crate::ports::inbound::{BlockOutcome, SupportGadgetApi};
use crate::ports::outbound::{BlockValidator, SlashingPolicy};
use crate::state::GadgetState;
use crate::types::GadgetConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Support Gadget service
///
/// State sits behind a single `RwLock`: `accept_block` is the only writer
/// and holds the lock for the whole block, so blocks are applied strictly
/// one after another.
pub struct SupportGadget<V, S>
where
    V: BlockValidator,
    S: SlashingPolicy,
{
    config: GadgetConfig,
    state: Arc<RwLock<GadgetState>>,
    validator: Arc<V>,
    slashing: Arc<S>,
}

impl<V, S> SupportGadget<V, S>
where
    V: BlockValidator,
    S: SlashingPolicy,
{
    /// Create a gadget from a genesis allocation
    pub fn new(
        config: GadgetConfig,
        allocation: impl IntoIterator<Item = (ValidatorId, Amount)>,
        validator: Arc<V>,
        slashing: Arc<S>,
    ) -> GadgetResult<Self> {
        config.validate()?;
        let state = GadgetState::new(allocation, config.genesis_seed)?;
        info!(
            "[support-gadget] Genesis with {} validators, total deposit {}",
            state.ledger.validators().len(),
            state.ledger.total()?
        );

        Ok(Self {
            config,
            state: Arc::new(RwLock::new(state)),
            validator,
            slashing,
        })
    }

    pub fn config(&self) -> &GadgetConfig {
        &self.config
    }
}

impl SupportGadget<AcceptAllBlocks, NeverSlash> {
    /// Gadget with the permissive default policies
    pub fn with_stubs(
        config: GadgetConfig,
        allocation: impl IntoIterator<Item = (ValidatorId, Amount)>,
    ) -> GadgetResult<Self> {
        Self::new(
            config,
            allocation,
            Arc::new(AcceptAllBlocks),
            Arc::new(NeverSlash),
        )
    }
}

impl<V, S> SupportGadgetApi for SupportGadget<V, S>
where
    V: BlockValidator,
    S: SlashingPolicy,
{
    fn accept_block(&self, proposal: BlockProposal) -> GadgetResult<BlockOutcome> {
        let mut state = self.state.write();
        state.check_references(&proposal)?;

        if !self.validator.is_valid_block(&state.tree, &proposal) {
            info!(
                "[support-gadget] Rejected block '{}' on {} by {}",
                proposal.label, proposal.parent, proposal.proposer
            );
            metrics::record_block_rejected();
            return Ok(BlockOutcome::Rejected);
        }

        let label = proposal.label.clone();
        let receipt = state
            .apply_block(proposal, &self.config, self.slashing.as_ref())
            .inspect_err(|e| {
                if e.is_invariant_violation() {
                    error!("[support-gadget] Invariant violated accepting '{}': {}", label, e);
                } else {
                    warn!("[support-gadget] Rolled back '{}': {}", label, e);
                }
            })?;

        info!(
            "[support-gadget] Accepted '{}' as {} at height {} (max support {}, {} votes, {} conflicts)",
            label,
            receipt.block,
            receipt.height,
            receipt.max_support,
            receipt.votes.len(),
            receipt.conflicts().count()
        );
        metrics::record_block_accepted();
        Ok(BlockOutcome::Accepted(receipt))
    }

    fn balance_of(&self, validator: ValidatorId) -> Option<Amount> {
        self.state.read().ledger.balance_of(validator)
    }

    fn support_of(&self, block: BlockId) -> Option<SupportScore> {
        self.state.read().support.support_of(block)
    }

    fn last_target_of(&self, validator: ValidatorId) -> Option<BlockId> {
        self.state.read().last_target_of(validator)
    }

    fn validators(&self) -> Vec<ValidatorId> {
        self.state.read().ledger.validators().to_vec()
    }

    fn blocks(&self) -> Vec<Block> {
        self.state.read().tree.iter().cloned().collect()
    }

    fn block(&self, id: BlockId) -> Option<Block> {
        self.state.read().tree.get(id).cloned()
    }

    fn report(&self) -> SupportReport {
        self.state.read().report()
    }
}
