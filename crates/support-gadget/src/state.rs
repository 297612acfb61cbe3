use crate::domain::journal::Journal;
use crate::domain::{
    Amount, BlockId, BlockProposal, BlockSupport, BlockTree, DepositLedger, SupportAccumulator,
    SupportReport, ValidatorBalance, ValidatorId, VoteOutcome, VoteResolver,
};
use crate::error::{GadgetError, GadgetResult};
use crate::metrics;
use crate::ports::inbound::{BlockReceipt, VoteReceipt, VoteSource};
use crate::ports::outbound::SlashingPolicy;
use crate::types::{GadgetConfig, GenesisSeed};
use std::collections::HashMap;

pub struct GadgetState {
    /// Accepted blocks
    pub tree: BlockTree,
    /// Validator deposits
    pub ledger: DepositLedger,
    /// Current / max support per block
    pub support: SupportAccumulator,
    /// Most recent block each validator is on record as supporting
    pub last_target: HashMap<ValidatorId, BlockId>,
    target_journal: Journal<ValidatorId, BlockId>,
}

impl GadgetState {
    /// Genesis-only state. Every validator starts out supporting genesis.
    pub fn new(
        allocation: impl IntoIterator<Item = (ValidatorId, Amount)>,
        seed: GenesisSeed,
    ) -> GadgetResult<Self> {
        let tree = BlockTree::new();
        let ledger = DepositLedger::from_genesis(allocation)?;

        let mut support = SupportAccumulator::new();
        let seed_amount = match seed {
            GenesisSeed::Zero => 0,
            GenesisSeed::TotalDeposits => ledger.total()?,
        };
        support.seed_genesis(tree.genesis().id, seed_amount);

        let last_target = ledger
            .validators()
            .iter()
            .map(|&v| (v, tree.genesis().id))
            .collect();

        Ok(Self {
            tree,
            ledger,
            support,
            last_target,
            target_journal: Journal::default(),
        })
    }

    /// Ensure everything the proposal names already exists
    pub fn check_references(&self, proposal: &BlockProposal) -> GadgetResult<()> {
        if !self.tree.contains(proposal.parent) {
            return Err(GadgetError::UnknownParent {
                parent: proposal.parent,
                label: proposal.label.clone(),
            });
        }
        for attestation in &proposal.attestations {
            if !self.tree.contains(attestation.target) {
                return Err(GadgetError::UnknownTarget {
                    validator: attestation.validator,
                    target: attestation.target,
                });
            }
        }
        if let Some(validator) = proposal
            .referenced_validators()
            .find(|&v| !self.ledger.contains(v))
        {
            return Err(GadgetError::UnknownValidator { validator });
        }
        Ok(())
    }

    /// Register a proposal and fold in its votes: every attestation in
    /// payload order, then the proposer's implicit vote for the block itself.
    ///
    /// All or nothing: on error the tree, ledger, support and last targets
    /// are left exactly as they were.
    pub fn apply_block<S: SlashingPolicy + ?Sized>(
        &mut self,
        proposal: BlockProposal,
        config: &GadgetConfig,
        slashing: &S,
    ) -> GadgetResult<BlockReceipt> {
        self.check_references(&proposal)?;

        let block_count = self.tree.block_count();
        self.ledger.checkpoint();
        self.support.checkpoint();
        self.target_journal.open();

        let result = self.fold_block(proposal, config, slashing);
        if result.is_ok() {
            self.ledger.commit();
            self.support.commit();
            self.target_journal.commit();
        } else {
            self.ledger.rollback();
            self.support.rollback();
            self.target_journal.rollback(&mut self.last_target);
            self.tree.truncate(block_count);
        }
        result
    }

    fn fold_block<S: SlashingPolicy + ?Sized>(
        &mut self,
        proposal: BlockProposal,
        config: &GadgetConfig,
        slashing: &S,
    ) -> GadgetResult<BlockReceipt> {
        let attested: Vec<(ValidatorId, BlockId)> = proposal
            .attestations
            .iter()
            .map(|a| (a.validator, a.target))
            .collect();
        let proposer = proposal.proposer;

        // Max support is opened before the block enters the tree
        let block = self.tree.next_block(proposal)?;
        let score = self.support.on_block_accepted(&block, &config.rewards())?;
        let height = block.height;
        let id = self.tree.append(block);

        let mut votes = Vec::with_capacity(attested.len() + 1);
        let cast = attested
            .into_iter()
            .map(|(validator, target)| (validator, target, VoteSource::Attestation))
            .chain(std::iter::once((proposer, id, VoteSource::Proposer)));
        for (validator, target, source) in cast {
            let outcome = self.cast_vote(validator, target, config, slashing)?;
            votes.push(VoteReceipt {
                validator,
                target,
                source,
                outcome,
            });
        }

        Ok(BlockReceipt {
            block: id,
            height,
            max_support: score.max,
            votes,
        })
    }

    /// Resolve one vote against the validator's last target, moving the
    /// record to `target` unless the vote was slashed.
    pub fn cast_vote<S: SlashingPolicy + ?Sized>(
        &mut self,
        validator: ValidatorId,
        target: BlockId,
        config: &GadgetConfig,
        slashing: &S,
    ) -> GadgetResult<VoteOutcome> {
        let last = self
            .last_target_of(validator)
            .ok_or(GadgetError::UnknownValidator { validator })?;

        let outcome = VoteResolver::new(
            &self.tree,
            &mut self.ledger,
            &mut self.support,
            config.rewards(),
            config.conflict_accounting,
        )
        .cast_vote(validator, last, target, slashing)?;

        if outcome.updates_last_target() {
            let previous = self.last_target.insert(validator, target);
            self.target_journal.record(validator, previous);
        }
        metrics::record_vote(outcome.kind(), outcome.blocks_traversed());
        Ok(outcome)
    }

    pub fn last_target_of(&self, validator: ValidatorId) -> Option<BlockId> {
        self.last_target.get(&validator).copied()
    }

    pub fn report(&self) -> SupportReport {
        let deposits = self
            .ledger
            .validators()
            .iter()
            .map(|&validator| ValidatorBalance {
                validator,
                balance: self.ledger.balance_of(validator).unwrap_or_default(),
                last_target: self.last_target_of(validator).unwrap_or(BlockId::GENESIS),
            })
            .collect();

        let support = self
            .tree
            .iter()
            .map(|block| {
                let score = self.support.support_of(block.id).unwrap_or_default();
                BlockSupport {
                    block: block.id,
                    label: block.label.clone(),
                    height: block.height,
                    current: score.current,
                    max: score.max,
                }
            })
            .collect();

        SupportReport { deposits, support }
    }
}
