//! Scripted block sequences.
//!
//! Blocks name their parent and attestation targets by label; labels are
//! resolved to `BlockId`s as blocks are accepted.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use support_gadget::{
    AcceptAllBlocks, Amount, BlockId, BlockOutcome, BlockProposal, BlockValidator, GadgetConfig,
    GadgetError, NeverSlash, SlashingPolicy, SupportGadget, SupportGadgetApi, SupportReport,
    ValidatorId,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Unknown scenario '{0}' (expected one of: simple, fork)")]
    UnknownScenario(String),

    #[error("Block '{block}' references unknown label '{label}'")]
    UnknownLabel { block: String, label: String },

    #[error(transparent)]
    Gadget(#[from] GadgetError),
}

/// One block of a scenario, referring to other blocks by label
#[derive(Clone, Debug)]
pub struct ScenarioBlock {
    pub label: String,
    pub parent: String,
    pub proposer: ValidatorId,
    pub slot: u64,
    pub committee: Vec<ValidatorId>,
    /// (validator, slot, target label)
    pub attestations: Vec<(ValidatorId, u64, String)>,
    pub deltas: Vec<(ValidatorId, Amount)>,
}

impl ScenarioBlock {
    pub fn new(label: &str, parent: &str, proposer: u64, slot: u64, committee: [u64; 2]) -> Self {
        Self {
            label: label.to_string(),
            parent: parent.to_string(),
            proposer: ValidatorId(proposer),
            slot,
            committee: committee.into_iter().map(ValidatorId).collect(),
            attestations: Vec::new(),
            deltas: Vec::new(),
        }
    }

    pub fn attest(mut self, validator: u64, slot: u64, target: &str) -> Self {
        self.attestations
            .push((ValidatorId(validator), slot, target.to_string()));
        self
    }

    pub fn delta(mut self, validator: u64, size: Amount) -> Self {
        self.deltas.push((ValidatorId(validator), size));
        self
    }

    fn to_proposal(&self, ids: &HashMap<String, BlockId>) -> Result<BlockProposal, ScenarioError> {
        let resolve = |label: &str| {
            ids.get(label).copied().ok_or_else(|| ScenarioError::UnknownLabel {
                block: self.label.clone(),
                label: label.to_string(),
            })
        };

        let mut proposal = BlockProposal::new(
            self.label.clone(),
            resolve(&self.parent)?,
            self.proposer,
            self.slot,
        )
        .with_committee(self.committee.iter().copied());
        for (validator, slot, target) in &self.attestations {
            proposal = proposal.with_attestation(*validator, *slot, resolve(target)?);
        }
        for &(validator, size) in &self.deltas {
            proposal = proposal.with_delta(validator, size);
        }
        Ok(proposal)
    }
}

#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: String,
    pub allocation: Vec<(ValidatorId, Amount)>,
    pub blocks: Vec<ScenarioBlock>,
}

/// Outcome of feeding one scenario block
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioStep {
    pub label: String,
    pub outcome: BlockOutcome,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScenarioRun {
    pub scenario: String,
    pub config: GadgetConfig,
    pub steps: Vec<ScenarioStep>,
    pub report: SupportReport,
}

impl ScenarioRun {
    pub fn step(&self, label: &str) -> Option<&ScenarioStep> {
        self.steps.iter().find(|s| s.label == label)
    }
}

/// Five validators with deposits 10, 15, 20, 25, 30
pub fn default_allocation() -> Vec<(ValidatorId, Amount)> {
    (1..=5u64).map(|n| (ValidatorId(n), 5 + 5 * n as Amount)).collect()
}

impl Scenario {
    /// Linear chain of seven blocks
    pub fn simple() -> Self {
        let blocks = vec![
            ScenarioBlock::new("b1", "genesis", 1, 1, [3, 4]),
            ScenarioBlock::new("b2", "b1", 2, 2, [4, 5]).attest(4, 1, "b1"),
            ScenarioBlock::new("b3", "b2", 3, 3, [1, 2])
                .attest(3, 1, "b1")
                .attest(4, 2, "b1")
                .attest(5, 2, "b2"),
            ScenarioBlock::new("b4", "b3", 5, 4, [1, 5])
                .attest(1, 3, "b3")
                .attest(2, 3, "b2"),
            ScenarioBlock::new("b5", "b4", 4, 5, [2, 5])
                .attest(1, 4, "b3")
                .attest(5, 4, "b4"),
            ScenarioBlock::new("b6", "b5", 3, 6, [1, 3])
                .attest(2, 5, "b5")
                .attest(5, 5, "b5"),
            ScenarioBlock::new("b7", "b6", 5, 7, [1, 2])
                .attest(1, 6, "b6")
                .attest(3, 6, "b6"),
        ];

        Self {
            name: "simple".to_string(),
            allocation: default_allocation(),
            blocks,
        }
    }

    /// Sixteen blocks with two forks (at b2 and at b10) and deposit deltas
    pub fn fork() -> Self {
        let blocks = vec![
            ScenarioBlock::new("b1", "genesis", 1, 1, [3, 4]),
            ScenarioBlock::new("b2", "b1", 2, 2, [4, 5]).attest(4, 1, "b1"),
            ScenarioBlock::new("b3", "b2", 3, 3, [1, 2])
                .attest(3, 1, "b1")
                .attest(4, 2, "b1")
                .attest(5, 2, "b2"),
            ScenarioBlock::new("b4", "b2", 5, 4, [1, 5])
                .attest(1, 3, "b2")
                .attest(2, 3, "b2"),
            ScenarioBlock::new("b5", "b4", 4, 5, [2, 5])
                .attest(1, 4, "b2")
                .attest(5, 4, "b4"),
            ScenarioBlock::new("b6", "b5", 3, 6, [1, 4])
                .attest(2, 5, "b5")
                .attest(5, 5, "b5")
                .delta(1, 50)
                .delta(2, -20),
            ScenarioBlock::new("b7", "b6", 5, 7, [1, 3])
                .attest(1, 6, "b6")
                .attest(4, 6, "b6"),
            ScenarioBlock::new("b8", "b7", 1, 8, [4, 5])
                .attest(1, 7, "b7")
                .attest(3, 7, "b7"),
            ScenarioBlock::new("b9", "b8", 2, 9, [1, 2])
                .attest(4, 8, "b8")
                .attest(5, 8, "b8"),
            ScenarioBlock::new("b10", "b9", 3, 10, [4, 5])
                .attest(1, 9, "b9")
                .attest(2, 9, "b9"),
            ScenarioBlock::new("b11", "b10", 4, 11, [1, 3])
                .attest(4, 10, "b10")
                .attest(5, 10, "b10"),
            ScenarioBlock::new("b12", "b11", 3, 12, [4, 5])
                .attest(1, 11, "b11")
                .attest(3, 11, "b11"),
            ScenarioBlock::new("b13", "b10", 1, 13, [2, 3]).attest(5, 12, "b10"),
            ScenarioBlock::new("b14", "b13", 1, 14, [3, 5])
                .attest(2, 13, "b13")
                .attest(3, 13, "b13"),
            ScenarioBlock::new("b15", "b14", 2, 15, [3, 4])
                .attest(3, 14, "b14")
                .attest(5, 14, "b14"),
            ScenarioBlock::new("b16", "b15", 5, 16, [1, 2])
                .attest(3, 15, "b15")
                .attest(4, 15, "b15"),
        ];

        Self {
            name: "fork".to_string(),
            allocation: default_allocation(),
            blocks,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::simple(), Self::fork()]
    }

    pub fn by_name(name: &str) -> Result<Self, ScenarioError> {
        match name {
            "simple" => Ok(Self::simple()),
            "fork" => Ok(Self::fork()),
            other => Err(ScenarioError::UnknownScenario(other.to_string())),
        }
    }

    /// Proposals with labels resolved as if every block is accepted in order
    pub fn proposals(&self) -> Result<Vec<BlockProposal>, ScenarioError> {
        let mut ids = genesis_ids();
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let proposal = block.to_proposal(&ids)?;
                ids.insert(block.label.clone(), BlockId(i + 1));
                Ok(proposal)
            })
            .collect()
    }

    /// Run with the permissive default policies
    pub fn run(&self, config: GadgetConfig) -> Result<ScenarioRun, ScenarioError> {
        self.run_with(config, Arc::new(AcceptAllBlocks), Arc::new(NeverSlash))
    }

    pub fn run_with<V, S>(
        &self,
        config: GadgetConfig,
        validator: Arc<V>,
        slashing: Arc<S>,
    ) -> Result<ScenarioRun, ScenarioError>
    where
        V: BlockValidator,
        S: SlashingPolicy,
    {
        info!(
            "Running scenario '{}' ({} blocks, {} validators)",
            self.name,
            self.blocks.len(),
            self.allocation.len()
        );
        let gadget = SupportGadget::new(
            config.clone(),
            self.allocation.iter().copied(),
            validator,
            slashing,
        )?;
        let steps = self.feed(&gadget)?;

        Ok(ScenarioRun {
            scenario: self.name.clone(),
            config,
            steps,
            report: gadget.report(),
        })
    }

    /// Feed every block into an existing gadget. Rejected blocks stay
    /// unresolvable, so later blocks naming them fail with `UnknownLabel`.
    pub fn feed<G: SupportGadgetApi + ?Sized>(
        &self,
        gadget: &G,
    ) -> Result<Vec<ScenarioStep>, ScenarioError> {
        let mut ids = genesis_ids();
        let mut steps = Vec::with_capacity(self.blocks.len());

        for block in &self.blocks {
            let outcome = gadget.accept_block(block.to_proposal(&ids)?)?;
            if let Some(id) = outcome.block_id() {
                ids.insert(block.label.clone(), id);
            } else {
                debug!("Scenario block '{}' was rejected", block.label);
            }
            steps.push(ScenarioStep {
                label: block.label.clone(),
                outcome,
            });
        }
        Ok(steps)
    }
}

fn genesis_ids() -> HashMap<String, BlockId> {
    HashMap::from([("genesis".to_string(), BlockId::GENESIS)])
}
