//! Block validity predicates

use crate::domain::{BlockProposal, BlockTree};
use crate::ports::outbound::BlockValidator;
use tracing::debug;

/// Accepts every proposal
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllBlocks;

impl BlockValidator for AcceptAllBlocks {
    fn is_valid_block(&self, _tree: &BlockTree, _proposal: &BlockProposal) -> bool {
        true
    }
}

/// Structural slot ordering.
///
/// A proposal must sit at a later slot than its parent, and every included
/// attestation must satisfy `target.slot <= attestation.slot < proposal.slot`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlotOrderValidator;

impl BlockValidator for SlotOrderValidator {
    fn is_valid_block(&self, tree: &BlockTree, proposal: &BlockProposal) -> bool {
        let Some(parent) = tree.get(proposal.parent) else {
            return false;
        };
        if proposal.slot <= parent.slot {
            debug!(
                "[support-gadget] '{}' slot {} not after parent slot {}",
                proposal.label, proposal.slot, parent.slot
            );
            return false;
        }

        proposal.attestations.iter().all(|a| {
            let ordered = a.slot < proposal.slot
                && tree.get(a.target).is_some_and(|t| t.slot <= a.slot);
            if !ordered {
                debug!(
                    "[support-gadget] '{}' carries out-of-order attestation by {} at slot {}",
                    proposal.label, a.validator, a.slot
                );
            }
            ordered
        })
    }
}
