//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Policies the engine consults but does not own. Stub implementations live
//! in `crate::adapters`.

use crate::domain::{Block, BlockProposal, BlockTree, ValidatorId};

/// Structural/signature validity of a proposal.
///
/// Consulted before anything is mutated. The engine has already checked that
/// every block and validator the proposal references exists.
pub trait BlockValidator: Send + Sync {
    fn is_valid_block(&self, tree: &BlockTree, proposal: &BlockProposal) -> bool;
}

/// Double-vote detection and the penalty hook.
///
/// Asked only for conflicting votes (never for a forward extension). When it
/// answers true the vote is dropped without any deposit or support
/// accounting and `slash` is invoked for the validator.
pub trait SlashingPolicy: Send + Sync {
    fn is_slashable_conflict(&self, new_target: &Block, last_target: &Block) -> bool;

    fn slash(&self, validator: ValidatorId);
}
