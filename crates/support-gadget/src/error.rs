//! Error types for the Support Gadget
//!
//! Invalid blocks are not errors: they surface as `BlockOutcome::Rejected`.
//! Everything here either rejects a proposal before any state is touched or
//! reports a broken internal invariant.

use crate::domain::{BlockId, ValidatorId};
use thiserror::Error;

/// Support Gadget errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GadgetError {
    /// Block handle not present in the block tree
    #[error("Unknown block: {block}")]
    UnknownBlock { block: BlockId },

    /// Proposal references a parent that has not been accepted
    #[error("Unknown parent {parent} for block '{label}'")]
    UnknownParent { parent: BlockId, label: String },

    /// Attestation targets a block that has not been accepted
    #[error("Attestation by {validator} targets unknown block {target}")]
    UnknownTarget {
        validator: ValidatorId,
        target: BlockId,
    },

    /// Validator has no deposit record
    #[error("Unknown validator: {validator}")]
    UnknownValidator { validator: ValidatorId },

    /// Genesis allocation lists the same validator twice
    #[error("Duplicate validator in genesis allocation: {validator}")]
    DuplicateValidator { validator: ValidatorId },

    /// Traversal asked to walk down to a boundary above its start.
    /// Internal invariant violation: never produced by correct resolution.
    #[error(
        "Traversal boundary {boundary} (height {boundary_height}) is above {descendant} (height {descendant_height})"
    )]
    BoundaryAboveDescendant {
        descendant: BlockId,
        descendant_height: u64,
        boundary: BlockId,
        boundary_height: u64,
    },

    /// Traversal stepped above genesis. Internal invariant violation.
    #[error("Walked past genesis from {block}")]
    WalkedPastGenesis { block: BlockId },

    /// Balance, support or max support left the `Amount` range
    #[error("Amount overflow in {operation}")]
    AmountOverflow { operation: &'static str },

    /// Configuration rejected by `GadgetConfig::validate`
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl GadgetError {
    /// True for errors that indicate a bug in the engine rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::BoundaryAboveDescendant { .. } | Self::WalkedPastGenesis { .. }
        )
    }
}

/// Result type for Support Gadget operations
pub type GadgetResult<T> = Result<T, GadgetError>;
