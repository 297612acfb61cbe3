//! Domain module for the Support Gadget
//!
//! ## Core Modules
//! - block / block_tree: immutable blocks in a genesis-rooted arena
//! - ledger: deposit balances and the reward schedule
//! - journal: undo log that makes block application all-or-nothing
//! - support: per-block current and maximum support
//! - resolver: forward extensions and fork switches
//! - report: serializable snapshot for presentation layers

pub mod block;
pub mod block_tree;
pub(crate) mod journal;
pub mod ledger;
pub mod report;
pub mod resolver;
pub mod support;
pub mod validator;

pub use block::{Attestation, Block, BlockId, BlockProposal, Delta};
pub use block_tree::BlockTree;
pub use ledger::{DepositLedger, RewardSchedule};
pub use report::{BlockSupport, SupportReport, ValidatorBalance};
pub use resolver::{ConflictPlan, VoteOutcome, VoteResolver};
pub use support::{SupportAccumulator, SupportScore};
pub use validator::{Amount, ValidatorId};
