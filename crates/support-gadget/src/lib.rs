//! # support-gadget
//!
//! Finality support gadget: deposit-weighted support accounting over a tree
//! of blocks.
//!
//! ## Overview
//!
//! This crate provides:
//! - **Block tree**: genesis-rooted arena of immutable blocks
//! - **Deposit ledger**: validator balances grown by block and attestation rewards
//! - **Support accumulator**: current and maximum support per block
//! - **Vote resolution**: forward extensions and fork switches, with a
//!   pluggable slashing policy
//!
//! ## Architecture
//!
//! ```text
//! BlockProposal ──→ SupportGadget ──→ reference check ──→ BlockValidator
//!                        │
//!                        ├── BlockTree::insert + max support
//!                        │
//!                        └── per vote ──→ VoteResolver ──→ DepositLedger
//!                                              │                │
//!                                              └──→ SupportAccumulator
//! ```
//!
//! Votes in a block are folded in payload order; the proposer's implicit
//! vote for the block itself comes last.
//!
//! ## Example
//!
//! ```rust
//! use support_gadget::{BlockId, BlockProposal, GadgetConfig, SupportGadget, ValidatorId};
//! use support_gadget::ports::inbound::SupportGadgetApi;
//!
//! let gadget = SupportGadget::with_stubs(
//!     GadgetConfig::default(),
//!     [(ValidatorId(1), 10), (ValidatorId(2), 15)],
//! )
//! .unwrap();
//!
//! let outcome = gadget
//!     .accept_block(BlockProposal::new("b1", BlockId::GENESIS, ValidatorId(1), 1))
//!     .unwrap();
//! let b1 = outcome.block_id().unwrap();
//!
//! assert_eq!(gadget.balance_of(ValidatorId(1)), Some(20));
//! assert_eq!(gadget.support_of(b1).unwrap().current, 20);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod state;
pub mod types;

pub use adapters::{AcceptAllBlocks, NeverSlash, SameHeightDoubleVote, SlotOrderValidator};
pub use domain::{
    Amount, Attestation, Block, BlockId, BlockProposal, BlockSupport, BlockTree, ConflictPlan,
    Delta, DepositLedger, RewardSchedule, SupportAccumulator, SupportReport, SupportScore,
    ValidatorBalance, ValidatorId, VoteOutcome,
};
pub use error::{GadgetError, GadgetResult};
pub use ports::inbound::{BlockOutcome, BlockReceipt, SupportGadgetApi, VoteReceipt, VoteSource};
pub use ports::outbound::{BlockValidator, SlashingPolicy};
pub use service::SupportGadget;
pub use state::GadgetState;
pub use types::{ConflictAccounting, GadgetConfig, GenesisSeed};
