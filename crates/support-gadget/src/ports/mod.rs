//! Ports module for the Support Gadget

pub mod inbound;
pub mod outbound;

pub use inbound::{BlockOutcome, BlockReceipt, SupportGadgetApi, VoteReceipt, VoteSource};
pub use outbound::{BlockValidator, SlashingPolicy};
