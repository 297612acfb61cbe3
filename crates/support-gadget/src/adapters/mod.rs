//! # Adapters Layer
//!
//! Implementations of the outbound policy ports: the trivial stubs the
//! engine runs with by default, plus concrete policies hosts can opt into.

mod block_validator;
mod slashing;

pub use block_validator::{AcceptAllBlocks, SlotOrderValidator};
pub use slashing::{NeverSlash, SameHeightDoubleVote};
