//! # Support Gadget Metrics
//!
//! Prometheus metrics for monitoring block acceptance and vote resolution.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! support-gadget = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `gadget_blocks_accepted_total` - Counter of accepted blocks
//! - `gadget_blocks_rejected_total` - Counter of blocks refused by the validity predicate
//! - `gadget_votes_total` - Counter of resolved votes (by outcome)
//! - `gadget_blocks_traversed_total` - Counter of blocks walked while resolving votes

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total blocks accepted
    pub static ref BLOCKS_ACCEPTED: IntCounter = register_int_counter!(
        "gadget_blocks_accepted_total",
        "Total number of blocks accepted"
    )
    .expect("Failed to create BLOCKS_ACCEPTED metric");

    /// Total blocks rejected by the validity predicate
    pub static ref BLOCKS_REJECTED: IntCounter = register_int_counter!(
        "gadget_blocks_rejected_total",
        "Total number of blocks rejected"
    )
    .expect("Failed to create BLOCKS_REJECTED metric");

    /// Total votes resolved, labeled by outcome
    pub static ref VOTES: IntCounterVec = register_int_counter_vec!(
        "gadget_votes_total",
        "Total number of votes resolved",
        &["outcome"]
    )
    .expect("Failed to create VOTES metric");

    /// Total blocks walked during vote resolution
    pub static ref BLOCKS_TRAVERSED: IntCounter = register_int_counter!(
        "gadget_blocks_traversed_total",
        "Total number of blocks traversed while resolving votes"
    )
    .expect("Failed to create BLOCKS_TRAVERSED metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a block accepted
#[cfg(feature = "metrics")]
pub fn record_block_accepted() {
    BLOCKS_ACCEPTED.inc();
}

/// Record a block rejected
#[cfg(feature = "metrics")]
pub fn record_block_rejected() {
    BLOCKS_REJECTED.inc();
}

/// Record a resolved vote and how many blocks it walked
#[cfg(feature = "metrics")]
pub fn record_vote(outcome: &str, traversed: usize) {
    VOTES.with_label_values(&[outcome]).inc();
    BLOCKS_TRAVERSED.inc_by(traversed as u64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_block_accepted() {}

#[cfg(not(feature = "metrics"))]
pub fn record_block_rejected() {}

#[cfg(not(feature = "metrics"))]
pub fn record_vote(_outcome: &str, _traversed: usize) {}
