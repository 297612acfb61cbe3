//! # Support Gadget Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Random block trees shared by tests and benches
//! └── integration/
//!     ├── reference_traces.rs  # Full scenario replays against known numbers
//!     ├── fork_switch.rs       # Per-block deposits and fork-switch plans
//!     └── properties.rs        # Invariants over random trees
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gadget-tests
//!
//! # By category
//! cargo test -p gadget-tests integration::reference_traces::
//! cargo test -p gadget-tests integration::properties::
//!
//! # Benchmarks
//! cargo bench -p gadget-tests
//! ```

pub mod integration;
