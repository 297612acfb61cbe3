//! # Gadget Node
//!
//! Host-side pieces around the support gadget engine:
//!
//! - `telemetry/` - Logging configuration and subscriber setup
//! - `scenarios/` - Scripted block sequences and a runner that feeds them in
//! - `report/` - Plain-text rendering of a finished run

pub mod report;
pub mod scenarios;
pub mod telemetry;

pub use report::render_text;
pub use scenarios::{Scenario, ScenarioBlock, ScenarioError, ScenarioRun, ScenarioStep};
pub use telemetry::{init_logging, TelemetryConfig, TelemetryError};
