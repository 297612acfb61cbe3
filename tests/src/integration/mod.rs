//! Cross-crate tests driving the engine through the scenario runner

mod properties;
mod reference_traces;
