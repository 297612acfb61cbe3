//! Plain-text rendering of scenario runs

use crate::scenarios::ScenarioRun;
use std::collections::HashMap;
use std::fmt::Write;
use support_gadget::{BlockId, VoteOutcome};

/// Render deposits, per-block support and the fork switches of a run.
pub fn render_text(run: &ScenarioRun) -> String {
    let labels: HashMap<BlockId, &str> = run
        .report
        .support
        .iter()
        .map(|s| (s.block, s.label.as_str()))
        .collect();
    let name = |id: &BlockId| labels.get(id).copied().unwrap_or("?").to_string();

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "Scenario: {} (genesis seed {:?}, {:?} accounting)",
        run.scenario, run.config.genesis_seed, run.config.conflict_accounting
    );

    let _ = writeln!(out, "Deposits:");
    for d in &run.report.deposits {
        let _ = writeln!(out, " {}: {}", d.validator, d.balance);
    }

    let _ = writeln!(out, "Support:");
    for s in &run.report.support {
        let _ = writeln!(out, " {}: {}/{}", s.label, s.current, s.max);
    }

    let mut switches = Vec::new();
    for step in &run.steps {
        let Some(receipt) = step.outcome.receipt() else {
            switches.push(format!(" {}: rejected", step.label));
            continue;
        };
        for vote in receipt.conflicts() {
            let line = match &vote.outcome {
                VoteOutcome::ForkSwitch(plan) => format!(
                    " {}: {} -> {} via {} (abandoned {}, retroactive {}, extension {})",
                    step.label,
                    vote.validator,
                    name(&vote.target),
                    name(&plan.common_ancestor),
                    plan.abandoned.len(),
                    plan.retroactive.len(),
                    plan.extension.len()
                ),
                VoteOutcome::Slashed { last_target } => format!(
                    " {}: {} slashed voting {} after {}",
                    step.label,
                    vote.validator,
                    name(&vote.target),
                    name(last_target)
                ),
                VoteOutcome::ForwardExtension { .. } => continue,
            };
            switches.push(line);
        }
    }
    if !switches.is_empty() {
        let _ = writeln!(out, "Conflicts:");
        for line in switches {
            let _ = writeln!(out, "{line}");
        }
    }

    out
}
