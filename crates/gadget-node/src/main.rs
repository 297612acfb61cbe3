//! # Gadget Node
//!
//! Runs the scripted scenarios through the support gadget and prints the
//! resulting deposits and per-block support.
//!
//! ## Configuration
//!
//! Engine parameters come from the environment (`GADGET_BLOCK_REWARD`,
//! `GADGET_ATTESTATION_REWARD`, `GADGET_GENESIS_SEED`,
//! `GADGET_CONFLICT_ACCOUNTING`), logging from `GADGET_LOG_LEVEL` /
//! `RUST_LOG` and `GADGET_JSON_LOGS`. Command-line flags win over both.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use gadget_node::{init_logging, render_text, Scenario, TelemetryConfig};
use support_gadget::{ConflictAccounting, GadgetConfig, GenesisSeed};

#[derive(Parser, Debug)]
#[command(name = "gadget-node")]
#[command(about = "Replay block scenarios through the finality support gadget")]
struct Args {
    /// Scenario to run: simple, fork or all
    #[arg(default_value = "all")]
    scenario: String,

    /// Emit the run as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Seed genesis support with total deposits and use reference
    /// conflict accounting
    #[arg(long)]
    reference: bool,

    /// Genesis seeding: zero or total-deposits
    #[arg(long)]
    genesis_seed: Option<GenesisSeed>,

    /// Fork-switch accounting: support-weighted or reference
    #[arg(long)]
    accounting: Option<ConflictAccounting>,

    /// Log level override
    #[arg(short, long)]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> Result<GadgetConfig> {
    let mut config = if args.reference {
        GadgetConfig::reference()
    } else {
        GadgetConfig::from_env().context("reading gadget configuration from environment")?
    };
    if let Some(seed) = args.genesis_seed {
        config = config.with_genesis_seed(seed);
    }
    if let Some(accounting) = args.accounting {
        config = config.with_conflict_accounting(accounting);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &args.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    init_logging(&telemetry)?;

    let config = load_config(&args)?;
    info!(
        "Gadget config: block reward {}, attestation reward {}, seed {:?}, accounting {:?}",
        config.block_reward,
        config.attestation_reward,
        config.genesis_seed,
        config.conflict_accounting
    );

    let scenarios = match args.scenario.as_str() {
        "all" => Scenario::all(),
        name => vec![Scenario::by_name(name)?],
    };

    let mut runs = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        let run = scenario
            .run(config.clone())
            .with_context(|| format!("running scenario '{}'", scenario.name))?;
        runs.push(run);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
    } else {
        for run in &runs {
            println!("{}", render_text(run));
        }
    }

    Ok(())
}
