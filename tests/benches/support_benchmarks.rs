//! # Support Gadget Benchmarks
//!
//! | Workload | What it stresses |
//! |----------|------------------|
//! | linear chain | forward extensions, one block per vote |
//! | random tree | fork switches across bushy trees |
//! | fork scenario | full replay of the scripted forked tree |
//! | deep fork switch | one vote crossing two long branches |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gadget_node::Scenario;
use gadget_tests::fixtures::{allocation, linear_chain, random_tree, TreeShape};
use std::time::Duration;
use support_gadget::{
    BlockId, BlockProposal, ConflictAccounting, GadgetConfig, SupportGadget, SupportGadgetApi,
    ValidatorId,
};

fn replay(config: &GadgetConfig, validators: u64, proposals: &[BlockProposal]) -> usize {
    let gadget = SupportGadget::with_stubs(config.clone(), allocation(validators))
        .expect("valid config");
    for proposal in proposals {
        gadget
            .accept_block(proposal.clone())
            .expect("known references");
    }
    gadget.blocks().len()
}

fn bench_linear_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear-chain");
    group.measurement_time(Duration::from_secs(5));
    let config = GadgetConfig::default();

    for size in [100usize, 1_000] {
        let proposals = linear_chain(16, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("accept", size), &proposals, |b, p| {
            b.iter(|| black_box(replay(&config, 16, p)))
        });
    }
    group.finish();
}

fn bench_random_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("random-tree");

    for accounting in [ConflictAccounting::SupportWeighted, ConflictAccounting::Reference] {
        let config = GadgetConfig::default().with_conflict_accounting(accounting);
        let shape = TreeShape {
            validators: 32,
            blocks: 512,
            extend_tip: 0.6,
            ..TreeShape::default()
        };
        let proposals = random_tree(7, shape);
        group.throughput(Throughput::Elements(shape.blocks as u64));
        group.bench_with_input(
            BenchmarkId::new("accept", format!("{accounting:?}")),
            &proposals,
            |b, p| b.iter(|| black_box(replay(&config, shape.validators, p))),
        );
    }
    group.finish();
}

fn bench_fork_scenario(c: &mut Criterion) {
    let scenario = Scenario::fork();
    let config = GadgetConfig::reference();
    c.bench_function("fork-scenario", |b| {
        b.iter(|| black_box(scenario.run(config.clone()).expect("scenario runs")))
    });
}

/// Two branches of `depth` blocks off genesis; a validator on the first
/// switches to the tip of the second.
fn bench_deep_fork_switch(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep-fork-switch");

    for depth in [64usize, 512] {
        let mut proposals = Vec::with_capacity(2 * depth + 1);
        let mut parent = BlockId::GENESIS;
        for i in 0..depth {
            let slot = i as u64 + 1;
            proposals.push(BlockProposal::new(format!("a{slot}"), parent, ValidatorId(1), slot));
            parent = BlockId(i + 1);
        }
        let tip_a = parent;
        parent = BlockId::GENESIS;
        for i in 0..depth {
            let slot = (depth + i) as u64 + 1;
            proposals.push(BlockProposal::new(format!("b{slot}"), parent, ValidatorId(2), slot));
            parent = BlockId(depth + i + 1);
        }
        let tip_b = parent;
        proposals.push(
            BlockProposal::new("switch", tip_b, ValidatorId(3), 2 * depth as u64 + 1)
                .with_attestation(ValidatorId(1), depth as u64, tip_b),
        );

        let config = GadgetConfig::default();
        group.bench_with_input(BenchmarkId::new("switch", depth), &proposals, |b, p| {
            b.iter(|| {
                let gadget =
                    SupportGadget::with_stubs(config.clone(), allocation(3)).expect("valid config");
                for proposal in p {
                    gadget
                        .accept_block(proposal.clone())
                        .expect("known references");
                }
                black_box(gadget.last_target_of(ValidatorId(1)) != Some(tip_a))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_linear_chain,
    bench_random_tree,
    bench_fork_scenario,
    bench_deep_fork_switch
);
criterion_main!(benches);
