//! # Invariants Over Random Trees
//!
//! Properties that must hold for any block sequence:
//!
//! - a balance always equals the genesis deposit plus everything earned on
//!   the chain from genesis to the validator's last target
//! - max support grows by exactly the block's reward capacity
//! - support never exceeds max support when genesis is seeded with the
//!   total deposit
//! - accounting mode changes support, never deposits or last targets
//! - replays are deterministic

#[cfg(test)]
mod tests {
    use crate::fixtures::{allocation, linear_chain, random_tree, TreeShape};
    use gadget_node::Scenario;
    use std::sync::Arc;
    use support_gadget::{
        AcceptAllBlocks, Amount, Block, BlockId, BlockProposal, ConflictAccounting, GadgetConfig,
        NeverSlash, SameHeightDoubleVote, SlashingPolicy, SupportGadget, SupportGadgetApi,
        SupportReport, ValidatorId,
    };

    const SEEDS: [u64; 6] = [1, 2, 3, 42, 1337, 9001];

    fn replay<S: SlashingPolicy>(
        config: GadgetConfig,
        validators: u64,
        proposals: &[BlockProposal],
        slashing: Arc<S>,
    ) -> SupportGadget<AcceptAllBlocks, S> {
        let gadget = SupportGadget::new(
            config,
            allocation(validators),
            Arc::new(AcceptAllBlocks),
            slashing,
        )
        .unwrap();
        for proposal in proposals {
            assert!(gadget.accept_block(proposal.clone()).unwrap().is_accepted());
        }
        gadget
    }

    fn replay_stubs(
        config: GadgetConfig,
        validators: u64,
        proposals: &[BlockProposal],
    ) -> SupportGadget<AcceptAllBlocks, NeverSlash> {
        replay(config, validators, proposals, Arc::new(NeverSlash))
    }

    /// Everything `validator` earns on the chain from genesis up to `tip`
    fn earned_on_chain(
        blocks: &[Block],
        config: &GadgetConfig,
        validator: ValidatorId,
        tip: BlockId,
    ) -> Amount {
        let rewards = config.rewards();
        let mut earned = 0;
        let mut cursor = Some(tip);
        while let Some(id) = cursor {
            let block = &blocks[id.index()];
            earned += rewards.earned_in(block, validator).unwrap();
            cursor = block.parent;
        }
        earned
    }

    fn assert_balances_follow_chains<G: SupportGadgetApi>(
        gadget: &G,
        config: &GadgetConfig,
        validators: u64,
    ) {
        let blocks = gadget.blocks();
        for (validator, deposit) in allocation(validators) {
            let tip = gadget.last_target_of(validator).unwrap();
            assert_eq!(
                gadget.balance_of(validator).unwrap(),
                deposit + earned_on_chain(&blocks, config, validator, tip),
                "balance of {validator} with last target {tip}"
            );
        }
    }

    #[test]
    fn test_balance_matches_chain_to_last_target() {
        let shape = TreeShape::default();
        for seed in SEEDS {
            let proposals = random_tree(seed, shape);
            for accounting in [ConflictAccounting::SupportWeighted, ConflictAccounting::Reference]
            {
                let config = GadgetConfig::default().with_conflict_accounting(accounting);
                let gadget = replay_stubs(config.clone(), shape.validators, &proposals);
                assert_balances_follow_chains(&gadget, &config, shape.validators);
            }
        }
    }

    #[test]
    fn test_balance_invariant_survives_slashing() {
        let shape = TreeShape {
            extend_tip: 0.3,
            ..TreeShape::default()
        };
        let mut slashed_somewhere = false;
        for seed in SEEDS {
            let proposals = random_tree(seed, shape);
            let policy = Arc::new(SameHeightDoubleVote::new());
            let config = GadgetConfig::default();
            let gadget = replay(
                config.clone(),
                shape.validators,
                &proposals,
                Arc::clone(&policy),
            );

            assert_balances_follow_chains(&gadget, &config, shape.validators);
            slashed_somewhere |= !policy.slashed().is_empty();
        }
        assert!(slashed_somewhere, "bushy trees should produce double votes");
    }

    #[test]
    fn test_max_support_grows_by_capacity() {
        let shape = TreeShape::default();
        for seed in SEEDS {
            let config = GadgetConfig::default();
            let gadget = replay_stubs(config.clone(), shape.validators, &random_tree(seed, shape));
            let rewards = config.rewards();

            for block in gadget.blocks() {
                let max = gadget.support_of(block.id).unwrap().max;
                match block.parent {
                    None => assert_eq!(max, 0),
                    Some(parent) => assert_eq!(
                        max,
                        gadget.support_of(parent).unwrap().max
                            + rewards.capacity_of(&block).unwrap()
                    ),
                }
            }
        }
    }

    fn assert_support_within_max<G: SupportGadgetApi>(gadget: &G, after: &str) {
        for block in gadget.blocks() {
            let score = gadget.support_of(block.id).unwrap();
            assert!(
                score.within_max(),
                "{} at {}/{} after {after}",
                block.label,
                score.current,
                score.max
            );
        }
    }

    #[test]
    fn test_support_within_max_with_seeded_genesis() {
        for scenario in Scenario::all() {
            let gadget = SupportGadget::with_stubs(
                GadgetConfig::reference(),
                scenario.allocation.iter().copied(),
            )
            .unwrap();

            for proposal in scenario.proposals().unwrap() {
                let label = proposal.label.clone();
                assert!(gadget.accept_block(proposal).unwrap().is_accepted());
                assert_support_within_max(&gadget, &label);
            }
        }
    }

    #[test]
    fn test_zero_seed_lets_support_outgrow_max() {
        let scenario = Scenario::fork();
        let gadget =
            SupportGadget::with_stubs(GadgetConfig::default(), scenario.allocation.iter().copied())
                .unwrap();
        scenario.feed(&gadget).unwrap();

        let b1 = gadget.support_of(BlockId(1)).unwrap();
        assert_eq!((b1.current, b1.max), (110, 10));
        assert!(!b1.within_max());
    }

    #[test]
    fn test_accounting_mode_only_moves_support() {
        let shape = TreeShape::default();
        for seed in SEEDS {
            let proposals = random_tree(seed, shape);
            let weighted = replay_stubs(GadgetConfig::default(), shape.validators, &proposals);
            let reference = replay_stubs(
                GadgetConfig::default().with_conflict_accounting(ConflictAccounting::Reference),
                shape.validators,
                &proposals,
            );

            let (w, r) = (weighted.report(), reference.report());
            assert_eq!(w.deposits, r.deposits);
            let max = |report: &SupportReport| -> Vec<Amount> {
                report.support.iter().map(|s| s.max).collect()
            };
            assert_eq!(max(&w), max(&r));
        }
    }

    #[test]
    fn test_linear_chain_has_no_conflicts() {
        let proposals = linear_chain(5, 200);
        let weighted = replay_stubs(GadgetConfig::default(), 5, &proposals);
        let reference = replay_stubs(
            GadgetConfig::default().with_conflict_accounting(ConflictAccounting::Reference),
            5,
            &proposals,
        );

        assert_eq!(weighted.report(), reference.report());
        let tip = BlockId(200);
        assert_eq!(weighted.block(tip).unwrap().height, 200);
        for validator in weighted.validators() {
            let last = weighted.last_target_of(validator).unwrap();
            assert!(last.index() >= 195, "{validator} stuck at {last}");
        }
    }

    #[test]
    fn test_replay_is_deterministic() {
        let shape = TreeShape {
            blocks: 128,
            ..TreeShape::default()
        };
        let proposals = random_tree(77, shape);
        let first = replay_stubs(GadgetConfig::default(), shape.validators, &proposals);
        let second = replay_stubs(GadgetConfig::default(), shape.validators, &proposals);

        assert_eq!(first.report(), second.report());
    }
}
