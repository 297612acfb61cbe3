//! # Reference Traces
//!
//! Full replays of the scripted scenarios, compared block by block against
//! known deposit and support figures for each configuration.

#[cfg(test)]
mod tests {
    use gadget_node::{Scenario, ScenarioRun};
    use support_gadget::{Amount, BlockId, ConflictAccounting, GadgetConfig, GenesisSeed};

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn run(scenario: Scenario, config: GadgetConfig) -> ScenarioRun {
        let run = scenario.run(config).expect("scenario runs");
        assert!(run.steps.iter().all(|s| s.outcome.is_accepted()));
        run
    }

    fn deposits(run: &ScenarioRun) -> Vec<Amount> {
        run.report.deposits.iter().map(|d| d.balance).collect()
    }

    fn support(run: &ScenarioRun) -> Vec<(String, Amount, Amount)> {
        run.report
            .support
            .iter()
            .map(|s| (s.label.clone(), s.current, s.max))
            .collect()
    }

    fn expected(rows: &[(&str, Amount, Amount)]) -> Vec<(String, Amount, Amount)> {
        rows.iter()
            .map(|&(label, current, max)| (label.to_string(), current, max))
            .collect()
    }

    fn zero_seed_reference() -> GadgetConfig {
        GadgetConfig::reference().with_genesis_seed(GenesisSeed::Zero)
    }

    // =========================================================================
    // SIMPLE CHAIN
    // =========================================================================

    #[test]
    fn test_simple_chain_reference_config() {
        let run = run(Scenario::simple(), GadgetConfig::reference());

        assert_eq!(deposits(&run), vec![22, 26, 41, 37, 53]);
        assert_eq!(
            support(&run),
            expected(&[
                ("genesis", 100, 100),
                ("b1", 110, 110),
                ("b2", 121, 121),
                ("b3", 134, 134),
                ("b4", 146, 146),
                ("b5", 158, 158),
                ("b6", 106, 170),
                ("b7", 53, 182),
            ])
        );
    }

    #[test]
    fn test_simple_chain_is_the_same_in_every_accounting_mode() {
        let weighted = run(Scenario::simple(), GadgetConfig::default());
        let reference = run(Scenario::simple(), zero_seed_reference());

        let rows = expected(&[
            ("genesis", 0, 0),
            ("b1", 110, 10),
            ("b2", 121, 21),
            ("b3", 134, 34),
            ("b4", 146, 46),
            ("b5", 158, 58),
            ("b6", 106, 70),
            ("b7", 53, 82),
        ]);
        assert_eq!(support(&weighted), rows);
        assert_eq!(support(&reference), rows);
        assert_eq!(deposits(&weighted), deposits(&reference));
        assert!(run_has_no_conflicts(&weighted));
    }

    fn run_has_no_conflicts(run: &ScenarioRun) -> bool {
        run.steps
            .iter()
            .filter_map(|s| s.outcome.receipt())
            .all(|r| r.conflicts().next().is_none())
    }

    // =========================================================================
    // FORKED TREE
    // =========================================================================

    #[test]
    fn test_fork_reference_config() {
        let run = run(Scenario::fork(), GadgetConfig::reference());

        assert_eq!(deposits(&run), vec![105, 29, 43, 38, 65]);
        assert_eq!(
            support(&run),
            expected(&[
                ("genesis", 100, 100),
                ("b1", 110, 110),
                ("b2", 121, 121),
                ("b3", 31, 134),
                ("b4", 113, 133),
                ("b5", 125, 145),
                ("b6", 187, 187),
                ("b7", 199, 199),
                ("b8", 211, 211),
                ("b9", 223, 223),
                ("b10", 235, 235),
                ("b11", 175, 247),
                ("b12", 52, 259),
                ("b13", 246, 246),
                ("b14", 258, 258),
                ("b15", 165, 270),
                ("b16", 65, 282),
            ])
        );
    }

    #[test]
    fn test_fork_support_weighted_default() {
        let run = run(Scenario::fork(), GadgetConfig::default());

        assert_eq!(deposits(&run), vec![105, 29, 43, 38, 65]);
        assert_eq!(
            support(&run),
            expected(&[
                ("genesis", 0, 0),
                ("b1", 110, 10),
                ("b2", 121, 21),
                ("b3", 0, 34),
                ("b4", 144, 33),
                ("b5", 156, 45),
                ("b6", 187, 87),
                ("b7", 199, 99),
                ("b8", 211, 111),
                ("b9", 223, 123),
                ("b10", 235, 135),
                ("b11", -11, 147),
                ("b12", 0, 159),
                ("b13", 246, 146),
                ("b14", 258, 158),
                ("b15", 165, 170),
                ("b16", 65, 182),
            ])
        );
    }

    #[test]
    fn test_genesis_seed_only_shifts_max_support() {
        let seeded = run(Scenario::fork(), GadgetConfig::reference());
        let zero = run(Scenario::fork(), zero_seed_reference());

        for (s, z) in seeded.report.support.iter().zip(&zero.report.support) {
            if s.block == BlockId::GENESIS {
                assert_eq!((z.current, z.max), (0, 0));
                continue;
            }
            assert_eq!(s.current, z.current, "current support of {}", s.label);
            assert_eq!(s.max, z.max + 100, "max support of {}", s.label);
        }
        assert_eq!(deposits(&seeded), deposits(&zero));
    }

    #[test]
    fn test_accounting_mode_never_changes_deposits() {
        for seed in [GenesisSeed::Zero, GenesisSeed::TotalDeposits] {
            let weighted = run(
                Scenario::fork(),
                GadgetConfig::default()
                    .with_genesis_seed(seed)
                    .with_conflict_accounting(ConflictAccounting::SupportWeighted),
            );
            let reference = run(
                Scenario::fork(),
                GadgetConfig::default()
                    .with_genesis_seed(seed)
                    .with_conflict_accounting(ConflictAccounting::Reference),
            );
            assert_eq!(weighted.report.deposits, reference.report.deposits);
        }
    }

    #[test]
    fn test_report_serializes() {
        let run = run(Scenario::fork(), GadgetConfig::default());
        let json = serde_json::to_value(&run).unwrap();

        assert_eq!(json["scenario"], "fork");
        assert_eq!(json["config"]["conflict_accounting"], "support-weighted");
        assert_eq!(json["report"]["support"].as_array().unwrap().len(), 17);
        let b6_votes = &json["steps"][5]["outcome"]["Accepted"]["votes"];
        assert_eq!(b6_votes[2]["outcome"]["kind"], "fork_switch");
    }
}
