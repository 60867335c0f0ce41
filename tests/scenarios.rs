//! End-to-end scenarios for the diagnosis algorithm: the
//! zero-false-negative convergence case, the all-false-negative
//! termination case, and the two-node self-termination trigger.

use vcube_sim::{Simulation, SimulationConfig};

#[test]
fn four_nodes_no_false_negatives_converge_with_no_terminations() {
    let config = SimulationConfig::new(4, 0.0)
        .with_max_time(50.0)
        .with_test_period(10.0);

    let result = Simulation::new(config).unwrap().run();

    assert!(result.test_count > 0);
    assert_eq!(result.false_negative_count, 0);
    assert_eq!(result.termination_count, 0);
    assert_eq!(result.remaining_processes, 4);
}

#[test]
fn four_nodes_certain_false_negatives_terminate_at_least_one_process() {
    let config = SimulationConfig::new(4, 1.0)
        .with_max_time(50.0)
        .with_test_period(10.0);

    let result = Simulation::new(config).unwrap().run();

    assert_eq!(result.false_negative_count, result.test_count);
    assert!(result.termination_count >= 1);
    assert!(result.remaining_processes < 4);
}

#[test]
fn two_nodes_mutual_false_negatives_trigger_self_termination_by_t_10() {
    let config = SimulationConfig::new(2, 1.0)
        .with_max_time(25.0)
        .with_test_period(10.0);

    let result = Simulation::new(config).unwrap().run();

    assert!(result.termination_count >= 1);
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e.kind, vcube_sim::LoggedEventKind::SelfTermination)));
}

#[test]
fn never_terminates_more_processes_than_exist() {
    for process_count in [2usize, 3, 4, 7, 8, 13, 16] {
        let config = SimulationConfig::new(process_count, 0.5)
            .with_max_time(80.0)
            .with_test_period(10.0)
            .with_seed(process_count as u64);

        let result = Simulation::new(config).unwrap().run();

        assert!(result.termination_count as usize <= process_count);
        assert_eq!(
            result.remaining_processes,
            process_count - result.termination_count as usize
        );
    }
}
