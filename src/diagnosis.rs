//! The diagnosis engine: the per-process test round that walks clusters,
//! picks the responsible tester, interprets test outcomes, updates state
//! vectors, and detects self-termination.

use crate::cis::{cis, cluster_levels};
use crate::process::ProcessTable;
use crate::result::SimulationResult;
use crate::rng::DeterministicRng;

/// The outcome of a single test of one process by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Correct,
    Faulty,
    FalseNegative,
}

impl TestOutcome {
    fn is_actually_up(self) -> bool {
        matches!(self, TestOutcome::Correct | TestOutcome::FalseNegative)
    }

    fn label(self) -> &'static str {
        match self {
            TestOutcome::Correct => "CORRECT",
            TestOutcome::Faulty => "FAULTY",
            TestOutcome::FalseNegative => "FALSE_NEGATIVE",
        }
    }
}

/// Updates a logical timestamp given a test outcome.
///
/// `FALSE_NEGATIVE` is treated identically to `FAULTY` here: it still
/// flips the tester's parity even though the testee is actually up. That
/// deception is the entire point of the simulator.
pub fn next_timestamp(current: u64, outcome: TestOutcome) -> u64 {
    let current_is_even = current % 2 == 0;
    let outcome_is_correct = matches!(outcome, TestOutcome::Correct);

    let agrees = (current_is_even && outcome_is_correct) || (!current_is_even && !outcome_is_correct);
    if agrees {
        current
    } else {
        current + 1
    }
}

/// Decides whether `tester` is the unique process responsible for testing
/// `target` at cluster level `s`, given `tester`'s own state vector.
///
/// Walks `cis(target, s)` in order; the first entry `tester` believes
/// correct (even timestamp) is the responsible tester. If that first
/// correct entry is `tester` itself, this returns true.
///
/// `cis(target, s)` is computed over the full `2^s` hypercube addressing
/// space and can contain ids `>= tester_states.len()` whenever the process
/// count is not a power of two (e.g. `cis(2, 1) = [3]` when there is no
/// process 3). Those ids name slots with no process behind them, so they
/// are skipped rather than indexed.
pub fn first_correct_tester(tester: usize, target: usize, s: u32, tester_states: &[u64]) -> bool {
    for pid in cis(target, s) {
        if pid >= tester_states.len() {
            continue;
        }
        if pid == tester {
            return true;
        }
        let believed_faulty = tester_states[pid] % 2 != 0;
        if believed_faulty {
            continue;
        }
        return false;
    }
    false
}

/// Produces the outcome of a single test of `target` by the tester running
/// it, drawing from the shared deterministic RNG only when `target` is
/// actually up.
fn single_test(target_is_up: bool, rng: &mut DeterministicRng, false_negative_probability: f64) -> TestOutcome {
    if !target_is_up {
        return TestOutcome::Faulty;
    }
    if rng.gen_bool(false_negative_probability) {
        TestOutcome::FalseNegative
    } else {
        TestOutcome::Correct
    }
}

/// Runs one full test round for `tester`: walks cluster levels `1..=S` in
/// order, and within each level walks candidate targets `0..N` in order,
/// testing exactly the ones `tester` is responsible for. Mutates the
/// process table and result record in place. Returns early (without
/// rescheduling the caller should honor) if `tester` self-terminates
/// partway through.
pub fn run_test_round(
    table: &mut ProcessTable,
    rng: &mut DeterministicRng,
    result: &mut SimulationResult,
    tester: usize,
    now: f64,
    false_negative_probability: f64,
) {
    if table.has_terminated(tester) {
        return;
    }

    let process_count = table.len();
    let levels = cluster_levels(process_count);

    for s in 1..=levels {
        if table.has_terminated(tester) {
            return;
        }

        for target in 0..process_count {
            if target == tester {
                continue;
            }

            let tester_states = table.states(tester).to_vec();
            if !first_correct_tester(tester, target, s, &tester_states) {
                continue;
            }

            let outcome = single_test(table.is_up(target), rng, false_negative_probability);
            result.record_test();

            let current = table.states(tester)[target];
            table.set_state(tester, target, next_timestamp(current, outcome));

            tracing::debug!(
                tester,
                target,
                level = s,
                outcome = outcome.label(),
                time = now,
                "test"
            );

            if outcome == TestOutcome::FalseNegative {
                result.record_false_negative(
                    now,
                    format!("{tester} -> {target}: false negative at level {s}"),
                );
            }

            if !outcome.is_actually_up() {
                // FAULTY: no gossip, testee genuinely down.
                continue;
            }

            let target_believes_tester_faulty = table.states(target)[tester] % 2 != 0;
            if target_believes_tester_faulty {
                table.terminate(tester);
                result.record_self_termination(
                    now,
                    format!("{tester} terminated: wrongly suspected by {target}"),
                );
                tracing::info!(tester, suspected_by = target, time = now, "self_termination");
                return;
            }

            gossip(table, tester, target);
        }
    }
}

/// Merges `target`'s state vector into `tester`'s by pointwise maximum.
fn gossip(table: &mut ProcessTable, tester: usize, target: usize) {
    let target_states = table.states(target).to_vec();
    for (j, &theirs) in target_states.iter().enumerate() {
        if j == tester {
            continue;
        }
        let ours = table.states(tester)[j];
        if theirs > ours {
            table.set_state(tester, j, theirs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_timestamp_table() {
        assert_eq!(next_timestamp(0, TestOutcome::Correct), 0);
        assert_eq!(next_timestamp(0, TestOutcome::Faulty), 1);
        assert_eq!(next_timestamp(1, TestOutcome::Correct), 2);
        assert_eq!(next_timestamp(1, TestOutcome::Faulty), 1);
        assert_eq!(next_timestamp(2, TestOutcome::FalseNegative), 3);
    }

    #[test]
    fn next_timestamp_parity_always_matches_outcome() {
        for current in 0..20u64 {
            assert_eq!(next_timestamp(current, TestOutcome::Correct) % 2, 0);
            assert_eq!(next_timestamp(current, TestOutcome::Faulty) % 2, 1);
            assert_eq!(next_timestamp(current, TestOutcome::FalseNegative) % 2, 1);
        }
    }

    #[test]
    fn first_correct_tester_picks_the_sole_responsible_process() {
        // cis(0, 1) = [1]; with an all-zero (all-correct) state vector,
        // only process 1 is responsible for testing process 0 at level 1.
        let states = vec![0u64; 4];
        assert!(first_correct_tester(1, 0, 1, &states));
        assert!(!first_correct_tester(0, 0, 1, &states));
    }

    #[test]
    fn first_correct_tester_skips_cis_entries_beyond_process_count() {
        // N=3, tester 0, target 2, level 1: cis(2, 1) = [3], but process 3
        // does not exist. The walk must not index tester_states[3].
        let states = vec![0u64; 3];
        assert!(!first_correct_tester(0, 2, 1, &states));
        assert!(!first_correct_tester(1, 2, 1, &states));
    }

    #[test]
    fn test_round_does_not_panic_for_non_power_of_two_process_counts() {
        for process_count in [3usize, 5, 6, 7, 10, 13] {
            let mut table = ProcessTable::init(process_count);
            let mut result = SimulationResult::new();
            let mut rng = DeterministicRng::new(1);
            for tester in 0..process_count {
                run_test_round(&mut table, &mut rng, &mut result, tester, 0.0, 0.2);
            }
        }
    }

    #[test]
    fn first_correct_tester_skips_believed_faulty_peers() {
        // cis(0, 2) = [2, 3]. If tester 1 believes 2 is faulty (odd), tester
        // 1 falls through to check 3; but only 3 itself returns true for
        // itself, not for 1.
        let mut states = vec![0u64; 4];
        states[2] = 1; // 1 believes process 2 is faulty

        assert!(!first_correct_tester(1, 0, 2, &states));
        assert!(first_correct_tester(3, 0, 2, &states));
    }

    #[test]
    fn exactly_one_tester_is_responsible_for_each_target_level() {
        let process_count = 8usize;
        for target in 0..process_count {
            for s in 1..=cluster_levels(process_count) {
                let states = vec![0u64; process_count];
                let responsible: Vec<usize> = (0..process_count)
                    .filter(|&t| t != target && first_correct_tester(t, target, s, &states))
                    .collect();
                assert_eq!(
                    responsible.len(),
                    1,
                    "target {target} level {s} had responsible testers {responsible:?}"
                );
            }
        }
    }

    #[test]
    fn false_negative_gossips_like_correct_but_flips_tester_parity() {
        let mut table = ProcessTable::init(2);
        let mut result = SimulationResult::new();
        table.set_state(1, 1, 4); // target 1 has some version history for itself

        // Force a false negative by using probability 1.0.
        let mut rng = DeterministicRng::new(1);
        run_test_round(&mut table, &mut rng, &mut result, 0, 0.0, 1.0);

        assert_eq!(result.false_negative_count, result.test_count);
        // tester's belief about target flipped to odd (faulty) despite the
        // testee actually being up.
        assert_eq!(table.states(0)[1] % 2, 1);
    }

    #[test]
    fn faulty_outcome_does_not_gossip() {
        let mut table = ProcessTable::init(2);
        table.terminate(1);
        table.set_state(1, 0, 8); // this must never reach tester 0's vector

        let mut result = SimulationResult::new();
        let mut rng = DeterministicRng::new(1);
        run_test_round(&mut table, &mut rng, &mut result, 0, 0.0, 0.0);

        assert_eq!(table.states(0)[0], 0);
    }

    #[test]
    fn gossip_into_self_is_a_no_op() {
        let mut table = ProcessTable::init(3);
        table.set_state(0, 1, 4);
        table.set_state(0, 2, 2);
        let before = table.states(0).to_vec();

        gossip(&mut table, 0, 0);

        assert_eq!(table.states(0), before.as_slice());
    }

    #[test]
    fn self_termination_aborts_the_round_without_further_tests() {
        let mut table = ProcessTable::init(4);
        // Process 1 believes tester 0 is faulty.
        table.set_state(1, 0, 1);

        let mut result = SimulationResult::new();
        let mut rng = DeterministicRng::new(1);
        run_test_round(&mut table, &mut rng, &mut result, 0, 0.0, 0.0);

        assert!(table.has_terminated(0));
        assert!(!table.is_up(0));
        assert_eq!(result.termination_count, 1);
    }
}
