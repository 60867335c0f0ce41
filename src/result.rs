//! Output-only types: the append-only event log and the aggregated result
//! record returned once a simulation reaches its deadline.

use serde::{Deserialize, Serialize};

/// The two observable things the diagnosis engine ever logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoggedEventKind {
    FalseNegative,
    SelfTermination,
}

/// A single append-only log entry, timestamped to the virtual clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub time: f64,
    pub kind: LoggedEventKind,
    pub message: String,
}

/// Aggregated counters and event log produced by a completed simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    pub test_count: u64,
    pub false_negative_count: u64,
    pub termination_count: u64,
    pub remaining_processes: usize,
    pub events: Vec<LoggedEvent>,
}

impl SimulationResult {
    pub fn new() -> Self {
        SimulationResult::default()
    }

    pub(crate) fn record_test(&mut self) {
        self.test_count += 1;
    }

    pub(crate) fn record_false_negative(&mut self, time: f64, message: String) {
        self.false_negative_count += 1;
        self.events.push(LoggedEvent {
            time,
            kind: LoggedEventKind::FalseNegative,
            message,
        });
    }

    pub(crate) fn record_self_termination(&mut self, time: f64, message: String) {
        self.termination_count += 1;
        self.events.push(LoggedEvent {
            time,
            kind: LoggedEventKind::SelfTermination,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let result = SimulationResult::new();
        assert_eq!(result.test_count, 0);
        assert_eq!(result.false_negative_count, 0);
        assert_eq!(result.termination_count, 0);
        assert!(result.events.is_empty());
    }

    #[test]
    fn recording_appends_to_the_log() {
        let mut result = SimulationResult::new();
        result.record_test();
        result.record_false_negative(1.0, "0 -> 1: false negative".to_string());
        result.record_self_termination(2.0, "0 terminated".to_string());

        assert_eq!(result.test_count, 1);
        assert_eq!(result.false_negative_count, 1);
        assert_eq!(result.termination_count, 1);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].kind, LoggedEventKind::FalseNegative);
        assert_eq!(result.events[1].kind, LoggedEventKind::SelfTermination);
    }
}
