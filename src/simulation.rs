//! Ties the process table, diagnosis engine, deterministic RNG, and event
//! scheduler together into the simulator's main loop.

use crate::config::{ConfigError, SimulationConfig};
use crate::diagnosis::run_test_round;
use crate::event::{EventKind, Scheduler, VirtualTime};
use crate::process::ProcessTable;
use crate::result::SimulationResult;
use crate::rng::DeterministicRng;

/// A single, fully-owned simulation run. Construct with `Simulation::new`,
/// drive to completion with `run`.
pub struct Simulation {
    config: SimulationConfig,
    table: ProcessTable,
    scheduler: Scheduler,
    rng: DeterministicRng,
    result: SimulationResult,
}

impl Simulation {
    /// Validates `config` and allocates the process table, scheduling one
    /// `TestRound` per process at `t = 0`. Returns the first violated
    /// configuration constraint instead of allocating any simulation state.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let table = ProcessTable::init(config.process_count);
        let rng = DeterministicRng::new(config.seed);
        let mut scheduler = Scheduler::new();
        for id in 0..config.process_count {
            scheduler.schedule(EventKind::TestRound, 0.0, id);
        }

        Ok(Simulation {
            config,
            table,
            scheduler,
            rng,
            result: SimulationResult::new(),
        })
    }

    pub fn now(&self) -> VirtualTime {
        self.scheduler.now()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only access to a process's current record, e.g. for assertions
    /// in tests or a caller wanting to inspect mid-run state.
    pub fn process_table(&self) -> &ProcessTable {
        &self.table
    }

    /// Drives the scheduler until the virtual clock reaches `max_time` or
    /// the event queue empties, then returns the finalized result.
    pub fn run(mut self) -> SimulationResult {
        while self.scheduler.now().value() < self.config.max_time {
            let Some((kind, process_id)) = self.scheduler.cause() else {
                break;
            };

            match kind {
                EventKind::TestRound => {
                    if self.table.has_terminated(process_id) {
                        continue;
                    }

                    run_test_round(
                        &mut self.table,
                        &mut self.rng,
                        &mut self.result,
                        process_id,
                        self.scheduler.now().value(),
                        self.config.false_negative_probability,
                    );

                    if !self.table.has_terminated(process_id) {
                        self.scheduler.schedule(
                            EventKind::TestRound,
                            self.config.test_period,
                            process_id,
                        );
                    }
                }
            }
        }

        self.result.remaining_processes = (0..self.config.process_count)
            .filter(|&id| !self.table.has_terminated(id))
            .count();

        self.result
    }
}
