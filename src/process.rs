//! The process table: owns every simulated process's identity, state
//! vector, and termination flag.
//!
//! The table is a single owner lent out by the `Simulation` — it hands
//! read-only borrows to testers inspecting a peer's state vector and
//! exclusive write access to the one process currently being serviced.
//! Nothing else mutates it; see `diagnosis::run_test_round`.

/// One simulated node.
#[derive(Debug, Clone)]
pub struct Process {
    id: usize,
    /// `state_vector[j]` is this process's current belief about process
    /// `j`: even means correct, odd means faulty, larger means more recent.
    state_vector: Vec<u64>,
    has_terminated: bool,
    facility_up: bool,
}

impl Process {
    fn new(id: usize, process_count: usize) -> Self {
        Process {
            id,
            state_vector: vec![0; process_count],
            has_terminated: false,
            facility_up: true,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state_vector(&self) -> &[u64] {
        &self.state_vector
    }

    pub fn has_terminated(&self) -> bool {
        self.has_terminated
    }

    pub fn is_up(&self) -> bool {
        self.facility_up
    }
}

/// Owns all `N` processes in the simulation.
#[derive(Debug, Clone)]
pub struct ProcessTable {
    processes: Vec<Process>,
}

impl ProcessTable {
    /// Allocates a table of `process_count` processes, every state vector
    /// zeroed: every process presumes every peer correct at time 0.
    pub fn init(process_count: usize) -> Self {
        let processes = (0..process_count)
            .map(|id| Process::new(id, process_count))
            .collect();
        ProcessTable { processes }
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Read-only access to a process's full record, including its state
    /// vector. Used both by a tester inspecting its own vector and by the
    /// gossip/self-termination checks reading a testee's vector.
    pub fn get(&self, id: usize) -> &Process {
        &self.processes[id]
    }

    pub fn states(&self, id: usize) -> &[u64] {
        self.processes[id].state_vector()
    }

    pub fn set_state(&mut self, id: usize, j: usize, value: u64) {
        self.processes[id].state_vector[j] = value;
    }

    pub fn has_terminated(&self, id: usize) -> bool {
        self.processes[id].has_terminated
    }

    pub fn is_up(&self, id: usize) -> bool {
        self.processes[id].facility_up
    }

    /// Marks a process as terminated and releases its facility. Idempotent.
    pub fn terminate(&mut self, id: usize) {
        let process = &mut self.processes[id];
        process.has_terminated = true;
        process.facility_up = false;
    }
}
