//! Scenario definition and builder API.

use crate::error::SimError;
use crate::process::Process;
use crate::types::{Pid, Ticks};

/// Definition of a process for scenario creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDef {
    pub pid: Pid,
    /// Alternating CPU and I/O bursts, starting with CPU.
    pub bursts: Vec<Ticks>,
}

/// A validated, non-empty set of processes, all arriving at tick 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    processes: Vec<ProcessDef>,
}

/// Builder for constructing scenarios. Pids are assigned in insertion order.
#[derive(Debug, Default)]
pub struct ScenarioBuilder {
    processes: Vec<ProcessDef>,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::default()
    }

    /// Build a scenario from one burst schedule per process.
    pub fn from_bursts<I, S>(schedules: I) -> Result<Scenario, SimError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[Ticks]>,
    {
        schedules
            .into_iter()
            .fold(Scenario::builder(), |b, s| b.process(s.as_ref()))
            .build()
    }

    pub fn processes(&self) -> &[ProcessDef] {
        &self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Instantiate fresh runtime processes.
    pub(crate) fn instantiate(&self) -> Vec<Process> {
        self.processes
            .iter()
            .map(|def| match Process::new(def.pid, &def.bursts) {
                Ok(p) => p,
                Err(e) => panic!("scenario was validated but {e}"),
            })
            .collect()
    }
}

impl ScenarioBuilder {
    /// Add a process with the given burst schedule.
    pub fn process(mut self, bursts: &[Ticks]) -> Self {
        let pid = Pid(self.processes.len());
        self.processes.push(ProcessDef {
            pid,
            bursts: bursts.to_vec(),
        });
        self
    }

    /// Convenience: add a process with a single CPU burst and no I/O.
    pub fn cpu_only(self, ticks: Ticks) -> Self {
        self.process(&[ticks])
    }

    /// Validate and build the scenario.
    pub fn build(self) -> Result<Scenario, SimError> {
        if self.processes.is_empty() {
            return Err(SimError::NoProcesses);
        }
        for def in &self.processes {
            Process::new(def.pid, &def.bursts)?;
        }
        Ok(Scenario {
            processes: self.processes,
        })
    }
}
