//! Construction-time errors.
//!
//! Every error here is raised before a simulation starts; a simulation
//! that has been constructed always runs to completion. Broken internal
//! invariants are not represented: they panic.

use std::fmt;

use crate::types::Pid;

/// Errors from building processes, scenarios or policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A scenario was built with no processes.
    NoProcesses,
    /// A process was given an empty burst schedule.
    EmptySchedule { pid: Pid },
    /// A burst of length zero at `position` in the schedule of `pid`.
    ZeroBurst { pid: Pid, position: usize },
    /// The policy name does not match any known policy.
    UnknownPolicy(String),
    /// An MLFQ tier was configured with a zero-tick quantum.
    ZeroQuantum { level: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NoProcesses => write!(f, "scenario has no processes"),
            SimError::EmptySchedule { pid } => {
                write!(f, "process {pid} has an empty burst schedule")
            }
            SimError::ZeroBurst { pid, position } => {
                write!(f, "process {pid} has a zero-length burst at position {position}")
            }
            SimError::UnknownPolicy(name) => {
                write!(f, "unknown policy {name:?} (expected fcfs, sjf or mlfq)")
            }
            SimError::ZeroQuantum { level } => {
                write!(f, "MLFQ tier {level} has a zero quantum")
            }
        }
    }
}

impl std::error::Error for SimError {}
