//! Dispatch policies.
//!
//! A policy owns the ready structure(s) and answers one question for the
//! engine: which ready process runs next. MLFQ additionally gets a per-tick
//! hook on the running process to enforce quanta and priority preemption.

mod fcfs;
mod mlfq;
mod sjf;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SimError;
use crate::process::Process;
use crate::types::{Pid, Priority};

pub use fcfs::Fcfs;
pub use mlfq::{Mlfq, TierConfig, DEFAULT_TIERS};
pub use sjf::Sjf;

/// Outcome of [`Policy::check_running`] for a process that is still
/// Running after its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunVerdict {
    /// Keep running.
    Keep,
    /// Quantum expired; the process was re-queued one level lower.
    Demote { from: Priority, to: Priority },
    /// A higher-priority process is waiting; the running process was
    /// re-queued at the back of its own level.
    Preempt { by: Pid },
}

/// Read-only view of one ready structure, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueView {
    pub name: String,
    /// MLFQ level, `None` for single-queue policies.
    pub level: Option<Priority>,
    pub pids: Vec<Pid>,
}

/// A CPU dispatch policy.
pub trait Policy {
    fn name(&self) -> &'static str;

    /// Add a process that just became ready (or is new).
    ///
    /// # Panics
    /// Panics if `pid` is already queued anywhere in this policy.
    fn enqueue(&mut self, pid: Pid, processes: &mut [Process]);

    /// Remove and return the next process to run.
    fn pick_next(&mut self, processes: &[Process]) -> Option<Pid>;

    /// The process `pick_next` would return, without removing it.
    fn peek_next(&self, processes: &[Process]) -> Option<Pid>;

    /// Whether `pid` sits in any ready structure.
    fn contains(&self, pid: Pid) -> bool;

    /// Total number of queued processes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Called after each tick in which `current` held the CPU and is still
    /// Running. Non-preemptive policies keep the default.
    fn check_running(&mut self, _current: Pid, _processes: &mut [Process]) -> RunVerdict {
        RunVerdict::Keep
    }

    /// Views of every ready structure, highest dispatch precedence first.
    fn queues(&self) -> Vec<QueueView>;
}

/// Selects one of the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Mlfq,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Fcfs, PolicyKind::Sjf, PolicyKind::Mlfq];

    /// Build a fresh policy with empty ready structures.
    pub fn build(self) -> DynPolicy {
        match self {
            PolicyKind::Fcfs => DynPolicy::Fcfs(Fcfs::new()),
            PolicyKind::Sjf => DynPolicy::Sjf(Sjf::new()),
            PolicyKind::Mlfq => DynPolicy::Mlfq(Mlfq::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Fcfs => "fcfs",
            PolicyKind::Sjf => "sjf",
            PolicyKind::Mlfq => "mlfq",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" => Ok(PolicyKind::Fcfs),
            "sjf" => Ok(PolicyKind::Sjf),
            "mlfq" => Ok(PolicyKind::Mlfq),
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built-in policy chosen at runtime.
#[derive(Debug, Clone)]
pub enum DynPolicy {
    Fcfs(Fcfs),
    Sjf(Sjf),
    Mlfq(Mlfq),
}

impl DynPolicy {
    pub fn kind(&self) -> PolicyKind {
        match self {
            DynPolicy::Fcfs(_) => PolicyKind::Fcfs,
            DynPolicy::Sjf(_) => PolicyKind::Sjf,
            DynPolicy::Mlfq(_) => PolicyKind::Mlfq,
        }
    }

    fn inner(&self) -> &dyn Policy {
        match self {
            DynPolicy::Fcfs(p) => p,
            DynPolicy::Sjf(p) => p,
            DynPolicy::Mlfq(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Policy {
        match self {
            DynPolicy::Fcfs(p) => p,
            DynPolicy::Sjf(p) => p,
            DynPolicy::Mlfq(p) => p,
        }
    }
}

impl Policy for DynPolicy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn enqueue(&mut self, pid: Pid, processes: &mut [Process]) {
        self.inner_mut().enqueue(pid, processes)
    }

    fn pick_next(&mut self, processes: &[Process]) -> Option<Pid> {
        self.inner_mut().pick_next(processes)
    }

    fn peek_next(&self, processes: &[Process]) -> Option<Pid> {
        self.inner().peek_next(processes)
    }

    fn contains(&self, pid: Pid) -> bool {
        self.inner().contains(pid)
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn check_running(&mut self, current: Pid, processes: &mut [Process]) -> RunVerdict {
        self.inner_mut().check_running(current, processes)
    }

    fn queues(&self) -> Vec<QueueView> {
        self.inner().queues()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_kind_parse() {
        assert_eq!("FCFS".parse::<PolicyKind>(), Ok(PolicyKind::Fcfs));
        assert_eq!(" sjf ".parse::<PolicyKind>(), Ok(PolicyKind::Sjf));
        assert_eq!("mlfq".parse::<PolicyKind>(), Ok(PolicyKind::Mlfq));
        assert_eq!(
            "rr".parse::<PolicyKind>(),
            Err(SimError::UnknownPolicy("rr".into()))
        );
    }

    #[test]
    fn test_build_matches_kind() {
        for kind in PolicyKind::ALL {
            let policy = kind.build();
            assert_eq!(policy.kind(), kind);
            assert_eq!(policy.name(), kind.as_str());
            assert!(policy.is_empty());
        }
    }
}
