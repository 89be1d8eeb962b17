//! Monitor trait for per-tick state sampling.
//!
//! After every tick the engine can hand a [`TickSnapshot`] to a monitor.
//! Snapshots are built from read-only queries; sampling never changes the
//! outcome of a simulation.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::types::{Pid, Priority, Tick, Ticks};

/// A queued process and what is left of its current burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueuedEntry {
    pub pid: Pid,
    pub remaining: Ticks,
}

/// Contents of one ready structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub name: String,
    pub level: Option<Priority>,
    pub entries: Vec<QueuedEntry>,
}

/// Scheduler state at the end of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSnapshot {
    /// Clock value after the tick completed.
    pub tick: Tick,
    /// Process that will hold the CPU for the next tick.
    pub running: Option<Pid>,
    /// Ready structures, highest dispatch precedence first.
    pub queues: Vec<QueueSnapshot>,
    /// Processes in I/O, with remaining I/O ticks.
    pub waiting: Vec<QueuedEntry>,
    pub terminated: Vec<Pid>,
}

impl TickSnapshot {
    /// Pids found in more than one ready slot, sorted.
    ///
    /// Always empty for a correct policy.
    pub fn duplicate_pids(&self) -> Vec<Pid> {
        let mut seen: HashMap<Pid, usize> = HashMap::new();
        for entry in self.queues.iter().flat_map(|q| q.entries.iter()) {
            *seen.entry(entry.pid).or_default() += 1;
        }
        let mut dups: Vec<Pid> = seen
            .into_iter()
            .filter_map(|(pid, n)| (n > 1).then_some(pid))
            .collect();
        dups.sort();
        dups
    }

    /// Every queued pid across all ready structures, in display order.
    pub fn queued_pids(&self) -> Vec<Pid> {
        self.queues
            .iter()
            .flat_map(|q| q.entries.iter().map(|e| e.pid))
            .collect()
    }
}

impl fmt::Display for TickSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:<6} cpu=", self.tick)?;
        match self.running {
            Some(pid) => write!(f, "{:<4}", pid.to_string())?,
            None => write!(f, "idle")?,
        }
        for q in &self.queues {
            write!(f, " | {}: [", q.name)?;
            for (i, e) in q.entries.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}:{}", e.pid, e.remaining)?;
            }
            write!(f, "]")?;
        }
        write!(f, " | io: [")?;
        for (i, e) in self.waiting.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", e.pid, e.remaining)?;
        }
        write!(f, "] | done: [")?;
        for (i, pid) in self.terminated.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{pid}")?;
        }
        write!(f, "]")
    }
}

/// Trait for per-tick state sampling.
///
/// Implement this to accumulate a time series or assert invariants while a
/// simulation runs.
pub trait Monitor {
    /// Called once after every tick.
    fn sample(&mut self, snapshot: &TickSnapshot);
}

/// Collects every snapshot.
#[derive(Debug, Default)]
pub struct SnapshotLog {
    pub snapshots: Vec<TickSnapshot>,
}

impl Monitor for SnapshotLog {
    fn sample(&mut self, snapshot: &TickSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}
