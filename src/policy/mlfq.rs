//! Three-level multi-level feedback queue.
//!
//! Level 2 and level 1 are round-robin with quanta of 2 and 3 ticks; level
//! 0 has no quantum and runs FCFS. New and I/O-returning processes always
//! enter level 2 with a fresh quantum. A process that exhausts its quantum
//! drops one level. A running process is preempted (without demotion)
//! whenever the head of the highest non-empty level has strictly higher
//! priority.

use crate::error::SimError;
use crate::process::{ProcState, Process};
use crate::queue::ReadyQueue;
use crate::types::{Pid, Priority, Ticks};

use super::{Policy, QueueView, RunVerdict};

/// Fixed configuration of one MLFQ level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierConfig {
    /// Consecutive CPU ticks allowed before demotion. `None` never demotes.
    pub quantum: Option<Ticks>,
}

/// Default tiers, indexed by priority level.
pub const DEFAULT_TIERS: [TierConfig; Priority::LEVELS] = [
    TierConfig { quantum: None },
    TierConfig { quantum: Some(3) },
    TierConfig { quantum: Some(2) },
];

#[derive(Debug, Clone)]
pub struct Mlfq {
    tiers: [TierConfig; Priority::LEVELS],
    /// One FIFO per priority level, indexed by level.
    queues: [ReadyQueue; Priority::LEVELS],
}

impl Mlfq {
    pub fn new() -> Self {
        Mlfq {
            tiers: DEFAULT_TIERS,
            queues: Default::default(),
        }
    }

    /// Build with custom quanta, indexed by priority level.
    pub fn with_tiers(tiers: [TierConfig; Priority::LEVELS]) -> Result<Self, SimError> {
        if let Some(level) = tiers.iter().position(|t| t.quantum == Some(0)) {
            return Err(SimError::ZeroQuantum { level });
        }
        Ok(Mlfq {
            tiers,
            queues: Default::default(),
        })
    }

    pub fn quantum(&self, level: Priority) -> Option<Ticks> {
        self.tiers[level.index()].quantum
    }

    /// Levels from highest to lowest.
    fn levels() -> impl Iterator<Item = Priority> {
        (0..Priority::LEVELS as u8).rev().map(Priority)
    }

    fn highest_nonempty(&self) -> Option<Priority> {
        Self::levels().find(|l| !self.queues[l.index()].is_empty())
    }

    /// Put a process that lost the CPU back at the tail of `level`.
    fn requeue(&mut self, pid: Pid, level: Priority, processes: &mut [Process]) {
        let p = &mut processes[pid.0];
        p.set_state(ProcState::Ready);
        p.set_priority(level);
        p.reset_quantum();
        self.queues[level.index()].push_back(pid);
    }
}

impl Default for Mlfq {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for Mlfq {
    fn name(&self) -> &'static str {
        "mlfq"
    }

    fn enqueue(&mut self, pid: Pid, processes: &mut [Process]) {
        assert!(!self.contains(pid), "{pid} is already queued in mlfq");
        let p = &mut processes[pid.0];
        p.set_priority(Priority::TOP);
        p.reset_quantum();
        self.queues[Priority::TOP.index()].push_back(pid);
    }

    fn pick_next(&mut self, _processes: &[Process]) -> Option<Pid> {
        let level = self.highest_nonempty()?;
        self.queues[level.index()].pop_front()
    }

    fn peek_next(&self, _processes: &[Process]) -> Option<Pid> {
        let level = self.highest_nonempty()?;
        self.queues[level.index()].front()
    }

    fn contains(&self, pid: Pid) -> bool {
        self.queues.iter().any(|q| q.contains(pid))
    }

    fn len(&self) -> usize {
        self.queues.iter().map(ReadyQueue::len).sum()
    }

    fn check_running(&mut self, current: Pid, processes: &mut [Process]) -> RunVerdict {
        let level = processes[current.0].priority();
        let used = processes[current.0].quantum_used();

        if let Some(quantum) = self.quantum(level) {
            if used >= quantum {
                // Levels with a quantum are never the bottom one by default;
                // a custom config that gives the bottom a quantum just
                // round-robins there.
                let to = level.lower().unwrap_or(level);
                self.requeue(current, to, processes);
                return RunVerdict::Demote { from: level, to };
            }
        }

        let Some(candidate) = self.peek_next(processes) else {
            return RunVerdict::Keep;
        };
        if processes[candidate.0].priority() > level {
            self.requeue(current, level, processes);
            return RunVerdict::Preempt { by: candidate };
        }

        RunVerdict::Keep
    }

    fn queues(&self) -> Vec<QueueView> {
        Self::levels()
            .map(|level| QueueView {
                name: format!("level {level}"),
                level: Some(level),
                pids: self.queues[level.index()].ordered_pids(),
            })
            .collect()
    }
}
