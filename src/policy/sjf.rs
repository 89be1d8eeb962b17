//! Shortest job first, non-preemptive within a burst.
//!
//! Only processes already in the ready collection are compared. With every
//! process arriving at tick 0 this is classic SJF over the current burst.

use crate::process::Process;
use crate::queue::ReadyQueue;
use crate::types::{Pid, Ticks};

use super::{Policy, QueueView};

#[derive(Debug, Clone, Default)]
pub struct Sjf {
    ready: ReadyQueue,
}

impl Sjf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the ready process with the smallest remaining burst.
    /// Ties go to the earliest position.
    fn shortest(&self, processes: &[Process]) -> Option<usize> {
        let mut best: Option<(usize, Ticks)> = None;
        for (pos, pid) in self.ready.iter().enumerate() {
            let remaining = processes[pid.0].remaining();
            if best.map_or(true, |(_, r)| remaining < r) {
                best = Some((pos, remaining));
            }
        }
        best.map(|(pos, _)| pos)
    }
}

impl Policy for Sjf {
    fn name(&self) -> &'static str {
        "sjf"
    }

    fn enqueue(&mut self, pid: Pid, _processes: &mut [Process]) {
        self.ready.push_back(pid);
    }

    fn pick_next(&mut self, processes: &[Process]) -> Option<Pid> {
        let pos = self.shortest(processes)?;
        self.ready.remove_at(pos)
    }

    fn peek_next(&self, processes: &[Process]) -> Option<Pid> {
        let pos = self.shortest(processes)?;
        self.ready.iter().nth(pos)
    }

    fn contains(&self, pid: Pid) -> bool {
        self.ready.contains(pid)
    }

    fn len(&self) -> usize {
        self.ready.len()
    }

    fn queues(&self) -> Vec<QueueView> {
        vec![QueueView {
            name: "ready".into(),
            level: None,
            pids: self.ready.ordered_pids(),
        }]
    }
}
