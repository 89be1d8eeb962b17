//! First-come first-served: one FIFO, no preemption.

use crate::process::Process;
use crate::queue::ReadyQueue;
use crate::types::Pid;

use super::{Policy, QueueView};

#[derive(Debug, Clone, Default)]
pub struct Fcfs {
    queue: ReadyQueue,
}

impl Fcfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for Fcfs {
    fn name(&self) -> &'static str {
        "fcfs"
    }

    fn enqueue(&mut self, pid: Pid, _processes: &mut [Process]) {
        self.queue.push_back(pid);
    }

    fn pick_next(&mut self, _processes: &[Process]) -> Option<Pid> {
        self.queue.pop_front()
    }

    fn peek_next(&self, _processes: &[Process]) -> Option<Pid> {
        self.queue.front()
    }

    fn contains(&self, pid: Pid) -> bool {
        self.queue.contains(pid)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn queues(&self) -> Vec<QueueView> {
        vec![QueueView {
            name: "ready".into(),
            level: None,
            pids: self.queue.ordered_pids(),
        }]
    }
}
