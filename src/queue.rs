//! Ready queue simulation.
//!
//! A plain FIFO of process ids. Every dispatch policy is built from one or
//! more of these; reordering (shortest burst, priority tiers) lives in the
//! policy, never in the queue.

use std::collections::VecDeque;

use crate::types::Pid;

/// A single FIFO ready queue.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    entries: VecDeque<Pid>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        ReadyQueue {
            entries: VecDeque::new(),
        }
    }

    /// Append a process at the back.
    ///
    /// # Panics
    /// Panics if `pid` is already queued: a process may occupy at most one
    /// slot in one ready structure.
    pub fn push_back(&mut self, pid: Pid) {
        assert!(!self.contains(pid), "{pid} is already queued");
        self.entries.push_back(pid);
    }

    pub fn pop_front(&mut self) -> Option<Pid> {
        self.entries.pop_front()
    }

    /// The head of the queue without removing it.
    pub fn front(&self) -> Option<Pid> {
        self.entries.front().copied()
    }

    /// Remove and return the entry at `index`, preserving the order of the
    /// remaining entries.
    pub fn remove_at(&mut self, index: usize) -> Option<Pid> {
        self.entries.remove(index)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in dispatch order (front first).
    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.entries.iter().copied()
    }

    /// All pids in dispatch order without consuming.
    pub fn ordered_pids(&self) -> Vec<Pid> {
        self.entries.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = ReadyQueue::new();
        q.push_back(Pid(2));
        q.push_back(Pid(0));
        q.push_back(Pid(1));
        assert_eq!(q.front(), Some(Pid(2)));
        assert_eq!(q.pop_front(), Some(Pid(2)));
        assert_eq!(q.ordered_pids(), vec![Pid(0), Pid(1)]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut q = ReadyQueue::new();
        for i in 0..4 {
            q.push_back(Pid(i));
        }
        assert_eq!(q.remove_at(1), Some(Pid(1)));
        assert_eq!(q.remove_at(5), None);
        assert_eq!(q.ordered_pids(), vec![Pid(0), Pid(2), Pid(3)]);
    }

    #[test]
    #[should_panic(expected = "already queued")]
    fn test_duplicate_push_panics() {
        let mut q = ReadyQueue::new();
        q.push_back(Pid(1));
        q.push_back(Pid(1));
    }
}
