//! Process model for the simulator.
//!
//! Each simulated process owns an alternating CPU/I-O burst schedule and
//! advances its own state machine by one tick per call to
//! [`Process::update`]. The engine is the only caller that changes
//! `state`, `entrance_time` and `exit_time` directly.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::SimError;
use crate::types::{Pid, Priority, Tick, Ticks};

/// The state a simulated process can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcState {
    /// Created, never dispatched.
    New,
    /// Eligible for the CPU, queued in a ready structure.
    Ready,
    /// Holding the CPU.
    Running,
    /// Serving an I/O burst.
    Waiting,
    /// All bursts consumed. Terminal.
    Terminated,
}

/// Which resource the active burst consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    Cpu,
    Io,
}

/// A simulated process at runtime.
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    /// The full schedule as given, kept for reporting.
    schedule: Vec<Ticks>,
    /// Bursts not yet started.
    pending: VecDeque<Ticks>,
    /// Index into `schedule` of the active burst.
    burst_idx: usize,
    remaining: Ticks,
    state: ProcState,
    waiting_time: Ticks,
    turnaround_time: Ticks,
    response_time: Ticks,
    entrance_time: Option<Tick>,
    exit_time: Option<Tick>,
    arrival_time: Tick,
    quantum_used: Ticks,
    priority: Priority,
}

impl Process {
    /// Create a process from its burst schedule (CPU, I/O, CPU, ...).
    ///
    /// Rejects an empty schedule and any zero-length burst.
    pub fn new(pid: Pid, schedule: &[Ticks]) -> Result<Self, SimError> {
        if schedule.is_empty() {
            return Err(SimError::EmptySchedule { pid });
        }
        if let Some(position) = schedule.iter().position(|&b| b == 0) {
            return Err(SimError::ZeroBurst { pid, position });
        }

        let mut pending: VecDeque<Ticks> = schedule.iter().copied().collect();
        let remaining = pending.pop_front().unwrap_or_default();

        Ok(Process {
            pid,
            schedule: schedule.to_vec(),
            pending,
            burst_idx: 0,
            remaining,
            state: ProcState::New,
            waiting_time: 0,
            turnaround_time: 0,
            response_time: 0,
            entrance_time: None,
            exit_time: None,
            arrival_time: 0,
            quantum_used: 0,
            priority: Priority::TOP,
        })
    }

    /// Advance this process by one tick.
    ///
    /// `has_cpu` is true only for the process the engine dispatched for
    /// this tick. Returns the new state when a burst boundary was crossed
    /// (`Waiting`, `Ready` or `Terminated`), `None` otherwise.
    pub fn update(&mut self, has_cpu: bool) -> Option<ProcState> {
        debug_assert!(self.state != ProcState::Terminated, "update on terminated {}", self.pid);

        self.turnaround_time += 1;

        if has_cpu {
            self.state = ProcState::Running;
            self.quantum_used += 1;
        } else if self.state == ProcState::New {
            self.response_time += 1;
        }

        match self.state {
            ProcState::Running | ProcState::Waiting => self.remaining -= 1,
            ProcState::Ready | ProcState::New => self.waiting_time += 1,
            ProcState::Terminated => {}
        }

        if self.remaining > 0 {
            return None;
        }

        let Some(next) = self.pending.pop_front() else {
            self.state = ProcState::Terminated;
            return Some(self.state);
        };

        match self.state {
            ProcState::Running => self.state = ProcState::Waiting,
            ProcState::Waiting => self.state = ProcState::Ready,
            _ => {}
        }
        self.remaining = next;
        self.burst_idx += 1;
        self.quantum_used = 0;
        Some(self.state)
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn state(&self) -> ProcState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ProcState::Terminated
    }

    /// Ticks left in the active burst.
    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    /// Resource consumed by the active burst. Even positions are CPU bursts.
    pub fn burst_kind(&self) -> BurstKind {
        if self.burst_idx % 2 == 0 {
            BurstKind::Cpu
        } else {
            BurstKind::Io
        }
    }

    pub fn schedule(&self) -> &[Ticks] {
        &self.schedule
    }

    /// Sum of every burst in the schedule.
    pub fn total_burst(&self) -> Ticks {
        self.schedule.iter().sum()
    }

    pub fn waiting_time(&self) -> Ticks {
        self.waiting_time
    }

    pub fn turnaround_time(&self) -> Ticks {
        self.turnaround_time
    }

    pub fn response_time(&self) -> Ticks {
        self.response_time
    }

    pub fn entrance_time(&self) -> Option<Tick> {
        self.entrance_time
    }

    pub fn exit_time(&self) -> Option<Tick> {
        self.exit_time
    }

    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    pub fn quantum_used(&self) -> Ticks {
        self.quantum_used
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub(crate) fn set_state(&mut self, state: ProcState) {
        self.state = state;
    }

    pub(crate) fn set_entrance_time(&mut self, tick: Tick) {
        self.entrance_time = Some(tick);
    }

    pub(crate) fn set_exit_time(&mut self, tick: Tick) {
        self.exit_time = Some(tick);
    }

    pub(crate) fn reset_quantum(&mut self) {
        self.quantum_used = 0;
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_schedule() {
        assert_eq!(
            Process::new(Pid(3), &[]).unwrap_err(),
            SimError::EmptySchedule { pid: Pid(3) }
        );
    }

    #[test]
    fn test_rejects_zero_burst() {
        assert_eq!(
            Process::new(Pid(0), &[4, 0, 2]).unwrap_err(),
            SimError::ZeroBurst {
                pid: Pid(0),
                position: 1
            }
        );
    }

    #[test]
    fn test_new_process_accrues_wait_and_response() {
        let mut p = Process::new(Pid(0), &[3]).unwrap();
        assert_eq!(p.update(false), None);
        assert_eq!(p.update(false), None);
        assert_eq!(p.state(), ProcState::New);
        assert_eq!(p.waiting_time(), 2);
        assert_eq!(p.response_time(), 2);
        assert_eq!(p.turnaround_time(), 2);
        assert_eq!(p.remaining(), 3);
    }

    #[test]
    fn test_cpu_burst_then_io_then_cpu() {
        let mut p = Process::new(Pid(0), &[2, 1, 1]).unwrap();
        assert_eq!(p.burst_kind(), BurstKind::Cpu);
        assert_eq!(p.update(true), None);
        assert_eq!(p.quantum_used(), 1);
        assert_eq!(p.update(true), Some(ProcState::Waiting));
        assert_eq!(p.quantum_used(), 0);
        assert_eq!(p.burst_kind(), BurstKind::Io);
        assert_eq!(p.remaining(), 1);

        assert_eq!(p.update(false), Some(ProcState::Ready));
        assert_eq!(p.burst_kind(), BurstKind::Cpu);

        // Ready without the CPU: waits, burst untouched.
        assert_eq!(p.update(false), None);
        assert_eq!(p.waiting_time(), 1);
        assert_eq!(p.remaining(), 1);

        assert_eq!(p.update(true), Some(ProcState::Terminated));
        assert!(p.is_terminated());
        assert_eq!(p.turnaround_time(), 5);
        assert_eq!(p.waiting_time() + p.total_burst(), p.turnaround_time());
    }

    #[test]
    fn test_trailing_io_burst_terminates_from_waiting() {
        let mut p = Process::new(Pid(1), &[1, 2]).unwrap();
        assert_eq!(p.update(true), Some(ProcState::Waiting));
        assert_eq!(p.update(false), None);
        assert_eq!(p.update(false), Some(ProcState::Terminated));
        assert_eq!(p.waiting_time(), 0);
        assert_eq!(p.turnaround_time(), 3);
    }

    #[test]
    fn test_response_stops_at_first_dispatch() {
        let mut p = Process::new(Pid(0), &[2]).unwrap();
        p.update(false);
        p.update(true);
        p.set_state(ProcState::Ready);
        p.update(false);
        assert_eq!(p.response_time(), 1);
        assert_eq!(p.waiting_time(), 2);
    }
}
