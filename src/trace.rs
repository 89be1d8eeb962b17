//! Trace event recording for the simulator.
//!
//! Every scheduling action (dispatch, demotion, preemption, I/O start,
//! return to ready, termination, idle tick) is recorded as a
//! [`TraceEvent`] stamped with the tick at which it took effect.

use serde::Serialize;

use crate::types::{Pid, Priority, Tick};

/// A single trace event produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// Tick at which the event took effect.
    pub tick: Tick,
    pub kind: TraceKind,
}

/// The type of scheduling event recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TraceKind {
    /// A process was assigned the CPU.
    Dispatched { pid: Pid },
    /// A process entered a ready structure.
    BecameReady { pid: Pid },
    /// A CPU burst ended and the process started I/O.
    IoStarted { pid: Pid },
    /// A process consumed its final burst.
    Terminated { pid: Pid },
    /// Quantum expired; the process moved down a level.
    Demoted {
        pid: Pid,
        from: Priority,
        to: Priority,
    },
    /// The process lost the CPU to a higher-priority one.
    Preempted { pid: Pid, by: Pid },
    /// No process held the CPU during this tick.
    CpuIdle,
}

/// A complete simulation trace, containing all events in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn record(&mut self, tick: Tick, kind: TraceKind) {
        self.events.push(TraceEvent { tick, kind });
    }

    /// Get all events in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Count the number of times a process was dispatched.
    pub fn dispatch_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p } if p == pid))
            .count()
    }

    pub fn demotion_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Demoted { pid: p, .. } if p == pid))
            .count()
    }

    pub fn preemption_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Preempted { pid: p, .. } if p == pid))
            .count()
    }

    /// Number of ticks during which the CPU was idle.
    pub fn idle_ticks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::CpuIdle))
            .count()
    }

    /// Ticks at which `pid` was dispatched, in order.
    pub fn dispatch_ticks(&self, pid: Pid) -> Vec<Tick> {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p } if p == pid))
            .map(|e| e.tick)
            .collect()
    }

    /// Pretty-print the trace for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match &event.kind {
                TraceKind::Dispatched { pid } => format!("DISPATCH  pid={}", pid.0),
                TraceKind::BecameReady { pid } => format!("READY     pid={}", pid.0),
                TraceKind::IoStarted { pid } => format!("IO        pid={}", pid.0),
                TraceKind::Terminated { pid } => format!("EXIT      pid={}", pid.0),
                TraceKind::Demoted { pid, from, to } => {
                    format!("DEMOTE    pid={} level={}->{}", pid.0, from, to)
                }
                TraceKind::Preempted { pid, by } => {
                    format!("PREEMPT   pid={} by={}", pid.0, by.0)
                }
                TraceKind::CpuIdle => "IDLE".to_string(),
            };
            eprintln!("[{:>8}] {}", event.tick, desc);
        }
    }
}
