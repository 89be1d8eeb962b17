//! Tick-driven simulation engine.
//!
//! This is the core of the simulator. It owns the process collection, the
//! single CPU slot and the synthetic clock, and asks a [`Policy`] which
//! ready process runs next.
//!
//! Each tick either runs the dispatched process (every live process
//! advances, only the dispatched one with the CPU) or, when nothing is
//! dispatched, idles (every live process advances without the CPU, which
//! in practice means only I/O makes progress). Processes that became ready
//! during the tick are queued, then the CPU is handed over if its holder
//! blocked, terminated, or lost it to the policy's quantum/priority rules.

use std::cell::Cell;

use serde::Serialize;
use tracing::{debug, info};

use crate::monitor::{Monitor, QueueSnapshot, QueuedEntry, TickSnapshot};
use crate::policy::{Policy, PolicyKind, RunVerdict};
use crate::process::{ProcState, Process};
use crate::scenario::Scenario;
use crate::stats::{Metrics, ProcessStats};
use crate::trace::{Trace, TraceKind};
use crate::types::{Pid, Tick, Ticks};

thread_local! {
    static SIM_CLOCK: Cell<Tick> = const { Cell::new(0) };
}

/// Current simulated tick on this thread, for log formatting.
pub fn sim_clock() -> Tick {
    SIM_CLOCK.with(|c| c.get())
}

/// Update the tick thread-local. Called by the engine before logging so
/// the event formatter can stamp simulated time.
pub fn set_sim_clock(tick: Tick) {
    SIM_CLOCK.with(|c| c.set(tick));
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub policy: &'static str,
    pub processes: Vec<ProcessStats>,
    pub used_ticks: Ticks,
    pub total_ticks: Ticks,
    #[serde(skip)]
    pub trace: Trace,
}

impl SimulationResult {
    pub fn metrics(&self) -> Metrics {
        Metrics::from_processes(&self.processes, self.used_ticks, self.total_ticks)
    }

    pub fn process(&self, pid: Pid) -> &ProcessStats {
        &self.processes[pid.0]
    }
}

/// A simulation in progress, advanced one tick at a time.
pub struct Simulation<P: Policy> {
    policy: P,
    processes: Vec<Process>,
    /// Process holding the CPU for the next tick.
    current: Option<Pid>,
    clock: Tick,
    used_ticks: Ticks,
    trace: Trace,
}

impl<P: Policy> Simulation<P> {
    /// Seed the ready structure with every process (all arrive at tick 0)
    /// and dispatch the first one.
    pub fn new(mut policy: P, scenario: &Scenario) -> Self {
        let mut processes = scenario.instantiate();
        for pid in 0..processes.len() {
            policy.enqueue(Pid(pid), &mut processes);
        }

        set_sim_clock(0);
        info!(
            policy = policy.name(),
            processes = processes.len(),
            "simulation start"
        );

        let mut sim = Simulation {
            policy,
            processes,
            current: None,
            clock: 0,
            used_ticks: 0,
            trace: Trace::new(),
        };
        sim.current = sim.dispatch();
        sim
    }

    /// Whether every process has terminated.
    pub fn is_done(&self) -> bool {
        self.processes.iter().all(Process::is_terminated)
    }

    /// Advance the simulation by one tick. No-op once done.
    pub fn step(&mut self) {
        if self.is_done() {
            return;
        }
        set_sim_clock(self.clock);
        match self.current {
            None => self.idle_tick(),
            Some(pid) => self.busy_tick(pid),
        }
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    pub fn used_ticks(&self) -> Ticks {
        self.used_ticks
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Run to completion and collect the results.
    pub fn finish(mut self) -> SimulationResult {
        while !self.is_done() {
            self.step();
        }
        self.into_result()
    }

    /// Side-effect-free view of the scheduler after the last tick.
    pub fn snapshot(&self) -> TickSnapshot {
        let entry = |pid: Pid| QueuedEntry {
            pid,
            remaining: self.processes[pid.0].remaining(),
        };
        let queues = self
            .policy
            .queues()
            .into_iter()
            .map(|view| QueueSnapshot {
                name: view.name,
                level: view.level,
                entries: view.pids.into_iter().map(entry).collect(),
            })
            .collect();
        let waiting = self
            .processes
            .iter()
            .filter(|p| p.state() == ProcState::Waiting)
            .map(|p| entry(p.pid()))
            .collect();
        let terminated = self
            .processes
            .iter()
            .filter(|p| p.is_terminated())
            .map(Process::pid)
            .collect();

        TickSnapshot {
            tick: self.clock,
            running: self.current,
            queues,
            waiting,
            terminated,
        }
    }

    fn into_result(self) -> SimulationResult {
        info!(
            policy = self.policy.name(),
            total_ticks = self.clock,
            used_ticks = self.used_ticks,
            "simulation complete"
        );
        SimulationResult {
            policy: self.policy.name(),
            processes: self.processes.iter().map(ProcessStats::from).collect(),
            used_ticks: self.used_ticks,
            total_ticks: self.clock,
            trace: self.trace,
        }
    }

    /// No process holds the CPU: advance everyone without it.
    fn idle_tick(&mut self) {
        info!("IDLE");
        self.trace.record(self.clock, TraceKind::CpuIdle);

        let transitions = self.advance_all(None);
        self.clock += 1;
        set_sim_clock(self.clock);
        self.settle(&transitions);
        self.enqueue_ready();

        self.current = self.dispatch();
    }

    /// `pid` holds the CPU for this tick.
    fn busy_tick(&mut self, pid: Pid) {
        if self.processes[pid.0].entrance_time().is_none() {
            self.processes[pid.0].set_entrance_time(self.clock);
        }

        let transitions = self.advance_all(Some(pid));
        self.clock += 1;
        set_sim_clock(self.clock);
        self.used_ticks += 1;
        self.settle(&transitions);
        self.enqueue_ready();

        match self.processes[pid.0].state() {
            ProcState::Waiting | ProcState::Terminated => {
                self.current = self.dispatch();
            }
            ProcState::Running => self.check_running(pid),
            state => panic!("{pid} held the CPU and ended the tick {state:?}"),
        }
    }

    /// Update every live process by one tick. Returns the processes that
    /// crossed a burst boundary and their new state.
    fn advance_all(&mut self, cpu: Option<Pid>) -> Vec<(Pid, ProcState)> {
        self.processes
            .iter_mut()
            .filter(|p| !p.is_terminated())
            .filter_map(|p| {
                let has_cpu = Some(p.pid()) == cpu;
                p.update(has_cpu).map(|state| (p.pid(), state))
            })
            .collect()
    }

    /// Record the effects of burst-boundary transitions.
    fn settle(&mut self, transitions: &[(Pid, ProcState)]) {
        for &(pid, state) in transitions {
            match state {
                ProcState::Terminated => {
                    self.processes[pid.0].set_exit_time(self.clock);
                    self.trace.record(self.clock, TraceKind::Terminated { pid });
                    info!(pid = pid.0, "TERMINATED");
                }
                ProcState::Waiting => {
                    self.trace.record(self.clock, TraceKind::IoStarted { pid });
                    debug!(
                        pid = pid.0,
                        io = self.processes[pid.0].remaining(),
                        "io start"
                    );
                }
                // Ready transitions are traced when the process is queued.
                _ => {}
            }
        }
    }

    /// Queue every Ready process not already in a ready structure, in pid
    /// order.
    fn enqueue_ready(&mut self) {
        for idx in 0..self.processes.len() {
            let pid = Pid(idx);
            if self.processes[idx].state() == ProcState::Ready && !self.policy.contains(pid) {
                self.policy.enqueue(pid, &mut self.processes);
                self.trace.record(self.clock, TraceKind::BecameReady { pid });
                debug!(pid = pid.0, "ready");
            }
        }
    }

    /// Apply the policy's per-tick rules to a process that is still running.
    fn check_running(&mut self, pid: Pid) {
        match self.policy.check_running(pid, &mut self.processes) {
            RunVerdict::Keep => {}
            RunVerdict::Demote { from, to } => {
                self.trace
                    .record(self.clock, TraceKind::Demoted { pid, from, to });
                info!(pid = pid.0, from = from.0, to = to.0, "DEMOTED");
                self.current = self.dispatch();
            }
            RunVerdict::Preempt { by } => {
                self.trace
                    .record(self.clock, TraceKind::Preempted { pid, by });
                info!(pid = pid.0, by = by.0, "PREEMPTED");
                self.current = self.dispatch();
            }
        }
    }

    /// Pick the next process to run, or `None` if nothing is ready.
    ///
    /// # Panics
    /// Panics if the policy reports queued processes but picks none.
    fn dispatch(&mut self) -> Option<Pid> {
        if self.policy.is_empty() {
            return None;
        }
        let Some(pid) = self.policy.pick_next(&self.processes) else {
            panic!(
                "{} reported {} queued processes but picked none",
                self.policy.name(),
                self.policy.len()
            );
        };
        self.trace.record(self.clock, TraceKind::Dispatched { pid });
        info!(
            pid = pid.0,
            remaining = self.processes[pid.0].remaining(),
            priority = self.processes[pid.0].priority().0,
            "DISPATCH"
        );
        Some(pid)
    }
}

/// Convenience runner: build, run to completion, collect.
pub struct Simulator<P: Policy> {
    policy: P,
}

impl<P: Policy> Simulator<P> {
    pub fn new(policy: P) -> Self {
        Simulator { policy }
    }

    /// Run a scenario to completion.
    pub fn run(self, scenario: &Scenario) -> SimulationResult {
        Simulation::new(self.policy, scenario).finish()
    }

    /// Run a scenario, handing a snapshot to `monitor` after every tick.
    pub fn run_with_monitor(self, scenario: &Scenario, monitor: &mut dyn Monitor) -> SimulationResult {
        let mut sim = Simulation::new(self.policy, scenario);
        while !sim.is_done() {
            sim.step();
            monitor.sample(&sim.snapshot());
        }
        sim.into_result()
    }
}

/// Run `scenario` under the built-in policy `kind`.
pub fn simulate(kind: PolicyKind, scenario: &Scenario) -> SimulationResult {
    Simulator::new(kind.build()).run(scenario)
}
