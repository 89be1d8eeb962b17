//! sched_sim - Deterministic tick-driven simulator for CPU scheduling policies.
//!
//! A fixed set of processes, each an alternating sequence of CPU and I/O
//! bursts, competes for a single CPU. The simulator advances a synthetic
//! tick clock and reports per-process waiting, turnaround and response
//! times plus CPU utilization.
//!
//! # Architecture
//!
//! - **Process**: burst schedule and per-tick state machine
//! - **Engine**: the tick loop that owns the CPU slot and the process set
//! - **Policies**: FCFS, SJF and a three-level MLFQ behind the [`Policy`] trait
//! - **Stats**: pure post-run aggregation
//! - **Monitor / Trace**: read-only per-tick snapshots and an event log
//!
//! # Usage
//!
//! ```rust
//! use sched_sim::*;
//!
//! let scenario = Scenario::builder()
//!     .process(&[5, 10, 3])
//!     .cpu_only(4)
//!     .build()
//!     .unwrap();
//!
//! let result = Simulator::new(Mlfq::new()).run(&scenario);
//! let metrics = result.metrics();
//! assert!(metrics.cpu_utilization <= 1.0);
//! ```

pub mod engine;
pub mod error;
pub mod fmt;
pub mod monitor;
pub mod policy;
pub mod process;
pub mod queue;
pub mod scenario;
pub mod stats;
pub mod trace;
pub mod types;
pub mod workload;

// Re-export the main public types for convenience.
pub use engine::{sim_clock, simulate, Simulation, SimulationResult, Simulator};
pub use error::SimError;
pub use fmt::{init_tracing, FmtTick, SimFormat};
pub use monitor::{Monitor, QueueSnapshot, QueuedEntry, SnapshotLog, TickSnapshot};
pub use policy::{
    DynPolicy, Fcfs, Mlfq, Policy, PolicyKind, QueueView, RunVerdict, Sjf, TierConfig,
    DEFAULT_TIERS,
};
pub use process::{BurstKind, ProcState, Process};
pub use scenario::{ProcessDef, Scenario, ScenarioBuilder};
pub use stats::{Metrics, ProcessStats};
pub use trace::{Trace, TraceEvent, TraceKind};
pub use types::{Pid, Priority, Tick, Ticks};
pub use workload::{load_workload, sample_workload, WorkloadError, SAMPLE_BURSTS};
