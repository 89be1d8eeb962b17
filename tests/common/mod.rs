#![allow(dead_code)]

use std::collections::HashSet;

use sched_sim::{init_tracing, Monitor, Pid, SimulationResult, TickSnapshot};

/// Initialize tracing from `RUST_LOG`.
///
/// `init_tracing()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    init_tracing();
}

/// Monitor that asserts scheduler bookkeeping after every tick:
/// no pid queued twice, and the running, queued, in-I/O and finished sets
/// are pairwise disjoint.
#[derive(Default)]
pub struct InvariantMonitor {
    pub ticks: usize,
    last_tick: Option<u64>,
}

impl Monitor for InvariantMonitor {
    fn sample(&mut self, snap: &TickSnapshot) {
        self.ticks += 1;

        if let Some(last) = self.last_tick {
            assert_eq!(snap.tick, last + 1, "clock skipped a tick: {snap}");
        }
        self.last_tick = Some(snap.tick);

        let dups = snap.duplicate_pids();
        assert!(dups.is_empty(), "duplicate queue entries {dups:?}: {snap}");

        let queued: HashSet<Pid> = snap.queued_pids().into_iter().collect();
        let waiting: HashSet<Pid> = snap.waiting.iter().map(|e| e.pid).collect();
        let done: HashSet<Pid> = snap.terminated.iter().copied().collect();

        if let Some(pid) = snap.running {
            assert!(!queued.contains(&pid), "running {pid} is also queued: {snap}");
            assert!(!waiting.contains(&pid), "running {pid} is also in I/O: {snap}");
            assert!(!done.contains(&pid), "running {pid} already terminated: {snap}");
        }
        assert!(queued.is_disjoint(&waiting), "queued and in I/O: {snap}");
        assert!(queued.is_disjoint(&done), "queued and terminated: {snap}");
        assert!(waiting.is_disjoint(&done), "in I/O and terminated: {snap}");

        if snap.running.is_none() {
            assert!(queued.is_empty(), "CPU idle with ready processes: {snap}");
        }
    }
}

/// Assert the per-process timing identities every finished run satisfies.
pub fn assert_timing_identities(result: &SimulationResult) {
    for p in &result.processes {
        assert_eq!(
            p.waiting_time + p.total_burst,
            p.turnaround_time,
            "{}: waiting + bursts != turnaround ({p:?})",
            p.pid
        );
        assert_eq!(
            Some(p.response_time),
            p.entrance_time,
            "{}: response time differs from first dispatch ({p:?})",
            p.pid
        );
        assert_eq!(
            Some(p.turnaround_time),
            p.exit_time,
            "{}: turnaround differs from exit tick ({p:?})",
            p.pid
        );
        assert!(
            p.exit_time.is_some_and(|t| t <= result.total_ticks),
            "{} exited after the run ended",
            p.pid
        );
    }

    assert!(result.used_ticks <= result.total_ticks);
    assert_eq!(
        result.total_ticks - result.used_ticks,
        result.trace.idle_ticks() as u64,
        "idle ticks do not account for unused CPU time"
    );
    assert_eq!(
        result.processes.iter().filter_map(|p| p.exit_time).max(),
        Some(result.total_ticks),
        "run did not end with the last termination"
    );
}

/// Generate a suite of policy-generic tests.
///
/// `$make_policy` is a function `|| -> impl Policy` that constructs the
/// policy under test.
///
/// Usage:
/// ```ignore
/// #[macro_use]
/// mod common;
/// policy_tests!(Fcfs::new);
/// ```
#[macro_export]
macro_rules! policy_tests {
    ($make_policy:expr) => {
        /// Smoke test: one CPU-only process runs straight through.
        #[test]
        fn test_single_process() {
            common::setup_test();
            let make_policy = $make_policy;
            let scenario = Scenario::builder().cpu_only(1).build().unwrap();

            let result = Simulator::new(make_policy()).run(&scenario);
            result.trace.dump();

            let p = result.process(Pid(0));
            assert_eq!(p.entrance_time, Some(0));
            assert_eq!(p.exit_time, Some(1));
            assert_eq!(p.waiting_time, 0);
            assert_eq!(result.metrics().cpu_utilization, 1.0);
        }

        /// A lone process doing I/O leaves the CPU idle for the I/O burst.
        #[test]
        fn test_io_leaves_cpu_idle() {
            common::setup_test();
            let make_policy = $make_policy;
            let scenario = Scenario::builder().process(&[2, 5, 1]).build().unwrap();

            let result = Simulator::new(make_policy()).run(&scenario);
            result.trace.dump();

            assert_eq!(result.total_ticks, 8);
            assert_eq!(result.used_ticks, 3);
            assert_eq!(result.trace.idle_ticks(), 5);
            assert_eq!(result.trace.dispatch_ticks(Pid(0)), vec![0, 7]);
            assert_eq!(result.process(Pid(0)).waiting_time, 0);
            common::assert_timing_identities(&result);
        }

        /// A process ending on an I/O burst terminates off the CPU.
        #[test]
        fn test_trailing_io_terminates() {
            common::setup_test();
            let make_policy = $make_policy;
            let scenario = Scenario::builder()
                .process(&[1, 3])
                .cpu_only(2)
                .build()
                .unwrap();

            let result = Simulator::new(make_policy()).run(&scenario);
            result.trace.dump();

            assert_eq!(result.process(Pid(1)).exit_time, Some(3));
            assert_eq!(result.process(Pid(0)).exit_time, Some(4));
            assert_eq!(result.total_ticks, 4);
            assert_eq!(result.used_ticks, 3);
            common::assert_timing_identities(&result);
        }

        /// Every sample process finishes and the bookkeeping holds each tick.
        #[test]
        fn test_sample_workload_invariants() {
            common::setup_test();
            let make_policy = $make_policy;
            let scenario = sample_workload();

            let mut monitor = common::InvariantMonitor::default();
            let result = Simulator::new(make_policy()).run_with_monitor(&scenario, &mut monitor);

            assert_eq!(monitor.ticks as u64, result.total_ticks);
            assert_eq!(result.processes.len(), scenario.len());
            assert!(result.processes.iter().all(|p| p.exit_time.is_some()));
            common::assert_timing_identities(&result);

            let m = result.metrics();
            assert!(m.cpu_utilization > 0.0 && m.cpu_utilization <= 1.0);
        }

        /// Determinism: same scenario should produce identical results.
        #[test]
        fn test_determinism() {
            common::setup_test();
            let make_policy = $make_policy;
            let scenario = sample_workload();

            let r1 = Simulator::new(make_policy()).run(&scenario);
            let r2 = Simulator::new(make_policy()).run(&scenario);

            assert_eq!(r1.trace.events().len(), r2.trace.events().len());
            for (i, (e1, e2)) in r1.trace.events().iter().zip(r2.trace.events()).enumerate() {
                assert_eq!(e1, e2, "event {i} differs");
            }
            assert_eq!(
                serde_json::to_string(&r1).unwrap(),
                serde_json::to_string(&r2).unwrap()
            );
        }

        /// Monitoring is read-only: it never changes the outcome.
        #[test]
        fn test_monitor_does_not_perturb() {
            common::setup_test();
            let make_policy = $make_policy;
            let scenario = sample_workload();

            let plain = Simulator::new(make_policy()).run(&scenario);
            let mut log = SnapshotLog::default();
            let monitored = Simulator::new(make_policy()).run_with_monitor(&scenario, &mut log);

            assert_eq!(plain, monitored);
            assert_eq!(log.snapshots.len() as u64, plain.total_ticks);
        }
    };
}
