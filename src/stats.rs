//! Post-run metrics.
//!
//! Pure aggregation over the final process collection: per-process timing
//! and the averages plus CPU utilization reported for a whole run.

use serde::Serialize;

use crate::process::Process;
use crate::types::{Pid, Priority, Tick, Ticks};

/// Final timing of one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub pid: Pid,
    pub arrival_time: Tick,
    /// First tick the process held the CPU.
    pub entrance_time: Option<Tick>,
    /// Tick at which the process terminated.
    pub exit_time: Option<Tick>,
    pub waiting_time: Ticks,
    pub turnaround_time: Ticks,
    pub response_time: Ticks,
    /// Sum of all CPU and I/O bursts.
    pub total_burst: Ticks,
    /// MLFQ level at exit. Always the top level under other policies.
    pub final_priority: Priority,
}

impl From<&Process> for ProcessStats {
    fn from(p: &Process) -> Self {
        ProcessStats {
            pid: p.pid(),
            arrival_time: p.arrival_time(),
            entrance_time: p.entrance_time(),
            exit_time: p.exit_time(),
            waiting_time: p.waiting_time(),
            turnaround_time: p.turnaround_time(),
            response_time: p.response_time(),
            total_burst: p.total_burst(),
            final_priority: p.priority(),
        }
    }
}

/// Aggregate metrics for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub nr_processes: usize,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    /// `used_ticks / total_ticks`.
    pub cpu_utilization: f64,
    /// Ticks during which some process held the CPU.
    pub used_ticks: Ticks,
    /// Ticks from start until the last process terminated.
    pub total_ticks: Ticks,
}

impl Metrics {
    /// Compute metrics from final process statistics.
    ///
    /// # Panics
    /// Panics on an empty process set or zero total ticks. Validated
    /// scenarios can produce neither.
    pub fn from_processes(processes: &[ProcessStats], used_ticks: Ticks, total_ticks: Ticks) -> Self {
        assert!(!processes.is_empty(), "metrics over an empty process set");
        assert!(total_ticks > 0, "metrics over a zero-length run");

        let n = processes.len() as f64;
        let avg = |f: fn(&ProcessStats) -> Ticks| processes.iter().map(f).sum::<Ticks>() as f64 / n;

        Metrics {
            nr_processes: processes.len(),
            avg_waiting: avg(|p| p.waiting_time),
            avg_turnaround: avg(|p| p.turnaround_time),
            avg_response: avg(|p| p.response_time),
            cpu_utilization: used_ticks as f64 / total_ticks as f64,
            used_ticks,
            total_ticks,
        }
    }

    /// Print a summary report to stdout.
    pub fn print_summary(&self, policy: &str, processes: &[ProcessStats]) {
        println!("\n=== {} ===", policy.to_uppercase());
        println!(
            "  {:>4} {:>8} {:>8} {:>10} {:>10} {:>10}",
            "pid", "enter", "exit", "waiting", "turnaround", "response"
        );
        for p in processes {
            println!(
                "  {:>4} {:>8} {:>8} {:>10} {:>10} {:>10}",
                p.pid.0,
                fmt_opt(p.entrance_time),
                fmt_opt(p.exit_time),
                p.waiting_time,
                p.turnaround_time,
                p.response_time
            );
        }
        println!();
        println!("  CPU utilization:  {:.2}%", self.cpu_utilization * 100.0);
        println!("  Avg waiting:      {:.2}", self.avg_waiting);
        println!("  Avg turnaround:   {:.2}", self.avg_turnaround);
        println!("  Avg response:     {:.2}", self.avg_response);
        println!("  Total ticks:      {}", self.total_ticks);
    }
}

fn fmt_opt(v: Option<Tick>) -> String {
    v.map_or_else(|| "-".to_string(), |t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pid: usize, waiting: Ticks, turnaround: Ticks, response: Ticks) -> ProcessStats {
        ProcessStats {
            pid: Pid(pid),
            arrival_time: 0,
            entrance_time: Some(response),
            exit_time: Some(turnaround),
            waiting_time: waiting,
            turnaround_time: turnaround,
            response_time: response,
            total_burst: turnaround - waiting,
            final_priority: Priority::TOP,
        }
    }

    #[test]
    fn test_averages() {
        let procs = [stats(0, 0, 5, 0), stats(1, 5, 8, 5)];
        let m = Metrics::from_processes(&procs, 8, 8);
        assert_eq!(m.nr_processes, 2);
        assert_eq!(m.avg_waiting, 2.5);
        assert_eq!(m.avg_turnaround, 6.5);
        assert_eq!(m.avg_response, 2.5);
        assert_eq!(m.cpu_utilization, 1.0);
    }

    #[test]
    fn test_utilization_with_idle() {
        let procs = [stats(0, 0, 10, 0)];
        let m = Metrics::from_processes(&procs, 4, 10);
        assert_eq!(m.cpu_utilization, 0.4);
    }

    #[test]
    #[should_panic(expected = "empty process set")]
    fn test_empty_set_panics() {
        Metrics::from_processes(&[], 0, 1);
    }
}
