//! schedsim: run CPU scheduling simulations over burst-schedule workloads.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sched_sim::{
    init_tracing, load_workload, sample_workload, Monitor, PolicyKind, Scenario,
    SimulationResult, Simulator, TickSnapshot,
};

/// Run CPU scheduling simulations over burst-schedule workloads.
#[derive(Parser)]
#[command(name = "schedsim")]
struct Cli {
    /// Path to a JSON workload file.
    ///
    /// Either an array of burst schedules (`[[4, 24, 5], [18, 31, 19]]`) or
    /// `{"processes": [{"bursts": [...]}, ...]}`. Bursts alternate CPU and
    /// I/O, starting with CPU. Defaults to the built-in eight-process sample.
    workload: Option<PathBuf>,

    /// Policies to run, comma separated (fcfs, sjf, mlfq).
    #[arg(
        short,
        long = "policy",
        env = "SCHED_SIM_POLICY",
        value_delimiter = ',',
        default_value = "fcfs,sjf,mlfq"
    )]
    policies: Vec<PolicyKind>,

    /// Print results as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Print trace events to stderr.
    #[arg(long)]
    dump_trace: bool,

    /// Print the ready queues, I/O set and finished set after every tick.
    #[arg(long)]
    snapshots: bool,
}

/// Prints each snapshot as it is taken.
struct SnapshotPrinter;

impl Monitor for SnapshotPrinter {
    fn sample(&mut self, snapshot: &TickSnapshot) {
        eprintln!("{snapshot}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let scenario = load_scenario(&cli)?;
    let mut results = Vec::with_capacity(cli.policies.len());
    for &kind in &cli.policies {
        results.push(run_policy(&cli, kind, &scenario));
    }

    if cli.json {
        let report: Vec<_> = results
            .iter()
            .map(|r| serde_json::json!({ "result": r, "metrics": r.metrics() }))
            .collect();
        let out = serde_json::to_string_pretty(&report).context("failed to serialize results")?;
        println!("{out}");
    } else {
        for r in &results {
            r.metrics().print_summary(r.policy, &r.processes);
        }
    }

    Ok(())
}

fn load_scenario(cli: &Cli) -> Result<Scenario> {
    let Some(path) = &cli.workload else {
        return Ok(sample_workload());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    load_workload(&json).with_context(|| format!("failed to parse workload {}", path.display()))
}

fn run_policy(cli: &Cli, kind: PolicyKind, scenario: &Scenario) -> SimulationResult {
    let sim = Simulator::new(kind.build());
    let result = if cli.snapshots {
        eprintln!("--- {kind} ---");
        sim.run_with_monitor(scenario, &mut SnapshotPrinter)
    } else {
        sim.run(scenario)
    };

    if cli.dump_trace {
        eprintln!("--- {kind} trace ---");
        result.trace.dump();
    }
    result
}
