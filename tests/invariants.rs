use sched_sim::*;

#[macro_use]
mod common;

fn cpu_demand(scenario: &Scenario) -> Ticks {
    scenario
        .processes()
        .iter()
        .flat_map(|p| p.bursts.iter().step_by(2))
        .sum()
}

/// Every policy spends exactly the scenario's CPU demand on the CPU.
#[test]
fn test_cpu_time_conserved() {
    common::setup_test();
    let scenario = sample_workload();
    let demand = cpu_demand(&scenario);

    for kind in PolicyKind::ALL {
        let result = simulate(kind, &scenario);
        assert_eq!(result.used_ticks, demand, "{kind}: CPU time not conserved");
        common::assert_timing_identities(&result);
    }
}

/// The runtime-selected policy behaves exactly like the concrete one.
#[test]
fn test_dyn_policy_matches_concrete() {
    common::setup_test();
    let scenario = sample_workload();

    assert_eq!(
        simulate(PolicyKind::Fcfs, &scenario),
        Simulator::new(Fcfs::new()).run(&scenario)
    );
    assert_eq!(
        simulate(PolicyKind::Sjf, &scenario),
        Simulator::new(Sjf::new()).run(&scenario)
    );
    assert_eq!(
        simulate(PolicyKind::Mlfq, &scenario),
        Simulator::new(Mlfq::new()).run(&scenario)
    );
}

/// Utilization is 1.0 exactly when the CPU never idles.
#[test]
fn test_utilization_matches_idle_ticks() {
    common::setup_test();
    let busy = Scenario::from_bursts([[3u64], [4], [1]]).unwrap();
    let idle = Scenario::from_bursts([vec![1u64, 6, 1]]).unwrap();

    for kind in PolicyKind::ALL {
        let r = simulate(kind, &busy);
        assert_eq!(r.trace.idle_ticks(), 0);
        assert_eq!(r.metrics().cpu_utilization, 1.0);

        let r = simulate(kind, &idle);
        assert_eq!(r.trace.idle_ticks(), 6);
        assert_eq!(r.metrics().cpu_utilization, 2.0 / 8.0);
    }
}

/// Results serialize with the policy name and per-process statistics.
#[test]
fn test_result_json() {
    common::setup_test();
    let scenario = Scenario::from_bursts([[5u64], [3]]).unwrap();
    let result = simulate(PolicyKind::Fcfs, &scenario);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["policy"], "fcfs");
    assert_eq!(json["total_ticks"], 8);
    assert_eq!(json["processes"][1]["waiting_time"], 5);
    assert_eq!(json["processes"][1]["final_priority"], 2);

    let metrics = serde_json::to_value(result.metrics()).unwrap();
    assert_eq!(metrics["avg_waiting"], 2.5);
}

#[test]
fn test_policy_kind_parse() {
    for kind in PolicyKind::ALL {
        assert_eq!(kind.to_string().parse::<PolicyKind>(), Ok(kind));
    }
    assert_eq!("MLFQ".parse::<PolicyKind>(), Ok(PolicyKind::Mlfq));
    assert!(matches!(
        "rr".parse::<PolicyKind>(),
        Err(SimError::UnknownPolicy(_))
    ));
}
