//! Two engines, same seed, same configuration.
//! They must produce identical event logs and identical reports.

use helpdesk_core::{event::EventRecorder, DeskConfig, DeskEngine};

fn run_with_seed(seed: u64, days: u32) -> EventRecorder {
    let config = DeskConfig { seed, ..DeskConfig::default_test() };
    let mut engine = DeskEngine::new(&config).expect("valid test config");
    let mut recorder = EventRecorder::new();
    engine.run_observed(days, &mut recorder).expect("run");
    recorder
}

#[test]
fn same_seed_produces_identical_event_logs() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    const DAYS: u32 = 10;

    let log_a = run_with_seed(SEED, DAYS);
    let log_b = run_with_seed(SEED, DAYS);

    assert_eq!(
        log_a.events.len(), log_b.events.len(),
        "Event log lengths differ: {} vs {}",
        log_a.events.len(), log_b.events.len()
    );
    for (i, (a, b)) in log_a.events.iter().zip(log_b.events.iter()).enumerate() {
        assert_eq!(a, b, "Event log diverged at entry {i}:\n  A: {a:?}\n  B: {b:?}");
    }
}

#[test]
fn same_seed_produces_identical_reports() {
    let config = DeskConfig { seed: 7, ..DeskConfig::default_test() };
    let report_a = DeskEngine::new(&config).unwrap().run(5).unwrap();
    let report_b = DeskEngine::new(&config).unwrap().run(5).unwrap();
    assert_eq!(report_a, report_b);
}

#[test]
fn different_seeds_produce_different_logs() {
    let log_a = run_with_seed(42, 3);
    let log_b = run_with_seed(99, 3);

    let any_different = log_a.events.len() != log_b.events.len()
        || log_a.events.iter().zip(log_b.events.iter()).any(|(a, b)| a != b);
    assert!(any_different, "Different seeds produced identical logs; seed is not being used");
}

/// Events are published in non-decreasing simulated time.
#[test]
fn event_times_never_go_backwards() {
    let log = run_with_seed(2024, 5);
    let times: Vec<f64> = log.events.iter().skip(1).map(|e| e.time()).collect();
    for pair in times.windows(2) {
        assert!(pair[0] <= pair[1], "time went backwards: {} -> {}", pair[0], pair[1]);
    }
}
