//! desk-runner: headless runner for the help desk simulator.
//!
//! Usage:
//!   desk-runner --config data/desk.json --days 20
//!   desk-runner --days 5 --seed 7 --db run.db --json

use anyhow::Result;
use helpdesk_core::{
    calendar::format_minutes,
    event::LogObserver,
    metrics::SimulationReport,
    store::TraceStore,
    DeskConfig, DeskEngine, RequestType,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());
    let days = parse_arg(&args, "--days", 20u32);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str());
    let json = args.iter().any(|a| a == "--json");

    let mut config = match config_path {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default_test(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);

    if !json {
        println!("Help desk simulator: desk-runner");
        println!("  config:    {}", config_path.unwrap_or("(built-in defaults)"));
        println!("  seed:      {}", config.seed);
        println!("  days:      {days}");
        println!(
            "  operators: primary={} secondary={} generalist={}",
            config.operators.primary, config.operators.secondary, config.operators.generalist
        );
        println!("  db:        {}", db.unwrap_or("(none)"));
        println!();
    }

    let mut engine = DeskEngine::new(&config)?;
    let report = match db {
        Some(path) => {
            let run_id = format!("run-{}-{}", config.seed, unix_seconds());
            let mut store = TraceStore::open(path, run_id)?;
            store.migrate()?;
            store.insert_run(config.seed, days, env!("CARGO_PKG_VERSION"))?;
            let report = engine.run_observed(days, &mut store)?;
            store.save_report(&report)?;
            log::info!("trace persisted to {path} as {}", store.run_id());
            report
        }
        None if config.debug => engine.run_observed(days, &mut LogObserver)?,
        None => engine.run(days)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &SimulationReport) {
    println!("=== RUN SUMMARY ===");
    println!("  days run:       {}", report.days);
    println!("  final clock:    {}", format_minutes(report.final_clock));
    println!();
    println!("  {:<11} {:>8} {:>8} {:>8} {:>8} {:>10}", "type", "arrived", "served", "lost", "pending", "mean wait");
    for kind in RequestType::ALL {
        let o = report.outcome(kind);
        println!(
            "  {:<11} {:>8} {:>8} {:>8} {:>8} {:>10.2}",
            kind.name(),
            o.arrivals,
            o.served,
            o.lost,
            o.pending,
            o.mean_wait_minutes
        );
    }
    println!();
    println!("=== OVERFLOW & EXCESS WAIT ===");
    println!("  primary   -> generalist: {}", report.overflow_primary);
    println!("  secondary -> generalist: {}", report.overflow_secondary);
    println!("  primary dropped (wait > threshold):   {}", report.excess_wait_drops_primary);
    println!("  secondary dropped (wait > threshold): {}", report.excess_wait_drops_secondary);
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn unix_seconds() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
