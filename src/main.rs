use std::process::ExitCode;

use vcube_sim::config::{DEFAULT_MAX_TIME, DEFAULT_SEED, DEFAULT_TEST_PERIOD};
use vcube_sim::{LoggedEventKind, Simulation, SimulationConfig};

const USAGE: &str = "Usage: vcube-sim <process_count> <false_negative_probability> [max_time] [test_period]";

struct Args {
    process_count: usize,
    false_negative_probability: f64,
    max_time: f64,
    test_period: f64,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    if raw.len() < 2 {
        return Err(USAGE.to_string());
    }

    let process_count: usize = raw[0]
        .parse()
        .map_err(|_| format!("invalid process count {:?}\n{USAGE}", raw[0]))?;

    let false_negative_probability: f64 = raw[1]
        .parse()
        .map_err(|_| format!("invalid false_negative_probability {:?}\n{USAGE}", raw[1]))?;
    if !(0.0..=1.0).contains(&false_negative_probability) {
        return Err(format!(
            "false_negative_probability must be in [0, 1], got {false_negative_probability}\n{USAGE}"
        ));
    }

    let max_time = match raw.get(2) {
        Some(s) => s
            .parse()
            .map_err(|_| format!("invalid max_time {s:?}\n{USAGE}"))?,
        None => DEFAULT_MAX_TIME,
    };

    let test_period = match raw.get(3) {
        Some(s) => s
            .parse()
            .map_err(|_| format!("invalid test_period {s:?}\n{USAGE}"))?,
        None => DEFAULT_TEST_PERIOD,
    };

    Ok(Args {
        process_count,
        false_negative_probability,
        max_time,
        test_period,
    })
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing();

    let config = SimulationConfig::new(args.process_count, args.false_negative_probability)
        .with_max_time(args.max_time)
        .with_test_period(args.test_period)
        .with_seed(DEFAULT_SEED);

    tracing::info!(
        process_count = config.process_count,
        false_negative_probability = config.false_negative_probability,
        max_time = config.max_time,
        test_period = config.test_period,
        "starting vcube simulation"
    );

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(err) => {
            eprintln!("invalid configuration: {err}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let result = simulation.run();

    println!("Simulation results:");
    println!("  correct process count: {}", result.remaining_processes);
    println!("  termination count:     {}", result.termination_count);
    println!("  test count:            {}", result.test_count);
    println!("  false negative count:  {}", result.false_negative_count);
    println!();
    println!("Events:");
    for event in &result.events {
        let label = match event.kind {
            LoggedEventKind::FalseNegative => "FALSE_NEGATIVE",
            LoggedEventKind::SelfTermination => "SELF_TERMINATION",
        };
        println!("  {:>8.2}  {:<16}  {}", event.time, label, event.message);
    }

    ExitCode::SUCCESS
}
