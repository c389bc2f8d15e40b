//! Benchmark for schedule generation throughput.
//!
//! Run with: cargo run --release --bin bench

use shift_scheduling::constraints::validate_assignments;
use shift_scheduling::demo_data::{self, DemoData};
use shift_scheduling::engine::generate_schedule;
use shift_scheduling::scoring::RandomTieBreak;
use shift_scheduling::{console, validation};
use std::time::Instant;

const RUNS: u64 = 200;

fn main() {
    let input = demo_data::generate(DemoData::Large);
    let days = input.period.dates().len();

    println!("Benchmark: Greedy Score-Fill Generation");
    println!("  Days: {}", days);
    println!("  Staff: {}", input.staff.len());
    println!("  Runs: {}", RUNS);
    println!();

    let errors = validation::validate_inputs(&input);
    assert!(errors.is_empty(), "demo input invalid: {:?}", errors);

    // Warm-up run, also reported.
    let warm_start = Instant::now();
    let generated = generate_schedule(&input, &mut RandomTieBreak::seeded(0));
    let violations = validate_assignments(&input, &generated.assignments);
    console::print_generation("Warm-up", &generated, violations.len(), warm_start.elapsed());
    println!();

    let bench_start = Instant::now();
    let mut infeasible = 0u64;
    for seed in 0..RUNS {
        let generated = generate_schedule(&input, &mut RandomTieBreak::seeded(seed));
        if !validate_assignments(&input, &generated.assignments).is_empty() {
            infeasible += 1;
        }
    }
    let elapsed = bench_start.elapsed();
    let days_per_sec = (RUNS as f64 * days as f64) / elapsed.as_secs_f64();

    println!("Results:");
    println!("  Time: {:.2?}", elapsed);
    println!("  Per run: {:.2?}", elapsed / RUNS as u32);
    println!("  Days/sec: {:.0}", days_per_sec);
    println!("  Infeasible runs: {}", infeasible);
}
