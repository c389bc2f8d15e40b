//! Colorful console output for the server and bench binaries.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::config::AppConfig;
use crate::engine::GeneratedSchedule;

/// ASCII art banner for server startup.
pub fn print_banner() {
    let banner = r#"
  ____  _     _  __ _
 / ___|| |__ (_)/ _| |_ ___
 \___ \| '_ \| | |_| __/ __|
  ___) | | | | |  _| |_\__ \
 |____/|_| |_|_|_|  \__|___/
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Shift Scheduling".bright_cyan()
    );
}

/// Prints the effective configuration.
pub fn print_config(config: &AppConfig, saved_schedules: usize) {
    let store = config
        .store_path
        .as_ref()
        .map_or_else(|| "in-memory".to_string(), |p| p.display().to_string());
    let seed = config
        .random_seed
        .map_or_else(|| "entropy".to_string(), |s| s.to_string());
    println!(
        "{} {} {} store ({}), schedules ({}), tie-break seed ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Config]".bright_cyan(),
        store.white(),
        saved_schedules.to_formatted_string(&Locale::en).bright_yellow(),
        seed.yellow()
    );
    let rules = &config.work_rules;
    println!(
        "{} {} {} default rules: base ({}), max ({}), work ({}h), break ({}h)",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Config]".bright_cyan(),
        rules.daily_staff_base.bright_yellow(),
        rules.daily_staff_max.bright_yellow(),
        rules.work_hours.white(),
        rules.break_hours.white()
    );
}

/// Prints the listen address.
pub fn print_listening(addr: &str) {
    println!(
        "{} {} {} listening on {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Server]".bright_cyan(),
        format!("http://{}", addr).bright_white().bold()
    );
}

/// Prints a one-line summary of a generation run.
pub fn print_generation(
    label: &str,
    generated: &GeneratedSchedule,
    violations: usize,
    elapsed: Duration,
) {
    let units: f64 = generated.stats.iter().map(|s| s.work_units).sum();
    let status = if violations == 0 {
        "feasible".bright_green().bold().to_string()
    } else {
        format!("{} violations", violations.to_formatted_string(&Locale::en))
            .bright_red()
            .bold()
            .to_string()
    };
    println!(
        "{} {} {} days ({}), staff ({}), units ({}), time spent ({}), {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", label).bright_cyan(),
        generated.assignments.len().to_formatted_string(&Locale::en).bright_yellow(),
        generated.stats.len().to_formatted_string(&Locale::en).bright_yellow(),
        units.white(),
        format_duration(elapsed).yellow(),
        status
    );
}

/// Formats a duration nicely.
pub fn format_duration(d: Duration) -> String {
    let total_us = d.as_micros();
    if total_us < 1000 {
        format!("{}µs", total_us)
    } else if total_us < 1_000_000 {
        format!("{:.2}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

/// Returns a timestamp string.
fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{}.{:03}", d.as_secs(), d.subsec_millis()))
        .unwrap_or_else(|_| "0.000".to_string())
}
