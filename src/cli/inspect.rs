// src/cli/inspect.rs — `wayrank patterns` and `wayrank drift`

use crate::clock::{time_slot, Clock, SystemClock};
use crate::optimizer::OptimizationEngine;

pub fn show_patterns(
    engine: &OptimizationEngine,
    hour: Option<u8>,
    day: Option<u8>,
    all_days: bool,
) -> anyhow::Result<()> {
    let (today, now_hour) = time_slot(SystemClock.now_ms());
    let hour = hour.unwrap_or(now_hour);
    let day = if all_days { None } else { Some(day.unwrap_or(today)) };

    let patterns = engine.patterns_for(hour, day);
    let slot = match day {
        Some(d) => format!("day {d}, {hour:02}:00"),
        None => format!("all days, {hour:02}:00"),
    };

    if patterns.is_empty() {
        println!("No usage recorded near {slot}.");
        return Ok(());
    }

    println!("Ranking for {slot}:");
    println!();
    for p in &patterns {
        println!(
            "  {:<32} {:>6.1}  {:>3}x  dwell {:>6.0}s  return {:>4.1}/wk",
            p.destination,
            p.score,
            p.frequency,
            p.average_dwell_time / 1000.0,
            p.return_frequency,
        );
    }
    Ok(())
}

pub fn show_drift(engine: &OptimizationEngine) -> anyhow::Result<()> {
    let report = engine.drift_report();
    println!("  Events (30d):      {}", report.total_events);
    println!("  Last 7 days:       {}", report.recent_events);
    println!("  7-14 days ago:     {}", report.previous_events);
    println!(
        "  Shifted:           {}/{} destinations",
        report.shifted_destinations, report.distinct_destinations
    );
    println!(
        "  Drift:             {}",
        if report.changed { "yes" } else { "no" }
    );
    Ok(())
}
