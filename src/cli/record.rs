// src/cli/record.rs — `wayrank record`

use crate::clock::{Clock, SystemClock};
use crate::optimizer::OptimizationEngine;
use crate::usage::UsageEvent;

pub async fn run_record(
    engine: &OptimizationEngine,
    destination: &str,
    dwell_ms: Option<f64>,
    return_frequency: Option<f64>,
) -> anyhow::Result<()> {
    let mut event = UsageEvent::new(destination, SystemClock.now_ms());
    if let Some(dwell) = dwell_ms {
        event = event.with_dwell_time(dwell);
    }
    if let Some(rf) = return_frequency {
        event = event.with_return_frequency(rf);
    }
    if !event.is_valid() {
        anyhow::bail!("Invalid usage event: destination must be non-empty and measures non-negative");
    }

    match engine.record_and_forward(event).await {
        Ok(()) => println!("Recorded visit to {destination}"),
        Err(e) => println!("Recorded visit to {destination} (local only: {e})"),
    }
    Ok(())
}
