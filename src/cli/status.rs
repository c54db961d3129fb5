// src/cli/status.rs — Journal, cache and config status

use crate::clock::{Clock, SystemClock};
use crate::infra::config::Config;
use crate::infra::paths;
use crate::optimizer::OptimizationEngine;

pub fn show_status(engine: &OptimizationEngine, config: &Config, reset: bool) -> anyhow::Result<()> {
    if reset {
        engine.log_store().clear();
        engine.invalidate();
        println!("Cleared usage journal and cached plan.");
        return Ok(());
    }

    let config_path = paths::config_file_path();
    let db_path = paths::db_path();
    let db_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    println!("wayrank v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if config_path.exists() {
        println!("  Config:     {} (loaded)", config_path.display());
    } else {
        println!("  Config:     (using defaults)");
    }
    println!("  Database:   {} ({})", db_path.display(), format_bytes(db_size));

    let settings = config.optimizer.settings();
    let categories: Vec<&str> = settings
        .selected_categories
        .iter()
        .map(String::as_str)
        .collect();
    println!(
        "  Optimizer:  {} (categories: {})",
        if settings.is_active() { "active" } else { "inactive" },
        if categories.is_empty() {
            "none".to_string()
        } else {
            categories.join(", ")
        }
    );

    let limits = engine.log_store().limits();
    println!(
        "  Journal:    {} events (cap {}, {} days)",
        engine.log_store().len(),
        limits.max_events,
        limits.max_age_days
    );

    match engine.cache().peek() {
        Some(cached) => {
            let age_secs = SystemClock.now_ms().saturating_sub(cached.cached_at) / 1000;
            let state = if age_secs < 0 || age_secs as u64 > engine.cache().ttl().as_secs() {
                "expired"
            } else {
                "fresh"
            };
            println!(
                "  Cache:      {} destinations, pattern v{}, {}s old ({state})",
                cached.result.items.len(),
                cached.result.pattern_version,
                age_secs
            );
        }
        None => println!("  Cache:      (empty)"),
    }

    match &config.remote.base_url {
        Some(url) if engine.has_remote() => println!(
            "  Remote:     {url} (timeout {}ms)",
            config.remote.timeout().as_millis()
        ),
        Some(url) => println!("  Remote:     {url} (invalid URL, local only)"),
        None => println!("  Remote:     (local only)"),
    }
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1}MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.0KB");
        assert_eq!(format_bytes(3 * 1_048_576), "3.0MB");
    }
}
