use crate::domain::models::{AuditResponse, UsageStats};
use crate::services::storage;
use std::path::Path;

pub fn load() -> anyhow::Result<UsageStats> {
    load_from(&storage::stats_path()?)
}

/// Folds one completed audit into the persisted counters: audit count +1,
/// violation accumulator += server-reported total, scan time restamped.
/// Called exactly once per successful render.
pub fn update(response: &AuditResponse) -> anyhow::Result<UsageStats> {
    update_at(&storage::stats_path()?, response)
}

pub fn load_from(path: &Path) -> anyhow::Result<UsageStats> {
    if !path.exists() {
        return Ok(UsageStats::default());
    }
    let raw = std::fs::read_to_string(path)?;
    match serde_json::from_str(&raw) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            // Best-effort cache: an unreadable record degrades to zeroes
            // instead of wedging the pipeline.
            log::warn!("unreadable stats record at {}: {}", path.display(), e);
            Ok(UsageStats::default())
        }
    }
}

pub fn update_at(path: &Path, response: &AuditResponse) -> anyhow::Result<UsageStats> {
    let mut stats = load_from(path)?;
    stats.audit_count += 1;
    stats.total_violations += response.total_violations;
    stats.last_scan_time = Some(chrono::Local::now().format("%H:%M:%S").to_string());
    storage::write_atomic(path, &serde_json::to_string_pretty(&stats)?)?;
    Ok(stats)
}
