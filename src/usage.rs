//! Per-tool usage counters, kept as one JSON object under a single flag key.
//!
//! Increments are a plain read-modify-write on the store. Two writers racing
//! can lose an increment; the shell only ever has one writer.

use crate::flag_store::{FlagStore, TOOL_USAGE_KEY, read_flag, write_flag};
use std::collections::BTreeMap;

pub type UsageCounts = BTreeMap<String, u64>;

/// Loads the counters. Missing, unreadable or malformed data yields an
/// empty map.
pub fn load_usage(store: &dyn FlagStore) -> UsageCounts {
    let Some(raw) = read_flag(store, TOOL_USAGE_KEY) else {
        return UsageCounts::new();
    };
    match serde_json::from_str::<UsageCounts>(&raw) {
        Ok(counts) => counts,
        Err(e) => {
            log::warn!("Discarding malformed tool usage data: {e}");
            UsageCounts::new()
        }
    }
}

/// Bumps the counter for `tool_id` and returns its new value.
pub fn record_tool_use(store: &mut dyn FlagStore, tool_id: &str) -> u64 {
    let mut counts = load_usage(store);
    let count = counts.entry(tool_id.to_string()).or_insert(0);
    *count += 1;
    let updated = *count;

    match serde_json::to_string(&counts) {
        Ok(serialized) => {
            write_flag(store, TOOL_USAGE_KEY, &serialized);
        }
        Err(e) => log::warn!("Failed to serialize tool usage: {e}"),
    }
    updated
}

pub fn usage_of(counts: &UsageCounts, tool_id: &str) -> u64 {
    counts.get(tool_id).copied().unwrap_or(0)
}
