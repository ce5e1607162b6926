//! Raw statistics reported by a cache service
//!
//! Redis answers `INFO` with `field:value` lines grouped under `# Section`
//! headers. [`CacheInfo::from_info_text`] reads the handful of fields the
//! metrics endpoint needs.

use std::collections::HashMap;

use crate::error::{CacheError, CacheResult};

/// Cumulative counters as reported by the cache service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheInfo {
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    /// e.g. `"1.05M"`; `None` when the service does not report it
    pub used_memory_human: Option<String>,
    pub connected_clients: u64,
}

impl CacheInfo {
    /// Parses the text of a Redis `INFO` reply.
    ///
    /// Absent counters read as zero. A counter that is present but not an
    /// unsigned integer is malformed.
    pub fn from_info_text(text: &str) -> CacheResult<Self> {
        let fields = parse_info_fields(text);
        Ok(Self {
            keyspace_hits: counter(&fields, "keyspace_hits")?,
            keyspace_misses: counter(&fields, "keyspace_misses")?,
            used_memory_human: fields
                .get("used_memory_human")
                .map(|v| v.to_string())
                .filter(|v| !v.is_empty()),
            connected_clients: counter(&fields, "connected_clients")?,
        })
    }
}

/// Splits `INFO` output into `field -> value`, skipping headers and blanks.
pub fn parse_info_fields(text: &str) -> HashMap<&str, &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(field, value)| (field.trim(), value.trim()))
        .collect()
}

fn counter(fields: &HashMap<&str, &str>, name: &str) -> CacheResult<u64> {
    match fields.get(name) {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| {
            CacheError::Malformed(format!("{} is not a counter: '{}'", name, raw))
        }),
    }
}

/// Formats a byte count the way Redis renders `used_memory_human`.
pub fn bytes_to_human(bytes: u64) -> String {
    const UNITS: [(f64, &str); 5] = [
        (1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0, "P"),
        (1024.0 * 1024.0 * 1024.0 * 1024.0, "T"),
        (1024.0 * 1024.0 * 1024.0, "G"),
        (1024.0 * 1024.0, "M"),
        (1024.0, "K"),
    ];
    let value = bytes as f64;
    for (scale, suffix) in UNITS {
        if value >= scale {
            return format!("{:.2}{}", value / scale, suffix);
        }
    }
    format!("{}B", bytes)
}
