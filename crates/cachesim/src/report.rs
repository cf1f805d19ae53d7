//! Replay summary output

use std::fmt;

use piccache::{CacheReport, CacheStats, Capacity};
use serde::Serialize;

/// Summary of a replayed trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Operations applied
    pub ops: u64,
    /// Cache state and counters after the replay
    pub cache: CacheReport,
}

impl Summary {
    /// Build a summary from the replayed cache state
    pub fn new(ops: u64, capacity: Capacity, len: usize, stats: CacheStats) -> Self {
        Self {
            ops,
            cache: CacheReport::new("trace", capacity, len, stats),
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.cache.stats;
        let capacity = match self.cache.capacity {
            Some(limit) => limit.to_string(),
            None => "unbounded".to_string(),
        };

        writeln!(f, "operations: {}", self.ops)?;
        writeln!(f, "capacity:   {}", capacity)?;
        writeln!(f, "size:       {}", self.cache.len)?;
        writeln!(f, "hits:       {}", stats.hits())?;
        writeln!(f, "misses:     {}", stats.misses())?;
        writeln!(f, "inserts:    {}", stats.inserts())?;
        writeln!(f, "evictions:  {}", stats.evictions())?;
        write!(f, "hit ratio:  {:.2}%", self.cache.hit_ratio * 100.0)
    }
}
