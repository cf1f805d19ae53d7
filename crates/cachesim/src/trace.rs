//! Access trace parsing and replay
//!
//! One operation per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! put 17 beach
//! get 17
//! remove 17
//! clear
//! ```

use std::fmt;
use std::io::BufRead;

use anyhow::{bail, Context, Result};
use piccache::LruCache;
use tracing::{debug, trace};

/// Value stored by `put` lines that carry none
const PLACEHOLDER: &str = "-";

/// Single trace operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Look a key up
    Get(String),
    /// Store a value
    Put(String, String),
    /// Invalidate a key
    Remove(String),
    /// Empty the cache and reset counters
    Clear,
}

impl Op {
    /// Parse one trace line. `Ok(None)` for blank and comment lines.
    pub fn parse(line: &str) -> Result<Option<Op>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let args: Vec<&str> = line.split_whitespace().collect();
        let command = args[0].to_lowercase();

        let op = match (command.as_str(), &args[1..]) {
            ("get", [key]) => Op::Get(key.to_string()),
            ("put", [key]) => Op::Put(key.to_string(), PLACEHOLDER.to_string()),
            ("put", [key, value]) => Op::Put(key.to_string(), value.to_string()),
            ("remove", [key]) => Op::Remove(key.to_string()),
            ("clear", []) => Op::Clear,
            ("get" | "put" | "remove" | "clear", _) => {
                bail!("wrong number of arguments for '{}'", command)
            }
            _ => bail!("unknown operation '{}'", command),
        };
        Ok(Some(op))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Get(key) => write!(f, "get {}", key),
            Op::Put(key, value) => write!(f, "put {} {}", key, value),
            Op::Remove(key) => write!(f, "remove {}", key),
            Op::Clear => write!(f, "clear"),
        }
    }
}

/// Read every operation from a trace, reporting the offending line on error
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read trace line {}", line_no))?;
        if let Some(op) = Op::parse(&line).with_context(|| format!("trace line {}", line_no))? {
            ops.push(op);
        }
    }
    Ok(ops)
}

/// Replays operations against a cache
pub struct Replayer {
    cache: LruCache<String, String>,
    populate_on_miss: bool,
    ops: u64,
}

impl Replayer {
    /// Create a replayer
    ///
    /// With `populate_on_miss`, a missed `get` is followed by a `put` of the
    /// key, as a caller fetching from the database would do.
    pub fn new(cache: LruCache<String, String>, populate_on_miss: bool) -> Self {
        Self {
            cache,
            populate_on_miss,
            ops: 0,
        }
    }

    /// Apply one operation
    pub fn apply(&mut self, op: Op) {
        trace!(%op, "replay");
        self.ops += 1;

        match op {
            Op::Get(key) => {
                if self.cache.get(&key).is_err() && self.populate_on_miss {
                    debug!(key = %key, "miss, populating");
                    self.cache.put(key, PLACEHOLDER.to_string());
                }
            }
            Op::Put(key, value) => self.cache.put(key, value),
            Op::Remove(key) => {
                self.cache.remove(&key);
            }
            Op::Clear => self.cache.clear(),
        }
    }

    /// Apply all operations in order
    pub fn run<I: IntoIterator<Item = Op>>(&mut self, ops: I) {
        for op in ops {
            self.apply(op);
        }
    }

    /// Number of operations applied
    pub fn ops(&self) -> u64 {
        self.ops
    }

    /// The replayed cache
    pub fn cache(&self) -> &LruCache<String, String> {
        &self.cache
    }
}
