//! cachesim - replay access traces against the PicDB LRU cache

mod report;
mod trace;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use piccache::{CacheConfig, Capacity, EntityKind, LruCache};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::Summary;
use crate::trace::{read_trace, Replayer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trace file, one operation per line ("-" for stdin)
    trace: PathBuf,

    /// Cache capacity (number of items, negative = unbounded)
    #[arg(short, long, default_value_t = 2000, allow_negative_numbers = true)]
    capacity: i64,

    /// Take the capacity from a cache config file instead
    #[arg(long, requires = "entity", conflicts_with = "capacity")]
    config: Option<PathBuf>,

    /// Entity cache to size from the config file
    #[arg(long, requires = "config", value_parser = parse_entity)]
    entity: Option<EntityKind>,

    /// Put the key back after every missed get
    #[arg(long)]
    populate_on_miss: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn parse_entity(value: &str) -> std::result::Result<EntityKind, String> {
    match value.to_lowercase().as_str() {
        "tag" | "tags" => Ok(EntityKind::Tag),
        "group" | "groups" => Ok(EntityKind::Group),
        "picture" | "pictures" => Ok(EntityKind::Picture),
        other => Err(format!("unknown entity '{}'", other)),
    }
}

/// Log filter when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn resolve_capacity(args: &Args) -> Result<Capacity> {
    match (&args.config, args.entity) {
        (Some(path), Some(kind)) => {
            let config = CacheConfig::from_file(path)
                .with_context(|| format!("failed to load cache config {}", path.display()))?;
            Ok(config.capacity_for(kind))
        }
        _ => Ok(Capacity::from_signed(args.capacity)),
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let capacity = resolve_capacity(&args)?;

    info!("Starting cachesim v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", capacity);

    let ops = if args.trace.as_os_str() == "-" {
        read_trace(io::stdin().lock())?
    } else {
        let file = File::open(&args.trace)
            .with_context(|| format!("failed to open trace {}", args.trace.display()))?;
        read_trace(BufReader::new(file))?
    };
    info!("Replaying {} operations", ops.len());

    let mut replayer = Replayer::new(LruCache::with_capacity(capacity), args.populate_on_miss);
    replayer.run(ops);

    let cache = replayer.cache();
    let summary = Summary::new(replayer.ops(), cache.capacity(), cache.len(), cache.stats());

    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{}", summary);
    }

    Ok(())
}
